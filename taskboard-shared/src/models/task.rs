/// Task model and database operations
///
/// Tasks are the core entity of the system: units of work that live inside a
/// project, optionally assigned to a user, with a status that drives project
/// progress. Deletion is a soft delete via `deleted_at`. `reminded_at` tracks
/// the overdue reminder sent by the worker so a task is not nagged about
/// twice for the same due date.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE task_status AS ENUM ('todo', 'in_progress', 'done');
/// CREATE TYPE task_priority AS ENUM ('low', 'medium', 'high', 'critical');
///
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     project_id UUID NOT NULL REFERENCES projects(id),
///     title VARCHAR(255) NOT NULL,
///     description TEXT,
///     assigned_to_user_id UUID REFERENCES users(id),
///     status task_status NOT NULL DEFAULT 'todo',
///     priority task_priority NOT NULL DEFAULT 'medium',
///     due_date TIMESTAMPTZ,
///     reminded_at TIMESTAMPTZ,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     deleted_at TIMESTAMPTZ
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use taskboard_shared::models::task::{Task, CreateTask, TaskPriority};
/// use taskboard_shared::db::pool::{create_pool, DatabaseConfig};
/// use uuid::Uuid;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let task = Task::create(&pool, CreateTask {
///     project_id: Uuid::new_v4(),
///     title: "Ship the release".to_string(),
///     description: None,
///     assigned_to_user_id: None,
///     priority: TaskPriority::High,
///     due_date: None,
/// }).await?;
///
/// println!("created task {}", task.id);
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::models::project::ProjectProgress;

/// Task workflow status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Not started
    Todo,

    /// Being worked on
    InProgress,

    /// Finished; counts toward project completion
    Done,
}

impl TaskStatus {
    /// String form matching the `task_status` enum in the database
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Done => "done",
        }
    }

    /// Returns true for the terminal `done` status
    pub fn is_done(&self) -> bool {
        matches!(self, TaskStatus::Done)
    }
}

/// Task priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_priority", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
    Critical,
}

impl TaskPriority {
    /// String form matching the `task_priority` enum in the database
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
            TaskPriority::Critical => "critical",
        }
    }
}

impl Default for TaskPriority {
    fn default() -> Self {
        TaskPriority::Medium
    }
}

/// Task model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task ID
    pub id: Uuid,

    /// Project this task belongs to
    pub project_id: Uuid,

    /// Short title
    pub title: String,

    /// Optional longer description
    pub description: Option<String>,

    /// Assignee, if any
    pub assigned_to_user_id: Option<Uuid>,

    /// Current workflow status
    pub status: TaskStatus,

    /// Priority
    pub priority: TaskPriority,

    /// Deadline, if any
    pub due_date: Option<DateTime<Utc>>,

    /// When the worker last sent an overdue reminder for this task
    pub reminded_at: Option<DateTime<Utc>>,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    pub updated_at: DateTime<Utc>,

    /// Set when the task was soft-deleted
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Input for creating a task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTask {
    /// Project the task belongs to
    pub project_id: Uuid,

    /// Task title
    pub title: String,

    /// Optional description
    pub description: Option<String>,

    /// Optional assignee
    pub assigned_to_user_id: Option<Uuid>,

    /// Priority, defaults to medium
    #[serde(default)]
    pub priority: TaskPriority,

    /// Optional deadline
    pub due_date: Option<DateTime<Utc>>,
}

/// Input for updating a task
///
/// `None` leaves a field unchanged. Nullable columns take `Some(None)` to
/// clear the stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTask {
    /// New title
    pub title: Option<String>,

    /// New description (`Some(None)` clears it)
    pub description: Option<Option<String>>,

    /// New assignee (`Some(None)` unassigns)
    pub assigned_to_user_id: Option<Option<Uuid>>,

    /// New status
    pub status: Option<TaskStatus>,

    /// New priority
    pub priority: Option<TaskPriority>,

    /// New deadline (`Some(None)` removes it)
    pub due_date: Option<Option<DateTime<Utc>>>,
}

/// Filters for listing tasks within a project
///
/// Absent fields do not constrain the listing. `overdue: Some(true)` keeps
/// tasks whose due date lies in the past, regardless of status; `Some(false)`
/// keeps tasks with no due date or one still ahead.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskFilter {
    /// Keep only tasks in this status
    pub status: Option<TaskStatus>,

    /// Keep only tasks at this priority
    pub priority: Option<TaskPriority>,

    /// Keep only tasks assigned to this user
    pub assigned_to: Option<Uuid>,

    /// Filter on whether the due date has passed
    pub overdue: Option<bool>,

    /// Page size, defaults to 100
    pub limit: Option<i64>,

    /// Page offset, defaults to 0
    pub offset: Option<i64>,
}

impl Task {
    /// Returns true when the task has been soft-deleted
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Returns true when the due date lies strictly before `now`
    ///
    /// Status does not matter here; a done task past its deadline still
    /// matches the overdue listing filter. Tasks without a due date are
    /// never overdue.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.due_date.map(|due| due < now).unwrap_or(false)
    }

    /// Returns true when the worker should send an overdue reminder
    ///
    /// Eligible tasks are live, not done, past their due date, and have not
    /// been reminded since that due date was set. Pushing the due date out
    /// after a reminder re-arms the task.
    pub fn needs_reminder(&self, now: DateTime<Utc>) -> bool {
        if self.is_deleted() || self.status.is_done() || !self.is_overdue(now) {
            return false;
        }
        match (self.reminded_at, self.due_date) {
            (None, _) => true,
            (Some(reminded), Some(due)) => reminded < due,
            (Some(_), None) => false,
        }
    }

    /// Creates a new task in `todo` status
    ///
    /// # Arguments
    ///
    /// * `executor` - Pool or open transaction
    /// * `data` - Task fields; status always starts at `todo`
    ///
    /// # Returns
    ///
    /// The newly created task
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails, including foreign
    /// key violations on the project or assignee.
    pub async fn create(
        executor: impl PgExecutor<'_>,
        data: CreateTask,
    ) -> Result<Self, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (project_id, title, description, assigned_to_user_id, priority, due_date)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, project_id, title, description, assigned_to_user_id,
                      status, priority, due_date, reminded_at,
                      created_at, updated_at, deleted_at
            "#,
        )
        .bind(data.project_id)
        .bind(data.title)
        .bind(data.description)
        .bind(data.assigned_to_user_id)
        .bind(data.priority)
        .bind(data.due_date)
        .fetch_one(executor)
        .await?;

        Ok(task)
    }

    /// Finds a task by ID, including soft-deleted rows
    ///
    /// Fetch-by-ID is the one read that exposes deleted tasks; `deleted_at`
    /// on the returned row tells the caller what they are looking at.
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, project_id, title, description, assigned_to_user_id,
                   status, priority, due_date, reminded_at,
                   created_at, updated_at, deleted_at
            FROM tasks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Updates a live task's fields
    ///
    /// # Returns
    ///
    /// The updated task, or `None` if the task does not exist or has been
    /// soft-deleted.
    pub async fn update(
        executor: impl PgExecutor<'_>,
        id: Uuid,
        data: UpdateTask,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut query = String::from("UPDATE tasks SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.title.is_some() {
            bind_count += 1;
            query.push_str(&format!(", title = ${}", bind_count));
        }
        if data.description.is_some() {
            bind_count += 1;
            query.push_str(&format!(", description = ${}", bind_count));
        }
        if data.assigned_to_user_id.is_some() {
            bind_count += 1;
            query.push_str(&format!(", assigned_to_user_id = ${}", bind_count));
        }
        if data.status.is_some() {
            bind_count += 1;
            query.push_str(&format!(", status = ${}", bind_count));
        }
        if data.priority.is_some() {
            bind_count += 1;
            query.push_str(&format!(", priority = ${}", bind_count));
        }
        if data.due_date.is_some() {
            bind_count += 1;
            query.push_str(&format!(", due_date = ${}", bind_count));
        }

        query.push_str(
            " WHERE id = $1 AND deleted_at IS NULL \
             RETURNING id, project_id, title, description, assigned_to_user_id, \
             status, priority, due_date, reminded_at, \
             created_at, updated_at, deleted_at",
        );

        let mut q = sqlx::query_as::<_, Task>(&query).bind(id);

        if let Some(title) = data.title {
            q = q.bind(title);
        }
        if let Some(description) = data.description {
            q = q.bind(description);
        }
        if let Some(assigned_to) = data.assigned_to_user_id {
            q = q.bind(assigned_to);
        }
        if let Some(status) = data.status {
            q = q.bind(status);
        }
        if let Some(priority) = data.priority {
            q = q.bind(priority);
        }
        if let Some(due_date) = data.due_date {
            q = q.bind(due_date);
        }

        let task = q.fetch_optional(executor).await?;

        Ok(task)
    }

    /// Soft-deletes a live task
    ///
    /// # Returns
    ///
    /// The deleted task, or `None` if the task does not exist or was already
    /// deleted.
    pub async fn soft_delete(
        executor: impl PgExecutor<'_>,
        id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET deleted_at = NOW(),
                updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING id, project_id, title, description, assigned_to_user_id,
                      status, priority, due_date, reminded_at,
                      created_at, updated_at, deleted_at
            "#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;

        Ok(task)
    }

    /// Lists live tasks in a project, filtered and paginated, newest first
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: Uuid,
        filter: &TaskFilter,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let mut query = String::from(
            "SELECT id, project_id, title, description, assigned_to_user_id, \
             status, priority, due_date, reminded_at, \
             created_at, updated_at, deleted_at \
             FROM tasks WHERE project_id = $1 AND deleted_at IS NULL",
        );
        let mut bind_count = 1;

        if filter.status.is_some() {
            bind_count += 1;
            query.push_str(&format!(" AND status = ${}", bind_count));
        }
        if filter.priority.is_some() {
            bind_count += 1;
            query.push_str(&format!(" AND priority = ${}", bind_count));
        }
        if filter.assigned_to.is_some() {
            bind_count += 1;
            query.push_str(&format!(" AND assigned_to_user_id = ${}", bind_count));
        }
        match filter.overdue {
            Some(true) => query.push_str(" AND due_date IS NOT NULL AND due_date < NOW()"),
            Some(false) => query.push_str(" AND (due_date IS NULL OR due_date >= NOW())"),
            None => {}
        }

        query.push_str(&format!(
            " ORDER BY created_at DESC LIMIT ${} OFFSET ${}",
            bind_count + 1,
            bind_count + 2
        ));

        let mut q = sqlx::query_as::<_, Task>(&query).bind(project_id);

        if let Some(status) = filter.status {
            q = q.bind(status);
        }
        if let Some(priority) = filter.priority {
            q = q.bind(priority);
        }
        if let Some(assigned_to) = filter.assigned_to {
            q = q.bind(assigned_to);
        }

        let tasks = q
            .bind(filter.limit.unwrap_or(100))
            .bind(filter.offset.unwrap_or(0))
            .fetch_all(pool)
            .await?;

        Ok(tasks)
    }

    /// Counts a project's live tasks and how many of them are done
    pub async fn progress_counts(
        pool: &PgPool,
        project_id: Uuid,
    ) -> Result<ProjectProgress, sqlx::Error> {
        let (total_tasks, done_tasks): (i64, i64) = sqlx::query_as(
            r#"
            SELECT COUNT(*),
                   COUNT(*) FILTER (WHERE status = 'done')
            FROM tasks
            WHERE project_id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(project_id)
        .fetch_one(pool)
        .await?;

        Ok(ProjectProgress {
            total_tasks,
            done_tasks,
        })
    }

    /// Fetches tasks eligible for an overdue reminder, oldest deadline first
    ///
    /// Mirrors [`Task::needs_reminder`] in SQL: live, not done, past due,
    /// and not yet reminded since the current due date.
    pub async fn due_for_reminder(pool: &PgPool, limit: i64) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, project_id, title, description, assigned_to_user_id,
                   status, priority, due_date, reminded_at,
                   created_at, updated_at, deleted_at
            FROM tasks
            WHERE deleted_at IS NULL
              AND status <> 'done'
              AND due_date IS NOT NULL
              AND due_date < NOW()
              AND (reminded_at IS NULL OR reminded_at < due_date)
            ORDER BY due_date ASC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Stamps `reminded_at` after a reminder was delivered
    ///
    /// Leaves `updated_at` alone; reminder bookkeeping is not a content
    /// change.
    ///
    /// # Returns
    ///
    /// True when a live task row was stamped.
    pub async fn mark_reminded(
        executor: impl PgExecutor<'_>,
        id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE tasks SET reminded_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(executor)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample_task() -> Task {
        let now = Utc::now();
        Task {
            id: Uuid::new_v4(),
            project_id: Uuid::new_v4(),
            title: "Sample".to_string(),
            description: None,
            assigned_to_user_id: None,
            status: TaskStatus::Todo,
            priority: TaskPriority::Medium,
            due_date: None,
            reminded_at: None,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    #[test]
    fn test_task_status_as_str() {
        assert_eq!(TaskStatus::Todo.as_str(), "todo");
        assert_eq!(TaskStatus::InProgress.as_str(), "in_progress");
        assert_eq!(TaskStatus::Done.as_str(), "done");
    }

    #[test]
    fn test_task_priority_as_str() {
        assert_eq!(TaskPriority::Low.as_str(), "low");
        assert_eq!(TaskPriority::Medium.as_str(), "medium");
        assert_eq!(TaskPriority::High.as_str(), "high");
        assert_eq!(TaskPriority::Critical.as_str(), "critical");
    }

    #[test]
    fn test_default_priority_is_medium() {
        assert_eq!(TaskPriority::default(), TaskPriority::Medium);
    }

    #[test]
    fn test_is_overdue_requires_past_due_date() {
        let now = Utc::now();
        let mut task = sample_task();

        assert!(!task.is_overdue(now), "no due date is never overdue");

        task.due_date = Some(now - Duration::hours(1));
        assert!(task.is_overdue(now));

        task.due_date = Some(now + Duration::hours(1));
        assert!(!task.is_overdue(now));
    }

    #[test]
    fn test_is_overdue_ignores_status() {
        let now = Utc::now();
        let mut task = sample_task();
        task.due_date = Some(now - Duration::hours(1));
        task.status = TaskStatus::Done;

        // The listing filter treats a late-but-done task as overdue.
        assert!(task.is_overdue(now));
    }

    #[test]
    fn test_needs_reminder_skips_done_and_deleted() {
        let now = Utc::now();
        let mut task = sample_task();
        task.due_date = Some(now - Duration::hours(1));

        assert!(task.needs_reminder(now));

        task.status = TaskStatus::Done;
        assert!(!task.needs_reminder(now));

        task.status = TaskStatus::Todo;
        task.deleted_at = Some(now);
        assert!(!task.needs_reminder(now));
    }

    #[test]
    fn test_needs_reminder_only_once_per_due_date() {
        let now = Utc::now();
        let mut task = sample_task();
        task.due_date = Some(now - Duration::hours(2));

        assert!(task.needs_reminder(now));

        // Reminded after the current due date: stays quiet.
        task.reminded_at = Some(now - Duration::hours(1));
        assert!(!task.needs_reminder(now));

        // Due date pushed past the reminder, then missed again: re-arms.
        task.due_date = Some(now - Duration::minutes(30));
        assert!(task.needs_reminder(now));
    }

    #[test]
    fn test_needs_reminder_requires_due_date() {
        let now = Utc::now();
        let task = sample_task();
        assert!(!task.needs_reminder(now));
    }
}

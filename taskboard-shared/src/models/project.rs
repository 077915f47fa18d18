/// Project model and database operations
///
/// Projects group tasks and carry an owning user. Deleting a project is a
/// soft delete: the row keeps its data and gains a `deleted_at` timestamp,
/// and every live-row query filters on `deleted_at IS NULL`. Tasks under a
/// deleted project are untouched; they become unreachable through the
/// project listings but stay fetchable by ID for history.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE project_status AS ENUM ('active', 'on_hold', 'completed');
///
/// CREATE TABLE projects (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(255) NOT NULL,
///     description TEXT,
///     owner_user_id UUID NOT NULL REFERENCES users(id),
///     status project_status NOT NULL DEFAULT 'active',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     deleted_at TIMESTAMPTZ
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

/// Project lifecycle status as stored
///
/// The stored status is what operators set by hand. The status reported to
/// clients is derived: see [`ProjectStatus::derived`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "project_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    /// Work is ongoing
    Active,

    /// Deliberately paused; never auto-completes
    OnHold,

    /// Marked finished by an operator, or derived when all tasks are done
    Completed,
}

impl ProjectStatus {
    /// String form matching the `project_status` enum in the database
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Active => "active",
            ProjectStatus::OnHold => "on_hold",
            ProjectStatus::Completed => "completed",
        }
    }

    /// Status reported to clients, derived from task completion
    ///
    /// An `Active` project with at least one live task, all of them done,
    /// reports `Completed`. `OnHold` stays put regardless of task state,
    /// and an explicitly `Completed` project stays completed.
    pub fn derived(self, progress: &ProjectProgress) -> ProjectStatus {
        if self == ProjectStatus::Active && progress.is_complete() {
            ProjectStatus::Completed
        } else {
            self
        }
    }
}

/// Completion summary over a project's live (non-deleted) tasks
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectProgress {
    /// Live tasks in the project
    pub total_tasks: i64,

    /// Live tasks with status `done`
    pub done_tasks: i64,
}

impl ProjectProgress {
    /// Fraction of live tasks completed, 0.0 for a project with no tasks
    pub fn fraction(&self) -> f64 {
        if self.total_tasks == 0 {
            0.0
        } else {
            self.done_tasks as f64 / self.total_tasks as f64
        }
    }

    /// True when the project has tasks and every one of them is done
    pub fn is_complete(&self) -> bool {
        self.total_tasks > 0 && self.done_tasks == self.total_tasks
    }
}

/// Project model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Project {
    /// Unique project ID
    pub id: Uuid,

    /// Project name
    pub name: String,

    /// Optional longer description
    pub description: Option<String>,

    /// User who owns the project; managers may only mutate projects they own
    pub owner_user_id: Uuid,

    /// Stored lifecycle status
    pub status: ProjectStatus,

    /// When the project was created
    pub created_at: DateTime<Utc>,

    /// When the project was last updated
    pub updated_at: DateTime<Utc>,

    /// Set when the project was soft-deleted
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Input for creating a project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProject {
    /// Project name
    pub name: String,

    /// Optional description
    pub description: Option<String>,

    /// Owning user
    pub owner_user_id: Uuid,
}

/// Input for updating a project
///
/// `None` leaves a field unchanged; `description` takes `Some(None)` to
/// clear the value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProject {
    /// New name
    pub name: Option<String>,

    /// New description (`Some(None)` clears it)
    pub description: Option<Option<String>>,

    /// New stored status
    pub status: Option<ProjectStatus>,

    /// Transfer ownership to another user
    pub owner_user_id: Option<Uuid>,
}

/// One row of the project report, joined with owner and task counts
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProjectReportRow {
    /// Project ID
    pub id: Uuid,

    /// Project name
    pub name: String,

    /// Username of the owning user
    pub owner_username: String,

    /// Stored lifecycle status
    pub status: ProjectStatus,

    /// Live tasks in the project
    pub total_tasks: i64,

    /// Live tasks with status `done`
    pub done_tasks: i64,
}

impl ProjectReportRow {
    /// Completion summary for this row
    pub fn progress(&self) -> ProjectProgress {
        ProjectProgress {
            total_tasks: self.total_tasks,
            done_tasks: self.done_tasks,
        }
    }
}

impl Project {
    /// Returns true when the project has been soft-deleted
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Creates a new project in `active` status
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails, including a foreign
    /// key violation when the owner does not exist.
    pub async fn create(
        executor: impl PgExecutor<'_>,
        data: CreateProject,
    ) -> Result<Self, sqlx::Error> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            INSERT INTO projects (name, description, owner_user_id)
            VALUES ($1, $2, $3)
            RETURNING id, name, description, owner_user_id, status,
                      created_at, updated_at, deleted_at
            "#,
        )
        .bind(data.name)
        .bind(data.description)
        .bind(data.owner_user_id)
        .fetch_one(executor)
        .await?;

        Ok(project)
    }

    /// Finds a project by ID, including soft-deleted rows
    ///
    /// Callers that must not see deleted projects check `is_deleted` on the
    /// result; history readers (audit, exports) want the row either way.
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            SELECT id, name, description, owner_user_id, status,
                   created_at, updated_at, deleted_at
            FROM projects
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(project)
    }

    /// Updates a live project's fields
    ///
    /// # Returns
    ///
    /// The updated project, or `None` if the project does not exist or has
    /// been soft-deleted.
    pub async fn update(
        executor: impl PgExecutor<'_>,
        id: Uuid,
        data: UpdateProject,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut query = String::from("UPDATE projects SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.name.is_some() {
            bind_count += 1;
            query.push_str(&format!(", name = ${}", bind_count));
        }
        if data.description.is_some() {
            bind_count += 1;
            query.push_str(&format!(", description = ${}", bind_count));
        }
        if data.status.is_some() {
            bind_count += 1;
            query.push_str(&format!(", status = ${}", bind_count));
        }
        if data.owner_user_id.is_some() {
            bind_count += 1;
            query.push_str(&format!(", owner_user_id = ${}", bind_count));
        }

        query.push_str(
            " WHERE id = $1 AND deleted_at IS NULL \
             RETURNING id, name, description, owner_user_id, status, \
             created_at, updated_at, deleted_at",
        );

        let mut q = sqlx::query_as::<_, Project>(&query).bind(id);

        if let Some(name) = data.name {
            q = q.bind(name);
        }
        if let Some(description) = data.description {
            q = q.bind(description);
        }
        if let Some(status) = data.status {
            q = q.bind(status);
        }
        if let Some(owner_user_id) = data.owner_user_id {
            q = q.bind(owner_user_id);
        }

        let project = q.fetch_optional(executor).await?;

        Ok(project)
    }

    /// Soft-deletes a live project
    ///
    /// # Returns
    ///
    /// The deleted project, or `None` if the project does not exist or was
    /// already deleted. Deleting twice is not idempotent at this layer so
    /// the service can report the second attempt as not found.
    pub async fn soft_delete(
        executor: impl PgExecutor<'_>,
        id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            UPDATE projects
            SET deleted_at = NOW(),
                updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING id, name, description, owner_user_id, status,
                      created_at, updated_at, deleted_at
            "#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;

        Ok(project)
    }

    /// Lists live projects with pagination, newest first
    pub async fn list(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<Self>, sqlx::Error> {
        let projects = sqlx::query_as::<_, Project>(
            r#"
            SELECT id, name, description, owner_user_id, status,
                   created_at, updated_at, deleted_at
            FROM projects
            WHERE deleted_at IS NULL
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        Ok(projects)
    }

    /// Counts live projects
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM projects WHERE deleted_at IS NULL")
                .fetch_one(pool)
                .await?;

        Ok(count)
    }

    /// Builds the project report: every live project with its owner's
    /// username and live task counts, newest project first
    pub async fn report_rows(pool: &PgPool) -> Result<Vec<ProjectReportRow>, sqlx::Error> {
        let rows = sqlx::query_as::<_, ProjectReportRow>(
            r#"
            SELECT p.id, p.name, u.username AS owner_username, p.status,
                   COUNT(t.id) AS total_tasks,
                   COUNT(t.id) FILTER (WHERE t.status = 'done') AS done_tasks
            FROM projects p
            JOIN users u ON u.id = p.owner_user_id
            LEFT JOIN tasks t ON t.project_id = p.id AND t.deleted_at IS NULL
            WHERE p.deleted_at IS NULL
            GROUP BY p.id, p.name, u.username, p.status, p.created_at
            ORDER BY p.created_at DESC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_status_as_str() {
        assert_eq!(ProjectStatus::Active.as_str(), "active");
        assert_eq!(ProjectStatus::OnHold.as_str(), "on_hold");
        assert_eq!(ProjectStatus::Completed.as_str(), "completed");
    }

    #[test]
    fn test_progress_fraction_empty_project() {
        let progress = ProjectProgress {
            total_tasks: 0,
            done_tasks: 0,
        };
        assert_eq!(progress.fraction(), 0.0);
        assert!(!progress.is_complete());
    }

    #[test]
    fn test_progress_fraction_partial() {
        let progress = ProjectProgress {
            total_tasks: 4,
            done_tasks: 2,
        };
        assert_eq!(progress.fraction(), 0.5);
        assert!(!progress.is_complete());
    }

    #[test]
    fn test_progress_fraction_all_done() {
        let progress = ProjectProgress {
            total_tasks: 3,
            done_tasks: 3,
        };
        assert_eq!(progress.fraction(), 1.0);
        assert!(progress.is_complete());
    }

    #[test]
    fn test_derived_status_elevates_active_to_completed() {
        let all_done = ProjectProgress {
            total_tasks: 2,
            done_tasks: 2,
        };
        assert_eq!(
            ProjectStatus::Active.derived(&all_done),
            ProjectStatus::Completed
        );
    }

    #[test]
    fn test_derived_status_leaves_active_with_open_tasks() {
        let in_progress = ProjectProgress {
            total_tasks: 2,
            done_tasks: 1,
        };
        assert_eq!(
            ProjectStatus::Active.derived(&in_progress),
            ProjectStatus::Active
        );
    }

    #[test]
    fn test_derived_status_empty_project_stays_active() {
        let empty = ProjectProgress {
            total_tasks: 0,
            done_tasks: 0,
        };
        assert_eq!(ProjectStatus::Active.derived(&empty), ProjectStatus::Active);
    }

    #[test]
    fn test_derived_status_on_hold_never_completes() {
        let all_done = ProjectProgress {
            total_tasks: 5,
            done_tasks: 5,
        };
        assert_eq!(
            ProjectStatus::OnHold.derived(&all_done),
            ProjectStatus::OnHold
        );
    }

    #[test]
    fn test_report_row_progress() {
        let row = ProjectReportRow {
            id: Uuid::new_v4(),
            name: "Report".to_string(),
            owner_username: "owner".to_string(),
            status: ProjectStatus::Active,
            total_tasks: 10,
            done_tasks: 7,
        };
        assert_eq!(row.progress().fraction(), 0.7);
    }
}

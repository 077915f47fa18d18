/// Task service
///
/// The busiest service in the system. Task mutations are limited to admins
/// and to managers acting on their own projects; every write commits together
/// with its audit entry. Deletion is a soft delete: the row stays, listings
/// skip it, progress forgets it.

use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::error::{ServiceError, ServiceResult};
use crate::models::audit::{AppendAudit, AuditAction, AuditEntity, AuditRecord};
use crate::models::task::{CreateTask, Task, TaskFilter, UpdateTask};
use crate::models::user::User;
use crate::models::project::Project;
use crate::rbac::{self, Operation};
use crate::services::{created_details, deleted_details, load_live_project, ChangeSet};

/// Longest accepted task title
const MAX_TITLE_LENGTH: usize = 255;

#[derive(Debug, Clone)]
pub struct TaskService {
    db: PgPool,
}

impl TaskService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Creates a task in `todo` status
    ///
    /// The target project must be live, the actor must be an admin or the
    /// project's owning manager, and a named assignee must exist.
    ///
    /// # Errors
    ///
    /// - `Authorization` for role or project scope violations
    /// - `Validation` for an empty or oversized title
    /// - `NotFound` when the project is absent/deleted or the assignee is
    ///   unknown
    pub async fn create(&self, actor: &User, data: CreateTask) -> ServiceResult<Task> {
        rbac::authorize(actor, Operation::CreateTask)?;
        validate_title(&data.title)?;

        let project = load_live_project(&self.db, data.project_id).await?;
        rbac::authorize_project_scope(actor, Operation::CreateTask, &project)?;

        if let Some(assignee) = data.assigned_to_user_id {
            if User::find_by_id(&self.db, assignee).await?.is_none() {
                return Err(ServiceError::not_found("user", assignee));
            }
        }

        let mut tx = self.db.begin().await?;
        let task = Task::create(&mut *tx, data).await?;
        AuditRecord::append(
            &mut *tx,
            AppendAudit {
                entity_type: AuditEntity::Task,
                entity_id: task.id,
                action: AuditAction::Create,
                actor_user_id: actor.id,
                details: created_details(serde_json::json!({
                    "project_id": task.project_id,
                    "title": &task.title,
                    "priority": task.priority,
                    "assigned_to_user_id": task.assigned_to_user_id,
                    "due_date": task.due_date,
                })),
            },
        )
        .await?;
        tx.commit().await?;

        info!(
            task_id = %task.id,
            project_id = %task.project_id,
            actor_id = %actor.id,
            "Task created"
        );
        Ok(task)
    }

    /// Updates a live task's fields
    ///
    /// The audit entry records before/after values for exactly the fields
    /// that changed.
    ///
    /// # Errors
    ///
    /// - `NotFound` when the task is absent or soft-deleted, its project is
    ///   deleted, or a new assignee is unknown
    /// - `Authorization` for role or project scope violations
    /// - `Validation` for a bad title
    pub async fn update(&self, actor: &User, id: Uuid, data: UpdateTask) -> ServiceResult<Task> {
        rbac::authorize(actor, Operation::UpdateTask)?;
        if let Some(title) = &data.title {
            validate_title(title)?;
        }

        let old = self.load_live_task(id).await?;
        let project = load_live_project(&self.db, old.project_id).await?;
        rbac::authorize_project_scope(actor, Operation::UpdateTask, &project)?;

        if let Some(Some(assignee)) = data.assigned_to_user_id {
            if User::find_by_id(&self.db, assignee).await?.is_none() {
                return Err(ServiceError::not_found("user", assignee));
            }
        }

        let mut tx = self.db.begin().await?;
        let updated = Task::update(&mut *tx, id, data)
            .await?
            .ok_or_else(|| ServiceError::not_found("task", id))?;

        let mut changes = ChangeSet::new();
        changes.record("title", &old.title, &updated.title);
        changes.record("description", &old.description, &updated.description);
        changes.record(
            "assigned_to_user_id",
            &old.assigned_to_user_id,
            &updated.assigned_to_user_id,
        );
        changes.record("status", &old.status, &updated.status);
        changes.record("priority", &old.priority, &updated.priority);
        changes.record("due_date", &old.due_date, &updated.due_date);

        AuditRecord::append(
            &mut *tx,
            AppendAudit {
                entity_type: AuditEntity::Task,
                entity_id: updated.id,
                action: AuditAction::Update,
                actor_user_id: actor.id,
                details: changes.into_details(),
            },
        )
        .await?;
        tx.commit().await?;

        info!(task_id = %updated.id, actor_id = %actor.id, "Task updated");
        Ok(updated)
    }

    /// Soft-deletes a live task
    ///
    /// The task drops out of listings and progress immediately but remains
    /// fetchable by ID. Deleting twice reports `NotFound`.
    pub async fn delete(&self, actor: &User, id: Uuid) -> ServiceResult<Task> {
        rbac::authorize(actor, Operation::DeleteTask)?;

        let old = self.load_live_task(id).await?;
        let project = load_live_project(&self.db, old.project_id).await?;
        rbac::authorize_project_scope(actor, Operation::DeleteTask, &project)?;

        let mut tx = self.db.begin().await?;
        let deleted = Task::soft_delete(&mut *tx, id)
            .await?
            .ok_or_else(|| ServiceError::not_found("task", id))?;

        AuditRecord::append(
            &mut *tx,
            AppendAudit {
                entity_type: AuditEntity::Task,
                entity_id: deleted.id,
                action: AuditAction::Delete,
                actor_user_id: actor.id,
                details: deleted_details(serde_json::json!({
                    "project_id": deleted.project_id,
                    "title": &deleted.title,
                    "status": deleted.status,
                })),
            },
        )
        .await?;
        tx.commit().await?;

        info!(task_id = %deleted.id, actor_id = %actor.id, "Task deleted");
        Ok(deleted)
    }

    /// Fetches one task by ID, soft-deleted rows included
    pub async fn get(&self, id: Uuid) -> ServiceResult<Task> {
        Task::find_by_id(&self.db, id)
            .await?
            .ok_or_else(|| ServiceError::not_found("task", id))
    }

    /// Lists a project's live tasks with filters
    ///
    /// The project must exist; a soft-deleted project still lists (its tasks
    /// are history, and history stays readable).
    pub async fn list_by_project(
        &self,
        project_id: Uuid,
        filter: &TaskFilter,
    ) -> ServiceResult<Vec<Task>> {
        if Project::find_by_id(&self.db, project_id).await?.is_none() {
            return Err(ServiceError::not_found("project", project_id));
        }
        Ok(Task::list_by_project(&self.db, project_id, filter).await?)
    }

    async fn load_live_task(&self, id: Uuid) -> ServiceResult<Task> {
        let task = Task::find_by_id(&self.db, id)
            .await?
            .ok_or_else(|| ServiceError::not_found("task", id))?;
        if task.is_deleted() {
            return Err(ServiceError::not_found("task", id));
        }
        Ok(task)
    }
}

fn validate_title(title: &str) -> ServiceResult<()> {
    if title.trim().is_empty() {
        return Err(ServiceError::validation(
            "title",
            "must not be empty or whitespace",
        ));
    }
    if title.len() > MAX_TITLE_LENGTH {
        return Err(ServiceError::validation(
            "title",
            format!("must be at most {} characters", MAX_TITLE_LENGTH),
        ));
    }
    Ok(())
}

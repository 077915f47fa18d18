/// Project service
///
/// Projects are created by admins and managers. Managers may only update
/// projects they own; deletion (a soft delete) is admin territory. Progress
/// is computed from live tasks on demand and never stored, so it cannot go
/// stale.

use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::error::{ServiceError, ServiceResult};
use crate::models::audit::{AppendAudit, AuditAction, AuditEntity, AuditRecord};
use crate::models::project::{
    CreateProject, Project, ProjectProgress, ProjectReportRow, UpdateProject,
};
use crate::models::task::Task;
use crate::models::user::User;
use crate::rbac::{self, Operation};
use crate::services::{created_details, deleted_details, load_live_project, ChangeSet};

/// Longest accepted project name
const MAX_NAME_LENGTH: usize = 255;

#[derive(Debug, Clone)]
pub struct ProjectService {
    db: PgPool,
}

impl ProjectService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Creates a project. Admins and managers only.
    ///
    /// A manager always becomes the owner of what they create; only admins
    /// may create a project owned by someone else.
    ///
    /// # Errors
    ///
    /// - `Authorization` for actors without the manager or admin role, or a
    ///   non-admin naming another owner
    /// - `Validation` for an empty or oversized name
    /// - `NotFound` when the named owner does not exist
    pub async fn create(&self, actor: &User, data: CreateProject) -> ServiceResult<Project> {
        rbac::authorize(actor, Operation::CreateProject)?;
        validate_name(&data.name)?;
        if data.owner_user_id != actor.id && !actor.is_admin() {
            return Err(ServiceError::Authorization(
                "only admins may create projects owned by another user".to_string(),
            ));
        }
        if User::find_by_id(&self.db, data.owner_user_id).await?.is_none() {
            return Err(ServiceError::not_found("user", data.owner_user_id));
        }

        let mut tx = self.db.begin().await?;
        let project = Project::create(&mut *tx, data).await?;
        AuditRecord::append(
            &mut *tx,
            AppendAudit {
                entity_type: AuditEntity::Project,
                entity_id: project.id,
                action: AuditAction::Create,
                actor_user_id: actor.id,
                details: created_details(serde_json::json!({
                    "name": &project.name,
                    "owner_user_id": project.owner_user_id,
                    "status": project.status,
                })),
            },
        )
        .await?;
        tx.commit().await?;

        info!(
            project_id = %project.id,
            name = %project.name,
            actor_id = %actor.id,
            "Project created"
        );
        Ok(project)
    }

    /// Updates a live project's name, description, status, or owner
    ///
    /// Ownership transfer is admin-only; everything else follows the usual
    /// scope rule (admin, or the owning manager).
    ///
    /// # Errors
    ///
    /// - `NotFound` when the project is absent or soft-deleted, or a new
    ///   owner does not exist
    /// - `Authorization` for scope or transfer violations
    /// - `Validation` for a bad name
    pub async fn update(
        &self,
        actor: &User,
        id: Uuid,
        data: UpdateProject,
    ) -> ServiceResult<Project> {
        rbac::authorize(actor, Operation::UpdateProject)?;
        if let Some(name) = &data.name {
            validate_name(name)?;
        }

        let old = load_live_project(&self.db, id).await?;
        rbac::authorize_project_scope(actor, Operation::UpdateProject, &old)?;

        if let Some(new_owner) = data.owner_user_id {
            if new_owner != old.owner_user_id {
                if !actor.is_admin() {
                    return Err(ServiceError::Authorization(
                        "only admins may transfer project ownership".to_string(),
                    ));
                }
                if User::find_by_id(&self.db, new_owner).await?.is_none() {
                    return Err(ServiceError::not_found("user", new_owner));
                }
            }
        }

        let mut tx = self.db.begin().await?;
        let updated = Project::update(&mut *tx, id, data)
            .await?
            .ok_or_else(|| ServiceError::not_found("project", id))?;

        let mut changes = ChangeSet::new();
        changes.record("name", &old.name, &updated.name);
        changes.record("description", &old.description, &updated.description);
        changes.record("status", &old.status, &updated.status);
        changes.record("owner_user_id", &old.owner_user_id, &updated.owner_user_id);

        AuditRecord::append(
            &mut *tx,
            AppendAudit {
                entity_type: AuditEntity::Project,
                entity_id: updated.id,
                action: AuditAction::Update,
                actor_user_id: actor.id,
                details: changes.into_details(),
            },
        )
        .await?;
        tx.commit().await?;

        info!(project_id = %updated.id, actor_id = %actor.id, "Project updated");
        Ok(updated)
    }

    /// Soft-deletes a project. Admin only.
    ///
    /// The project disappears from listings; its tasks are untouched and
    /// stay fetchable by ID. Deleting an already-deleted project reports
    /// `NotFound`.
    pub async fn delete(&self, actor: &User, id: Uuid) -> ServiceResult<Project> {
        rbac::authorize(actor, Operation::DeleteProject)?;

        let mut tx = self.db.begin().await?;
        let deleted = Project::soft_delete(&mut *tx, id)
            .await?
            .ok_or_else(|| ServiceError::not_found("project", id))?;

        AuditRecord::append(
            &mut *tx,
            AppendAudit {
                entity_type: AuditEntity::Project,
                entity_id: deleted.id,
                action: AuditAction::Delete,
                actor_user_id: actor.id,
                details: deleted_details(serde_json::json!({
                    "name": &deleted.name,
                    "owner_user_id": deleted.owner_user_id,
                    "status": deleted.status,
                })),
            },
        )
        .await?;
        tx.commit().await?;

        info!(project_id = %deleted.id, actor_id = %actor.id, "Project deleted");
        Ok(deleted)
    }

    /// Fetches one project by ID, soft-deleted rows included
    ///
    /// Callers can tell from `deleted_at` whether they are looking at
    /// history.
    pub async fn get(&self, id: Uuid) -> ServiceResult<Project> {
        Project::find_by_id(&self.db, id)
            .await?
            .ok_or_else(|| ServiceError::not_found("project", id))
    }

    /// Lists live projects, newest first
    pub async fn list(&self, limit: i64, offset: i64) -> ServiceResult<Vec<Project>> {
        Ok(Project::list(&self.db, limit, offset).await?)
    }

    /// Computes a project's completion from its live tasks
    ///
    /// Soft-deleted tasks never count. Works for soft-deleted projects too;
    /// the numbers describe what the project looked like when it was
    /// retired.
    pub async fn progress(&self, id: Uuid) -> ServiceResult<ProjectProgress> {
        if Project::find_by_id(&self.db, id).await?.is_none() {
            return Err(ServiceError::not_found("project", id));
        }
        Ok(Task::progress_counts(&self.db, id).await?)
    }

    /// Builds the report rows backing the CSV export
    pub async fn report(&self) -> ServiceResult<Vec<ProjectReportRow>> {
        Ok(Project::report_rows(&self.db).await?)
    }
}

fn validate_name(name: &str) -> ServiceResult<()> {
    if name.trim().is_empty() {
        return Err(ServiceError::validation(
            "name",
            "must not be empty or whitespace",
        ));
    }
    if name.len() > MAX_NAME_LENGTH {
        return Err(ServiceError::validation(
            "name",
            format!("must be at most {} characters", MAX_NAME_LENGTH),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name() {
        assert!(validate_name("").is_err());
        assert!(validate_name("  \t ").is_err());
        assert!(validate_name("Road Map").is_ok());
    }

    #[test]
    fn test_validate_name_length() {
        let long = "n".repeat(MAX_NAME_LENGTH + 1);
        assert!(validate_name(&long).is_err());
        let max = "n".repeat(MAX_NAME_LENGTH);
        assert!(validate_name(&max).is_ok());
    }
}

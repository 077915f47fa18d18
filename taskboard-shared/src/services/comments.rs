/// Comment service
///
/// Any resolved actor may comment; edits and deletions are narrowed to the
/// author (admins excepted). Comment deletion is physical, so the audit
/// entry keeps the removed body as its only remaining record.

use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::error::{ServiceError, ServiceResult};
use crate::models::audit::{AppendAudit, AuditAction, AuditEntity, AuditRecord};
use crate::models::comment::{Comment, CreateComment};
use crate::models::task::Task;
use crate::rbac::{self, Operation};
use crate::models::user::User;
use crate::services::{created_details, deleted_details, ChangeSet};

#[derive(Debug, Clone)]
pub struct CommentService {
    db: PgPool,
}

impl CommentService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Adds a comment to a live task, authored by the actor
    ///
    /// # Errors
    ///
    /// - `Validation` for an empty body
    /// - `NotFound` when the task is absent or soft-deleted
    pub async fn create(&self, actor: &User, task_id: Uuid, body: String) -> ServiceResult<Comment> {
        rbac::authorize(actor, Operation::CreateComment)?;
        validate_body(&body)?;

        let task = Task::find_by_id(&self.db, task_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("task", task_id))?;
        if task.is_deleted() {
            return Err(ServiceError::not_found("task", task_id));
        }

        let mut tx = self.db.begin().await?;
        let comment = Comment::create(
            &mut *tx,
            CreateComment {
                task_id,
                author_user_id: actor.id,
                body,
            },
        )
        .await?;
        AuditRecord::append(
            &mut *tx,
            AppendAudit {
                entity_type: AuditEntity::Comment,
                entity_id: comment.id,
                action: AuditAction::Create,
                actor_user_id: actor.id,
                details: created_details(serde_json::json!({
                    "task_id": comment.task_id,
                    "body": &comment.body,
                })),
            },
        )
        .await?;
        tx.commit().await?;

        info!(
            comment_id = %comment.id,
            task_id = %comment.task_id,
            actor_id = %actor.id,
            "Comment created"
        );
        Ok(comment)
    }

    /// Replaces a comment's body. Author or admin only.
    pub async fn update(&self, actor: &User, id: Uuid, body: String) -> ServiceResult<Comment> {
        rbac::authorize(actor, Operation::UpdateComment)?;
        validate_body(&body)?;

        let old = Comment::find_by_id(&self.db, id)
            .await?
            .ok_or_else(|| ServiceError::not_found("comment", id))?;
        rbac::authorize_author(actor, Operation::UpdateComment, old.author_user_id)?;

        let mut tx = self.db.begin().await?;
        let updated = Comment::update_body(&mut *tx, id, body)
            .await?
            .ok_or_else(|| ServiceError::not_found("comment", id))?;

        let mut changes = ChangeSet::new();
        changes.record("body", &old.body, &updated.body);

        AuditRecord::append(
            &mut *tx,
            AppendAudit {
                entity_type: AuditEntity::Comment,
                entity_id: updated.id,
                action: AuditAction::Update,
                actor_user_id: actor.id,
                details: changes.into_details(),
            },
        )
        .await?;
        tx.commit().await?;

        info!(comment_id = %updated.id, actor_id = %actor.id, "Comment updated");
        Ok(updated)
    }

    /// Physically deletes a comment. Author or admin only.
    ///
    /// Returns the removed comment; the audited snapshot is the last place
    /// its body survives.
    pub async fn delete(&self, actor: &User, id: Uuid) -> ServiceResult<Comment> {
        rbac::authorize(actor, Operation::DeleteComment)?;

        let old = Comment::find_by_id(&self.db, id)
            .await?
            .ok_or_else(|| ServiceError::not_found("comment", id))?;
        rbac::authorize_author(actor, Operation::DeleteComment, old.author_user_id)?;

        let mut tx = self.db.begin().await?;
        let removed = Comment::delete(&mut *tx, id).await?;
        if !removed {
            return Err(ServiceError::not_found("comment", id));
        }
        AuditRecord::append(
            &mut *tx,
            AppendAudit {
                entity_type: AuditEntity::Comment,
                entity_id: old.id,
                action: AuditAction::Delete,
                actor_user_id: actor.id,
                details: deleted_details(serde_json::json!({
                    "task_id": old.task_id,
                    "author_user_id": old.author_user_id,
                    "body": &old.body,
                })),
            },
        )
        .await?;
        tx.commit().await?;

        info!(comment_id = %old.id, actor_id = %actor.id, "Comment deleted");
        Ok(old)
    }

    /// Fetches one comment by ID
    pub async fn get(&self, id: Uuid) -> ServiceResult<Comment> {
        Comment::find_by_id(&self.db, id)
            .await?
            .ok_or_else(|| ServiceError::not_found("comment", id))
    }

    /// Lists a task's comments, oldest first
    ///
    /// The task must exist; comments under a soft-deleted task stay
    /// readable.
    pub async fn list_by_task(
        &self,
        task_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> ServiceResult<Vec<Comment>> {
        if Task::find_by_id(&self.db, task_id).await?.is_none() {
            return Err(ServiceError::not_found("task", task_id));
        }
        Ok(Comment::list_by_task(&self.db, task_id, limit, offset).await?)
    }
}

fn validate_body(body: &str) -> ServiceResult<()> {
    if body.trim().is_empty() {
        return Err(ServiceError::validation(
            "body",
            "must not be empty or whitespace",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_body() {
        assert!(validate_body("").is_err());
        assert!(validate_body(" \n ").is_err());
        assert!(validate_body("looks good to me").is_ok());
    }
}

/// Audit log model and database operations
///
/// The audit log is append-only: this module exposes insert and query, never
/// update or delete. Every create/update/delete on users, projects, tasks,
/// and comments appends one entry inside the same transaction as the change
/// itself, so the log and the data cannot drift apart.
///
/// The `details` column holds a JSON snapshot: created field values for
/// creates, per-field `{"from": .., "to": ..}` pairs for updates, and the
/// removed values for deletes.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE audit_entity AS ENUM ('user', 'project', 'task', 'comment');
/// CREATE TYPE audit_action AS ENUM ('create', 'update', 'delete');
///
/// CREATE TABLE audit_log (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     entity_type audit_entity NOT NULL,
///     entity_id UUID NOT NULL,
///     action audit_action NOT NULL,
///     actor_user_id UUID NOT NULL REFERENCES users(id),
///     details JSONB NOT NULL DEFAULT '{}',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

/// Kind of entity an audit entry refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "audit_entity", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AuditEntity {
    User,
    Project,
    Task,
    Comment,
}

impl AuditEntity {
    /// String form matching the `audit_entity` enum in the database
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditEntity::User => "user",
            AuditEntity::Project => "project",
            AuditEntity::Task => "task",
            AuditEntity::Comment => "comment",
        }
    }
}

/// Kind of change an audit entry records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "audit_action", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AuditAction {
    Create,
    Update,
    Delete,
}

impl AuditAction {
    /// String form matching the `audit_action` enum in the database
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::Create => "create",
            AuditAction::Update => "update",
            AuditAction::Delete => "delete",
        }
    }
}

/// One entry in the audit log
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct AuditRecord {
    /// Unique entry ID
    pub id: Uuid,

    /// Kind of entity that changed
    pub entity_type: AuditEntity,

    /// ID of the entity that changed
    pub entity_id: Uuid,

    /// What happened
    pub action: AuditAction,

    /// User who made the change
    pub actor_user_id: Uuid,

    /// JSON snapshot of the change
    pub details: JsonValue,

    /// When the change happened
    pub created_at: DateTime<Utc>,
}

/// Input for appending an audit entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppendAudit {
    /// Kind of entity that changed
    pub entity_type: AuditEntity,

    /// ID of the entity that changed
    pub entity_id: Uuid,

    /// What happened
    pub action: AuditAction,

    /// User who made the change
    pub actor_user_id: Uuid,

    /// JSON snapshot of the change
    pub details: JsonValue,
}

/// Filters for querying the audit log
///
/// Absent fields do not constrain the query.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuditFilter {
    /// Keep only entries about this kind of entity
    pub entity_type: Option<AuditEntity>,

    /// Keep only entries about this entity
    pub entity_id: Option<Uuid>,

    /// Keep only entries recording this action
    pub action: Option<AuditAction>,

    /// Keep only entries made by this actor
    pub actor_user_id: Option<Uuid>,

    /// Page size, defaults to 100
    pub limit: Option<i64>,

    /// Page offset, defaults to 0
    pub offset: Option<i64>,
}

impl AuditRecord {
    /// Appends an entry to the audit log
    ///
    /// Callers pass the transaction of the mutation being recorded, so the
    /// entry commits or rolls back together with the change.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn append(
        executor: impl PgExecutor<'_>,
        data: AppendAudit,
    ) -> Result<Self, sqlx::Error> {
        let record = sqlx::query_as::<_, AuditRecord>(
            r#"
            INSERT INTO audit_log (entity_type, entity_id, action, actor_user_id, details)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, entity_type, entity_id, action, actor_user_id, details, created_at
            "#,
        )
        .bind(data.entity_type)
        .bind(data.entity_id)
        .bind(data.action)
        .bind(data.actor_user_id)
        .bind(data.details)
        .fetch_one(executor)
        .await?;

        Ok(record)
    }

    /// Queries the audit log, newest entries first
    pub async fn list(pool: &PgPool, filter: &AuditFilter) -> Result<Vec<Self>, sqlx::Error> {
        let mut query = String::from(
            "SELECT id, entity_type, entity_id, action, actor_user_id, details, created_at \
             FROM audit_log WHERE 1 = 1",
        );
        let mut bind_count = 0;

        if filter.entity_type.is_some() {
            bind_count += 1;
            query.push_str(&format!(" AND entity_type = ${}", bind_count));
        }
        if filter.entity_id.is_some() {
            bind_count += 1;
            query.push_str(&format!(" AND entity_id = ${}", bind_count));
        }
        if filter.action.is_some() {
            bind_count += 1;
            query.push_str(&format!(" AND action = ${}", bind_count));
        }
        if filter.actor_user_id.is_some() {
            bind_count += 1;
            query.push_str(&format!(" AND actor_user_id = ${}", bind_count));
        }

        query.push_str(&format!(
            " ORDER BY created_at DESC LIMIT ${} OFFSET ${}",
            bind_count + 1,
            bind_count + 2
        ));

        let mut q = sqlx::query_as::<_, AuditRecord>(&query);

        if let Some(entity_type) = filter.entity_type {
            q = q.bind(entity_type);
        }
        if let Some(entity_id) = filter.entity_id {
            q = q.bind(entity_id);
        }
        if let Some(action) = filter.action {
            q = q.bind(action);
        }
        if let Some(actor_user_id) = filter.actor_user_id {
            q = q.bind(actor_user_id);
        }

        let records = q
            .bind(filter.limit.unwrap_or(100))
            .bind(filter.offset.unwrap_or(0))
            .fetch_all(pool)
            .await?;

        Ok(records)
    }

    /// Counts entries matching a filter (pagination totals)
    pub async fn count(pool: &PgPool, filter: &AuditFilter) -> Result<i64, sqlx::Error> {
        let mut query = String::from("SELECT COUNT(*) FROM audit_log WHERE 1 = 1");
        let mut bind_count = 0;

        if filter.entity_type.is_some() {
            bind_count += 1;
            query.push_str(&format!(" AND entity_type = ${}", bind_count));
        }
        if filter.entity_id.is_some() {
            bind_count += 1;
            query.push_str(&format!(" AND entity_id = ${}", bind_count));
        }
        if filter.action.is_some() {
            bind_count += 1;
            query.push_str(&format!(" AND action = ${}", bind_count));
        }
        if filter.actor_user_id.is_some() {
            bind_count += 1;
            query.push_str(&format!(" AND actor_user_id = ${}", bind_count));
        }

        let mut q = sqlx::query_as::<_, (i64,)>(&query);

        if let Some(entity_type) = filter.entity_type {
            q = q.bind(entity_type);
        }
        if let Some(entity_id) = filter.entity_id {
            q = q.bind(entity_id);
        }
        if let Some(action) = filter.action {
            q = q.bind(action);
        }
        if let Some(actor_user_id) = filter.actor_user_id {
            q = q.bind(actor_user_id);
        }

        let (count,) = q.fetch_one(pool).await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audit_entity_as_str() {
        assert_eq!(AuditEntity::User.as_str(), "user");
        assert_eq!(AuditEntity::Project.as_str(), "project");
        assert_eq!(AuditEntity::Task.as_str(), "task");
        assert_eq!(AuditEntity::Comment.as_str(), "comment");
    }

    #[test]
    fn test_audit_action_as_str() {
        assert_eq!(AuditAction::Create.as_str(), "create");
        assert_eq!(AuditAction::Update.as_str(), "update");
        assert_eq!(AuditAction::Delete.as_str(), "delete");
    }

    #[test]
    fn test_audit_filter_default_is_unconstrained() {
        let filter = AuditFilter::default();
        assert!(filter.entity_type.is_none());
        assert!(filter.entity_id.is_none());
        assert!(filter.action.is_none());
        assert!(filter.actor_user_id.is_none());
    }
}

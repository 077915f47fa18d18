/// Service layer
///
/// Services are where operations become safe: each one checks the actor's
/// roles against the policy table, validates input, loads the rows the
/// operation touches, and then runs the mutation and its audit entry in a
/// single transaction. Models stay dumb; routes stay thin.
///
/// # Services
///
/// - `users`: account administration (admin only)
/// - `projects`: project CRUD, soft delete, progress, report rows
/// - `tasks`: task CRUD, soft delete, filtered listings
/// - `comments`: comment CRUD with author narrowing
/// - `audit`: audit log queries (admin only)

use serde::Serialize;
use serde_json::{json, Map, Value as JsonValue};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{ServiceError, ServiceResult};
use crate::models::project::Project;

pub mod audit;
pub mod comments;
pub mod projects;
pub mod tasks;
pub mod users;

/// Wraps a snapshot of created field values for an audit `create` entry
pub(crate) fn created_details(snapshot: JsonValue) -> JsonValue {
    json!({ "created": snapshot })
}

/// Wraps a snapshot of removed field values for an audit `delete` entry
pub(crate) fn deleted_details(snapshot: JsonValue) -> JsonValue {
    json!({ "deleted": snapshot })
}

/// Collects per-field before/after pairs for an audit `update` entry
///
/// Only fields whose values actually differ are recorded, so the entry
/// documents the effective change rather than the request payload.
#[derive(Debug, Default)]
pub(crate) struct ChangeSet {
    changes: Map<String, JsonValue>,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a field when old and new values differ
    pub fn record<T: Serialize + PartialEq>(&mut self, field: &str, from: &T, to: &T) {
        if from != to {
            self.changes
                .insert(field.to_string(), json!({ "from": from, "to": to }));
        }
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Finishes the set into the `details` payload
    pub fn into_details(self) -> JsonValue {
        json!({ "changed": JsonValue::Object(self.changes) })
    }
}

/// Loads a project that must exist and not be soft-deleted
///
/// Mutations against tasks go through here: creating or editing a task under
/// a deleted (or never-existing) project reports the project as not found.
pub(crate) async fn load_live_project(pool: &PgPool, id: Uuid) -> ServiceResult<Project> {
    let project = Project::find_by_id(pool, id)
        .await?
        .ok_or_else(|| ServiceError::not_found("project", id))?;
    if project.is_deleted() {
        return Err(ServiceError::not_found("project", id));
    }
    Ok(project)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_changeset_records_only_differences() {
        let mut changes = ChangeSet::new();
        changes.record("title", &"old".to_string(), &"new".to_string());
        changes.record("priority", &"high".to_string(), &"high".to_string());

        assert!(!changes.is_empty());
        let details = changes.into_details();
        assert_eq!(details["changed"]["title"]["from"], "old");
        assert_eq!(details["changed"]["title"]["to"], "new");
        assert!(details["changed"].get("priority").is_none());
    }

    #[test]
    fn test_changeset_handles_option_fields() {
        let mut changes = ChangeSet::new();
        changes.record("description", &None::<String>, &Some("filled in".to_string()));

        let details = changes.into_details();
        assert_eq!(details["changed"]["description"]["from"], JsonValue::Null);
        assert_eq!(details["changed"]["description"]["to"], "filled in");
    }

    #[test]
    fn test_changeset_empty_when_nothing_changed() {
        let mut changes = ChangeSet::new();
        changes.record("status", &"todo".to_string(), &"todo".to_string());

        assert!(changes.is_empty());
        assert_eq!(changes.into_details(), json!({ "changed": {} }));
    }

    #[test]
    fn test_created_and_deleted_wrappers() {
        let created = created_details(json!({ "title": "a" }));
        assert_eq!(created["created"]["title"], "a");

        let deleted = deleted_details(json!({ "title": "b" }));
        assert_eq!(deleted["deleted"]["title"], "b");
    }
}

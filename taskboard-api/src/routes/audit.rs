/// Audit log endpoints
///
/// Read-only access to the append-only audit trail. Admin only. Entries
/// are written by the mutating services inside the same transaction as
/// the change they record, so there is nothing to write here.
///
/// # Endpoints
///
/// - `GET /v1/audit` - List audit entries, newest first (admin)

use crate::{app::AppState, error::ApiResult};
use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::Serialize;
use taskboard_shared::models::{
    audit::{AuditFilter, AuditRecord},
    user::User,
};

/// List audit entries response
#[derive(Debug, Serialize)]
pub struct ListAuditResponse {
    /// Matching entries, newest first
    pub entries: Vec<AuditRecord>,

    /// Total matching entries, ignoring pagination
    pub total: i64,
}

/// List audit entries
///
/// # Endpoint
///
/// ```text
/// GET /v1/audit?entity_type=task&action=update&limit=20
/// X-Actor-Id: <admin uuid>
/// ```
///
/// # Response
///
/// ```json
/// {
///   "entries": [
///     {
///       "id": "uuid",
///       "entity_type": "task",
///       "entity_id": "uuid",
///       "action": "update",
///       "actor_user_id": "uuid",
///       "details": { "changed": { "status": { "from": "todo", "to": "done" } } },
///       "created_at": "2025-01-03T12:00:00Z"
///     }
///   ],
///   "total": 1
/// }
/// ```
///
/// # Errors
///
/// - `403 Forbidden`: Actor is not an admin
pub async fn list_audit(
    State(state): State<AppState>,
    Extension(actor): Extension<User>,
    Query(filter): Query<AuditFilter>,
) -> ApiResult<Json<ListAuditResponse>> {
    let entries = state.audit.list(&actor, &filter).await?;
    let total = state.audit.count(&actor, &filter).await?;

    Ok(Json(ListAuditResponse { entries, total }))
}

/// Comment endpoints
///
/// Comments hang off tasks. Any role may comment; editing and deleting
/// are limited to the comment's author, with an admin override. Unlike
/// projects and tasks, deleting a comment removes the row; the audit
/// log keeps the final text.
///
/// # Endpoints
///
/// - `POST /v1/tasks/:id/comments` - Comment on a task
/// - `GET /v1/tasks/:id/comments` - List comments, oldest first
/// - `GET /v1/comments/:id` - Fetch a comment
/// - `PUT /v1/comments/:id` - Edit comment (author or admin)
/// - `DELETE /v1/comments/:id` - Delete comment (author or admin)

use crate::{app::AppState, error::ApiResult, routes::PaginationQuery};
use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use taskboard_shared::models::{comment::Comment, user::User};
use uuid::Uuid;
use validator::Validate;

/// Create or edit comment request
#[derive(Debug, Deserialize, Validate)]
pub struct CommentBodyRequest {
    /// Comment text
    #[validate(length(min = 1, max = 10000, message = "Body must be 1-10000 characters"))]
    pub body: String,
}

/// List comments response
#[derive(Debug, Serialize)]
pub struct ListCommentsResponse {
    /// Comments in conversation order (oldest first)
    pub comments: Vec<Comment>,
}

/// Comment on a task
///
/// The author is always the acting user.
///
/// # Endpoint
///
/// ```text
/// POST /v1/tasks/:id/comments
/// X-Actor-Id: <uuid>
/// Content-Type: application/json
///
/// { "body": "Blocked on the design review." }
/// ```
///
/// # Errors
///
/// - `404 Not Found`: Task missing or soft-deleted
/// - `422 Unprocessable Entity`: Empty body
pub async fn create_comment(
    State(state): State<AppState>,
    Extension(actor): Extension<User>,
    Path(task_id): Path<Uuid>,
    Json(req): Json<CommentBodyRequest>,
) -> ApiResult<Json<Comment>> {
    req.validate()?;

    let comment = state.comments.create(&actor, task_id, req.body).await?;

    Ok(Json(comment))
}

/// List comments on a task
pub async fn list_task_comments(
    State(state): State<AppState>,
    Extension(_actor): Extension<User>,
    Path(task_id): Path<Uuid>,
    Query(pagination): Query<PaginationQuery>,
) -> ApiResult<Json<ListCommentsResponse>> {
    let (limit, offset) = pagination.resolve(100);
    let comments = state.comments.list_by_task(task_id, limit, offset).await?;

    Ok(Json(ListCommentsResponse { comments }))
}

/// Fetch a comment
pub async fn get_comment(
    State(state): State<AppState>,
    Extension(_actor): Extension<User>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Comment>> {
    let comment = state.comments.get(id).await?;

    Ok(Json(comment))
}

/// Edit a comment
///
/// # Errors
///
/// - `403 Forbidden`: Actor did not write the comment and is not admin
/// - `404 Not Found`: No comment with that id
/// - `422 Unprocessable Entity`: Empty body
pub async fn update_comment(
    State(state): State<AppState>,
    Extension(actor): Extension<User>,
    Path(id): Path<Uuid>,
    Json(req): Json<CommentBodyRequest>,
) -> ApiResult<Json<Comment>> {
    req.validate()?;

    let comment = state.comments.update(&actor, id, req.body).await?;

    Ok(Json(comment))
}

/// Delete a comment
///
/// Returns the removed comment. The audit entry keeps its text.
///
/// # Errors
///
/// - `403 Forbidden`: Actor did not write the comment and is not admin
/// - `404 Not Found`: No comment with that id
pub async fn delete_comment(
    State(state): State<AppState>,
    Extension(actor): Extension<User>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Comment>> {
    let comment = state.comments.delete(&actor, id).await?;

    Ok(Json(comment))
}

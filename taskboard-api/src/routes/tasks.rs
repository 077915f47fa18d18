/// Task management endpoints
///
/// Tasks are created and listed under their project; single-task
/// operations live under `/v1/tasks`. Deletion is a soft delete.
///
/// # Endpoints
///
/// - `POST /v1/projects/:id/tasks` - Create task (admin, or owning manager)
/// - `GET /v1/projects/:id/tasks` - List tasks, filterable
/// - `GET /v1/tasks/:id` - Fetch a task (includes deleted)
/// - `PUT /v1/tasks/:id` - Update task (admin, or owning manager)
/// - `DELETE /v1/tasks/:id` - Soft-delete task (admin, or owning manager)

use crate::{app::AppState, error::ApiResult};
use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use taskboard_shared::models::{
    task::{CreateTask, Task, TaskFilter, TaskPriority, TaskStatus, UpdateTask},
    user::User,
};
use uuid::Uuid;
use validator::Validate;

/// Create task request
///
/// The project comes from the URL, not the body.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskRequest {
    /// Task title
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,

    /// Optional description
    pub description: Option<String>,

    /// Optional assignee
    pub assigned_to_user_id: Option<Uuid>,

    /// Priority, defaults to medium
    pub priority: Option<TaskPriority>,

    /// Optional deadline (ISO 8601)
    pub due_date: Option<DateTime<Utc>>,
}

/// Update task request
///
/// Absent fields are left unchanged. Unassigning or clearing the due
/// date is not exposed over the API.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTaskRequest {
    /// New title
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: Option<String>,

    /// New description
    pub description: Option<String>,

    /// New assignee
    pub assigned_to_user_id: Option<Uuid>,

    /// New status
    pub status: Option<TaskStatus>,

    /// New priority
    pub priority: Option<TaskPriority>,

    /// New deadline (ISO 8601)
    pub due_date: Option<DateTime<Utc>>,
}

/// List tasks response
#[derive(Debug, Serialize)]
pub struct ListTasksResponse {
    /// Matching live tasks, newest first
    pub tasks: Vec<Task>,
}

/// Create task in a project
///
/// # Endpoint
///
/// ```text
/// POST /v1/projects/:id/tasks
/// X-Actor-Id: <uuid>
/// Content-Type: application/json
///
/// {
///   "title": "Write release notes",
///   "assigned_to_user_id": "uuid",
///   "priority": "high",
///   "due_date": "2025-02-01T17:00:00Z"
/// }
/// ```
///
/// # Errors
///
/// - `403 Forbidden`: Actor is not admin and does not own the project
/// - `404 Not Found`: Project missing or soft-deleted, or assignee unknown
/// - `422 Unprocessable Entity`: Validation failed
pub async fn create_task(
    State(state): State<AppState>,
    Extension(actor): Extension<User>,
    Path(project_id): Path<Uuid>,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<Json<Task>> {
    req.validate()?;

    let task = state
        .tasks
        .create(
            &actor,
            CreateTask {
                project_id,
                title: req.title,
                description: req.description,
                assigned_to_user_id: req.assigned_to_user_id,
                priority: req.priority.unwrap_or_default(),
                due_date: req.due_date,
            },
        )
        .await?;

    Ok(Json(task))
}

/// List tasks of a project
///
/// Soft-deleted tasks never appear. The listing works against
/// soft-deleted projects so history stays readable.
///
/// # Endpoint
///
/// ```text
/// GET /v1/projects/:id/tasks?status=todo&priority=high&overdue=true&limit=20
/// X-Actor-Id: <uuid>
/// ```
pub async fn list_project_tasks(
    State(state): State<AppState>,
    Extension(_actor): Extension<User>,
    Path(project_id): Path<Uuid>,
    Query(filter): Query<TaskFilter>,
) -> ApiResult<Json<ListTasksResponse>> {
    let tasks = state.tasks.list_by_project(project_id, &filter).await?;

    Ok(Json(ListTasksResponse { tasks }))
}

/// Fetch a task
///
/// Soft-deleted tasks are returned too; check `deleted_at`.
///
/// # Errors
///
/// - `404 Not Found`: No task with that id
pub async fn get_task(
    State(state): State<AppState>,
    Extension(_actor): Extension<User>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Task>> {
    let task = state.tasks.get(id).await?;

    Ok(Json(task))
}

/// Update task
///
/// # Errors
///
/// - `403 Forbidden`: Actor is not admin and does not own the project
/// - `404 Not Found`: Task missing or soft-deleted, or assignee unknown
/// - `422 Unprocessable Entity`: Validation failed
pub async fn update_task(
    State(state): State<AppState>,
    Extension(actor): Extension<User>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateTaskRequest>,
) -> ApiResult<Json<Task>> {
    req.validate()?;

    let task = state
        .tasks
        .update(
            &actor,
            id,
            UpdateTask {
                title: req.title,
                description: req.description.map(Some),
                assigned_to_user_id: req.assigned_to_user_id.map(Some),
                status: req.status,
                priority: req.priority,
                due_date: req.due_date.map(Some),
            },
        )
        .await?;

    Ok(Json(task))
}

/// Soft-delete task
///
/// Returns the deleted task with `deleted_at` set. Comments under the
/// task stay readable.
///
/// # Errors
///
/// - `403 Forbidden`: Actor is not admin and does not own the project
/// - `404 Not Found`: No live task with that id
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(actor): Extension<User>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Task>> {
    let task = state.tasks.delete(&actor, id).await?;

    Ok(Json(task))
}

/// Project management endpoints
///
/// This module provides CRUD endpoints for projects plus a progress
/// endpoint that reports task completion counts. Deletion is a soft
/// delete; deleted projects stay readable by id but drop out of
/// listings.
///
/// # Endpoints
///
/// - `POST /v1/projects` - Create project (admin or manager)
/// - `GET /v1/projects` - List live projects
/// - `GET /v1/projects/:id` - Fetch a project (includes deleted)
/// - `PUT /v1/projects/:id` - Update project (admin, or owning manager)
/// - `DELETE /v1/projects/:id` - Soft-delete project (admin)
/// - `GET /v1/projects/:id/progress` - Task completion counts

use crate::{app::AppState, error::ApiResult, routes::PaginationQuery};
use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use taskboard_shared::models::{
    project::{CreateProject, Project, ProjectStatus, UpdateProject},
    user::User,
};
use uuid::Uuid;
use validator::Validate;

/// Create project request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateProjectRequest {
    /// Project name
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    /// Optional description
    pub description: Option<String>,

    /// Owning user; managers may only name themselves
    pub owner_user_id: Uuid,
}

/// Update project request
///
/// Absent fields are left unchanged. Clearing the description is not
/// exposed over the API. Only admins may transfer ownership.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProjectRequest {
    /// New name
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: Option<String>,

    /// New description
    pub description: Option<String>,

    /// New stored status
    pub status: Option<ProjectStatus>,

    /// Transfer ownership to this user (admin only)
    pub owner_user_id: Option<Uuid>,
}

/// List projects response
#[derive(Debug, Serialize)]
pub struct ListProjectsResponse {
    /// Live projects, newest first
    pub projects: Vec<Project>,
}

/// Project progress response
#[derive(Debug, Serialize)]
pub struct ProgressResponse {
    /// Live tasks in the project
    pub total_tasks: i64,

    /// Live tasks in status done
    pub done_tasks: i64,

    /// done / total, or 0.0 for an empty project
    pub progress: f64,
}

/// Create project
///
/// # Endpoint
///
/// ```text
/// POST /v1/projects
/// X-Actor-Id: <uuid>
/// Content-Type: application/json
///
/// {
///   "name": "Launch checklist",
///   "description": "Everything before the v2 launch",
///   "owner_user_id": "uuid"
/// }
/// ```
///
/// # Errors
///
/// - `403 Forbidden`: Actor lacks the role, or a manager named another owner
/// - `422 Unprocessable Entity`: Validation failed
pub async fn create_project(
    State(state): State<AppState>,
    Extension(actor): Extension<User>,
    Json(req): Json<CreateProjectRequest>,
) -> ApiResult<Json<Project>> {
    req.validate()?;

    let project = state
        .projects
        .create(
            &actor,
            CreateProject {
                name: req.name,
                description: req.description,
                owner_user_id: req.owner_user_id,
            },
        )
        .await?;

    Ok(Json(project))
}

/// List live projects
pub async fn list_projects(
    State(state): State<AppState>,
    Extension(_actor): Extension<User>,
    Query(pagination): Query<PaginationQuery>,
) -> ApiResult<Json<ListProjectsResponse>> {
    let (limit, offset) = pagination.resolve(50);
    let projects = state.projects.list(limit, offset).await?;

    Ok(Json(ListProjectsResponse { projects }))
}

/// Fetch a project
///
/// Soft-deleted projects are returned too; check `deleted_at`.
///
/// # Errors
///
/// - `404 Not Found`: No project with that id
pub async fn get_project(
    State(state): State<AppState>,
    Extension(_actor): Extension<User>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Project>> {
    let project = state.projects.get(id).await?;

    Ok(Json(project))
}

/// Update project
///
/// # Errors
///
/// - `403 Forbidden`: Actor is not admin and does not own the project
/// - `404 Not Found`: No live project with that id
/// - `422 Unprocessable Entity`: Validation failed
pub async fn update_project(
    State(state): State<AppState>,
    Extension(actor): Extension<User>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateProjectRequest>,
) -> ApiResult<Json<Project>> {
    req.validate()?;

    let project = state
        .projects
        .update(
            &actor,
            id,
            UpdateProject {
                name: req.name,
                description: req.description.map(Some),
                status: req.status,
                owner_user_id: req.owner_user_id,
            },
        )
        .await?;

    Ok(Json(project))
}

/// Soft-delete project
///
/// Returns the deleted project with `deleted_at` set. Tasks under the
/// project are not cascaded; they stay readable for history.
///
/// # Errors
///
/// - `403 Forbidden`: Actor is not an admin
/// - `404 Not Found`: No live project with that id
pub async fn delete_project(
    State(state): State<AppState>,
    Extension(actor): Extension<User>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Project>> {
    let project = state.projects.delete(&actor, id).await?;

    Ok(Json(project))
}

/// Task completion counts for a project
///
/// Counts only live tasks; soft-deleted tasks do not weigh in.
///
/// # Endpoint
///
/// ```text
/// GET /v1/projects/:id/progress
/// X-Actor-Id: <uuid>
/// ```
///
/// # Response
///
/// ```json
/// { "total_tasks": 4, "done_tasks": 2, "progress": 0.5 }
/// ```
pub async fn get_progress(
    State(state): State<AppState>,
    Extension(_actor): Extension<User>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ProgressResponse>> {
    let counts = state.projects.progress(id).await?;

    Ok(Json(ProgressResponse {
        total_tasks: counts.total_tasks,
        done_tasks: counts.done_tasks,
        progress: counts.fraction(),
    }))
}

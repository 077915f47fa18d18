/// User management endpoints
///
/// This module provides CRUD endpoints for users. Creating and updating
/// users is restricted to admins; the service layer enforces the role
/// checks against the resolved actor.
///
/// # Endpoints
///
/// - `POST /v1/users` - Create user (admin)
/// - `GET /v1/users` - List users
/// - `GET /v1/users/:id` - Fetch a single user
/// - `PUT /v1/users/:id` - Update user (admin)

use crate::{app::AppState, error::ApiResult, routes::PaginationQuery};
use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use taskboard_shared::{
    models::user::{CreateUser, UpdateUser, User},
    rbac::Role,
};
use uuid::Uuid;
use validator::Validate;

/// Create user request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    /// Unique username, at most 64 characters, no whitespace
    #[validate(length(min = 1, max = 64, message = "Username must be 1-64 characters"))]
    pub username: String,

    /// Unique email address
    #[validate(email(message = "Email must be a valid address"))]
    pub email: String,

    /// Optional display name
    pub display_name: Option<String>,

    /// Roles to grant; defaults to `["user"]`
    pub roles: Option<Vec<Role>>,
}

/// Update user request
///
/// Absent fields are left unchanged. The username is immutable and
/// clearing the display name is not exposed over the API.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    /// New email address
    #[validate(email(message = "Email must be a valid address"))]
    pub email: Option<String>,

    /// New display name
    pub display_name: Option<String>,

    /// Replacement role set
    pub roles: Option<Vec<Role>>,
}

/// List users response
#[derive(Debug, Serialize)]
pub struct ListUsersResponse {
    /// Users, newest first
    pub users: Vec<User>,
}

/// Create user
///
/// # Endpoint
///
/// ```text
/// POST /v1/users
/// X-Actor-Id: <admin uuid>
/// Content-Type: application/json
///
/// {
///   "username": "dana",
///   "email": "dana@example.com",
///   "display_name": "Dana",
///   "roles": ["manager"]
/// }
/// ```
///
/// # Errors
///
/// - `401 Unauthorized`: Missing or unknown actor
/// - `403 Forbidden`: Actor is not an admin
/// - `409 Conflict`: Username or email already taken
/// - `422 Unprocessable Entity`: Validation failed
pub async fn create_user(
    State(state): State<AppState>,
    Extension(actor): Extension<User>,
    Json(req): Json<CreateUserRequest>,
) -> ApiResult<Json<User>> {
    req.validate()?;

    let user = state
        .users
        .create(
            &actor,
            CreateUser {
                username: req.username,
                email: req.email,
                display_name: req.display_name,
                roles: req.roles.unwrap_or_else(|| vec![Role::User]),
            },
        )
        .await?;

    Ok(Json(user))
}

/// List users
///
/// # Endpoint
///
/// ```text
/// GET /v1/users?limit=50&offset=0
/// X-Actor-Id: <uuid>
/// ```
pub async fn list_users(
    State(state): State<AppState>,
    Extension(_actor): Extension<User>,
    Query(pagination): Query<PaginationQuery>,
) -> ApiResult<Json<ListUsersResponse>> {
    let (limit, offset) = pagination.resolve(50);
    let users = state.users.list(limit, offset).await?;

    Ok(Json(ListUsersResponse { users }))
}

/// Fetch a single user
///
/// # Errors
///
/// - `404 Not Found`: No user with that id
pub async fn get_user(
    State(state): State<AppState>,
    Extension(_actor): Extension<User>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<User>> {
    let user = state.users.get(id).await?;

    Ok(Json(user))
}

/// Update user
///
/// # Endpoint
///
/// ```text
/// PUT /v1/users/:id
/// X-Actor-Id: <admin uuid>
/// Content-Type: application/json
///
/// { "email": "new@example.com", "roles": ["manager", "user"] }
/// ```
///
/// # Errors
///
/// - `403 Forbidden`: Actor is not an admin
/// - `404 Not Found`: No user with that id
/// - `409 Conflict`: Email already taken
/// - `422 Unprocessable Entity`: Validation failed
pub async fn update_user(
    State(state): State<AppState>,
    Extension(actor): Extension<User>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateUserRequest>,
) -> ApiResult<Json<User>> {
    req.validate()?;

    let user = state
        .users
        .update(
            &actor,
            id,
            UpdateUser {
                email: req.email,
                display_name: req.display_name.map(Some),
                roles: req.roles,
            },
        )
        .await?;

    Ok(Json(user))
}

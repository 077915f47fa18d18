/// CSV export endpoints
///
/// Serves task listings and the cross-project report as downloadable
/// CSV instead of JSON. Encoding lives in `taskboard_shared::export`;
/// these handlers only wire the bytes to HTTP.
///
/// # Endpoints
///
/// - `GET /v1/projects/:id/tasks/export` - Task list as CSV
/// - `GET /v1/reports/projects` - Project report as CSV

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
    Extension,
};
use taskboard_shared::{
    export,
    models::{task::TaskFilter, user::User},
};
use uuid::Uuid;

fn csv_headers(filename: &str) -> [(header::HeaderName, String); 2] {
    [
        (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", filename),
        ),
    ]
}

/// Export a project's tasks as CSV
///
/// Takes the same filters as the JSON listing.
///
/// # Endpoint
///
/// ```text
/// GET /v1/projects/:id/tasks/export?status=todo&overdue=true
/// X-Actor-Id: <uuid>
/// ```
///
/// # Response
///
/// ```text
/// Content-Type: text/csv; charset=utf-8
/// Content-Disposition: attachment; filename="tasks-<project id>.csv"
///
/// id,project_id,title,status,priority,assigned_to_user_id,due_date,created_at,updated_at
/// ...
/// ```
pub async fn export_project_tasks(
    State(state): State<AppState>,
    Extension(_actor): Extension<User>,
    Path(project_id): Path<Uuid>,
    Query(filter): Query<TaskFilter>,
) -> ApiResult<impl IntoResponse> {
    let tasks = state.tasks.list_by_project(project_id, &filter).await?;

    let csv = export::tasks_to_csv(&tasks)
        .map_err(|e| ApiError::InternalError(format!("CSV encoding failed: {}", e)))?;

    let filename = format!("tasks-{}.csv", project_id);
    Ok((csv_headers(&filename), csv))
}

/// Export the cross-project report as CSV
///
/// One row per live project with owner, derived status, and task
/// completion counts.
///
/// # Endpoint
///
/// ```text
/// GET /v1/reports/projects
/// X-Actor-Id: <uuid>
/// ```
///
/// # Response
///
/// ```text
/// Content-Type: text/csv; charset=utf-8
/// Content-Disposition: attachment; filename="project-report.csv"
///
/// id,name,owner,status,total_tasks,done_tasks,progress
/// ...
/// ```
pub async fn export_project_report(
    State(state): State<AppState>,
    Extension(_actor): Extension<User>,
) -> ApiResult<impl IntoResponse> {
    let rows = state.projects.report().await?;

    let csv = export::project_report_to_csv(&rows)
        .map_err(|e| ApiError::InternalError(format!("CSV encoding failed: {}", e)))?;

    Ok((csv_headers("project-report.csv"), csv))
}

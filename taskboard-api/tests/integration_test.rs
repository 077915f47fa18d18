/// Integration tests for the Taskboard API
///
/// These tests verify the full system works end-to-end:
/// - Actor resolution from the X-Actor-Id header
/// - Role checks (admin, manager, user) and ownership narrowing
/// - Soft-delete visibility rules for projects and tasks
/// - Progress counts and the audit trail
/// - CSV exports
///
/// They require a running PostgreSQL database and share one schema, so
/// run them single-threaded:
/// cargo test --test integration_test -- --ignored --test-threads=1

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::TestContext;
use serde_json::json;
use taskboard_api::app::ACTOR_HEADER;
use taskboard_shared::models::task::Task;
use taskboard_shared::models::user::User;
use taskboard_shared::rbac::Role;
use tower::Service as _;
use uuid::Uuid;

/// Builds a JSON request with the given actor
fn json_request(method: &str, uri: &str, actor: &User, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(ACTOR_HEADER, actor.id.to_string())
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Builds a bodyless request with the given actor
fn bare_request(method: &str, uri: &str, actor: &User) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(ACTOR_HEADER, actor.id.to_string())
        .body(Body::empty())
        .unwrap()
}

/// Reads a response body as JSON
async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

/// Reads a response body as a string
async fn body_string(response: axum::response::Response) -> String {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(body.to_vec()).unwrap()
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL database"]
async fn test_health_check() {
    let ctx = TestContext::new().await.unwrap();

    let request = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["database"], "connected");

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL database"]
async fn test_actor_header_required() {
    let ctx = TestContext::new().await.unwrap();

    // Request without the actor header
    let request = Request::builder()
        .method("GET")
        .uri("/v1/projects")
        .body(Body::empty())
        .unwrap();

    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL database"]
async fn test_actor_header_must_be_uuid() {
    let ctx = TestContext::new().await.unwrap();

    let request = Request::builder()
        .method("GET")
        .uri("/v1/projects")
        .header(ACTOR_HEADER, "not-a-uuid")
        .body(Body::empty())
        .unwrap();

    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL database"]
async fn test_unknown_actor_rejected() {
    let ctx = TestContext::new().await.unwrap();

    let request = Request::builder()
        .method("GET")
        .uri("/v1/projects")
        .header(ACTOR_HEADER, Uuid::new_v4().to_string())
        .body(Body::empty())
        .unwrap();

    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL database"]
async fn test_user_creation_requires_admin() {
    let ctx = TestContext::new().await.unwrap();
    let plain = common::create_user(&ctx.db, "plain", vec![Role::User])
        .await
        .unwrap();

    let request = json_request(
        "POST",
        "/v1/users",
        &plain,
        json!({
            "username": format!("newbie-{}", Uuid::new_v4()),
            "email": format!("newbie-{}@example.com", Uuid::new_v4()),
        }),
    );

    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL database"]
async fn test_user_lifecycle() {
    let ctx = TestContext::new().await.unwrap();

    // Create a manager through the API
    let username = format!("mgr-{}", Uuid::new_v4());
    let request = json_request(
        "POST",
        "/v1/users",
        &ctx.admin,
        json!({
            "username": username,
            "email": format!("{}@example.com", username),
            "display_name": "Manager",
            "roles": ["manager"],
        }),
    );

    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let created = body_json(response).await;
    assert_eq!(created["username"], username.as_str());
    assert_eq!(created["roles"], json!(["manager"]));
    let user_id = created["id"].as_str().unwrap().to_string();

    // Update the display name
    let request = json_request(
        "PUT",
        &format!("/v1/users/{}", user_id),
        &ctx.admin,
        json!({ "display_name": "Senior Manager" }),
    );

    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let updated = body_json(response).await;
    assert_eq!(updated["display_name"], "Senior Manager");
    assert_eq!(updated["username"], username.as_str(), "username is immutable");

    // Fetch it back
    let request = bare_request("GET", &format!("/v1/users/{}", user_id), &ctx.admin);
    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Duplicate username conflicts
    let request = json_request(
        "POST",
        "/v1/users",
        &ctx.admin,
        json!({
            "username": username,
            "email": format!("other-{}@example.com", Uuid::new_v4()),
        }),
    );

    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL database"]
async fn test_project_lifecycle_with_soft_delete() {
    let ctx = TestContext::new().await.unwrap();

    // Create
    let request = json_request(
        "POST",
        "/v1/projects",
        &ctx.admin,
        json!({
            "name": "Launch checklist",
            "description": "Everything before launch",
            "owner_user_id": ctx.admin.id,
        }),
    );

    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let created = body_json(response).await;
    assert_eq!(created["name"], "Launch checklist");
    assert!(created["deleted_at"].is_null());
    let project_id = created["id"].as_str().unwrap().to_string();

    // Rename
    let request = json_request(
        "PUT",
        &format!("/v1/projects/{}", project_id),
        &ctx.admin,
        json!({ "name": "Launch checklist v2" }),
    );

    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    assert_eq!(updated["name"], "Launch checklist v2");

    // Shows up in the listing
    let request = bare_request("GET", "/v1/projects", &ctx.admin);
    let response = ctx.app.clone().call(request).await.unwrap();
    let listing = body_json(response).await;
    let ids: Vec<&str> = listing["projects"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_str().unwrap())
        .collect();
    assert!(ids.contains(&project_id.as_str()));

    // Soft delete
    let request = bare_request("DELETE", &format!("/v1/projects/{}", project_id), &ctx.admin);
    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let deleted = body_json(response).await;
    assert!(!deleted["deleted_at"].is_null());

    // Listing no longer includes it
    let request = bare_request("GET", "/v1/projects", &ctx.admin);
    let response = ctx.app.clone().call(request).await.unwrap();
    let listing = body_json(response).await;
    let ids: Vec<&str> = listing["projects"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_str().unwrap())
        .collect();
    assert!(!ids.contains(&project_id.as_str()));

    // Direct fetch still works, with the tombstone visible
    let request = bare_request("GET", &format!("/v1/projects/{}", project_id), &ctx.admin);
    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let fetched = body_json(response).await;
    assert!(!fetched["deleted_at"].is_null());

    // Deleting again is a 404
    let request = bare_request("DELETE", &format!("/v1/projects/{}", project_id), &ctx.admin);
    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL database"]
async fn test_manager_must_own_created_project() {
    let ctx = TestContext::new().await.unwrap();
    let manager = common::create_user(&ctx.db, "mgr", vec![Role::Manager])
        .await
        .unwrap();

    // Naming someone else as owner is rejected
    let request = json_request(
        "POST",
        "/v1/projects",
        &manager,
        json!({ "name": "Foreign-owned", "owner_user_id": ctx.admin.id }),
    );

    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Naming themselves works
    let request = json_request(
        "POST",
        "/v1/projects",
        &manager,
        json!({ "name": "Own project", "owner_user_id": manager.id }),
    );

    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL database"]
async fn test_manager_cannot_update_foreign_project() {
    let ctx = TestContext::new().await.unwrap();
    let owner = common::create_user(&ctx.db, "owner", vec![Role::Manager])
        .await
        .unwrap();
    let other = common::create_user(&ctx.db, "other", vec![Role::Manager])
        .await
        .unwrap();
    let project = common::create_project(&ctx.db, &owner, "Owned").await.unwrap();

    // A different manager may not touch it
    let request = json_request(
        "PUT",
        &format!("/v1/projects/{}", project.id),
        &other,
        json!({ "name": "Hijacked" }),
    );

    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // The owner may
    let request = json_request(
        "PUT",
        &format!("/v1/projects/{}", project.id),
        &owner,
        json!({ "name": "Renamed by owner" }),
    );

    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Ownership transfer is admin-only
    let request = json_request(
        "PUT",
        &format!("/v1/projects/{}", project.id),
        &owner,
        json!({ "owner_user_id": other.id }),
    );

    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL database"]
async fn test_project_delete_is_admin_only() {
    let ctx = TestContext::new().await.unwrap();
    let manager = common::create_user(&ctx.db, "mgr", vec![Role::Manager])
        .await
        .unwrap();
    let project = common::create_project(&ctx.db, &manager, "Mine").await.unwrap();

    // Even the owning manager cannot delete
    let request = bare_request("DELETE", &format!("/v1/projects/{}", project.id), &manager);
    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let request = bare_request("DELETE", &format!("/v1/projects/{}", project.id), &ctx.admin);
    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL database"]
async fn test_task_title_validation() {
    let ctx = TestContext::new().await.unwrap();
    let project = common::create_project(&ctx.db, &ctx.admin, "Validation")
        .await
        .unwrap();

    let request = json_request(
        "POST",
        &format!("/v1/projects/{}/tasks", project.id),
        &ctx.admin,
        json!({ "title": "" }),
    );

    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let json = body_json(response).await;
    assert!(json["details"].as_array().is_some_and(|d| !d.is_empty()));

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL database"]
async fn test_task_lifecycle_and_progress() {
    let ctx = TestContext::new().await.unwrap();
    let project = common::create_project(&ctx.db, &ctx.admin, "Progress")
        .await
        .unwrap();

    // Two tasks through the API
    let request = json_request(
        "POST",
        &format!("/v1/projects/{}/tasks", project.id),
        &ctx.admin,
        json!({ "title": "First", "priority": "high" }),
    );
    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let first = body_json(response).await;
    assert_eq!(first["status"], "todo");
    assert_eq!(first["priority"], "high");
    let first_id = first["id"].as_str().unwrap().to_string();

    let request = json_request(
        "POST",
        &format!("/v1/projects/{}/tasks", project.id),
        &ctx.admin,
        json!({ "title": "Second" }),
    );
    let response = ctx.app.clone().call(request).await.unwrap();
    let second = body_json(response).await;
    let second_id = second["id"].as_str().unwrap().to_string();

    // Finish the first
    let request = json_request(
        "PUT",
        &format!("/v1/tasks/{}", first_id),
        &ctx.admin,
        json!({ "status": "done" }),
    );
    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    assert_eq!(updated["status"], "done");

    // Progress counts both, one done
    let request = bare_request(
        "GET",
        &format!("/v1/projects/{}/progress", project.id),
        &ctx.admin,
    );
    let response = ctx.app.clone().call(request).await.unwrap();
    let progress = body_json(response).await;
    assert_eq!(progress["total_tasks"], 2);
    assert_eq!(progress["done_tasks"], 1);
    assert_eq!(progress["progress"], 0.5);

    // Soft-deleting the unfinished task takes it out of the counts
    let request = bare_request("DELETE", &format!("/v1/tasks/{}", second_id), &ctx.admin);
    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let request = bare_request(
        "GET",
        &format!("/v1/projects/{}/progress", project.id),
        &ctx.admin,
    );
    let response = ctx.app.clone().call(request).await.unwrap();
    let progress = body_json(response).await;
    assert_eq!(progress["total_tasks"], 1);
    assert_eq!(progress["done_tasks"], 1);
    assert_eq!(progress["progress"], 1.0);

    // The deleted task stays fetchable with its tombstone
    let request = bare_request("GET", &format!("/v1/tasks/{}", second_id), &ctx.admin);
    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let fetched = body_json(response).await;
    assert!(!fetched["deleted_at"].is_null());

    // But it can no longer be updated
    let request = json_request(
        "PUT",
        &format!("/v1/tasks/{}", second_id),
        &ctx.admin,
        json!({ "title": "Too late" }),
    );
    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL database"]
async fn test_task_status_filter() {
    let ctx = TestContext::new().await.unwrap();
    let project = common::create_project(&ctx.db, &ctx.admin, "Filters")
        .await
        .unwrap();

    let todo = common::create_task(&ctx.db, project.id, "Still open").await.unwrap();
    let done = common::create_task(&ctx.db, project.id, "Finished").await.unwrap();

    let request = json_request(
        "PUT",
        &format!("/v1/tasks/{}", done.id),
        &ctx.admin,
        json!({ "status": "done" }),
    );
    ctx.app.clone().call(request).await.unwrap();

    let request = bare_request(
        "GET",
        &format!("/v1/projects/{}/tasks?status=todo", project.id),
        &ctx.admin,
    );
    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let listing = body_json(response).await;
    let tasks = listing["tasks"].as_array().unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["id"], todo.id.to_string());

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL database"]
async fn test_comment_author_narrowing() {
    let ctx = TestContext::new().await.unwrap();
    let author = common::create_user(&ctx.db, "author", vec![Role::User])
        .await
        .unwrap();
    let bystander = common::create_user(&ctx.db, "bystander", vec![Role::User])
        .await
        .unwrap();
    let project = common::create_project(&ctx.db, &ctx.admin, "Comments")
        .await
        .unwrap();
    let task = common::create_task(&ctx.db, project.id, "Discuss").await.unwrap();

    // Any role may comment
    let request = json_request(
        "POST",
        &format!("/v1/tasks/{}/comments", task.id),
        &author,
        json!({ "body": "First!" }),
    );
    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let comment = body_json(response).await;
    assert_eq!(comment["author_user_id"], author.id.to_string());
    let comment_id = comment["id"].as_str().unwrap().to_string();

    // Someone else cannot edit it
    let request = json_request(
        "PUT",
        &format!("/v1/comments/{}", comment_id),
        &bystander,
        json!({ "body": "Vandalized" }),
    );
    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // The author can
    let request = json_request(
        "PUT",
        &format!("/v1/comments/{}", comment_id),
        &author,
        json!({ "body": "First! (edited)" }),
    );
    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Someone else cannot delete it either
    let request = bare_request("DELETE", &format!("/v1/comments/{}", comment_id), &bystander);
    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // An admin can
    let request = bare_request("DELETE", &format!("/v1/comments/{}", comment_id), &ctx.admin);
    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // The listing is empty again
    let request = bare_request("GET", &format!("/v1/tasks/{}/comments", task.id), &author);
    let response = ctx.app.clone().call(request).await.unwrap();
    let listing = body_json(response).await;
    assert!(listing["comments"].as_array().unwrap().is_empty());

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL database"]
async fn test_comment_rejected_on_deleted_task() {
    let ctx = TestContext::new().await.unwrap();
    let project = common::create_project(&ctx.db, &ctx.admin, "Archive")
        .await
        .unwrap();
    let task = common::create_task(&ctx.db, project.id, "Old").await.unwrap();

    Task::soft_delete(&ctx.db, task.id).await.unwrap();

    let request = json_request(
        "POST",
        &format!("/v1/tasks/{}/comments", task.id),
        &ctx.admin,
        json!({ "body": "Late to the party" }),
    );
    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL database"]
async fn test_audit_trail_records_mutations() {
    let ctx = TestContext::new().await.unwrap();

    // Mutate through the API so audit entries are written
    let request = json_request(
        "POST",
        "/v1/projects",
        &ctx.admin,
        json!({ "name": "Audited", "owner_user_id": ctx.admin.id }),
    );
    let response = ctx.app.clone().call(request).await.unwrap();
    let project = body_json(response).await;
    let project_id = project["id"].as_str().unwrap().to_string();

    let request = json_request(
        "PUT",
        &format!("/v1/projects/{}", project_id),
        &ctx.admin,
        json!({ "name": "Audited v2" }),
    );
    ctx.app.clone().call(request).await.unwrap();

    // Admin can read the trail filtered to this project
    let request = bare_request(
        "GET",
        &format!("/v1/audit?entity_type=project&entity_id={}", project_id),
        &ctx.admin,
    );
    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let trail = body_json(response).await;
    assert_eq!(trail["total"], 2);

    let entries = trail["entries"].as_array().unwrap();
    // Newest first
    assert_eq!(entries[0]["action"], "update");
    assert_eq!(
        entries[0]["details"]["changed"]["name"]["to"],
        "Audited v2"
    );
    assert_eq!(entries[1]["action"], "create");
    assert_eq!(entries[1]["details"]["created"]["name"], "Audited");
    assert_eq!(entries[1]["actor_user_id"], ctx.admin.id.to_string());

    // Non-admins are locked out
    let plain = common::create_user(&ctx.db, "plain", vec![Role::User])
        .await
        .unwrap();
    let request = bare_request("GET", "/v1/audit", &plain);
    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL database"]
async fn test_task_csv_export() {
    let ctx = TestContext::new().await.unwrap();
    let project = common::create_project(&ctx.db, &ctx.admin, "Exported")
        .await
        .unwrap();
    common::create_task(&ctx.db, project.id, "Ship it").await.unwrap();

    let request = bare_request(
        "GET",
        &format!("/v1/projects/{}/tasks/export", project.id),
        &ctx.admin,
    );
    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("text/csv"));

    let disposition = response
        .headers()
        .get("content-disposition")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(disposition.contains("attachment"));

    let csv = body_string(response).await;
    let mut lines = csv.lines();
    assert_eq!(
        lines.next().unwrap(),
        "id,project_id,title,status,priority,assigned_to_user_id,due_date,created_at,updated_at"
    );
    assert!(csv.contains("Ship it"));

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL database"]
async fn test_project_report_csv() {
    let ctx = TestContext::new().await.unwrap();
    let project = common::create_project(&ctx.db, &ctx.admin, "Reported")
        .await
        .unwrap();
    let task = common::create_task(&ctx.db, project.id, "Only item").await.unwrap();

    let request = json_request(
        "PUT",
        &format!("/v1/tasks/{}", task.id),
        &ctx.admin,
        json!({ "status": "done" }),
    );
    ctx.app.clone().call(request).await.unwrap();

    let request = bare_request("GET", "/v1/reports/projects", &ctx.admin);
    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let csv = body_string(response).await;
    assert!(csv.starts_with("id,name,owner,status,total_tasks,done_tasks,progress"));
    // Every task done and the stored status active, so the report derives completed
    let report_line = csv.lines().find(|l| l.contains("Reported")).unwrap();
    assert!(report_line.contains(&ctx.admin.username));
    assert!(report_line.contains("completed"));
    assert!(report_line.ends_with("1,1,1.00"));

    ctx.cleanup().await.unwrap();
}

/// Common test utilities for integration tests
///
/// This module provides shared infrastructure for integration tests:
/// - Test database setup and migration
/// - Test user creation in each role
/// - Router construction with a resolved admin actor
///
/// Tests talk to the router in-process through `tower::Service::call`,
/// sending the `X-Actor-Id` header the way a reverse proxy would.

use sqlx::PgPool;
use taskboard_api::app::{build_router, AppState};
use taskboard_api::config::Config;
use taskboard_shared::db::migrations::run_migrations;
use taskboard_shared::models::project::{CreateProject, Project};
use taskboard_shared::models::task::{CreateTask, Task, TaskPriority};
use taskboard_shared::models::user::{CreateUser, User};
use taskboard_shared::rbac::Role;
use uuid::Uuid;

/// Test context containing all necessary resources
pub struct TestContext {
    pub db: PgPool,
    pub app: axum::Router,
    pub config: Config,
    pub admin: User,
}

impl TestContext {
    /// Creates a new test context against the configured database
    pub async fn new() -> anyhow::Result<Self> {
        // Load test configuration
        let config = Config::from_env()?;

        // Connect to database
        let db = PgPool::connect(&config.database.url).await?;

        // Apply pending migrations (embedded in taskboard-shared)
        run_migrations(&db).await?;

        // Create a fresh admin actor for this context
        let admin = create_user(&db, "admin", vec![Role::Admin]).await?;

        // Build app
        let state = AppState::new(db.clone(), config.clone());
        let app = build_router(state);

        Ok(TestContext {
            db,
            app,
            config,
            admin,
        })
    }

    /// Cleans up test data
    ///
    /// Deletes rows in foreign-key order. The seeded `admin` login is
    /// left alone so other test binaries can still count on it.
    pub async fn cleanup(&self) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM audit_log").execute(&self.db).await?;
        sqlx::query("DELETE FROM comments").execute(&self.db).await?;
        sqlx::query("DELETE FROM tasks").execute(&self.db).await?;
        sqlx::query("DELETE FROM projects").execute(&self.db).await?;
        sqlx::query("DELETE FROM users WHERE username <> 'admin'")
            .execute(&self.db)
            .await?;
        Ok(())
    }
}

/// Creates a user with the given roles and a unique username
pub async fn create_user(db: &PgPool, prefix: &str, roles: Vec<Role>) -> anyhow::Result<User> {
    let suffix = Uuid::new_v4();
    let user = User::create(
        db,
        CreateUser {
            username: format!("{}-{}", prefix, suffix),
            email: format!("{}-{}@example.com", prefix, suffix),
            display_name: Some(format!("Test {}", prefix)),
            roles,
        },
    )
    .await?;

    Ok(user)
}

/// Creates a project owned by the given user, straight through the model
pub async fn create_project(db: &PgPool, owner: &User, name: &str) -> anyhow::Result<Project> {
    let project = Project::create(
        db,
        CreateProject {
            name: name.to_string(),
            description: None,
            owner_user_id: owner.id,
        },
    )
    .await?;

    Ok(project)
}

/// Creates a task in the given project, straight through the model
pub async fn create_task(db: &PgPool, project_id: Uuid, title: &str) -> anyhow::Result<Task> {
    let task = Task::create(
        db,
        CreateTask {
            project_id,
            title: title.to_string(),
            description: None,
            assigned_to_user_id: None,
            priority: TaskPriority::Medium,
            due_date: None,
        },
    )
    .await?;

    Ok(task)
}

/// Database models
///
/// Each model owns its table: the row struct, the input structs, and the
/// queries that touch it. Services compose these into authorized, audited
/// operations; nothing outside this module writes SQL against these tables.
///
/// # Models
///
/// - `user`: accounts and the roles they hold
/// - `project`: projects with soft delete and an owning user
/// - `task`: work items within a project, soft-deleted and reminder-tracked
/// - `comment`: discussion attached to tasks
/// - `audit`: append-only change log
///
/// # Example
///
/// ```no_run
/// use taskboard_shared::models::user::{User, CreateUser};
/// use taskboard_shared::db::pool::{create_pool, DatabaseConfig};
/// use taskboard_shared::rbac::Role;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let new_user = CreateUser {
///     username: "jdoe".to_string(),
///     email: "jdoe@example.com".to_string(),
///     display_name: Some("John Doe".to_string()),
///     roles: vec![Role::Manager],
/// };
///
/// let user = User::create(&pool, new_user).await?;
/// # Ok(())
/// # }
/// ```

pub mod audit;
pub mod comment;
pub mod project;
pub mod task;
pub mod user;

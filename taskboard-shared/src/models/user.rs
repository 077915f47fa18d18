/// User model and database operations
///
/// Users are the actors of the system. Every mutating operation resolves an
/// acting user first, and the roles held by that user decide what the policy
/// table in [`crate::rbac`] lets them do.
///
/// There is no user deletion. Accounts referenced from tasks, comments, and
/// the audit log stay resolvable forever; an account is retired by stripping
/// its roles.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     username VARCHAR(64) NOT NULL UNIQUE,
///     email VARCHAR(255) NOT NULL UNIQUE,
///     display_name VARCHAR(255),
///     roles user_role[] NOT NULL DEFAULT '{user}',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
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
/// let user = User::create(&pool, CreateUser {
///     username: "jdoe".to_string(),
///     email: "jdoe@example.com".to_string(),
///     display_name: Some("John Doe".to_string()),
///     roles: vec![Role::Manager],
/// }).await?;
///
/// assert!(user.has_role(Role::Manager));
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::rbac::Role;

/// User account
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID
    pub id: Uuid,

    /// Login/handle, unique, immutable after creation
    pub username: String,

    /// Contact email, unique
    pub email: String,

    /// Optional human-friendly name
    pub display_name: Option<String>,

    /// Roles held by this user
    pub roles: Vec<Role>,

    /// When the account was created
    pub created_at: DateTime<Utc>,

    /// When the account was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    /// Unique username
    pub username: String,

    /// Unique email
    pub email: String,

    /// Optional display name
    pub display_name: Option<String>,

    /// Roles to grant; defaults to just `user` when empty is not intended
    #[serde(default = "default_roles")]
    pub roles: Vec<Role>,
}

fn default_roles() -> Vec<Role> {
    vec![Role::User]
}

/// Input for updating a user
///
/// `None` leaves a field unchanged. `display_name` takes `Some(None)` to
/// clear the value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateUser {
    /// New email
    pub email: Option<String>,

    /// New display name (`Some(None)` clears it)
    pub display_name: Option<Option<String>>,

    /// Replacement role set
    pub roles: Option<Vec<Role>>,
}

impl User {
    /// Returns true when the user holds the given role
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    /// Returns true when the user holds the admin role
    pub fn is_admin(&self) -> bool {
        self.has_role(Role::Admin)
    }

    /// Creates a new user
    ///
    /// # Arguments
    ///
    /// * `executor` - Pool or open transaction
    /// * `data` - Account fields; an empty role list is stored as-is
    ///
    /// # Returns
    ///
    /// The newly created user
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails, including unique
    /// violations on `username` or `email`.
    pub async fn create(
        executor: impl PgExecutor<'_>,
        data: CreateUser,
    ) -> Result<Self, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, email, display_name, roles)
            VALUES ($1, $2, $3, $4)
            RETURNING id, username, email, display_name, roles, created_at, updated_at
            "#,
        )
        .bind(data.username)
        .bind(data.email)
        .bind(data.display_name)
        .bind(data.roles)
        .fetch_one(executor)
        .await?;

        Ok(user)
    }

    /// Finds a user by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, display_name, roles, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by username
    pub async fn find_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, display_name, roles, created_at, updated_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Updates a user's mutable fields
    ///
    /// The username is immutable; changing it would orphan the audit trail
    /// entries that reference it in recorded snapshots.
    ///
    /// # Returns
    ///
    /// The updated user, or `None` if no user with that ID exists.
    pub async fn update(
        executor: impl PgExecutor<'_>,
        id: Uuid,
        data: UpdateUser,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut query = String::from("UPDATE users SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.email.is_some() {
            bind_count += 1;
            query.push_str(&format!(", email = ${}", bind_count));
        }
        if data.display_name.is_some() {
            bind_count += 1;
            query.push_str(&format!(", display_name = ${}", bind_count));
        }
        if data.roles.is_some() {
            bind_count += 1;
            query.push_str(&format!(", roles = ${}", bind_count));
        }

        query.push_str(
            " WHERE id = $1 RETURNING id, username, email, display_name, roles, created_at, updated_at",
        );

        let mut q = sqlx::query_as::<_, User>(&query).bind(id);

        if let Some(email) = data.email {
            q = q.bind(email);
        }
        if let Some(display_name) = data.display_name {
            q = q.bind(display_name);
        }
        if let Some(roles) = data.roles {
            q = q.bind(roles);
        }

        let user = q.fetch_optional(executor).await?;

        Ok(user)
    }

    /// Lists users with pagination, newest first
    pub async fn list(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<Self>, sqlx::Error> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, display_name, roles, created_at, updated_at
            FROM users
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        Ok(users)
    }

    /// Counts all users
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(pool)
            .await?;

        Ok(count)
    }
}

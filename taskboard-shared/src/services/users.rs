/// User administration service
///
/// Creating and updating accounts is reserved for admins. There is no delete:
/// accounts referenced by tasks, comments, and audit entries must stay
/// resolvable, so retirement means stripping roles via update.

use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::error::{ServiceError, ServiceResult};
use crate::models::audit::{AppendAudit, AuditAction, AuditEntity, AuditRecord};
use crate::models::user::{CreateUser, UpdateUser, User};
use crate::rbac::{self, Operation};
use crate::services::{created_details, ChangeSet};

/// Longest accepted username
const MAX_USERNAME_LENGTH: usize = 64;

/// Longest accepted email
const MAX_EMAIL_LENGTH: usize = 255;

#[derive(Debug, Clone)]
pub struct UserService {
    db: PgPool,
}

impl UserService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Creates a user account. Admin only.
    ///
    /// The new account and its audit entry commit together; a failure on
    /// either side leaves no trace of the attempt.
    ///
    /// # Errors
    ///
    /// - `Authorization` when the actor is not an admin
    /// - `Validation` for an empty or oversized username/email or no roles
    /// - `Connectivity` for storage failures, including unique violations
    ///   on username or email
    pub async fn create(&self, actor: &User, data: CreateUser) -> ServiceResult<User> {
        rbac::authorize(actor, Operation::CreateUser)?;
        validate_username(&data.username)?;
        validate_email(&data.email)?;
        if data.roles.is_empty() {
            return Err(ServiceError::validation(
                "roles",
                "at least one role is required",
            ));
        }

        let mut tx = self.db.begin().await?;
        let user = User::create(&mut *tx, data).await?;
        AuditRecord::append(
            &mut *tx,
            AppendAudit {
                entity_type: AuditEntity::User,
                entity_id: user.id,
                action: AuditAction::Create,
                actor_user_id: actor.id,
                details: created_details(serde_json::json!({
                    "username": &user.username,
                    "email": &user.email,
                    "display_name": &user.display_name,
                    "roles": &user.roles,
                })),
            },
        )
        .await?;
        tx.commit().await?;

        info!(
            user_id = %user.id,
            username = %user.username,
            actor_id = %actor.id,
            "User created"
        );
        Ok(user)
    }

    /// Updates an account's email, display name, or roles. Admin only.
    ///
    /// Usernames are immutable.
    ///
    /// # Errors
    ///
    /// - `Authorization` when the actor is not an admin
    /// - `NotFound` when no account with that ID exists
    /// - `Validation` for a malformed email or an empty replacement role set
    pub async fn update(&self, actor: &User, id: Uuid, data: UpdateUser) -> ServiceResult<User> {
        rbac::authorize(actor, Operation::UpdateUser)?;
        if let Some(email) = &data.email {
            validate_email(email)?;
        }
        if let Some(roles) = &data.roles {
            if roles.is_empty() {
                return Err(ServiceError::validation(
                    "roles",
                    "at least one role is required",
                ));
            }
        }

        let old = User::find_by_id(&self.db, id)
            .await?
            .ok_or_else(|| ServiceError::not_found("user", id))?;

        let mut tx = self.db.begin().await?;
        let updated = User::update(&mut *tx, id, data)
            .await?
            .ok_or_else(|| ServiceError::not_found("user", id))?;

        let mut changes = ChangeSet::new();
        changes.record("email", &old.email, &updated.email);
        changes.record("display_name", &old.display_name, &updated.display_name);
        changes.record("roles", &old.roles, &updated.roles);

        AuditRecord::append(
            &mut *tx,
            AppendAudit {
                entity_type: AuditEntity::User,
                entity_id: updated.id,
                action: AuditAction::Update,
                actor_user_id: actor.id,
                details: changes.into_details(),
            },
        )
        .await?;
        tx.commit().await?;

        info!(user_id = %updated.id, actor_id = %actor.id, "User updated");
        Ok(updated)
    }

    /// Fetches one account by ID
    pub async fn get(&self, id: Uuid) -> ServiceResult<User> {
        User::find_by_id(&self.db, id)
            .await?
            .ok_or_else(|| ServiceError::not_found("user", id))
    }

    /// Lists accounts, newest first
    pub async fn list(&self, limit: i64, offset: i64) -> ServiceResult<Vec<User>> {
        Ok(User::list(&self.db, limit, offset).await?)
    }
}

fn validate_username(username: &str) -> ServiceResult<()> {
    if username.trim().is_empty() {
        return Err(ServiceError::validation(
            "username",
            "must not be empty or whitespace",
        ));
    }
    if username.len() > MAX_USERNAME_LENGTH {
        return Err(ServiceError::validation(
            "username",
            format!("must be at most {} characters", MAX_USERNAME_LENGTH),
        ));
    }
    if username.chars().any(char::is_whitespace) {
        return Err(ServiceError::validation(
            "username",
            "must not contain whitespace",
        ));
    }
    Ok(())
}

fn validate_email(email: &str) -> ServiceResult<()> {
    if email.trim().is_empty() {
        return Err(ServiceError::validation(
            "email",
            "must not be empty or whitespace",
        ));
    }
    if email.len() > MAX_EMAIL_LENGTH {
        return Err(ServiceError::validation(
            "email",
            format!("must be at most {} characters", MAX_EMAIL_LENGTH),
        ));
    }
    if !email.contains('@') {
        return Err(ServiceError::validation("email", "must contain '@'"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_username_rejects_empty_and_whitespace() {
        assert!(validate_username("").is_err());
        assert!(validate_username("   ").is_err());
        assert!(validate_username("two words").is_err());
        assert!(validate_username("jdoe").is_ok());
    }

    #[test]
    fn test_validate_username_rejects_oversized() {
        let long = "x".repeat(MAX_USERNAME_LENGTH + 1);
        assert!(validate_username(&long).is_err());
        let max = "x".repeat(MAX_USERNAME_LENGTH);
        assert!(validate_username(&max).is_ok());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("").is_err());
        assert!(validate_email("not-an-email").is_err());
        assert!(validate_email("user@example.com").is_ok());
    }
}

/// Role-based access control
///
/// Access is decided in two steps. A static policy table maps each mutating
/// [`Operation`] to the roles that may perform it, and a handful of narrowing
/// checks restrict otherwise-allowed operations to a context: managers may only
/// touch projects they own, and comment edits are reserved for the author.
/// Admins pass every narrowing check.
///
/// Reads are intentionally absent from the table. Any resolved actor may list
/// and fetch entities; only audit queries are gated (admin only).

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ServiceError;
use crate::models::project::Project;
use crate::models::user::User;

/// Roles a user can hold. A user may hold several at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Unrestricted access, including user administration and audit reads
    Admin,
    /// Manages projects they own and the tasks within them
    Manager,
    /// Reads everything and participates through comments
    User,
}

impl sqlx::postgres::PgHasArrayType for Role {
    fn array_type_info() -> sqlx::postgres::PgTypeInfo {
        sqlx::postgres::PgTypeInfo::with_name("_user_role")
    }
}

impl Role {
    /// String form matching the `user_role` enum in the database
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Manager => "manager",
            Role::User => "user",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Mutating operations gated by the policy table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    CreateUser,
    UpdateUser,
    CreateProject,
    UpdateProject,
    DeleteProject,
    CreateTask,
    UpdateTask,
    DeleteTask,
    CreateComment,
    UpdateComment,
    DeleteComment,
    ViewAudit,
}

impl Operation {
    /// Roles that unlock this operation before any contextual narrowing
    pub fn allowed_roles(&self) -> &'static [Role] {
        match self {
            Operation::CreateUser
            | Operation::UpdateUser
            | Operation::DeleteProject
            | Operation::ViewAudit => &[Role::Admin],
            Operation::CreateProject
            | Operation::UpdateProject
            | Operation::CreateTask
            | Operation::UpdateTask
            | Operation::DeleteTask => &[Role::Admin, Role::Manager],
            Operation::CreateComment
            | Operation::UpdateComment
            | Operation::DeleteComment => &[Role::Admin, Role::Manager, Role::User],
        }
    }
}

/// Returns true when any held role unlocks the operation
pub fn is_allowed(roles: &[Role], operation: Operation) -> bool {
    operation
        .allowed_roles()
        .iter()
        .any(|allowed| roles.contains(allowed))
}

/// Role gate evaluated at the top of every mutating service call
///
/// # Errors
///
/// Returns `ServiceError::Authorization` when none of the actor's roles
/// appears in the operation's policy row.
pub fn authorize(actor: &User, operation: Operation) -> Result<(), ServiceError> {
    if is_allowed(&actor.roles, operation) {
        return Ok(());
    }
    Err(ServiceError::Authorization(format!(
        "{:?} requires one of {:?}, actor {} holds {:?}",
        operation, operation.allowed_roles(), actor.id, actor.roles
    )))
}

/// Role gate plus ownership narrowing for project-scoped operations
///
/// Managers only pass for projects they own. Admins pass for any project.
pub fn authorize_project_scope(
    actor: &User,
    operation: Operation,
    project: &Project,
) -> Result<(), ServiceError> {
    authorize(actor, operation)?;
    if actor.is_admin() || project.owner_user_id == actor.id {
        return Ok(());
    }
    Err(ServiceError::Authorization(format!(
        "{:?} on project {} requires ownership or the admin role",
        operation, project.id
    )))
}

/// Role gate plus authorship narrowing for comment edits and deletions
pub fn authorize_author(
    actor: &User,
    operation: Operation,
    author_user_id: Uuid,
) -> Result<(), ServiceError> {
    authorize(actor, operation)?;
    if actor.is_admin() || author_user_id == actor.id {
        return Ok(());
    }
    Err(ServiceError::Authorization(format!(
        "{:?} is limited to the comment author or an admin",
        operation
    )))
}

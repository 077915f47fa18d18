/// Common error types for the service layer
///
/// Every service operation returns `Result<T, ServiceError>`. The four kinds
/// mirror the failure classes callers need to distinguish: bad input, missing
/// entity, insufficient role, and storage trouble. The API crate maps each kind
/// to an HTTP status; other frontends can branch on the variant directly.
///
/// # Example
///
/// ```no_run
/// use taskboard_shared::error::ServiceError;
/// use uuid::Uuid;
///
/// fn render(err: &ServiceError) -> String {
///     match err {
///         ServiceError::Validation { field, message } => format!("{field}: {message}"),
///         ServiceError::NotFound { entity, id } => format!("{entity} {id} does not exist"),
///         ServiceError::Authorization(reason) => reason.clone(),
///         ServiceError::Connectivity(_) => "storage unavailable".to_string(),
///     }
/// }
/// ```

use uuid::Uuid;

/// Result alias used throughout the service layer
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Error type returned by every service operation
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// A required field is missing or malformed (e.g. empty task title)
    #[error("Validation failed on {field}: {message}")]
    Validation {
        /// Field that failed the check
        field: &'static str,
        /// Human-readable reason
        message: String,
    },

    /// Referenced entity is absent or soft-deleted
    #[error("{entity} {id} not found")]
    NotFound {
        /// Entity kind ("user", "project", "task", "comment")
        entity: &'static str,
        /// Identifier that failed to resolve
        id: Uuid,
    },

    /// Actor lacks the role or ownership the operation requires
    #[error("Not authorized: {0}")]
    Authorization(String),

    /// The relational store is unreachable or rejected the statement
    #[error("Storage error: {0}")]
    Connectivity(#[from] sqlx::Error),
}

impl ServiceError {
    /// Shorthand for a validation failure on a named field
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        ServiceError::Validation {
            field,
            message: message.into(),
        }
    }

    /// Shorthand for a missing (or soft-deleted) entity
    pub fn not_found(entity: &'static str, id: Uuid) -> Self {
        ServiceError::NotFound { entity, id }
    }
}

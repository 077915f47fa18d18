/// Error handling for the API server
///
/// Handlers return `Result<T, ApiError>`; the error converts into the right
/// status code and a JSON `ErrorResponse` body. Service-layer errors convert
/// via `From<ServiceError>`, so handlers can use `?` on service calls.
///
/// # Status mapping
///
/// | Error                       | Status |
/// |-----------------------------|--------|
/// | Validation                  | 422    |
/// | NotFound                    | 404    |
/// | Authorization               | 403    |
/// | Connectivity (constraint)   | 409    |
/// | Connectivity (unreachable)  | 503    |
/// | Connectivity (other)        | 500    |

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use taskboard_shared::error::ServiceError;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Malformed request (bad header, unparsable id)
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Actor could not be resolved
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Actor lacks the required role or ownership
    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Duplicate username or email
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Request body failed validation
    #[error("Validation failed: {} errors", .0.len())]
    ValidationError(Vec<ValidationErrorDetail>),

    #[error("Internal error: {0}")]
    InternalError(String),

    /// Database unreachable
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
}

/// One field that failed validation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationErrorDetail {
    pub field: String,
    pub message: String,
}

/// JSON body of every error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Stable machine-readable code (e.g., "not_found")
    pub error: String,

    /// Human-readable message
    pub message: String,

    /// Present only for validation errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<ValidationErrorDetail>>,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::ValidationError(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "bad_request",
            ApiError::Unauthorized(_) => "unauthorized",
            ApiError::Forbidden(_) => "forbidden",
            ApiError::NotFound(_) => "not_found",
            ApiError::Conflict(_) => "conflict",
            ApiError::ValidationError(_) => "validation_error",
            ApiError::InternalError(_) => "internal_error",
            ApiError::ServiceUnavailable(_) => "service_unavailable",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();

        let (message, details) = match self {
            ApiError::ValidationError(errors) => {
                ("Request validation failed".to_string(), Some(errors))
            }
            ApiError::InternalError(msg) => {
                // Log the detail, never leak it to clients
                tracing::error!("Internal error: {}", msg);
                ("An internal error occurred".to_string(), None)
            }
            ApiError::BadRequest(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::Forbidden(msg)
            | ApiError::NotFound(msg)
            | ApiError::Conflict(msg)
            | ApiError::ServiceUnavailable(msg) => (msg, None),
        };

        let body = Json(ErrorResponse {
            error: code.to_string(),
            message,
            details,
        });

        (status, body).into_response()
    }
}

/// Convert service errors to API errors
impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation { field, message } => {
                ApiError::ValidationError(vec![ValidationErrorDetail {
                    field: field.to_string(),
                    message,
                }])
            }
            ServiceError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{} {} not found", entity, id))
            }
            ServiceError::Authorization(msg) => ApiError::Forbidden(msg),
            ServiceError::Connectivity(err) => ApiError::from(err),
        }
    }
}

/// Convert sqlx errors to API errors
impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound("Resource not found".to_string()),
            sqlx::Error::Database(db_err) => {
                // Constraint violations surface as conflicts
                if let Some(constraint) = db_err.constraint() {
                    if constraint.contains("username") {
                        return ApiError::Conflict("Username already exists".to_string());
                    }
                    if constraint.contains("email") {
                        return ApiError::Conflict("Email already exists".to_string());
                    }
                    return ApiError::Conflict(format!("Constraint violation: {}", constraint));
                }

                ApiError::InternalError(format!("Database error: {}", db_err))
            }
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                ApiError::ServiceUnavailable("Database unavailable".to_string())
            }
            _ => ApiError::InternalError(format!("Database error: {}", err)),
        }
    }
}

/// Convert request validation failures to API errors
impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        let errors: Vec<ValidationErrorDetail> = err
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| ValidationErrorDetail {
                    field: field.to_string(),
                    message: error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| "Validation failed".to_string()),
                })
            })
            .collect();
        ApiError::ValidationError(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_error_display() {
        let err = ApiError::BadRequest("Invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: Invalid input");

        let err = ApiError::NotFound("User not found".to_string());
        assert_eq!(err.to_string(), "Not found: User not found");
    }

    #[test]
    fn test_status_and_code_agree() {
        let cases = [
            (ApiError::BadRequest(String::new()), 400, "bad_request"),
            (ApiError::Unauthorized(String::new()), 401, "unauthorized"),
            (ApiError::Forbidden(String::new()), 403, "forbidden"),
            (ApiError::NotFound(String::new()), 404, "not_found"),
            (ApiError::Conflict(String::new()), 409, "conflict"),
            (ApiError::ValidationError(vec![]), 422, "validation_error"),
            (ApiError::InternalError(String::new()), 500, "internal_error"),
            (
                ApiError::ServiceUnavailable(String::new()),
                503,
                "service_unavailable",
            ),
        ];

        for (err, status, code) in cases {
            assert_eq!(err.status().as_u16(), status);
            assert_eq!(err.code(), code);
        }
    }

    #[test]
    fn test_service_validation_maps_to_details() {
        let err = ApiError::from(ServiceError::validation("title", "must not be empty"));
        match err {
            ApiError::ValidationError(details) => {
                assert_eq!(details.len(), 1);
                assert_eq!(details[0].field, "title");
            }
            other => panic!("expected validation error, got {}", other),
        }
    }

    #[test]
    fn test_service_not_found_maps_to_404_message() {
        let id = Uuid::nil();
        let err = ApiError::from(ServiceError::not_found("project", id));
        match err {
            ApiError::NotFound(msg) => {
                assert!(msg.contains("project"));
                assert!(msg.contains(&id.to_string()));
            }
            other => panic!("expected not found, got {}", other),
        }
    }

    #[test]
    fn test_service_authorization_maps_to_forbidden() {
        let err = ApiError::from(ServiceError::Authorization("nope".to_string()));
        assert!(matches!(err, ApiError::Forbidden(_)));
    }

    #[test]
    fn test_pool_timeout_maps_to_service_unavailable() {
        let err = ApiError::from(ServiceError::from(sqlx::Error::PoolTimedOut));
        assert!(matches!(err, ApiError::ServiceUnavailable(_)));
    }
}

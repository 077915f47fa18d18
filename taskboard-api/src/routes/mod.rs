/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `users`: User management endpoints
/// - `projects`: Project management endpoints
/// - `tasks`: Task management endpoints
/// - `comments`: Comment endpoints
/// - `audit`: Audit log read endpoints
/// - `reports`: CSV export endpoints

pub mod audit;
pub mod comments;
pub mod health;
pub mod projects;
pub mod reports;
pub mod tasks;
pub mod users;

use serde::Deserialize;

/// Common pagination query parameters
///
/// Used by list endpoints as `?limit=50&offset=100`. Both are optional;
/// each endpoint applies its own defaults.
#[derive(Debug, Default, Deserialize)]
pub struct PaginationQuery {
    /// Page size
    pub limit: Option<i64>,

    /// Page offset
    pub offset: Option<i64>,
}

impl PaginationQuery {
    /// Resolves limit and offset with the given default page size
    pub fn resolve(&self, default_limit: i64) -> (i64, i64) {
        (
            self.limit.unwrap_or(default_limit),
            self.offset.unwrap_or(0),
        )
    }
}

/// Health check endpoint
///
/// `GET /health` answers without an actor header, so load balancers and
/// uptime probes can hit it directly. The handler pings the database and
/// reports pool utilization alongside the verdict.
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "database": "connected",
///   "pool": { "size": 10, "idle": 8, "active": 2 }
/// }
/// ```
///
/// `status` degrades to `"degraded"` when the database ping fails; the
/// endpoint itself still returns 200 so probes can tell "API down" from
/// "database down".

use crate::{app::AppState, error::ApiResult};
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use taskboard_shared::db::pool;

/// Pool statistics as reported by the health endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct PoolInfo {
    /// Total connections in the pool
    pub size: usize,

    /// Idle connections
    pub idle: usize,

    /// Connections currently in use
    pub active: usize,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// "healthy" or "degraded"
    pub status: String,

    /// Application version
    pub version: String,

    /// "connected" or "disconnected"
    pub database: String,

    /// Connection pool statistics
    pub pool: PoolInfo,
}

pub async fn health_check(State(state): State<AppState>) -> ApiResult<Json<HealthResponse>> {
    let (status, database) = match pool::health_check(&state.db).await {
        Ok(()) => ("healthy", "connected"),
        Err(_) => ("degraded", "disconnected"),
    };

    let stats = pool::get_pool_stats(&state.db);

    Ok(Json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: database.to_string(),
        pool: PoolInfo {
            size: stats.total_connections,
            idle: stats.idle_connections,
            active: stats.active_connections,
        },
    }))
}

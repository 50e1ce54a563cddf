/// Health check endpoint
///
/// Verifies the server is running and the database is reachable.
///
/// # Endpoint
///
/// ```text
/// GET /health
/// ```
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "database": "connected"
/// }
/// ```
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::app::AppState;

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status, "healthy" or "degraded"
    pub status: String,

    /// Application version
    pub version: String,

    /// Database status, "connected" or "disconnected"
    pub database: String,
}

/// Health check handler
///
/// A database failure degrades the report rather than failing the
/// request, so load balancers can still read the body.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let database_connected = sqlx::query("SELECT 1").fetch_one(&state.db).await.is_ok();

    Json(HealthResponse {
        status: if database_connected {
            "healthy".to_string()
        } else {
            "degraded".to_string()
        },
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: if database_connected {
            "connected".to_string()
        } else {
            "disconnected".to_string()
        },
    })
}

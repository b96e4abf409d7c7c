//! Health check endpoints for Kubernetes-style probes.
//!
//! - `/livez` - Basic liveness probe (immediate 200, no checks)
//! - `/healthz` - Render pool stats (fast, passive stats)
//! - `/readyz` - Readiness probe (active render check)

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::state::AppState;

/// GET /livez - Basic liveness probe.
///
/// Returns 200 immediately. Used to check if the server is accepting
/// connections. Does NOT wait for pool initialization.
pub async fn livez() -> StatusCode {
    StatusCode::OK
}

/// GET /healthz - Render pool stats (passive, no render).
pub async fn healthz(State(state): State<AppState>) -> Response {
    let Some(pool) = state.pool else {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(serde_json::json!({
                "error": "render pool not initialized"
            })),
        )
            .into_response();
    };

    (StatusCode::OK, Json(pool.stats())).into_response()
}

/// GET /readyz - Readiness probe (active render check).
///
/// Submits a minimal probe render to verify workers can produce a shell.
/// Returns 200 with health status if healthy, 503 if unhealthy.
pub async fn readyz(State(state): State<AppState>) -> Response {
    let Some(pool) = state.pool else {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(serde_json::json!({
                "healthy": false,
                "error": "render pool not initialized"
            })),
        )
            .into_response();
    };

    match pool.health_check().await {
        Ok(status) if status.healthy => (StatusCode::OK, Json(status)).into_response(),
        Ok(status) => (StatusCode::SERVICE_UNAVAILABLE, Json(status)).into_response(),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(serde_json::json!({
                "healthy": false,
                "error": e.to_string(),
            })),
        )
            .into_response(),
    }
}

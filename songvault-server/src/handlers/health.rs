use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::warn;

use crate::infra::app_state::AppState;

pub async fn ping_handler() -> Response {
    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
    }))
    .into_response()
}

/// Reports 503 while the song store cannot be reached.
pub async fn health_handler(State(state): State<AppState>) -> Response {
    let mut health_status = json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
        "checks": {}
    });

    match state.songs().ping().await {
        Ok(()) => {
            health_status["checks"]["database"] =
                json!({ "status": "healthy" });
            Json(health_status).into_response()
        }
        Err(err) => {
            warn!(error = %err, "health check: database unreachable");
            health_status["status"] = json!("unhealthy");
            health_status["checks"]["database"] =
                json!({ "status": "unhealthy" });
            (StatusCode::SERVICE_UNAVAILABLE, Json(health_status))
                .into_response()
        }
    }
}

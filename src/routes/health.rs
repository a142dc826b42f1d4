use crate::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

pub async fn root() -> impl IntoResponse {
    Json(json!({
        "service": "Screening Service",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running",
    }))
}

#[axum::debug_handler]
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    match state.llm.check_health().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "status": "healthy", "llm": "connected" })),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "LLM provider health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "error",
                    "error_message": format!("Service unhealthy: {}", e),
                })),
            )
        }
    }
}

//! Health check routes.

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

/// GET /api/health
pub async fn health_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "version": env!("CARGO_PKG_VERSION"),
        })),
    )
}

/// GET /api/health/ready
pub async fn ready() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"status": "ready"})))
}

/// GET /api/health/live
pub async fn live() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"status": "alive"})))
}

use axum::{http::StatusCode, Json};

/// GET /health - Basic liveness probe.
pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (StatusCode::OK, Json(serde_json::json!({ "status": "ok" })))
}

//! Health Check API Handler

use axum::Json;
use serde::Serialize;

pub const SERVICE_NAME: &str = "LlamaIndex AutoSplit API";

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub message: &'static str,
    pub status: &'static str,
}

/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        message: SERVICE_NAME,
        status: "running",
    })
}

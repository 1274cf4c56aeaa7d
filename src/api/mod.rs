//! API Module
//!
//! HTTP surface over the job runner. The core never sees HTTP types; handlers
//! translate multipart uploads into submissions and job records into JSON.

pub mod error;
pub mod health;
pub mod jobs;

use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::jobs::JobRunner;

#[derive(Clone)]
pub struct AppState {
    pub runner: Arc<JobRunner>,
}

/// Create the main API router with all endpoints
pub fn create_router(runner: Arc<JobRunner>, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/api/jobs", post(jobs::create_job))
        .route("/api/jobs/{job_id}", get(jobs::get_job))
        .route("/api/jobs/{job_id}/split-plan", get(jobs::get_split_plan))
        .with_state(AppState { runner })
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
}

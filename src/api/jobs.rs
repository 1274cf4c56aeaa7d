//! Job API Handlers
//!
//! HTTP endpoints for submitting split jobs and polling them.

use axum::{
    Json,
    extract::{Multipart, Path, State},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::AppState;
use crate::api::error::{ApiError, ApiResult};
use crate::jobs::{JobDetails, JobId, JobStatus, SplitOptions};
use crate::split_plan::SplitPlan;

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateJobResponse {
    pub job_id: String,
    pub status: JobStatus,
    pub message: String,
}

/// POST /api/jobs
/// Accept a document upload and start splitting it in the background
///
/// Multipart fields (`file` or `file_id` is required):
/// - `file`: the document
/// - `file_id`: a document already uploaded to LlamaCloud; skips the upload
/// - `category_description` (optional): overrides the default category description
pub async fn create_job(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<CreateJobResponse>> {
    let mut upload = None;
    let mut file_id = None;
    let mut category_description = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.to_string()))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                let file_name = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let content = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(e.to_string()))?;
                upload = Some((content.to_vec(), file_name, content_type));
            }
            Some("file_id") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(e.to_string()))?;
                let text = text.trim();
                if !text.is_empty() {
                    file_id = Some(parse_file_id(text)?);
                }
            }
            Some("category_description") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(e.to_string()))?;
                if !text.trim().is_empty() {
                    category_description = Some(text);
                }
            }
            other => tracing::debug!("Ignoring multipart field {:?}", other),
        }
    }

    let (content, file_name, content_type) = match (upload, &file_id) {
        (Some(upload), _) => upload,
        (None, Some(_)) => (Vec::new(), None, None),
        (None, None) => {
            return Err(ApiError::BadRequest(
                "Either 'file' or 'file_id' must be provided".to_string(),
            ));
        }
    };

    let defaults = SplitOptions::default();
    let options = SplitOptions {
        file_name: file_name.unwrap_or(defaults.file_name),
        content_type: content_type.unwrap_or(defaults.content_type),
        category_description,
        file_id,
    };

    // Records are created pending; the background task may already have moved on.
    let id = state.runner.submit(content, options);

    Ok(Json(CreateJobResponse {
        job_id: id.to_string(),
        status: JobStatus::Pending,
        message: "Job created successfully".to_string(),
    }))
}

fn parse_file_id(text: &str) -> ApiResult<String> {
    Uuid::parse_str(text).map(|id| id.to_string()).map_err(|_| {
        ApiError::BadRequest(format!(
            "Invalid file_id format. Must be a valid UUID. Got: {text}"
        ))
    })
}

/// GET /api/jobs/{job_id}
/// Current state of a job
pub async fn get_job(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> ApiResult<Json<JobDetails>> {
    tracing::debug!("Getting job: {}", job_id);

    let id: JobId = job_id.parse()?;
    let job = state.runner.get(&id)?;
    Ok(Json(job.into()))
}

/// GET /api/jobs/{job_id}/split-plan
/// Page ranges for cutting the uploaded document at every high-confidence page
pub async fn get_split_plan(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> ApiResult<Json<SplitPlan>> {
    let id: JobId = job_id.parse()?;
    let job = state.runner.get(&id)?;
    Ok(Json(SplitPlan::for_job(&job)?))
}

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, StatusCode};
use uuid::Uuid;

use super::error::LlamaError;
use super::types::{FileUploadResponse, SplitJob, SplitJobRequest, SplitResult};
use crate::config::AutosplitConfig;
use crate::jobs::{SplitOptions, SplitProvider};

pub const DEFAULT_BASE_URL: &str = "https://api.cloud.llamaindex.ai/api/v1";

pub struct LlamaClient {
    api_key: String,
    client: Client,
    base_url: String,
    default_category_description: String,
    poll_interval: Duration,
}

impl LlamaClient {
    pub fn from_config(config: &AutosplitConfig) -> Result<Self, LlamaError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self {
            api_key: config.api_key.clone(),
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            default_category_description: config.default_category_description.clone(),
            poll_interval: Duration::from_millis(config.poll_interval_ms),
        })
    }

    /// Upload a document and return the file id LlamaCloud assigned to it.
    pub async fn upload_file(
        &self,
        content: Vec<u8>,
        file_name: &str,
        content_type: &str,
    ) -> Result<String, LlamaError> {
        let part = Part::bytes(content)
            .file_name(file_name.to_string())
            .mime_str(content_type)?;
        let form = Form::new().part("file", part);

        let response = self
            .client
            .post(self.url("files"))
            .bearer_auth(&self.api_key)
            .header(ACCEPT, "application/json")
            .multipart(form)
            .send()
            .await?;

        let body = check(response).await?.json::<FileUploadResponse>().await?;
        let id = body.id.ok_or(LlamaError::MissingFileId)?;
        let file_id = Uuid::parse_str(&id).map_err(|_| LlamaError::InvalidFileId(id.clone()))?;
        Ok(file_id.to_string())
    }

    pub async fn create_split_job(
        &self,
        file_id: &str,
        category_description: &str,
    ) -> Result<SplitJob, LlamaError> {
        let req = SplitJobRequest::for_file(file_id, category_description);
        let response = self
            .client
            .post(self.url("beta/split/jobs"))
            .bearer_auth(&self.api_key)
            .header(ACCEPT, "application/json")
            .json(&req)
            .send()
            .await?;

        Ok(check(response).await?.json::<SplitJob>().await?)
    }

    pub async fn get_split_job(&self, split_job_id: &str) -> Result<SplitJob, LlamaError> {
        let response = self
            .client
            .get(self.url(&format!("beta/split/jobs/{split_job_id}")))
            .bearer_auth(&self.api_key)
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        Ok(check(response).await?.json::<SplitJob>().await?)
    }

    /// Poll a remote split job until it leaves `pending`/`processing`.
    ///
    /// There is no deadline: a remote job that never finishes is waited on forever.
    pub async fn wait_for_split_job(&self, mut job: SplitJob) -> Result<SplitResult, LlamaError> {
        while job.is_running() {
            tokio::time::sleep(self.poll_interval).await;
            job = self.get_split_job(&job.id).await?;
            tracing::debug!(split_job_id = %job.id, status = %job.status, "polled split job");
        }

        match job.status.as_str() {
            "completed" => job.result.ok_or(LlamaError::MissingResult(job.id)),
            "failed" => Err(LlamaError::JobFailed(
                job.error_message.unwrap_or_else(|| "Job failed".to_string()),
            )),
            other => Err(LlamaError::JobFailed(format!(
                "split job {} ended with unexpected status {other}",
                job.id
            ))),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }
}

#[async_trait]
impl SplitProvider for LlamaClient {
    async fn split(
        &self,
        content: Vec<u8>,
        options: &SplitOptions,
    ) -> anyhow::Result<SplitResult> {
        let file_id = match &options.file_id {
            Some(file_id) => file_id.clone(),
            None => {
                let file_id = self
                    .upload_file(content, &options.file_name, &options.content_type)
                    .await?;
                tracing::debug!(%file_id, "uploaded document");
                file_id
            }
        };

        let description = options
            .category_description
            .as_deref()
            .unwrap_or(&self.default_category_description);
        let job = self.create_split_job(&file_id, description).await?;
        tracing::info!(split_job_id = %job.id, status = %job.status, "created remote split job");

        Ok(self.wait_for_split_job(job).await?)
    }
}

/// Turn non-2xx responses into [`LlamaError`]s.
async fn check(response: Response) -> Result<Response, LlamaError> {
    let status = response.status();

    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok())
            .map(|secs| secs.saturating_mul(1000))
            .unwrap_or(1000);
        return Err(LlamaError::RateLimited {
            retry_after_ms: retry_after,
        });
    }

    if !status.is_success() {
        let text = response
            .text()
            .await
            .unwrap_or_else(|_| "unknown error".to_string());
        return Err(LlamaError::ApiError {
            status: status.as_u16(),
            message: error_detail(&text),
        });
    }

    Ok(response)
}

/// Pull the human-readable part out of an error body.
///
/// Handles both `{"detail": "..."}` and validation errors shaped like
/// `{"detail": [{"msg": "..."}]}`; anything else is returned verbatim.
fn error_detail(body: &str) -> String {
    let Ok(json) = serde_json::from_str::<serde_json::Value>(body) else {
        return body.to_string();
    };
    match json.get("detail") {
        Some(serde_json::Value::String(detail)) => detail.clone(),
        Some(serde_json::Value::Array(items)) => items
            .first()
            .and_then(|item| item.get("msg"))
            .and_then(|msg| msg.as_str())
            .map(str::to_string)
            .unwrap_or_else(|| body.to_string()),
        _ => body.to_string(),
    }
}

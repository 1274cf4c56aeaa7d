//! Request and response bodies of the LlamaCloud files and split endpoints.

use serde::{Deserialize, Serialize};

/// Body of `POST /beta/split/jobs`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitJobRequest {
    pub document_input: DocumentInput,
    pub categories: Vec<Category>,
    pub splitting_strategy: SplittingStrategy,
}

impl SplitJobRequest {
    /// Request splitting an uploaded file into a single `default` category.
    pub fn for_file(file_id: &str, category_description: &str) -> Self {
        Self {
            document_input: DocumentInput {
                input_type: "file_id".into(),
                value: file_id.into(),
            },
            categories: vec![Category {
                name: "default".into(),
                description: category_description.into(),
            }],
            splitting_strategy: SplittingStrategy {
                allow_uncategorized: false,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentInput {
    #[serde(rename = "type")]
    pub input_type: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplittingStrategy {
    pub allow_uncategorized: bool,
}

/// Response of `POST /files`. Deployments disagree on the id key.
#[derive(Debug, Clone, Deserialize)]
pub struct FileUploadResponse {
    #[serde(alias = "file_id", alias = "fileId", alias = "uuid")]
    pub id: Option<String>,
}

/// A split job as reported by the remote service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitJob {
    pub id: String,
    #[serde(default = "default_remote_status")]
    pub status: String,
    #[serde(default)]
    pub result: Option<SplitResult>,
    #[serde(default)]
    pub error_message: Option<String>,
}

fn default_remote_status() -> String {
    "pending".to_string()
}

impl SplitJob {
    pub fn is_running(&self) -> bool {
        matches!(self.status.as_str(), "pending" | "processing")
    }
}

/// Output of a completed split: ordered segments of the document.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SplitResult {
    pub segments: Vec<Segment>,
}

/// A run of pages the service assigned to one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    #[serde(default)]
    pub category: String,
    /// 1-based page numbers.
    #[serde(default)]
    pub pages: Vec<u32>,
    /// `high`, `medium` or `low`.
    #[serde(default)]
    pub confidence_category: String,
}

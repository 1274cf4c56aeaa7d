//! Tipos de erro para o cliente da API LlamaCloud.
//!
//! Define [`LlamaError`] com variantes para rate limiting, erros da API,
//! erros de rede e respostas que chegaram mas não podem ser usadas.

use thiserror::Error;

/// Erros que podem ocorrer ao interagir com a LlamaCloud.
#[derive(Debug, Error)]
pub enum LlamaError {
    /// O servidor retornou HTTP 429 (rate limit).
    /// `retry_after_ms` vem do header `retry-after` (1s se ausente).
    #[error("rate limited, retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    /// Qualquer outro erro HTTP (4xx/5xx).
    /// `message` é o campo `detail` do corpo quando existir.
    #[error("API error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    /// Falha de rede subjacente (DNS, conexão recusada, timeout).
    #[error("network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("upload response did not contain a file id")]
    MissingFileId,

    #[error("invalid file id returned by upload: {0}")]
    InvalidFileId(String),

    /// O job remoto terminou em `failed`; carrega a mensagem de erro dele.
    #[error("{0}")]
    JobFailed(String),

    #[error("split job {0} completed without a result")]
    MissingResult(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_limited_display() {
        let err = LlamaError::RateLimited {
            retry_after_ms: 5000,
        };
        assert_eq!(err.to_string(), "rate limited, retry after 5000ms");
    }

    #[test]
    fn api_error_display() {
        let err = LlamaError::ApiError {
            status: 401,
            message: "Invalid API key".into(),
        };
        assert_eq!(err.to_string(), "API error (status 401): Invalid API key");
    }

    #[test]
    fn job_failed_is_the_remote_message() {
        let err = LlamaError::JobFailed("invalid format".into());
        assert_eq!(err.to_string(), "invalid format");
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<LlamaError>();
    }
}

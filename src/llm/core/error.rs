//! Failures talking to the model

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LlmError {
    /// 401/403: the key was rejected or lacks access to the model
    #[error("Gemini rejected the API key: {0}")]
    Unauthorized(String),

    /// 429
    #[error("Gemini quota exhausted: {0}")]
    QuotaExceeded(String),

    /// Non-2xx answer with a Google error body
    #[error("Gemini returned {status} {code}: {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    /// Connection failure, or a non-2xx answer without a readable body
    #[error("request to Gemini failed (status {status:?}): {detail}")]
    Transport { status: Option<u16>, detail: String },

    /// The response stream broke off or carried undecodable data
    #[error("malformed Gemini stream: {0}")]
    Stream(String),

    #[error("prompt is empty")]
    EmptyPrompt,
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        LlmError::Transport {
            status: err.status().map(|s| s.as_u16()),
            detail: err.to_string(),
        }
    }
}

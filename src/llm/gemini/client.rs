//! Gemini client implementation

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::{Client, StatusCode};
use std::fmt;
use std::time::Duration;
use tracing::debug;

use crate::llm::core::{
    error::LlmError,
    provider::{EventStream, LlmProvider},
    types::GenerateRequest,
};

use super::mapper::{from_gemini_response, to_gemini_request};
use super::sse::parse_sse_stream;
use super::types::ErrorResponse;

/// Public Gemini Developer API endpoint
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Gemini model identifiers
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum GeminiModel {
    /// Gemini 2.5 Pro
    Gemini25Pro,
    /// Gemini 2.5 Flash
    #[default]
    Gemini25Flash,
    /// Gemini 2.5 Flash Lite
    Gemini25FlashLite,
    /// Any other model id, passed through verbatim
    Custom(String),
}

impl GeminiModel {
    /// Get the model identifier string
    pub fn as_str(&self) -> &str {
        match self {
            GeminiModel::Gemini25Pro => "gemini-2.5-pro",
            GeminiModel::Gemini25Flash => "gemini-2.5-flash",
            GeminiModel::Gemini25FlashLite => "gemini-2.5-flash-lite",
            GeminiModel::Custom(id) => id,
        }
    }

    /// Resolve a model id, falling back to `Custom` for unknown ids
    pub fn from_id(id: &str) -> Self {
        match id {
            "gemini-2.5-pro" => GeminiModel::Gemini25Pro,
            "gemini-2.5-flash" => GeminiModel::Gemini25Flash,
            "gemini-2.5-flash-lite" => GeminiModel::Gemini25FlashLite,
            other => GeminiModel::Custom(other.to_string()),
        }
    }
}

impl fmt::Display for GeminiModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Client for the Gemini Developer API
pub struct GeminiClient {
    http_client: Client,
    api_key: String,
    base_url: String,
    model: GeminiModel,
}

impl GeminiClient {
    /// Create a new Gemini client
    ///
    /// `timeout` bounds each whole request, including reading the stream.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(
        api_key: impl Into<String>,
        model: GeminiModel,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        let http_client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(timeout)
            .build()
            .map_err(|e| LlmError::Transport {
                status: None,
                detail: format!("Failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            http_client,
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model,
        })
    }

    /// Build the endpoint URL for streaming
    fn build_endpoint_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:streamGenerateContent?alt=sse",
            self.base_url,
            self.model.as_str()
        )
    }

    /// Make a streaming request to Gemini
    async fn make_streaming_request(
        &self,
        request: GenerateRequest,
    ) -> Result<EventStream, LlmError> {
        if request.prompt.trim().is_empty() {
            return Err(LlmError::EmptyPrompt);
        }

        let gemini_request = to_gemini_request(request);
        let url = self.build_endpoint_url();
        debug!(model = %self.model, "requesting Gemini completion");

        let response = self
            .http_client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&gemini_request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(error_from_status(status, body));
        }

        let sse_stream = parse_sse_stream(Box::pin(response.bytes_stream()));

        // Flatten each chunk's events into the outgoing stream
        let events = sse_stream.flat_map(|result| {
            futures::stream::iter(match result {
                Ok(chunk) => from_gemini_response(chunk)
                    .into_iter()
                    .map(Ok)
                    .collect::<Vec<_>>(),
                Err(e) => vec![Err(e)],
            })
        });

        Ok(Box::pin(events))
    }
}

/// Map a non-2xx Gemini response to an [`LlmError`]
fn error_from_status(status: StatusCode, body: String) -> LlmError {
    let detail = serde_json::from_str::<ErrorResponse>(&body)
        .ok()
        .map(|r| r.error);

    match (status, detail) {
        (StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN, detail) => {
            LlmError::Unauthorized(detail.map(|d| d.message).unwrap_or(body))
        }
        (StatusCode::TOO_MANY_REQUESTS, detail) => {
            LlmError::QuotaExceeded(detail.map(|d| d.message).unwrap_or(body))
        }
        (status, Some(d)) if !d.status.is_empty() => LlmError::Api {
            status: status.as_u16(),
            code: d.status,
            message: d.message,
        },
        (status, _) => LlmError::Transport {
            status: Some(status.as_u16()),
            detail: body,
        },
    }
}

#[async_trait]
impl LlmProvider for GeminiClient {
    async fn stream_generate(&self, request: GenerateRequest) -> Result<EventStream, LlmError> {
        self.make_streaming_request(request).await
    }
}

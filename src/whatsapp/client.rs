//! WhatsApp Cloud API send client

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

use super::error::WhatsAppError;
use super::types::{GraphErrorResponse, SendMessageRequest, SendMessageResponse};

/// Public Graph API endpoint
pub const DEFAULT_GRAPH_BASE_URL: &str = "https://graph.facebook.com";
pub const DEFAULT_GRAPH_API_VERSION: &str = "v17.0";

/// Anything that can deliver a text reply to a WhatsApp user
#[async_trait]
pub trait MessageSender: Send + Sync {
    /// Send `body` to the user `to` from the business number `phone_number_id`
    async fn send_text(
        &self,
        phone_number_id: &str,
        to: &str,
        body: &str,
    ) -> Result<SendMessageResponse, WhatsAppError>;
}

/// Graph API client authenticated with a bearer access token
pub struct WhatsAppClient {
    http_client: Client,
    access_token: String,
    base_url: String,
    api_version: String,
}

impl WhatsAppClient {
    /// Create a new client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(
        access_token: impl Into<String>,
        base_url: impl Into<String>,
        api_version: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, WhatsAppError> {
        let http_client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(timeout)
            .build()
            .map_err(|e| WhatsAppError::Http {
                status: 0,
                body: format!("Failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            http_client,
            access_token: access_token.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_version: api_version.into(),
        })
    }

    fn messages_url(&self, phone_number_id: &str) -> String {
        format!(
            "{}/{}/{}/messages",
            self.base_url, self.api_version, phone_number_id
        )
    }
}

/// Map a non-2xx Graph API response to a [`WhatsAppError`]
fn error_from_status(status: u16, body: String) -> WhatsAppError {
    match serde_json::from_str::<GraphErrorResponse>(&body) {
        Ok(GraphErrorResponse { error }) => WhatsAppError::Api {
            status,
            code: error.code,
            message: error.message,
        },
        Err(_) => WhatsAppError::Http { status, body },
    }
}

/// Decode a 2xx send response
///
/// The message was accepted either way, so an unreadable body only loses
/// the outbound message id.
fn parse_receipt(body: &str) -> SendMessageResponse {
    serde_json::from_str(body).unwrap_or_else(|e| {
        warn!(error = %e, body, "unreadable send receipt");
        SendMessageResponse::default()
    })
}

#[async_trait]
impl MessageSender for WhatsAppClient {
    async fn send_text(
        &self,
        phone_number_id: &str,
        to: &str,
        body: &str,
    ) -> Result<SendMessageResponse, WhatsAppError> {
        let url = self.messages_url(phone_number_id);
        debug!(%url, to, "sending WhatsApp text message");

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(&SendMessageRequest::text(to, body))
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(error_from_status(status.as_u16(), text));
        }

        Ok(parse_receipt(&text))
    }
}

//! Shared, immutable handler state

use std::sync::Arc;
use tracing::warn;

use crate::config::AppConfig;
use crate::error::StartupError;
use crate::llm::{GeminiClient, LlmProvider};
use crate::relay::Relay;
use crate::whatsapp::{MessageSender, WhatsAppClient};

#[derive(Clone)]
pub struct AppState {
    pub verify_token: Arc<str>,
    pub relay: Arc<Relay>,
}

impl AppState {
    pub fn new(verify_token: impl Into<Arc<str>>, relay: Relay) -> Self {
        Self {
            verify_token: verify_token.into(),
            relay: Arc::new(relay),
        }
    }

    /// Build the real Gemini and WhatsApp clients from configuration
    ///
    /// A missing Gemini key is not an error: the relay simply has no model.
    pub fn from_config(config: &AppConfig) -> Result<Self, StartupError> {
        let llm: Option<Arc<dyn LlmProvider>> = match &config.gemini_key {
            Some(key) => {
                let client = GeminiClient::new(
                    key.clone(),
                    config.gemini_model.clone(),
                    config.gemini_base_url.clone(),
                    config.http_timeout,
                )?;
                Some(Arc::new(client) as Arc<dyn LlmProvider>)
            }
            None => {
                warn!("GEMINI_KEY is not set; incoming messages will not be answered");
                None
            }
        };

        let sender: Arc<dyn MessageSender> = Arc::new(WhatsAppClient::new(
            config.whatsapp_token.clone(),
            config.graph_base_url.clone(),
            config.graph_api_version.clone(),
            config.http_timeout,
        )?);

        let relay = Relay::new(llm, sender)
            .with_generation_config(config.generation.clone())
            .with_default_phone_number_id(config.phone_number_id.clone());

        Ok(Self::new(config.verify_token.as_str(), relay))
    }
}

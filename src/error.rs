use thiserror::Error;

use crate::config::ConfigError;
use crate::llm::LlmError;
use crate::whatsapp::WhatsAppError;

/// Why a single reply could not be relayed
#[derive(Debug, Error)]
pub enum RelayError {
    /// No `GEMINI_KEY` was configured at startup
    #[error("Gemini API key is not configured")]
    ModelNotConfigured,

    /// Neither the envelope nor the configuration names a business number
    #[error("No phone_number_id to send the reply from")]
    MissingPhoneNumberId,

    #[error("Model request failed: {0}")]
    Llm(#[from] LlmError),

    #[error("WhatsApp send failed: {0}")]
    WhatsApp(#[from] WhatsAppError),
}

/// Failures that stop the service before it starts listening
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to build Gemini client: {0}")]
    Llm(#[from] LlmError),

    #[error("failed to build WhatsApp client: {0}")]
    WhatsApp(#[from] WhatsAppError),
}

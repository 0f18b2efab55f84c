//! Process configuration read from the environment

use std::env;
use std::time::Duration;
use thiserror::Error;

use crate::llm::gemini::{GeminiModel, DEFAULT_BASE_URL};
use crate::llm::GenerationConfig;
use crate::whatsapp::{DEFAULT_GRAPH_API_VERSION, DEFAULT_GRAPH_BASE_URL};

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// Everything the service needs, built once at startup
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Bearer token for the WhatsApp Cloud API
    pub whatsapp_token: String,
    /// Shared secret for webhook verification
    pub verify_token: String,
    /// Gemini API key; `None` disables replies
    pub gemini_key: Option<String>,
    pub port: u16,
    pub gemini_model: GeminiModel,
    pub gemini_base_url: String,
    /// Sampling parameters for every completion
    pub generation: GenerationConfig,
    pub graph_base_url: String,
    pub graph_api_version: String,
    /// Sender number used when a webhook omits `metadata.phone_number_id`
    pub phone_number_id: Option<String>,
    /// Total timeout for each outbound request
    pub http_timeout: Duration,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable source
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let require = |name: &'static str| get(name).ok_or(ConfigError::Missing(name));

        let port = match get("PORT") {
            Some(value) => value.trim().parse::<u16>().map_err(|_| ConfigError::Invalid {
                name: "PORT",
                value,
            })?,
            None => DEFAULT_PORT,
        };

        let http_timeout = match get("HTTP_TIMEOUT_SECS") {
            Some(value) => match value.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(ConfigError::Invalid {
                        name: "HTTP_TIMEOUT_SECS",
                        value,
                    })
                }
            },
            None => Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        };

        let max_tokens = match get("GEMINI_MAX_TOKENS") {
            Some(value) => match value.trim().parse::<u32>() {
                Ok(n) if n > 0 => Some(n),
                _ => {
                    return Err(ConfigError::Invalid {
                        name: "GEMINI_MAX_TOKENS",
                        value,
                    })
                }
            },
            None => None,
        };

        let temperature = match get("GEMINI_TEMPERATURE") {
            Some(value) => match value.trim().parse::<f32>() {
                Ok(t) if (0.0..=2.0).contains(&t) => Some(t),
                _ => {
                    return Err(ConfigError::Invalid {
                        name: "GEMINI_TEMPERATURE",
                        value,
                    })
                }
            },
            None => None,
        };

        Ok(Self {
            whatsapp_token: require("WHATSAPP_TOKEN")?,
            verify_token: require("VERIFY_TOKEN")?,
            gemini_key: get("GEMINI_KEY"),
            port,
            gemini_model: get("GEMINI_MODEL")
                .map(|id| GeminiModel::from_id(id.trim()))
                .unwrap_or_default(),
            gemini_base_url: get("GEMINI_API_BASE_URL")
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            generation: GenerationConfig {
                max_tokens,
                temperature,
            },
            graph_base_url: get("GRAPH_API_BASE_URL")
                .unwrap_or_else(|| DEFAULT_GRAPH_BASE_URL.to_string()),
            graph_api_version: get("GRAPH_API_VERSION")
                .unwrap_or_else(|| DEFAULT_GRAPH_API_VERSION.to_string()),
            phone_number_id: get("WHATSAPP_PHONE_NUMBER_ID"),
            http_timeout,
        })
    }
}

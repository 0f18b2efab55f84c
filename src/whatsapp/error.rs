use thiserror::Error;

/// Errors from the WhatsApp Cloud API client
#[derive(Debug, Error)]
pub enum WhatsAppError {
    /// Graph API rejected the request with a structured error
    #[error("Graph API error (status {status}, code {code}): {message}")]
    Api {
        status: u16,
        code: i64,
        message: String,
    },

    /// Transport failure or an unstructured non-2xx response
    #[error("HTTP error (status {status}): {body}")]
    Http { status: u16, body: String },
}

impl From<reqwest::Error> for WhatsAppError {
    fn from(err: reqwest::Error) -> Self {
        WhatsAppError::Http {
            status: err.status().map(|s| s.as_u16()).unwrap_or(0),
            body: err.to_string(),
        }
    }
}

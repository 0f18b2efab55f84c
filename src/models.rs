// Request types for the HTTP surface

use serde::Deserialize;

/// Mode value the platform sends when subscribing a webhook
pub const SUBSCRIBE_MODE: &str = "subscribe";

/// Liveness text served on `GET /`
pub const LIVENESS_TEXT: &str = "A Lúcia está acordada e pronta para vender! 🚀";

// Query of GET /webhook
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VerifyQuery {
    #[serde(rename = "hub.mode")]
    pub mode: Option<String>,
    #[serde(rename = "hub.verify_token")]
    pub verify_token: Option<String>,
    #[serde(rename = "hub.challenge")]
    pub challenge: Option<String>,
}

impl VerifyQuery {
    /// The challenge to echo back, if this is a valid subscription handshake
    ///
    /// A valid handshake without a challenge echoes the empty string.
    pub fn challenge_for(self, expected_token: &str) -> Option<String> {
        let subscribing = self.mode.as_deref() == Some(SUBSCRIBE_MODE);
        let token_matches = self.verify_token.as_deref() == Some(expected_token);
        if subscribing && token_matches {
            Some(self.challenge.unwrap_or_default())
        } else {
            None
        }
    }
}

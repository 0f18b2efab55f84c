//! Generation configuration parameters

use serde::{Deserialize, Serialize};

/// Sampling parameters sent with every request
///
/// Unset fields are left to the model's defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Output token limit
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    /// 0.0-2.0, higher is more random
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

impl GenerationConfig {
    /// True when no parameter is set
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

//! LLM Abstraction Layer
//!
//! A small provider interface plus a client for Google Gemini models served
//! by the Gemini Developer API (API-key authenticated).

pub mod core;
pub mod gemini;

// Re-export commonly used types
pub use core::{
    config::GenerationConfig,
    error::LlmError,
    provider::{EventStream, LlmProvider},
    types::{Completion, FinishReason, GenerateRequest, StreamEvent, UsageMetadata},
};
pub use gemini::{GeminiClient, GeminiModel};

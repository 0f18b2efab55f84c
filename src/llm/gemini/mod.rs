//! Gemini provider implementation
//!
//! Client for Google's Gemini models via the Gemini Developer API,
//! implementing the LlmProvider trait.

pub mod client;
pub mod mapper;
pub mod sse;
pub mod types;

pub use client::{GeminiClient, GeminiModel, DEFAULT_BASE_URL};

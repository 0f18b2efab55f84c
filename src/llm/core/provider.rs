//! Provider trait for LLM implementations

use async_trait::async_trait;
use futures::stream::Stream;
use futures::StreamExt;
use std::pin::Pin;

use super::{
    error::LlmError,
    types::{Completion, GenerateRequest, StreamEvent},
};

/// Boxed stream of generation events
pub type EventStream = Pin<Box<dyn Stream<Item = Result<StreamEvent, LlmError>> + Send>>;

/// Main interface that all LLM provider implementations must satisfy
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Stream generate content from the LLM
    ///
    /// Sends the request and returns a stream of events representing the
    /// incremental response.
    async fn stream_generate(&self, request: GenerateRequest) -> Result<EventStream, LlmError>;

    /// Generate content and wait for the whole response
    ///
    /// Drains [`LlmProvider::stream_generate`] and concatenates the text
    /// deltas. The first error in the stream aborts collection.
    async fn generate(&self, request: GenerateRequest) -> Result<Completion, LlmError> {
        let mut stream = self.stream_generate(request).await?;
        let mut completion = Completion::default();
        while let Some(event) = stream.next().await {
            completion.push(event?);
        }
        Ok(completion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::core::config::GenerationConfig;
    use crate::llm::core::types::FinishReason;

    struct Scripted(Vec<Result<StreamEvent, String>>);

    #[async_trait]
    impl LlmProvider for Scripted {
        async fn stream_generate(
            &self,
            _request: GenerateRequest,
        ) -> Result<EventStream, LlmError> {
            let events: Vec<Result<StreamEvent, LlmError>> = self
                .0
                .iter()
                .cloned()
                .map(|r| r.map_err(LlmError::Stream))
                .collect();
            Ok(Box::pin(futures::stream::iter(events)))
        }
    }

    fn request() -> GenerateRequest {
        GenerateRequest::new("hi", GenerationConfig::default())
    }

    #[tokio::test]
    async fn test_generate_collects_stream() {
        let provider = Scripted(vec![
            Ok(StreamEvent::TextDelta {
                text: "Olá".to_string(),
            }),
            Ok(StreamEvent::TextDelta {
                text: "!".to_string(),
            }),
            Ok(StreamEvent::MessageEnd {
                finish_reason: FinishReason::Stop,
                usage: None,
            }),
        ]);

        let completion = provider.generate(request()).await.unwrap();
        assert_eq!(completion.text(), Some("Olá!"));
        assert_eq!(completion.finish_reason, Some(FinishReason::Stop));
    }

    #[tokio::test]
    async fn test_generate_stops_on_stream_error() {
        let provider = Scripted(vec![
            Ok(StreamEvent::TextDelta {
                text: "partial".to_string(),
            }),
            Err("connection reset".to_string()),
        ]);

        let err = provider.generate(request()).await.unwrap_err();
        assert!(matches!(err, LlmError::Stream(_)));
    }
}

//! Mapping between abstraction types and Gemini types

use crate::llm::core::{
    config::GenerationConfig,
    types::{FinishReason, GenerateRequest, StreamEvent, UsageMetadata},
};

use super::types::{
    Content, GeminiGenerationConfig, GenerateContentRequest, GenerateContentResponse, Part,
};

/// Convert our abstraction request to Gemini's request format
///
/// The prompt becomes a single `user` turn.
pub fn to_gemini_request(request: GenerateRequest) -> GenerateContentRequest {
    let generation_config = if request.config.is_empty() {
        None
    } else {
        Some(to_gemini_generation_config(request.config))
    };

    GenerateContentRequest {
        contents: vec![Content {
            role: "user".to_string(),
            parts: vec![Part::text(request.prompt)],
        }],
        generation_config,
    }
}

fn to_gemini_generation_config(config: GenerationConfig) -> GeminiGenerationConfig {
    GeminiGenerationConfig {
        max_output_tokens: config.max_tokens,
        temperature: config.temperature,
    }
}

/// Convert one Gemini response chunk to our stream events
///
/// Text parts of the first candidate become text deltas (thought parts are
/// dropped). A finish reason on the candidate, or a blocked prompt, ends the
/// message.
pub fn from_gemini_response(response: GenerateContentResponse) -> Vec<StreamEvent> {
    let mut events = Vec::new();
    let usage = response.usage_metadata.map(|u| UsageMetadata {
        input_tokens: u.prompt_token_count,
        output_tokens: u.candidates_token_count,
        total_tokens: u.total_token_count,
    });

    if let Some(block_reason) = response.prompt_feedback.and_then(|f| f.block_reason) {
        events.push(StreamEvent::MessageEnd {
            finish_reason: FinishReason::Other(block_reason),
            usage,
        });
        return events;
    }

    let Some(candidate) = response.candidates.into_iter().next() else {
        return events;
    };

    for part in candidate.content.parts {
        if part.thought {
            continue;
        }
        if let Some(text) = part.text {
            events.push(StreamEvent::TextDelta { text });
        }
    }

    if let Some(reason) = candidate.finish_reason {
        events.push(StreamEvent::MessageEnd {
            finish_reason: map_finish_reason(&reason),
            usage,
        });
    }

    events
}

fn map_finish_reason(reason: &str) -> FinishReason {
    match reason {
        "STOP" => FinishReason::Stop,
        "MAX_TOKENS" => FinishReason::MaxTokens,
        "SAFETY" | "PROHIBITED_CONTENT" | "BLOCKLIST" | "SPII" => FinishReason::Safety,
        other => FinishReason::Other(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::gemini::types::{Candidate, PromptFeedback};

    fn response(parts: Vec<Part>, finish_reason: Option<&str>) -> GenerateContentResponse {
        GenerateContentResponse {
            candidates: vec![Candidate {
                content: Content {
                    role: "model".to_string(),
                    parts,
                },
                finish_reason: finish_reason.map(str::to_string),
            }],
            usage_metadata: None,
            prompt_feedback: None,
        }
    }

    #[test]
    fn test_to_gemini_request_plain_prompt() {
        let request = GenerateRequest::new("Cliente disse: oi", GenerationConfig::default());
        let gemini_request = to_gemini_request(request);

        assert_eq!(gemini_request.contents.len(), 1);
        assert_eq!(gemini_request.contents[0].role, "user");
        assert_eq!(
            gemini_request.contents[0].parts[0].text.as_deref(),
            Some("Cliente disse: oi")
        );
        assert!(gemini_request.generation_config.is_none());
    }

    #[test]
    fn test_to_gemini_request_with_config() {
        let config = GenerationConfig {
            max_tokens: Some(300),
            temperature: Some(0.4),
        };
        let gemini_request = to_gemini_request(GenerateRequest::new("oi", config));

        let config = gemini_request.generation_config.unwrap();
        assert_eq!(config.max_output_tokens, Some(300));
        assert_eq!(config.temperature, Some(0.4));
    }

    #[test]
    fn test_map_finish_reason() {
        assert_eq!(map_finish_reason("STOP"), FinishReason::Stop);
        assert_eq!(map_finish_reason("MAX_TOKENS"), FinishReason::MaxTokens);
        assert_eq!(map_finish_reason("SAFETY"), FinishReason::Safety);
        assert_eq!(
            map_finish_reason("RECITATION"),
            FinishReason::Other("RECITATION".to_string())
        );
    }

    #[test]
    fn test_from_gemini_response_text() {
        let events = from_gemini_response(response(vec![Part::text("Olá!")], None));
        assert_eq!(
            events,
            vec![StreamEvent::TextDelta {
                text: "Olá!".to_string()
            }]
        );
    }

    #[test]
    fn test_from_gemini_response_skips_thoughts() {
        let thought = Part {
            text: Some("thinking...".to_string()),
            thought: true,
        };
        let events = from_gemini_response(response(vec![thought, Part::text("Oi")], None));
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_from_gemini_response_with_finish() {
        let mut chunk = response(vec![Part::text("Fim")], Some("STOP"));
        chunk.usage_metadata = Some(super::super::types::UsageMetadata {
            prompt_token_count: 10,
            candidates_token_count: 5,
            total_token_count: 15,
        });

        let events = from_gemini_response(chunk);
        assert_eq!(events.len(), 2);
        match &events[1] {
            StreamEvent::MessageEnd {
                finish_reason,
                usage,
            } => {
                assert_eq!(*finish_reason, FinishReason::Stop);
                assert_eq!(usage.unwrap().total_tokens, 15);
            }
            _ => panic!("Expected message end"),
        }
    }

    #[test]
    fn test_from_gemini_response_blocked_prompt() {
        let chunk = GenerateContentResponse {
            candidates: vec![],
            usage_metadata: None,
            prompt_feedback: Some(PromptFeedback {
                block_reason: Some("SAFETY".to_string()),
            }),
        };

        let events = from_gemini_response(chunk);
        assert_eq!(
            events,
            vec![StreamEvent::MessageEnd {
                finish_reason: FinishReason::Other("SAFETY".to_string()),
                usage: None,
            }]
        );
    }

    #[test]
    fn test_from_gemini_response_empty() {
        assert!(from_gemini_response(GenerateContentResponse::default()).is_empty());
    }
}

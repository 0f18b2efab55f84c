//! Model call followed by WhatsApp send, for one customer message

use std::sync::Arc;
use tracing::{debug, info};

use crate::error::RelayError;
use crate::llm::{GenerateRequest, GenerationConfig, LlmProvider};
use crate::persona::{build_prompt, reply_or_fallback};
use crate::whatsapp::{InboundMessage, MessageSender};

/// Turns a customer's text message into a persona reply on the same chat
pub struct Relay {
    /// `None` when no model API key is configured
    llm: Option<Arc<dyn LlmProvider>>,
    sender: Arc<dyn MessageSender>,
    generation: GenerationConfig,
    /// Used when the envelope carries no `phone_number_id`
    default_phone_number_id: Option<String>,
}

impl Relay {
    pub fn new(llm: Option<Arc<dyn LlmProvider>>, sender: Arc<dyn MessageSender>) -> Self {
        Self {
            llm,
            sender,
            generation: GenerationConfig::default(),
            default_phone_number_id: None,
        }
    }

    pub fn with_generation_config(mut self, generation: GenerationConfig) -> Self {
        self.generation = generation;
        self
    }

    pub fn with_default_phone_number_id(mut self, phone_number_id: Option<String>) -> Self {
        self.default_phone_number_id = phone_number_id;
        self
    }

    pub fn has_model(&self) -> bool {
        self.llm.is_some()
    }

    /// Ask the model for a reply to `text` and send it to `message.from`
    ///
    /// The send only happens after the model has answered; an empty answer is
    /// replaced by the fallback reply. Returns the id of the sent message
    /// when the platform reports one.
    ///
    /// # Errors
    ///
    /// Fails without sending when the model is not configured, no business
    /// number id is known, or the model call fails. Fails after the model
    /// call when the send is rejected.
    pub async fn reply(
        &self,
        message: &InboundMessage,
        text: &str,
    ) -> Result<Option<String>, RelayError> {
        let llm = self.llm.as_ref().ok_or(RelayError::ModelNotConfigured)?;
        let phone_number_id = message
            .phone_number_id
            .as_deref()
            .or(self.default_phone_number_id.as_deref())
            .ok_or(RelayError::MissingPhoneNumberId)?;

        let request = GenerateRequest::new(build_prompt(text), self.generation.clone());
        let completion = llm.generate(request).await?;
        debug!(
            finish_reason = ?completion.finish_reason,
            usage = ?completion.usage,
            "model completion received"
        );

        let reply = reply_or_fallback(completion.text());
        let response = self
            .sender
            .send_text(phone_number_id, &message.from, &reply)
            .await?;

        let sent_id = response.message_id().map(str::to_string);
        info!(to = %message.from, sent_id = ?sent_id, "reply sent");
        Ok(sent_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{EventStream, LlmError, StreamEvent};
    use crate::whatsapp::{MessageKind, SendMessageResponse, WhatsAppError};
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct FixedModel(&'static str);

    #[async_trait]
    impl LlmProvider for FixedModel {
        async fn stream_generate(
            &self,
            _request: GenerateRequest,
        ) -> Result<EventStream, LlmError> {
            let events = vec![Ok(StreamEvent::TextDelta {
                text: self.0.to_string(),
            })];
            Ok(Box::pin(futures::stream::iter(events)))
        }
    }

    #[derive(Default)]
    struct RecordingSender {
        sent: Mutex<Vec<(String, String, String)>>,
    }

    #[async_trait]
    impl MessageSender for RecordingSender {
        async fn send_text(
            &self,
            phone_number_id: &str,
            to: &str,
            body: &str,
        ) -> Result<SendMessageResponse, WhatsAppError> {
            self.sent.lock().unwrap().push((
                phone_number_id.to_string(),
                to.to_string(),
                body.to_string(),
            ));
            Ok(SendMessageResponse::default())
        }
    }

    fn model(reply: &'static str) -> Option<Arc<dyn LlmProvider>> {
        Some(Arc::new(FixedModel(reply)) as Arc<dyn LlmProvider>)
    }

    fn message(phone_number_id: Option<&str>) -> InboundMessage {
        InboundMessage {
            from: "5511988887777".to_string(),
            id: "wamid.in".to_string(),
            kind: MessageKind::Text("oi".to_string()),
            timestamp: None,
            phone_number_id: phone_number_id.map(str::to_string),
            contact_name: None,
        }
    }

    #[tokio::test]
    async fn test_reply_sends_model_text() {
        let sender = Arc::new(RecordingSender::default());
        let relay = Relay::new(model("Olá! 😊"), sender.clone());

        relay.reply(&message(Some("123")), "oi").await.unwrap();

        let sent = sender.sent.lock().unwrap();
        assert_eq!(
            *sent,
            vec![(
                "123".to_string(),
                "5511988887777".to_string(),
                "Olá! 😊".to_string()
            )]
        );
    }

    #[tokio::test]
    async fn test_reply_uses_default_phone_number_id() {
        let sender = Arc::new(RecordingSender::default());
        let relay = Relay::new(model("ok"), sender.clone())
            .with_default_phone_number_id(Some("999".to_string()));

        relay.reply(&message(None), "oi").await.unwrap();
        assert_eq!(sender.sent.lock().unwrap()[0].0, "999");
    }

    #[tokio::test]
    async fn test_reply_without_phone_number_id() {
        let sender = Arc::new(RecordingSender::default());
        let relay = Relay::new(model("ok"), sender.clone());

        let err = relay.reply(&message(None), "oi").await.unwrap_err();
        assert!(matches!(err, RelayError::MissingPhoneNumberId));
        assert!(sender.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_reply_prompt_and_generation_config() {
        #[derive(Default)]
        struct CapturingModel {
            requests: Mutex<Vec<GenerateRequest>>,
        }

        #[async_trait]
        impl LlmProvider for CapturingModel {
            async fn stream_generate(
                &self,
                request: GenerateRequest,
            ) -> Result<EventStream, LlmError> {
                self.requests.lock().unwrap().push(request);
                Ok(Box::pin(futures::stream::empty::<Result<StreamEvent, LlmError>>()))
            }
        }

        let llm = Arc::new(CapturingModel::default());
        let sender = Arc::new(RecordingSender::default());
        let relay = Relay::new(Some(llm.clone() as Arc<dyn LlmProvider>), sender.clone())
            .with_generation_config(GenerationConfig {
                temperature: Some(0.4),
                ..Default::default()
            });

        relay.reply(&message(Some("123")), "tem desconto?").await.unwrap();

        let requests = llm.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].config.temperature, Some(0.4));
        assert!(requests[0].prompt.ends_with("Cliente disse: \"tem desconto?\""));

        // Empty model output falls back
        assert_eq!(sender.sent.lock().unwrap()[0].2, crate::persona::FALLBACK_REPLY);
    }

    #[tokio::test]
    async fn test_reply_without_model() {
        let sender = Arc::new(RecordingSender::default());
        let relay = Relay::new(None, sender.clone());
        assert!(!relay.has_model());

        let err = relay.reply(&message(Some("123")), "oi").await.unwrap_err();
        assert!(matches!(err, RelayError::ModelNotConfigured));
        assert!(sender.sent.lock().unwrap().is_empty());
    }
}

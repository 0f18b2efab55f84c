//! In-process doubles for the model and the WhatsApp sender
//!
//! Both record into one shared [`CallLog`] so tests can assert on call order.

#![allow(dead_code)]

use async_trait::async_trait;
use lucia::llm::{EventStream, GenerateRequest, LlmError, LlmProvider, StreamEvent};
use lucia::relay::Relay;
use lucia::state::AppState;
use lucia::whatsapp::{MessageSender, SendMessageResponse, WhatsAppError};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

pub const VERIFY_TOKEN: &str = "segredo";
pub const PHONE_NUMBER_ID: &str = "106540352242922";
pub const CUSTOMER: &str = "5511988887777";

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Model { prompt: String },
    Send {
        phone_number_id: String,
        to: String,
        body: String,
    },
}

pub type CallLog = Arc<Mutex<Vec<Call>>>;

/// What the mock model does when called
pub enum ModelBehavior {
    Reply(&'static str),
    Fail,
}

pub struct MockModel {
    log: CallLog,
    behavior: ModelBehavior,
}

#[async_trait]
impl LlmProvider for MockModel {
    async fn stream_generate(&self, request: GenerateRequest) -> Result<EventStream, LlmError> {
        self.log.lock().unwrap().push(Call::Model {
            prompt: request.prompt,
        });

        match self.behavior {
            ModelBehavior::Reply(text) => {
                let events = vec![Ok(StreamEvent::TextDelta {
                    text: text.to_string(),
                })];
                Ok(Box::pin(futures::stream::iter(events)))
            }
            ModelBehavior::Fail => Err(LlmError::Transport {
                status: Some(500),
                detail: "internal error".to_string(),
            }),
        }
    }
}

pub struct MockSender {
    log: CallLog,
    fail: bool,
}

#[async_trait]
impl MessageSender for MockSender {
    async fn send_text(
        &self,
        phone_number_id: &str,
        to: &str,
        body: &str,
    ) -> Result<SendMessageResponse, WhatsAppError> {
        self.log.lock().unwrap().push(Call::Send {
            phone_number_id: phone_number_id.to_string(),
            to: to.to_string(),
            body: body.to_string(),
        });

        if self.fail {
            return Err(WhatsAppError::Api {
                status: 401,
                code: 190,
                message: "Invalid OAuth access token".to_string(),
            });
        }
        Ok(serde_json::from_value(json!({
            "messaging_product": "whatsapp",
            "messages": [{"id": "wamid.out"}]
        }))
        .unwrap())
    }
}

/// Handler state wired to mocks; `model: None` means no API key configured
pub fn state_with(model: Option<ModelBehavior>, send_fails: bool) -> (AppState, CallLog) {
    let log: CallLog = Arc::default();
    let llm = model.map(|behavior| {
        Arc::new(MockModel {
            log: log.clone(),
            behavior,
        }) as Arc<dyn LlmProvider>
    });
    let sender = Arc::new(MockSender {
        log: log.clone(),
        fail: send_fails,
    });

    let relay = Relay::new(llm, sender);
    (AppState::new(VERIFY_TOKEN, relay), log)
}

pub fn calls(log: &CallLog) -> Vec<Call> {
    log.lock().unwrap().clone()
}

/// A delivery carrying one message with the given type-specific fields
pub fn envelope_with(message: Value) -> Value {
    json!({
        "object": "whatsapp_business_account",
        "entry": [{
            "id": "102290129340398",
            "changes": [{
                "field": "messages",
                "value": {
                    "messaging_product": "whatsapp",
                    "metadata": {
                        "display_phone_number": "15550783881",
                        "phone_number_id": PHONE_NUMBER_ID
                    },
                    "contacts": [{"profile": {"name": "Maria"}, "wa_id": CUSTOMER}],
                    "messages": [message]
                }
            }]
        }]
    })
}

pub fn text_envelope(body: &str) -> Value {
    envelope_with(json!({
        "from": CUSTOMER,
        "id": "wamid.in",
        "timestamp": "1749416383",
        "type": "text",
        "text": {"body": body}
    }))
}

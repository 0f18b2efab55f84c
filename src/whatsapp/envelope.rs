//! Inbound webhook envelope from the WhatsApp Cloud API
//!
//! A delivery batches one or more `entry` items, each carrying `changes`
//! whose `value` may hold `messages` (customer messages) or `statuses`
//! (delivery receipts). Only the first message of the first change of the
//! first entry is ever read, through [`WebhookEnvelope::first_message`].

use chrono::{DateTime, Utc};
use serde::de::{DeserializeOwned, Deserializer};
use serde::Deserialize;
use serde_json::Value;

/// Deserialize a field, falling back to its default when the JSON type is
/// wrong
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// A raw webhook body
///
/// Only the path to the first message is interpreted, so unexpected shapes
/// elsewhere in the delivery do not matter.
#[derive(Debug, Clone, Default)]
pub struct WebhookEnvelope {
    body: Value,
}

/// `value` of a change: the part of a delivery that carries messages
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChangeValue {
    #[serde(default, deserialize_with = "lenient")]
    pub metadata: Option<Metadata>,
    #[serde(default, deserialize_with = "lenient")]
    pub contacts: Vec<Contact>,
    /// Kept raw so one odd message cannot hide the first one
    #[serde(default, deserialize_with = "lenient")]
    pub messages: Vec<Value>,
}

/// The business phone number that received the message
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Metadata {
    #[serde(default, deserialize_with = "lenient")]
    pub display_phone_number: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub phone_number_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Contact {
    #[serde(default, deserialize_with = "lenient")]
    pub wa_id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub profile: Option<Profile>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Profile {
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
}

/// A customer message as delivered by the platform
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Message {
    /// Sender's WhatsApp id (phone number)
    #[serde(default, deserialize_with = "lenient")]
    pub from: String,
    #[serde(default, deserialize_with = "lenient")]
    pub id: String,
    /// Unix seconds; a string on the wire, occasionally a number
    #[serde(default)]
    pub timestamp: Value,
    #[serde(rename = "type", default, deserialize_with = "lenient")]
    pub kind: String,
    #[serde(default, deserialize_with = "lenient")]
    pub text: Option<TextContent>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TextContent {
    #[serde(default, deserialize_with = "lenient")]
    pub body: Option<String>,
}

/// What an inbound message carries
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageKind {
    /// A text message with its body
    Text(String),
    /// Any other type tag (image, audio, reaction, ...), or a text message
    /// without a body
    Unsupported(String),
}

/// The message a delivery asks us to answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    /// Sender's WhatsApp id; replies are addressed here
    pub from: String,
    pub id: String,
    pub kind: MessageKind,
    pub timestamp: Option<String>,
    /// Business number id the reply is sent from
    pub phone_number_id: Option<String>,
    pub contact_name: Option<String>,
}

impl InboundMessage {
    /// Text body, if this is a text message
    pub fn text(&self) -> Option<&str> {
        match &self.kind {
            MessageKind::Text(body) => Some(body),
            MessageKind::Unsupported(_) => None,
        }
    }

    /// When the customer sent the message
    pub fn sent_at(&self) -> Option<DateTime<Utc>> {
        let secs = self.timestamp.as_deref()?.parse::<i64>().ok()?;
        DateTime::from_timestamp(secs, 0)
    }
}

/// Whether a raw webhook body carries a truthy top-level `object` marker
///
/// Absent, `null`, `false`, `0` and `""` all count as missing.
pub fn has_object_marker(body: &Value) -> bool {
    match body.get("object") {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

impl WebhookEnvelope {
    pub fn new(body: Value) -> Self {
        Self { body }
    }

    /// `value` of the first change of the first entry
    ///
    /// `None` when any level on that path is missing or not the expected
    /// JSON type. Later entries and changes are never looked at.
    fn first_change(&self) -> Option<ChangeValue> {
        let value = self
            .body
            .get("entry")?
            .get(0)?
            .get("changes")?
            .get(0)?
            .get("value")?;
        ChangeValue::deserialize(value).ok()
    }

    /// First message of the first change of the first entry
    ///
    /// Returns `None` when the delivery carries no message (status updates,
    /// empty batches), the message is not an object, or it has no sender.
    pub fn first_message(&self) -> Option<InboundMessage> {
        let value = self.first_change()?;
        let message = Message::deserialize(value.messages.first()?).ok()?;
        if message.from.is_empty() {
            return None;
        }

        let kind = match (message.kind.as_str(), message.text) {
            ("text", Some(TextContent { body: Some(body) })) => MessageKind::Text(body),
            (other, _) => MessageKind::Unsupported(other.to_string()),
        };

        let timestamp = match message.timestamp {
            Value::String(s) => Some(s),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        };

        let contact_name = value
            .contacts
            .iter()
            .find(|c| c.wa_id.as_deref() == Some(message.from.as_str()))
            .or_else(|| value.contacts.first())
            .and_then(|c| c.profile.as_ref())
            .and_then(|p| p.name.clone());

        Some(InboundMessage {
            from: message.from,
            id: message.id,
            kind,
            timestamp,
            phone_number_id: value
                .metadata
                .and_then(|m| m.phone_number_id)
                .filter(|id| !id.is_empty()),
            contact_name,
        })
    }
}

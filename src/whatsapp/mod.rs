//! WhatsApp Cloud API: inbound webhook envelope and outbound send client

pub mod client;
pub mod envelope;
pub mod error;
pub mod types;

pub use client::{
    MessageSender, WhatsAppClient, DEFAULT_GRAPH_API_VERSION, DEFAULT_GRAPH_BASE_URL,
};
pub use envelope::{has_object_marker, InboundMessage, MessageKind, WebhookEnvelope};
pub use error::WhatsAppError;
pub use types::{SendMessageRequest, SendMessageResponse};

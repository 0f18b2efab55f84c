// Handlers module

pub mod health;
pub mod receive_message;
pub mod verify_webhook;

pub use health::health_handler;
pub use receive_message::receive_message_handler;
pub use verify_webhook::verify_webhook_handler;

// POST /webhook handler

use crate::relay::Relay;
use crate::state::AppState;
use crate::whatsapp::{has_object_marker, WebhookEnvelope};
use serde_json::Value;
use std::convert::Infallible;
use tracing::{debug, error, info, info_span, Instrument};
use uuid::Uuid;
use warp::http::StatusCode;

/// Accept a webhook delivery
///
/// Marked deliveries always get 200 so the platform keeps the webhook
/// enabled; relay failures are only logged.
pub async fn receive_message_handler(
    body: Value,
    state: AppState,
) -> Result<impl warp::Reply, Infallible> {
    if !has_object_marker(&body) {
        debug!("webhook body has no object marker");
        return Ok(warp::reply::with_status("Not Found", StatusCode::NOT_FOUND));
    }

    process_delivery(body, &state.relay).await;

    Ok(warp::reply::with_status("OK", StatusCode::OK))
}

async fn process_delivery(body: Value, relay: &Relay) {
    let Some(message) = WebhookEnvelope::new(body).first_message() else {
        debug!("delivery carries no message");
        return;
    };

    let Some(text) = message.text() else {
        debug!(kind = ?message.kind, from = %message.from, "ignoring non-text message");
        return;
    };

    let span = info_span!("relay", delivery_id = %Uuid::new_v4(), message_id = %message.id);

    async {
        info!(
            from = %message.from,
            contact = ?message.contact_name,
            sent_at = ?message.sent_at(),
            text,
            "message received"
        );

        if let Err(e) = relay.reply(&message, text).await {
            error!(error = %e, "failed to relay reply");
        }
    }
    .instrument(span)
    .await;
}

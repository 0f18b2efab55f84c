// Route definitions and handlers

use crate::handlers;
use crate::models::VerifyQuery;
use crate::state::AppState;
use bytes::Bytes;
use serde_json::Value;
use warp::Filter;

/// Largest accepted webhook body
pub const MAX_BODY_BYTES: u64 = 100 * 1024;

pub fn configure_routes(
    state: AppState,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    let with_state = warp::any().map(move || state.clone());

    // GET /
    let health = warp::path::end()
        .and(warp::get())
        .and_then(handlers::health_handler);

    // GET /webhook?hub.mode=...&hub.verify_token=...&hub.challenge=...
    let verify = warp::path("webhook")
        .and(warp::path::end())
        .and(warp::get())
        .and(warp::query::<VerifyQuery>())
        .and(with_state.clone())
        .and_then(handlers::verify_webhook_handler);

    // POST /webhook
    let receive = warp::path("webhook")
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::content_length_limit(MAX_BODY_BYTES))
        .and(warp::header::optional::<String>("content-type"))
        .and(warp::body::bytes())
        .map(webhook_body)
        .and(with_state)
        .and_then(handlers::receive_message_handler);

    health.or(verify).or(receive)
}

/// Parse a webhook body sent as JSON
///
/// A body with a non-JSON content type, or one that does not parse, becomes
/// `null`. It has no object marker and so gets a 404 like any other
/// unrecognised delivery.
fn webhook_body(content_type: Option<String>, body: Bytes) -> Value {
    let is_json = content_type.as_deref().is_some_and(|ct| {
        let mime = ct.split(';').next().unwrap_or_default().trim();
        mime.eq_ignore_ascii_case("application/json") || mime.ends_with("+json")
    });
    if !is_json {
        return Value::Null;
    }
    serde_json::from_slice(&body).unwrap_or(Value::Null)
}

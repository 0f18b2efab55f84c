// GET /webhook handler (subscription handshake)

use crate::models::VerifyQuery;
use crate::state::AppState;
use std::convert::Infallible;
use tracing::{info, warn};
use warp::http::StatusCode;

pub async fn verify_webhook_handler(
    query: VerifyQuery,
    state: AppState,
) -> Result<impl warp::Reply, Infallible> {
    let mode = query.mode.clone();

    match query.challenge_for(&state.verify_token) {
        Some(challenge) => {
            info!("webhook verified");
            Ok(warp::reply::with_status(challenge, StatusCode::OK))
        }
        None => {
            warn!(mode = ?mode, "webhook verification rejected");
            Ok(warp::reply::with_status(
                "Forbidden".to_string(),
                StatusCode::FORBIDDEN,
            ))
        }
    }
}

// GET / handler

use crate::models::LIVENESS_TEXT;
use std::convert::Infallible;

pub async fn health_handler() -> Result<impl warp::Reply, Infallible> {
    Ok(LIVENESS_TEXT)
}

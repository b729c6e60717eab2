//! Route definitions for the transformation relay.

use axum::routing::post;
use axum::Router;

use crate::handlers::transform;
use crate::state::AppState;

/// Relay routes mounted at `/transform-photo`.
///
/// ```text
/// POST /  -> transform_photo
/// ```
///
/// CORS preflight (`OPTIONS`) is answered by the CORS layer.
pub fn router() -> Router<AppState> {
    Router::new().route("/", post(transform::transform_photo))
}

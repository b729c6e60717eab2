//! Handler for the transformation relay endpoint.

use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use photobooth_core::error::CoreError;
use photobooth_core::transform::{TransformPayload, TransformResult};
use photobooth_relay::RelayError;

use crate::error::AppResult;
use crate::state::AppState;

/// POST /api/v1/transform-photo
///
/// Restyle the uploaded photo with the theme prompt, falling back across
/// providers. The body is parsed by hand so that malformed JSON maps to the
/// `UNEXPECTED` kind (500) rather than axum's default 4xx rejection.
pub async fn transform_photo(
    State(state): State<AppState>,
    body: Bytes,
) -> AppResult<Json<TransformResult>> {
    let payload: TransformPayload = serde_json::from_slice(&body)
        .map_err(|e| RelayError::Unexpected(format!("malformed request body: {e}")))?;

    let request = payload.into_request().map_err(|e| match e {
        CoreError::Validation(msg) => RelayError::InvalidInput(msg),
        other => RelayError::Unexpected(other.to_string()),
    })?;

    let result = state.relay.handle(&request).await?;

    tracing::info!(
        theme_id = %request.theme.id,
        image_chars = result.transformed_image.len(),
        "Photo transformed",
    );

    Ok(Json(result))
}

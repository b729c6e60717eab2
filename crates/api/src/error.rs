use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use photobooth_core::error::CoreError;
use photobooth_core::transform::{ErrorBody, TransformErrorKind};
use photobooth_relay::RelayError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`RelayError`] for transformation failures and [`CoreError`] for
/// catalog lookups. Implements [`IntoResponse`] to produce consistent
/// `{error, code}` JSON bodies.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A transformation failure, already normalized by the relay.
    #[error(transparent)]
    Relay(#[from] RelayError),

    /// A domain-level error from `photobooth_core`.
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

const INTERNAL_MESSAGE: &str = "An unexpected error occurred";

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- Relay errors ---
            AppError::Relay(err) => {
                let kind = err.kind();
                let message = match err {
                    RelayError::Unexpected(detail) => {
                        tracing::error!(error = %detail, "Unexpected relay error");
                        INTERNAL_MESSAGE.to_string()
                    }
                    other => other.to_string(),
                };
                (status_of(kind), kind.code(), message)
            }

            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => (
                    StatusCode::BAD_REQUEST,
                    TransformErrorKind::InvalidInput.code(),
                    msg.clone(),
                ),
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        TransformErrorKind::Unexpected.code(),
                        INTERNAL_MESSAGE.to_string(),
                    )
                }
            },
        };

        let body = ErrorBody {
            error: message,
            code: Some(code.to_string()),
        };

        (status, axum::Json(body)).into_response()
    }
}

fn status_of(kind: TransformErrorKind) -> StatusCode {
    StatusCode::from_u16(kind.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

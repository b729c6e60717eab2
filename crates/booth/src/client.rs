//! HTTP client for the relay service.

use std::sync::Arc;

use async_trait::async_trait;
use photobooth_core::transform::{ErrorBody, TransformErrorKind, TransformRequest, TransformResult};

/// Fallback message when the relay gives no usable error text.
const GENERIC_FAILURE: &str = "Failed to transform photo";

/// Failure of a single transformation request.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The relay answered with an error status.
    #[error("{message}")]
    Relay {
        kind: TransformErrorKind,
        message: String,
    },

    /// The relay could not be reached.
    #[error("Could not reach the transformation service: {0}")]
    Request(#[from] reqwest::Error),

    /// The relay answered 2xx with an unusable body.
    #[error("No response from transformation service")]
    InvalidResponse(String),
}

impl ClientError {
    /// Kind the booth branches on; transport failures count as unexpected.
    pub fn kind(&self) -> TransformErrorKind {
        match self {
            Self::Relay { kind, .. } => *kind,
            Self::Request(_) | Self::InvalidResponse(_) => TransformErrorKind::Unexpected,
        }
    }

    /// Text for the error screen.
    pub fn user_message(&self) -> String {
        match self {
            Self::Relay { message, .. } if !message.trim().is_empty() => message.clone(),
            Self::Relay { .. } | Self::InvalidResponse(_) => GENERIC_FAILURE.to_string(),
            Self::Request(_) => self.to_string(),
        }
    }

    /// Build from an error status and its raw body.
    pub fn from_response(status: u16, body: &str) -> Self {
        let parsed: Option<ErrorBody> = serde_json::from_str(body).ok();
        let kind = parsed
            .as_ref()
            .and_then(|b| b.code.as_deref())
            .and_then(TransformErrorKind::from_code)
            .unwrap_or_else(|| TransformErrorKind::from_status(status));
        let message = parsed
            .map(|b| b.error)
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| GENERIC_FAILURE.to_string());
        Self::Relay { kind, message }
    }
}

/// Something that turns a photo and theme into a restyled photo.
#[async_trait]
pub trait Transformer: Send + Sync {
    async fn transform(&self, request: &TransformRequest) -> Result<TransformResult, ClientError>;
}

#[async_trait]
impl<T: Transformer + ?Sized> Transformer for Arc<T> {
    async fn transform(&self, request: &TransformRequest) -> Result<TransformResult, ClientError> {
        (**self).transform(request).await
    }
}

/// Calls `POST /api/v1/transform-photo` on a relay service.
#[derive(Debug, Clone)]
pub struct RelayClient {
    client: reqwest::Client,
    url: String,
}

impl RelayClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), url)
    }

    pub fn with_client(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl Transformer for RelayClient {
    async fn transform(&self, request: &TransformRequest) -> Result<TransformResult, ClientError> {
        tracing::debug!(url = %self.url, theme_id = %request.theme.id, "Sending photo to relay");

        let response = self.client.post(&self.url).json(request).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let err = ClientError::from_response(status.as_u16(), &body);
            tracing::warn!(status = status.as_u16(), kind = %err.kind(), "Relay rejected transformation");
            return Err(err);
        }

        let bytes = response.bytes().await?;
        let result: TransformResult = serde_json::from_slice(&bytes)
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))?;

        if result.transformed_image.trim().is_empty() {
            return Err(ClientError::InvalidResponse("empty transformedImage".to_string()));
        }
        Ok(result)
    }
}

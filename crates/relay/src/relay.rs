//! Ordered provider fallback.
//!
//! [`Relay`] walks its provider list in order and returns the first image
//! produced. Each provider is attempted at most once per request, and
//! unconfigured providers are skipped without an attempt. The relay holds no
//! per-request state, so one instance is shared by every request.

use std::sync::Arc;

use photobooth_core::image::{self, DEFAULT_INPUT_MIME, DEFAULT_OUTPUT_MIME};
use photobooth_core::transform::{
    ThemeRef, TransformRequest, TransformResult, DEFAULT_COMPLETION_MESSAGE,
};
use serde::Serialize;

use crate::config::RelayConfig;
use crate::error::{ProviderError, RelayError};
use crate::gateway::GatewayProvider;
use crate::gemini::GeminiProvider;
use crate::provider::ImageProvider;

/// Whether a provider has a credential, for health output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderStatus {
    pub name: String,
    pub configured: bool,
}

/// Fallback sequence over image providers.
#[derive(Clone)]
pub struct Relay {
    providers: Vec<Arc<dyn ImageProvider>>,
}

impl std::fmt::Debug for Relay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.providers.iter().map(|p| p.name()).collect();
        f.debug_struct("Relay").field("providers", &names).finish()
    }
}

impl Relay {
    /// Build a relay over `providers`, tried in the given order.
    pub fn new(providers: Vec<Arc<dyn ImageProvider>>) -> Self {
        Self { providers }
    }

    /// Gemini first, then the AI gateway, sharing one HTTP client.
    pub fn from_config(config: &RelayConfig) -> Self {
        let client = reqwest::Client::new();
        Self::new(vec![
            Arc::new(GeminiProvider::new(client.clone(), config.gemini.clone())),
            Arc::new(GatewayProvider::new(client, config.gateway.clone())),
        ])
    }

    pub fn provider_status(&self) -> Vec<ProviderStatus> {
        self.providers
            .iter()
            .map(|p| ProviderStatus {
                name: p.name().to_string(),
                configured: p.is_configured(),
            })
            .collect()
    }

    /// Transform a validated wire request.
    pub async fn handle(&self, request: &TransformRequest) -> Result<TransformResult, RelayError> {
        self.transform(&request.image_base64, &request.theme).await
    }

    /// Restyle `image_data` with the theme's prompt.
    ///
    /// `image_data` may carry a `data:image/...;base64,` prefix; it is
    /// stripped before forwarding. On success the image is always a
    /// non-empty data URI.
    pub async fn transform(
        &self,
        image_data: &str,
        theme: &ThemeRef,
    ) -> Result<TransformResult, RelayError> {
        let payload = image::split_data_uri(image_data, DEFAULT_INPUT_MIME);
        if payload.data.is_empty() {
            return Err(RelayError::missing_fields());
        }
        let prompt = theme.prompt.trim();
        if prompt.is_empty() {
            return Err(RelayError::InvalidInput(
                "theme prompt must not be empty".to_string(),
            ));
        }

        tracing::info!(theme_id = %theme.id, theme = %theme.name, "Processing transformation");

        let mut failures: Vec<ProviderError> = Vec::with_capacity(self.providers.len());

        for provider in &self.providers {
            let name = provider.name();

            if !provider.is_configured() {
                tracing::warn!(provider = name, "Provider not configured, skipping");
                failures.push(ProviderError::NotConfigured);
                continue;
            }

            tracing::info!(provider = name, "Attempting provider");

            let generated = match provider.attempt(payload, prompt).await {
                Ok(generated) => generated,
                Err(e) => {
                    tracing::warn!(provider = name, error = %e, "Provider attempt failed");
                    failures.push(e);
                    continue;
                }
            };

            let Some(transformed_image) =
                image::normalize_image_payload(&generated.image, DEFAULT_OUTPUT_MIME)
            else {
                tracing::warn!(provider = name, "Provider returned an empty image");
                failures.push(ProviderError::NoImage);
                continue;
            };

            tracing::info!(provider = name, "Transformation succeeded");

            return Ok(TransformResult {
                transformed_image,
                message: generated
                    .text
                    .filter(|t| !t.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_COMPLETION_MESSAGE.to_string()),
            });
        }

        if failures
            .iter()
            .all(|f| matches!(f, ProviderError::NotConfigured))
        {
            tracing::error!("No AI provider is configured; set GEMINI_API_KEY or AI_GATEWAY_API_KEY");
        }

        let error = RelayError::from_failures(&failures);
        tracing::error!(kind = %error.kind(), attempts = failures.len(), "All AI providers failed");
        Err(error)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

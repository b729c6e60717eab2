//! Primary provider: the Gemini `generateContent` REST endpoint.
//!
//! Sends the prompt and the photo as inline data in a single user turn and
//! asks for a combined text + image response.

use async_trait::async_trait;
use photobooth_core::image::{self, ImagePayload, DEFAULT_OUTPUT_MIME};
use serde::Deserialize;

use crate::config::GeminiConfig;
use crate::error::ProviderError;
use crate::http;
use crate::provider::{GeneratedImage, ImageProvider};

/// HTTP client for the Gemini API.
pub struct GeminiProvider {
    client: reqwest::Client,
    config: GeminiConfig,
}

// -- Response types --

#[derive(Debug, Default, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    inline_data: Option<InlineData>,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: Option<String>,
    #[serde(default)]
    data: String,
}

impl GeminiProvider {
    pub fn new(client: reqwest::Client, config: GeminiConfig) -> Self {
        Self { client, config }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    /// Request body: one user turn holding the prompt and the inline photo.
    pub fn build_request_body(image: ImagePayload<'_>, prompt: &str) -> serde_json::Value {
        serde_json::json!({
            "contents": [{
                "parts": [
                    { "text": prompt },
                    {
                        "inlineData": {
                            "mimeType": image.mime_type,
                            "data": image.data,
                        }
                    }
                ]
            }],
            "generationConfig": {
                "responseModalities": ["TEXT", "IMAGE"]
            }
        })
    }

    /// Pull the first inline image (as a data URI) and the first non-blank
    /// text part out of the first candidate.
    pub fn extract(response: &GenerateContentResponse) -> Result<GeneratedImage, ProviderError> {
        let parts = response
            .candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|c| c.parts.as_slice())
            .unwrap_or_default();

        let image = parts
            .iter()
            .filter_map(|p| p.inline_data.as_ref())
            .find_map(|d| {
                let mime = d.mime_type.as_deref().unwrap_or(DEFAULT_OUTPUT_MIME);
                image::normalize_image_payload(&d.data, mime)
            })
            .ok_or(ProviderError::NoImage)?;

        let text = parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .map(str::trim)
            .find(|t| !t.is_empty())
            .map(str::to_string);

        Ok(GeneratedImage { image, text })
    }
}

#[async_trait]
impl ImageProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    fn is_configured(&self) -> bool {
        self.config.api_key.is_some()
    }

    async fn attempt(
        &self,
        image: ImagePayload<'_>,
        prompt: &str,
    ) -> Result<GeneratedImage, ProviderError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(ProviderError::NotConfigured)?;

        tracing::debug!(model = %self.config.model, prompt_chars = prompt.len(), "Calling Gemini generateContent");

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(&Self::build_request_body(image, prompt))
            .send()
            .await?;

        let parsed: GenerateContentResponse = http::parse_response(response).await?;
        Self::extract(&parsed)
    }
}

//! Secondary provider: an OpenAI-compatible chat-completions gateway that
//! aggregates image-capable models.
//!
//! The photo goes in as an `image_url` content part; generated images come
//! back under `choices[0].message.images`.

use async_trait::async_trait;
use photobooth_core::image::{self, ImagePayload, DEFAULT_OUTPUT_MIME};
use serde::Deserialize;

use crate::config::GatewayConfig;
use crate::error::ProviderError;
use crate::http;
use crate::provider::{GeneratedImage, ImageProvider};

/// Largest remote image the gateway provider will download.
pub const MAX_REMOTE_IMAGE_BYTES: usize = 20 * 1024 * 1024;

/// HTTP client for the AI gateway.
pub struct GatewayProvider {
    client: reqwest::Client,
    config: GatewayConfig,
    max_image_bytes: usize,
}

// -- Response types --

#[derive(Debug, Default, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<Message>,
}

#[derive(Debug, Deserialize)]
struct Message {
    content: Option<String>,
    #[serde(default)]
    images: Vec<MessageImage>,
}

#[derive(Debug, Deserialize)]
struct MessageImage {
    image_url: Option<ImageUrl>,
}

#[derive(Debug, Deserialize)]
struct ImageUrl {
    #[serde(default)]
    url: String,
}

/// Where the gateway put the generated image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageLocation {
    /// Already a data URI.
    Inline(String),
    /// A remote `http(s)` URL that still has to be downloaded.
    Remote(String),
}

impl GatewayProvider {
    pub fn new(client: reqwest::Client, config: GatewayConfig) -> Self {
        Self {
            client,
            config,
            max_image_bytes: MAX_REMOTE_IMAGE_BYTES,
        }
    }

    /// Override the download cap for remote images.
    pub fn with_max_image_bytes(mut self, max_image_bytes: usize) -> Self {
        self.max_image_bytes = max_image_bytes;
        self
    }

    /// Chat request: one user message holding the prompt and the photo.
    pub fn build_request_body(model: &str, image: ImagePayload<'_>, prompt: &str) -> serde_json::Value {
        serde_json::json!({
            "model": model,
            "messages": [{
                "role": "user",
                "content": [
                    { "type": "text", "text": prompt },
                    {
                        "type": "image_url",
                        "image_url": { "url": image::to_data_uri(image.mime_type, image.data) }
                    }
                ]
            }],
            "modalities": ["image", "text"]
        })
    }

    /// Pull the first image location and the message text out of the first
    /// choice.
    pub fn extract(
        response: &ChatCompletionResponse,
    ) -> Result<(ImageLocation, Option<String>), ProviderError> {
        let message = response
            .choices
            .first()
            .and_then(|c| c.message.as_ref())
            .ok_or(ProviderError::NoImage)?;

        let url = message
            .images
            .iter()
            .filter_map(|i| i.image_url.as_ref())
            .map(|u| u.url.trim())
            .find(|u| !u.is_empty())
            .ok_or(ProviderError::NoImage)?;

        let location = if url.starts_with("http://") || url.starts_with("https://") {
            ImageLocation::Remote(url.to_string())
        } else {
            ImageLocation::Inline(
                image::normalize_image_payload(url, DEFAULT_OUTPUT_MIME).ok_or(ProviderError::NoImage)?,
            )
        };

        let text = message
            .content
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string);

        Ok((location, text))
    }

    /// Download a remote image and inline it as a data URI. Bodies larger
    /// than the configured cap are rejected before they are fully read.
    async fn fetch_remote(&self, url: &str) -> Result<String, ProviderError> {
        tracing::debug!(url, "Downloading gateway image");

        let mut response = http::ensure_success(self.client.get(url).send().await?).await?;
        let too_large = || {
            ProviderError::InvalidResponse(format!(
                "remote image exceeds {} bytes",
                self.max_image_bytes
            ))
        };
        if response
            .content_length()
            .is_some_and(|len| len > self.max_image_bytes as u64)
        {
            return Err(too_large());
        }

        let mime = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
            .map(str::trim)
            .filter(|v| v.starts_with("image/"))
            .unwrap_or(DEFAULT_OUTPUT_MIME)
            .to_string();

        let mut bytes = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            if bytes.len() + chunk.len() > self.max_image_bytes {
                return Err(too_large());
            }
            bytes.extend_from_slice(&chunk);
        }

        if bytes.is_empty() {
            return Err(ProviderError::NoImage);
        }
        Ok(image::encode_data_uri(&mime, &bytes))
    }
}

#[async_trait]
impl ImageProvider for GatewayProvider {
    fn name(&self) -> &str {
        "ai-gateway"
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

        tracing::debug!(model = %self.config.model, prompt_chars = prompt.len(), "Calling AI gateway");

        let response = self
            .client
            .post(&self.config.url)
            .bearer_auth(api_key)
            .json(&Self::build_request_body(&self.config.model, image, prompt))
            .send()
            .await?;

        let parsed: ChatCompletionResponse = http::parse_response(response).await?;
        let (location, text) = Self::extract(&parsed)?;

        let image = match location {
            ImageLocation::Inline(uri) => uri,
            ImageLocation::Remote(url) => self.fetch_remote(&url).await?,
        };

        Ok(GeneratedImage { image, text })
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn parse(json: serde_json::Value) -> ChatCompletionResponse {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn request_body_sends_photo_as_data_uri() {
        let body = GatewayProvider::build_request_body(
            "google/model",
            ImagePayload {
                mime_type: "image/jpeg",
                data: "img1",
            },
            "p",
        );

        assert_eq!(body["model"], "google/model");
        let content = &body["messages"][0]["content"];
        assert_eq!(content[0]["text"], "p");
        assert_eq!(content[1]["type"], "image_url");
        assert_eq!(content[1]["image_url"]["url"], "data:image/jpeg;base64,img1");
        assert_eq!(body["modalities"], serde_json::json!(["image", "text"]));
    }

    #[test]
    fn extracts_inline_image_and_text() {
        let response = parse(serde_json::json!({
            "choices": [{
                "message": {
                    "content": "Looking sharp!",
                    "images": [{ "type": "image_url", "image_url": { "url": "data:image/png;base64,QUJD" } }]
                }
            }]
        }));

        let (location, text) = GatewayProvider::extract(&response).unwrap();
        assert_eq!(location, ImageLocation::Inline("data:image/png;base64,QUJD".into()));
        assert_eq!(text.as_deref(), Some("Looking sharp!"));
    }

    #[test]
    fn bare_base64_is_wrapped() {
        let response = parse(serde_json::json!({
            "choices": [{ "message": { "images": [{ "image_url": { "url": "QUJD" } }] } }]
        }));

        let (location, text) = GatewayProvider::extract(&response).unwrap();
        assert_eq!(location, ImageLocation::Inline("data:image/png;base64,QUJD".into()));
        assert_eq!(text, None);
    }

    #[test]
    fn remote_urls_are_flagged_for_download() {
        let response = parse(serde_json::json!({
            "choices": [{ "message": { "images": [{ "image_url": { "url": "https://cdn.example/x.png" } }] } }]
        }));

        let (location, _) = GatewayProvider::extract(&response).unwrap();
        assert_eq!(location, ImageLocation::Remote("https://cdn.example/x.png".into()));
    }

    #[test]
    fn text_only_message_is_no_image() {
        let response = parse(serde_json::json!({
            "choices": [{ "message": { "content": "Sorry, no can do." } }]
        }));

        assert_matches!(GatewayProvider::extract(&response), Err(ProviderError::NoImage));
    }

    #[test]
    fn empty_choices_is_no_image() {
        assert_matches!(
            GatewayProvider::extract(&ChatCompletionResponse::default()),
            Err(ProviderError::NoImage)
        );
    }
}

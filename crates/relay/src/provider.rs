//! The capability every image provider shares.

use async_trait::async_trait;
use photobooth_core::image::ImagePayload;

use crate::error::ProviderError;

/// Output of a successful provider attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    /// Data URI of the generated image.
    pub image: String,
    /// Accompanying text, if the provider returned any.
    pub text: Option<String>,
}

/// A generative-image backend the relay can fall back across.
#[async_trait]
pub trait ImageProvider: Send + Sync {
    /// Short name used in logs and health output.
    fn name(&self) -> &str;

    /// Whether a credential is present. Unconfigured providers are skipped
    /// without an attempt.
    fn is_configured(&self) -> bool {
        true
    }

    /// Ask the provider to restyle `image` according to `prompt`.
    ///
    /// Must fail with [`ProviderError::NoImage`] rather than succeed when
    /// the response carries no image.
    async fn attempt(
        &self,
        image: ImagePayload<'_>,
        prompt: &str,
    ) -> Result<GeneratedImage, ProviderError>;
}

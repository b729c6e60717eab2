//! Transformation relay.
//!
//! Forwards a photo and a style prompt to an ordered list of generative
//! image providers, stopping at the first one that returns an image, and
//! normalizes the outcome into a [`TransformResult`] or a [`RelayError`].
//!
//! [`TransformResult`]: photobooth_core::transform::TransformResult

pub mod config;
pub mod error;
pub mod gateway;
pub mod gemini;
mod http;
pub mod provider;
pub mod relay;

pub use config::RelayConfig;
pub use error::{ProviderError, RelayError};
pub use provider::{GeneratedImage, ImageProvider};
pub use relay::{ProviderStatus, Relay};

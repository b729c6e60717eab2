use photobooth_core::transform::{TransformErrorKind, MISSING_FIELDS_MESSAGE};

/// Why a single provider attempt failed.
///
/// These never leave the relay: they are logged and folded into a
/// [`RelayError`] once every provider has been tried.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// No credential is configured for this provider.
    #[error("provider is not configured")]
    NotConfigured,

    /// The provider answered 429.
    #[error("provider rate limited the request: {body}")]
    RateLimited { body: String },

    /// The provider answered 402.
    #[error("provider quota exceeded: {body}")]
    QuotaExceeded { body: String },

    /// Any other non-2xx status.
    #[error("provider API error ({status}): {body}")]
    Api { status: u16, body: String },

    /// The HTTP request itself failed (network, DNS, TLS, body decode).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The response was 2xx but not in the expected shape.
    #[error("malformed provider response: {0}")]
    InvalidResponse(String),

    /// The response parsed but carried no image.
    #[error("provider response contained no image")]
    NoImage,
}

impl ProviderError {
    /// Classify a non-2xx status code.
    pub fn from_status(status: u16, body: String) -> Self {
        match status {
            429 => Self::RateLimited { body },
            402 => Self::QuotaExceeded { body },
            _ => Self::Api { status, body },
        }
    }
}

/// Normalized failure surfaced to relay callers.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// Missing image or theme prompt; no provider was called.
    #[error("{0}")]
    InvalidInput(String),

    #[error("The AI service is busy right now. Please try again shortly.")]
    ProviderRateLimited,

    #[error("The AI service usage limit has been reached. Please try again later.")]
    ProviderQuotaExceeded,

    #[error("All AI providers failed. Please try again.")]
    AllProvidersFailed,

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl RelayError {
    pub fn missing_fields() -> Self {
        Self::InvalidInput(MISSING_FIELDS_MESSAGE.to_string())
    }

    pub fn kind(&self) -> TransformErrorKind {
        match self {
            Self::InvalidInput(_) => TransformErrorKind::InvalidInput,
            Self::ProviderRateLimited => TransformErrorKind::ProviderRateLimited,
            Self::ProviderQuotaExceeded => TransformErrorKind::ProviderQuotaExceeded,
            Self::AllProvidersFailed => TransformErrorKind::AllProvidersFailed,
            Self::Unexpected(_) => TransformErrorKind::Unexpected,
        }
    }

    /// Fold the failures of every attempted provider into one error.
    ///
    /// Throttling wins over quota exhaustion, which wins over generic
    /// failure.
    pub fn from_failures<'a>(failures: impl IntoIterator<Item = &'a ProviderError>) -> Self {
        let mut quota = false;
        for failure in failures {
            match failure {
                ProviderError::RateLimited { .. } => return Self::ProviderRateLimited,
                ProviderError::QuotaExceeded { .. } => quota = true,
                _ => {}
            }
        }
        if quota {
            Self::ProviderQuotaExceeded
        } else {
            Self::AllProvidersFailed
        }
    }
}

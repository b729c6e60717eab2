//! Wire types for the transformation relay.
//!
//! Shared by the relay HTTP service (which deserializes requests and
//! serializes results) and the booth client (which does the reverse).

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::CoreError;

/// Message returned when a provider produced an image but no text.
pub const DEFAULT_COMPLETION_MESSAGE: &str = "Transformation complete!";

/// Message returned for requests missing the image or the theme.
pub const MISSING_FIELDS_MESSAGE: &str = "Missing imageBase64 or theme";

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

/// The subset of a theme the relay needs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ThemeRef {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "theme prompt must not be empty"))]
    pub prompt: String,
}

/// Raw request body as received over the wire. Both fields are optional so
/// that a missing field is reported as invalid input rather than as a
/// malformed body.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformPayload {
    #[serde(default)]
    pub image_base64: Option<String>,
    #[serde(default)]
    pub theme: Option<ThemeRef>,
}

/// A validated transformation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TransformRequest {
    /// Encoded image, optionally data-URI prefixed.
    #[validate(length(min = 1, message = "imageBase64 must not be empty"))]
    pub image_base64: String,
    #[validate(nested)]
    pub theme: ThemeRef,
}

impl TransformRequest {
    pub fn new(image_base64: impl Into<String>, theme: ThemeRef) -> Self {
        Self {
            image_base64: image_base64.into(),
            theme,
        }
    }
}

impl TransformPayload {
    /// Check presence of both fields, then validate their contents.
    pub fn into_request(self) -> Result<TransformRequest, CoreError> {
        let (Some(image_base64), Some(theme)) = (self.image_base64, self.theme) else {
            return Err(CoreError::Validation(MISSING_FIELDS_MESSAGE.to_string()));
        };
        if image_base64.trim().is_empty() {
            return Err(CoreError::Validation(MISSING_FIELDS_MESSAGE.to_string()));
        }

        let request = TransformRequest {
            image_base64,
            theme,
        };
        request.validate()?;
        Ok(request)
    }
}

// ---------------------------------------------------------------------------
// Result
// ---------------------------------------------------------------------------

/// A successful transformation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformResult {
    /// Always a `data:<mime>;base64,...` URI with a non-empty payload.
    pub transformed_image: String,
    pub message: String,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Closed set of failure kinds a caller of the relay can branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransformErrorKind {
    /// Missing image or theme; no provider was called.
    InvalidInput,
    /// A provider signalled throttling.
    ProviderRateLimited,
    /// A provider signalled billing or usage exhaustion.
    ProviderQuotaExceeded,
    /// Every provider was tried without producing an image.
    AllProvidersFailed,
    /// Anything else (malformed body, internal failure).
    Unexpected,
}

impl TransformErrorKind {
    /// HTTP status the relay answers with for this kind.
    pub fn status_code(self) -> u16 {
        match self {
            Self::InvalidInput => 400,
            Self::ProviderRateLimited => 429,
            Self::ProviderQuotaExceeded => 402,
            Self::AllProvidersFailed | Self::Unexpected => 500,
        }
    }

    /// Machine-readable code carried in error bodies.
    pub fn code(self) -> &'static str {
        match self {
            Self::InvalidInput => "INVALID_INPUT",
            Self::ProviderRateLimited => "PROVIDER_RATE_LIMITED",
            Self::ProviderQuotaExceeded => "PROVIDER_QUOTA_EXCEEDED",
            Self::AllProvidersFailed => "ALL_PROVIDERS_FAILED",
            Self::Unexpected => "UNEXPECTED",
        }
    }

    /// Inverse of [`code`](Self::code).
    pub fn from_code(code: &str) -> Option<Self> {
        [
            Self::InvalidInput,
            Self::ProviderRateLimited,
            Self::ProviderQuotaExceeded,
            Self::AllProvidersFailed,
            Self::Unexpected,
        ]
        .into_iter()
        .find(|k| k.code() == code)
    }

    /// Best-effort kind for an error status when no code is available.
    pub fn from_status(status: u16) -> Self {
        match status {
            400 => Self::InvalidInput,
            429 => Self::ProviderRateLimited,
            402 => Self::ProviderQuotaExceeded,
            _ => Self::Unexpected,
        }
    }

    /// Whether the caller should invite the user to try again shortly.
    pub fn is_transient(self) -> bool {
        matches!(self, Self::ProviderRateLimited | Self::AllProvidersFailed)
    }
}

impl std::fmt::Display for TransformErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// JSON body of every relay error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn payload(json: serde_json::Value) -> TransformPayload {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn payload_with_all_fields_is_valid() {
        let req = payload(serde_json::json!({
            "imageBase64": "img1",
            "theme": { "id": "t", "name": "T", "prompt": "p" }
        }))
        .into_request()
        .unwrap();

        assert_eq!(req.image_base64, "img1");
        assert_eq!(req.theme.prompt, "p");
    }

    #[test]
    fn missing_image_is_invalid() {
        let err = payload(serde_json::json!({
            "theme": { "id": "t", "name": "T", "prompt": "p" }
        }))
        .into_request()
        .unwrap_err();

        assert_matches!(err, CoreError::Validation(msg) if msg == MISSING_FIELDS_MESSAGE);
    }

    #[test]
    fn missing_theme_is_invalid() {
        let err = payload(serde_json::json!({ "imageBase64": "img1" }))
            .into_request()
            .unwrap_err();

        assert_matches!(err, CoreError::Validation(_));
    }

    #[test]
    fn blank_image_is_invalid() {
        let err = payload(serde_json::json!({
            "imageBase64": "   ",
            "theme": { "id": "t", "name": "T", "prompt": "p" }
        }))
        .into_request()
        .unwrap_err();

        assert_matches!(err, CoreError::Validation(_));
    }

    #[test]
    fn empty_prompt_is_invalid() {
        let err = payload(serde_json::json!({
            "imageBase64": "img1",
            "theme": { "id": "t", "name": "T" }
        }))
        .into_request()
        .unwrap_err();

        assert_matches!(err, CoreError::Validation(msg) if msg.contains("prompt"));
    }

    #[test]
    fn request_serializes_camel_case() {
        let req = TransformRequest::new(
            "img",
            ThemeRef {
                id: "a".into(),
                name: "A".into(),
                prompt: "p".into(),
            },
        );
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["imageBase64"], "img");
        assert_eq!(json["theme"]["prompt"], "p");
    }

    #[test]
    fn error_kind_codes_round_trip() {
        for kind in [
            TransformErrorKind::InvalidInput,
            TransformErrorKind::ProviderRateLimited,
            TransformErrorKind::ProviderQuotaExceeded,
            TransformErrorKind::AllProvidersFailed,
            TransformErrorKind::Unexpected,
        ] {
            assert_eq!(TransformErrorKind::from_code(kind.code()), Some(kind));
        }
        assert_eq!(TransformErrorKind::from_code("NOPE"), None);
    }

    #[test]
    fn error_kind_status_mapping() {
        assert_eq!(TransformErrorKind::ProviderRateLimited.status_code(), 429);
        assert_eq!(TransformErrorKind::ProviderQuotaExceeded.status_code(), 402);
        assert_eq!(TransformErrorKind::from_status(503), TransformErrorKind::Unexpected);
    }
}

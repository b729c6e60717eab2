//! Data-URI helpers for image payloads.
//!
//! Images travel as text everywhere in the booth: the client sends a
//! (possibly data-URI prefixed) base64 string, providers want bare base64,
//! and results always go back as a self-describing `data:<mime>;base64,...`
//! URI.

use std::sync::LazyLock;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use regex::Regex;

use crate::error::CoreError;

/// MIME type assumed for client uploads that carry no data-URI prefix.
pub const DEFAULT_INPUT_MIME: &str = "image/jpeg";

/// MIME type assumed for provider output that carries no type information.
pub const DEFAULT_OUTPUT_MIME: &str = "image/png";

/// Matches a leading `data:image/<subtype>;base64,` prefix.
static DATA_URI_PREFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^data:(image/[A-Za-z0-9.+-]+);base64,").expect("valid regex")
});

/// A base64 image payload split from its (optional) data-URI prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImagePayload<'a> {
    /// MIME type declared by the prefix, or the caller-supplied default.
    pub mime_type: &'a str,
    /// Bare base64 data with the prefix removed.
    pub data: &'a str,
}

/// Strip a leading `data:image/...;base64,` prefix, if present.
///
/// Input without a prefix is returned unchanged and tagged with
/// `default_mime`.
pub fn split_data_uri<'a>(input: &'a str, default_mime: &'a str) -> ImagePayload<'a> {
    let input = input.trim();
    match DATA_URI_PREFIX_RE.captures(input) {
        Some(caps) => {
            let prefix = caps.get(0).map_or(0, |m| m.end());
            let mime_type = caps.get(1).map_or(default_mime, |m| m.as_str());
            ImagePayload {
                mime_type,
                data: &input[prefix..],
            }
        }
        None => ImagePayload {
            mime_type: default_mime,
            data: input,
        },
    }
}

/// Build a data URI from a MIME type and base64 data.
pub fn to_data_uri(mime_type: &str, base64_data: &str) -> String {
    format!("data:{mime_type};base64,{base64_data}")
}

/// Encode raw image bytes as a data URI.
pub fn encode_data_uri(mime_type: &str, bytes: &[u8]) -> String {
    to_data_uri(mime_type, &STANDARD.encode(bytes))
}

/// Normalize a provider image payload into a data URI.
///
/// - An existing `data:` URI is kept as-is.
/// - Bare base64 is wrapped with `default_mime`.
/// - Empty payloads (or a data URI with nothing after the comma) yield `None`.
pub fn normalize_image_payload(payload: &str, default_mime: &str) -> Option<String> {
    let payload = payload.trim();
    if payload.is_empty() {
        return None;
    }
    if payload.starts_with("data:") {
        let (_, data) = payload.split_once(',')?;
        if data.trim().is_empty() {
            return None;
        }
        return Some(payload.to_string());
    }
    Some(to_data_uri(default_mime, payload))
}

/// Decode a data URI (or bare base64) into its MIME type and raw bytes.
pub fn decode_data_uri(input: &str) -> Result<(String, Vec<u8>), CoreError> {
    let payload = split_data_uri(input, DEFAULT_OUTPUT_MIME);
    if payload.data.is_empty() {
        return Err(CoreError::Validation("Image payload is empty".to_string()));
    }
    let bytes = STANDARD
        .decode(payload.data)
        .map_err(|e| CoreError::Validation(format!("Image payload is not valid base64: {e}")))?;
    Ok((payload.mime_type.to_string(), bytes))
}

/// File extension conventionally used for an image MIME type.
pub fn extension_for_mime(mime_type: &str) -> &'static str {
    match mime_type {
        "image/jpeg" | "image/jpg" => "jpg",
        "image/webp" => "webp",
        "image/gif" => "gif",
        _ => "png",
    }
}

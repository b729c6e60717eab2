//! Photo acquisition from image files.

use std::path::{Path, PathBuf};

use image::ImageFormat;
use photobooth_core::image::encode_data_uri;

/// Formats the providers accept as input.
const SUPPORTED: [ImageFormat; 4] = [
    ImageFormat::Jpeg,
    ImageFormat::Png,
    ImageFormat::WebP,
    ImageFormat::Gif,
];

#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("image is empty")]
    Empty,

    #[error("unsupported image format (expected JPEG, PNG, WebP or GIF)")]
    UnsupportedFormat,
}

/// Reads a photo from disk and turns it into a data URI for the relay.
#[derive(Debug, Clone)]
pub struct FileCapture {
    path: PathBuf,
}

impl FileCapture {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the file and encode it as `data:<sniffed mime>;base64,...`.
    pub async fn capture(&self) -> Result<String, CaptureError> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|source| CaptureError::Io {
                path: self.path.clone(),
                source,
            })?;
        let uri = encode_photo(&bytes)?;
        tracing::debug!(path = %self.path.display(), bytes = bytes.len(), "Captured photo from file");
        Ok(uri)
    }
}

/// Sniff the format from the magic bytes and encode as a data URI.
pub fn encode_photo(bytes: &[u8]) -> Result<String, CaptureError> {
    if bytes.is_empty() {
        return Err(CaptureError::Empty);
    }
    let format = image::guess_format(bytes).map_err(|_| CaptureError::UnsupportedFormat)?;
    if !SUPPORTED.contains(&format) {
        return Err(CaptureError::UnsupportedFormat);
    }
    Ok(encode_data_uri(format.to_mime_type(), bytes))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";
    const JPEG_MAGIC: &[u8] = b"\xff\xd8\xff\xe0\0\x10JFIF\0";

    #[test]
    fn png_is_sniffed() {
        let uri = encode_photo(PNG_MAGIC).unwrap();
        assert!(uri.starts_with("data:image/png;base64,"));
    }

    #[test]
    fn jpeg_is_sniffed() {
        let uri = encode_photo(JPEG_MAGIC).unwrap();
        assert!(uri.starts_with("data:image/jpeg;base64,"));
    }

    #[test]
    fn text_is_rejected() {
        assert_matches!(encode_photo(b"hello, world"), Err(CaptureError::UnsupportedFormat));
        assert_matches!(encode_photo(b""), Err(CaptureError::Empty));
    }

    #[tokio::test]
    async fn missing_file_is_io_error() {
        let capture = FileCapture::new("/definitely/not/here.jpg");
        assert_matches!(capture.capture().await, Err(CaptureError::Io { .. }));
    }
}

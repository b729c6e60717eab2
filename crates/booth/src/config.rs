use std::path::PathBuf;

/// Relay endpoint used when `RELAY_URL` is unset.
pub const DEFAULT_RELAY_URL: &str = "http://localhost:3000/api/v1/transform-photo";

/// Booth configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoothConfig {
    /// Full URL of the relay's transform endpoint.
    pub relay_url: String,
    /// Location of the gallery database file.
    pub gallery_path: PathBuf,
}

impl BoothConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var        | Default                                          |
    /// |----------------|--------------------------------------------------|
    /// | `RELAY_URL`    | [`DEFAULT_RELAY_URL`]                            |
    /// | `GALLERY_PATH` | `<data dir>/party-favor/party-favor-gallery.db`  |
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_blank = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        Self {
            relay_url: non_blank("RELAY_URL").unwrap_or_else(|| DEFAULT_RELAY_URL.to_string()),
            gallery_path: non_blank("GALLERY_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(default_gallery_path),
        }
    }
}

/// `<platform data dir>/party-favor/party-favor-gallery.db`, falling back to
/// the working directory when the platform has no data dir.
pub fn default_gallery_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("party-favor")
        .join(photobooth_db::gallery_file_name())
}

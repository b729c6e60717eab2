//! Provider configuration loaded from environment variables.

/// Default Gemini REST base URL.
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
/// Default Gemini image-capable model.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash-exp-image-generation";
/// Default chat-completions endpoint of the AI gateway.
pub const DEFAULT_GATEWAY_URL: &str = "https://ai.gateway.lovable.dev/v1/chat/completions";
/// Default model requested from the AI gateway.
pub const DEFAULT_GATEWAY_MODEL: &str = "google/gemini-2.5-flash-image-preview";

/// Settings for the primary (direct Gemini) provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeminiConfig {
    /// `None` skips the provider entirely.
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
}

/// Settings for the secondary (aggregator gateway) provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    /// `None` makes every fallback attempt fail.
    pub api_key: Option<String>,
    pub url: String,
    pub model: String,
}

/// Configuration for both providers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayConfig {
    pub gemini: GeminiConfig,
    pub gateway: GatewayConfig,
}

impl RelayConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var              | Default                                   |
    /// |----------------------|-------------------------------------------|
    /// | `GEMINI_API_KEY`     | unset                                     |
    /// | `GEMINI_BASE_URL`    | [`DEFAULT_GEMINI_BASE_URL`]               |
    /// | `GEMINI_MODEL`       | [`DEFAULT_GEMINI_MODEL`]                  |
    /// | `AI_GATEWAY_API_KEY` | unset                                     |
    /// | `AI_GATEWAY_URL`     | [`DEFAULT_GATEWAY_URL`]                   |
    /// | `AI_GATEWAY_MODEL`   | [`DEFAULT_GATEWAY_MODEL`]                 |
    ///
    /// Blank keys count as unset.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let secret = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let or_default = |key: &str, default: &str| secret(key).unwrap_or_else(|| default.to_string());

        Self {
            gemini: GeminiConfig {
                api_key: secret("GEMINI_API_KEY"),
                base_url: or_default("GEMINI_BASE_URL", DEFAULT_GEMINI_BASE_URL),
                model: or_default("GEMINI_MODEL", DEFAULT_GEMINI_MODEL),
            },
            gateway: GatewayConfig {
                api_key: secret("AI_GATEWAY_API_KEY"),
                url: or_default("AI_GATEWAY_URL", DEFAULT_GATEWAY_URL),
                model: or_default("AI_GATEWAY_MODEL", DEFAULT_GATEWAY_MODEL),
            },
        }
    }
}

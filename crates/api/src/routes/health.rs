use axum::extract::State;
use axum::{routing::get, Json, Router};
use photobooth_relay::ProviderStatus;
use serde::Serialize;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// `ok` when at least one provider has a credential, `degraded` otherwise.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Providers in fallback order.
    pub providers: Vec<ProviderStatus>,
    /// Per-request timeout enforced by the server.
    pub request_timeout_secs: u64,
}

/// GET /health -- returns service status and provider configuration.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let providers = state.relay.provider_status();

    let status = if providers.iter().any(|p| p.configured) {
        "ok"
    } else {
        "degraded"
    };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        providers,
        request_timeout_secs: state.config.request_timeout_secs,
    })
}

/// Mount health check routes (intended for root-level, NOT under `/api/v1`).
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

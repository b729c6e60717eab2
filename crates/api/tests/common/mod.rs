#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use photobooth_core::image::ImagePayload;
use photobooth_relay::config::RelayConfig;
use photobooth_relay::{GeneratedImage, ImageProvider, ProviderError, Relay};
use tower::ServiceExt;

use photobooth_api::config::ServerConfig;
use photobooth_api::router::build_app_router;
use photobooth_api::state::AppState;

/// How a scripted provider answers.
#[derive(Debug, Clone)]
pub enum Reply {
    Image(&'static str, Option<&'static str>),
    Status(u16),
    Unconfigured,
}

/// Provider that answers every attempt with a fixed [`Reply`] and counts
/// its calls.
pub struct ScriptedProvider {
    name: &'static str,
    reply: Reply,
    calls: AtomicUsize,
}

impl ScriptedProvider {
    pub fn new(name: &'static str, reply: Reply) -> Arc<Self> {
        Arc::new(Self {
            name,
            reply,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageProvider for ScriptedProvider {
    fn name(&self) -> &str {
        self.name
    }

    fn is_configured(&self) -> bool {
        !matches!(self.reply, Reply::Unconfigured)
    }

    async fn attempt(
        &self,
        _image: ImagePayload<'_>,
        _prompt: &str,
    ) -> Result<GeneratedImage, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.reply {
            Reply::Image(image, text) => Ok(GeneratedImage {
                image: image.to_string(),
                text: text.map(str::to_string),
            }),
            Reply::Status(status) => Err(ProviderError::from_status(*status, String::new())),
            Reply::Unconfigured => Err(ProviderError::NotConfigured),
        }
    }
}

/// Build a test `ServerConfig` with permissive CORS and no provider keys.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["*".to_string()],
        request_timeout_secs: 30,
        relay: RelayConfig::from_lookup(|_| None),
    }
}

/// Build the full application router over the given providers, in order.
///
/// Uses the same [`build_app_router`] as `main.rs`, so tests exercise the
/// production middleware stack.
pub fn build_test_app(providers: Vec<Arc<ScriptedProvider>>) -> Router {
    let config = test_config();
    let providers: Vec<Arc<dyn ImageProvider>> = providers
        .into_iter()
        .map(|p| p as Arc<dyn ImageProvider>)
        .collect();

    let state = AppState {
        relay: Arc::new(Relay::new(providers)),
        config: Arc::new(config.clone()),
    };

    build_app_router(state, &config)
}

/// A primary that always succeeds, behind nothing.
pub fn happy_app() -> Router {
    build_test_app(vec![ScriptedProvider::new(
        "primary",
        Reply::Image("data:image/png;base64,T1VU", Some("Looking great!")),
    )])
}

pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_raw(app: Router, uri: &str, body: impl Into<Body>) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, json: serde_json::Value) -> Response {
    post_raw(app, uri, json.to_string()).await
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

/// A well-formed relay request body.
pub fn transform_body() -> serde_json::Value {
    serde_json::json!({
        "imageBase64": "data:image/jpeg;base64,aW1n",
        "theme": { "id": "wedding", "name": "Wedding", "prompt": "make it elegant" }
    })
}

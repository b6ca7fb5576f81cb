//! Shared utilities for integration tests.

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request},
    response::Response,
    Router,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use mathyd::config::{SecretKey, ServiceConfig};
use mathyd::render::{EngineError, RenderOptions, Renderer};
use mathyd::security::integrity::{sign, HMAC_HEADER};
use mathyd::HttpServer;

pub const KEY: &str = "secret";

/// Deterministic engine: wraps the TeX in an `<svg>` element and fails on
/// `\invalid`.
#[derive(Default)]
pub struct StubRenderer {
    pub calls: AtomicUsize,
}

impl Renderer for StubRenderer {
    fn render(&self, tex: &str, options: &RenderOptions) -> Result<String, EngineError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if tex.contains(r"\invalid") {
            return Err(EngineError::Render(r"Undefined control sequence: \invalid".into()));
        }
        Ok(format!(
            r#"<svg data-display="{}" data-width="{}">{}</svg>"#,
            options.display, options.container_width, tex
        ))
    }

    fn name(&self) -> &'static str {
        "stub"
    }
}

pub fn config_with_key(key: &str) -> ServiceConfig {
    let mut config = ServiceConfig::default();
    config.hmac.key = SecretKey::new(key);
    config
}

/// Router wired to a stub engine; the engine handle is returned for call counting.
#[allow(dead_code)]
pub fn stub_router(config: ServiceConfig) -> (Router, Arc<StubRenderer>) {
    let engine = Arc::new(StubRenderer::default());
    let router = HttpServer::new(config, engine.clone()).into_router();
    (router, engine)
}

/// `PUT /` with the body signed under `key`.
#[allow(dead_code)]
pub fn signed_put(key: &str, body: &str) -> Request<Body> {
    let code = sign(key.as_bytes(), body.as_bytes()).unwrap();
    put_with_code(body, &code)
}

#[allow(dead_code)]
pub fn put_with_code(body: &str, code: &str) -> Request<Body> {
    Request::builder()
        .method(Method::PUT)
        .uri("/")
        .header("content-type", "application/json")
        .header(HMAC_HEADER, code)
        .body(Body::from(body.to_owned()))
        .unwrap()
}

#[allow(dead_code)]
pub async fn body_string(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

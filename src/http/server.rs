//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, panic capture, timeout)
//!
//! The body bound is enforced by the handler's read so that oversized bodies
//! get the same JSON envelope as every other pipeline failure.
//! - Bind server to listener
//! - Stop accepting on shutdown signal

use axum::{
    body::Body,
    http::Request,
    routing::get,
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ServiceConfig;
use crate::http::handlers;
use crate::http::request::{request_id, MakeRequestUuidV4, X_REQUEST_ID};
use crate::http::response::panic_response;
use crate::render::{RenderDispatcher, Renderer};
use crate::security::IntegrityVerifier;

/// Application state injected into handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    pub verifier: IntegrityVerifier,
    pub dispatcher: RenderDispatcher,
    pub max_body_bytes: usize,
}

impl AppState {
    pub fn new(config: &ServiceConfig, engine: Arc<dyn Renderer>) -> Self {
        Self {
            verifier: IntegrityVerifier::new(config.hmac.key.clone()),
            dispatcher: RenderDispatcher::new(
                engine,
                Duration::from_secs(config.render.timeout_secs),
            ),
            max_body_bytes: config.limits.max_body_bytes,
        }
    }
}

/// HTTP server for mathyd.
pub struct HttpServer {
    router: Router,
    config: ServiceConfig,
}

impl HttpServer {
    /// Create a new HTTP server around an initialized engine.
    pub fn new(config: ServiceConfig, engine: Arc<dyn Renderer>) -> Self {
        let state = AppState::new(&config, engine);
        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    pub fn build_router(config: &ServiceConfig, state: AppState) -> Router {
        let middleware = ServiceBuilder::new()
            .layer(SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuidV4))
            .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = %request_id(request.headers()),
                )
            }))
            .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
            .layer(CatchPanicLayer::custom(panic_response))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)));

        Router::new()
            .route("/", get(handlers::help).put(handlers::render))
            .route("/health", get(handlers::health))
            .with_state(state)
            .layer(middleware)
    }

    /// Run the server, accepting connections on the given listener until
    /// `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Consume the server and return its router (for in-process tests).
    pub fn into_router(self) -> Router {
        self.router
    }
}

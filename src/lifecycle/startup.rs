//! Startup orchestration.
//!
//! # Responsibilities
//! - Initialize logging and metrics from validated configuration
//! - Initialize the rendering engine once
//! - Bind the listener and begin accepting traffic
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Subsystems initialize in order, not concurrently
//! - The listener binds last (traffic only when the engine is ready)

use std::net::SocketAddr;
use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::ServiceConfig;
use crate::http::HttpServer;
use crate::lifecycle::{signals, Shutdown};
use crate::observability::{logging, metrics};
use crate::render::{EngineError, KatexEngine};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to install tracing subscriber: {0}")]
    Logging(#[from] tracing_subscriber::util::TryInitError),

    #[error("invalid bind address {0:?}")]
    BindAddress(String),

    #[error("invalid metrics address {0:?}")]
    MetricsAddress(String),

    #[error("failed to start metrics exporter: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),

    #[error("rendering engine failed to initialize: {0}")]
    Engine(#[from] EngineError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Bring the service up and serve until a termination signal arrives.
pub async fn run(config: ServiceConfig) -> Result<(), StartupError> {
    logging::init_logging(&config.observability)?;

    let bind_address = config
        .listener
        .socket_address()
        .map_err(|_| StartupError::BindAddress(config.listener.bind_address.clone()))?;

    tracing::info!("mathyd v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %bind_address,
        render_timeout_secs = config.render.timeout_secs,
        request_timeout_secs = config.timeouts.request_secs,
        max_body_bytes = config.limits.max_body_bytes,
        "Configuration loaded"
    );

    if config.hmac.key.is_empty() {
        tracing::warn!("MATHYD_HMAC_KEY is not set; every render request will be rejected");
    }

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config
            .observability
            .metrics_address
            .parse()
            .map_err(|_| StartupError::MetricsAddress(config.observability.metrics_address.clone()))?;
        metrics::init_metrics(addr)?;
    }

    let engine = KatexEngine::initialize(&config.render).await?;

    let listener = TcpListener::bind(bind_address).await?;
    tracing::info!(
        address = %listener.local_addr()?,
        "Listening for connections"
    );

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(signals::trigger_on_signal(shutdown));

    let server = HttpServer::new(config, engine);
    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

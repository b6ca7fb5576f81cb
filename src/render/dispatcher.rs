//! Render dispatch: hands a validated request to the engine.

use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;

use crate::observability::metrics;
use crate::render::engine::{EngineError, RenderOptions, Renderer};
use crate::render::request::RenderRequest;
use crate::resilience::{deadline, Elapsed};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    TimedOut(#[from] Elapsed),

    /// The engine panicked or the blocking task was cancelled.
    #[error("render task failed: {0}")]
    Task(String),
}

impl RenderError {
    pub fn reason(&self) -> &'static str {
        match self {
            RenderError::Engine(_) => "engine",
            RenderError::TimedOut(_) => "timeout",
            RenderError::Task(_) => "task",
        }
    }
}

/// Forwards requests to a shared engine handle.
#[derive(Clone)]
pub struct RenderDispatcher {
    engine: Arc<dyn Renderer>,
    timeout: Duration,
}

impl RenderDispatcher {
    pub fn new(engine: Arc<dyn Renderer>, timeout: Duration) -> Self {
        Self { engine, timeout }
    }

    /// Render `request`, returning the engine's markup.
    ///
    /// The engine runs on the blocking pool so a slow render never stalls
    /// other connections.
    pub async fn dispatch(&self, request: &RenderRequest) -> Result<String, RenderError> {
        let start = Instant::now();
        let engine = Arc::clone(&self.engine);
        let tex = request.tex.clone();
        let options = RenderOptions {
            display: request.display(),
            em: request.em,
            ex: request.ex,
            container_width: request.width,
        };

        let task = tokio::task::spawn_blocking(move || engine.render(&tex, &options));

        let result = match deadline("render", self.timeout, task).await {
            Ok(Ok(rendered)) => rendered.map_err(RenderError::from),
            Ok(Err(join_error)) => Err(RenderError::Task(join_error.to_string())),
            Err(elapsed) => Err(RenderError::from(elapsed)),
        };

        let outcome = match &result {
            Ok(_) => "ok",
            Err(e) => e.reason(),
        };
        metrics::record_render(self.engine.name(), outcome, start);

        result
    }
}

impl std::fmt::Debug for RenderDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderDispatcher")
            .field("engine", &self.engine.name())
            .field("timeout", &self.timeout)
            .finish()
    }
}

//! Rendering engine seam and the KaTeX-backed implementation.

use katex::{Opts, OptsBuilder, OutputType};
use std::sync::Arc;
use thiserror::Error;

use crate::config::{MarkupFormat, RenderConfig};

/// Layout options handed to the engine for one render.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderOptions {
    /// Block (display) math rather than inline.
    pub display: bool,
    /// Em size in pixels.
    pub em: f64,
    /// Ex size in pixels.
    pub ex: f64,
    /// Width of the containing block in pixels.
    pub container_width: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("invalid engine options: {0}")]
    Options(String),

    /// The engine rejected the input. The message is shown to the client.
    #[error("{0}")]
    Render(String),
}

/// A TeX-to-markup engine.
///
/// Implementations are synchronous and may be CPU heavy; callers run them on
/// the blocking pool.
pub trait Renderer: Send + Sync + 'static {
    fn render(&self, tex: &str, options: &RenderOptions) -> Result<String, EngineError>;

    /// Engine name for logs.
    fn name(&self) -> &'static str;
}

/// KaTeX renderer (embedded JavaScript via duktape).
///
/// KaTeX sizes its output in em units relative to the surrounding text, so
/// only `display` affects the markup; the pixel metrics are accepted and
/// logged but have no effect.
#[derive(Debug, Clone)]
pub struct KatexEngine {
    output: MarkupFormat,
    packages: Vec<String>,
}

impl KatexEngine {
    pub fn new(config: &RenderConfig) -> Self {
        Self {
            output: config.output,
            packages: config.packages.clone(),
        }
    }

    /// Build the engine once and prove it works with a probe render.
    ///
    /// The probe runs on the blocking pool because the first call boots the
    /// JavaScript context.
    pub async fn initialize(config: &RenderConfig) -> Result<Arc<dyn Renderer>, EngineError> {
        let engine = Self::new(config);

        tracing::info!(
            output = ?engine.output,
            packages = ?engine.packages,
            "Initializing KaTeX engine"
        );

        let probe = engine.clone();
        tokio::task::spawn_blocking(move || {
            probe.render(
                "x",
                &RenderOptions {
                    display: true,
                    em: 8.0,
                    ex: 16.0,
                    container_width: 1024.0,
                },
            )
        })
        .await
        .map_err(|e| EngineError::Render(format!("engine warm-up panicked: {}", e)))??;

        Ok(Arc::new(engine))
    }

    fn opts(&self, display: bool) -> Result<Opts, EngineError> {
        let output_type = match self.output {
            MarkupFormat::Mathml => OutputType::Mathml,
            MarkupFormat::Html => OutputType::Html,
            MarkupFormat::HtmlAndMathml => OutputType::HtmlAndMathml,
        };

        let mut builder = OptsBuilder::default();
        builder.display_mode(display);
        builder.output_type(output_type);
        builder
            .build()
            .map_err(|e| EngineError::Options(e.to_string()))
    }
}

impl Renderer for KatexEngine {
    fn render(&self, tex: &str, options: &RenderOptions) -> Result<String, EngineError> {
        tracing::trace!(
            display = options.display,
            em = options.em,
            ex = options.ex,
            container_width = options.container_width,
            "KaTeX render"
        );

        let opts = self.opts(options.display)?;
        katex::render_with_opts(tex, opts).map_err(|e| EngineError::Render(e.to_string()))
    }

    fn name(&self) -> &'static str {
        "katex"
    }
}

//! Rendering subsystem.
//!
//! # Data Flow
//! ```text
//! verified body bytes
//!     → request.rs (parse JSON, check type and tex, apply defaults)
//!     → dispatcher.rs (blocking pool + deadline)
//!     → engine.rs (Renderer trait; KaTeX in production)
//!     → markup string
//! ```
//!
//! # Design Decisions
//! - The engine is built once at startup and shared as `Arc<dyn Renderer>`
//! - Nothing is cached between requests

pub mod dispatcher;
pub mod engine;
pub mod request;

pub use dispatcher::{RenderDispatcher, RenderError};
pub use engine::{EngineError, KatexEngine, RenderOptions, Renderer};
pub use request::{RenderRequest, RequestError};

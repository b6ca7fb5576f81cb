//! mathyd: authenticated TeX rendering over HTTP.

pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod render;
pub mod resilience;
pub mod security;

pub use config::ServiceConfig;
pub use error::PipelineError;
pub use http::HttpServer;
pub use lifecycle::Shutdown;

//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID)
//!     → handlers.rs (GET / help, GET /health, PUT / pipeline)
//!     → response.rs (status + envelope shaping)
//!     → Send to client
//! ```

pub mod handlers;
pub mod request;
pub mod response;
pub mod server;

pub use request::X_REQUEST_ID;
pub use response::{ErrorEnvelope, RenderResponse};
pub use server::{AppState, HttpServer};

//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Render dispatch:
//!     → timeouts.rs (bound the wait on the rendering engine)
//! Whole request:
//!     → tower_http TimeoutLayer (configured in http/server.rs)
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every engine call has a deadline
//! - No retries: render failures are caused by client input

pub mod timeouts;

pub use timeouts::{deadline, Elapsed};

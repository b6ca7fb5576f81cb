//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming PUT /:
//!     → limits.rs (bounded read of the raw body)
//!     → integrity.rs (HMAC-SHA256 over the raw bytes, constant-time compare)
//!     → Pass verified bytes to the request validator
//! ```
//!
//! # Design Decisions
//! - Fail closed: no key configured means no request is accepted
//! - No trust in client input until the body is verified

pub mod integrity;
pub mod limits;

pub use integrity::{IntegrityError, IntegrityVerifier, HMAC_HEADER};
pub use limits::LimitError;

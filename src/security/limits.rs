//! Request body limits.
//!
//! # Responsibilities
//! - Buffer the raw body exactly once, bounded by `limits.max_body_bytes`
//! - Map overflow to 413 Payload Too Large
//! - Keep transport failures (client reset, truncated stream) apart from overflow
//!
//! # Design Decisions
//! - This is the only body bound: a declared `Content-Length` over the limit
//!   and a chunked body that overflows mid-stream both end here, so the client
//!   always gets the JSON envelope
//! - Raw bytes are kept intact: integrity is checked on them before parsing

use axum::body::{Body, Bytes};
use http_body_util::LengthLimitError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LimitError {
    #[error("request body too large")]
    BodyTooLarge { limit: usize },

    #[error("failed to read request body: {0}")]
    Read(String),
}

/// Read the whole request body, failing once it exceeds `limit` bytes.
pub async fn read_body(body: Body, limit: usize) -> Result<Bytes, LimitError> {
    axum::body::to_bytes(body, limit).await.map_err(|err| {
        let inner = err.into_inner();
        if inner.downcast_ref::<LengthLimitError>().is_some() {
            LimitError::BodyTooLarge { limit }
        } else {
            LimitError::Read(inner.to_string())
        }
    })
}

//! Timeout enforcement.
//!
//! # Responsibilities
//! - Wrap engine calls with a deadline
//! - Report which operation expired and after how long
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities
//! - Timeout errors are distinct from other errors
//! - Work already handed to the blocking pool keeps running after expiry;
//!   only the waiting request is released

use std::future::Future;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{operation} timed out after {}s", .after.as_secs())]
pub struct Elapsed {
    pub operation: &'static str,
    pub after: Duration,
}

/// Run `future` to completion or fail with [`Elapsed`] once `after` passes.
pub async fn deadline<F>(operation: &'static str, after: Duration, future: F) -> Result<F::Output, Elapsed>
where
    F: Future,
{
    tokio::time::timeout(after, future)
        .await
        .map_err(|_| Elapsed { operation, after })
}

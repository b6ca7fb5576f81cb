//! Request body integrity verification.
//!
//! Clients sign the exact request body with HMAC-SHA256 under the shared key
//! and send the lowercase hex digest in `x-mathyd-hmac-sha256`. The check runs
//! on raw bytes, before the body is interpreted as JSON.

use axum::http::HeaderMap;
use hmac::digest::InvalidLength;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::sync::Arc;
use subtle::ConstantTimeEq;
use thiserror::Error;

use crate::config::SecretKey;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the hex-encoded body HMAC.
pub const HMAC_HEADER: &str = "x-mathyd-hmac-sha256";

/// Reasons a body is refused. The `Display` text is the client-visible message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntegrityError {
    /// No key configured; every request fails closed.
    #[error("hmac key not set")]
    KeyNotSet,

    #[error("hmac mismatch")]
    Mismatch,
}

impl IntegrityError {
    /// Short label for logs and metrics.
    pub fn reason(&self) -> &'static str {
        match self {
            IntegrityError::KeyNotSet => "key_not_set",
            IntegrityError::Mismatch => "mismatch",
        }
    }
}

/// Lowercase hex HMAC-SHA256 of `body` under `key`.
///
/// HMAC accepts keys of any length, so the error only surfaces through the
/// generic `Mac` interface.
pub fn sign(key: &[u8], body: &[u8]) -> Result<String, InvalidLength> {
    let mut mac = HmacSha256::new_from_slice(key)?;
    mac.update(body);
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Pull the supplied code out of the request headers.
///
/// A missing or non-ASCII header yields the empty string, which never matches.
pub fn supplied_code(headers: &HeaderMap) -> &str {
    headers
        .get(HMAC_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

/// Verifies request bodies against the process-wide key.
#[derive(Clone)]
pub struct IntegrityVerifier {
    key: Arc<SecretKey>,
}

impl IntegrityVerifier {
    pub fn new(key: SecretKey) -> Self {
        Self { key: Arc::new(key) }
    }

    /// Whether a key is configured at all.
    pub fn is_configured(&self) -> bool {
        !self.key.is_empty()
    }

    /// Check `body` against the client-supplied hex code.
    pub fn verify(&self, body: &[u8], supplied: &str) -> Result<(), IntegrityError> {
        if self.key.is_empty() {
            return Err(IntegrityError::KeyNotSet);
        }

        let expected = sign(self.key.as_bytes(), body).map_err(|_| IntegrityError::Mismatch)?;

        // Length is public (always 64); only the content comparison must be constant-time.
        if bool::from(expected.as_bytes().ct_eq(supplied.as_bytes())) {
            Ok(())
        } else {
            Err(IntegrityError::Mismatch)
        }
    }
}

impl std::fmt::Debug for IntegrityVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntegrityVerifier")
            .field("key", &self.key)
            .finish()
    }
}

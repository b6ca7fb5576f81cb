//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, limits > 0)
//! - Keep the render deadline inside the request deadline
//! - Reject malformed bind addresses and package identifiers
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServiceConfig → Result<(), Vec<ValidationError>>
//! - An empty HMAC key is not an error here; requests fail closed at verification time

use thiserror::Error;

use crate::config::schema::ServiceConfig;

/// A single semantic problem with a loaded configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address {0:?} is not an IP address")]
    BindAddress(String),

    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    #[error("render.packages contains an empty identifier")]
    EmptyPackage,

    #[error("render.timeout_secs ({render}) must be less than timeouts.request_secs ({request})")]
    RenderOutlivesRequest { render: u64, request: u64 },
}

/// Check a configuration, collecting every problem found.
pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.socket_address().is_err() {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }

    if config.render.timeout_secs == 0 {
        errors.push(ValidationError::Zero("render.timeout_secs"));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::Zero("timeouts.request_secs"));
    }

    // The outer request timeout answers 408 with no body; it must not win the race.
    let (render, request) = (config.render.timeout_secs, config.timeouts.request_secs);
    if render > 0 && request > 0 && render >= request {
        errors.push(ValidationError::RenderOutlivesRequest { render, request });
    }

    if config.limits.max_body_bytes == 0 {
        errors.push(ValidationError::Zero("limits.max_body_bytes"));
    }

    if config.render.packages.iter().any(|p| p.is_empty()) {
        errors.push(ValidationError::EmptyPackage);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

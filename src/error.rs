//! Pipeline error taxonomy.
//!
//! Every stage of `PUT /` fails with its own error type; `PipelineError`
//! gathers them so the handler can use `?` throughout. `PipelineError::status`
//! maps each failure to its HTTP status; `http::response` shapes the body.

use axum::http::StatusCode;
use thiserror::Error;

use crate::render::{RenderError, RequestError};
use crate::security::{IntegrityError, LimitError};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Body(#[from] LimitError),

    #[error(transparent)]
    Integrity(#[from] IntegrityError),

    #[error(transparent)]
    Request(#[from] RequestError),

    #[error(transparent)]
    Render(#[from] RenderError),
}

impl PipelineError {
    /// HTTP status for this failure.
    ///
    /// Integrity and parse failures are 500 and field checks are 403, which
    /// existing clients depend on.
    pub fn status(&self) -> StatusCode {
        match self {
            PipelineError::Body(LimitError::BodyTooLarge { .. }) => StatusCode::PAYLOAD_TOO_LARGE,
            PipelineError::Body(LimitError::Read(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            PipelineError::Integrity(_) => StatusCode::INTERNAL_SERVER_ERROR,
            PipelineError::Request(RequestError::Parse(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            PipelineError::Request(_) => StatusCode::FORBIDDEN,
            PipelineError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Metric/log label naming the failing stage and reason.
    pub fn outcome(&self) -> &'static str {
        match self {
            PipelineError::Body(e) => match e {
                LimitError::BodyTooLarge { .. } => "body_too_large",
                LimitError::Read(_) => "body_read_failed",
            },
            PipelineError::Integrity(e) => match e {
                IntegrityError::KeyNotSet => "integrity_key_not_set",
                IntegrityError::Mismatch => "integrity_mismatch",
            },
            PipelineError::Request(e) => match e {
                RequestError::Parse(_) => "parse_error",
                RequestError::InvalidType => "invalid_type",
                RequestError::MissingTex => "missing_tex",
            },
            PipelineError::Render(e) => match e {
                RenderError::Engine(_) => "render_error",
                RenderError::TimedOut(_) => "render_timeout",
                RenderError::Task(_) => "render_task_failed",
            },
        }
    }
}

//! Response shaping.
//!
//! # Responsibilities
//! - Wrap rendered markup as `{"svg": ...}`
//! - Map every pipeline failure to its status and body
//! - Turn panics into a JSON 500 so one bad request never takes the process down
//!
//! # Design Decisions
//! - JSON failures use a single `{"error": ...}` envelope
//! - The two field checks answer with a bare text body (`invalid type`, `missing tex`)

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::any::Any;

use crate::error::PipelineError;
use crate::render::RequestError;

/// Body of every JSON error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub error: String,
}

/// Body of a successful render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderResponse {
    pub svg: String,
}

impl IntoResponse for RenderResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// JSON error envelope with the given status.
pub fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorEnvelope {
            error: message.into(),
        }),
    )
        .into_response()
}

impl IntoResponse for PipelineError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            PipelineError::Request(RequestError::InvalidType | RequestError::MissingTex) => {
                (status, self.to_string()).into_response()
            }
            _ => error_response(status, self.to_string()),
        }
    }
}

/// Panic handler for `CatchPanicLayer`.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    };

    tracing::error!(panic = %detail, "Handler panicked");
    error_response(StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
}

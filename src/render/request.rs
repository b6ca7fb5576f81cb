//! Render request parsing and validation.
//!
//! Optional fields follow JavaScript truthiness: an explicit `0`, `false`,
//! `""` or `null` is treated as absent and takes the default.

use serde_json::Value;
use thiserror::Error;

/// The only output type the service accepts.
pub const SUPPORTED_TYPE: &str = "svg";

pub const DEFAULT_EM: f64 = 8.0;
pub const DEFAULT_EX: f64 = 16.0;
pub const DEFAULT_WIDTH: f64 = 1024.0;

/// A validated rendering request.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderRequest {
    pub output_type: String,
    pub tex: String,
    pub inline: bool,
    pub em: f64,
    pub ex: f64,
    pub width: f64,
}

/// Why a verified body was refused.
#[derive(Debug, Error)]
pub enum RequestError {
    /// The body is not a JSON document.
    #[error("{0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid type")]
    InvalidType,

    #[error("missing tex")]
    MissingTex,
}

impl RequestError {
    pub fn reason(&self) -> &'static str {
        match self {
            RequestError::Parse(_) => "parse",
            RequestError::InvalidType => "invalid_type",
            RequestError::MissingTex => "missing_tex",
        }
    }
}

impl RenderRequest {
    /// Parse verified body bytes into a request.
    ///
    /// The type check precedes the tex check, so `{}` is an invalid type.
    pub fn from_slice(body: &[u8]) -> Result<Self, RequestError> {
        let document: Value = serde_json::from_slice(body)?;

        let output_type = match document.get("type") {
            Some(Value::String(t)) if t == SUPPORTED_TYPE => t.clone(),
            _ => return Err(RequestError::InvalidType),
        };

        let tex = match document.get("tex") {
            Some(Value::String(tex)) if !tex.is_empty() => tex.clone(),
            _ => return Err(RequestError::MissingTex),
        };

        Ok(Self {
            output_type,
            tex,
            inline: document.get("inline").is_some_and(is_truthy),
            em: number_or(document.get("em"), DEFAULT_EM),
            ex: number_or(document.get("ex"), DEFAULT_EX),
            width: number_or(document.get("width"), DEFAULT_WIDTH),
        })
    }

    /// Display mode is the opposite of inline.
    pub fn display(&self) -> bool {
        !self.inline
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn number_or(value: Option<&Value>, default: f64) -> f64 {
    match value.and_then(Value::as_f64) {
        Some(n) if n != 0.0 => n,
        _ => default,
    }
}

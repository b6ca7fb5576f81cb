//! Route handlers.

use axum::{
    body::Body,
    extract::State,
    http::HeaderMap,
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::time::Instant;

use crate::error::PipelineError;
use crate::http::request::request_id;
use crate::http::response::RenderResponse;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::render::RenderRequest;
use crate::security::{integrity, limits};

/// `GET /`: static usage page.
pub async fn help() -> Html<&'static str> {
    Html(HELP_HTML)
}

#[derive(Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub version: &'static str,
    pub hmac_key_configured: bool,
}

/// `GET /health`: liveness probe.
pub async fn health(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        hmac_key_configured: state.verifier.is_configured(),
    })
}

/// `PUT /`: verify, validate, render.
pub async fn render(State(state): State<AppState>, headers: HeaderMap, body: Body) -> Response {
    let start = Instant::now();
    let request_id = request_id(&headers).to_string();

    match run_pipeline(&state, &headers, body).await {
        Ok(markup) => {
            tracing::debug!(request_id = %request_id, bytes = markup.len(), "Rendered");
            metrics::record_request("ok", 200, start);
            RenderResponse { svg: markup }.into_response()
        }
        Err(err) => {
            let status = err.status();
            match &err {
                PipelineError::Integrity(_) | PipelineError::Body(_) => {
                    tracing::warn!(request_id = %request_id, status = %status, reason = %err, "Request rejected");
                }
                PipelineError::Request(_) => {
                    tracing::info!(request_id = %request_id, status = %status, reason = %err, "Invalid render request");
                }
                PipelineError::Render(_) => {
                    tracing::error!(request_id = %request_id, status = %status, error = %err, "Render failed");
                }
            }
            metrics::record_request(err.outcome(), status.as_u16(), start);
            err.into_response()
        }
    }
}

/// The linear pipeline. Each stage short-circuits on failure.
async fn run_pipeline(
    state: &AppState,
    headers: &HeaderMap,
    body: Body,
) -> Result<String, PipelineError> {
    let raw = limits::read_body(body, state.max_body_bytes).await?;

    state
        .verifier
        .verify(&raw, integrity::supplied_code(headers))
        .inspect_err(|e| metrics::record_integrity_rejection(e.reason()))?;

    let request = RenderRequest::from_slice(&raw)?;
    tracing::debug!(
        tex_len = request.tex.len(),
        inline = request.inline,
        "Dispatching render"
    );

    Ok(state.dispatcher.dispatch(&request).await?)
}

const HELP_HTML: &str = r#"<!DOCTYPE html>
<html>
  <head><title>mathyd</title></head>
  <body>
    <h1>mathyd</h1>
    <p>Renders TeX sent in authenticated <code>PUT /</code> requests.</p>

    <h2>Request</h2>
    <p>
      Send the lowercase hex HMAC-SHA256 of the exact request body, keyed with
      the shared secret, in the <code>x-mathyd-hmac-sha256</code> header.
      The body is a JSON object:
    </p>
    <ul>
      <li><b>type</b>: output format, must be <code>"svg"</code>. Required.</li>
      <li><b>tex</b>: TeX source. Required.</li>
      <li><b>inline</b>: render inline instead of display math. Default <code>false</code>.</li>
      <li><b>em</b>, <b>ex</b>: font metrics in pixels. Defaults <code>8</code> and <code>16</code>.</li>
      <li><b>width</b>: container width in pixels. Default <code>1024</code>.</li>
    </ul>

    <h2>Response</h2>
    <p>
      On success, a JSON object whose <b>svg</b> property holds the rendered
      markup. On failure, an error status with <code>{"error": "..."}</code>,
      or the text <code>invalid type</code> / <code>missing tex</code> with
      status 403.
    </p>

    <h2>Configuration</h2>
    <ul>
      <li><b>MATHYD_PORT</b>: port. Default <code>3000</code>.</li>
      <li><b>MATHYD_HMAC_KEY</b>: shared secret. Required; without it every request is refused.</li>
      <li><b>MATHYD_MATHJAX_PACKAGES</b>: comma-delimited package list. Default
        <code>base, autoload, require, ams, newcommand</code>.</li>
      <li><b>MATHYD_RENDER_TIMEOUT_SECS</b>: render deadline. Default <code>10</code>.</li>
    </ul>
  </body>
</html>
"#;

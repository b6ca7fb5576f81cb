//! Metrics collection and exposition.
//!
//! # Metrics
//! - `mathyd_requests_total` (counter): PUT requests by outcome, status
//! - `mathyd_request_duration_seconds` (histogram): PUT latency
//! - `mathyd_render_duration_seconds` (histogram): engine time by engine, outcome
//! - `mathyd_integrity_rejections_total` (counter): refused bodies by reason
//!
//! # Design Decisions
//! - Recording is a no-op until a recorder is installed
//! - The Prometheus exporter is opt-in (`observability.metrics_enabled`)

use metrics::{counter, describe_counter, describe_histogram, histogram, Unit};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};
use std::net::SocketAddr;
use std::time::Instant;

pub const REQUESTS_TOTAL: &str = "mathyd_requests_total";
pub const REQUEST_DURATION_SECONDS: &str = "mathyd_request_duration_seconds";
pub const RENDER_DURATION_SECONDS: &str = "mathyd_render_duration_seconds";
pub const INTEGRITY_REJECTIONS_TOTAL: &str = "mathyd_integrity_rejections_total";

/// Install the Prometheus recorder with an HTTP scrape listener on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    describe_metrics();
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

fn describe_metrics() {
    describe_counter!(REQUESTS_TOTAL, Unit::Count, "Render requests by outcome and status.");
    describe_histogram!(REQUEST_DURATION_SECONDS, Unit::Seconds, "Render request latency.");
    describe_histogram!(RENDER_DURATION_SECONDS, Unit::Seconds, "Time spent in the rendering engine.");
    describe_counter!(INTEGRITY_REJECTIONS_TOTAL, Unit::Count, "Bodies refused by the integrity check.");
}

/// Record a finished render request.
pub fn record_request(outcome: &'static str, status: u16, start: Instant) {
    counter!(REQUESTS_TOTAL, "outcome" => outcome, "status" => status.to_string()).increment(1);
    histogram!(REQUEST_DURATION_SECONDS).record(start.elapsed().as_secs_f64());
}

/// Record time spent in the engine.
pub fn record_render(engine: &'static str, outcome: &'static str, start: Instant) {
    histogram!(RENDER_DURATION_SECONDS, "engine" => engine, "outcome" => outcome)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_integrity_rejection(reason: &'static str) {
    counter!(INTEGRITY_REJECTIONS_TOTAL, "reason" => reason).increment(1);
}

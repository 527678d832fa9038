//! Metrics collection and exposition.
//!
//! # Metrics
//! - `relay_requests_total` (counter): requests by endpoint, status
//! - `relay_request_duration_seconds` (histogram): latency by endpoint
//! - `relay_upstream_errors_total` (counter): transport failures by endpoint
//! - `relay_frameable_total` (counter): inspection verdicts by outcome
//!
//! # Design Decisions
//! - Recording is a no-op until an exporter is installed
//! - Prometheus exporter serves its own listener

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(endpoint: &'static str, status: u16, start: Instant) {
    counter!("relay_requests_total", "endpoint" => endpoint, "status" => status.to_string())
        .increment(1);
    histogram!("relay_request_duration_seconds", "endpoint" => endpoint)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_upstream_error(endpoint: &'static str) {
    counter!("relay_upstream_errors_total", "endpoint" => endpoint).increment(1);
}

pub fn record_verdict(frameable: bool) {
    let label = if frameable { "true" } else { "false" };
    counter!("relay_frameable_total", "frameable" => label).increment(1);
}

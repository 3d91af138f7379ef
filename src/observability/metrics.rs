//! Metrics collection and exposition.
//!
//! # Metrics
//! - `relay_requests_total` (counter): API requests by route, status
//! - `relay_request_duration_seconds` (histogram): API latency
//! - `relay_submissions_total` (counter): submissions by kind, outcome
//! - `relay_finality_wait_seconds` (histogram): time spent awaiting finality
//! - `relay_gateway_calls_total` (counter): gateway calls by operation, result
//!
//! Recording is a no-op until a recorder is installed.

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::{Duration, Instant};

/// Install the Prometheus exporter on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(route: &'static str, status: u16, start: Instant) {
    counter!("relay_requests_total", "route" => route, "status" => status.to_string()).increment(1);
    histogram!("relay_request_duration_seconds", "route" => route)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_submission(kind: &'static str, outcome: &'static str) {
    counter!("relay_submissions_total", "kind" => kind, "outcome" => outcome).increment(1);
}

pub fn record_finality_wait(elapsed: Duration) {
    histogram!("relay_finality_wait_seconds").record(elapsed.as_secs_f64());
}

pub fn record_gateway_call(operation: &'static str, ok: bool) {
    let result = if ok { "ok" } else { "error" };
    counter!("relay_gateway_calls_total", "operation" => operation, "result" => result).increment(1);
}

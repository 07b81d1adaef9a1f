//! Metrics collection and exposition.
//!
//! # Metrics
//! - `multiapp_resolutions_total` (counter): resolutions by outcome
//!   (`resolved`, `forwarded`, `not_found`)
//! - `multiapp_activation_duration_seconds` (histogram): activation latency by app
//! - `multiapp_requests_total` (counter): handled requests by app and status
//! - `multiapp_request_duration_seconds` (histogram): request latency by app
//!
//! # Design Decisions
//! - Recording is a no-op until a recorder is installed
//! - Labels for app, outcome, status code

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record the outcome of an app resolution.
pub fn record_resolution(outcome: &'static str) {
    counter!("multiapp_resolutions_total", "outcome" => outcome).increment(1);
}

/// Record how long activating an app took.
pub fn record_activation(app: &str, loaded: bool, start: Instant) {
    histogram!(
        "multiapp_activation_duration_seconds",
        "app" => app.to_string(),
        "loaded" => if loaded { "true" } else { "false" }
    )
    .record(start.elapsed().as_secs_f64());
}

/// Record a request handled by an app.
pub fn record_request(app: &str, status: u16, start: Instant) {
    counter!(
        "multiapp_requests_total",
        "app" => app.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("multiapp_request_duration_seconds", "app" => app.to_string())
        .record(start.elapsed().as_secs_f64());
}

//! Metrics collection and exposition.
//!
//! # Metrics
//! - `remote_config_fetch_total` (counter): fetches by namespace, outcome
//! - `remote_config_fetch_duration_seconds` (histogram): fetch latency
//! - `remote_config_cycles_total` (counter): refresh cycles by outcome
//! - `remote_config_cycle_duration_seconds` (histogram): cycle latency
//! - `remote_config_cache_updates_total` (counter): committed writes by namespace
//! - `remote_config_cache_revision` (gauge): latest committed revision
//!
//! # Design Decisions
//! - Recording goes through the `metrics` facade; without an installed
//!   recorder every call is a no-op, so library users pay nothing
//! - The Prometheus exporter is only installed by the host binary

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_fetch(namespace: &str, outcome: &'static str, started: Instant) {
    counter!(
        "remote_config_fetch_total",
        "namespace" => namespace.to_string(),
        "outcome" => outcome
    )
    .increment(1);
    histogram!(
        "remote_config_fetch_duration_seconds",
        "namespace" => namespace.to_string()
    )
    .record(started.elapsed().as_secs_f64());
}

pub fn record_cycle(outcome: &'static str, started: Instant) {
    counter!("remote_config_cycles_total", "outcome" => outcome).increment(1);
    histogram!("remote_config_cycle_duration_seconds").record(started.elapsed().as_secs_f64());
}

pub fn record_cache_update(namespace: &str, revision: u64) {
    counter!(
        "remote_config_cache_updates_total",
        "namespace" => namespace.to_string()
    )
    .increment(1);
    gauge!("remote_config_cache_revision").set(revision as f64);
}

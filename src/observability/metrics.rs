//! Metrics collection and exposition.
//!
//! # Metrics
//! - `route_keeper_store_operations_total` (counter): store calls by op, outcome
//! - `route_keeper_store_operation_duration_seconds` (histogram): lock-to-return latency
//! - `route_keeper_persist_failures_total` (counter): load/save failures by stage
//! - `route_keeper_routes` (gauge): router entries in the committed document
//!
//! # Design Decisions
//! - Recorded through the `metrics` facade; without an installed recorder
//!   every call is a no-op, so library users and tests pay nothing
//! - Prometheus exposition is opt-in from configuration

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

use crate::error::StoreError;
use crate::persistence::Stage;

/// Install the Prometheus recorder and its scrape listener on `addr`.
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_operation<T>(op: &'static str, result: &Result<T, StoreError>, started: Instant) {
    let outcome = match result {
        Ok(_) => "ok",
        Err(e) => e.kind(),
    };
    counter!("route_keeper_store_operations_total", "op" => op, "outcome" => outcome).increment(1);
    histogram!("route_keeper_store_operation_duration_seconds", "op" => op)
        .record(started.elapsed().as_secs_f64());
}

pub fn record_persist_failure(stage: Stage) {
    counter!("route_keeper_persist_failures_total", "stage" => stage.as_str()).increment(1);
}

pub fn set_route_count(routes: usize) {
    gauge!("route_keeper_routes").set(routes as f64);
}

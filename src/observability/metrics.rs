//! Metrics collection and exposition.
//!
//! # Metrics
//! - `file_table_reloads_total` (counter): reload checks by table, outcome
//! - `file_table_entries` (gauge): entries in the installed snapshot

use std::net::SocketAddr;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus exporter with an HTTP listener on `addr`.
///
/// Must be called from within a tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "metrics endpoint listening");
    Ok(())
}

pub fn record_reload(table: &str, outcome: &'static str) {
    ::metrics::counter!(
        "file_table_reloads_total",
        "table" => table.to_string(),
        "outcome" => outcome
    )
    .increment(1);
}

pub fn record_entries(table: &str, entries: usize) {
    ::metrics::gauge!("file_table_entries", "table" => table.to_string()).set(entries as f64);
}

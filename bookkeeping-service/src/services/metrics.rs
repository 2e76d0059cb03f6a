//! Metrics collection and Prometheus export.
//!
//! Installs the Prometheus recorder, serves the /metrics text and records the
//! bookkeeping counters.

use metrics::counter;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;

/// Global handle to the Prometheus recorder.
pub static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Initialize the metrics recorder.
///
/// Must be called once at startup before any metrics are recorded. Panics if
/// the recorder cannot be installed.
pub fn init_metrics() {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .expect("failed to install Prometheus recorder");

    if METRICS_HANDLE.set(handle).is_err() {
        panic!("failed to set metrics handle: already initialized");
    }
}

/// Current metrics in Prometheus text format.
pub fn get_metrics() -> String {
    METRICS_HANDLE
        .get()
        .map(|handle| handle.render())
        .unwrap_or_else(|| "# Metrics recorder not initialized".to_string())
}

fn status(ok: bool) -> &'static str {
    if ok {
        "success"
    } else {
        "error"
    }
}

pub fn record_store_operation(collection: &'static str, operation: &'static str, ok: bool) {
    counter!(
        "bookkeeping_store_operations_total",
        "collection" => collection,
        "operation" => operation,
        "status" => status(ok)
    )
    .increment(1);
}

pub fn record_export(period: &'static str, ok: bool) {
    counter!(
        "bookkeeping_exports_total",
        "period" => period,
        "status" => status(ok)
    )
    .increment(1);
}

//! Prometheus exporter for the metrics recorded by the persistence layer.

use std::net::SocketAddr;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Histogram buckets for `database_query_duration_seconds`.
const QUERY_DURATION_BUCKETS: &[f64] = &[0.001, 0.005, 0.01, 0.05, 0.1, 0.2, 0.5, 1.0, 2.0, 5.0];

/// Installs the global recorder and serves `/metrics` on `addr`.
///
/// Must be called from within the tokio runtime, once.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .set_buckets(QUERY_DURATION_BUCKETS)?
        .install()
}

//! Metrics collection and Prometheus export.
//!
//! HTTP metrics come from `service_core::middleware::metrics_middleware`;
//! provider call metrics are recorded here.

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;
use std::time::Duration;

/// Global handle to the Prometheus recorder.
static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Install the Prometheus recorder. Later calls reuse the first handle.
pub fn init_metrics() -> &'static PrometheusHandle {
    METRICS_HANDLE.get_or_init(|| {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();

        if metrics::set_global_recorder(recorder).is_err() {
            tracing::warn!("Metrics recorder already installed");
        }

        handle
    })
}

/// Get the current metrics in Prometheus text format.
pub fn get_metrics() -> String {
    METRICS_HANDLE
        .get()
        .map(|handle| handle.render())
        .unwrap_or_else(|| "# Metrics recorder not initialized\n".to_string())
}

/// Record one provider call. `outcome` carries the error kind on failure.
pub fn record_provider_call(
    provider: &'static str,
    model: &str,
    outcome: Result<(), &'static str>,
    elapsed: Duration,
) {
    let (status, error_type) = match outcome {
        Ok(()) => ("success", "none"),
        Err(kind) => ("error", kind),
    };

    counter!(
        "tutor_provider_requests_total",
        "provider" => provider,
        "model" => model.to_string(),
        "status" => status,
        "error_type" => error_type
    )
    .increment(1);

    histogram!(
        "tutor_provider_latency_seconds",
        "provider" => provider,
        "model" => model.to_string()
    )
    .record(elapsed.as_secs_f64());
}

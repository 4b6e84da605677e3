//! Metrics collection and exposition.
//!
//! # Metrics
//! - `webdm_route_dispatch_total` (counter): dispatches by group, action
//! - `webdm_route_miss_total` (counter): locations no group claimed
//! - `webdm_shell_served_total` (counter): deep links answered with the shell

use metrics::counter;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Install the global Prometheus recorder.
///
/// Returns `None` if a recorder is already installed.
pub fn install_recorder() -> Option<PrometheusHandle> {
    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            tracing::info!("Prometheus recorder installed");
            Some(handle)
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to install Prometheus recorder");
            None
        }
    }
}

pub fn record_dispatch(group: &str, action: &str) {
    counter!(
        "webdm_route_dispatch_total",
        "group" => group.to_string(),
        "action" => action.to_string()
    )
    .increment(1);
}

pub fn record_miss() {
    counter!("webdm_route_miss_total").increment(1);
}

pub fn record_shell_served(group: &str) {
    counter!("webdm_shell_served_total", "group" => group.to_string()).increment(1);
}

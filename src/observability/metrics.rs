//! Metrics collection.
//!
//! # Metrics
//! - `api_requests_total` (counter): finished calls by target, outcome
//! - `api_attempts_total` (counter): dispatcher attempts by target, result
//! - `api_retries_total` (counter): retries by target
//! - `api_request_duration_seconds` (histogram): whole-call latency
//! - `api_notifications_total` (counter): user-visible error messages
//! - `api_loading_active` (gauge): 1 while the loading signal is on
//! - `api_loading_forced_resets_total` (counter): safety-net timer firings
//!
//! # Design Decisions
//! - Library code only talks to the facade; the CLI installs a Prometheus
//!   recorder when `metrics_enabled` is set
//! - Labels for target and outcome, never for payload content

use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};

/// Install the Prometheus recorder as the global metrics recorder.
///
/// The returned handle renders the current snapshot in text exposition format.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    tracing::info!("Metrics recorder installed");
    Ok(handle)
}

pub fn record_attempt(target: &str, result: &'static str) {
    metrics::counter!(
        "api_attempts_total",
        "target" => target.to_string(),
        "result" => result
    )
    .increment(1);
}

pub fn record_retry(target: &str) {
    metrics::counter!("api_retries_total", "target" => target.to_string()).increment(1);
}

pub fn record_call(target: &str, outcome: &'static str, start: Instant) {
    metrics::counter!(
        "api_requests_total",
        "target" => target.to_string(),
        "outcome" => outcome
    )
    .increment(1);
    metrics::histogram!("api_request_duration_seconds", "target" => target.to_string())
        .record(start.elapsed().as_secs_f64());
}

pub fn record_notification() {
    metrics::counter!("api_notifications_total").increment(1);
}

pub fn record_loading(active: bool) {
    metrics::gauge!("api_loading_active").set(if active { 1.0 } else { 0.0 });
}

pub fn record_forced_reset() {
    metrics::counter!("api_loading_forced_resets_total").increment(1);
}

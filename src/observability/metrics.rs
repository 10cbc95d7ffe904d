//! Metrics collection and exposition.
//!
//! # Metrics
//! - `shield_submissions_total` (counter): evaluated submissions by form, outcome
//! - `shield_field_rejections_total` (counter): rejected required fields by type
//! - `shield_internal_faults_total` (counter): absorbed faults by operation
//! - `shield_rate_limit_keys` (gauge): attempt logs currently tracked
//!
//! Form ids come from the client, so the `form` label only carries the
//! site's known forms; anything else is counted as `other`.

use std::net::SocketAddr;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

use crate::forms::messages::{CONTACT_FORM_ID, QUOTE_FORM_ID};

/// `form` label value for ids outside the known set.
pub const OTHER_FORM_LABEL: &str = "other";

/// Install the Prometheus exporter with an HTTP scrape listener.
///
/// Must be called from inside a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Bounded `form` label for a client-supplied form id.
pub fn form_label(form_id: &str) -> &'static str {
    match form_id {
        CONTACT_FORM_ID => CONTACT_FORM_ID,
        QUOTE_FORM_ID => QUOTE_FORM_ID,
        _ => OTHER_FORM_LABEL,
    }
}

/// Count an evaluated submission.
pub fn record_submission(form_id: &str, outcome: &'static str) {
    ::metrics::counter!(
        "shield_submissions_total",
        "form" => form_label(form_id),
        "outcome" => outcome
    )
    .increment(1);
}

/// Count a required field that failed validation.
pub fn record_field_rejection(field_type: &'static str) {
    ::metrics::counter!("shield_field_rejections_total", "field_type" => field_type).increment(1);
}

/// Count a fault that was converted into a safe default.
pub fn record_internal_fault(operation: &'static str) {
    ::metrics::counter!("shield_internal_faults_total", "operation" => operation).increment(1);
}

/// Report how many rate-limit keys are tracked.
pub fn record_rate_limit_keys(count: usize) {
    ::metrics::gauge!("shield_rate_limit_keys").set(count as f64);
}

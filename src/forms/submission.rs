//! Simulated submission of accepted forms.
//!
//! An accepted verdict is "sent" by a detached task that waits the
//! configured delay and then emits a receipt. There is no cancellation and
//! the receipt never feeds back into the verdict; it only tells the UI it
//! can re-enable the form.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::config::SubmissionConfig;
use crate::forms::messages;
use crate::forms::types::SubmissionVerdict;
use crate::security::sanitizer::SanitizedValue;

/// Emitted when a simulated submission completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionReceipt {
    pub submission_id: Uuid,
    pub form_id: String,
    pub acknowledgement: String,
    pub fields: BTreeMap<String, SanitizedValue>,
}

/// Spawns simulated submissions on the current Tokio runtime.
#[derive(Debug, Clone)]
pub struct SubmissionDispatcher {
    delay: Duration,
    receipt_tx: mpsc::UnboundedSender<SubmissionReceipt>,
}

impl SubmissionDispatcher {
    /// Create a dispatcher and the receiver its receipts arrive on.
    ///
    /// The receiver yields `None` once every dispatcher clone is dropped
    /// and all in-flight submissions have completed.
    pub fn new(delay: Duration) -> (Self, mpsc::UnboundedReceiver<SubmissionReceipt>) {
        let (receipt_tx, receipt_rx) = mpsc::unbounded_channel();
        (Self { delay, receipt_tx }, receipt_rx)
    }

    pub fn from_config(config: &SubmissionConfig) -> (Self, mpsc::UnboundedReceiver<SubmissionReceipt>) {
        Self::new(config.delay())
    }

    /// Label for the submit button while `form_id` is in flight.
    pub fn progress_label(form_id: &str) -> &'static str {
        messages::progress_label(form_id)
    }

    /// Send an accepted verdict. Returns its id, or `None` if the verdict
    /// was not accepted (nothing is spawned).
    ///
    /// Must be called from within a Tokio runtime.
    pub fn dispatch(&self, form_id: &str, verdict: &SubmissionVerdict) -> Option<Uuid> {
        if !verdict.allowed {
            return None;
        }
        let submission_id = verdict.submission_id.unwrap_or_else(Uuid::new_v4);

        let receipt = SubmissionReceipt {
            submission_id,
            form_id: form_id.to_string(),
            acknowledgement: messages::acknowledgement(form_id),
            fields: verdict.data.clone(),
        };
        let tx = self.receipt_tx.clone();
        let delay = self.delay;

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            tracing::info!(
                form_id = %receipt.form_id,
                submission_id = %receipt.submission_id,
                "Simulated submission complete"
            );
            if tx.send(receipt).is_err() {
                tracing::debug!("Receipt receiver dropped");
            }
        });

        Some(submission_id)
    }
}

//! Submission gate: rate limit, then sanitize and validate every field.
//!
//! # Flow
//! ```text
//! evaluate(form)
//!     → RateLimiter::try_acquire(form_id, signature)   denied → RateLimited
//!     → per field: sanitize → infer type → validate
//!         required & invalid  → Rejected (+ message), form invalid
//!         required & valid    → Accepted (+ "Valide")
//!         optional, non-empty → Unchecked
//!         optional, empty     → skipped
//!     → Accepted | ValidationFailed
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use uuid::Uuid;

use crate::config::ShieldConfig;
use crate::forms::inference::FieldInference;
use crate::forms::messages;
use crate::forms::types::{FieldResult, FieldStatus, FormSubmission, SubmissionVerdict, VerdictReason};
use crate::observability::metrics;
use crate::security::rate_limit::{RateLimitPolicy, RateLimiter};
use crate::security::sanitizer::{sanitize, sanitize_value};
use crate::security::types::ShieldError;
use crate::security::validator;

/// Orchestrates the pipeline for whole forms.
///
/// The limiter is shared: gates built from the same `Arc<RateLimiter>`
/// count attempts against the same logs.
#[derive(Debug, Clone)]
pub struct SubmissionGate {
    limiter: Arc<RateLimiter>,
    inference: FieldInference,
}

impl SubmissionGate {
    pub fn new(limiter: Arc<RateLimiter>, inference: FieldInference) -> Self {
        Self { limiter, inference }
    }

    /// Gate with a fresh system-clock limiter built from configuration.
    pub fn from_config(config: &ShieldConfig) -> Self {
        let limiter = RateLimiter::with_policy(RateLimitPolicy::from(&config.rate_limit));
        Self::new(Arc::new(limiter), FieldInference::new(&config.inference))
    }

    pub fn limiter(&self) -> &Arc<RateLimiter> {
        &self.limiter
    }

    /// Judge one submission attempt.
    pub fn evaluate(&self, form: &FormSubmission) -> SubmissionVerdict {
        if !self.limiter.try_acquire(&form.form_id, &form.client_signature) {
            let error = ShieldError::RateLimitExceeded { form_id: form.form_id.clone() };
            tracing::warn!(%error, "Submission refused");
            metrics::record_submission(&form.form_id, VerdictReason::RateLimited.as_str());
            let alert = messages::rate_limited(self.limiter.policy().window);
            return SubmissionVerdict::rate_limited(alert);
        }

        let mut field_results = BTreeMap::new();
        let mut data = BTreeMap::new();
        let mut all_valid = true;

        for field in &form.fields {
            let name = field.display_name().to_string();
            let field_type = self.inference.infer(field);
            let verdict = validator::verdict_for(sanitize_value(&field.value), field_type);

            let (status, message) = if field.required && !verdict.is_valid {
                all_valid = false;
                tracing::debug!(form_id = %form.form_id, field = %name, %field_type, "Field rejected");
                metrics::record_field_rejection(field_type.as_str());
                let message = sanitize(&messages::field_rejected(&name)).into_string();
                (FieldStatus::Rejected, Some(message))
            } else if verdict.sanitized.is_empty() {
                continue;
            } else {
                data.insert(name.clone(), verdict.sanitized.clone());
                if field.required {
                    (FieldStatus::Accepted, Some(messages::FIELD_VALID.to_string()))
                } else {
                    (FieldStatus::Unchecked, None)
                }
            };

            field_results.insert(
                name,
                FieldResult {
                    field_type,
                    required: field.required,
                    status,
                    verdict,
                    message,
                },
            );
        }

        let reason = if all_valid {
            VerdictReason::Accepted
        } else {
            VerdictReason::ValidationFailed
        };
        metrics::record_submission(&form.form_id, reason.as_str());

        let submission_id = all_valid.then(Uuid::new_v4);
        match submission_id {
            Some(id) => tracing::info!(
                form_id = %form.form_id,
                submission_id = %id,
                fields = data.len(),
                "Submission accepted"
            ),
            None => tracing::info!(form_id = %form.form_id, "Submission failed validation"),
        }

        SubmissionVerdict {
            allowed: all_valid,
            reason,
            field_results,
            data,
            alert: None,
            submission_id,
        }
    }
}

//! Form payloads and verdicts exchanged with the UI layer.
//!
//! All types serialize as camelCase JSON.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::security::sanitizer::SanitizedValue;
use crate::security::types::FieldType;
use crate::security::validator::ValidationVerdict;

/// Field name used when a field has neither a name nor a kind.
pub const FALLBACK_FIELD_NAME: &str = "field";

/// One input, textarea or select of a form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormField {
    /// Field name attribute.
    pub name: Option<String>,

    /// Declared input kind (`email`, `tel`, `text`, `textarea`, ...).
    pub kind: Option<String>,

    /// Placeholder text, used for type inference only.
    pub placeholder: Option<String>,

    pub required: bool,

    /// Raw value. Anything but a string is treated as empty.
    pub value: Value,

    /// Explicit type tag. Takes precedence over inference.
    pub field_type: Option<FieldType>,
}

impl FormField {
    /// A string-valued field with the given name.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            value: Value::String(value.into()),
            ..Self::default()
        }
    }

    pub fn kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn typed(mut self, field_type: FieldType) -> Self {
        self.field_type = Some(field_type);
        self
    }

    /// Key used in verdict maps: name, else kind, else `"field"`.
    pub fn display_name(&self) -> &str {
        [self.name.as_deref(), self.kind.as_deref()]
            .into_iter()
            .flatten()
            .find(|s| !s.is_empty())
            .unwrap_or(FALLBACK_FIELD_NAME)
    }
}

/// A form as submitted by the user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormSubmission {
    /// Form identifier (`contact`, `quote`, ...).
    pub form_id: String,

    /// Coarse client identity, e.g. the user agent.
    pub client_signature: String,

    pub fields: Vec<FormField>,
}

impl FormSubmission {
    pub fn new(form_id: impl Into<String>, client_signature: impl Into<String>) -> Self {
        Self {
            form_id: form_id.into(),
            client_signature: client_signature.into(),
            fields: Vec::new(),
        }
    }

    pub fn field(mut self, field: FormField) -> Self {
        self.fields.push(field);
        self
    }
}

/// Why a submission was allowed or refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerdictReason {
    RateLimited,
    ValidationFailed,
    Accepted,
}

impl VerdictReason {
    /// Label used in metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            VerdictReason::RateLimited => "rate_limited",
            VerdictReason::ValidationFailed => "validation_failed",
            VerdictReason::Accepted => "accepted",
        }
    }
}

/// How the gate treated one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldStatus {
    /// Required and valid.
    Accepted,
    /// Required and invalid.
    Rejected,
    /// Optional with a value; kept without enforcing its rule.
    Unchecked,
}

/// Per-field outcome, enough for the UI to set border state and one
/// advisory message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldResult {
    pub field_type: FieldType,
    pub required: bool,
    pub status: FieldStatus,
    #[serde(flatten)]
    pub verdict: ValidationVerdict,
    /// Sanitized advisory text, if the field gets one.
    pub message: Option<String>,
}

/// Aggregate outcome of one submission attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionVerdict {
    pub allowed: bool,
    pub reason: VerdictReason,
    pub field_results: BTreeMap<String, FieldResult>,
    /// Sanitized values that would be submitted.
    pub data: BTreeMap<String, SanitizedValue>,
    /// Blocking message for the user (rate limiting only).
    pub alert: Option<String>,
    /// Set when the submission was accepted.
    pub submission_id: Option<Uuid>,
}

impl SubmissionVerdict {
    /// Refused before any field was looked at.
    pub fn rate_limited(alert: String) -> Self {
        Self {
            allowed: false,
            reason: VerdictReason::RateLimited,
            field_results: BTreeMap::new(),
            data: BTreeMap::new(),
            alert: Some(alert),
            submission_id: None,
        }
    }

    /// Names of rejected fields.
    pub fn rejected_fields(&self) -> impl Iterator<Item = &str> {
        self.field_results
            .iter()
            .filter(|(_, r)| r.status == FieldStatus::Rejected)
            .map(|(name, _)| name.as_str())
    }
}

//! Field types and the pipeline's error taxonomy.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Semantic type of a form field. Selects the validation rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Email,
    Phone,
    Name,
    #[default]
    Text,
    Generic,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Email => "email",
            FieldType::Phone => "phone",
            FieldType::Name => "name",
            FieldType::Text => "text",
            FieldType::Generic => "generic",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown field type name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown field type: {0}")]
pub struct UnknownFieldType(pub String);

impl FromStr for FieldType {
    type Err = UnknownFieldType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "email" => Ok(FieldType::Email),
            "phone" | "tel" => Ok(FieldType::Phone),
            "name" => Ok(FieldType::Name),
            "text" => Ok(FieldType::Text),
            "generic" => Ok(FieldType::Generic),
            _ => Err(UnknownFieldType(s.to_string())),
        }
    }
}

/// Failures inside the input pipeline.
///
/// None of the core operations return these to their callers: each one is
/// absorbed at the operation boundary and turned into that operation's
/// safe default. They exist for logging and for [`check`].
///
/// [`check`]: crate::security::validator::check
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShieldError {
    /// Input was not a string. Recovered as an empty value.
    #[error("input is not a string")]
    InputType,

    /// Value does not satisfy the rule for its field type.
    #[error("value does not match the {field_type} rule")]
    PatternMismatch { field_type: FieldType },

    /// Too many attempts for this form in the current window.
    #[error("rate limit exceeded for form {form_id}")]
    RateLimitExceeded { form_id: String },

    /// Unexpected failure (poisoned lock, pattern compilation).
    #[error("internal fault: {0}")]
    InternalFault(String),
}

/// Result type for pipeline checks.
pub type ShieldResult<T> = Result<T, ShieldError>;

//! Field validation rules.
//!
//! Every check sanitizes first and classifies the sanitized value.
//!
//! | Type    | Rule                                                         |
//! |---------|--------------------------------------------------------------|
//! | email   | `local@domain.tld`, tld of 2+ ASCII letters                  |
//! | phone   | optional `+`, then 8-20 of digits, space, `-`, `(`, `)`      |
//! | name    | 2-50 letters (Latin-1 accents included), spaces, `-`, `'`    |
//! | text    | non-empty, at most 1000 characters                           |
//! | generic | non-empty                                                    |
//!
//! The name rule runs on the sanitized value, where `'` is already
//! `&#x27;`. A name containing an apostrophe therefore never matches.
//!
//! Faults (pattern compilation) fail closed: the value is rejected.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::observability::metrics;
use crate::security::sanitizer::{sanitize, sanitize_value, SanitizedValue};
use crate::security::types::{FieldType, ShieldError, ShieldResult};

/// Longest accepted free-text value, in characters.
pub const TEXT_MAX_CHARS: usize = 1000;

/// Shortest accepted name, in characters.
pub const NAME_MIN_CHARS: usize = 2;

const EMAIL_PATTERN: &str = r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$";
const PHONE_PATTERN: &str = r"^\+?[0-9\s\-\(\)]{8,20}$";
const NAME_PATTERN: &str = r"^[a-zA-ZÀ-ÿ\s\-']{2,50}$";

/// Compiled field patterns.
#[derive(Debug)]
struct CompiledPatterns {
    email: Regex,
    phone: Regex,
    name: Regex,
}

impl CompiledPatterns {
    fn compile() -> Result<Self, regex::Error> {
        Ok(Self {
            email: Regex::new(EMAIL_PATTERN)?,
            phone: Regex::new(PHONE_PATTERN)?,
            name: Regex::new(NAME_PATTERN)?,
        })
    }
}

static PATTERNS: OnceLock<Result<CompiledPatterns, regex::Error>> = OnceLock::new();

fn patterns() -> ShieldResult<&'static CompiledPatterns> {
    PATTERNS
        .get_or_init(CompiledPatterns::compile)
        .as_ref()
        .map_err(|e| ShieldError::InternalFault(format!("field pattern failed to compile: {}", e)))
}

/// Outcome of validating one field value. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationVerdict {
    pub is_valid: bool,
    pub sanitized: SanitizedValue,
}

/// Classify an already sanitized value.
pub fn classify(sanitized: &SanitizedValue, field_type: FieldType) -> ShieldResult<()> {
    let value = sanitized.as_str();
    let ok = match field_type {
        FieldType::Email => patterns()?.email.is_match(value),
        FieldType::Phone => patterns()?.phone.is_match(value),
        FieldType::Name => {
            patterns()?.name.is_match(value) && value.chars().count() >= NAME_MIN_CHARS
        }
        FieldType::Text => !value.is_empty() && value.chars().count() <= TEXT_MAX_CHARS,
        FieldType::Generic => !value.is_empty(),
    };

    if ok {
        Ok(())
    } else {
        Err(ShieldError::PatternMismatch { field_type })
    }
}

/// Sanitize and classify, reporting why a value was rejected.
pub fn check(input: &str, field_type: FieldType) -> ShieldResult<SanitizedValue> {
    let sanitized = sanitize(input);
    classify(&sanitized, field_type)?;
    Ok(sanitized)
}

/// Sanitize and classify. Never fails: faults yield `false`.
pub fn validate(input: &str, field_type: FieldType) -> bool {
    outcome_to_bool(check(input, field_type).map(|_| ()), field_type)
}

/// [`validate`] for loosely typed payload values. Non-strings are
/// sanitized to empty and judged as such.
pub fn validate_value(input: &Value, field_type: FieldType) -> bool {
    verdict_for(sanitize_value(input), field_type).is_valid
}

/// Build the per-field verdict for a raw string.
pub fn verdict(input: &str, field_type: FieldType) -> ValidationVerdict {
    verdict_for(sanitize(input), field_type)
}

/// Build the per-field verdict for a value that is already sanitized.
pub fn verdict_for(sanitized: SanitizedValue, field_type: FieldType) -> ValidationVerdict {
    let is_valid = outcome_to_bool(classify(&sanitized, field_type), field_type);
    ValidationVerdict { is_valid, sanitized }
}

fn outcome_to_bool(outcome: ShieldResult<()>, field_type: FieldType) -> bool {
    match outcome {
        Ok(()) => true,
        Err(ShieldError::PatternMismatch { .. }) => false,
        Err(e) => {
            tracing::warn!(error = %e, field_type = %field_type, "Validation fault, rejecting value");
            metrics::record_internal_fault("validate");
            false
        }
    }
}

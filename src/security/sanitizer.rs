//! HTML escaping for user-submitted field values.
//!
//! # Contract
//! - `<`, `>`, `"`, `'` and `&` are replaced by their named character
//!   references in a single pass over the input
//! - An `&` that already starts one of those references is kept as-is,
//!   so sanitizing a sanitized value changes nothing
//! - Leading/trailing whitespace is trimmed after substitution
//! - Non-string input yields an empty value (fails closed)

use std::fmt;
use std::ops::Deref;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::security::types::ShieldError;

/// References emitted by [`sanitize`]. An `&` followed by one of these
/// tails is treated as already escaped.
const ENTITIES: [&str; 5] = ["&lt;", "&gt;", "&quot;", "&#x27;", "&amp;"];

/// A string free of raw `< > " ' &` and of surrounding whitespace.
///
/// Built by [`sanitize`] and [`sanitize_value`]; deserializing runs the
/// input through [`sanitize`] too.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct SanitizedValue(String);

impl From<String> for SanitizedValue {
    fn from(raw: String) -> Self {
        sanitize(&raw)
    }
}

impl From<SanitizedValue> for String {
    fn from(value: SanitizedValue) -> Self {
        value.0
    }
}

impl SanitizedValue {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl Deref for SanitizedValue {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for SanitizedValue {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SanitizedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<str> for SanitizedValue {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for SanitizedValue {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Escape HTML-significant characters and trim.
pub fn sanitize(input: &str) -> SanitizedValue {
    let mut output = String::with_capacity(input.len());
    for (idx, c) in input.char_indices() {
        match c {
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            '"' => output.push_str("&quot;"),
            '\'' => output.push_str("&#x27;"),
            '&' if starts_entity(&input[idx..]) => output.push('&'),
            '&' => output.push_str("&amp;"),
            _ => output.push(c),
        }
    }

    let trimmed = output.trim();
    if trimmed.len() == output.len() {
        SanitizedValue(output)
    } else {
        SanitizedValue(trimmed.to_owned())
    }
}

/// Sanitize a loosely typed value as received from a form payload.
///
/// Anything other than a JSON string becomes an empty value.
pub fn sanitize_value(input: &Value) -> SanitizedValue {
    match input {
        Value::String(s) => sanitize(s),
        other => {
            tracing::trace!(
                error = %ShieldError::InputType,
                kind = value_kind(other),
                "Non-string input sanitized to empty"
            );
            SanitizedValue::default()
        }
    }
}

fn starts_entity(rest: &str) -> bool {
    ENTITIES.iter().any(|entity| rest.starts_with(entity))
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

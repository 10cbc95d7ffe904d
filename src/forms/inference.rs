//! Field-type inference for fields without an explicit type tag.
//!
//! Best effort only. Order of precedence:
//! 1. explicit `field_type`
//! 2. kind `email` → email, kind `tel` → phone
//! 3. name listed in `name_field_names`, or placeholder containing one of
//!    `name_placeholder_keywords` (case-insensitive) → name
//! 4. text

use crate::config::InferenceConfig;
use crate::forms::types::FormField;
use crate::security::types::FieldType;

/// Configured inference heuristics.
#[derive(Debug, Clone)]
pub struct FieldInference {
    name_field_names: Vec<String>,
    placeholder_keywords: Vec<String>,
}

impl FieldInference {
    pub fn new(config: &InferenceConfig) -> Self {
        Self {
            name_field_names: config.name_field_names.clone(),
            placeholder_keywords: config
                .name_placeholder_keywords
                .iter()
                .map(|k| k.to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
        }
    }

    /// Type the validator should apply to `field`.
    pub fn infer(&self, field: &FormField) -> FieldType {
        if let Some(explicit) = field.field_type {
            return explicit;
        }

        match field.kind.as_deref() {
            Some(kind) if kind.eq_ignore_ascii_case("email") => return FieldType::Email,
            Some(kind) if kind.eq_ignore_ascii_case("tel") => return FieldType::Phone,
            _ => {}
        }

        if self.is_name_field(field) {
            FieldType::Name
        } else {
            FieldType::Text
        }
    }

    fn is_name_field(&self, field: &FormField) -> bool {
        let by_name = field
            .name
            .as_deref()
            .is_some_and(|name| self.name_field_names.iter().any(|n| n == name));
        if by_name {
            return true;
        }

        field.placeholder.as_deref().is_some_and(|placeholder| {
            let placeholder = placeholder.to_lowercase();
            self.placeholder_keywords
                .iter()
                .any(|keyword| placeholder.contains(keyword.as_str()))
        })
    }
}

impl Default for FieldInference {
    fn default() -> Self {
        Self::new(&InferenceConfig::default())
    }
}

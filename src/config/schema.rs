//! Configuration schema definitions.
//!
//! Every timing constant of the pipeline lives here rather than in code.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct ShieldConfig {
    /// Submission attempt throttling.
    pub rate_limit: RateLimitConfig,

    /// Simulated submission behaviour.
    pub submission: SubmissionConfig,

    /// Field-type inference for untyped fields.
    pub inference: InferenceConfig,

    /// Logging and metrics.
    pub observability: ObservabilityConfig,
}

/// Rate limiting configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Sliding window length in milliseconds.
    pub window_ms: u64,

    /// Granted attempts allowed per key inside the window.
    pub max_attempts: usize,

    /// Characters of the client signature kept in the key.
    pub signature_prefix_chars: usize,
}

impl RateLimitConfig {
    pub fn window(&self) -> Duration {
        Duration::from_millis(self.window_ms)
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            window_ms: 300_000,
            max_attempts: 5,
            signature_prefix_chars: 50,
        }
    }
}

/// Simulated submission configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct SubmissionConfig {
    /// Delay before an accepted submission is acknowledged, in milliseconds.
    pub delay_ms: u64,
}

impl SubmissionConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

impl Default for SubmissionConfig {
    fn default() -> Self {
        Self { delay_ms: 2000 }
    }
}

/// Heuristics used when a field carries no explicit type.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct InferenceConfig {
    /// Field names (exact, case-sensitive) treated as person names.
    pub name_field_names: Vec<String>,

    /// Placeholder substrings (matched lowercase) that mark a name field.
    pub name_placeholder_keywords: Vec<String>,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            name_field_names: vec!["name".to_string()],
            name_placeholder_keywords: vec!["nom".to_string(), "name".to_string()],
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format: "pretty" or "json".
    pub log_format: String,

    /// Enable the Prometheus endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9464".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_documented_constants() {
        let config = ShieldConfig::default();
        assert_eq!(config.rate_limit.window(), Duration::from_secs(300));
        assert_eq!(config.rate_limit.max_attempts, 5);
        assert_eq!(config.rate_limit.signature_prefix_chars, 50);
        assert_eq!(config.submission.delay(), Duration::from_secs(2));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: ShieldConfig = toml::from_str(
            r#"
            [rate_limit]
            max_attempts = 3
            "#,
        )
        .unwrap();
        assert_eq!(config.rate_limit.max_attempts, 3);
        assert_eq!(config.rate_limit.window_ms, 300_000);
        assert_eq!(config.inference, InferenceConfig::default());
    }
}

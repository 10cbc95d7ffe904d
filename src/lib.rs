//! Defensive input pipeline for website forms.
//!
//! Sanitize → validate → rate-limit → gate, plus the scroll-driven
//! navigation highlight used by the same pages.

pub mod config;
pub mod forms;
pub mod navigation;
pub mod observability;
pub mod security;

pub use config::schema::ShieldConfig;
pub use forms::{FormField, FormSubmission, SubmissionDispatcher, SubmissionGate, SubmissionVerdict, VerdictReason};
pub use security::{sanitize, validate, FieldType, RateLimiter, SanitizedValue};

//! Shared fixtures for integration tests.

use std::sync::Arc;

use form_shield::forms::{FieldInference, FormField, FormSubmission, SubmissionGate};
use form_shield::security::{ManualClock, RateLimitPolicy, RateLimiter};

pub const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0";

/// Gate on a manual clock with default policy.
pub fn manual_gate() -> (SubmissionGate, Arc<RateLimiter>, ManualClock) {
    let clock = ManualClock::default();
    let limiter = Arc::new(RateLimiter::new(RateLimitPolicy::default(), Arc::new(clock.clone())));
    let gate = SubmissionGate::new(limiter.clone(), FieldInference::default());
    (gate, limiter, clock)
}

/// The site's contact form.
pub fn contact_form(name: &str, email: &str, message: &str) -> FormSubmission {
    FormSubmission::new("contact", USER_AGENT)
        .field(FormField::new("name", name).kind("text").placeholder("Votre nom").required())
        .field(FormField::new("email", email).kind("email").required())
        .field(FormField::new("phone", "").kind("tel"))
        .field(FormField::new("message", message).kind("textarea").required())
}

/// The site's quote request form.
#[allow(dead_code)]
pub fn quote_form(company: &str, phone: &str) -> FormSubmission {
    FormSubmission::new("quote", USER_AGENT)
        .field(FormField::new("company", company).placeholder("Entreprise").required())
        .field(FormField::new("phone", phone).kind("tel").required())
        .field(FormField::new("budget", "").kind("select"))
}

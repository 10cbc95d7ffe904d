//! End-to-end properties of the input pipeline.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use form_shield::forms::{FieldStatus, FormField, FormSubmission, VerdictReason};
use form_shield::security::{sanitize, sanitize_value, validate, FieldType};
use serde_json::json;

mod common;

#[test]
fn test_sanitize_properties() {
    assert_eq!(sanitize("<script>"), "&lt;script&gt;");

    let hostile = [
        "<script>alert(document.cookie)</script>",
        "\"><svg onload=alert(1)>",
        "' OR '1'='1",
        "&lt;already&gt; & raw",
        "  \u{a0}spaced\u{a0}  ",
    ];
    for input in hostile {
        let once = sanitize(input);
        assert_eq!(sanitize(&once), once, "sanitize not idempotent for {:?}", input);
        assert!(!once.contains(['<', '>', '"', '\'']));
    }

    for value in [json!(null), json!(1.5), json!(false), json!([]), json!({})] {
        assert_eq!(sanitize_value(&value), "");
    }
}

#[test]
fn test_validation_examples() {
    assert!(validate("a@b.co", FieldType::Email));
    assert!(!validate("not-an-email", FieldType::Email));
    assert!(!validate("J", FieldType::Name));
    assert!(validate("Jean-Paul", FieldType::Name));
}

#[test]
fn test_contact_form_round() {
    let (gate, _, _) = common::manual_gate();
    let verdict = gate.evaluate(&common::contact_form(
        "Marie-Hélène",
        "marie@exemple.fr",
        "J'aimerais un devis pour <3 pages>",
    ));

    assert!(verdict.allowed);
    assert_eq!(verdict.reason, VerdictReason::Accepted);
    assert_eq!(verdict.field_results["name"].field_type, FieldType::Name);
    assert_eq!(
        verdict.data["message"],
        "J&#x27;aimerais un devis pour &lt;3 pages&gt;"
    );
    assert!(!verdict.field_results.contains_key("phone"));
}

#[test]
fn test_required_empty_email() {
    let (gate, _, _) = common::manual_gate();
    let verdict = gate.evaluate(&common::contact_form("Marie", "", "Bonjour"));

    assert!(!verdict.allowed);
    assert_eq!(verdict.reason, VerdictReason::ValidationFailed);
    assert_eq!(verdict.field_results["email"].status, FieldStatus::Rejected);
    assert_eq!(verdict.field_results["name"].status, FieldStatus::Accepted);
}

#[test]
fn test_quote_form_phone_rules() {
    let (gate, _, _) = common::manual_gate();
    assert!(gate.evaluate(&common::quote_form("ACME", "+33 6 12 34 56 78")).allowed);

    let verdict = gate.evaluate(&common::quote_form("ACME", "06"));
    assert_eq!(verdict.rejected_fields().collect::<Vec<_>>(), vec!["phone"]);
}

#[test]
fn test_exhausted_limit_skips_fields() {
    let (gate, limiter, clock) = common::manual_gate();
    for _ in 0..5 {
        assert!(limiter.try_acquire("contact", common::USER_AGENT));
    }

    let verdict = gate.evaluate(&common::contact_form("Marie", "marie@exemple.fr", "Bonjour"));
    assert!(!verdict.allowed);
    assert_eq!(verdict.reason, VerdictReason::RateLimited);
    assert!(verdict.field_results.is_empty());

    // Other forms and other clients are unaffected.
    assert!(gate.evaluate(&common::quote_form("ACME", "0612345678")).allowed);
    let mut other_client = common::contact_form("Marie", "marie@exemple.fr", "Bonjour");
    other_client.client_signature = "curl/8.4.0".into();
    assert!(gate.evaluate(&other_client).allowed);

    clock.advance(Duration::from_secs(301));
    assert!(gate.evaluate(&common::contact_form("Marie", "marie@exemple.fr", "Bonjour")).allowed);
}

#[test]
fn test_limiter_shared_between_gates() {
    let (gate, limiter, _) = common::manual_gate();
    let other = gate.clone();
    let form = common::contact_form("Marie", "marie@exemple.fr", "Bonjour");

    for i in 0..5 {
        let g = if i % 2 == 0 { &gate } else { &other };
        assert!(g.evaluate(&form).allowed);
    }
    assert_eq!(other.evaluate(&form).reason, VerdictReason::RateLimited);
    assert_eq!(limiter.attempt_count("contact", common::USER_AGENT), 5);
}

#[test]
fn test_concurrent_submissions_respect_ceiling() {
    let (gate, _, _) = common::manual_gate();
    let gate = Arc::new(gate);

    let handles: Vec<_> = (0..20)
        .map(|_| {
            let gate = gate.clone();
            thread::spawn(move || {
                let form = FormSubmission::new("contact", common::USER_AGENT)
                    .field(FormField::new("message", "hello").required());
                gate.evaluate(&form).reason
            })
        })
        .collect();

    let reasons: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let accepted = reasons.iter().filter(|r| **r == VerdictReason::Accepted).count();
    let limited = reasons.iter().filter(|r| **r == VerdictReason::RateLimited).count();
    assert_eq!(accepted, 5);
    assert_eq!(limited, 15);
}

#[test]
fn test_verdict_json_for_ui() {
    let (gate, _, _) = common::manual_gate();
    let verdict = gate.evaluate(&common::contact_form("M", "marie@exemple.fr", "Bonjour"));
    let json = serde_json::to_value(&verdict).unwrap();

    assert_eq!(json["reason"], json!("ValidationFailed"));
    assert_eq!(json["fieldResults"]["name"]["status"], json!("rejected"));
    assert_eq!(json["fieldResults"]["name"]["isValid"], json!(false));
    assert_eq!(json["fieldResults"]["name"]["message"], json!("name invalide ou requis"));
    assert_eq!(json["fieldResults"]["email"]["fieldType"], json!("email"));
    assert_eq!(json["submissionId"], json!(null));
}

//! Accepted verdicts flowing into the simulated submission.

use std::time::Duration;

use form_shield::config::loader::parse_config;
use form_shield::forms::{run_session, SessionSummary, SubmissionDispatcher, SubmissionGate, VerdictReason};
use serde_json::Value;

mod common;

#[tokio::test(start_paused = true)]
async fn test_accepted_then_receipt() {
    let (gate, _, _) = common::manual_gate();
    let (dispatcher, mut receipts) = SubmissionDispatcher::new(Duration::from_millis(2000));

    let verdict = gate.evaluate(&common::contact_form("Marie", "marie@exemple.fr", "Bonjour"));
    let id = dispatcher.dispatch("contact", &verdict).expect("accepted verdict dispatches");

    let started = tokio::time::Instant::now();
    let receipt = receipts.recv().await.unwrap();
    assert!(started.elapsed() >= Duration::from_millis(2000));
    assert_eq!(receipt.submission_id, id);
    assert_eq!(receipt.fields, verdict.data);
    assert!(receipt.acknowledgement.contains("Merci pour votre message"));
}

#[tokio::test(start_paused = true)]
async fn test_failed_verdict_sends_nothing() {
    let (gate, _, _) = common::manual_gate();
    let (dispatcher, mut receipts) = SubmissionDispatcher::new(Duration::from_millis(2000));

    let verdict = gate.evaluate(&common::contact_form("Marie", "nope", "Bonjour"));
    assert_eq!(verdict.reason, VerdictReason::ValidationFailed);
    assert!(dispatcher.dispatch("contact", &verdict).is_none());

    drop(dispatcher);
    assert!(receipts.recv().await.is_none());
}

#[tokio::test(start_paused = true)]
async fn test_configured_limits_and_delay() {
    let config = parse_config(
        r#"
[rate_limit]
window_ms = 60000
max_attempts = 2

[submission]
delay_ms = 50
"#,
    )
    .unwrap();

    let gate = SubmissionGate::from_config(&config);
    let (dispatcher, mut receipts) = SubmissionDispatcher::from_config(&config.submission);
    let form = common::quote_form("ACME", "0612345678");

    for _ in 0..2 {
        let verdict = gate.evaluate(&form);
        assert!(verdict.allowed);
        dispatcher.dispatch("quote", &verdict);
    }
    let blocked = gate.evaluate(&form);
    assert_eq!(blocked.reason, VerdictReason::RateLimited);
    assert!(blocked.alert.unwrap().contains("1 minute"));

    drop(dispatcher);
    let mut count = 0;
    while let Some(receipt) = receipts.recv().await {
        assert!(receipt.acknowledgement.starts_with("Votre demande de devis"));
        count += 1;
    }
    assert_eq!(count, 2);
}

#[tokio::test(start_paused = true)]
async fn test_session_survives_undecodable_line() {
    let (gate, _, _) = common::manual_gate();
    let (dispatcher, receipts) = SubmissionDispatcher::new(Duration::from_millis(2000));

    let contact = serde_json::to_string(&common::contact_form("Marie", "marie@exemple.fr", "Bonjour")).unwrap();
    let mut input = format!("{}\n", contact).into_bytes();
    input.extend_from_slice(b"\xff\xfe\n");
    input.extend_from_slice(format!("{}\n", contact).as_bytes());

    let mut output = Vec::new();
    let summary = run_session(
        &gate,
        dispatcher,
        receipts,
        &input[..],
        &mut output,
        std::future::pending(),
    )
    .await
    .unwrap();

    assert_eq!(summary, SessionSummary { lines: 3, verdicts: 2, errors: 1, receipts: 2 });

    let lines: Vec<Value> = std::str::from_utf8(&output)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(lines.len(), 5);
    assert_eq!(lines[0]["verdict"]["allowed"], true);
    assert_eq!(lines[1]["error"]["line"], 2);
    assert!(lines[1]["error"]["message"].as_str().unwrap().contains("UTF-8"));
    assert_eq!(lines[2]["verdict"]["allowed"], true);
    assert!(lines[3..].iter().all(|l| l["receipt"]["formId"] == "contact"));
}

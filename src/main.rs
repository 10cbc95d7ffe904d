//! Form Shield session (v1)
//!
//! Evaluates form submissions streamed as JSON lines on stdin, one verdict
//! per line on stdout. Rate-limit state lives for the whole session.
//!
//! # Architecture Overview
//!
//! ```text
//!   stdin (FormSubmission per line)
//!        │
//!        ▼
//!   ┌──────────────────────────────────────────────────────┐
//!   │ SubmissionGate                                       │
//!   │   RateLimiter ──denied──▶ RateLimited                │
//!   │   per field: sanitizer → inference → validator       │
//!   └───────────────┬──────────────────────────────────────┘
//!                   │ SubmissionVerdict ──▶ stdout {"verdict": ...}
//!                   ▼ (accepted only)
//!   SubmissionDispatcher ──delay──▶ stdout {"receipt": ...}
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::io::BufReader;

use form_shield::config::loader::load_or_default;
use form_shield::forms::{run_session, SubmissionDispatcher, SubmissionGate};
use form_shield::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "form-shield")]
#[command(about = "Evaluate form submissions read as JSON lines from stdin", long_about = None)]
struct Args {
    /// TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = load_or_default(args.config.as_deref())?;

    logging::init_logging(&config.observability)?;
    tracing::info!("form-shield v0.1.0 starting");
    tracing::info!(
        window_ms = config.rate_limit.window_ms,
        max_attempts = config.rate_limit.max_attempts,
        delay_ms = config.submission.delay_ms,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        metrics::init_metrics(config.observability.metrics_address.parse()?)?;
    }

    let gate = SubmissionGate::from_config(&config);
    let (dispatcher, receipts) = SubmissionDispatcher::from_config(&config.submission);

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "Ctrl-C handler unavailable");
            std::future::pending::<()>().await;
        }
    };

    let mut stdout = tokio::io::stdout();
    let summary = run_session(
        &gate,
        dispatcher,
        receipts,
        BufReader::new(tokio::io::stdin()),
        &mut stdout,
        shutdown,
    )
    .await?;

    tracing::info!(
        lines = summary.lines,
        verdicts = summary.verdicts,
        errors = summary.errors,
        receipts = summary.receipts,
        "Session complete"
    );
    Ok(())
}

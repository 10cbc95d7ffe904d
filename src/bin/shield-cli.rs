use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::json;

use form_shield::config::loader::load_or_default;
use form_shield::forms::{email_blur_feedback, email_input_feedback, FormSubmission, SubmissionGate};
use form_shield::observability::logging;
use form_shield::security::{sanitize, validator, FieldType};

#[derive(Parser)]
#[command(name = "shield-cli")]
#[command(about = "One-shot checks against the form input pipeline", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Escape a value as it would be stored
    Sanitize { value: String },
    /// Validate a value against a field type
    Validate {
        #[arg(short = 't', long = "type", default_value = "text")]
        field_type: FieldType,
        value: String,
    },
    /// Live and on-blur feedback for an email input
    Email { value: String },
    /// Evaluate a single form submission read from a JSON file
    Evaluate { path: PathBuf },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_or_default(cli.config.as_deref())?;
    logging::init_logging(&config.observability)?;

    let output = match cli.command {
        Commands::Sanitize { value } => json!({ "sanitized": sanitize(&value) }),
        Commands::Validate { field_type, value } => {
            let verdict = validator::verdict(&value, field_type);
            json!({ "fieldType": field_type, "isValid": verdict.is_valid, "sanitized": verdict.sanitized })
        }
        Commands::Email { value } => json!({
            "input": email_input_feedback(&value),
            "blur": email_blur_feedback(&value),
        }),
        Commands::Evaluate { path } => {
            let content = std::fs::read_to_string(&path)?;
            let form: FormSubmission = serde_json::from_str(&content)?;
            let gate = SubmissionGate::from_config(&config);
            serde_json::to_value(gate.evaluate(&form))?
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

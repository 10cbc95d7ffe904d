//! Live feedback for an email input while the user types.

use serde::{Deserialize, Serialize};

use crate::forms::messages;
use crate::security::types::FieldType;
use crate::security::validator::validate;

/// What the UI should show under the email input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "message", rename_all = "lowercase")]
pub enum EmailFeedback {
    /// Input is blank: remove any message and border colour.
    Clear,
    Valid(String),
    Invalid(String),
}

/// Feedback on every keystroke.
pub fn email_input_feedback(raw: &str) -> EmailFeedback {
    let email = raw.trim();
    if email.is_empty() {
        EmailFeedback::Clear
    } else if validate(email, FieldType::Email) {
        EmailFeedback::Valid(messages::EMAIL_VALID.to_string())
    } else {
        EmailFeedback::Invalid(messages::EMAIL_INVALID.to_string())
    }
}

/// Format hint when the input loses focus. `None` leaves the UI as is.
pub fn email_blur_feedback(raw: &str) -> Option<String> {
    let email = raw.trim();
    if !email.is_empty() && !validate(email, FieldType::Email) {
        Some(messages::EMAIL_FORMAT_HINT.to_string())
    } else {
        None
    }
}

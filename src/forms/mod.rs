//! Form-level orchestration.
//!
//! # Data Flow
//! ```text
//! FormSubmission (from UI)
//!     → gate.rs (rate limit, per-field sanitize/validate)
//!     → SubmissionVerdict (to UI: borders, messages, alert)
//!     → submission.rs (delayed receipt for accepted verdicts)
//!
//! NDJSON byte stream
//!     → session.rs (decode per line, gate, emit verdicts/receipts/errors)
//!
//! email input events
//!     → feedback.rs (live validity message)
//! ```

pub mod feedback;
pub mod gate;
pub mod inference;
pub mod messages;
pub mod session;
pub mod submission;
pub mod types;

pub use feedback::{email_blur_feedback, email_input_feedback, EmailFeedback};
pub use gate::SubmissionGate;
pub use inference::FieldInference;
pub use session::{run_session, SessionSummary};
pub use submission::{SubmissionDispatcher, SubmissionReceipt};
pub use types::{FieldResult, FieldStatus, FormField, FormSubmission, SubmissionVerdict, VerdictReason};

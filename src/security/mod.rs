//! Input defense pipeline.
//!
//! # Data Flow
//! ```text
//! raw field value
//!     → sanitizer.rs (escape < > " ' &, trim)
//!     → validator.rs (classify per FieldType)
//!
//! form id + client signature
//!     → rate_limit.rs (sliding window per key)
//! ```
//!
//! # Design Decisions
//! - No operation here raises past its own boundary
//! - Sanitizing fails closed (empty value), validation fails closed
//!   (`false`), rate limiting fails open (`true`)
//! - Time is read through the `Clock` port

pub mod clock;
pub mod rate_limit;
pub mod sanitizer;
pub mod types;
pub mod validator;

pub use clock::{Clock, ManualClock, SystemClock};
pub use rate_limit::{RateLimitPolicy, RateLimiter};
pub use sanitizer::{sanitize, sanitize_value, SanitizedValue};
pub use types::{FieldType, ShieldError, ShieldResult};
pub use validator::{validate, ValidationVerdict};

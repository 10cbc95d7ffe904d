//! Navigation highlight state machine.
//!
//! Independent of the input pipeline; shares only the `Clock` port.

pub mod highlight;
pub mod throttle;

pub use highlight::{NavHighlighter, NavView, NavigationState, ScrollSnapshot, Section};
pub use throttle::{Throttle, DEFAULT_SCROLL_THROTTLE};

//! Leading-edge throttle.
//!
//! The first call fires; further calls are dropped until `limit` has
//! elapsed since the last one that fired.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::security::clock::Clock;

/// Default spacing between handled scroll events.
pub const DEFAULT_SCROLL_THROTTLE: Duration = Duration::from_millis(150);

#[derive(Debug)]
pub struct Throttle {
    limit: Duration,
    clock: Arc<dyn Clock>,
    last_fired: Option<Instant>,
}

impl Throttle {
    pub fn new(limit: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            limit,
            clock,
            last_fired: None,
        }
    }

    /// `true` if the caller should run now.
    pub fn try_fire(&mut self) -> bool {
        let now = self.clock.now();
        match self.last_fired {
            Some(last) if now.saturating_duration_since(last) < self.limit => false,
            _ => {
                self.last_fired = Some(now);
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::security::clock::ManualClock;

    #[test]
    fn test_drops_calls_inside_limit() {
        let clock = ManualClock::default();
        let mut throttle = Throttle::new(DEFAULT_SCROLL_THROTTLE, Arc::new(clock.clone()));

        assert!(throttle.try_fire());
        assert!(!throttle.try_fire());
        clock.advance(Duration::from_millis(149));
        assert!(!throttle.try_fire());
        clock.advance(Duration::from_millis(1));
        assert!(throttle.try_fire());
        assert!(!throttle.try_fire());
    }
}

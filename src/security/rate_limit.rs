//! Sliding-window submission throttling.
//!
//! Each key (`form id` + truncated client signature) owns a log of granted
//! attempt instants. Every check prunes the log, then either denies (log
//! full) or appends `now`. The three steps run under one lock, so concurrent
//! callers can never both observe a free slot.
//!
//! The signature is client supplied and trivially spoofed: this is abuse
//! friction, not an access control. Faults fail open.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use crate::config::RateLimitConfig;
use crate::observability::metrics;
use crate::security::clock::{Clock, SystemClock};

/// Signature used when the client provides none.
pub const UNKNOWN_SIGNATURE: &str = "unknown";

/// Window, ceiling and key shape for a [`RateLimiter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    pub window: Duration,
    pub max_attempts: usize,
    pub signature_prefix_chars: usize,
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        Self::from(&RateLimitConfig::default())
    }
}

impl From<&RateLimitConfig> for RateLimitPolicy {
    fn from(config: &RateLimitConfig) -> Self {
        Self {
            window: config.window(),
            max_attempts: config.max_attempts,
            signature_prefix_chars: config.signature_prefix_chars,
        }
    }
}

/// Granted attempts for one key, oldest first.
#[derive(Debug, Default)]
struct AttemptLog {
    attempts: VecDeque<Instant>,
}

impl AttemptLog {
    /// Drop attempts with `now - t >= window`.
    fn prune(&mut self, now: Instant, window: Duration) {
        while let Some(&oldest) = self.attempts.front() {
            if now.saturating_duration_since(oldest) >= window {
                self.attempts.pop_front();
            } else {
                break;
            }
        }
    }

    fn live(&self, now: Instant, window: Duration) -> impl Iterator<Item = &Instant> {
        self.attempts
            .iter()
            .filter(move |t| now.saturating_duration_since(**t) < window)
    }
}

/// Per-key attempt tracker. Construct once per session and share via `Arc`.
#[derive(Debug)]
pub struct RateLimiter {
    logs: Mutex<HashMap<String, AttemptLog>>,
    policy: RateLimitPolicy,
    clock: Arc<dyn Clock>,
}

impl RateLimiter {
    pub fn new(policy: RateLimitPolicy, clock: Arc<dyn Clock>) -> Self {
        Self {
            logs: Mutex::new(HashMap::new()),
            policy,
            clock,
        }
    }

    /// Limiter on the system clock.
    pub fn with_policy(policy: RateLimitPolicy) -> Self {
        Self::new(policy, Arc::new(SystemClock::new()))
    }

    pub fn policy(&self) -> &RateLimitPolicy {
        &self.policy
    }

    /// Composite key for a form and client signature.
    pub fn key(&self, form_id: &str, client_signature: &str) -> String {
        rate_limit_key(form_id, client_signature, self.policy.signature_prefix_chars)
    }

    /// Grant or deny one attempt. Granted attempts are recorded; denied
    /// ones are not. Returns `true` if the internal state is unusable.
    pub fn try_acquire(&self, form_id: &str, client_signature: &str) -> bool {
        let key = self.key(form_id, client_signature);
        let now = self.clock.now();

        let Some(mut logs) = self.lock("try_acquire") else {
            return true;
        };

        let log = logs.entry(key).or_default();
        log.prune(now, self.policy.window);

        if log.attempts.len() >= self.policy.max_attempts {
            tracing::debug!(
                form_id = %form_id,
                attempts = log.attempts.len(),
                "Attempt denied"
            );
            return false;
        }

        log.attempts.push_back(now);
        let tracked = logs.len();
        drop(logs);

        metrics::record_rate_limit_keys(tracked);
        true
    }

    /// Attempts currently counted against the key. Does not record or prune.
    pub fn attempt_count(&self, form_id: &str, client_signature: &str) -> usize {
        let key = self.key(form_id, client_signature);
        let now = self.clock.now();
        self.lock("attempt_count")
            .and_then(|logs| {
                logs.get(&key)
                    .map(|log| log.live(now, self.policy.window).count())
            })
            .unwrap_or(0)
    }

    /// Time until the key frees a slot, if it is saturated.
    pub fn retry_after(&self, form_id: &str, client_signature: &str) -> Option<Duration> {
        let key = self.key(form_id, client_signature);
        let now = self.clock.now();
        let logs = self.lock("retry_after")?;
        let log = logs.get(&key)?;

        let mut live = log.live(now, self.policy.window).peekable();
        let oldest = **live.peek()?;
        if live.count() < self.policy.max_attempts {
            return None;
        }
        Some(self.policy.window - now.saturating_duration_since(oldest))
    }

    /// Number of keys with an attempt log.
    pub fn tracked_keys(&self) -> usize {
        self.lock("tracked_keys").map(|logs| logs.len()).unwrap_or(0)
    }

    /// Forget every attempt log.
    pub fn reset(&self) {
        if let Some(mut logs) = self.lock("reset") {
            logs.clear();
        }
        metrics::record_rate_limit_keys(0);
        tracing::info!("Rate limiter state reset");
    }

    fn lock(&self, operation: &'static str) -> Option<MutexGuard<'_, HashMap<String, AttemptLog>>> {
        match self.logs.lock() {
            Ok(guard) => Some(guard),
            Err(_) => {
                tracing::warn!(operation, "Rate limiter state poisoned, failing open");
                metrics::record_internal_fault("rate_limit");
                None
            }
        }
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::with_policy(RateLimitPolicy::default())
    }
}

/// `"{form_id}_{first N chars of signature}"`, with an empty signature
/// replaced by [`UNKNOWN_SIGNATURE`].
pub fn rate_limit_key(form_id: &str, client_signature: &str, prefix_chars: usize) -> String {
    let signature = if client_signature.is_empty() {
        UNKNOWN_SIGNATURE
    } else {
        client_signature
    };
    let prefix: String = signature.chars().take(prefix_chars).collect();
    format!("{}_{}", form_id, prefix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::security::clock::ManualClock;
    use std::thread;

    const UA: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36";

    fn limiter() -> (RateLimiter, ManualClock) {
        let clock = ManualClock::default();
        let limiter = RateLimiter::new(RateLimitPolicy::default(), Arc::new(clock.clone()));
        (limiter, clock)
    }

    #[test]
    fn test_sixth_attempt_denied() {
        let (limiter, clock) = limiter();
        for _ in 0..5 {
            assert!(limiter.try_acquire("contact", UA));
            clock.advance(Duration::from_secs(1));
        }
        assert!(!limiter.try_acquire("contact", UA));
        assert_eq!(limiter.attempt_count("contact", UA), 5);
    }

    #[test]
    fn test_window_expiry_readmits() {
        let (limiter, clock) = limiter();
        for _ in 0..5 {
            assert!(limiter.try_acquire("contact", UA));
        }
        assert!(!limiter.try_acquire("contact", UA));

        clock.advance(Duration::from_millis(300_001));
        assert!(limiter.try_acquire("contact", UA));
        assert_eq!(limiter.attempt_count("contact", UA), 1);
    }

    #[test]
    fn test_exact_boundary_is_expired() {
        let (limiter, clock) = limiter();
        for _ in 0..5 {
            assert!(limiter.try_acquire("quote", UA));
        }
        clock.advance(Duration::from_millis(299_999));
        assert!(!limiter.try_acquire("quote", UA));

        clock.advance(Duration::from_millis(1));
        assert!(limiter.try_acquire("quote", UA));
    }

    #[test]
    fn test_denied_attempts_are_not_recorded() {
        let (limiter, clock) = limiter();
        for _ in 0..5 {
            assert!(limiter.try_acquire("contact", UA));
        }
        clock.advance(Duration::from_secs(100));
        for _ in 0..10 {
            assert!(!limiter.try_acquire("contact", UA));
        }
        // Only the five granted attempts age out.
        clock.advance(Duration::from_secs(200));
        for _ in 0..5 {
            assert!(limiter.try_acquire("contact", UA));
        }
        assert!(!limiter.try_acquire("contact", UA));
    }

    #[test]
    fn test_keys_are_independent() {
        let (limiter, _clock) = limiter();
        for _ in 0..5 {
            assert!(limiter.try_acquire("contact", UA));
        }
        assert!(!limiter.try_acquire("contact", UA));
        assert!(limiter.try_acquire("quote", UA));
        assert!(limiter.try_acquire("contact", "curl/8.0"));
        assert_eq!(limiter.tracked_keys(), 3);
    }

    #[test]
    fn test_signature_truncated_to_prefix() {
        let base = "x".repeat(50);
        let a = format!("{}AAAA", base);
        let b = format!("{}BBBB", base);
        assert_eq!(rate_limit_key("f", &a, 50), rate_limit_key("f", &b, 50));
        assert_eq!(rate_limit_key("f", &a, 50), format!("f_{}", base));
        assert_eq!(rate_limit_key("f", "", 50), "f_unknown");
        assert_eq!(rate_limit_key("f", "ééé", 2), "f_éé");
    }

    #[test]
    fn test_retry_after() {
        let (limiter, clock) = limiter();
        assert_eq!(limiter.retry_after("contact", UA), None);
        for _ in 0..5 {
            assert!(limiter.try_acquire("contact", UA));
            clock.advance(Duration::from_secs(10));
        }
        assert_eq!(limiter.retry_after("contact", UA), Some(Duration::from_secs(250)));
    }

    #[test]
    fn test_reset_clears_state() {
        let (limiter, _clock) = limiter();
        for _ in 0..5 {
            limiter.try_acquire("contact", UA);
        }
        limiter.reset();
        assert_eq!(limiter.tracked_keys(), 0);
        assert!(limiter.try_acquire("contact", UA));
    }

    #[test]
    fn test_poisoned_state_fails_open() {
        let (limiter, _clock) = limiter();
        let limiter = Arc::new(limiter);
        for _ in 0..5 {
            assert!(limiter.try_acquire("contact", UA));
        }
        assert!(!limiter.try_acquire("contact", UA));

        let holder = limiter.clone();
        let panicked = thread::spawn(move || {
            let _logs = holder.logs.lock().unwrap();
            panic!("panic while holding attempt logs");
        })
        .join();
        assert!(panicked.is_err());
        assert!(limiter.logs.is_poisoned());

        assert!(limiter.try_acquire("contact", UA));
        assert!(limiter.try_acquire("contact", UA));
        assert_eq!(limiter.attempt_count("contact", UA), 0);
        assert_eq!(limiter.tracked_keys(), 0);
        assert_eq!(limiter.retry_after("contact", UA), None);
    }

    #[test]
    fn test_concurrent_callers_respect_ceiling() {
        let (limiter, _clock) = limiter();
        let limiter = Arc::new(limiter);

        let handles: Vec<_> = (0..32)
            .map(|_| {
                let limiter = limiter.clone();
                thread::spawn(move || limiter.try_acquire("contact", UA))
            })
            .collect();

        let granted = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|ok| *ok)
            .count();
        assert_eq!(granted, 5);
    }
}

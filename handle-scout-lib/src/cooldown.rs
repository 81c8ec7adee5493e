//! Per-caller cooldown for request boundaries.
//!
//! A boundary that serves many callers owns one `CooldownLimiter` and asks it
//! before running a check. Each caller identity (typically a client address)
//! may start one check per interval. State lives in memory only and is lost
//! on restart.
//!
//! The map is bounded: when it is full, entries whose cooldown has already
//! expired are dropped first, then the least recently seen caller.

use crate::error::ScoutError;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Default cooldown between two checks from the same caller.
pub const DEFAULT_COOLDOWN: Duration = Duration::from_secs(1);

/// Default number of callers tracked at once.
pub const DEFAULT_MAX_CALLERS: usize = 10_000;

/// In-memory cooldown keyed by caller identity.
///
/// # Examples
///
/// ```rust,no_run
/// use handle_scout_lib::{CooldownLimiter, HandleChecker, ScoutError};
///
/// async fn serve(
///     limiter: &CooldownLimiter,
///     checker: &HandleChecker,
///     client_addr: &str,
///     handle: &str,
/// ) -> Result<String, ScoutError> {
///     // Reject before any outbound request is made
///     limiter.check(client_addr)?;
///     let report = checker.check_handle(handle).await?;
///     report.to_json_pretty()
/// }
/// ```
///
/// A second request inside the interval is rejected:
///
/// ```
/// use handle_scout_lib::{CooldownLimiter, ScoutError};
/// use std::time::{Duration, Instant};
///
/// let limiter = CooldownLimiter::new(Duration::from_secs(1), 100);
/// let start = Instant::now();
/// assert!(limiter.check_at("10.0.0.1", start).is_ok());
/// let err = limiter
///     .check_at("10.0.0.1", start + Duration::from_millis(200))
///     .unwrap_err();
/// assert!(matches!(err, ScoutError::RateLimited { .. }));
/// assert!(limiter.check_at("10.0.0.1", start + Duration::from_secs(1)).is_ok());
/// ```
#[derive(Debug)]
pub struct CooldownLimiter {
    interval: Duration,
    max_callers: usize,
    last_seen: Mutex<HashMap<String, Instant>>,
}

impl Default for CooldownLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_COOLDOWN, DEFAULT_MAX_CALLERS)
    }
}

impl CooldownLimiter {
    /// Create a limiter. `max_callers` is clamped to at least 1.
    pub fn new(interval: Duration, max_callers: usize) -> Self {
        Self {
            interval,
            max_callers: max_callers.max(1),
            last_seen: Mutex::new(HashMap::new()),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Admit or reject a request from `caller` now.
    pub fn check(&self, caller: &str) -> Result<(), ScoutError> {
        self.check_at(caller, Instant::now())
    }

    /// Admit or reject a request from `caller` at a given instant.
    ///
    /// Rejected requests do not restart the caller's cooldown.
    pub fn check_at(&self, caller: &str, now: Instant) -> Result<(), ScoutError> {
        let mut last_seen = self
            .last_seen
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if let Some(last) = last_seen.get(caller) {
            let elapsed = now.duration_since(*last);
            if elapsed < self.interval {
                return Err(ScoutError::RateLimited {
                    caller: caller.to_string(),
                    retry_after: self.interval - elapsed,
                });
            }
        } else if last_seen.len() >= self.max_callers {
            let interval = self.interval;
            last_seen.retain(|_, last| now.duration_since(*last) < interval);

            if last_seen.len() >= self.max_callers {
                let oldest = last_seen
                    .iter()
                    .min_by_key(|(_, last)| **last)
                    .map(|(key, _)| key.clone());
                if let Some(key) = oldest {
                    last_seen.remove(&key);
                }
            }
        }

        last_seen.insert(caller.to_string(), now);
        Ok(())
    }

    /// Number of callers currently tracked.
    pub fn tracked_callers(&self) -> usize {
        self.last_seen
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_request_within_interval_rejected() {
        let limiter = CooldownLimiter::default();
        let start = Instant::now();

        assert!(limiter.check_at("10.0.0.1", start).is_ok());
        let err = limiter
            .check_at("10.0.0.1", start + Duration::from_millis(400))
            .unwrap_err();

        match err {
            ScoutError::RateLimited { retry_after, .. } => {
                assert_eq!(retry_after, Duration::from_millis(600));
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_request_after_interval_admitted() {
        let limiter = CooldownLimiter::default();
        let start = Instant::now();

        assert!(limiter.check_at("10.0.0.1", start).is_ok());
        assert!(limiter.check_at("10.0.0.1", start + Duration::from_secs(1)).is_ok());
    }

    #[test]
    fn test_rejection_does_not_extend_cooldown() {
        let limiter = CooldownLimiter::default();
        let start = Instant::now();

        assert!(limiter.check_at("a", start).is_ok());
        assert!(limiter.check_at("a", start + Duration::from_millis(900)).is_err());
        assert!(limiter.check_at("a", start + Duration::from_millis(1000)).is_ok());
    }

    #[test]
    fn test_callers_are_independent() {
        let limiter = CooldownLimiter::default();
        let start = Instant::now();

        assert!(limiter.check_at("a", start).is_ok());
        assert!(limiter.check_at("b", start).is_ok());
        assert!(limiter.check_at("a", start).is_err());
    }

    #[test]
    fn test_expired_entries_evicted_when_full() {
        let limiter = CooldownLimiter::new(Duration::from_secs(1), 2);
        let start = Instant::now();

        assert!(limiter.check_at("a", start).is_ok());
        assert!(limiter.check_at("b", start).is_ok());
        assert!(limiter
            .check_at("c", start + Duration::from_secs(2))
            .is_ok());

        // a and b had expired and were dropped
        assert_eq!(limiter.tracked_callers(), 1);
    }

    #[test]
    fn test_oldest_evicted_when_full_of_active_callers() {
        let limiter = CooldownLimiter::new(Duration::from_secs(10), 2);
        let start = Instant::now();

        assert!(limiter.check_at("a", start).is_ok());
        assert!(limiter.check_at("b", start + Duration::from_secs(1)).is_ok());
        assert!(limiter.check_at("c", start + Duration::from_secs(2)).is_ok());

        assert_eq!(limiter.tracked_callers(), 2);
        // "a" was the oldest, so it is no longer throttled
        assert!(limiter.check_at("a", start + Duration::from_secs(3)).is_ok());
        assert!(limiter.check_at("c", start + Duration::from_secs(3)).is_err());
    }
}

//! Retry policy for outbound model calls

use std::time::Duration;

/// Longest pause between two attempts
const BACKOFF_MAX: Duration = Duration::from_secs(120);

/// How many times, and on which statuses, a failed model call is retried
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub total: u32,
    /// Seconds; the pause before retry `n` is `backoff_factor * 2^(n-1)`
    pub backoff_factor: f64,
    /// Response statuses that are retried instead of failing immediately
    pub status_forcelist: Vec<u16>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            total: 3,
            backoff_factor: 4.0,
            status_forcelist: vec![500, 502, 503, 504],
        }
    }
}

impl RetryPolicy {
    pub fn retries_status(&self, status: u16) -> bool {
        self.status_forcelist.contains(&status)
    }

    /// Pause before the `retry`-th retry (1-based). The first retry is immediate.
    pub fn backoff(&self, retry: u32) -> Duration {
        if retry <= 1 {
            return Duration::ZERO;
        }

        let secs = self.backoff_factor * 2f64.powi(retry as i32 - 1);
        if secs.is_nan() || secs <= 0.0 {
            Duration::ZERO
        } else {
            Duration::from_secs_f64(secs.min(BACKOFF_MAX.as_secs_f64()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_sequence() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff(1), Duration::ZERO);
        assert_eq!(policy.backoff(2), Duration::from_secs(8));
        assert_eq!(policy.backoff(3), Duration::from_secs(16));
    }

    #[test]
    fn test_backoff_is_capped() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff(20), BACKOFF_MAX);
    }

    #[test]
    fn test_zero_factor_never_sleeps() {
        let policy = RetryPolicy {
            backoff_factor: 0.0,
            ..RetryPolicy::default()
        };
        assert_eq!(policy.backoff(3), Duration::ZERO);
    }

    #[test]
    fn test_status_forcelist() {
        let policy = RetryPolicy::default();
        assert!(policy.retries_status(503));
        assert!(!policy.retries_status(400));
        assert!(!policy.retries_status(501));
    }
}

use std::time::Duration;

use wikiembed_core::config::RetrySettings;

/// Bounded retry with exponential backoff. The default is a single attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
}

impl RetryPolicy {
    pub fn single_attempt() -> Self {
        Self { max_attempts: 1, initial_backoff: Duration::ZERO, max_backoff: Duration::ZERO }
    }

    pub fn from_settings(settings: &RetrySettings) -> Self {
        Self {
            max_attempts: settings.max_attempts.max(1),
            initial_backoff: Duration::from_millis(settings.initial_backoff_ms),
            max_backoff: Duration::from_millis(settings.max_backoff_ms),
        }
    }

    /// Delay before retry number `attempt` (1-based): `initial * 2^(attempt-1)`,
    /// capped at `max_backoff`.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16);
        self.initial_backoff.saturating_mul(1u32 << exponent).min(self.max_backoff)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self { Self::single_attempt() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles_until_capped() {
        let policy = RetryPolicy { max_attempts: 8, initial_backoff: Duration::from_millis(500), max_backoff: Duration::from_millis(3000) };
        assert_eq!(policy.backoff(1), Duration::from_millis(500));
        assert_eq!(policy.backoff(2), Duration::from_millis(1000));
        assert_eq!(policy.backoff(3), Duration::from_millis(2000));
        assert_eq!(policy.backoff(4), Duration::from_millis(3000));
        assert_eq!(policy.backoff(40), Duration::from_millis(3000));
    }

    #[test]
    fn zero_attempts_in_settings_still_allows_one() {
        let settings = RetrySettings { max_attempts: 0, initial_backoff_ms: 10, max_backoff_ms: 10 };
        assert_eq!(RetryPolicy::from_settings(&settings).max_attempts, 1);
        assert_eq!(RetryPolicy::default().max_attempts, 1);
    }
}

//! Re-check policy for pending payments

use revlist_common::config::VerificationConfig;
use std::time::Duration;

/// How often a `pending` payment is re-checked
///
/// The default is a single check. With `max_attempts > 1` the resolver sleeps
/// between attempts, doubling the wait up to `max_backoff`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub max_attempts: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
}

impl PollPolicy {
    pub fn single_shot() -> Self {
        Self {
            max_attempts: 1,
            initial_backoff: Duration::from_secs(1),
            max_backoff: Duration::from_secs(8),
        }
    }

    pub fn from_config(config: &VerificationConfig) -> Self {
        Self {
            max_attempts: config.poll_max_attempts.max(1),
            initial_backoff: Duration::from_millis(config.poll_initial_backoff_ms),
            max_backoff: Duration::from_millis(config.poll_max_backoff_ms),
        }
    }

    /// Wait after the given (1-based) attempt
    pub fn backoff_after(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.initial_backoff
            .saturating_mul(factor)
            .min(self.max_backoff)
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self::single_shot()
    }
}

//! Retry policy for transient transport failures.

use crate::error::ApiError;
use std::time::Duration;

/// Bounded retry policy used by `ApiClient` for individual requests.
///
/// This governs only the low-level transport: connection failures and
/// overload-class status codes on a single POST. The higher-level polling
/// loop keeps its own, separate attempt budget.
#[derive(Clone, Copy, Debug)]
pub(super) struct RetryPolicy {
    /// Upper bound on total requests issued, including the initial one.
    pub(super) max_attempts: u32,
    /// Base delay used for exponential backoff.
    pub(super) initial_backoff: Duration,
    /// Maximum allowed delay between retry attempts.
    pub(super) max_backoff: Duration,
}

impl Default for RetryPolicy {
    /// Defaults tuned for a service that answers quickly when healthy.
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(200),
            max_backoff: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    /// Decide whether another attempt should be scheduled.
    ///
    /// Retryable: connection/timeout failures and 429/5xx responses. A body
    /// that fails to decode is not retried; resending the same request
    /// cannot fix a malformed 200.
    pub(super) fn should_retry(&self, err: &ApiError, attempt: u32) -> bool {
        if attempt.saturating_add(1) >= self.max_attempts {
            return false;
        }
        match err {
            ApiError::Http(inner) => inner.is_timeout() || inner.is_connect(),
            ApiError::Status { code, .. } => *code == 429 || (*code >= 500 && *code <= 599),
            ApiError::InvalidResponse(_) => false,
        }
    }

    /// Compute the delay before the next attempt, respecting `Retry-After`
    /// when the service sent one.
    pub(super) fn retry_delay_for(&self, attempt: u32, err: &ApiError) -> Duration {
        if let Some(seconds) = err.retry_after_secs() {
            return Duration::from_secs(seconds.clamp(1, 300));
        }
        let pow = 2u32.saturating_pow(attempt);
        let millis = self
            .initial_backoff
            .as_millis()
            .saturating_mul(pow as u128)
            .min(self.max_backoff.as_millis());
        Duration::from_millis(millis as u64)
    }
}

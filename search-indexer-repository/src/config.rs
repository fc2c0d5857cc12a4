//! Configuration types for the OpenSearch provider.

use std::time::Duration;

/// Default number of retries after a throttled bulk request.
pub const DEFAULT_MAX_RETRIES: u32 = 10;

/// Default backoff unit between throttled bulk attempts.
pub const DEFAULT_BACKOFF: Duration = Duration::from_secs(6);

/// Default wait between deleting and recreating a forced index.
pub const DEFAULT_RECREATE_DELAY: Duration = Duration::from_secs(20);

/// Retry policy for bulk requests answered with HTTP 429.
///
/// Backoff grows linearly: attempt `n` waits `n * backoff`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt before giving up.
    pub max_retries: u32,
    /// Base backoff unit.
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            backoff: DEFAULT_BACKOFF,
        }
    }
}

impl RetryPolicy {
    /// Delay before retry number `attempt` (1-based).
    ///
    /// # Example
    ///
    /// ```
    /// use search_indexer_repository::RetryPolicy;
    /// use std::time::Duration;
    ///
    /// let policy = RetryPolicy::default();
    /// assert_eq!(policy.delay_for(1), Duration::from_secs(6));
    /// assert_eq!(policy.delay_for(3), Duration::from_secs(18));
    /// ```
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.backoff * attempt
    }
}

/// Configuration for the OpenSearch provider.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Retry policy for throttled bulk requests.
    pub retry: RetryPolicy,
    /// Wait between deleting and recreating an index with `force`.
    pub recreate_delay: Duration,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ProviderConfig {
    /// Production defaults: ten linear retries on a 6s unit, 20s recreate delay.
    pub fn new() -> Self {
        Self {
            retry: RetryPolicy::default(),
            recreate_delay: DEFAULT_RECREATE_DELAY,
        }
    }

    /// Replace the retry policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Replace the recreate delay.
    pub fn with_recreate_delay(mut self, recreate_delay: Duration) -> Self {
        self.recreate_delay = recreate_delay;
        self
    }
}

//! Exponential backoff for rate-limited API requests.
//!
//! [`RetryPolicy`] holds the whole strategy (attempt ceiling, base delay,
//! multiplier, cap, and which errors qualify) so it can be tested without any
//! network I/O. [`RetryingFetcher`] applies a policy to any [`Fetcher`].
//!
//! # Example
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use lapline_core::retry::{RetryPolicy, RetryingFetcher};
//!
//! # use lapline_core::traits::Fetcher;
//! # #[derive(Clone)] struct MyFetcher;
//! # impl Fetcher for MyFetcher {
//! #     async fn fetch(&self, _: &str) -> Result<serde_json::Value, lapline_core::AppError> { todo!() }
//! # }
//! let policy = RetryPolicy::default().with_max_attempts(3);
//! let fetcher = RetryingFetcher::new(MyFetcher, policy);
//! ```

use std::fmt;
use std::future::Future;
use std::time::Duration;

use crate::error::AppError;
use crate::traits::Fetcher;

/// Retry strategy with capped exponential backoff.
///
/// Default schedule: 5 attempts, waiting 2s, 4s, 8s, then 10s between them.
#[derive(Clone)]
pub struct RetryPolicy {
    /// Total attempts including the first one.
    pub max_attempts: u32,
    /// Delay before the first retry.
    pub base_delay: Duration,
    /// Growth factor applied per retry.
    pub multiplier: u32,
    /// Upper bound on any single delay.
    pub max_delay: Duration,
    retryable: fn(&AppError) -> bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay: Duration::from_secs(2),
            multiplier: 2,
            max_delay: Duration::from_secs(10),
            retryable: AppError::is_retryable,
        }
    }
}

impl fmt::Debug for RetryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryPolicy")
            .field("max_attempts", &self.max_attempts)
            .field("base_delay", &self.base_delay)
            .field("multiplier", &self.multiplier)
            .field("max_delay", &self.max_delay)
            .finish_non_exhaustive()
    }
}

impl RetryPolicy {
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn with_delays(mut self, base_delay: Duration, max_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self.max_delay = max_delay;
        self
    }

    pub fn with_multiplier(mut self, multiplier: u32) -> Self {
        self.multiplier = multiplier;
        self
    }

    /// Replace the predicate deciding which errors are worth another attempt.
    pub fn with_retryable(mut self, predicate: fn(&AppError) -> bool) -> Self {
        self.retryable = predicate;
        self
    }

    pub fn should_retry(&self, error: &AppError) -> bool {
        (self.retryable)(error)
    }

    /// Delay before retry number `retry` (1-indexed).
    ///
    /// `min(base_delay * multiplier^(retry - 1), max_delay)`
    pub fn delay_for_retry(&self, retry: u32) -> Duration {
        let factor = self
            .multiplier
            .checked_pow(retry.saturating_sub(1))
            .unwrap_or(u32::MAX);
        self.base_delay
            .checked_mul(factor)
            .unwrap_or(self.max_delay)
            .min(self.max_delay)
    }

    /// Run `op` until it succeeds, fails with a non-retryable error, or the
    /// attempt ceiling is reached. `op` receives the 1-indexed attempt number.
    pub async fn run<T, F, Fut>(&self, mut op: F) -> Result<T, AppError>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, AppError>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match op(attempt).await {
                Ok(value) => return Ok(value),
                Err(e) if !self.should_retry(&e) => return Err(e),
                Err(e) if attempt >= max_attempts => {
                    return Err(AppError::RetriesExhausted {
                        attempts: attempt,
                        last: Box::new(e),
                    });
                }
                Err(e) => {
                    let delay = self.delay_for_retry(attempt);
                    tracing::warn!(
                        attempt,
                        max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Retryable error, backing off"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}

/// A [`Fetcher`] wrapper that retries according to a [`RetryPolicy`].
#[derive(Clone)]
pub struct RetryingFetcher<F> {
    inner: F,
    policy: RetryPolicy,
}

impl<F: Fetcher> RetryingFetcher<F> {
    pub fn new(inner: F, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }
}

impl<F: Fetcher> Fetcher for RetryingFetcher<F> {
    async fn fetch(&self, path: &str) -> Result<serde_json::Value, AppError> {
        let inner = &self.inner;
        self.policy.run(move |_| inner.fetch(path)).await
    }
}

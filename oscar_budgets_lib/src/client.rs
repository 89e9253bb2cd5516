//! Retrying wrapper around a page source.

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use wikipedia_pages::{Error, PageSource};

/// Page source wrapper that retries transient failures.
///
/// Connection errors, HTTP 429 and HTTP 5xx are retried with jittered
/// exponential backoff; anything else is returned to the caller untouched.
pub struct RetryingSource<S> {
    inner: S,
    retry: RetryConfig,
}

#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub max_retries: usize,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 1000,
            max_delay_ms: 15000,
        }
    }
}

impl RetryConfig {
    /// Reads `OSCAR_BUDGETS_RETRY_MAX`, `OSCAR_BUDGETS_RETRY_BASE_MS` and
    /// `OSCAR_BUDGETS_RETRY_MAX_MS`, falling back to the defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_retries: env_parse("OSCAR_BUDGETS_RETRY_MAX", defaults.max_retries),
            base_delay_ms: env_parse("OSCAR_BUDGETS_RETRY_BASE_MS", defaults.base_delay_ms),
            max_delay_ms: env_parse("OSCAR_BUDGETS_RETRY_MAX_MS", defaults.max_delay_ms),
        }
    }

    /// Backoff before retry number `attempt` (1-based): doubles from the base
    /// delay, capped at the maximum, then scaled by a random 0.8..1.2 factor.
    fn delay_for_attempt(&self, attempt: usize) -> Duration {
        let doublings = attempt.saturating_sub(1).min(30) as u32;
        let capped = self
            .base_delay_ms
            .saturating_mul(2u64.pow(doublings))
            .min(self.max_delay_ms);
        let factor: f64 = rand::thread_rng().gen_range(0.8..1.2);
        Duration::from_millis(capped).mul_f64(factor)
    }
}

impl<S: PageSource> RetryingSource<S> {
    pub fn new(inner: S, retry: RetryConfig) -> Self {
        Self { inner, retry }
    }
}

#[async_trait]
impl<S: PageSource> PageSource for RetryingSource<S> {
    async fn fetch(&self, address: &str) -> Result<String, Error> {
        let mut attempt = 0usize;
        loop {
            let err = match self.inner.fetch(address).await {
                Ok(page) => return Ok(page),
                Err(err) => err,
            };
            attempt += 1;
            if attempt > self.retry.max_retries || !is_retryable(&err) {
                return Err(err);
            }
            let delay = self.retry.delay_for_attempt(attempt);
            tracing::warn!(
                "{} fetch failed (attempt {}/{}): {}; retrying in {:.1}s",
                address,
                attempt,
                self.retry.max_retries,
                err,
                delay.as_secs_f64()
            );
            tokio::time::sleep(delay).await;
        }
    }
}

fn is_retryable(err: &Error) -> bool {
    match err {
        Error::RequestFailed => true,
        Error::HttpStatus { status, .. } => *status == 429 || *status >= 500,
        Error::InvalidAddress(_) => false,
    }
}

fn env_parse<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|val| val.trim().parse().ok())
        .unwrap_or(default)
}

use crate::utils::error::{ClientError, Result};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, error, warn};

pub const DEFAULT_RETRIES: u32 = 1;

pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(1000);

/// One-shot retry for transient transport failures with linear backoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    retries: u32,
    base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retries: DEFAULT_RETRIES,
            base_delay: DEFAULT_RETRY_DELAY,
        }
    }
}

impl RetryPolicy {
    pub fn new(retries: u32, base_delay: Duration) -> Self {
        Self {
            retries,
            base_delay,
        }
    }

    pub fn disabled() -> Self {
        Self::new(0, DEFAULT_RETRY_DELAY)
    }

    pub fn retries(&self) -> u32 {
        self.retries
    }

    /// `retry` is 1-based: the first retry waits one base delay, the second two.
    pub fn delay_for(&self, retry: u32) -> Duration {
        self.base_delay.saturating_mul(retry)
    }

    pub fn should_retry(&self, error: &ClientError, retry: u32) -> bool {
        retry <= self.retries && error.is_retryable()
    }

    /// Runs `operation` until it succeeds, fails with a non-retryable error, or retries run out.
    ///
    /// `describe` is only called when a retry or failure is logged.
    pub async fn run<F, Fut, T, D>(&self, describe: D, mut operation: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
        D: Fn() -> String,
    {
        let mut retry = 0;
        loop {
            match operation().await {
                Ok(value) => {
                    if retry > 0 {
                        debug!(attempt = retry + 1, "Request succeeded after retry");
                    }
                    return Ok(value);
                }
                Err(e) => {
                    retry += 1;
                    if self.should_retry(&e, retry) {
                        let delay = self.delay_for(retry);
                        warn!(
                            retry_count = retry,
                            delay_ms = %delay.as_millis(),
                            error = %e,
                            request = %describe(),
                            "Transient request failure, retrying"
                        );
                        tokio::time::sleep(delay).await;
                    } else {
                        if !e.is_cancelled() {
                            error!(
                                attempts = retry,
                                error = %e,
                                request = %describe(),
                                "Request failed"
                            );
                        }
                        return Err(e);
                    }
                }
            }
        }
    }
}

//! Retry policy with randomized wait and a dual stop condition.
//!
//! A [`RetryPolicy`] drives any async operation: it retries on error until
//! either the attempt budget or the elapsed-time budget is exhausted,
//! whichever triggers first, sleeping a uniformly random duration between
//! attempts to avoid retry storms against the same origin.
use rand::Rng;
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;

/// Stop-and-wait parameters for a retried operation.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Maximum number of attempts, including the first.
    pub max_attempts: u32,
    /// Wall-clock budget measured from the start of the first attempt.
    pub max_elapsed: Duration,
    /// Lower bound of the randomized wait between attempts.
    pub wait_min: Duration,
    /// Upper bound of the randomized wait between attempts.
    pub wait_max: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            max_elapsed: Duration::from_secs(60),
            wait_min: Duration::from_secs(1),
            wait_max: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    /// Run `op`, retrying on error within the policy's bounds.
    ///
    /// Returns the first success, or the last error once either bound is
    /// reached. Every failed attempt is logged at WARN with its attempt
    /// number; exhaustion is logged at ERROR.
    pub async fn run<T, E, F, Fut>(&self, mut op: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        let started = Instant::now();
        let mut attempt: u32 = 1;

        loop {
            match op().await {
                Ok(value) => {
                    if attempt > 1 {
                        tracing::info!(attempts = attempt, "Operation succeeded after retry");
                    }
                    return Ok(value);
                }
                Err(e) => {
                    let elapsed = started.elapsed();
                    if attempt >= self.max_attempts || elapsed >= self.max_elapsed {
                        tracing::error!(
                            error = %e,
                            attempts = attempt,
                            elapsed_ms = elapsed.as_millis() as u64,
                            "Retries exhausted"
                        );
                        return Err(e);
                    }

                    let wait = self.random_wait();
                    tracing::warn!(
                        error = %e,
                        attempt = attempt,
                        max_attempts = self.max_attempts,
                        wait_ms = wait.as_millis() as u64,
                        "Attempt failed, retrying"
                    );
                    tokio::time::sleep(wait).await;
                    attempt += 1;
                }
            }
        }
    }

    /// Uniformly random wait in `[wait_min, wait_max]`.
    fn random_wait(&self) -> Duration {
        let span = self.wait_max.saturating_sub(self.wait_min);
        if span.is_zero() {
            return self.wait_min;
        }
        let fraction: f64 = rand::thread_rng().gen_range(0.0..=1.0);
        self.wait_min + Duration::from_secs_f64(span.as_secs_f64() * fraction)
    }
}

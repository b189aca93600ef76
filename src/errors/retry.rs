use std::time::Duration;
use std::future::Future;

use super::classification::ErrorClassification;
use super::types::TriageError;
use tracing::warn;

impl ErrorClassification {
    /// Wait before retry number `attempt` (from 0). Rate limits back off
    /// linearly up to two minutes; everything else doubles with jitter up to 30 s.
    pub fn retry_delay(&self, attempt: u32) -> Duration {
        if self.error_type == "RateLimitError" {
            return Duration::from_secs((30 + attempt as u64 * 10).min(120));
        }
        let backoff = 2f64.powi(attempt.min(16) as i32) + rand::random::<f64>();
        Duration::from_secs_f64(backoff.min(30.0))
    }
}

/// Retry configuration for interpretation-service calls.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub max_retries: u32,
}

impl RetryConfig {
    /// Single attempt, no backoff.
    pub fn none() -> Self {
        Self { max_retries: 0 }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self { max_retries: 3 }
    }
}

/// Run `factory` until it succeeds, a non-retryable error comes back, or
/// `config.max_retries` extra attempts are spent. Only transport failures are
/// retried; a malformed reply is `OutputValidation` and returns at once.
pub async fn with_retry<F, Fut, T>(
    operation: &str,
    config: &RetryConfig,
    mut factory: F,
) -> Result<T, TriageError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, TriageError>>,
{
    let attempts = config.max_retries + 1;
    let mut attempt = 0;
    loop {
        let error = match factory().await {
            Ok(value) => return Ok(value),
            Err(e) => e,
        };
        let class = error.classify();
        attempt += 1;

        if !class.retryable {
            warn!(operation, error_type = class.error_type, "Non-retryable error, failing immediately");
            return Err(error);
        }
        if attempt >= attempts {
            warn!(operation, attempts, error = %error, "Retries exhausted");
            return Err(error);
        }

        let delay = class.retry_delay(attempt - 1);
        warn!(
            operation,
            attempt,
            attempts,
            error_type = class.error_type,
            delay_secs = delay.as_secs(),
            error = %error,
            "Interpretation service call failed, retrying"
        );
        tokio::time::sleep(delay).await;
    }
}

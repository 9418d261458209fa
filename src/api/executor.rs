//! Request execution with bounded retry
//!
//! One call to [`execute`] performs up to `attempts` sends. Non-2xx statuses
//! and transport failures are retried after a fixed delay; the last failure
//! is returned. The cancellation token is checked around every send and every
//! delay, and always wins over the retry loop.

use super::client::ApiClient;
use super::error::{ApiError, ApiResult};
use super::http::{sanitize_for_log, HttpRequest, RawResponse};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Attempt count and fixed delay between attempts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    attempts: u32,
    delay: Duration,
}

impl RetryPolicy {
    /// `attempts` is the total number of sends; zero is treated as one
    pub fn new(attempts: u32, delay: Duration) -> Self {
        Self {
            attempts: attempts.max(1),
            delay,
        }
    }

    /// A single attempt, no retry
    pub fn once() -> Self {
        Self::new(1, Duration::ZERO)
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::once()
    }
}

/// Send `request` until it succeeds or the policy is exhausted
pub async fn execute(
    client: &ApiClient,
    request: &HttpRequest,
    policy: RetryPolicy,
    cancel: &CancellationToken,
) -> ApiResult<RawResponse> {
    let mut last_error = None;

    for attempt in 1..=policy.attempts() {
        if attempt > 1 && !policy.delay().is_zero() {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(ApiError::Cancelled),
                _ = tokio::time::sleep(policy.delay()) => {}
            }
        }
        if cancel.is_cancelled() {
            return Err(ApiError::Cancelled);
        }

        tracing::debug!(
            "{} {} (attempt {}/{})",
            request.method,
            request.url,
            attempt,
            policy.attempts()
        );

        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(ApiError::Cancelled),
            outcome = client.transport().send(request.clone()) => outcome,
        };

        match outcome {
            Ok(response) if response.is_success() => return Ok(response),
            Ok(response) => {
                tracing::warn!(
                    "API error: {} - {} (attempt {}/{})",
                    response.status,
                    sanitize_for_log(&response.body),
                    attempt,
                    policy.attempts()
                );
                last_error = Some(ApiError::from_status(response.status));
            }
            Err(e) if e.is_retryable() => {
                tracing::warn!(
                    "{} {} failed: {} (attempt {}/{})",
                    request.method,
                    request.url,
                    e,
                    attempt,
                    policy.attempts()
                );
                last_error = Some(e);
            }
            Err(e) => return Err(e),
        }
    }

    Err(last_error.unwrap_or_else(|| ApiError::Network {
        message: "no attempt was made".to_string(),
    }))
}

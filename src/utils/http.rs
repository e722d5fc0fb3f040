use crate::api::ApiError;
use crate::constants::{RETRY_INITIAL_BACKOFF_MILLIS, RETRY_MAX_BACKOFF_SECS};
use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Bounded retry for transient responses (429, 5xx, connection errors).
///
/// Backoff doubles from `initial_backoff` and is capped at `max_backoff`;
/// a `Retry-After` header on a 429 takes precedence (still capped).
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Self::default()
        }
    }

    /// No retries at all, every failure is final
    pub fn none() -> Self {
        Self::new(0)
    }

    /// Delay before retry number `attempt` (0-based)
    pub fn backoff_for(&self, attempt: u32, retry_after: Option<Duration>) -> Duration {
        let delay = match retry_after {
            Some(hint) => hint,
            None => self.initial_backoff.saturating_mul(2u32.saturating_pow(attempt)),
        };
        delay.min(self.max_backoff)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: crate::constants::DEFAULT_MAX_RETRIES,
            initial_backoff: Duration::from_millis(RETRY_INITIAL_BACKOFF_MILLIS),
            max_backoff: Duration::from_secs(RETRY_MAX_BACKOFF_SECS),
        }
    }
}

/// Parse a `Retry-After` header given in seconds
pub fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}

/// Classify a non-success response into an [`ApiError`]
pub async fn error_for_response(response: Response) -> ApiError {
    let status = response.status();
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ApiError::Unauthorized {
            status: status.as_u16(),
        },
        StatusCode::TOO_MANY_REQUESTS => ApiError::RateLimited {
            retry_after: parse_retry_after(response.headers()),
        },
        _ => {
            let message = response.text().await.unwrap_or_default();
            ApiError::Status {
                status: status.as_u16(),
                message,
            }
        }
    }
}

/// Send a request, retrying transient failures according to `policy`.
///
/// `build` is called once per attempt since a `RequestBuilder` is consumed by `send`.
/// A non-idempotent request (a POST that creates or appends) is only replayed
/// after a 429: a timeout or 5xx may come after the server already applied it.
pub async fn send_with_retry<F>(
    build: F,
    policy: &RetryPolicy,
    idempotent: bool,
    context: &str,
) -> Result<Response, ApiError>
where
    F: Fn() -> RequestBuilder,
{
    let mut attempt = 0;
    loop {
        let err = match build().send().await {
            Ok(response) if response.status().is_success() => return Ok(response),
            Ok(response) => error_for_response(response).await,
            Err(e) => ApiError::Transport(e.to_string()),
        };

        let retryable = if idempotent {
            err.is_retryable()
        } else {
            matches!(err, ApiError::RateLimited { .. })
        };
        if !retryable || attempt >= policy.max_retries {
            return Err(err);
        }

        let retry_after = match &err {
            ApiError::RateLimited { retry_after } => *retry_after,
            _ => None,
        };
        let delay = policy.backoff_for(attempt, retry_after);
        log::warn!(
            "[Http] {} failed ({}), retry {}/{} in {:?}",
            context,
            err,
            attempt + 1,
            policy.max_retries,
            delay
        );
        tokio::time::sleep(delay).await;
        attempt += 1;
    }
}

/// Decode a JSON body, reporting malformed payloads as [`ApiError::InvalidResponse`]
pub async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    response
        .json::<T>()
        .await
        .map_err(|e| ApiError::InvalidResponse(e.to_string()))
}

//! Retry utilities for transient vision API failures.
//!
//! Provides classification of retryable errors and exponential backoff.

use crate::error::TaggingError;
use std::time::Duration;

/// Determine whether a tagging error is worth retrying.
///
/// Retryable errors: timeouts, rate limits (429), server errors (5xx),
/// connection failures. Non-retryable: auth failures, bad requests,
/// malformed responses, unreadable or unsupported files.
pub fn is_retryable(error: &TaggingError) -> bool {
    match error {
        TaggingError::Timeout { .. }
        | TaggingError::RateLimited { .. }
        | TaggingError::Network { .. } => true,
        TaggingError::Http { status_code, .. } => (500..=599).contains(status_code),
        _ => false,
    }
}

/// Calculate exponential backoff duration for a given attempt.
///
/// Uses `base_delay * 2^attempt` with a cap at 30 seconds.
pub fn backoff_duration(attempt: u32, base_delay_ms: u64) -> Duration {
    let delay = base_delay_ms.saturating_mul(2u64.saturating_pow(attempt));
    Duration::from_millis(delay.min(30_000))
}

//! Maps one transport outcome to success, retry or fatal failure.

use serde_json::Value;

use super::transport::{RawResponse, TransportError};
use crate::error::TripItError;

/// Why an attempt is worth repeating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryReason {
    /// HTTP 429. Carries no error of its own.
    RateLimited,
    /// HTTP 5xx.
    Server(u16),
    /// Timeout or connection failure.
    Network(String),
}

impl RetryReason {
    /// The error to report if this turns out to be the final failure.
    /// A bare rate limit has none.
    pub fn into_error(self) -> Option<TripItError> {
        match self {
            RetryReason::RateLimited => None,
            RetryReason::Server(status) => Some(TripItError::Server { status }),
            RetryReason::Network(msg) => Some(TripItError::Network(msg)),
        }
    }
}

impl std::fmt::Display for RetryReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RetryReason::RateLimited => write!(f, "rate limited (HTTP 429)"),
            RetryReason::Server(status) => write!(f, "server error (HTTP {})", status),
            RetryReason::Network(msg) => write!(f, "network error: {}", msg),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ClassifiedOutcome {
    Success(Value),
    Retryable(RetryReason),
    Fatal(TripItError),
}

/// Classifies one attempt. Pure: the same input always yields the same
/// outcome, and every status code and transport failure lands in exactly
/// one bucket.
pub fn classify(outcome: &Result<RawResponse, TransportError>) -> ClassifiedOutcome {
    match outcome {
        Ok(response) => classify_response(response),
        Err(error) => classify_transport_error(error),
    }
}

fn classify_response(response: &RawResponse) -> ClassifiedOutcome {
    let status = response.status;
    match status {
        200..=299 => match serde_json::from_slice(&response.body) {
            Ok(value) => ClassifiedOutcome::Success(value),
            Err(e) => ClassifiedOutcome::Fatal(TripItError::MalformedResponse {
                status,
                message: e.to_string(),
            }),
        },
        401 => ClassifiedOutcome::Fatal(TripItError::AuthExpired),
        404 => ClassifiedOutcome::Fatal(TripItError::NotFound),
        429 => ClassifiedOutcome::Retryable(RetryReason::RateLimited),
        500.. => ClassifiedOutcome::Retryable(RetryReason::Server(status)),
        400..=499 => ClassifiedOutcome::Fatal(TripItError::Api {
            status,
            message: response.text(),
        }),
        // 1xx and 3xx never come back from this API.
        _ => ClassifiedOutcome::Fatal(TripItError::Api {
            status,
            message: format!("unexpected status {}: {}", status, response.text()),
        }),
    }
}

fn classify_transport_error(error: &TransportError) -> ClassifiedOutcome {
    match error {
        TransportError::Timeout(_) | TransportError::Connect(_) => {
            ClassifiedOutcome::Retryable(RetryReason::Network(error.to_string()))
        }
        TransportError::Other(_) => ClassifiedOutcome::Fatal(TripItError::Network(error.to_string())),
        TransportError::Shutdown => ClassifiedOutcome::Fatal(TripItError::Shutdown),
    }
}

//! Request pipeline: rate limiting, signing, transport, classification and
//! retry with exponential backoff.

mod classify;
mod client;
mod rate_limit;
mod request;
mod retry;
mod transport;

pub use classify::{ClassifiedOutcome, RetryReason, classify};
pub use client::TripItClient;
pub use rate_limit::RateLimiter;
pub use request::{Method, RequestSpec, SignedHeaders, SignedRequest};
pub use retry::RetryPolicy;
pub use transport::{RawResponse, ReqwestTransport, Transport, TransportError};

//! Authenticated TripIt client: rate limiting, signing, retry with backoff.

use std::sync::Arc;

use log::{debug, warn};
use serde_json::Value;
use url::Url;

use super::classify::{ClassifiedOutcome, classify};
use super::rate_limit::RateLimiter;
use super::request::{Method, RequestSpec, SignedRequest};
use super::retry::RetryPolicy;
use super::transport::{ReqwestTransport, Transport};
use crate::auth::{Credentials, OAuthSigner};
use crate::config::ClientConfig;
use crate::error::TripItError;

/// Entry point for every TripIt API call.
///
/// Safe to share between concurrent tasks: the rate limiter is the only
/// mutable state and serializes admissions itself.
pub struct TripItClient<T: Transport = ReqwestTransport> {
    config: ClientConfig,
    signer: OAuthSigner,
    rate_limiter: Arc<RateLimiter>,
    policy: RetryPolicy,
    transport: T,
}

impl TripItClient<ReqwestTransport> {
    /// Creates a client that talks HTTP through `reqwest`.
    pub fn new(credentials: Credentials, config: ClientConfig) -> Result<Self, TripItError> {
        let transport = ReqwestTransport::new(config.timeout, config.user_agent.clone());
        Self::with_transport(credentials, config, transport)
    }

    /// Creates a client from `TRIPIT_*` environment credentials.
    pub fn from_env(config: ClientConfig) -> Result<Self, TripItError> {
        Self::new(Credentials::from_env()?, config)
    }
}

impl<T: Transport> TripItClient<T> {
    pub fn with_transport(
        credentials: Credentials,
        config: ClientConfig,
        transport: T,
    ) -> Result<Self, TripItError> {
        config.validate()?;
        Ok(Self {
            signer: OAuthSigner::new(credentials),
            rate_limiter: Arc::new(RateLimiter::new(config.min_request_interval)),
            policy: RetryPolicy::from_config(&config),
            config,
            transport,
        })
    }

    /// Replaces the rate limiter, e.g. to share one between clients.
    pub fn with_rate_limiter(mut self, rate_limiter: Arc<RateLimiter>) -> Self {
        self.rate_limiter = rate_limiter;
        self
    }

    pub fn rate_limiter(&self) -> &Arc<RateLimiter> {
        &self.rate_limiter
    }

    /// Releases the network connection. In-flight calls fail with
    /// [`TripItError::Shutdown`]. Safe to call more than once.
    pub async fn shutdown(&self) {
        self.transport.shutdown().await;
    }

    /// Performs an authenticated call and returns the parsed JSON body.
    #[tracing::instrument(skip(self, body))]
    pub async fn execute(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<Value>,
    ) -> Result<Value, TripItError> {
        let spec = RequestSpec {
            method,
            endpoint: endpoint.to_string(),
            body,
        };
        self.execute_spec(&spec).await
    }

    pub async fn execute_spec(&self, spec: &RequestSpec) -> Result<Value, TripItError> {
        let raw_url = spec.resolve_url(self.config.endpoint_url(&spec.endpoint));
        let url = Url::parse(&raw_url).map_err(|e| {
            TripItError::InvalidConfig(format!("invalid request URL '{}': {}", raw_url, e))
        })?;
        let body = spec.encode_body();
        let max_retries = self.policy.max_retries;
        let mut last_error = None;

        for attempt in 0..max_retries {
            self.rate_limiter.acquire().await;

            let headers = self.signer.sign(spec.method, &url, body.as_deref())?;
            let request = SignedRequest {
                method: spec.method,
                url: url.clone(),
                body: body.clone(),
                headers,
            };

            debug!(
                "{} {} (attempt {}/{})",
                spec.method,
                spec.endpoint,
                attempt + 1,
                max_retries
            );
            let outcome = self.transport.send(request).await;

            match classify(&outcome) {
                ClassifiedOutcome::Success(value) => return Ok(value),
                ClassifiedOutcome::Fatal(error) => {
                    debug!("{} {}: non-retryable error: {}", spec.method, spec.endpoint, error);
                    return Err(error);
                }
                ClassifiedOutcome::Retryable(reason) => {
                    let message = reason.to_string();
                    if let Some(error) = reason.into_error() {
                        last_error = Some(error);
                    }

                    if attempt + 1 < max_retries {
                        let delay = self.policy.backoff(attempt);
                        warn!(
                            "{} {}: attempt {}/{} failed ({}), retrying in {:?}...",
                            spec.method,
                            spec.endpoint,
                            attempt + 1,
                            max_retries,
                            message,
                            delay
                        );
                        tokio::time::sleep(delay).await;
                    } else {
                        warn!(
                            "{} {}: attempt {}/{} failed ({}), giving up",
                            spec.method,
                            spec.endpoint,
                            attempt + 1,
                            max_retries,
                            message
                        );
                    }
                }
            }
        }

        Err(last_error.unwrap_or(TripItError::RetriesExhausted {
            attempts: max_retries,
        }))
    }
}

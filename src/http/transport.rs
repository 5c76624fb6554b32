//! Single network attempts over a lazily created, shareable HTTP client.

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use super::request::{Method, SignedRequest};

/// Status and raw body of one HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Failure below the HTTP layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    Timeout(String),
    Connect(String),
    /// Any other request or body-read failure.
    Other(String),
    /// The transport was shut down while the attempt was in flight.
    Shutdown,
}

impl std::fmt::Display for TransportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransportError::Timeout(msg) => write!(f, "request timed out: {}", msg),
            TransportError::Connect(msg) => write!(f, "connection failed: {}", msg),
            TransportError::Other(msg) => write!(f, "{}", msg),
            TransportError::Shutdown => write!(f, "transport shut down"),
        }
    }
}

impl std::error::Error for TransportError {}

impl From<reqwest::Error> for TransportError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            TransportError::Timeout(error.to_string())
        } else if error.is_connect() {
            TransportError::Connect(error.to_string())
        } else {
            TransportError::Other(error.to_string())
        }
    }
}

/// Performs exactly one network call per `send`; never retries.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: SignedRequest) -> Result<RawResponse, TransportError>;

    /// Releases the underlying connection resources. Idempotent.
    async fn shutdown(&self);
}

struct Connection {
    client: Client,
    cancel: CancellationToken,
}

/// `reqwest`-backed transport.
///
/// The client is built on first use and reused afterwards. `shutdown`
/// drops it and fails every in-flight `send` with
/// [`TransportError::Shutdown`]; the next `send` builds a fresh client.
pub struct ReqwestTransport {
    timeout: Duration,
    user_agent: String,
    connection: Mutex<Option<Connection>>,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration, user_agent: impl Into<String>) -> Self {
        Self {
            timeout,
            user_agent: user_agent.into(),
            connection: Mutex::new(None),
        }
    }

    /// Whether a client is currently open.
    pub async fn is_open(&self) -> bool {
        self.connection.lock().await.is_some()
    }

    async fn acquire(&self) -> Result<(Client, CancellationToken), TransportError> {
        let mut connection = self.connection.lock().await;

        if let Some(conn) = connection.as_ref() {
            return Ok((conn.client.clone(), conn.cancel.clone()));
        }

        debug!("Creating HTTP client (timeout {:?})", self.timeout);
        let client = Client::builder()
            .timeout(self.timeout)
            .user_agent(self.user_agent.as_str())
            .build()
            .map_err(|e| TransportError::Other(format!("Failed to build HTTP client: {}", e)))?;
        let cancel = CancellationToken::new();
        *connection = Some(Connection {
            client: client.clone(),
            cancel: cancel.clone(),
        });

        Ok((client, cancel))
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    #[tracing::instrument(skip(self, request))]
    async fn send(&self, request: SignedRequest) -> Result<RawResponse, TransportError> {
        let (client, cancel) = self.acquire().await?;

        let mut builder = match request.method {
            Method::Get => client.get(request.url),
            Method::Post => client.post(request.url),
        };
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let exchange = async {
            let response = builder.send().await?;
            let status = response.status().as_u16();
            let body = response.bytes().await?;
            Ok::<_, reqwest::Error>(RawResponse::new(status, body.to_vec()))
        };

        tokio::select! {
            _ = cancel.cancelled() => Err(TransportError::Shutdown),
            result = exchange => result.map_err(TransportError::from),
        }
    }

    async fn shutdown(&self) {
        if let Some(conn) = self.connection.lock().await.take() {
            debug!("Closing HTTP client");
            conn.cancel.cancel();
        }
    }
}

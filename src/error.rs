//! Error kinds surfaced by the TripIt client.

/// Terminal failure of a TripIt request or of client setup.
///
/// Every variant renders a human-readable message; [`TripItError::code`]
/// returns the originating HTTP status where one is known, so callers can
/// tell "fix your credentials" apart from "resource doesn't exist" and
/// "try later".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TripItError {
    /// HTTP 401: the access token expired or was revoked.
    AuthExpired,
    /// HTTP 404: the requested resource does not exist.
    NotFound,
    /// Any other 4xx (besides 429), or an unexpected non-2xx status.
    Api { status: u16, message: String },
    /// HTTP 5xx.
    Server { status: u16 },
    /// Timeout, connection failure or another transport-level error.
    Network(String),
    /// A 2xx response whose body is not valid JSON.
    MalformedResponse { status: u16, message: String },
    /// Every attempt was rate limited and no concrete error was recorded.
    RetriesExhausted { attempts: usize },
    /// The account lacks a TripIt Pro subscription for this feature.
    ProRequired(String),
    /// The object type cannot be created or replaced through the API.
    UnsupportedObjectType(String),
    /// The OAuth signature could not be computed.
    Signing(String),
    /// Client configuration was rejected at construction time.
    InvalidConfig(String),
    /// A required credential environment variable is missing.
    MissingCredential(String),
    /// The client was shut down while the request was in flight.
    Shutdown,
}

impl TripItError {
    /// HTTP status code the error originated from, if any.
    pub fn code(&self) -> Option<u16> {
        match self {
            TripItError::AuthExpired => Some(401),
            TripItError::NotFound => Some(404),
            TripItError::Api { status, .. }
            | TripItError::Server { status }
            | TripItError::MalformedResponse { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl std::fmt::Display for TripItError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TripItError::AuthExpired => {
                write!(f, "Authentication failed - token may be expired or revoked")
            }
            TripItError::NotFound => write!(f, "Resource not found"),
            TripItError::Api { message, .. } => write!(f, "API error: {}", message),
            TripItError::Server { status } => write!(f, "Server error: {}", status),
            TripItError::Network(msg) => write!(f, "Network error: {}", msg),
            TripItError::MalformedResponse { status, message } => {
                write!(f, "Malformed response body (HTTP {}): {}", status, message)
            }
            TripItError::RetriesExhausted { attempts } => {
                write!(f, "Request failed after retries ({} attempts)", attempts)
            }
            TripItError::ProRequired(msg) => write!(f, "{}", msg),
            TripItError::UnsupportedObjectType(kind) => {
                write!(f, "Cannot create or replace objects of type: {}", kind)
            }
            TripItError::Signing(msg) => write!(f, "Failed to sign request: {}", msg),
            TripItError::InvalidConfig(msg) => write!(f, "Invalid client configuration: {}", msg),
            TripItError::MissingCredential(var) => {
                write!(f, "Missing credential: environment variable {} is not set", var)
            }
            TripItError::Shutdown => write!(f, "Client was shut down"),
        }
    }
}

impl std::error::Error for TripItError {}

//! Transport-level error for calls to the remote job service.

use std::fmt;

/// Error returned by a single service call (curl failure, HTTP error, bad body).
/// Kept separate from job outcomes so the retry policy can classify it.
#[derive(Debug)]
pub enum ServiceError {
    /// Curl reported an error (timeout, connection, etc.).
    Curl(curl::Error),
    /// Non-2xx response; `detail` is the service's message when it sent one.
    Http { status: u32, detail: String },
    /// Response body was not the expected JSON.
    Parse(serde_json::Error),
    /// Body parsed but violated the protocol (e.g. unknown status).
    Protocol(String),
    /// Local I/O failure while streaming a response body.
    Io(std::io::Error),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::Curl(e) => write!(f, "{}", e),
            ServiceError::Http { status, detail } => {
                if detail.is_empty() {
                    write!(f, "HTTP {}", status)
                } else {
                    write!(f, "HTTP {}: {}", status, detail)
                }
            }
            ServiceError::Parse(e) => write!(f, "malformed response: {}", e),
            ServiceError::Protocol(msg) => write!(f, "protocol error: {}", msg),
            ServiceError::Io(e) => write!(f, "io: {}", e),
        }
    }
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ServiceError::Curl(e) => Some(e),
            ServiceError::Parse(e) => Some(e),
            ServiceError::Io(e) => Some(e),
            ServiceError::Http { .. } | ServiceError::Protocol(_) => None,
        }
    }
}

impl From<curl::Error> for ServiceError {
    fn from(e: curl::Error) -> Self {
        ServiceError::Curl(e)
    }
}

impl From<serde_json::Error> for ServiceError {
    fn from(e: serde_json::Error) -> Self {
        ServiceError::Parse(e)
    }
}

impl From<std::io::Error> for ServiceError {
    fn from(e: std::io::Error) -> Self {
        ServiceError::Io(e)
    }
}

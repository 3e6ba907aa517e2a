//! Transports move encoded request bodies to the service and bring the raw
//! response body back.
//!
//! A [`RemoteClient`](crate::RemoteClient) never constructs its own
//! transport. Production code injects an [`HttpTransport`]; tests inject a
//! [`MockTransport`] with scripted responses.

mod http;
mod mock;

use std::future::Future;

use bytes::Bytes;
use thiserror::Error;

pub use http::{HttpTransport, HttpTransportBuilder};
pub use mock::MockTransport;

/// Moves one request body to the service and returns the response body.
///
/// Implementations report wire-level failures only; decoding and error
/// translation happen in the client.
///
/// ## Examples
///
/// ```
/// use bytes::Bytes;
/// use grafter::{Transport, TransportError};
///
/// struct Echo;
///
/// impl Transport for Echo {
///     async fn send(&self, body: Bytes) -> Result<Bytes, TransportError> {
///         Ok(body)
///     }
/// }
/// ```
pub trait Transport: Send + Sync + 'static {
    /// Sends `body` and resolves to the raw response body.
    fn send(&self, body: Bytes) -> impl Future<Output = Result<Bytes, TransportError>> + Send;
}

/// Errors from the transport layer.
#[derive(Debug, Error)]
pub enum TransportError {
    /// HTTP request failed due to a network or protocol error.
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The service answered with a non-success status code.
    #[error("HTTP {status}: {body}")]
    Status {
        /// The HTTP status code returned.
        status: u16,
        /// Response body, or the status reason if the body was unreadable.
        body: String,
    },

    /// Request exceeded the configured timeout.
    #[error("Request timeout after {duration_ms}ms")]
    Timeout {
        /// The timeout duration in milliseconds.
        duration_ms: u64,
    },

    /// Failed to reach the service, or the transport is misconfigured.
    #[error("Connection failed: {0}")]
    Connection(String),
}

impl TransportError {
    /// Returns `true` if this error is retryable.
    ///
    /// Timeouts and connection failures are retryable, as are 5xx and 429
    /// status codes.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout { .. } | Self::Connection(_) => true,
            Self::Status { status, .. } => *status >= 500 || *status == 429,
            Self::Request(e) => e.is_timeout() || e.is_connect(),
        }
    }

    /// Returns the HTTP status code, if the service answered with one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Request(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns `true` if the request timed out.
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Timeout { .. } => true,
            Self::Request(e) => e.is_timeout(),
            _ => false,
        }
    }
}

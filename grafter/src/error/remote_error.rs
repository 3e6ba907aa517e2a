//! The normalized wire-level error.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::transport::TransportError;

/// A position in the operation text an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ErrorLocation {
    pub line: u32,
    pub column: u32,
}

/// Where a [`RemoteError`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorOrigin {
    /// Reported by the service in the response `errors` list.
    #[default]
    Service,
    /// The response body could not be decoded.
    Decode,
    /// The transport failed before a response body was available.
    Transport {
        /// HTTP status code, if the service answered.
        status: Option<u16>,
        timed_out: bool,
    },
}

/// A wire-level error, before translation into a
/// [`ServiceError`](crate::ServiceError).
///
/// Deserializes from one entry of a GraphQL `errors` list; `origin` is not
/// part of the wire format and defaults to [`ErrorOrigin::Service`].
///
/// ## Examples
///
/// ```
/// use grafter::{ErrorOrigin, RemoteError};
///
/// let error: RemoteError = serde_json::from_str(
///     r#"{"message":"bad token","locations":[{"line":2,"column":5}]}"#,
/// ).unwrap();
/// assert_eq!(error.message, "bad token");
/// assert_eq!(error.origin, ErrorOrigin::Service);
/// assert_eq!(error.locations.unwrap()[0].column, 5);
/// ```
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct RemoteError {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locations: Option<Vec<ErrorLocation>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Map<String, Value>>,
    #[serde(skip)]
    pub origin: ErrorOrigin,
}

impl RemoteError {
    /// Creates a service-reported error with only a message.
    pub fn service(message: impl Into<String>) -> Self {
        Self::with_origin(message, ErrorOrigin::Service)
    }

    /// Creates a decode error carrying the decoder diagnostic.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::with_origin(message, ErrorOrigin::Decode)
    }

    fn with_origin(message: impl Into<String>, origin: ErrorOrigin) -> Self {
        Self {
            message: message.into(),
            locations: None,
            path: None,
            extensions: None,
            origin,
        }
    }

    /// Returns `extensions.code`, if the service supplied one.
    pub fn code(&self) -> Option<&str> {
        self.extensions
            .as_ref()
            .and_then(|ext| ext.get("code"))
            .and_then(Value::as_str)
    }

    /// Sets `extensions.code`.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.extensions
            .get_or_insert_with(Map::new)
            .insert("code".to_string(), Value::String(code.into()));
        self
    }
}

impl From<TransportError> for RemoteError {
    fn from(error: TransportError) -> Self {
        let origin = ErrorOrigin::Transport {
            status: error.status_code(),
            timed_out: error.is_timeout(),
        };
        Self::with_origin(error.to_string(), origin)
    }
}

impl From<serde_json::Error> for RemoteError {
    fn from(error: serde_json::Error) -> Self {
        Self::decode(error.to_string())
    }
}

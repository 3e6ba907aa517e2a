//! Scriptable in-memory transport.

use std::collections::VecDeque;
use std::sync::Mutex;

use bytes::Bytes;
use tracing::trace;

use super::{Transport, TransportError};
use crate::store::lock;

/// A transport answering from a queue of scripted responses.
///
/// Every request body is recorded so tests can assert on what was sent.
/// Once the script runs out, `send` fails with
/// [`TransportError::Connection`].
///
/// ## Examples
///
/// ```
/// use grafter::MockTransport;
///
/// let transport = MockTransport::new()
///     .respond_with_json(serde_json::json!({ "data": { "viewer": null } }));
/// assert_eq!(transport.pending(), 1);
/// assert_eq!(transport.request_count(), 0);
/// ```
#[derive(Debug, Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<Result<Bytes, TransportError>>>,
    requests: Mutex<Vec<Bytes>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a raw response body.
    pub fn respond_with(self, body: impl Into<Bytes>) -> Self {
        self.push(Ok(body.into()));
        self
    }

    /// Queues a JSON response body.
    pub fn respond_with_json(self, body: serde_json::Value) -> Self {
        self.respond_with(body.to_string())
    }

    /// Queues a transport failure.
    pub fn fail_with(self, error: TransportError) -> Self {
        self.push(Err(error));
        self
    }

    /// Queues a response on a shared transport.
    pub fn push(&self, response: Result<Bytes, TransportError>) {
        lock(&self.responses).push_back(response);
    }

    /// Returns the number of scripted responses not yet consumed.
    pub fn pending(&self) -> usize {
        lock(&self.responses).len()
    }

    /// Returns every request body received so far, in order.
    pub fn requests(&self) -> Vec<Bytes> {
        lock(&self.requests).clone()
    }

    pub fn request_count(&self) -> usize {
        lock(&self.requests).len()
    }

    /// Returns request `index` parsed as JSON.
    pub fn request_json(&self, index: usize) -> Option<serde_json::Value> {
        lock(&self.requests)
            .get(index)
            .and_then(|body| serde_json::from_slice(body).ok())
    }
}

impl Transport for MockTransport {
    async fn send(&self, body: Bytes) -> Result<Bytes, TransportError> {
        trace!(bytes = body.len(), "mock transport received request");
        lock(&self.requests).push(body);
        lock(&self.responses)
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Connection("no scripted response left".to_string())))
    }
}

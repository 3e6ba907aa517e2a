//! Request and response envelopes.

use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::{RemoteError, ServiceError};
use crate::operation::{Operation, Variables};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RequestEnvelope<'a> {
    query: &'a str,
    #[serde(skip_serializing_if = "Variables::is_empty")]
    variables: &'a Variables,
    operation_name: &'a str,
}

#[derive(Debug, Deserialize)]
struct ResponseEnvelope {
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    errors: Option<Vec<RemoteError>>,
}

/// Encodes the request body sent to the transport.
pub(crate) fn encode_request(operation: &Operation, variables: &Variables) -> Result<Bytes, ServiceError> {
    let envelope = RequestEnvelope {
        query: operation.text(),
        variables,
        operation_name: operation.name(),
    };
    serde_json::to_vec(&envelope)
        .map(Bytes::from)
        .map_err(|e| ServiceError::ProgrammerFailure(format!("failed to encode request: {e}")))
}

/// Decodes a response body into the typed `data` payload.
///
/// A populated `errors` list wins over any `data` and yields its first
/// entry; the rest are logged.
pub(crate) fn decode_response<V: DeserializeOwned>(body: &[u8]) -> Result<V, RemoteError> {
    let envelope: ResponseEnvelope = serde_json::from_slice(body)
        .map_err(|e| RemoteError::decode(format!("invalid response body: {e}")))?;

    if let Some(mut errors) = envelope.errors.filter(|errors| !errors.is_empty()) {
        for extra in errors.iter().skip(1) {
            debug!(message = %extra.message, "additional service error");
        }
        return Err(errors.swap_remove(0));
    }

    match envelope.data {
        Some(Value::Null) | None => Err(RemoteError::decode("response carried neither data nor errors")),
        Some(data) => serde_json::from_value(data)
            .map_err(|e| RemoteError::decode(format!("response data does not match the expected shape: {e}"))),
    }
}

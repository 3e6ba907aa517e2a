//! Remote operation client.
//!
//! [`RemoteClient`] executes [`Operation`]s over an injected [`Transport`]
//! and reports outcomes as [`AsyncResult`]s. Every failure is translated
//! into a [`ServiceError`] by the registered [`ErrorTranslator`] before it
//! reaches the caller.
//!
//! ## Examples
//!
//! ```
//! use grafter::{MockTransport, Operation, RemoteClient, Variables};
//!
//! #[derive(Debug, serde::Deserialize)]
//! struct ViewerData { viewer: Option<serde_json::Value> }
//!
//! const VIEWER_QUERY: Operation = Operation::query("Viewer", "query Viewer { viewer { id } }");
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let transport = MockTransport::new()
//!     .respond_with_json(serde_json::json!({ "data": { "viewer": { "id": "a1" } } }));
//! let client = RemoteClient::new(transport);
//!
//! let data: ViewerData = client.request(&VIEWER_QUERY, Variables::new()).await.unwrap();
//! assert_eq!(data.viewer.unwrap()["id"], "a1");
//! # }
//! ```

mod envelope;
mod handle;

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::runtime::Handle;
use tracing::{Instrument, debug, info_span, instrument, warn};

use crate::error::{DefaultTranslator, ErrorTranslator, RemoteError, ServiceError};
use crate::operation::{Operation, Variables};
use crate::result::{AsyncResult, GateControl, ResultGate};
use crate::transport::Transport;

pub use handle::OperationHandle;

/// Executes operations over a transport `T`.
///
/// Cloning is cheap; clones share the transport and translator.
pub struct RemoteClient<T> {
    transport: Arc<T>,
    translator: Arc<dyn ErrorTranslator>,
}

impl<T> Clone for RemoteClient<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            translator: Arc::clone(&self.translator),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for RemoteClient<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteClient")
            .field("transport", &self.transport)
            .finish_non_exhaustive()
    }
}

impl<T: Transport> RemoteClient<T> {
    /// Creates a client using the [`DefaultTranslator`].
    pub fn new(transport: T) -> Self {
        Self {
            transport: Arc::new(transport),
            translator: Arc::new(DefaultTranslator),
        }
    }

    /// Replaces the error translator.
    pub fn with_translator(mut self, translator: impl ErrorTranslator + 'static) -> Self {
        self.translator = Arc::new(translator);
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Translates a wire error with the registered translator.
    pub fn translate(&self, error: &RemoteError) -> ServiceError {
        self.translator.translate(error)
    }

    /// Executes `operation` and awaits the typed result.
    ///
    /// ## Errors
    ///
    /// Returns the translated [`ServiceError`] on any failure; see
    /// [`execute`](Self::execute) for the pipeline.
    pub async fn request<V>(&self, operation: &Operation, variables: Variables) -> Result<V, ServiceError>
    where
        V: DeserializeOwned,
    {
        dispatch(&*self.transport, &*self.translator, operation, &variables, || {}).await
    }

    /// Starts `operation` on the current tokio runtime.
    ///
    /// `on_result` receives `Progress(0.0)` on dispatch, `Progress(1.0)` once
    /// the response body arrived, then exactly one terminal result. Variables
    /// are checked against the operation text first; a mismatch fails with
    /// [`ServiceError::RequestBad`] and no transport call is made. Outside a
    /// tokio runtime the callback receives
    /// [`ServiceError::ConfigurationFailure`] before this returns.
    pub fn execute<V, F>(&self, operation: &Operation, variables: Variables, on_result: F) -> OperationHandle
    where
        V: DeserializeOwned + Send + 'static,
        F: FnMut(AsyncResult<V>) + Send + 'static,
    {
        let control = GateControl::new();
        let mut gate = ResultGate::new(Arc::clone(&control), on_result);

        let runtime = match Handle::try_current() {
            Ok(runtime) => runtime,
            Err(e) => {
                warn!(operation = operation.name(), "no async runtime for operation");
                gate.deliver(AsyncResult::Failure(ServiceError::ConfigurationFailure(format!(
                    "operations must run inside a tokio runtime: {e}"
                ))));
                return OperationHandle::completed(control);
            }
        };

        let transport = Arc::clone(&self.transport);
        let translator = Arc::clone(&self.translator);
        let operation = operation.clone();
        let span = info_span!("graphql_execute", operation = %operation.name(), kind = %operation.kind());

        let task = runtime.spawn(
            async move {
                gate.deliver(AsyncResult::Progress(0.0));
                let outcome: Result<V, ServiceError> = dispatch(&*transport, &*translator, &operation, &variables, || {
                    gate.deliver(AsyncResult::Progress(1.0));
                })
                .await;
                gate.deliver(outcome.into());
            }
            .instrument(span),
        );

        OperationHandle::spawned(control, task)
    }

    /// Serializes `arguments` into [`Variables`] and calls
    /// [`execute`](Self::execute).
    ///
    /// Generated operation functions call this with their `Variables`
    /// struct. A serialization failure is delivered as a failure before this
    /// returns.
    pub fn execute_serialized<V, A, F>(&self, operation: &Operation, arguments: &A, on_result: F) -> OperationHandle
    where
        V: DeserializeOwned + Send + 'static,
        A: Serialize + ?Sized,
        F: FnMut(AsyncResult<V>) + Send + 'static,
    {
        match Variables::from_serialize(arguments) {
            Ok(variables) => self.execute(operation, variables, on_result),
            Err(error) => {
                let control = GateControl::new();
                ResultGate::new(Arc::clone(&control), on_result).deliver(AsyncResult::Failure(error));
                OperationHandle::completed(control)
            }
        }
    }
}

/// Runs one operation: check variables, encode, send, decode, translate.
///
/// `on_received` runs once the transport returned a body.
#[instrument(
    name = "graphql_dispatch",
    skip_all,
    fields(operation = %operation.name(), variables = variables.len())
)]
async fn dispatch<T, V>(
    transport: &T,
    translator: &dyn ErrorTranslator,
    operation: &Operation,
    variables: &Variables,
    on_received: impl FnOnce(),
) -> Result<V, ServiceError>
where
    T: Transport,
    V: DeserializeOwned,
{
    operation.check_variables(variables)?;
    let body = envelope::encode_request(operation, variables)?;

    let response = match transport.send(body).await {
        Ok(response) => response,
        Err(error) => {
            debug!(error = %error, "transport failed");
            return Err(translator.translate(&RemoteError::from(error)));
        }
    };
    on_received();

    envelope::decode_response(&response).map_err(|error| {
        debug!(message = %error.message, origin = ?error.origin, "operation failed");
        translator.translate(&error)
    })
}

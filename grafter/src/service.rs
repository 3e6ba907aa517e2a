//! Client and state composed into one handle.
//!
//! A [`Service`] is passed explicitly to the code that needs it. For
//! applications that want a single shared instance, one process-wide default
//! can be installed, replaced, and cleared; core logic never looks it up.

use std::any::Any;
use std::sync::{Arc, PoisonError, RwLock};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::client::{OperationHandle, RemoteClient};
use crate::error::StoreError;
use crate::operation::Operation;
use crate::result::AsyncResult;
use crate::state::AppState;
use crate::store::Store;
use crate::transport::Transport;

/// A [`RemoteClient`] paired with the [`Store`] its results feed.
#[derive(Debug)]
pub struct Service<T> {
    client: RemoteClient<T>,
    store: Store<AppState>,
}

impl<T: Transport> Service<T> {
    /// Creates a service with a fresh [`AppState`].
    ///
    /// ## Errors
    ///
    /// Returns [`StoreError::Spawn`] if the store cannot start.
    pub fn new(client: RemoteClient<T>) -> Result<Self, StoreError> {
        Ok(Self::with_store(client, Store::new(AppState::new())?))
    }

    pub fn with_store(client: RemoteClient<T>, store: Store<AppState>) -> Self {
        Self { client, store }
    }

    pub fn client(&self) -> &RemoteClient<T> {
        &self.client
    }

    pub fn store(&self) -> &Store<AppState> {
        &self.store
    }

    /// Returns the current state snapshot.
    pub fn state(&self) -> Arc<AppState> {
        self.store.state()
    }

    /// Executes `operation` and folds its outcome into the state.
    ///
    /// On success the store is updated with `transition(current, data)`; on
    /// failure with `current.with_error(error)`. Updates go through
    /// [`Store::update`], so concurrent completions apply in completion
    /// order, each on top of the previous one. A cancelled operation changes
    /// nothing.
    ///
    /// ## Examples
    ///
    /// ```
    /// use grafter::{AccountUpdate, MockTransport, Operation, RemoteClient, Service};
    ///
    /// #[derive(serde::Deserialize)]
    /// struct ViewerData { viewer: Option<AccountUpdate> }
    ///
    /// const VIEWER_QUERY: Operation = Operation::query("Viewer", "query Viewer { viewer { id name } }");
    ///
    /// # #[tokio::main(flavor = "current_thread")]
    /// # async fn main() {
    /// let transport = MockTransport::new()
    ///     .respond_with_json(serde_json::json!({ "data": { "viewer": { "id": "a1", "name": "Ada" } } }));
    /// let service = Service::new(RemoteClient::new(transport)).unwrap();
    ///
    /// service
    ///     .perform(&VIEWER_QUERY, &(), |state, data: ViewerData| match data.viewer {
    ///         Some(update) => state.with_account(update),
    ///         None => state.clone(),
    ///     })
    ///     .wait()
    ///     .await;
    /// service.store().flush();
    ///
    /// assert_eq!(service.state().account.name, "Ada");
    /// # }
    /// ```
    pub fn perform<V, A, R>(&self, operation: &Operation, arguments: &A, transition: R) -> OperationHandle
    where
        V: DeserializeOwned + Send + 'static,
        A: Serialize + ?Sized,
        R: Fn(&AppState, V) -> AppState + Send + 'static,
    {
        let store = self.store.clone();
        let name = operation.name().to_string();
        self.client
            .execute_serialized(operation, arguments, move |result: AsyncResult<V>| match result {
                AsyncResult::Success(value) => {
                    let version = store.update(|state| transition(state, value));
                    debug!(operation = %name, version, "operation applied");
                }
                AsyncResult::Failure(error) => {
                    debug!(operation = %name, error = %error, "operation failed");
                    store.update(|state| state.with_error(error));
                }
                AsyncResult::Progress(_) => {}
            })
    }
}

// ---------------------------------------------------------------------------
// Process-wide default
// ---------------------------------------------------------------------------

static DEFAULT_SERVICE: RwLock<Option<Arc<dyn Any + Send + Sync>>> = RwLock::new(None);

/// Installs `service` as the process-wide default, replacing any previous
/// one. Returns the shared handle.
pub fn install_default<T: Transport>(service: Service<T>) -> Arc<Service<T>> {
    let service = Arc::new(service);
    let erased: Arc<dyn Any + Send + Sync> = Arc::clone(&service) as Arc<dyn Any + Send + Sync>;
    *DEFAULT_SERVICE.write().unwrap_or_else(PoisonError::into_inner) = Some(erased);
    info!(transport = std::any::type_name::<T>(), "default service installed");
    service
}

/// Returns the default service, if one over transport `T` is installed.
pub fn default_service<T: Transport>() -> Option<Arc<Service<T>>> {
    DEFAULT_SERVICE
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
        .and_then(|service| service.downcast::<Service<T>>().ok())
}

/// Removes the default service.
pub fn clear_default() {
    if DEFAULT_SERVICE
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .take()
        .is_some()
    {
        info!("default service cleared");
    }
}

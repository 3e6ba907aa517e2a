//! Runtime for generated GraphQL clients.
//!
//! Code emitted by `grafter-gen` depends on this crate for everything that
//! happens after generation:
//!
//! - **Operations**: [`Operation`] constants and [`Variables`] checked against
//!   the document before dispatch
//! - **Transport**: the injected [`Transport`] capability, with
//!   [`HttpTransport`] for production and [`MockTransport`] for tests
//! - **Results**: [`AsyncResult`] delivering progress and exactly one terminal
//!   outcome through a [`RemoteClient`]
//! - **Errors**: wire errors ([`RemoteError`]) translated into the closed
//!   [`ServiceError`] taxonomy by an [`ErrorTranslator`]
//! - **State**: a [`Store`] of immutable snapshots with ordered notification,
//!   the [`AppState`] value, and the [`Service`] composing client and store
//!
//! ## Example
//!
//! ```rust,ignore
//! use grafter::{HttpTransport, RemoteClient, Service};
//!
//! let transport = HttpTransport::builder("https://api.example.com/graphql")
//!     .bearer_token("sk-xxx")
//!     .build()?;
//! let service = Service::new(RemoteClient::new(transport))?;
//!
//! // Generated function from `operations.rs`
//! graphql::operations::viewer(service.client(), &Default::default(), |result| {
//!     result
//!         .on_success(|data| println!("{data:?}"))
//!         .on_failure(|err| eprintln!("{err}"));
//! });
//! ```

pub mod client;
pub mod error;
pub mod operation;
pub mod result;
pub mod service;
pub mod state;
pub mod store;
pub mod transport;

// Re-exports for convenience
pub use client::{OperationHandle, RemoteClient};
pub use error::{
    DefaultTranslator, ErrorLocation, ErrorOrigin, ErrorTranslator, RemoteError, ServiceError,
    ServiceErrorKind, StoreError,
};
pub use operation::{Operation, OperationKind, VariableDefinition, Variables};
pub use result::AsyncResult;
pub use service::{Service, clear_default, default_service, install_default};
pub use state::{Account, AccountUpdate, AppState, AuthStage, Authorization};
pub use store::{Notification, STATE_CHANGED, Store, SubscriptionId, WeakStore};
pub use transport::{HttpTransport, HttpTransportBuilder, MockTransport, Transport, TransportError};

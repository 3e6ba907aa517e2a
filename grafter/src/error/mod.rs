//! Runtime error types.
//!
//! Failures travel up three layers:
//! - [`TransportError`](crate::TransportError) - wire-level failures
//! - [`RemoteError`] - the normalized wire error (transport, decode, or
//!   service-reported)
//! - [`ServiceError`] - the closed taxonomy delivered to callers, produced
//!   from a [`RemoteError`] by an [`ErrorTranslator`]
//!
//! [`StoreError`] covers the observable state container.

mod remote_error;
mod service_error;
mod store_error;
mod translator;

pub use remote_error::{ErrorLocation, ErrorOrigin, RemoteError};
pub use service_error::{ServiceError, ServiceErrorKind};
pub use store_error::StoreError;
pub use translator::{DefaultTranslator, ErrorTranslator};

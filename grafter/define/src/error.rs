//! Errors raised while loading a schema.

use thiserror::Error;

/// Errors from [`parse_introspection`](crate::introspection::parse_introspection).
#[derive(Debug, Error)]
pub enum SchemaError {
    /// The input was not valid introspection JSON.
    #[error("invalid introspection JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Neither `data.__schema` nor a top-level `__schema` was present.
    #[error("introspection result has no `__schema` object")]
    MissingSchema,

    /// A type or type reference had no name where one is required.
    #[error("missing type name in {context}")]
    MissingTypeName { context: String },

    /// A wrapper kind (`LIST`, `NON_NULL`) appeared as a top-level type.
    #[error("type `{name}` has unsupported top-level kind {kind}")]
    UnsupportedKind { name: String, kind: String },
}

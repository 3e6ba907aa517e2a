//! Error types for the grafter generator.

use grafter_define::{KindCategory, SchemaError};
use thiserror::Error;

/// Errors that can occur during code generation.
///
/// Every variant is fatal: the generator never writes partial output.
#[derive(Debug, Error)]
pub enum GeneratorError {
    /// Failed to load the schema
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// A scalar has no entry in the scalar mapping table
    #[error("No Rust mapping for scalar '{name}'. Add it to the `[scalars]` table of the config")]
    UnknownScalar { name: String },

    /// A field or argument references a type that is not declared
    #[error("Field '{owner}.{field}' references undeclared type '{type_name}'")]
    UnresolvedType {
        owner: String,
        field: String,
        type_name: String,
    },

    /// Two declarations (or a declaration and a generated item) share a Rust name
    #[error("Duplicate name '{name}' ({category})")]
    DuplicateName { category: String, name: String },

    /// A union member is not a declared object
    #[error("Union '{union}' lists '{member}', which is not a declared object")]
    DanglingUnionMember { union: String, member: String },

    /// A union without members cannot be decoded
    #[error("Union '{union}' has no possible types")]
    EmptyUnion { union: String },

    /// An object declares an interface that does not exist
    #[error("Object '{object}' implements unknown interface '{interface}'")]
    UnknownInterface { object: String, interface: String },

    /// An object omits a field its interface requires
    #[error("Object '{object}' is missing field '{field}' required by interface '{interface}'")]
    MissingInterfaceField {
        object: String,
        interface: String,
        field: String,
    },

    /// An object redeclares an interface field with a different shape
    #[error(
        "Object '{object}' declares '{field}' as {found}, but interface '{interface}' requires {expected}"
    )]
    InterfaceFieldMismatch {
        object: String,
        interface: String,
        field: String,
        expected: String,
        found: String,
    },

    /// The scalar-leaf flag disagrees with the kind the field resolves to
    #[error("Field '{owner}.{field}' is flagged as {flagged} but its type '{type_name}' is a {actual}")]
    InconsistentLeaf {
        owner: String,
        field: String,
        type_name: String,
        flagged: &'static str,
        actual: KindCategory,
    },

    /// A field references an interface that no object implements
    #[error("Interface '{interface}' is referenced by '{owner}.{field}' but has no implementing objects")]
    NoImplementors {
        interface: String,
        owner: String,
        field: String,
    },

    /// A field appears twice on the same kind
    #[error("Field '{field}' is declared twice on '{owner}'")]
    DuplicateField { owner: String, field: String },

    /// Failed to generate code
    #[error("Code generation failed: {0}")]
    CodeGenError(String),

    /// Failed to read an input file
    #[error("Failed to read '{path}': {source}")]
    ReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write output file
    #[error("Failed to write output file '{path}': {source}")]
    WriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),
}

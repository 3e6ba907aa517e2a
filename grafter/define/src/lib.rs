//! Grafter Schema Model
//!
//! This crate provides the in-memory model of a GraphQL-like schema consumed
//! by the `grafter-gen` binary to generate a typed Rust client.
//!
//! ## Core Types
//!
//! - [`Schema`] - Declared kinds plus root query and mutation fields
//! - [`SchemaKind`] - One declared type (scalar, object, interface, union, input, payload, enum)
//! - [`FieldDescriptor`] - A field with its type, arguments, and emission flags
//! - [`ArgumentDescriptor`] - An argument of a function field or root operation
//! - [`TypeRef`] - GraphQL type reference (`Named`, `List`, `NonNull`)
//! - [`KindCategory`] - The category of a kind, used in diagnostics
//!
//! Schemas are built in code or loaded from introspection JSON with
//! [`parse_introspection`].
//!
//! ## Examples
//!
//! ```
//! use grafter_define::{FieldDescriptor, ObjectType, Schema, SchemaKind, TypeRef};
//!
//! let schema = Schema::new()
//!     .with_builtin_scalars()
//!     .with(SchemaKind::Object(
//!         ObjectType::new("Account")
//!             .field(FieldDescriptor::leaf("id", TypeRef::named("ID").non_null()))
//!             .field(FieldDescriptor::leaf("createFn", TypeRef::named("Boolean")).function()),
//!     ));
//!
//! let account = schema.object("Account").unwrap();
//! let leaves: Vec<_> = account
//!     .fields
//!     .iter()
//!     .filter(|f| f.is_fragment_leaf())
//!     .map(|f| f.name.as_str())
//!     .collect();
//! assert_eq!(leaves, vec!["id"]);
//! ```

pub mod error;
pub mod field;
pub mod introspection;
pub mod kind;
pub mod prelude;
pub mod schema;
pub mod type_ref;

// Re-export main types at crate root
pub use error::SchemaError;
pub use field::{ArgumentDescriptor, FieldDescriptor};
pub use introspection::parse_introspection;
pub use kind::{
    CONNECTION_SUFFIX, EDGE_SUFFIX, EnumType, InputType, InterfaceType, KindCategory, ObjectType,
    PAYLOAD_SUFFIX, PayloadType, ScalarType, SchemaKind, UnionType,
};
pub use schema::{BUILTIN_SCALARS, Schema};
pub use type_ref::TypeRef;

//! Convenient re-exports for building schemas in code.
//!
//! ## Examples
//!
//! ```
//! use grafter_define::prelude::*;
//!
//! let schema = Schema::new()
//!     .with_builtin_scalars()
//!     .with(SchemaKind::Enum(EnumType::new("Stage", ["CONNECTED", "DISCONNECTED"])))
//!     .with(SchemaKind::Union(UnionType::new("SearchResult", ["Account"])));
//!
//! assert_eq!(schema.enums().count(), 1);
//! ```

pub use crate::error::SchemaError;
pub use crate::field::{ArgumentDescriptor, FieldDescriptor};
pub use crate::introspection::parse_introspection;
pub use crate::kind::{
    EnumType, InputType, InterfaceType, KindCategory, ObjectType, PayloadType, ScalarType,
    SchemaKind, UnionType,
};
pub use crate::schema::Schema;
pub use crate::type_ref::TypeRef;

//! The in-memory schema model.
//!
//! A [`Schema`] keeps kinds and root operations in declaration order. Every
//! generator pass iterates these vectors, so the order they were declared (or
//! loaded) in is the order they are emitted in.

use crate::field::FieldDescriptor;
use crate::kind::{
    EnumType, InputType, InterfaceType, ObjectType, PayloadType, ScalarType, SchemaKind, UnionType,
};

/// Scalars every GraphQL schema provides implicitly.
pub const BUILTIN_SCALARS: &[&str] = &["ID", "String", "Int", "Float", "Boolean"];

/// A complete schema: declared kinds plus root query and mutation fields.
///
/// ## Examples
///
/// ```
/// use grafter_define::prelude::*;
///
/// let schema = Schema::new()
///     .with_builtin_scalars()
///     .with(SchemaKind::Object(
///         ObjectType::new("Account")
///             .field(FieldDescriptor::leaf("id", TypeRef::named("ID").non_null()))
///             .field(FieldDescriptor::leaf("name", TypeRef::named("String"))),
///     ))
///     .query(FieldDescriptor::composite("viewer", TypeRef::named("Account")));
///
/// assert!(schema.object("Account").is_some());
/// assert_eq!(schema.scalars().count(), 5);
/// assert_eq!(schema.queries.len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    /// Declared kinds in declaration order.
    pub kinds: Vec<SchemaKind>,
    /// Root query fields.
    pub queries: Vec<FieldDescriptor>,
    /// Root mutation fields.
    pub mutations: Vec<FieldDescriptor>,
}

impl Schema {
    /// Creates an empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a kind.
    pub fn with(mut self, kind: SchemaKind) -> Self {
        self.kinds.push(kind);
        self
    }

    /// Appends the built-in scalars that are not declared yet.
    pub fn with_builtin_scalars(mut self) -> Self {
        for name in BUILTIN_SCALARS {
            if self.kind(name).is_none() {
                self.kinds.push(SchemaKind::Scalar(ScalarType::new(*name)));
            }
        }
        self
    }

    /// Appends a root query field.
    pub fn query(mut self, field: FieldDescriptor) -> Self {
        self.queries.push(field);
        self
    }

    /// Appends a root mutation field.
    pub fn mutation(mut self, field: FieldDescriptor) -> Self {
        self.mutations.push(field);
        self
    }

    /// Looks up a kind by name. The first declaration wins if names repeat.
    pub fn kind(&self, name: &str) -> Option<&SchemaKind> {
        self.kinds.iter().find(|k| k.name() == name)
    }

    /// Looks up an object by name.
    pub fn object(&self, name: &str) -> Option<&ObjectType> {
        self.objects().find(|o| o.name == name)
    }

    /// Looks up an interface by name.
    pub fn interface(&self, name: &str) -> Option<&InterfaceType> {
        self.interfaces().find(|i| i.name == name)
    }

    pub fn scalars(&self) -> impl Iterator<Item = &ScalarType> {
        self.kinds.iter().filter_map(|k| match k {
            SchemaKind::Scalar(t) => Some(t),
            _ => None,
        })
    }

    pub fn objects(&self) -> impl Iterator<Item = &ObjectType> {
        self.kinds.iter().filter_map(|k| match k {
            SchemaKind::Object(t) => Some(t),
            _ => None,
        })
    }

    pub fn interfaces(&self) -> impl Iterator<Item = &InterfaceType> {
        self.kinds.iter().filter_map(|k| match k {
            SchemaKind::Interface(t) => Some(t),
            _ => None,
        })
    }

    pub fn unions(&self) -> impl Iterator<Item = &UnionType> {
        self.kinds.iter().filter_map(|k| match k {
            SchemaKind::Union(t) => Some(t),
            _ => None,
        })
    }

    pub fn inputs(&self) -> impl Iterator<Item = &InputType> {
        self.kinds.iter().filter_map(|k| match k {
            SchemaKind::Input(t) => Some(t),
            _ => None,
        })
    }

    pub fn payloads(&self) -> impl Iterator<Item = &PayloadType> {
        self.kinds.iter().filter_map(|k| match k {
            SchemaKind::Payload(t) => Some(t),
            _ => None,
        })
    }

    pub fn enums(&self) -> impl Iterator<Item = &EnumType> {
        self.kinds.iter().filter_map(|k| match k {
            SchemaKind::Enum(t) => Some(t),
            _ => None,
        })
    }

    /// Returns the objects implementing `interface`, in declaration order.
    pub fn implementors<'a>(&'a self, interface: &'a str) -> impl Iterator<Item = &'a ObjectType> {
        self.objects()
            .filter(move |o| o.interfaces.iter().any(|i| i == interface))
    }
}

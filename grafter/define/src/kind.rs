//! Schema kinds.
//!
//! Every declared type in a schema is one [`SchemaKind`]. The variants carry
//! their own structs so that generators can take `&ObjectType` etc. directly.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::field::FieldDescriptor;

/// Suffix identifying pagination edge objects.
pub const EDGE_SUFFIX: &str = "Edge";
/// Suffix identifying pagination connection objects.
pub const CONNECTION_SUFFIX: &str = "Connection";
/// Suffix identifying mutation payload objects.
pub const PAYLOAD_SUFFIX: &str = "Payload";

/// The category a [`SchemaKind`] belongs to.
///
/// ## Examples
///
/// ```
/// use std::str::FromStr;
/// use grafter_define::KindCategory;
///
/// assert_eq!(KindCategory::Object.to_string(), "object");
/// assert_eq!(KindCategory::from_str("union").unwrap(), KindCategory::Union);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum KindCategory {
    Scalar,
    Object,
    Interface,
    Union,
    Input,
    Payload,
    Enum,
}

/// A custom or built-in scalar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScalarType {
    pub name: String,
    pub description: Option<String>,
}

/// A concrete object type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectType {
    pub name: String,
    /// Fields in declaration order.
    pub fields: Vec<FieldDescriptor>,
    /// Names of implemented interfaces, in declaration order.
    pub interfaces: Vec<String>,
    /// Pagination edge wrapper.
    pub is_edge: bool,
    /// Pagination connection wrapper.
    pub is_connection: bool,
    pub description: Option<String>,
}

/// An abstract interface type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceType {
    pub name: String,
    pub fields: Vec<FieldDescriptor>,
    pub description: Option<String>,
}

/// A union over object types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnionType {
    pub name: String,
    /// Member object names, in declaration order.
    pub possible_types: Vec<String>,
    pub description: Option<String>,
}

/// A request-side input object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputType {
    pub name: String,
    pub fields: Vec<FieldDescriptor>,
    pub description: Option<String>,
}

/// A mutation response object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayloadType {
    pub name: String,
    pub fields: Vec<FieldDescriptor>,
    pub description: Option<String>,
}

/// An enumeration of named values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumType {
    pub name: String,
    /// Values in declaration order, verbatim (e.g. `CONNECTED`).
    pub values: Vec<String>,
    pub description: Option<String>,
}

/// One declared type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaKind {
    Scalar(ScalarType),
    Object(ObjectType),
    Interface(InterfaceType),
    Union(UnionType),
    Input(InputType),
    Payload(PayloadType),
    Enum(EnumType),
}

impl SchemaKind {
    /// Returns the declared name.
    pub fn name(&self) -> &str {
        match self {
            Self::Scalar(t) => &t.name,
            Self::Object(t) => &t.name,
            Self::Interface(t) => &t.name,
            Self::Union(t) => &t.name,
            Self::Input(t) => &t.name,
            Self::Payload(t) => &t.name,
            Self::Enum(t) => &t.name,
        }
    }

    /// Returns the kind category.
    pub fn category(&self) -> KindCategory {
        match self {
            Self::Scalar(_) => KindCategory::Scalar,
            Self::Object(_) => KindCategory::Object,
            Self::Interface(_) => KindCategory::Interface,
            Self::Union(_) => KindCategory::Union,
            Self::Input(_) => KindCategory::Input,
            Self::Payload(_) => KindCategory::Payload,
            Self::Enum(_) => KindCategory::Enum,
        }
    }

    /// Returns the declared fields; empty for scalars, unions, and enums.
    pub fn fields(&self) -> &[FieldDescriptor] {
        match self {
            Self::Object(t) => &t.fields,
            Self::Interface(t) => &t.fields,
            Self::Input(t) => &t.fields,
            Self::Payload(t) => &t.fields,
            Self::Scalar(_) | Self::Union(_) | Self::Enum(_) => &[],
        }
    }

    /// Returns `true` for kinds that are leaves of a selection set.
    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Scalar(_) | Self::Enum(_))
    }
}

impl ScalarType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
        }
    }
}

impl ObjectType {
    /// Creates an object, deriving the edge/connection flags from the name
    /// suffix.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            is_edge: name.ends_with(EDGE_SUFFIX),
            is_connection: name.ends_with(CONNECTION_SUFFIX),
            name,
            fields: Vec::new(),
            interfaces: Vec::new(),
            description: None,
        }
    }

    /// Appends a field.
    pub fn field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    /// Declares an implemented interface.
    pub fn implements(mut self, interface: impl Into<String>) -> Self {
        self.interfaces.push(interface.into());
        self
    }

    /// Returns `true` if this object is a pagination wrapper.
    pub fn is_pagination_wrapper(&self) -> bool {
        self.is_edge || self.is_connection
    }
}

impl InterfaceType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            description: None,
        }
    }

    pub fn field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }
}

impl UnionType {
    pub fn new<I, S>(name: impl Into<String>, possible_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            possible_types: possible_types.into_iter().map(Into::into).collect(),
            description: None,
        }
    }
}

impl InputType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            description: None,
        }
    }

    pub fn field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }
}

impl PayloadType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            description: None,
        }
    }

    pub fn field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }
}

impl EnumType {
    pub fn new<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            values: values.into_iter().map(Into::into).collect(),
            description: None,
        }
    }
}

//! Field type references.
//!
//! A [`TypeRef`] mirrors GraphQL's type wrappers: a named type that is
//! nullable unless wrapped in [`TypeRef::NonNull`], optionally wrapped in
//! one or more [`TypeRef::List`] layers.

use std::fmt;

/// A reference from a field or argument to a declared type.
///
/// ## Examples
///
/// ```
/// use grafter_define::TypeRef;
///
/// // `[String!]!`
/// let tags = TypeRef::named("String").non_null().list().non_null();
/// assert_eq!(tags.to_string(), "[String!]!");
/// assert_eq!(tags.named_type(), "String");
/// assert!(!tags.is_nullable());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    /// A declared kind, referenced by name.
    Named(String),
    /// A list of the inner type.
    List(Box<TypeRef>),
    /// The inner type, with nulls disallowed.
    NonNull(Box<TypeRef>),
}

impl TypeRef {
    /// References a declared kind by name (nullable).
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    /// Wraps `self` in a list.
    pub fn list(self) -> Self {
        Self::List(Box::new(self))
    }

    /// Wraps `self` in a non-null marker. Already non-null references are
    /// returned unchanged.
    pub fn non_null(self) -> Self {
        match self {
            Self::NonNull(_) => self,
            other => Self::NonNull(Box::new(other)),
        }
    }

    /// Returns the innermost named type.
    pub fn named_type(&self) -> &str {
        match self {
            Self::Named(name) => name,
            Self::List(inner) | Self::NonNull(inner) => inner.named_type(),
        }
    }

    /// Returns `true` unless the outermost wrapper is non-null.
    pub fn is_nullable(&self) -> bool {
        !matches!(self, Self::NonNull(_))
    }

    /// Returns `true` if any wrapper layer is a list.
    pub fn is_list(&self) -> bool {
        match self {
            Self::Named(_) => false,
            Self::List(_) => true,
            Self::NonNull(inner) => inner.is_list(),
        }
    }

    /// Strips the outermost non-null marker, if any.
    pub fn nullable(&self) -> &TypeRef {
        match self {
            Self::NonNull(inner) => inner,
            other => other,
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => f.write_str(name),
            Self::List(inner) => write!(f, "[{inner}]"),
            Self::NonNull(inner) => write!(f, "{inner}!"),
        }
    }
}

//! Field and argument descriptors.

use crate::type_ref::TypeRef;

/// An argument accepted by a function field or a root operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentDescriptor {
    /// Argument name as declared in the schema (e.g. `first`).
    pub name: String,
    /// Declared argument type.
    pub type_ref: TypeRef,
    /// Default value literal, verbatim from the schema.
    pub default_value: Option<String>,
}

impl ArgumentDescriptor {
    /// Creates an argument without a default value.
    pub fn new(name: impl Into<String>, type_ref: TypeRef) -> Self {
        Self {
            name: name.into(),
            type_ref,
            default_value: None,
        }
    }

    /// Sets the default value literal.
    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }
}

/// A field declared on an object, interface, input, or payload kind.
///
/// The two flags drive emission:
///
/// - `is_function` fields are never stored on a concrete object; they become
///   trait requirements satisfied by hand-written methods.
/// - `is_scalar_leaf` fields (innermost type is a scalar or enum) are the
///   only ones that can appear in a fragment.
///
/// ## Examples
///
/// ```
/// use grafter_define::{ArgumentDescriptor, FieldDescriptor, TypeRef};
///
/// let id = FieldDescriptor::leaf("id", TypeRef::named("ID").non_null());
/// assert!(id.is_scalar_leaf);
/// assert!(!id.is_function);
///
/// let posts = FieldDescriptor::composite("posts", TypeRef::named("PostConnection"))
///     .with_arguments(vec![ArgumentDescriptor::new("first", TypeRef::named("Int"))]);
/// assert!(posts.is_function);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Field name as declared in the schema (camelCase by convention).
    pub name: String,
    /// Declared field type.
    pub type_ref: TypeRef,
    /// Arguments; empty for plain fields.
    pub arguments: Vec<ArgumentDescriptor>,
    /// Whether the field is function-like (takes arguments).
    pub is_function: bool,
    /// Whether the innermost type is a scalar or enum.
    pub is_scalar_leaf: bool,
    /// Optional schema description.
    pub description: Option<String>,
}

impl FieldDescriptor {
    /// A field whose innermost type is a scalar or enum.
    pub fn leaf(name: impl Into<String>, type_ref: TypeRef) -> Self {
        Self {
            name: name.into(),
            type_ref,
            arguments: Vec::new(),
            is_function: false,
            is_scalar_leaf: true,
            description: None,
        }
    }

    /// A field whose innermost type is an object, interface, union, input, or
    /// payload.
    pub fn composite(name: impl Into<String>, type_ref: TypeRef) -> Self {
        Self {
            is_scalar_leaf: false,
            ..Self::leaf(name, type_ref)
        }
    }

    /// Sets the arguments. A field with arguments is a function field.
    pub fn with_arguments(mut self, arguments: Vec<ArgumentDescriptor>) -> Self {
        self.is_function = !arguments.is_empty();
        self.arguments = arguments;
        self
    }

    /// Marks the field as function-like even without arguments
    /// (e.g. `createFn(): Boolean`).
    pub fn function(mut self) -> Self {
        self.is_function = true;
        self
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Returns `true` if this field may appear in a fragment.
    pub fn is_fragment_leaf(&self) -> bool {
        self.is_scalar_leaf && !self.is_function
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_arguments_do_not_make_a_function() {
        let field = FieldDescriptor::leaf("name", TypeRef::named("String")).with_arguments(vec![]);
        assert!(!field.is_function);
        assert!(field.is_fragment_leaf());
    }

    #[test]
    fn explicit_function_is_not_a_fragment_leaf() {
        let field = FieldDescriptor::leaf("createFn", TypeRef::named("Boolean")).function();
        assert!(field.is_function);
        assert!(field.is_scalar_leaf);
        assert!(!field.is_fragment_leaf());
    }

    #[test]
    fn composite_is_never_a_fragment_leaf() {
        let field = FieldDescriptor::composite("account", TypeRef::named("Account"));
        assert!(!field.is_fragment_leaf());
    }

    #[test]
    fn argument_default_value() {
        let arg = ArgumentDescriptor::new("first", TypeRef::named("Int")).with_default("10");
        assert_eq!(arg.default_value.as_deref(), Some("10"));
    }
}

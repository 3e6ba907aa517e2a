//! Operation document construction.
//!
//! Each root query or mutation field becomes one complete document:
//!
//! ```text
//! mutation CreateAccount($input: CreateAccountInput!) { createAccount(input: $input) { account { ...AccountFragment } } }
//! fragment AccountFragment on Account { id name email }
//! ```
//!
//! Objects with a fragment are selected through it. Payloads and pagination
//! wrappers are expanded inline. Unions and interfaces select `__typename`
//! plus one inline fragment per possible object.

use std::collections::HashSet;

use grafter_define::{FieldDescriptor, ObjectType, Schema, SchemaKind};

use crate::fragment::{build_fragment, fragment_name};
use crate::naming::to_pascal_case;

/// Root operation type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootKind {
    Query,
    Mutation,
}

impl RootKind {
    /// The GraphQL keyword.
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Query => "query",
            Self::Mutation => "mutation",
        }
    }

    /// Suffix of the generated operation constant.
    pub fn const_suffix(self) -> &'static str {
        match self {
            Self::Query => "QUERY",
            Self::Mutation => "MUTATION",
        }
    }
}

/// A complete operation document for one root field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationDocument {
    pub kind: RootKind,
    /// PascalCase operation name (`CreateAccount`).
    pub name: String,
    /// Document text, fragment definitions included.
    pub text: String,
}

/// Builds the document for a root field.
///
/// ## Examples
///
/// ```
/// use grafter_define::prelude::*;
/// use grafter_gen::document::{RootKind, build_operation};
///
/// let schema = Schema::new()
///     .with_builtin_scalars()
///     .with(SchemaKind::Object(
///         ObjectType::new("Account").field(FieldDescriptor::leaf("id", TypeRef::named("ID"))),
///     ));
/// let viewer = FieldDescriptor::composite("viewer", TypeRef::named("Account"));
///
/// let doc = build_operation(&schema, RootKind::Query, &viewer);
/// assert_eq!(
///     doc.text,
///     "query Viewer { viewer { ...AccountFragment } }\nfragment AccountFragment on Account { id }"
/// );
/// ```
pub fn build_operation(schema: &Schema, kind: RootKind, field: &FieldDescriptor) -> OperationDocument {
    let name = to_pascal_case(&field.name);
    let mut builder = SelectionBuilder {
        schema,
        fragments: Vec::new(),
        stack: Vec::new(),
    };

    let variables = if field.arguments.is_empty() {
        String::new()
    } else {
        let declared: Vec<String> = field
            .arguments
            .iter()
            .map(|arg| match &arg.default_value {
                Some(default) => format!("${}: {} = {default}", arg.name, arg.type_ref),
                None => format!("${}: {}", arg.name, arg.type_ref),
            })
            .collect();
        format!("({})", declared.join(", "))
    };

    let selection = builder.field_selection(field, true);
    let mut text = format!("{} {name}{variables} {{ {selection} }}", kind.keyword());

    for object in &builder.fragments {
        if let Some(fragment) = schema.object(object).and_then(build_fragment) {
            text.push('\n');
            text.push_str(&fragment);
        }
    }

    OperationDocument { kind, name, text }
}

struct SelectionBuilder<'a> {
    schema: &'a Schema,
    /// Objects whose fragment was spread, in first-use order.
    fragments: Vec<String>,
    /// Types being expanded inline; guards recursion.
    stack: Vec<&'a str>,
}

impl<'a> SelectionBuilder<'a> {
    /// Renders `name(arg: $arg) { ... }`; arguments are bound to variables
    /// only on the root field.
    fn field_selection(&mut self, field: &'a FieldDescriptor, root: bool) -> String {
        let arguments = if root && !field.arguments.is_empty() {
            let bound: Vec<String> = field
                .arguments
                .iter()
                .map(|arg| format!("{0}: ${0}", arg.name))
                .collect();
            format!("({})", bound.join(", "))
        } else {
            String::new()
        };

        match self.selection_set(field.type_ref.named_type()) {
            Some(set) => format!("{}{arguments} {set}", field.name),
            None => format!("{}{arguments}", field.name),
        }
    }

    /// Returns the `{ ... }` selection for a type, or `None` for leaves.
    fn selection_set(&mut self, type_name: &'a str) -> Option<String> {
        let kind = self.schema.kind(type_name)?;
        match kind {
            SchemaKind::Scalar(_) | SchemaKind::Enum(_) | SchemaKind::Input(_) => None,
            SchemaKind::Object(object) => Some(self.object_selection(object)),
            SchemaKind::Payload(payload) => Some(self.inline(&payload.name, &payload.fields)),
            SchemaKind::Union(union) => {
                let members: Vec<&'a str> = union.possible_types.iter().map(String::as_str).collect();
                Some(self.polymorphic(members))
            }
            SchemaKind::Interface(interface) => {
                let members: Vec<&'a str> = self
                    .schema
                    .implementors(&interface.name)
                    .map(|o| o.name.as_str())
                    .collect();
                Some(self.polymorphic(members))
            }
        }
    }

    fn object_selection(&mut self, object: &'a ObjectType) -> String {
        if object.is_pagination_wrapper() {
            return self.inline(&object.name, &object.fields);
        }
        if !self.fragments.contains(&object.name) {
            self.fragments.push(object.name.clone());
        }
        format!("{{ ...{} }}", fragment_name(&object.name))
    }

    /// Expands non-function fields inline, skipping types already on the stack.
    fn inline(&mut self, name: &'a str, fields: &'a [FieldDescriptor]) -> String {
        self.stack.push(name);
        let mut seen = HashSet::new();
        let mut parts = Vec::new();
        for field in fields {
            if field.is_function || !seen.insert(field.name.as_str()) {
                continue;
            }
            if !field.is_scalar_leaf && self.stack.contains(&field.type_ref.named_type()) {
                continue;
            }
            parts.push(self.field_selection(field, false));
        }
        self.stack.pop();

        if parts.is_empty() {
            "{ __typename }".to_string()
        } else {
            format!("{{ {} }}", parts.join(" "))
        }
    }

    fn polymorphic(&mut self, members: Vec<&'a str>) -> String {
        let mut parts = vec!["__typename".to_string()];
        for member in members {
            if let Some(set) = self.selection_set(member) {
                parts.push(format!("... on {member} {set}"));
            }
        }
        format!("{{ {} }}", parts.join(" "))
    }
}

//! Shared test utilities for grafter-gen tests.

use grafter_define::prelude::*;
use proc_macro2::TokenStream;

/// A schema touching every kind and emission rule.
///
/// - `Account` implements `Node` and has a function field (`createFn`)
/// - `Post` implements `Node` and `Timestamped` (a function-only interface)
/// - `PostConnection` / `PostEdge` are pagination wrappers
/// - `SearchResult` is a union, `Stage` an enum, `Timestamp` a custom scalar
pub fn sample_schema() -> Schema {
    Schema::new()
        .with_builtin_scalars()
        .with(SchemaKind::Scalar(ScalarType::new("Timestamp")))
        .with(SchemaKind::Enum(EnumType::new(
            "Stage",
            ["CONNECTED", "CONNECTING", "REGISTERING", "DISCONNECTED"],
        )))
        .with(SchemaKind::Interface(
            InterfaceType::new("Node")
                .field(FieldDescriptor::leaf("id", TypeRef::named("ID").non_null())),
        ))
        .with(SchemaKind::Interface(
            InterfaceType::new("Timestamped").field(created_at()),
        ))
        .with(SchemaKind::Object(
            ObjectType::new("Account")
                .implements("Node")
                .field(FieldDescriptor::leaf("id", TypeRef::named("ID").non_null()))
                .field(FieldDescriptor::leaf("name", TypeRef::named("String")))
                .field(FieldDescriptor::leaf("email", TypeRef::named("String")))
                .field(FieldDescriptor::leaf("createFn", TypeRef::named("Boolean")).function())
                .field(
                    FieldDescriptor::composite("posts", TypeRef::named("PostConnection"))
                        .with_arguments(vec![first_arg()]),
                ),
        ))
        .with(SchemaKind::Object(
            ObjectType::new("Post")
                .implements("Node")
                .implements("Timestamped")
                .field(FieldDescriptor::leaf("id", TypeRef::named("ID").non_null()))
                .field(FieldDescriptor::leaf("title", TypeRef::named("String")))
                .field(FieldDescriptor::composite("author", TypeRef::named("Account")))
                .field(created_at()),
        ))
        .with(SchemaKind::Object(
            ObjectType::new("PostConnection")
                .field(FieldDescriptor::leaf("totalCount", TypeRef::named("Int")))
                .field(FieldDescriptor::composite("edges", TypeRef::named("PostEdge").list())),
        ))
        .with(SchemaKind::Object(
            ObjectType::new("PostEdge")
                .field(FieldDescriptor::leaf("cursor", TypeRef::named("String")))
                .field(FieldDescriptor::composite("node", TypeRef::named("Post"))),
        ))
        .with(SchemaKind::Union(UnionType::new("SearchResult", ["Account", "Post"])))
        .with(SchemaKind::Input(
            InputType::new("CreateAccountInput")
                .field(FieldDescriptor::leaf("name", TypeRef::named("String").non_null()))
                .field(FieldDescriptor::leaf("stage", TypeRef::named("Stage"))),
        ))
        .with(SchemaKind::Payload(
            PayloadType::new("CreateAccountPayload")
                .field(FieldDescriptor::composite("account", TypeRef::named("Account")))
                .field(FieldDescriptor::leaf("stage", TypeRef::named("Stage"))),
        ))
        .query(FieldDescriptor::composite("viewer", TypeRef::named("Account")))
        .query(
            FieldDescriptor::composite("search", TypeRef::named("SearchResult").list())
                .with_arguments(vec![ArgumentDescriptor::new(
                    "text",
                    TypeRef::named("String").non_null(),
                )]),
        )
        .query(
            FieldDescriptor::composite("node", TypeRef::named("Node")).with_arguments(vec![
                ArgumentDescriptor::new("id", TypeRef::named("ID").non_null()),
            ]),
        )
        .query(
            FieldDescriptor::composite("posts", TypeRef::named("PostConnection"))
                .with_arguments(vec![first_arg()]),
        )
        .mutation(
            FieldDescriptor::composite("createAccount", TypeRef::named("CreateAccountPayload"))
                .with_arguments(vec![ArgumentDescriptor::new(
                    "input",
                    TypeRef::named("CreateAccountInput").non_null(),
                )]),
        )
}

fn created_at() -> FieldDescriptor {
    FieldDescriptor::leaf("createdAt", TypeRef::named("Timestamp"))
        .with_arguments(vec![ArgumentDescriptor::new("format", TypeRef::named("String"))])
}

fn first_arg() -> ArgumentDescriptor {
    ArgumentDescriptor::new("first", TypeRef::named("Int")).with_default("10")
}

/// Formats generated code using prettyplease.
///
/// ## Errors
///
/// Returns an error string if the code fails to parse.
pub fn format_generated_code(tokens: &TokenStream) -> Result<String, String> {
    let file = syn::parse2::<syn::File>(tokens.clone()).map_err(|e| e.to_string())?;
    Ok(prettyplease::unparse(&file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeneratorConfig;
    use crate::validation::validate_schema;

    #[test]
    fn sample_schema_is_valid() {
        validate_schema(&sample_schema(), &GeneratorConfig::default()).unwrap();
    }
}

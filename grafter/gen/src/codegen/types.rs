//! Concrete type generation.
//!
//! Emits, in declaration order:
//!
//! - **Unions** as `#[serde(tag = "__typename")]` enums with one newtype
//!   variant per possible object
//! - **Enums** as unit enums, each value renamed to its schema spelling
//! - **Interface value enums** (`AnyNode`) over every implementing object
//! - **Objects** as structs of their non-function fields, plus one trait
//!   impl per implemented interface
//! - **Inputs** as structs with exactly the declared types
//! - **Payloads** as structs of all fields
//!
//! Object and payload fields are response-shaped: a fragment may select only
//! some of them, so each is an `Option` defaulting to `None`.

use std::collections::HashMap;

use grafter_define::{
    EnumType, FieldDescriptor, InputType, ObjectType, PayloadType, Schema, SchemaKind, TypeRef,
};
use proc_macro2::TokenStream;
use quote::{format_ident, quote};

use crate::codegen::doc_attr;
use crate::codegen::interfaces::accessor_signature;
use crate::errors::GeneratorError;
use crate::naming::{field_ident, serde_rename, to_pascal_case, type_ident};
use crate::type_mapper::{Site, TypeMapper};
use crate::validation::any_name;

/// Generates every concrete type in declaration order.
pub fn generate_types(
    schema: &Schema,
    mapper: &TypeMapper,
    prefix: &str,
) -> Result<TokenStream, GeneratorError> {
    let mut items = Vec::new();
    for kind in &schema.kinds {
        let item = match kind {
            SchemaKind::Scalar(_) => continue,
            SchemaKind::Union(union) => tagged_enum(
                &union.name,
                union.description.as_deref(),
                union.possible_types.iter().map(String::as_str),
            ),
            SchemaKind::Interface(interface) => {
                let implementors: Vec<&str> = schema
                    .implementors(&interface.name)
                    .map(|o| o.name.as_str())
                    .collect();
                if implementors.is_empty() {
                    continue;
                }
                let doc = format!("Any object implementing `{}`.", interface.name);
                tagged_enum(&any_name(&interface.name), Some(doc.as_str()), implementors.into_iter())
            }
            SchemaKind::Enum(e) => generate_enum(e),
            SchemaKind::Object(object) => generate_object(schema, object, mapper, prefix)?,
            SchemaKind::Input(input) => generate_input(input, mapper)?,
            SchemaKind::Payload(payload) => generate_payload(payload, mapper)?,
        };
        items.push(item);
    }

    Ok(quote! {
        //! Types decoded from and encoded to the service.

        use serde::{Deserialize, Serialize};

        #(#items)*
    })
}

fn tagged_enum<'a>(
    name: &str,
    description: Option<&str>,
    members: impl Iterator<Item = &'a str>,
) -> TokenStream {
    let name = format_ident!("{}", name);
    let doc = doc_attr(description);
    let variants = members.map(|member| {
        let ident = type_ident(member);
        quote! { #ident(#ident), }
    });

    quote! {
        #doc
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        #[serde(tag = "__typename")]
        pub enum #name {
            #(#variants)*
        }
    }
}

fn generate_enum(e: &EnumType) -> TokenStream {
    let name = type_ident(&e.name);
    let doc = doc_attr(e.description.as_deref());
    let variants = e.values.iter().map(|value| {
        let ident = format_ident!("{}", to_pascal_case(value));
        quote! {
            #[serde(rename = #value)]
            #ident,
        }
    });

    quote! {
        #doc
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum #name {
            #(#variants)*
        }
    }
}

/// A response-shaped field of type `type_ref`: `Option<value>` that
/// defaults to `None`.
fn response_field(
    field: &FieldDescriptor,
    type_ref: &TypeRef,
    mapper: &TypeMapper,
) -> Result<TokenStream, GeneratorError> {
    let ident = field_ident(&field.name);
    let ty = mapper.resolve_value(type_ref, Site::Types)?;
    let doc = doc_attr(field.description.as_deref());
    let rename = serde_rename(&field.name).map(|original| quote! { rename = #original, });

    Ok(quote! {
        #doc
        #[serde(#rename default, skip_serializing_if = "Option::is_none")]
        pub #ident: Option<#ty>,
    })
}

fn generate_object(
    schema: &Schema,
    object: &ObjectType,
    mapper: &TypeMapper,
    prefix: &str,
) -> Result<TokenStream, GeneratorError> {
    let name = type_ident(&object.name);
    let doc = doc_attr(object.description.as_deref());

    // A field narrowed from an interface is stored as the interface declares
    // it; the narrower response still decodes and the trait impl can borrow it.
    let declared: HashMap<&str, &TypeRef> = object
        .interfaces
        .iter()
        .filter_map(|name| schema.interface(name))
        .flat_map(|interface| &interface.fields)
        .map(|field| (field.name.as_str(), &field.type_ref))
        .collect();
    let fields = object
        .fields
        .iter()
        .filter(|f| !f.is_function)
        .map(|f| {
            let stored = declared.get(f.name.as_str()).copied().unwrap_or(&f.type_ref);
            response_field(f, stored, mapper)
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut impls = Vec::new();
    for interface_name in &object.interfaces {
        let Some(interface) = schema.interface(interface_name) else {
            return Err(GeneratorError::UnknownInterface {
                object: object.name.clone(),
                interface: interface_name.clone(),
            });
        };
        let trait_name = type_ident(&interface.name);

        let mut methods = Vec::new();
        for field in &interface.fields {
            let signature = accessor_signature(field, prefix, mapper)?;
            let ident = field_ident(&field.name);
            let body = if field.is_function {
                let args = field.arguments.iter().map(|a| field_ident(&a.name));
                quote! { self.#ident(#(#args),*) }
            } else if mapper.is_boxed(&field.type_ref) {
                quote! { self.#ident.as_deref() }
            } else {
                quote! { self.#ident.as_ref() }
            };
            methods.push(quote! {
                #signature {
                    #body
                }
            });
        }

        impls.push(quote! {
            impl super::interfaces::#trait_name for #name {
                #(#methods)*
            }
        });
    }

    Ok(quote! {
        #doc
        #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
        pub struct #name {
            #(#fields)*
        }

        #(#impls)*
    })
}

fn generate_input(input: &InputType, mapper: &TypeMapper) -> Result<TokenStream, GeneratorError> {
    let name = type_ident(&input.name);
    let doc = doc_attr(input.description.as_deref());

    let mut fields = Vec::new();
    for field in &input.fields {
        let ident = field_ident(&field.name);
        let ty = mapper.resolve_exact(&field.type_ref, Site::Types)?;
        let field_doc = doc_attr(field.description.as_deref());
        let rename = serde_rename(&field.name).map(|original| quote! { rename = #original });
        let attr = match (rename, field.type_ref.is_nullable()) {
            (Some(rename), true) => {
                quote! { #[serde(#rename, default, skip_serializing_if = "Option::is_none")] }
            }
            (None, true) => quote! { #[serde(default, skip_serializing_if = "Option::is_none")] },
            (Some(rename), false) => quote! { #[serde(#rename)] },
            (None, false) => TokenStream::new(),
        };
        fields.push(quote! {
            #field_doc
            #attr
            pub #ident: #ty,
        });
    }

    Ok(quote! {
        #doc
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        pub struct #name {
            #(#fields)*
        }
    })
}

fn generate_payload(payload: &PayloadType, mapper: &TypeMapper) -> Result<TokenStream, GeneratorError> {
    let name = type_ident(&payload.name);
    let doc = doc_attr(payload.description.as_deref());
    let fields = payload
        .fields
        .iter()
        .map(|f| response_field(f, &f.type_ref, mapper))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(quote! {
        #doc
        #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
        pub struct #name {
            #(#fields)*
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeneratorConfig;
    use crate::test_utils::{format_generated_code, sample_schema};
    use grafter_define::InterfaceType;

    fn generate() -> String {
        let schema = sample_schema();
        let config = GeneratorConfig::default();
        let mapper = TypeMapper::new(&schema, &config);
        format_generated_code(&generate_types(&schema, &mapper, "remote").unwrap()).unwrap()
    }

    #[test]
    fn unions_are_tagged_enums() {
        let code = generate();
        assert!(code.contains("#[serde(tag = \"__typename\")]\npub enum SearchResult {"));
        assert!(code.contains("Account(Account),"));
        assert!(code.contains("Post(Post),"));
    }

    #[test]
    fn enums_keep_schema_spelling() {
        let code = generate();
        assert!(code.contains("pub enum Stage {"));
        assert!(code.contains("#[serde(rename = \"CONNECTED\")]\n    Connected,"));
    }

    #[test]
    fn interfaces_get_value_enums() {
        let code = generate();
        assert!(code.contains("pub enum AnyNode {"));
    }

    #[test]
    fn objects_exclude_function_fields() {
        let code = generate();
        assert!(code.contains("pub struct Account {"));
        assert!(code.contains("pub email: Option<String>,"));
        assert!(!code.contains("pub create_fn"));
    }

    #[test]
    fn response_fields_are_optional_with_renames() {
        let code = generate();
        assert!(code.contains("pub id: Option<super::scalars::ID>,"));
        assert!(code.contains("rename = \"totalCount\""));
        assert!(code.contains("pub total_count: Option<super::scalars::Int>,"));
    }

    #[test]
    fn composites_are_boxed() {
        let code = generate();
        assert!(code.contains("pub author: Option<Box<Account>>,"));
        assert!(code.contains("pub edges: Option<Vec<Option<PostEdge>>>,"));
    }

    #[test]
    fn interface_impls_delegate() {
        let code = generate();
        assert!(code.contains("impl super::interfaces::Node for Account {"));
        assert!(code.contains("self.id.as_ref()"));
        assert!(code.contains("impl super::interfaces::Timestamped for Post {"));
        assert!(code.contains("self.created_at(format)"));
    }

    #[test]
    fn narrowed_fields_are_stored_as_the_interface_declares() {
        let schema = Schema::new()
            .with_builtin_scalars()
            .with(SchemaKind::Interface(
                InterfaceType::new("Node")
                    .field(FieldDescriptor::leaf("tags", TypeRef::named("String").list()))
                    .field(FieldDescriptor::composite("parent", TypeRef::named("Node"))),
            ))
            .with(SchemaKind::Object(
                ObjectType::new("Post")
                    .implements("Node")
                    .field(FieldDescriptor::leaf(
                        "tags",
                        TypeRef::named("String").non_null().list().non_null(),
                    ))
                    .field(FieldDescriptor::composite("parent", TypeRef::named("Post").non_null())),
            ));
        let config = GeneratorConfig::default();
        let mapper = TypeMapper::new(&schema, &config);
        let code = format_generated_code(&generate_types(&schema, &mapper, "remote").unwrap()).unwrap();

        assert!(code.contains("pub tags: Option<Vec<Option<String>>>,"));
        assert!(code.contains("pub parent: Option<Box<AnyNode>>,"));
        assert!(code.contains("self.parent.as_deref()"));
    }

    #[test]
    fn inputs_use_exact_types() {
        let code = generate();
        assert!(code.contains("pub struct CreateAccountInput {"));
        assert!(code.contains("pub name: String,"));
        assert!(code.contains("pub stage: Option<Stage>,"));
    }

    #[test]
    fn payloads_keep_all_fields() {
        let code = generate();
        assert!(code.contains("pub struct CreateAccountPayload {"));
        assert!(code.contains("pub account: Option<Box<Account>>,"));
    }
}

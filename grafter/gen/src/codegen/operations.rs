//! Operation binding generation.
//!
//! For every root field the generated module contains:
//!
//! - an `Operation` constant holding the complete document
//! - a `<Name>Variables` struct with one field per argument
//! - a `<Name>Data` struct shaped like the response `data` object
//! - a `<snake_name>` function executing the operation through a
//!   `grafter::RemoteClient`
//!
//! Variables and the document are derived from the same argument list, so
//! every declared variable has exactly one struct field.

use grafter_define::{FieldDescriptor, Schema};
use proc_macro2::TokenStream;
use quote::{format_ident, quote};

use crate::document::{RootKind, build_operation};
use crate::errors::GeneratorError;
use crate::naming::{field_ident, serde_rename, to_screaming_snake_case};
use crate::type_mapper::{Site, TypeMapper};

/// Generates bindings for every query, then every mutation.
pub fn generate_operations(schema: &Schema, mapper: &TypeMapper) -> Result<TokenStream, GeneratorError> {
    let mut items = Vec::new();
    for field in &schema.queries {
        items.push(generate_operation(schema, mapper, RootKind::Query, field)?);
    }
    for field in &schema.mutations {
        items.push(generate_operation(schema, mapper, RootKind::Mutation, field)?);
    }

    Ok(quote! {
        //! Typed operations against the service.

        use serde::{Deserialize, Serialize};

        #(#items)*
    })
}

fn generate_operation(
    schema: &Schema,
    mapper: &TypeMapper,
    kind: RootKind,
    field: &FieldDescriptor,
) -> Result<TokenStream, GeneratorError> {
    let document = build_operation(schema, kind, field);
    let op_name = &document.name;
    let text = &document.text;

    let const_name = format_ident!(
        "{}_{}",
        to_screaming_snake_case(op_name),
        kind.const_suffix()
    );
    let constructor = format_ident!("{}", kind.keyword());
    let variables_name = format_ident!("{}Variables", op_name);
    let data_name = format_ident!("{}Data", op_name);
    let fn_name = field_ident(&field.name);

    let mut variable_fields = Vec::new();
    for arg in &field.arguments {
        let ident = field_ident(&arg.name);
        let ty = mapper.resolve_exact(&arg.type_ref, Site::Operations)?;
        let rename = serde_rename(&arg.name).map(|original| quote! { rename = #original, });
        let attr = if arg.type_ref.is_nullable() {
            quote! { #[serde(#rename skip_serializing_if = "Option::is_none")] }
        } else if let Some(rename) = serde_rename(&arg.name) {
            quote! { #[serde(rename = #rename)] }
        } else {
            TokenStream::new()
        };
        variable_fields.push(quote! {
            #attr
            pub #ident: #ty,
        });
    }
    let variables_derive = if field.arguments.iter().all(|a| a.type_ref.is_nullable()) {
        quote! { #[derive(Debug, Clone, Default, PartialEq, Serialize)] }
    } else {
        quote! { #[derive(Debug, Clone, PartialEq, Serialize)] }
    };

    let data_field = field_ident(&field.name);
    let data_type = mapper.resolve_value(&field.type_ref, Site::Operations)?;
    let data_rename = serde_rename(&field.name).map(|original| quote! { rename = #original, });

    let const_doc = format!(" `{}` {}.", field.name, kind.keyword());
    let fn_doc = format!(
        " Executes `{}`; `on_result` receives progress updates and exactly one terminal result.",
        field.name
    );

    Ok(quote! {
        #[doc = #const_doc]
        pub const #const_name: grafter::Operation = grafter::Operation::#constructor(#op_name, #text);

        #variables_derive
        pub struct #variables_name {
            #(#variable_fields)*
        }

        #[derive(Debug, Clone, Default, PartialEq, Deserialize)]
        pub struct #data_name {
            #[serde(#data_rename default)]
            pub #data_field: Option<#data_type>,
        }

        #[doc = #fn_doc]
        pub fn #fn_name<T, F>(
            client: &grafter::RemoteClient<T>,
            variables: &#variables_name,
            on_result: F,
        ) -> grafter::OperationHandle
        where
            T: grafter::Transport,
            F: FnMut(grafter::AsyncResult<#data_name>) + Send + 'static,
        {
            client.execute_serialized(&#const_name, variables, on_result)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeneratorConfig;
    use crate::test_utils::{format_generated_code, sample_schema};

    fn generate() -> String {
        let schema = sample_schema();
        let config = GeneratorConfig::default();
        let mapper = TypeMapper::new(&schema, &config);
        format_generated_code(&generate_operations(&schema, &mapper).unwrap()).unwrap()
    }

    #[test]
    fn constants_hold_documents() {
        let code = generate();
        assert!(code.contains("pub const VIEWER_QUERY: grafter::Operation"));
        assert!(code.contains("grafter::Operation::query("));
        assert!(code.contains("pub const CREATE_ACCOUNT_MUTATION: grafter::Operation"));
        assert!(code.contains("grafter::Operation::mutation("));
        assert!(code.contains("fragment AccountFragment on Account { id name email }"));
    }

    #[test]
    fn variables_mirror_arguments() {
        let code = generate();
        assert!(code.contains("pub struct SearchVariables {\n    pub text: String,\n}"));
        assert!(code.contains("pub input: super::types::CreateAccountInput,"));
        assert!(code.contains("pub first: Option<super::scalars::Int>,"));
        assert!(code.contains("pub struct ViewerVariables {}"));
    }

    #[test]
    fn optional_only_variables_derive_default() {
        let code = generate();
        assert!(code.contains("#[derive(Debug, Clone, Default, PartialEq, Serialize)]\npub struct PostsVariables"));
        assert!(code.contains("#[derive(Debug, Clone, PartialEq, Serialize)]\npub struct SearchVariables"));
    }

    #[test]
    fn data_is_response_shaped() {
        let code = generate();
        assert!(code.contains("pub viewer: Option<super::types::Account>,"));
        assert!(code.contains("pub node: Option<super::types::AnyNode>,"));
        assert!(code.contains("pub search: Option<Vec<Option<super::types::SearchResult>>>,"));
        assert!(code.contains("rename = \"createAccount\""));
    }

    #[test]
    fn functions_execute_through_the_client() {
        let code = generate();
        assert!(code.contains("pub fn create_account<T, F>("));
        assert!(code.contains("client.execute_serialized(&CREATE_ACCOUNT_MUTATION, variables, on_result)"));
    }
}

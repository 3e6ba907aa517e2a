//! Interface trait generation.
//!
//! Every interface becomes a trait with one accessor per declared field,
//! named `<prefix>_<field>`. Stored fields return a borrowed `Option<&T>`;
//! function fields take their arguments and return an owned `Option<T>`.

use grafter_define::{FieldDescriptor, InterfaceType, Schema};
use proc_macro2::{Ident, Span, TokenStream};
use quote::quote;

use crate::codegen::doc_attr;
use crate::errors::GeneratorError;
use crate::naming::{field_ident, to_snake_case, type_ident};
use crate::type_mapper::{Site, TypeMapper};

/// Name of the accessor generated for a field (`remote_created_at`).
pub fn accessor_ident(prefix: &str, field: &str) -> Ident {
    Ident::new(&format!("{prefix}_{}", to_snake_case(field)), Span::call_site())
}

/// Renders the accessor signature shared by the trait and its impls.
///
/// Types are resolved from the interfaces site so both sides spell them
/// identically.
pub(crate) fn accessor_signature(
    field: &FieldDescriptor,
    prefix: &str,
    mapper: &TypeMapper,
) -> Result<TokenStream, GeneratorError> {
    let name = accessor_ident(prefix, &field.name);
    let value = mapper.resolve_value(&field.type_ref, Site::Interfaces)?;

    if field.is_function {
        let mut params = Vec::new();
        for arg in &field.arguments {
            let ident = field_ident(&arg.name);
            let ty = mapper.resolve_exact(&arg.type_ref, Site::Interfaces)?;
            params.push(quote! { #ident: #ty });
        }
        Ok(quote! { fn #name(&self #(, #params)*) -> Option<#value> })
    } else {
        Ok(quote! { fn #name(&self) -> Option<&#value> })
    }
}

fn generate_trait(
    interface: &InterfaceType,
    prefix: &str,
    mapper: &TypeMapper,
) -> Result<TokenStream, GeneratorError> {
    let name = type_ident(&interface.name);
    let doc = doc_attr(interface.description.as_deref());

    let mut methods = Vec::new();
    for field in &interface.fields {
        let signature = accessor_signature(field, prefix, mapper)?;
        let field_doc = doc_attr(field.description.as_deref());
        methods.push(quote! {
            #field_doc
            #signature;
        });
    }

    Ok(quote! {
        #doc
        pub trait #name {
            #(#methods)*
        }
    })
}

/// Generates one trait per interface, in declaration order.
///
/// ## Examples
///
/// ```ignore
/// // Generated code for `interface Node { id: ID! }`:
/// pub trait Node {
///     fn remote_id(&self) -> Option<&super::scalars::ID>;
/// }
/// ```
pub fn generate_interfaces(
    schema: &Schema,
    mapper: &TypeMapper,
    prefix: &str,
) -> Result<TokenStream, GeneratorError> {
    let traits = schema
        .interfaces()
        .map(|interface| generate_trait(interface, prefix, mapper))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(quote! {
        //! Interface traits implemented by the generated types.

        #(#traits)*
    })
}

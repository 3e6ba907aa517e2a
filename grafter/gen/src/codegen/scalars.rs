//! Scalar alias generation.

use grafter_define::Schema;
use proc_macro2::TokenStream;
use quote::quote;

use crate::codegen::doc_attr;
use crate::errors::GeneratorError;
use crate::naming::type_ident;
use crate::type_mapper::TypeMapper;

/// Generates `pub type X = <mapped>;` for every scalar not mapped to itself.
///
/// ## Examples
///
/// ```ignore
/// // Generated code for ID -> String, Timestamp -> String:
/// pub type ID = String;
/// pub type Timestamp = String;
/// ```
pub fn generate_scalars(schema: &Schema, mapper: &TypeMapper) -> Result<TokenStream, GeneratorError> {
    let mut aliases = Vec::new();
    for scalar in schema.scalars() {
        if mapper.is_identity_scalar(&scalar.name) {
            continue;
        }
        let name = type_ident(&scalar.name);
        let mapped = mapper.resolve_scalar(&scalar.name)?;
        let doc = doc_attr(scalar.description.as_deref());
        aliases.push(quote! {
            #doc
            pub type #name = #mapped;
        });
    }

    Ok(quote! {
        //! Scalar type aliases.

        #(#aliases)*
    })
}

//! Fragment constant generation.

use grafter_define::Schema;
use proc_macro2::TokenStream;
use quote::{format_ident, quote};

use crate::fragment::build_fragment;
use crate::validation::fragment_const_name;

/// Generates a `pub const <NAME>_FRAGMENT: &str` per object with a fragment.
///
/// ## Examples
///
/// ```ignore
/// // Generated code:
/// pub const ACCOUNT_FRAGMENT: &str = "fragment AccountFragment on Account { id name email }";
/// ```
pub fn generate_fragments(schema: &Schema) -> TokenStream {
    let constants = schema.objects().filter_map(|object| {
        let fragment = build_fragment(object)?;
        let name = format_ident!("{}", fragment_const_name(&object.name));
        Some(quote! {
            pub const #name: &str = #fragment;
        })
    });

    quote! {
        //! Reusable fragments, one per concrete object.

        #(#constants)*
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{format_generated_code, sample_schema};

    #[test]
    fn one_constant_per_fragment_bearing_object() {
        let code = format_generated_code(&generate_fragments(&sample_schema())).unwrap();
        assert!(code.contains("pub const ACCOUNT_FRAGMENT: &str"));
        assert!(code.contains("\"fragment AccountFragment on Account { id name email }\""));
        assert!(code.contains("POST_FRAGMENT"));
        assert!(!code.contains("POST_EDGE_FRAGMENT"));
        assert!(!code.contains("POST_CONNECTION_FRAGMENT"));
    }
}

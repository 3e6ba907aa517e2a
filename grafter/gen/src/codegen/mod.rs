//! Code generation modules for grafter.
//!
//! Each submodule produces one generated section from a validated
//! [`Schema`](grafter_define::Schema).
//!
//! ## Submodules
//!
//! - [`interfaces`] - One trait per interface, with prefixed accessors
//! - [`scalars`] - `pub type` aliases for mapped scalars
//! - [`types`] - Unions, enums, interface value enums, objects, inputs, payloads
//! - [`fragments`] - Fragment string constants
//! - [`operations`] - Per-root-field operation constants, variables, data, and functions
//! - [`module_docs`] - Documentation for the generated `mod.rs`
//!
//! ## Output Format
//!
//! All generators return `proc_macro2::TokenStream`, which is then:
//! - Validated with `syn::parse2` to ensure correctness
//! - Formatted with `prettyplease` for consistent style
//!
//! See [`crate::output`] for the assembly and file writing logic.

pub mod fragments;
pub mod interfaces;
pub mod module_docs;
pub mod operations;
pub mod scalars;
pub mod types;

pub use fragments::generate_fragments;
pub use interfaces::generate_interfaces;
pub use module_docs::ModuleDocBuilder;
pub use operations::generate_operations;
pub use scalars::generate_scalars;
pub use types::generate_types;

use proc_macro2::TokenStream;
use quote::quote;

/// Renders an optional schema description as a doc attribute.
pub(crate) fn doc_attr(description: Option<&str>) -> TokenStream {
    match description {
        Some(text) => {
            let lines = text.lines().map(|line| format!(" {line}"));
            quote! { #(#[doc = #lines])* }
        }
        None => TokenStream::new(),
    }
}

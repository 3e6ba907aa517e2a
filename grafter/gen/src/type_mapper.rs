//! Mapping schema type references to Rust types.
//!
//! ## Resolution Rules
//!
//! | Schema | Rust |
//! |--------|------|
//! | `T` (nullable) | `Option<T>` |
//! | `T!` | `T` |
//! | `[T]` | `Vec<..>` |
//! | scalar `X` mapped to itself (e.g. `String`) | `String` |
//! | scalar `X` mapped elsewhere | `super::scalars::X` |
//! | interface `I` | `AnyI` |
//! | object / union / input / payload `T` outside a list, in `types.rs` | `Box<T>` |
//!
//! Composite references from `interfaces.rs` and `operations.rs` are
//! qualified as `super::types::T`.

use grafter_define::{Schema, SchemaKind, TypeRef};
use proc_macro2::TokenStream;
use quote::{format_ident, quote};

use crate::config::GeneratorConfig;
use crate::errors::GeneratorError;
use crate::naming::type_ident;
use crate::validation::any_name;

/// The generated section a type reference is emitted from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Site {
    /// `types.rs`: composite references are local and boxed outside lists.
    Types,
    /// `interfaces.rs`: composite references go through `super::types`.
    Interfaces,
    /// `operations.rs`: composite references go through `super::types`.
    Operations,
}

/// Resolves type references against a schema and scalar mapping table.
pub struct TypeMapper<'a> {
    schema: &'a Schema,
    config: &'a GeneratorConfig,
}

impl<'a> TypeMapper<'a> {
    pub fn new(schema: &'a Schema, config: &'a GeneratorConfig) -> Self {
        Self { schema, config }
    }

    /// Returns the Rust type a scalar maps to.
    ///
    /// ## Errors
    ///
    /// Returns `GeneratorError::UnknownScalar` when the table has no entry;
    /// there is no fallback type.
    pub fn resolve_scalar(&self, name: &str) -> Result<syn::Type, GeneratorError> {
        let mapped = self
            .config
            .scalars
            .get(name)
            .ok_or_else(|| GeneratorError::UnknownScalar {
                name: name.to_string(),
            })?;
        syn::parse_str(mapped).map_err(|e| {
            GeneratorError::ConfigError(format!("scalar '{name}' maps to invalid type '{mapped}': {e}"))
        })
    }

    /// Returns `true` if the scalar maps to a type spelled like its own name.
    pub fn is_identity_scalar(&self, name: &str) -> bool {
        self.config.scalars.get(name).is_some_and(|m| m == name)
    }

    /// Resolves a reference preserving nullability and multiplicity exactly.
    pub fn resolve_exact(&self, ty: &TypeRef, site: Site) -> Result<TokenStream, GeneratorError> {
        self.wrap(ty, site, false)
    }

    /// Resolves a reference with the outermost nullability dropped.
    ///
    /// Used for response-shaped fields, which are always wrapped in a single
    /// `Option` by the caller.
    pub fn resolve_value(&self, ty: &TypeRef, site: Site) -> Result<TokenStream, GeneratorError> {
        self.bare(ty.nullable(), site, false)
    }

    /// Returns `true` if [`resolve_value`](Self::resolve_value) at
    /// [`Site::Types`] yields a `Box`.
    pub fn is_boxed(&self, ty: &TypeRef) -> bool {
        match ty.nullable() {
            TypeRef::Named(name) => self.schema.kind(name).is_some_and(needs_box),
            _ => false,
        }
    }

    fn wrap(&self, ty: &TypeRef, site: Site, in_list: bool) -> Result<TokenStream, GeneratorError> {
        match ty {
            TypeRef::NonNull(inner) => self.bare(inner, site, in_list),
            other => {
                let inner = self.bare(other, site, in_list)?;
                Ok(quote! { Option<#inner> })
            }
        }
    }

    fn bare(&self, ty: &TypeRef, site: Site, in_list: bool) -> Result<TokenStream, GeneratorError> {
        match ty {
            TypeRef::NonNull(inner) => self.bare(inner, site, in_list),
            TypeRef::List(inner) => {
                let element = self.wrap(inner, site, true)?;
                Ok(quote! { Vec<#element> })
            }
            TypeRef::Named(name) => self.named(name, site, !in_list),
        }
    }

    fn named(&self, name: &str, site: Site, may_box: bool) -> Result<TokenStream, GeneratorError> {
        let kind = self.schema.kind(name).ok_or_else(|| {
            GeneratorError::CodeGenError(format!("reference to undeclared type '{name}'"))
        })?;

        if let SchemaKind::Scalar(_) = kind {
            let mapped = self.resolve_scalar(name)?;
            if self.is_identity_scalar(name) {
                return Ok(quote! { #mapped });
            }
            let alias = type_ident(name);
            return Ok(quote! { super::scalars::#alias });
        }

        let ident = match kind {
            SchemaKind::Interface(_) => format_ident!("{}", any_name(name)),
            _ => type_ident(name),
        };
        let path = match site {
            Site::Types => quote! { #ident },
            Site::Interfaces | Site::Operations => quote! { super::types::#ident },
        };

        if may_box && site == Site::Types && needs_box(kind) {
            Ok(quote! { Box<#path> })
        } else {
            Ok(path)
        }
    }
}

fn needs_box(kind: &SchemaKind) -> bool {
    !matches!(kind, SchemaKind::Scalar(_) | SchemaKind::Enum(_))
}

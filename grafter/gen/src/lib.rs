//! Grafter code generator library.
//!
//! This crate generates a strongly-typed Rust GraphQL client from a schema
//! described with `grafter-define` (built in code or loaded from
//! introspection JSON). The generated code includes:
//!
//! - One trait per interface, with `remote_`-prefixed accessors
//! - Aliases for mapped scalars
//! - Structs for objects, inputs, and payloads; enums for unions, enums, and
//!   interface values
//! - One reusable fragment string per concrete object
//! - One operation constant, variables struct, data struct, and function per
//!   root query or mutation field
//!
//! ## Modules
//!
//! - [`config`] - Scalar mapping table and accessor prefix (TOML)
//! - [`validation`] - Schema checks run before emission
//! - [`type_mapper`] - Schema type references to Rust types
//! - [`fragment`] - Fragment derivation
//! - [`document`] - Operation document construction
//! - [`codegen`] - Code generation for each output section
//! - [`output`] - Final assembly, validation, and all-or-nothing writing
//! - [`naming`] - Identifier case conversion
//! - [`errors`] - Error types for the generator
//!
//! ## Example Usage
//!
//! ```no_run
//! use std::path::Path;
//! use grafter_define::parse_introspection;
//! use grafter_gen::config::GeneratorConfig;
//! use grafter_gen::output::generate_and_write;
//!
//! let json = std::fs::read_to_string("schema.json").unwrap();
//! let schema = parse_introspection(&json).unwrap();
//!
//! // Generate code (dry_run=true prints instead of writing)
//! let files = generate_and_write(&schema, &GeneratorConfig::default(), Path::new("src/graphql"), true).unwrap();
//! println!("{} files", files.len());
//! ```

pub mod codegen;
pub mod config;
pub mod document;
pub mod errors;
pub mod fragment;
pub mod naming;
pub mod output;
pub mod type_mapper;
pub mod validation;

#[cfg(test)]
pub mod test_utils;

//! Output assembly and file writing for generated code.
//!
//! This module handles the final phase of code generation: assembling every
//! generated section, validating and formatting it, and writing the result
//! to disk all-or-nothing.
//!
//! ## Output Structure
//!
//! ```text
//! <output>/
//! ├── mod.rs         # Module docs and declarations
//! ├── interfaces.rs  # Interface traits
//! ├── scalars.rs     # Scalar aliases
//! ├── types.rs       # Unions, enums, objects, inputs, payloads
//! ├── fragments.rs   # Fragment constants
//! └── operations.rs  # Operation constants, variables, data, functions
//! ```
//!
//! ## Safety Guarantees
//!
//! - **Validation**: the schema is validated and every section is parsed with
//!   `syn` before anything touches the disk
//! - **Formatting**: output is formatted with `prettyplease`
//! - **Staged writes**: every file is written to a temp file first; only when
//!   all temp files exist are they renamed into place

use std::fs;
use std::path::{Path, PathBuf};

use grafter_define::Schema;
use proc_macro2::TokenStream;
use quote::quote;
use tracing::{debug, info, warn};

use crate::codegen::{
    ModuleDocBuilder, generate_fragments, generate_interfaces, generate_operations,
    generate_scalars, generate_types,
};
use crate::config::GeneratorConfig;
use crate::errors::GeneratorError;
use crate::type_mapper::TypeMapper;
use crate::validation::validate_schema;

/// Header prepended to every generated file.
pub const GENERATED_HEADER: &str =
    "// This code was automatically generated by grafter-gen. Do not edit manually.\n\n";

/// One formatted output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    /// File name relative to the output directory.
    pub name: &'static str,
    /// Formatted content, header included.
    pub content: String,
}

/// Assembles the `mod.rs` of the generated client.
pub fn assemble_mod_rs(schema: &Schema) -> TokenStream {
    let docs = ModuleDocBuilder::new(schema).build();
    quote! {
        #docs

        pub mod fragments;
        pub mod interfaces;
        pub mod operations;
        pub mod scalars;
        pub mod types;
    }
}

/// Validates generated code using syn.
///
/// ## Errors
///
/// Returns `GeneratorError::CodeGenError` if the code fails to parse.
pub fn validate_code(tokens: &TokenStream) -> Result<syn::File, GeneratorError> {
    syn::parse2(tokens.clone())
        .map_err(|e| GeneratorError::CodeGenError(format!("Generated code is invalid: {}", e)))
}

/// Formats generated code using prettyplease and prepends the generated header.
pub fn format_code(file: &syn::File) -> String {
    format!("{GENERATED_HEADER}{}", prettyplease::unparse(file))
}

/// Validates the schema and renders every output file in memory.
///
/// Nothing is written; a failure in any section fails the whole run.
///
/// ## Errors
///
/// Returns the first validation or emission error.
pub fn generate(schema: &Schema, config: &GeneratorConfig) -> Result<Vec<GeneratedFile>, GeneratorError> {
    validate_schema(schema, config)?;
    let mapper = TypeMapper::new(schema, config);
    let prefix = config.accessor_prefix.as_str();

    let sections: [(&'static str, TokenStream); 6] = [
        ("mod.rs", assemble_mod_rs(schema)),
        ("interfaces.rs", generate_interfaces(schema, &mapper, prefix)?),
        ("scalars.rs", generate_scalars(schema, &mapper)?),
        ("types.rs", generate_types(schema, &mapper, prefix)?),
        ("fragments.rs", generate_fragments(schema)),
        ("operations.rs", generate_operations(schema, &mapper)?),
    ];

    sections
        .into_iter()
        .map(|(name, tokens)| -> Result<GeneratedFile, GeneratorError> {
            let file = validate_code(&tokens)?;
            let content = format_code(&file);
            debug!(file = name, bytes = content.len(), "rendered section");
            Ok(GeneratedFile { name, content })
        })
        .collect()
}

/// Writes every file, all-or-nothing.
///
/// All contents are first written to `<name>.tmp` siblings. If any of those
/// writes fails, the temp files are removed and the output directory is left
/// untouched. Otherwise the temp files are renamed into place.
///
/// ## Errors
///
/// Returns `GeneratorError::WriteError` naming the path that failed.
pub fn write_all(files: &[GeneratedFile], output_dir: &Path) -> Result<(), GeneratorError> {
    fs::create_dir_all(output_dir).map_err(|e| GeneratorError::WriteError {
        path: output_dir.display().to_string(),
        source: e,
    })?;

    let mut staged: Vec<(PathBuf, PathBuf)> = Vec::with_capacity(files.len());
    for file in files {
        let target = output_dir.join(file.name);
        let temp = target.with_extension("tmp");
        if let Err(e) = fs::write(&temp, &file.content) {
            remove_temps(&staged);
            let _ = fs::remove_file(&temp);
            return Err(GeneratorError::WriteError {
                path: temp.display().to_string(),
                source: e,
            });
        }
        staged.push((temp, target));
    }

    for (index, (temp, target)) in staged.iter().enumerate() {
        if let Err(e) = fs::rename(temp, target) {
            remove_temps(&staged[index..]);
            return Err(GeneratorError::WriteError {
                path: target.display().to_string(),
                source: e,
            });
        }
    }

    info!(dir = %output_dir.display(), files = files.len(), "wrote generated client");
    Ok(())
}

fn remove_temps(staged: &[(PathBuf, PathBuf)]) {
    for (temp, _) in staged {
        if let Err(e) = fs::remove_file(temp) {
            warn!(path = %temp.display(), error = %e, "failed to remove temp file");
        }
    }
}

/// Generates the client and either writes it or prints it.
///
/// This is the main entry point for code generation.
///
/// ## Examples
///
/// ```no_run
/// use std::path::Path;
/// use grafter_define::parse_introspection;
/// use grafter_gen::config::GeneratorConfig;
/// use grafter_gen::output::generate_and_write;
///
/// let json = std::fs::read_to_string("schema.json").unwrap();
/// let schema = parse_introspection(&json).unwrap();
/// generate_and_write(&schema, &GeneratorConfig::default(), Path::new("src/graphql"), false).unwrap();
/// ```
///
/// ## Errors
///
/// Returns an error if:
/// - The schema fails validation
/// - Code generation produces invalid Rust
/// - File writing fails
pub fn generate_and_write(
    schema: &Schema,
    config: &GeneratorConfig,
    output_dir: &Path,
    dry_run: bool,
) -> Result<Vec<GeneratedFile>, GeneratorError> {
    let files = generate(schema, config)?;

    if dry_run {
        for file in &files {
            println!("=== {} ===\n{}\n", file.name, file.content);
        }
    } else {
        write_all(&files, output_dir)?;
    }

    Ok(files)
}

//! Module documentation generation for the generated client.
//!
//! [`ModuleDocBuilder`] renders the `//!` header of the generated `mod.rs`:
//! an introduction, a contents summary, the operation list, and a usage
//! example.

use grafter_define::Schema;
use proc_macro2::TokenStream;
use quote::quote;

use crate::naming::to_snake_case;

/// Builds module-level documentation for a generated client.
///
/// ## Examples
///
/// ```
/// use grafter_define::Schema;
/// use grafter_gen::codegen::ModuleDocBuilder;
///
/// let schema = Schema::new().with_builtin_scalars();
/// let tokens = ModuleDocBuilder::new(&schema).build();
/// assert!(tokens.to_string().contains("Generated GraphQL client"));
/// ```
pub struct ModuleDocBuilder<'a> {
    schema: &'a Schema,
}

impl<'a> ModuleDocBuilder<'a> {
    pub fn new(schema: &'a Schema) -> Self {
        Self { schema }
    }

    /// Builds the module documentation as `#![doc = ...]` attributes.
    pub fn build(&self) -> TokenStream {
        let intro = self.intro_paragraph();
        let contents = self.contents_section();
        let operations = self.operations_section();
        let example = self.example_section();

        quote! {
            #![doc = #intro]
            //!
            #![doc = #contents]
            //!
            #![doc = #operations]
            //!
            #![doc = #example]
        }
    }

    fn intro_paragraph(&self) -> String {
        " Generated GraphQL client.\n\n Regenerate with `grafter-gen` instead of editing these files."
            .to_string()
    }

    fn contents_section(&self) -> String {
        let schema = self.schema;
        let rows = [
            ("interfaces", "traits", schema.interfaces().count()),
            ("scalars", "scalars", schema.scalars().count()),
            ("types", "objects", schema.objects().count()),
            ("types", "unions", schema.unions().count()),
            ("types", "enums", schema.enums().count()),
            ("types", "inputs", schema.inputs().count()),
            ("types", "payloads", schema.payloads().count()),
        ];

        let mut lines = vec![" ## Contents".to_string(), String::new()];
        for (module, label, count) in rows {
            lines.push(format!(" - [`{module}`]: {count} {label}"));
        }
        lines.join("\n")
    }

    fn operations_section(&self) -> String {
        let mut lines = vec![" ## Operations".to_string(), String::new()];
        if self.schema.queries.is_empty() && self.schema.mutations.is_empty() {
            lines.push(" No operations defined.".to_string());
            return lines.join("\n");
        }
        for (keyword, fields) in [("query", &self.schema.queries), ("mutation", &self.schema.mutations)] {
            for field in fields {
                lines.push(format!(
                    " - `{}` ({keyword}) returns `{}`",
                    to_snake_case(&field.name),
                    field.type_ref
                ));
            }
        }
        lines.join("\n")
    }

    fn example_section(&self) -> String {
        let Some(field) = self.schema.queries.first().or_else(|| self.schema.mutations.first()) else {
            return " ## Example\n\n No operations available for example.".to_string();
        };
        let function = to_snake_case(&field.name);
        let pascal = crate::naming::to_pascal_case(&field.name);

        format!(
            r#" ## Example

 ```ignore
 let transport = grafter::HttpTransport::builder("http://localhost:8080/graphql").build()?;
 let client = grafter::RemoteClient::new(transport);

 let handle = operations::{function}(&client, &operations::{pascal}Variables {{ .. }}, |result| {{
     result
         .on_success(|data| println!("{{data:?}}"))
         .on_failure(|err| eprintln!("{{err}}"));
 }});
 ```"#
        )
    }
}

//! Identifier conversion from schema names to Rust names.
//!
//! Schema names follow GraphQL conventions (`camelCase` fields, `PascalCase`
//! types, `SCREAMING_CASE` enum values). Rust wants `snake_case` for fields
//! and functions, `PascalCase` for types and variants, and
//! `SCREAMING_SNAKE_CASE` for constants.
//!
//! ## Examples
//!
//! ```
//! use grafter_gen::naming::{to_pascal_case, to_screaming_snake_case, to_snake_case};
//!
//! assert_eq!(to_snake_case("createFn"), "create_fn");
//! assert_eq!(to_pascal_case("NOT_FOUND"), "NotFound");
//! assert_eq!(to_screaming_snake_case("AccountFragment"), "ACCOUNT_FRAGMENT");
//! ```

use proc_macro2::{Ident, Span};

/// Strict and reserved keywords of the 2024 edition.
const KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "crate",
    "do", "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl",
    "in", "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
    "return", "self", "Self", "static", "struct", "super", "trait", "true", "try", "type",
    "typeof", "unsafe", "unsized", "use", "virtual", "where", "while", "yield",
];

/// Keywords that cannot be raw identifiers.
const NON_RAW_KEYWORDS: &[&str] = &["crate", "self", "Self", "super"];

/// Returns `true` if `name` is a GraphQL name (`[_A-Za-z][_0-9A-Za-z]*`).
pub fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Splits a name into words on `_` separators and case boundaries.
///
/// - "createFn" -> ["create", "Fn"]
/// - "HTTPClient" -> ["HTTP", "Client"]
/// - "NOT_FOUND" -> ["NOT", "FOUND"]
/// - "userID" -> ["user", "ID"]
pub fn split_words(s: &str) -> Vec<&str> {
    s.split('_')
        .filter(|part| !part.is_empty())
        .flat_map(split_camel_case)
        .collect()
}

fn split_camel_case(s: &str) -> Vec<&str> {
    let mut words = Vec::new();
    let mut word_start = 0;
    let chars: Vec<(usize, char)> = s.char_indices().collect();

    for i in 1..chars.len() {
        let (offset, current) = chars[i];
        let prev = chars[i - 1].1;

        // "userName" -> "user", "Name"; "HTTPClient" -> "HTTP", "Client"
        let is_new_word = current.is_uppercase()
            && (prev.is_lowercase()
                || prev.is_ascii_digit()
                || (i + 1 < chars.len() && chars[i + 1].1.is_lowercase() && prev.is_uppercase()));

        if is_new_word {
            if offset > word_start {
                words.push(&s[word_start..offset]);
            }
            word_start = offset;
        }
    }

    if word_start < s.len() {
        words.push(&s[word_start..]);
    }

    words
}

pub fn to_snake_case(s: &str) -> String {
    split_words(s)
        .iter()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join("_")
}

pub fn to_screaming_snake_case(s: &str) -> String {
    split_words(s)
        .iter()
        .map(|w| w.to_uppercase())
        .collect::<Vec<_>>()
        .join("_")
}

pub fn to_pascal_case(s: &str) -> String {
    split_words(s)
        .iter()
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect()
}

/// Builds an identifier, escaping keywords.
///
/// Most keywords become raw identifiers (`r#type`); the four that cannot be
/// raw get a trailing underscore (`self_`).
pub fn safe_ident(name: &str) -> Ident {
    if NON_RAW_KEYWORDS.contains(&name) {
        Ident::new(&format!("{name}_"), Span::call_site())
    } else if KEYWORDS.contains(&name) {
        Ident::new_raw(name, Span::call_site())
    } else {
        Ident::new(name, Span::call_site())
    }
}

/// Snake-cased identifier for a field, argument, or function.
pub fn field_ident(name: &str) -> Ident {
    safe_ident(&snake_or_placeholder(name))
}

/// Identifier for a declared type, used verbatim.
pub fn type_ident(name: &str) -> Ident {
    safe_ident(name)
}

/// Returns the serde rename needed to map `ident` back to the schema name.
pub fn serde_rename(schema_name: &str) -> Option<&str> {
    (snake_or_placeholder(schema_name) != schema_name).then_some(schema_name)
}

fn snake_or_placeholder(name: &str) -> String {
    let snake = to_snake_case(name);
    if snake.is_empty() {
        // a name made only of underscores
        "field_".to_string()
    } else if snake.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{snake}")
    } else {
        snake
    }
}

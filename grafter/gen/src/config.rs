//! Generator configuration.
//!
//! The configuration is an optional TOML file. Every key is optional; user
//! entries are merged over the defaults.
//!
//! ```toml
//! accessor_prefix = "remote"
//!
//! [scalars]
//! Timestamp = "chrono::DateTime<chrono::Utc>"
//! JSON = "serde_json::Value"
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::errors::GeneratorError;

/// Default prefix for interface accessor methods.
pub const DEFAULT_ACCESSOR_PREFIX: &str = "remote";

/// Scalar mappings applied before user overrides.
const DEFAULT_SCALARS: &[(&str, &str)] = &[
    ("ID", "String"),
    ("String", "String"),
    ("Int", "i32"),
    ("Float", "f64"),
    ("Boolean", "bool"),
    ("Timestamp", "String"),
];

/// Resolved generator configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Schema scalar name to Rust type path.
    pub scalars: BTreeMap<String, String>,
    /// Prefix of interface accessor methods (`remote_` + field).
    pub accessor_prefix: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    scalars: BTreeMap<String, String>,
    accessor_prefix: Option<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            scalars: DEFAULT_SCALARS
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            accessor_prefix: DEFAULT_ACCESSOR_PREFIX.to_string(),
        }
    }
}

impl GeneratorConfig {
    /// Parses a TOML document and merges it over the defaults.
    ///
    /// ## Examples
    ///
    /// ```
    /// use grafter_gen::config::GeneratorConfig;
    ///
    /// let config = GeneratorConfig::from_toml_str(r#"
    ///     [scalars]
    ///     Timestamp = "u64"
    /// "#).unwrap();
    ///
    /// assert_eq!(config.scalars["Timestamp"], "u64");
    /// assert_eq!(config.scalars["Int"], "i32");
    /// assert_eq!(config.accessor_prefix, "remote");
    /// ```
    ///
    /// ## Errors
    ///
    /// Returns `GeneratorError::ConfigError` for malformed TOML, unknown keys,
    /// mapped types that are not valid Rust types, or a prefix that is not a
    /// valid identifier.
    pub fn from_toml_str(content: &str) -> Result<Self, GeneratorError> {
        let file: ConfigFile =
            toml::from_str(content).map_err(|e| GeneratorError::ConfigError(e.to_string()))?;

        let mut config = Self::default();
        config.scalars.extend(file.scalars);
        if let Some(prefix) = file.accessor_prefix {
            config.accessor_prefix = prefix;
        }
        config.validate()?;
        Ok(config)
    }

    /// Loads a TOML file and merges it over the defaults.
    pub fn load(path: &Path) -> Result<Self, GeneratorError> {
        let content = std::fs::read_to_string(path).map_err(|e| GeneratorError::ReadError {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_toml_str(&content)
    }

    /// Overrides (or adds) one scalar mapping.
    pub fn with_scalar(mut self, name: impl Into<String>, rust_type: impl Into<String>) -> Self {
        self.scalars.insert(name.into(), rust_type.into());
        self
    }

    fn validate(&self) -> Result<(), GeneratorError> {
        for (name, rust_type) in &self.scalars {
            syn::parse_str::<syn::Type>(rust_type).map_err(|e| {
                GeneratorError::ConfigError(format!(
                    "scalar '{name}' maps to '{rust_type}', which is not a Rust type: {e}"
                ))
            })?;
        }

        let prefix = &self.accessor_prefix;
        let valid = !prefix.is_empty()
            && prefix
                .chars()
                .next()
                .is_some_and(|c| c.is_ascii_lowercase() || c == '_')
            && prefix
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
        if !valid {
            return Err(GeneratorError::ConfigError(format!(
                "accessor_prefix '{prefix}' must be a snake_case identifier"
            )));
        }
        Ok(())
    }
}

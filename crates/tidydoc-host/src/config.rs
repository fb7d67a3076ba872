//! The host tool's named configuration value store.
//!
//! Extensions register values with a default and a rebuild condition; the
//! user's configuration file may override any of them before the build
//! starts. Typed access deserializes the stored JSON value into whatever the
//! caller asks for.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::SetupError;

/// What must be rebuilt when a config value changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rebuild {
    /// Rebuild rendered output only.
    Html,
    /// Rebuild the whole environment.
    Env,
    /// No rebuild needed.
    None,
}

/// A registered configuration value.
#[derive(Debug, Clone)]
struct ConfigValue {
    default: Value,
    rebuild: Rebuild,
}

/// The host configuration as seen by extensions.
#[derive(Debug, Clone)]
pub struct Config {
    values: BTreeMap<String, ConfigValue>,
    overrides: BTreeMap<String, Value>,
    /// Active extension names, in load order.
    pub extensions: Vec<String>,
    /// Template context for HTML rendering (`github_user` etc.).
    pub html_context: BTreeMap<String, String>,
    /// Theme options (`repository_url` etc.).
    pub html_theme_options: BTreeMap<String, String>,
    /// Recognized document source suffixes, most preferred first.
    pub source_suffixes: Vec<String>,
    /// Root directory of the documentation sources.
    pub src_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            values: BTreeMap::new(),
            overrides: BTreeMap::new(),
            extensions: Vec::new(),
            html_context: BTreeMap::new(),
            html_theme_options: BTreeMap::new(),
            source_suffixes: vec![".rst".to_owned(), ".md".to_owned()],
            src_dir: PathBuf::from("."),
        }
    }
}

impl Config {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a named config value with its default.
    ///
    /// A value registered twice keeps its first registration; user overrides
    /// are untouched either way.
    pub fn add_value(&mut self, name: &str, default: Value, rebuild: Rebuild) {
        self.values
            .entry(name.to_owned())
            .or_insert(ConfigValue { default, rebuild });
    }

    /// Whether a value of this name has been registered.
    #[must_use]
    pub fn has_value(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// The rebuild condition of a registered value.
    #[must_use]
    pub fn rebuild(&self, name: &str) -> Option<Rebuild> {
        self.values.get(name).map(|v| v.rebuild)
    }

    /// Set a user override for a value.
    ///
    /// Overrides may be set before the owning extension registers the value;
    /// they are validated on access.
    pub fn set(&mut self, name: &str, value: Value) {
        self.overrides.insert(name.to_owned(), value);
    }

    /// The raw stored value: the user override if present, else the default.
    #[must_use]
    pub fn raw(&self, name: &str) -> Option<&Value> {
        self.overrides
            .get(name)
            .or_else(|| self.values.get(name).map(|v| &v.default))
    }

    /// Typed access to a registered value.
    pub fn get<T: DeserializeOwned>(&self, name: &str) -> Result<T, SetupError> {
        let value = if let Some(value) = self.overrides.get(name) {
            value
        } else {
            &self
                .values
                .get(name)
                .ok_or_else(|| SetupError::UnknownConfigValue(name.to_owned()))?
                .default
        };
        serde_json::from_value(value.clone()).map_err(|source| SetupError::InvalidConfigValue {
            name: name.to_owned(),
            source,
        })
    }

    /// Typed access with a fallback for unregistered values.
    #[must_use]
    pub fn get_or<T: DeserializeOwned>(&self, name: &str, default: T) -> T {
        self.get(name).unwrap_or(default)
    }

    /// Convenience accessor for boolean flags.
    pub fn get_bool(&self, name: &str) -> Result<bool, SetupError> {
        self.get(name)
    }

    /// Whether an extension name appears in the active extension list.
    #[must_use]
    pub fn extension_active(&self, name: &str) -> bool {
        self.extensions.iter().any(|e| e == name)
    }

    /// Position of an extension in the load order.
    #[must_use]
    pub fn extension_position(&self, name: &str) -> Option<usize> {
        self.extensions.iter().position(|e| e == name)
    }
}

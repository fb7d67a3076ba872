//! A widescreen book theme with docsearch support.
//!
//! Registered like an extension; selecting `html_theme = "tidydoc"` picks it
//! up. Besides the inherited options it understands `accent_color` and the
//! docsearch options (`docsearch_key`, `docsearch_index`,
//! `docsearch_doc_version`, `docsearch_js_version`).

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tidydoc_host::{App, Config, ExtensionMetadata, SetupError};

pub const NAME: &str = "tidydoc.theme";

/// The theme's own directory, shipped alongside the crate.
#[must_use]
pub fn theme_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("theme")
}

fn default_accent_color() -> String {
    "#f07e44".to_owned()
}

fn default_js_version() -> String {
    "2.6".to_owned()
}

/// `stable` only when the docs host says this build is the stable one.
fn default_doc_version() -> String {
    match std::env::var("READTHEDOCS_VERSION").as_deref() {
        Ok("stable") => "stable".to_owned(),
        _ => "latest".to_owned(),
    }
}

/// Options this theme adds on top of the inherited ones.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ThemeOptions {
    /// CSS color for the mobile header background and the project name text.
    #[serde(default = "default_accent_color")]
    pub accent_color: String,
    /// Docsearch API key.
    #[serde(default)]
    pub docsearch_key: Option<String>,
    /// Docsearch index name.
    #[serde(default)]
    pub docsearch_index: Option<String>,
    /// Documentation version searched.
    #[serde(default = "default_doc_version")]
    pub docsearch_doc_version: String,
    /// Docsearch library version loaded.
    #[serde(default = "default_js_version")]
    pub docsearch_js_version: String,
}

impl Default for ThemeOptions {
    fn default() -> Self {
        Self {
            accent_color: default_accent_color(),
            docsearch_key: None,
            docsearch_index: None,
            docsearch_doc_version: default_doc_version(),
            docsearch_js_version: default_js_version(),
        }
    }
}

impl ThemeOptions {
    /// Read the options out of `html_theme_options`.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let opts = &config.html_theme_options;
        let mut options = Self::default();
        if let Some(color) = opts.get("accent_color") {
            options.accent_color = color.clone();
        }
        options.docsearch_key = opts.get("docsearch_key").cloned();
        options.docsearch_index = opts.get("docsearch_index").cloned();
        if let Some(version) = opts.get("docsearch_doc_version") {
            options.docsearch_doc_version = version.clone();
        }
        if let Some(version) = opts.get("docsearch_js_version") {
            options.docsearch_js_version = version.clone();
        }
        options
    }

    /// Docsearch needs both a key and an index.
    #[must_use]
    pub fn docsearch_enabled(&self) -> bool {
        self.docsearch_key.is_some() && self.docsearch_index.is_some()
    }
}

/// The theme manifest shipped in the theme directory.
#[derive(Debug, Clone, Deserialize)]
pub struct ThemeManifest {
    pub theme: ThemeMeta,
    #[serde(default)]
    pub options: Option<ThemeOptions>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ThemeMeta {
    pub name: String,
    pub inherit: String,
    pub stylesheet: String,
}

/// Load and parse a theme manifest.
pub fn load_manifest(dir: &Path) -> Result<ThemeManifest, SetupError> {
    let path = dir.join("theme.toml");
    let text = std::fs::read_to_string(&path)
        .map_err(|e| SetupError::Config(format!("cannot read {}: {e}", path.display())))?;
    toml::from_str(&text)
        .map_err(|e| SetupError::Config(format!("invalid theme manifest {}: {e}", path.display())))
}

/// Set up theme (like an extension).
pub fn setup(app: &mut App) -> Result<ExtensionMetadata, SetupError> {
    app.add_html_theme("tidydoc", theme_dir());
    Ok(crate::metadata())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ThemeOptions::default();
        assert_eq!(options.accent_color, "#f07e44");
        assert_eq!(options.docsearch_js_version, "2.6");
        assert!(!options.docsearch_enabled());
    }

    #[test]
    fn test_from_config() {
        let mut config = Config::new();
        for (k, v) in [
            ("accent_color", "#123456"),
            ("docsearch_key", "key"),
            ("docsearch_index", "idx"),
        ] {
            config.html_theme_options.insert(k.to_owned(), v.to_owned());
        }
        let options = ThemeOptions::from_config(&config);
        assert_eq!(options.accent_color, "#123456");
        assert!(options.docsearch_enabled());
        assert_eq!(options.docsearch_doc_version, default_doc_version());
    }

    #[test]
    fn test_shipped_manifest_parses() {
        let manifest = load_manifest(&theme_dir()).unwrap();
        assert_eq!(manifest.theme.name, "tidydoc");
        assert_eq!(manifest.theme.inherit, "book");
        let options = manifest.options.unwrap();
        assert_eq!(options.accent_color, "#f07e44");
    }

    #[test]
    fn test_setup_registers_theme() {
        let mut app = App::new();
        setup(&mut app).unwrap();
        assert_eq!(app.theme_path("tidydoc"), Some(&theme_dir()));
    }
}

//! Stub generation for imported members.
//!
//! The host's stub generator skips members a module merely re-exports. This
//! module replaces the option handling of that pass so stubs are generated
//! with `imported_members` turned on: the `generate` config value may be
//! `true` (scan every source document) or an explicit file list, and every
//! listed file is normalized to carry a recognized source suffix.

use std::path::PathBuf;

use glob::glob;
use serde::Deserialize;
use serde_json::json;
use tidydoc_host::{App, Config, ExtensionMetadata, Rebuild, SetupError};

pub const NAME: &str = "tidydoc.autosummary_generate_imported";

/// The `autosummary_generate` config value: a switch or an explicit list.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum GenerateOption {
    All(bool),
    Files(Vec<String>),
}

/// Options handed to the host's stub generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StubOptions {
    /// Suffix of the generated stub files.
    pub suffix: String,
    /// Directory the stubs are generated under.
    pub base_path: PathBuf,
    /// Also generate stubs for re-exported members.
    pub imported_members: bool,
}

/// Generates stub documents for a list of source files.
pub trait StubGenerator {
    fn generate(&self, files: &[String], options: &StubOptions);
}

/// Every source document under the source directory, relative to it.
fn discover_source_files(config: &Config) -> Vec<String> {
    let mut files = Vec::new();
    for suffix in &config.source_suffixes {
        let pattern = config.src_dir.join(format!("**/*{suffix}"));
        let Some(pattern) = pattern.to_str() else {
            continue;
        };
        let Ok(paths) = glob(pattern) else {
            log::warn!("invalid source pattern {pattern}");
            continue;
        };
        for path in paths.filter_map(Result::ok) {
            if let Ok(relative) = path.strip_prefix(&config.src_dir) {
                files.push(relative.to_string_lossy().into_owned());
            }
        }
    }
    files.sort();
    files
}

fn has_known_suffix(file: &str, suffixes: &[String]) -> bool {
    suffixes.iter().any(|suffix| file.ends_with(suffix.as_str()))
}

/// The files to generate stubs for, suffix-normalized.
///
/// Returns an empty list when generation is off or nothing is configured.
pub fn stub_files(config: &Config) -> Result<Vec<String>, SetupError> {
    let option: GenerateOption = config.get("autosummary_generate")?;
    let files = match option {
        GenerateOption::All(false) => return Ok(vec![]),
        GenerateOption::All(true) => discover_source_files(config),
        GenerateOption::Files(files) => files,
    };
    let default_suffix = config
        .source_suffixes
        .first()
        .cloned()
        .unwrap_or_else(|| ".rst".to_owned());
    Ok(files
        .into_iter()
        .map(|file| {
            if has_known_suffix(&file, &config.source_suffixes) {
                file
            } else {
                format!("{file}{default_suffix}")
            }
        })
        .collect())
}

/// Run stub generation with imported members included.
pub fn generate_stubs(config: &Config, generator: &dyn StubGenerator) -> Result<(), SetupError> {
    let files = stub_files(config)?;
    if files.is_empty() {
        log::info!("no stub files to generate");
        return Ok(());
    }
    let options = StubOptions {
        suffix: config
            .source_suffixes
            .first()
            .cloned()
            .unwrap_or_else(|| ".rst".to_owned()),
        base_path: config.src_dir.clone(),
        imported_members: true,
    };
    generator.generate(&files, &options);
    Ok(())
}

/// Register the replacement option handling.
pub fn setup(app: &mut App) -> Result<ExtensionMetadata, SetupError> {
    app.config
        .add_value("autosummary_generate", json!(false), Rebuild::Env);
    Ok(crate::metadata())
}

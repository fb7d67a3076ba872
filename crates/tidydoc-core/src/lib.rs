//! A suite of documentation-builder extensions for maintainable, readable
//! API docs.
//!
//! Each submodule is an extension with its own `setup`; this crate root is
//! also an extension itself which simply sets up the included ones.

pub mod def_list;
pub mod release_notes;
pub mod source_links;
pub mod stub_gen;
pub mod testing;
pub mod theme;
pub mod typehints;

use tidydoc_host::{App, ExtensionMetadata, SetupError};

pub const NAME: &str = "tidydoc";

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Metadata every extension in this crate reports.
#[must_use]
pub fn metadata() -> ExtensionMetadata {
    ExtensionMetadata {
        version: VERSION.to_owned(),
        env_version: 1,
        parallel_read_safe: true,
        parallel_write_safe: true,
    }
}

/// Set up all included extensions.
///
/// The source-link extension starts with an empty location registry here;
/// call [`source_links::setup`] directly to provide a populated one.
pub fn setup(app: &mut App) -> Result<ExtensionMetadata, SetupError> {
    stub_gen::setup(app)?;
    def_list::setup(app)?;
    typehints::inject::setup(app)?;
    typehints::setup(app)?;
    source_links::setup(app, source_links::SourceRegistry::new())?;
    theme::setup(app)?;
    Ok(metadata())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_reports_crate_version() {
        let metadata = metadata();
        assert_eq!(metadata.version, VERSION);
        assert!(metadata.parallel_read_safe);
    }

    #[test]
    fn test_umbrella_setup_registers_everything() {
        let mut app = App::new();
        setup(&mut app).unwrap();
        assert!(app.has_role("annotation-terse"));
        assert!(app.has_role("github_url"));
        assert!(app.theme_path("tidydoc").is_some());
        assert!(app.config.has_value("qualname_overrides"));
        assert!(app.config.has_value("autosummary_generate"));
    }
}

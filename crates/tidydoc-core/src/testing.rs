//! Testing utilities.
//!
//! [`make_app`] builds an application with a list of extensions active and
//! config overrides applied, then runs initialization, the way a test
//! fixture would.

use serde_json::Value;
use tidydoc_host::{App, SetupError};

use crate::{def_list, release_notes, source_links, stub_gen, theme, typehints};

/// Set up one extension by name.
fn setup_extension(app: &mut App, name: &str) -> Result<(), SetupError> {
    match name {
        crate::NAME => {
            crate::setup(app)?;
        }
        typehints::NAME => {
            typehints::setup(app)?;
        }
        typehints::inject::NAME => {
            typehints::inject::setup(app)?;
        }
        def_list::NAME => {
            def_list::setup(app)?;
        }
        source_links::NAME => {
            source_links::setup(app, source_links::SourceRegistry::new())?;
        }
        release_notes::NAME => {
            release_notes::setup(app)?;
        }
        stub_gen::NAME => {
            stub_gen::setup(app)?;
        }
        theme::NAME => {
            theme::setup(app)?;
        }
        // Host-builtin extensions have no setup of ours.
        "napoleon" | "linkcode" => {}
        other => {
            return Err(SetupError::Config(format!("unknown extension '{other}'")));
        }
    }
    Ok(())
}

/// Create an initialized application for tests.
pub fn make_app(extensions: &[&str], overrides: &[(&str, Value)]) -> Result<App, SetupError> {
    let mut app = App::new();
    app.config.extensions = extensions.iter().map(|&e| e.to_owned()).collect();
    for (name, value) in overrides {
        app.config.set(name, value.clone());
    }
    for name in extensions {
        setup_extension(&mut app, name)?;
    }
    app.init()?;
    Ok(app)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tidydoc_host::{FormatSite, TypeDescriptor};

    #[test]
    fn test_make_app_wires_overrides() {
        let app = make_app(
            &[typehints::inject::NAME, typehints::NAME],
            &[("qualname_overrides", json!({"a._x.B": "a.B"}))],
        )
        .unwrap();
        let annot = TypeDescriptor::class("a._x", "B");
        assert_eq!(
            app.format_annotation(&annot, FormatSite::Nested).as_deref(),
            Some(":py:class:`~a.B`")
        );
    }

    #[test]
    fn test_make_app_rejects_unknown_extension() {
        assert!(make_app(&["no.such.extension"], &[]).is_err());
    }

    #[test]
    fn test_make_app_propagates_init_failures() {
        // Defaults annotation without the injection pass active fails fast.
        assert!(make_app(&[typehints::NAME], &[]).is_err());
    }
}

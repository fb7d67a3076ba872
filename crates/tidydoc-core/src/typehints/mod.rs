//! Elegant type rendering and link fixing.
//!
//! This extension claims the formatter slot for a simpler annotation style in
//! line with the large numeric packages, defines the `qualname_overrides`
//! config value that redirects links for classes documented away from their
//! defining module, rewrites generated class headers accordingly, and
//! annotates documented tuple-return fields element by element.

pub mod autodoc_patch;
pub mod baseline;
pub mod formatting;
pub mod inject;
pub mod overrides;
pub mod return_tuple;

use std::cell::OnceCell;
use std::rc::Rc;

use serde_json::{json, Value};
use tidydoc_host::{App, ExtensionMetadata, Node, Rebuild, SetupError, SymbolKind};

use formatting::FormatContext;
use overrides::OverrideTable;

pub const NAME: &str = "tidydoc.elegant_typehints";

/// Per-build state frozen at config-inited time.
struct ElegantState {
    overrides: OverrideTable,
    fully_qualified: bool,
    simplify_unions: bool,
}

impl ElegantState {
    fn context(&self) -> FormatContext<'_> {
        FormatContext {
            overrides: &self.overrides,
            fully_qualified: self.fully_qualified,
            simplify_unions: self.simplify_unions,
        }
    }
}

/// Register the extension.
pub fn setup(app: &mut App) -> Result<ExtensionMetadata, SetupError> {
    app.config
        .add_value("qualname_overrides", json!({}), Rebuild::Html);
    app.config
        .add_value("annotate_defaults", json!(true), Rebuild::Html);
    app.config
        .add_value("simplify_unions", json!(true), Rebuild::Html);
    app.add_css_file("typehints.css");

    for name in ["annotation-terse", "annotation-full"] {
        app.add_role(name, move |text| {
            Node::Inline {
                classes: name.split('-').map(str::to_owned).collect(),
                children: vec![Node::text(text)],
            }
        });
    }

    let state: Rc<OnceCell<ElegantState>> = Rc::new(OnceCell::new());

    {
        let state = Rc::clone(&state);
        app.on_config_inited(move |config| {
            let annotate_defaults = config.get_bool("annotate_defaults")?;
            if annotate_defaults && !config.extension_active(inject::NAME) {
                return Err(SetupError::MissingDependency {
                    extension: NAME,
                    requirement: inject::NAME,
                });
            }
            if annotate_defaults && config.raw("typehints_defaults").map_or(true, Value::is_null) {
                config.set("typehints_defaults", json!("braces"));
            }
            let _ = state.set(ElegantState {
                overrides: OverrideTable::from_config(config)?,
                fully_qualified: config.get_or("typehints_fully_qualified", false),
                simplify_unions: config.get_bool("simplify_unions")?,
            });
            Ok(())
        });
    }

    {
        let state = Rc::clone(&state);
        app.set_formatter(move |annotation, _config, site| {
            let state = state.get()?;
            formatting::format_inline(&state.context(), annotation, site)
        });
    }

    {
        let state = Rc::clone(&state);
        app.on_process_docstring(move |_app, symbol, lines| {
            let Some(state) = state.get() else { return };
            if matches!(symbol.kind, SymbolKind::Class | SymbolKind::Exception) {
                autodoc_patch::rewrite_directive_header(
                    &state.overrides,
                    symbol.kind == SymbolKind::Exception,
                    lines,
                );
            }
            return_tuple::process_docstring(&state.context(), symbol, lines);
        });
    }

    Ok(crate::metadata())
}

//! Annotation injection into docstring field lists.
//!
//! This is the companion pass that writes `:type name:` and `:rtype:` fields
//! from the reflected signature. It renders through the application's
//! formatter slot and falls back to the stock rendering when no formatter is
//! active or the formatter declines.

use serde_json::json;
use tidydoc_host::{App, DocSymbol, ExtensionMetadata, FormatSite, Rebuild, SetupError};

use super::{baseline, formatting};

/// Extension name other extensions check the load order against.
pub const NAME: &str = "typehints";

fn render(app: &App, annotation: &tidydoc_host::TypeDescriptor, site: FormatSite) -> String {
    app.format_annotation(annotation, site).unwrap_or_else(|| {
        let fully_qualified = app.config.get_or("typehints_fully_qualified", false);
        baseline::render(annotation, fully_qualified)
    })
}

/// Inject `:type:` and `:rtype:` fields for one symbol.
pub(crate) fn inject_types(app: &App, symbol: &DocSymbol, lines: &mut Vec<String>) {
    if !symbol.kind.is_callable() {
        return;
    }
    let Some(signature) = &symbol.signature else {
        return;
    };
    let defaults: Option<String> = app.config.get_or("typehints_defaults", None);

    for param in &signature.params {
        let Some(annotation) = &param.annotation else {
            continue;
        };
        let type_field = format!(":type {}:", param.name);
        if lines.iter().any(|line| line.starts_with(&type_field)) {
            continue;
        }
        let param_field = format!(":param {}:", param.name);
        let Some(at) = lines.iter().position(|line| line.starts_with(&param_field)) else {
            continue;
        };
        let mut rendered = render(app, annotation, FormatSite::Parameter);
        if let (Some(default), Some(_)) = (&param.default, &defaults) {
            // The repr may itself contain backticks.
            rendered.push_str(&format!(" (default: ``{}``)", formatting::escape(default)));
        }
        lines.insert(at, format!("{type_field} {rendered}"));
    }

    if let Some(ret) = &signature.ret {
        if !lines.iter().any(|line| line.starts_with(":rtype:")) {
            let rendered = render(app, ret, FormatSite::Return);
            lines.push(format!(":rtype: {rendered}"));
        }
    }
}

/// Register the injection pass.
pub fn setup(app: &mut App) -> Result<ExtensionMetadata, SetupError> {
    app.config
        .add_value("typehints_fully_qualified", json!(false), Rebuild::Env);
    app.config
        .add_value("typehints_defaults", json!(null), Rebuild::Html);
    app.on_process_docstring(|app, symbol, lines| inject_types(app, symbol, lines));
    Ok(crate::metadata())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tidydoc_host::{Param, Signature, SymbolKind, TypeDescriptor};

    fn symbol() -> DocSymbol {
        DocSymbol::new(SymbolKind::Function, "mypkg.f").with_signature(Signature {
            params: vec![
                Param::new("x", TypeDescriptor::builtin("int")).with_default("1"),
                Param::new("y", TypeDescriptor::builtin("str")),
            ],
            ret: Some(TypeDescriptor::none()),
        })
    }

    fn app() -> App {
        let mut app = App::new();
        setup(&mut app).unwrap();
        app.init().unwrap();
        app
    }

    #[test]
    fn test_injects_type_and_rtype_fields() {
        let app = app();
        let mut lines = vec![":param x: a number".to_owned(), ":param y: a name".to_owned()];
        app.process_docstring(&symbol(), &mut lines);
        assert_eq!(
            lines,
            vec![
                ":type x: :py:class:`int`",
                ":param x: a number",
                ":type y: :py:class:`str`",
                ":param y: a name",
                ":rtype: :py:obj:`None`",
            ]
        );
    }

    #[test]
    fn test_default_suffix_when_enabled() {
        let mut app = app();
        app.config.set("typehints_defaults", json!("braces"));
        let mut lines = vec![":param x: a number".to_owned(), ":param y: a name".to_owned()];
        app.process_docstring(&symbol(), &mut lines);
        assert_eq!(lines[0], ":type x: :py:class:`int` (default: ``1``)");
        // No default on y, and never on the return type.
        assert_eq!(lines[2], ":type y: :py:class:`str`");
        assert_eq!(lines[4], ":rtype: :py:obj:`None`");
    }

    #[test]
    fn test_default_repr_backticks_escaped() {
        let mut app = app();
        app.config.set("typehints_defaults", json!("braces"));
        let symbol = DocSymbol::new(SymbolKind::Function, "mypkg.f").with_signature(Signature {
            params: vec![
                Param::new("x", TypeDescriptor::builtin("str")).with_default("'a`b'"),
            ],
            ret: None,
        });
        let mut lines = vec![":param x: text".to_owned()];
        app.process_docstring(&symbol, &mut lines);
        assert_eq!(lines[0], ":type x: :py:class:`str` (default: ``'a\\`b'``)");
    }

    #[test]
    fn test_existing_fields_kept() {
        let app = app();
        let mut lines = vec![
            ":param x: a number".to_owned(),
            ":type x: manual".to_owned(),
            ":rtype: manual".to_owned(),
        ];
        app.process_docstring(&symbol(), &mut lines);
        assert_eq!(
            lines,
            vec![":param x: a number", ":type x: manual", ":rtype: manual"]
        );
    }

    #[test]
    fn test_undocumented_param_skipped() {
        let app = app();
        let mut lines = vec![":param y: a name".to_owned()];
        app.process_docstring(&symbol(), &mut lines);
        assert_eq!(
            lines,
            vec![
                ":type y: :py:class:`str`",
                ":param y: a name",
                ":rtype: :py:obj:`None`",
            ]
        );
    }

    #[test]
    fn test_formatter_output_preferred() {
        let mut app = app();
        app.set_formatter(|_, _, _| Some("FORMATTED".to_owned()));
        let mut lines = vec![":param y: a name".to_owned()];
        app.process_docstring(&symbol(), &mut lines);
        assert_eq!(lines[0], ":type y: FORMATTED");
        assert_eq!(lines[2], ":rtype: FORMATTED");
    }
}

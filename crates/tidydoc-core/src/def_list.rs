//! Prettier function parameter documentation.
//!
//! Replaces the stock typed-field rendering, which crams name, type, and
//! description into one paragraph line, with a definition list: the name and
//! type become the term, the description becomes the definition body.

use tidydoc_host::{App, ExtensionMetadata, Node, SetupError, TypedFieldItem};

pub const NAME: &str = "tidydoc.definition_list_typed_field";

/// The docstring-preprocessing extension whose output this renderer consumes.
/// It rewrites sectioned docstrings into field lists, so it must run first.
const NAPOLEON: &str = "napoleon";

/// Render one typed field list as a definition list.
#[must_use]
pub fn make_field(label: &str, items: &[TypedFieldItem]) -> Node {
    let items = items
        .iter()
        .map(|item| {
            let mut term = vec![Node::Strong(vec![Node::text(item.name.clone())])];
            if let Some(type_nodes) = &item.type_nodes {
                let classifier = match &type_nodes[..] {
                    [Node::Text(text)] => vec![Node::Emphasis(vec![Node::text(text.clone())])],
                    other => other.to_vec(),
                };
                term.push(Node::text(" "));
                term.push(Node::Classifier(classifier));
            }
            Node::DefinitionListItem {
                term,
                definition: vec![Node::Definition(vec![Node::Paragraph(
                    item.content.clone(),
                )])],
            }
        })
        .collect();
    Node::Field {
        name: label.to_owned(),
        body: vec![Node::DefinitionList {
            classes: vec!["simple".to_owned()],
            items,
        }],
    }
}

/// Register the replacement renderer.
///
/// When the preprocessor is requested it must already be loaded, or its
/// field lists would bypass this renderer.
pub fn setup(app: &mut App) -> Result<ExtensionMetadata, SetupError> {
    if let Some(napoleon) = app.config.extension_position(NAPOLEON) {
        // This extension loads under its own name or via the umbrella one.
        let own = app
            .config
            .extension_position(NAME)
            .or_else(|| app.config.extension_position(crate::NAME));
        match own {
            Some(own) if napoleon < own => {}
            _ => {
                return Err(SetupError::ExtensionOrder {
                    extension: NAME,
                    requirement: NAPOLEON,
                });
            }
        }
    }
    app.set_field_renderer(|label, items| make_field(label, items));
    Ok(crate::metadata())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tidydoc_host::HtmlWriter;

    fn item(name: &str, type_text: Option<&str>) -> TypedFieldItem {
        TypedFieldItem {
            name: name.to_owned(),
            type_nodes: type_text.map(|t| vec![Node::text(t)]),
            content: vec![Node::text("a description")],
        }
    }

    #[test]
    fn test_renders_definition_list() {
        let field = make_field("Parameters", &[item("x", Some("int"))]);
        let Node::Field { name, body } = &field else {
            panic!("expected field");
        };
        assert_eq!(name, "Parameters");
        let Node::DefinitionList { classes, items } = &body[0] else {
            panic!("expected definition list");
        };
        assert_eq!(classes, &["simple"]);
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn test_single_text_type_becomes_classifier_emphasis() {
        let field = make_field("Parameters", &[item("x", Some("int"))]);
        let html = HtmlWriter::render(&[field]);
        assert!(html.contains("<span class=\"classifier\"><em>int</em></span>"));
    }

    #[test]
    fn test_untyped_item_has_no_classifier() {
        let field = make_field("Parameters", &[item("x", None)]);
        let html = HtmlWriter::render(&[field]);
        assert!(!html.contains("classifier"));
    }

    #[test]
    fn test_setup_rejects_late_preprocessor() {
        let mut app = App::new();
        app.config.extensions = vec![NAME.to_owned(), NAPOLEON.to_owned()];
        assert!(matches!(
            setup(&mut app),
            Err(SetupError::ExtensionOrder { .. })
        ));

        let mut app = App::new();
        app.config.extensions = vec![NAPOLEON.to_owned(), NAME.to_owned()];
        setup(&mut app).unwrap();
    }

    #[test]
    fn test_umbrella_position_counts_for_ordering() {
        let mut app = App::new();
        app.config.extensions = vec![NAPOLEON.to_owned(), crate::NAME.to_owned()];
        setup(&mut app).unwrap();

        let mut app = App::new();
        app.config.extensions = vec![crate::NAME.to_owned(), NAPOLEON.to_owned()];
        assert!(matches!(
            setup(&mut app),
            Err(SetupError::ExtensionOrder { .. })
        ));
    }

    #[test]
    fn test_preprocessor_requested_but_not_loaded_errors() {
        let mut app = App::new();
        app.config.extensions = vec![NAPOLEON.to_owned()];
        assert!(matches!(
            setup(&mut app),
            Err(SetupError::ExtensionOrder { .. })
        ));
    }

    #[test]
    fn test_renderer_replaces_stock_rendering() {
        let mut app = App::new();
        setup(&mut app).unwrap();
        let node = app.render_typed_field("Parameters", &[item("x", Some("int"))]);
        let Node::Field { body, .. } = node else {
            panic!("expected field");
        };
        assert!(matches!(body[0], Node::DefinitionList { .. }));
    }
}

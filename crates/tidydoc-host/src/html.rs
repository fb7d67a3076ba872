//! HTML rendering of document tree nodes.

use std::fmt::Write;

use crate::nodes::Node;

/// Renders document trees to HTML fragments.
pub struct HtmlWriter;

impl HtmlWriter {
    /// Render a sequence of nodes.
    #[must_use]
    pub fn render(nodes: &[Node]) -> String {
        let mut output = String::new();
        for node in nodes {
            Self::write_node(&mut output, node);
        }
        output
    }

    fn write_node(output: &mut String, node: &Node) {
        match node {
            Node::Text(text) => output.push_str(&Self::escape_html(text)),
            Node::Raw(markup) => output.push_str(markup),
            Node::Paragraph(children) => Self::write_tag(output, "p", &[], children),
            Node::Strong(children) => Self::write_tag(output, "strong", &[], children),
            Node::Emphasis(children) => Self::write_tag(output, "em", &[], children),
            Node::Inline { classes, children } => {
                Self::write_tag(output, "span", classes, children);
            }
            Node::Classifier(children) => {
                Self::write_tag(output, "span", &["classifier".to_owned()], children);
            }
            Node::Term(children) => Self::write_tag(output, "dt", &[], children),
            Node::Definition(children) => Self::write_tag(output, "dd", &[], children),
            Node::DefinitionListItem { term, definition } => {
                Self::write_tag(output, "dt", &[], term);
                Self::write_tag(output, "dd", &[], definition);
            }
            Node::DefinitionList { classes, items } => {
                Self::write_tag(output, "dl", classes, items);
            }
            Node::Field { name, body } => {
                writeln!(output, "<dt class=\"field-name\">{}</dt>", Self::escape_html(name))
                    .unwrap();
                Self::write_tag(output, "dd", &["field-body".to_owned()], body);
            }
            Node::Target { refid, .. } => {
                writeln!(output, "<span id=\"{}\"></span>", Self::escape_html(refid)).unwrap();
            }
            Node::Section { names, children } => {
                let classes: Vec<String> = names
                    .iter()
                    .map(|n| n.replace([' ', '.'], "-"))
                    .collect();
                write!(output, "<section class=\"{}\">", classes.join(" ")).unwrap();
                for child in children {
                    Self::write_node(output, child);
                }
                output.push_str("</section>\n");
            }
            Node::Title(title) => {
                writeln!(output, "<h2>{}</h2>", Self::escape_html(title)).unwrap();
            }
            Node::Include { path } => {
                writeln!(output, "<!-- include: {} -->", path.display()).unwrap();
            }
        }
    }

    fn write_tag(output: &mut String, tag: &str, classes: &[String], children: &[Node]) {
        if classes.is_empty() {
            write!(output, "<{tag}>").unwrap();
        } else {
            write!(output, "<{tag} class=\"{}\">", classes.join(" ")).unwrap();
        }
        for child in children {
            Self::write_node(output, child);
        }
        write!(output, "</{tag}>").unwrap();
    }

    fn escape_html(text: &str) -> String {
        text.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
            .replace('"', "&quot;")
    }
}

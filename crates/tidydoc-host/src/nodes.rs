//! Document tree nodes produced by roles and directives.
//!
//! This is the subset of the host builder's document model that extensions
//! actually construct: inline markup, definition lists, fields, and the
//! section/target scaffolding that directives emit.

use std::path::PathBuf;

/// One node of the parsed document tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Plain text.
    Text(String),
    /// Raw markup passed through unescaped.
    Raw(String),
    /// A paragraph of inline content.
    Paragraph(Vec<Node>),
    /// Bold inline content.
    Strong(Vec<Node>),
    /// Emphasized inline content.
    Emphasis(Vec<Node>),
    /// Generic inline container with CSS classes.
    Inline {
        classes: Vec<String>,
        children: Vec<Node>,
    },
    /// A classifier attached to a definition-list term.
    Classifier(Vec<Node>),
    /// A definition-list term.
    Term(Vec<Node>),
    /// A definition-list definition body.
    Definition(Vec<Node>),
    /// One term/definition pair of a definition list.
    DefinitionListItem {
        term: Vec<Node>,
        definition: Vec<Node>,
    },
    /// A definition list.
    DefinitionList {
        classes: Vec<String>,
        items: Vec<Node>,
    },
    /// A docinfo-style field with a name and a body.
    Field { name: String, body: Vec<Node> },
    /// A link target.
    Target {
        refid: String,
        names: Vec<String>,
    },
    /// A document section.
    Section {
        names: Vec<String>,
        children: Vec<Node>,
    },
    /// A section title.
    Title(String),
    /// An instruction to splice another source file in place.
    Include { path: PathBuf },
}

/// One entry of a typed field list, e.g. a documented parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypedFieldItem {
    /// The documented name.
    pub name: String,
    /// Rendered type annotation, if the field list carries one.
    pub type_nodes: Option<Vec<Node>>,
    /// The description body.
    pub content: Vec<Node>,
}

impl Node {
    /// A plain text node.
    #[must_use]
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text(content.into())
    }

    /// An inline container with a single class.
    #[must_use]
    pub fn inline(class: &str, children: Vec<Node>) -> Self {
        Self::Inline {
            classes: vec![class.to_owned()],
            children,
        }
    }

    /// The concatenated plain text of this node and its descendants.
    #[must_use]
    pub fn as_text(&self) -> String {
        match self {
            Self::Text(s) | Self::Raw(s) | Self::Title(s) => s.clone(),
            Self::Paragraph(children)
            | Self::Strong(children)
            | Self::Emphasis(children)
            | Self::Classifier(children)
            | Self::Term(children)
            | Self::Definition(children)
            | Self::Inline { children, .. } => {
                children.iter().map(Node::as_text).collect()
            }
            Self::DefinitionListItem { term, definition } => {
                let mut out: String = term.iter().map(Node::as_text).collect();
                out.push_str(&definition.iter().map(Node::as_text).collect::<String>());
                out
            }
            Self::DefinitionList { items, .. } => items.iter().map(Node::as_text).collect(),
            Self::Field { body, .. } => body.iter().map(Node::as_text).collect(),
            Self::Section { children, .. } => children.iter().map(Node::as_text).collect(),
            Self::Target { .. } | Self::Include { .. } => String::new(),
        }
    }
}

//! The host application object extensions register themselves on.
//!
//! Extensions connect hooks, contribute roles and directives, and at most one
//! of them claims the annotation-formatter slot. The application drives the
//! hooks at the corresponding build phases.

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::config::Config;
use crate::descriptor::TypeDescriptor;
use crate::error::{DirectiveError, SetupError};
use crate::nodes::{Node, TypedFieldItem};
use crate::symbol::DocSymbol;

/// Where in a signature an annotation is being rendered.
///
/// The formatter is told its render site explicitly; it never inspects its
/// caller to find out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatSite {
    /// A parameter annotation in a signature or field list.
    Parameter,
    /// A return annotation.
    Return,
    /// An annotation nested inside another annotation.
    Nested,
}

/// What an extension's setup function reports back to the application.
#[derive(Debug, Clone)]
pub struct ExtensionMetadata {
    /// The extension's own version.
    pub version: String,
    /// Version of the data the extension stores in the build environment.
    pub env_version: u32,
    /// Whether documents may be read in parallel with this extension active.
    pub parallel_read_safe: bool,
    /// Whether documents may be written in parallel.
    pub parallel_write_safe: bool,
}

impl Default for ExtensionMetadata {
    fn default() -> Self {
        Self {
            version: String::new(),
            env_version: 1,
            parallel_read_safe: true,
            parallel_write_safe: true,
        }
    }
}

/// Context handed to a directive when it runs.
#[derive(Debug, Clone)]
pub struct DirectiveContext {
    /// The directive's positional arguments.
    pub arguments: Vec<String>,
    /// Path of the source document the directive appears in.
    pub source_file: PathBuf,
    /// Line offset of the directive content within the source document.
    pub content_offset: usize,
}

/// A markup directive contributed by an extension.
pub trait Directive {
    /// Run the directive, producing nodes to splice into the document.
    fn run(&self, ctx: &DirectiveContext) -> Result<Vec<Node>, DirectiveError>;
}

type ConfigInitedHook = Box<dyn Fn(&mut Config) -> Result<(), SetupError>>;
type DocstringHook = Box<dyn Fn(&App, &DocSymbol, &mut Vec<String>)>;
type FormatterFn = Box<dyn Fn(&TypeDescriptor, &Config, FormatSite) -> Option<String>>;
type FieldRenderer = Box<dyn Fn(&str, &[TypedFieldItem]) -> Node>;
type RoleFn = Box<dyn Fn(&str) -> Node>;

/// The application object.
pub struct App {
    /// The configuration store.
    pub config: Config,
    config_inited: Vec<ConfigInitedHook>,
    docstring_hooks: Vec<DocstringHook>,
    formatter: Option<FormatterFn>,
    field_renderer: Option<FieldRenderer>,
    roles: BTreeMap<String, RoleFn>,
    directives: BTreeMap<String, Box<dyn Directive>>,
    themes: BTreeMap<String, PathBuf>,
    css_files: Vec<String>,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: Config::new(),
            config_inited: Vec::new(),
            docstring_hooks: Vec::new(),
            formatter: None,
            field_renderer: None,
            roles: BTreeMap::new(),
            directives: BTreeMap::new(),
            themes: BTreeMap::new(),
            css_files: Vec::new(),
        }
    }

    /// Connect a hook that runs once the configuration is fully initialized.
    pub fn on_config_inited(
        &mut self,
        hook: impl Fn(&mut Config) -> Result<(), SetupError> + 'static,
    ) {
        self.config_inited.push(Box::new(hook));
    }

    /// Connect a hook that post-processes each symbol's docstring lines.
    pub fn on_process_docstring(
        &mut self,
        hook: impl Fn(&App, &DocSymbol, &mut Vec<String>) + 'static,
    ) {
        self.docstring_hooks.push(Box::new(hook));
    }

    /// Claim the annotation-formatter slot.
    ///
    /// At most one formatter is active; a later claim replaces an earlier one.
    pub fn set_formatter(
        &mut self,
        formatter: impl Fn(&TypeDescriptor, &Config, FormatSite) -> Option<String> + 'static,
    ) {
        self.formatter = Some(Box::new(formatter));
    }

    /// Replace the typed-field renderer.
    pub fn set_field_renderer(
        &mut self,
        renderer: impl Fn(&str, &[TypedFieldItem]) -> Node + 'static,
    ) {
        self.field_renderer = Some(Box::new(renderer));
    }

    /// Register an inline role.
    pub fn add_role(&mut self, name: &str, role: impl Fn(&str) -> Node + 'static) {
        self.roles.insert(name.to_owned(), Box::new(role));
    }

    /// Register a directive.
    pub fn add_directive(&mut self, name: &str, directive: impl Directive + 'static) {
        self.directives.insert(name.to_owned(), Box::new(directive));
    }

    /// Register an HTML theme by name and path.
    pub fn add_html_theme(&mut self, name: &str, path: PathBuf) {
        self.themes.insert(name.to_owned(), path);
    }

    /// Add a stylesheet to every rendered page.
    pub fn add_css_file(&mut self, filename: &str) {
        self.css_files.push(filename.to_owned());
    }

    /// Path of a registered theme.
    #[must_use]
    pub fn theme_path(&self, name: &str) -> Option<&PathBuf> {
        self.themes.get(name)
    }

    /// Registered stylesheets in registration order.
    #[must_use]
    pub fn css_files(&self) -> &[String] {
        &self.css_files
    }

    /// Whether a role of this name is registered.
    #[must_use]
    pub fn has_role(&self, name: &str) -> bool {
        self.roles.contains_key(name)
    }

    /// Run all config-inited hooks.
    ///
    /// Called once, after user configuration has been applied. The first
    /// failing hook aborts the build.
    pub fn init(&mut self) -> Result<(), SetupError> {
        for hook in &self.config_inited {
            hook(&mut self.config)?;
        }
        Ok(())
    }

    /// Run every docstring hook over a symbol's docstring lines, in
    /// registration order.
    pub fn process_docstring(&self, symbol: &DocSymbol, lines: &mut Vec<String>) {
        for hook in &self.docstring_hooks {
            hook(self, symbol, lines);
        }
    }

    /// Render an annotation through the formatter slot.
    ///
    /// `None` means no formatter is active or the formatter declined, and the
    /// application falls back to its stock rendering.
    #[must_use]
    pub fn format_annotation(&self, annotation: &TypeDescriptor, site: FormatSite) -> Option<String> {
        self.formatter.as_ref()?(annotation, &self.config, site)
    }

    /// Render a typed field list.
    ///
    /// Without a replacement renderer, each entry becomes a one-line
    /// paragraph of the form `name (type) – description`.
    #[must_use]
    pub fn render_typed_field(&self, label: &str, items: &[TypedFieldItem]) -> Node {
        if let Some(renderer) = &self.field_renderer {
            return renderer(label, items);
        }
        let body = items
            .iter()
            .map(|item| {
                let mut children = vec![Node::Strong(vec![Node::text(item.name.clone())])];
                if let Some(type_nodes) = &item.type_nodes {
                    children.push(Node::text(" ("));
                    children.extend(type_nodes.iter().cloned());
                    children.push(Node::text(")"));
                }
                children.push(Node::text(" – "));
                children.extend(item.content.iter().cloned());
                Node::Paragraph(children)
            })
            .collect();
        Node::Field {
            name: label.to_owned(),
            body,
        }
    }

    /// Render an inline role over raw text.
    #[must_use]
    pub fn render_role(&self, name: &str, text: &str) -> Option<Node> {
        Some(self.roles.get(name)?(text))
    }

    /// Run a registered directive.
    pub fn run_directive(
        &self,
        name: &str,
        ctx: &DirectiveContext,
    ) -> Result<Vec<Node>, DirectiveError> {
        let directive = self
            .directives
            .get(name)
            .ok_or_else(|| DirectiveError::Message(format!("unknown directive '{name}'")))?;
        directive.run(ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use crate::config::Rebuild;

    #[test]
    fn test_init_runs_hooks_in_order() {
        let mut app = App::new();
        app.on_config_inited(|config| {
            config.add_value("first", json!(1), Rebuild::None);
            Ok(())
        });
        app.on_config_inited(|config| {
            assert!(config.has_value("first"));
            config.add_value("second", json!(2), Rebuild::None);
            Ok(())
        });
        app.init().unwrap();
        assert!(app.config.has_value("second"));
    }

    #[test]
    fn test_init_stops_on_error() {
        let mut app = App::new();
        app.on_config_inited(|_| Err(SetupError::Config("boom".into())));
        app.on_config_inited(|config| {
            config.add_value("later", json!(0), Rebuild::None);
            Ok(())
        });
        assert!(app.init().is_err());
        assert!(!app.config.has_value("later"));
    }

    #[test]
    fn test_formatter_slot_replacement() {
        let mut app = App::new();
        app.set_formatter(|_, _, _| Some("one".into()));
        app.set_formatter(|_, _, _| Some("two".into()));
        let annot = TypeDescriptor::builtin("str");
        assert_eq!(
            app.format_annotation(&annot, FormatSite::Parameter).as_deref(),
            Some("two")
        );
    }

    #[test]
    fn test_no_formatter_means_fallback() {
        let app = App::new();
        let annot = TypeDescriptor::builtin("str");
        assert!(app.format_annotation(&annot, FormatSite::Return).is_none());
    }

    #[test]
    fn test_unknown_directive_errors() {
        let app = App::new();
        let ctx = DirectiveContext {
            arguments: vec![],
            source_file: PathBuf::from("index.rst"),
            content_offset: 0,
        };
        assert!(app.run_directive("release-notes", &ctx).is_err());
    }
}

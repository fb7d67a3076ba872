//! Typed model of the host documentation builder's extension API.
//!
//! Plugins in `tidydoc-core` are written against this crate: an [`App`] they
//! register on, a [`Config`] store, a structural [`TypeDescriptor`] for
//! annotations, and the document-tree [`Node`]s their roles and directives
//! produce.

pub mod app;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod html;
pub mod nodes;
pub mod symbol;

pub use app::{App, Directive, DirectiveContext, ExtensionMetadata, FormatSite};
pub use config::{Config, Rebuild};
pub use descriptor::{ClassRef, LiteralValue, TypeDescriptor};
pub use error::{DirectiveError, SetupError};
pub use html::HtmlWriter;
pub use nodes::{Node, TypedFieldItem};
pub use symbol::{DocSymbol, Param, Signature, SymbolKind};

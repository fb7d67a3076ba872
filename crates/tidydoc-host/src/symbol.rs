//! Documented-symbol descriptions handed to docstring hooks.

use crate::descriptor::TypeDescriptor;

/// The kind of symbol being documented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Module,
    Class,
    Exception,
    Function,
    Method,
    Attribute,
    Property,
}

impl SymbolKind {
    /// Whether symbols of this kind carry a call signature.
    #[must_use]
    pub fn is_callable(self) -> bool {
        matches!(
            self,
            Self::Function | Self::Method | Self::Class | Self::Exception
        )
    }
}

/// One parameter of a documented callable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    /// Parameter name.
    pub name: String,
    /// Declared annotation, if any.
    pub annotation: Option<TypeDescriptor>,
    /// Literal representation of the declared default value, if any.
    pub default: Option<String>,
}

impl Param {
    /// A parameter with an annotation and no default.
    #[must_use]
    pub fn new(name: impl Into<String>, annotation: TypeDescriptor) -> Self {
        Self {
            name: name.into(),
            annotation: Some(annotation),
            default: None,
        }
    }

    /// Attach a default-value representation.
    #[must_use]
    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }
}

/// The reflected call signature of a documented symbol.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Signature {
    /// Parameters in declaration order.
    pub params: Vec<Param>,
    /// Return annotation, if declared.
    pub ret: Option<TypeDescriptor>,
}

/// A symbol as seen by the docstring-processing pass.
#[derive(Debug, Clone)]
pub struct DocSymbol {
    /// Symbol kind.
    pub kind: SymbolKind,
    /// Fully qualified symbol name.
    pub name: String,
    /// Call signature, when the symbol is callable.
    pub signature: Option<Signature>,
}

impl DocSymbol {
    /// Create a symbol without a signature.
    #[must_use]
    pub fn new(kind: SymbolKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            signature: None,
        }
    }

    /// Attach a call signature.
    #[must_use]
    pub fn with_signature(mut self, signature: Signature) -> Self {
        self.signature = Some(signature);
        self
    }
}

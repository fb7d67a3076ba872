//! Structural representation of type annotations.
//!
//! The host tool's reflection layer normalizes whatever annotation object it
//! encounters into a [`TypeDescriptor`] before handing it to a formatter, so
//! formatters dispatch on an explicit shape enumeration instead of poking at
//! reflection attributes.

use std::fmt;

/// A reference to a named class in the documented language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassRef {
    /// Module the class is defined in (as reflection sees it).
    pub module: String,
    /// Qualified name within the module.
    pub qualname: String,
    /// Whether the class subclasses the language's base exception type.
    pub is_exception: bool,
}

impl ClassRef {
    /// Create a reference to an ordinary class.
    #[must_use]
    pub fn new(module: impl Into<String>, qualname: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            qualname: qualname.into(),
            is_exception: false,
        }
    }

    /// Create a reference to an exception class.
    #[must_use]
    pub fn exception(module: impl Into<String>, qualname: impl Into<String>) -> Self {
        Self {
            is_exception: true,
            ..Self::new(module, qualname)
        }
    }

    /// The dotted path uniquely identifying this class.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{}.{}", self.module, self.qualname)
    }

    /// Whether the class lives in the language's builtin namespace.
    #[must_use]
    pub fn is_builtin(&self) -> bool {
        self.module == "builtins"
    }

    /// Whether the class lives in the standard typing namespaces.
    #[must_use]
    pub fn is_typing(&self) -> bool {
        matches!(self.module.as_str(), "typing" | "types")
    }

    /// Whether this is the builtin `None` singleton type.
    #[must_use]
    pub fn is_none(&self) -> bool {
        self.is_builtin() && self.qualname == "None"
    }

    /// Whether this is the concrete builtin `dict` class.
    #[must_use]
    pub fn is_dict(&self) -> bool {
        self.is_builtin() && self.qualname == "dict"
    }

    /// Whether this is the concrete builtin `tuple` class.
    #[must_use]
    pub fn is_tuple(&self) -> bool {
        self.is_builtin() && self.qualname == "tuple"
    }

    /// Whether this is the abstract argument-erased mapping type.
    #[must_use]
    pub fn is_abstract_mapping(&self) -> bool {
        matches!(
            self.full_name().as_str(),
            "collections.abc.Mapping" | "typing.Mapping"
        )
    }
}

/// A literal value inside a `Literal[...]` annotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LiteralValue {
    /// A string literal.
    Str(String),
    /// An integer literal.
    Int(i64),
    /// A boolean literal.
    Bool(bool),
    /// The none singleton.
    None,
}

impl fmt::Display for LiteralValue {
    /// Renders the value with the documented language's literal syntax.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => write!(f, "'{s}'"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Bool(true) => write!(f, "True"),
            Self::Bool(false) => write!(f, "False"),
            Self::None => write!(f, "None"),
        }
    }
}

/// A structural description of a type annotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeDescriptor {
    /// A plain named class.
    Class(ClassRef),
    /// A parametrized generic, e.g. `dict[str, int]`.
    Generic {
        /// The unparametrized generic root.
        origin: ClassRef,
        /// The generic arguments.
        args: Vec<TypeDescriptor>,
    },
    /// A union of several types.
    Union(Vec<TypeDescriptor>),
    /// A literal/enum-like set of values.
    Literal(Vec<LiteralValue>),
    /// A callable signature.
    Callable {
        /// The parameter types; `None` encodes a variadic/unknown list.
        params: Option<Vec<TypeDescriptor>>,
        /// The return type.
        ret: Box<TypeDescriptor>,
    },
    /// A named type alias together with its underlying value type.
    Alias {
        /// The alias's own name.
        name: ClassRef,
        /// The aliased type.
        value: Box<TypeDescriptor>,
    },
}

impl TypeDescriptor {
    /// A plain class annotation.
    #[must_use]
    pub fn class(module: &str, qualname: &str) -> Self {
        Self::Class(ClassRef::new(module, qualname))
    }

    /// A builtin class annotation such as `int` or `str`.
    #[must_use]
    pub fn builtin(qualname: &str) -> Self {
        Self::class("builtins", qualname)
    }

    /// The builtin `None` annotation.
    #[must_use]
    pub fn none() -> Self {
        Self::builtin("None")
    }

    /// An exception class annotation.
    #[must_use]
    pub fn exception(module: &str, qualname: &str) -> Self {
        Self::Class(ClassRef::exception(module, qualname))
    }

    /// A parametrized generic annotation.
    #[must_use]
    pub fn generic(origin: ClassRef, args: Vec<TypeDescriptor>) -> Self {
        Self::Generic { origin, args }
    }

    /// A concrete `dict[key, value]` annotation.
    #[must_use]
    pub fn dict(key: TypeDescriptor, value: TypeDescriptor) -> Self {
        Self::generic(ClassRef::new("builtins", "dict"), vec![key, value])
    }

    /// A `tuple[...]` annotation.
    #[must_use]
    pub fn tuple_of(args: Vec<TypeDescriptor>) -> Self {
        Self::generic(ClassRef::new("builtins", "tuple"), args)
    }

    /// An abstract `Mapping[key, value]` annotation.
    #[must_use]
    pub fn mapping(args: Vec<TypeDescriptor>) -> Self {
        Self::generic(ClassRef::new("collections.abc", "Mapping"), args)
    }

    /// A union annotation.
    #[must_use]
    pub fn union(members: Vec<TypeDescriptor>) -> Self {
        Self::Union(members)
    }

    /// An optional annotation, i.e. a union with `None`.
    #[must_use]
    pub fn optional(inner: TypeDescriptor) -> Self {
        Self::Union(vec![inner, Self::none()])
    }

    /// A callable annotation with a known parameter list.
    #[must_use]
    pub fn callable(params: Vec<TypeDescriptor>, ret: TypeDescriptor) -> Self {
        Self::Callable {
            params: Some(params),
            ret: Box::new(ret),
        }
    }

    /// A callable annotation with a variadic/unknown parameter list.
    #[must_use]
    pub fn callable_variadic(ret: TypeDescriptor) -> Self {
        Self::Callable {
            params: None,
            ret: Box::new(ret),
        }
    }

    /// A literal-set annotation.
    #[must_use]
    pub fn literal(values: Vec<LiteralValue>) -> Self {
        Self::Literal(values)
    }

    /// A type-alias annotation.
    #[must_use]
    pub fn alias(name: ClassRef, value: TypeDescriptor) -> Self {
        Self::Alias {
            name,
            value: Box::new(value),
        }
    }

    /// The named class this annotation refers to, if any.
    ///
    /// For generics this is the origin; unions, literals and callables have
    /// no single class.
    #[must_use]
    pub fn class_ref(&self) -> Option<&ClassRef> {
        match self {
            Self::Class(class) => Some(class),
            Self::Generic { origin, .. } => Some(origin),
            Self::Alias { name, .. } => Some(name),
            _ => None,
        }
    }
}

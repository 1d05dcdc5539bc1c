use std::fmt;

/// Word-level type of an expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    Bool,
    /// Unsigned bit-vector of the given width.
    Unsigned(u32),
    /// Two's-complement bit-vector of the given width.
    Signed(u32),
    /// Mathematical integer.
    Integer,
    /// Mathematical natural number.
    Natural,
    Array {
        element: Box<Type>,
        size: u64,
    },
    /// Reference to a type declared in the symbol table.
    Named(String),
}

impl Type {
    pub fn array(element: Type, size: u64) -> Self {
        Type::Array {
            element: Box::new(element),
            size,
        }
    }

    pub fn named(identifier: impl Into<String>) -> Self {
        Type::Named(identifier.into())
    }

    pub fn is_bool(&self) -> bool {
        matches!(self, Type::Bool)
    }

    /// Bit width for bit-vector types.
    pub fn width(&self) -> Option<u32> {
        match self {
            Type::Unsigned(w) | Type::Signed(w) => Some(*w),
            _ => None,
        }
    }

    pub fn is_signed(&self) -> bool {
        matches!(self, Type::Signed(_) | Type::Integer)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Bool => write!(f, "bool"),
            Type::Unsigned(w) => write!(f, "unsigned[{w}]"),
            Type::Signed(w) => write!(f, "signed[{w}]"),
            Type::Integer => write!(f, "integer"),
            Type::Natural => write!(f, "natural"),
            Type::Array { element, size } => write!(f, "{element}[{size}]"),
            Type::Named(id) => write!(f, "{id}"),
        }
    }
}

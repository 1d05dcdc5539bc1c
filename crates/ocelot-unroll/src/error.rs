use ocelot_ir::symbols::SymbolError;
use ocelot_ir::types::Type;
use thiserror::Error;

/// Errors raised while instantiating a property. All of them abort the call;
/// no partial result is returned.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InstantiationError {
    #[error("{what} must be a constant, found '{found}'")]
    NonConstantOffset { what: &'static str, found: String },
    #[error("{what} must not be negative, found {value}")]
    NegativeOffset { what: &'static str, value: String },
    #[error("Empty range [{lower}:{upper}] in {what}")]
    EmptyRange {
        what: &'static str,
        lower: String,
        upper: String,
    },
    #[error("Unsupported: {0}")]
    Unsupported(&'static str),
    #[error("Type '{0}' has no default value")]
    NoDefaultValue(Type),
    #[error(transparent)]
    UnknownType(#[from] SymbolError),
    #[error("Identifier '{identifier}' is already instantiated")]
    ReservedSeparator { identifier: String },
    #[error("Bound must be at least one timeframe")]
    EmptyHorizon,
    #[error("Operator '{0}' should have been removed by normalization")]
    Unnormalized(&'static str),
}

impl InstantiationError {
    /// Internal consistency faults, as opposed to malformed or unsupported
    /// input.
    pub fn is_internal(&self) -> bool {
        matches!(self, InstantiationError::Unnormalized(_))
    }
}

pub type Result<T> = std::result::Result<T, InstantiationError>;

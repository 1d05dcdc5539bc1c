use indexmap::IndexMap;
use thiserror::Error;

use crate::types::Type;

/// What a symbol table entry stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    /// Register; carried from one timeframe to the next.
    State,
    /// Free input, unconstrained in every timeframe.
    Input,
    /// Combinational signal.
    Wire,
    /// Type declaration (`typedef`).
    Type,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub name: String,
    pub ty: Type,
    pub kind: SymbolKind,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SymbolError {
    #[error("Unknown type '{0}'")]
    UnknownType(String),
    #[error("Type '{0}' is defined in terms of itself")]
    CyclicType(String),
}

/// Declaration-ordered symbol table.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    symbols: IndexMap<String, Symbol>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn declare(&mut self, name: impl Into<String>, ty: Type, kind: SymbolKind) {
        let name = name.into();
        self.symbols.insert(
            name.clone(),
            Symbol {
                name,
                ty,
                kind,
            },
        );
    }

    pub fn declare_state(&mut self, name: impl Into<String>, ty: Type) {
        self.declare(name, ty, SymbolKind::State);
    }

    pub fn declare_input(&mut self, name: impl Into<String>, ty: Type) {
        self.declare(name, ty, SymbolKind::Input);
    }

    pub fn declare_wire(&mut self, name: impl Into<String>, ty: Type) {
        self.declare(name, ty, SymbolKind::Wire);
    }

    /// Declares `name` as an alias for `ty`.
    pub fn declare_type(&mut self, name: impl Into<String>, ty: Type) {
        self.declare(name, ty, SymbolKind::Type);
    }

    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        self.symbols.get(name)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.values()
    }

    pub fn state_variables(&self) -> impl Iterator<Item = &Symbol> {
        self.iter().filter(|s| s.kind == SymbolKind::State)
    }

    pub fn inputs(&self) -> impl Iterator<Item = &Symbol> {
        self.iter().filter(|s| s.kind == SymbolKind::Input)
    }

    /// Follows `Named` references until a structural type is reached.
    ///
    /// Array element types are resolved as well.
    pub fn resolve_type(&self, ty: &Type) -> Result<Type, SymbolError> {
        let mut seen: Vec<&str> = Vec::new();
        let mut current = ty;
        loop {
            match current {
                Type::Named(id) => {
                    if seen.contains(&id.as_str()) {
                        return Err(SymbolError::CyclicType(id.clone()));
                    }
                    seen.push(id);
                    current = match self.symbols.get(id) {
                        Some(sym) if sym.kind == SymbolKind::Type => &sym.ty,
                        _ => return Err(SymbolError::UnknownType(id.clone())),
                    };
                }
                Type::Array { element, size } => {
                    return Ok(Type::array(self.resolve_type(element)?, *size));
                }
                other => return Ok(other.clone()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_follows_alias_chain() {
        let mut table = SymbolTable::new();
        table.declare_type("byte_t", Type::Unsigned(8));
        table.declare_type("octet_t", Type::named("byte_t"));
        assert_eq!(
            table.resolve_type(&Type::named("octet_t")),
            Ok(Type::Unsigned(8))
        );
        assert_eq!(
            table.resolve_type(&Type::array(Type::named("octet_t"), 4)),
            Ok(Type::array(Type::Unsigned(8), 4))
        );
    }

    #[test]
    fn resolve_reports_unknown_and_cyclic_types() {
        let mut table = SymbolTable::new();
        table.declare_type("a_t", Type::named("b_t"));
        table.declare_type("b_t", Type::named("a_t"));
        table.declare_state("x", Type::Bool);
        assert!(matches!(
            table.resolve_type(&Type::named("a_t")),
            Err(SymbolError::CyclicType(_))
        ));
        assert_eq!(
            table.resolve_type(&Type::named("nope")),
            Err(SymbolError::UnknownType("nope".into()))
        );
        // a variable is not a type
        assert_eq!(
            table.resolve_type(&Type::named("x")),
            Err(SymbolError::UnknownType("x".into()))
        );
    }

    #[test]
    fn filters_keep_declaration_order() {
        let mut table = SymbolTable::new();
        table.declare_state("s1", Type::Bool);
        table.declare_input("i", Type::Bool);
        table.declare_state("s0", Type::Unsigned(4));
        let states: Vec<_> = table.state_variables().map(|s| s.name.as_str()).collect();
        assert_eq!(states, vec!["s1", "s0"]);
        assert_eq!(table.inputs().count(), 1);
        assert_eq!(table.len(), 3);
    }
}

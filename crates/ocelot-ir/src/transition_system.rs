use crate::expr::Expr;
use crate::symbols::{SymbolKind, SymbolTable};

/// A hardware design after elaboration.
///
/// `init` constrains timeframe 0; `trans` relates the current state to the
/// next one through next-state symbols.
#[derive(Debug, Clone)]
pub struct TransitionSystem {
    pub symbols: SymbolTable,
    pub init: Expr,
    pub trans: Expr,
}

impl TransitionSystem {
    pub fn new(symbols: SymbolTable, init: Expr, trans: Expr) -> Self {
        Self {
            symbols,
            init,
            trans,
        }
    }

    /// State variables as symbol expressions, in declaration order.
    pub fn state_variables(&self) -> Vec<Expr> {
        self.symbols_of_kind(SymbolKind::State)
    }

    pub fn inputs(&self) -> Vec<Expr> {
        self.symbols_of_kind(SymbolKind::Input)
    }

    fn symbols_of_kind(&self, kind: SymbolKind) -> Vec<Expr> {
        self.symbols
            .iter()
            .filter(|s| s.kind == kind)
            .map(|s| Expr::symbol(s.name.clone(), s.ty.clone()))
            .collect()
    }
}

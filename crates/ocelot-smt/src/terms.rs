use num::{BigInt, BigUint};

/// Bit-vector binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BvOp {
    Add,
    Sub,
    Mul,
    And,
    Or,
    Xor,
}

/// Bit-vector comparisons; the signedness is carried by the term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BvCmp {
    Lt,
    Le,
    Gt,
    Ge,
}

/// Abstract SMT term representation, solver-agnostic.
#[derive(Debug, Clone, PartialEq)]
pub enum SmtTerm {
    /// Variable reference by name.
    Var(String),
    /// Integer literal.
    IntLit(BigInt),
    /// Boolean literal.
    BoolLit(bool),
    /// Bit-vector literal; `value` is below `2^width`.
    BvLit { value: BigUint, width: u32 },

    // Integer arithmetic
    Add(Box<SmtTerm>, Box<SmtTerm>),
    Sub(Box<SmtTerm>, Box<SmtTerm>),
    Mul(Box<SmtTerm>, Box<SmtTerm>),

    // Comparison
    Eq(Box<SmtTerm>, Box<SmtTerm>),
    Lt(Box<SmtTerm>, Box<SmtTerm>),
    Le(Box<SmtTerm>, Box<SmtTerm>),
    Gt(Box<SmtTerm>, Box<SmtTerm>),
    Ge(Box<SmtTerm>, Box<SmtTerm>),

    // Boolean logic
    And(Vec<SmtTerm>),
    Or(Vec<SmtTerm>),
    Not(Box<SmtTerm>),
    Xor(Box<SmtTerm>, Box<SmtTerm>),
    Implies(Box<SmtTerm>, Box<SmtTerm>),

    // Bit-vectors
    BvBinary(BvOp, Box<SmtTerm>, Box<SmtTerm>),
    BvNeg(Box<SmtTerm>),
    BvNot(Box<SmtTerm>),
    BvCompare {
        op: BvCmp,
        signed: bool,
        lhs: Box<SmtTerm>,
        rhs: Box<SmtTerm>,
    },

    // If-then-else
    Ite(Box<SmtTerm>, Box<SmtTerm>, Box<SmtTerm>),
}

#[allow(clippy::should_implement_trait)]
impl SmtTerm {
    pub fn var(name: impl Into<String>) -> Self {
        SmtTerm::Var(name.into())
    }

    pub fn int(n: impl Into<BigInt>) -> Self {
        SmtTerm::IntLit(n.into())
    }

    pub fn bool(b: bool) -> Self {
        SmtTerm::BoolLit(b)
    }

    pub fn bv(value: impl Into<BigUint>, width: u32) -> Self {
        SmtTerm::BvLit {
            value: value.into(),
            width,
        }
    }

    pub fn add(self, other: SmtTerm) -> Self {
        SmtTerm::Add(Box::new(self), Box::new(other))
    }

    pub fn sub(self, other: SmtTerm) -> Self {
        SmtTerm::Sub(Box::new(self), Box::new(other))
    }

    pub fn mul(self, other: SmtTerm) -> Self {
        SmtTerm::Mul(Box::new(self), Box::new(other))
    }

    pub fn eq(self, other: SmtTerm) -> Self {
        SmtTerm::Eq(Box::new(self), Box::new(other))
    }

    pub fn lt(self, other: SmtTerm) -> Self {
        SmtTerm::Lt(Box::new(self), Box::new(other))
    }

    pub fn le(self, other: SmtTerm) -> Self {
        SmtTerm::Le(Box::new(self), Box::new(other))
    }

    pub fn gt(self, other: SmtTerm) -> Self {
        SmtTerm::Gt(Box::new(self), Box::new(other))
    }

    pub fn ge(self, other: SmtTerm) -> Self {
        SmtTerm::Ge(Box::new(self), Box::new(other))
    }

    pub fn and(terms: Vec<SmtTerm>) -> Self {
        SmtTerm::And(terms)
    }

    pub fn or(terms: Vec<SmtTerm>) -> Self {
        SmtTerm::Or(terms)
    }

    pub fn not(self) -> Self {
        SmtTerm::Not(Box::new(self))
    }

    pub fn xor(self, other: SmtTerm) -> Self {
        SmtTerm::Xor(Box::new(self), Box::new(other))
    }

    pub fn implies(self, other: SmtTerm) -> Self {
        SmtTerm::Implies(Box::new(self), Box::new(other))
    }

    pub fn ite(self, then_term: SmtTerm, else_term: SmtTerm) -> Self {
        SmtTerm::Ite(Box::new(self), Box::new(then_term), Box::new(else_term))
    }

    pub fn bv_binary(op: BvOp, lhs: SmtTerm, rhs: SmtTerm) -> Self {
        SmtTerm::BvBinary(op, Box::new(lhs), Box::new(rhs))
    }

    pub fn bv_neg(self) -> Self {
        SmtTerm::BvNeg(Box::new(self))
    }

    pub fn bv_not(self) -> Self {
        SmtTerm::BvNot(Box::new(self))
    }

    pub fn bv_compare(op: BvCmp, signed: bool, lhs: SmtTerm, rhs: SmtTerm) -> Self {
        SmtTerm::BvCompare {
            op,
            signed,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }
}

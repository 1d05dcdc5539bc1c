//! Lowering of flat expressions to SMT terms.
//!
//! Types map to sorts as follows: `bool` to `Bool`, signed and unsigned
//! bit-vectors to `(_ BitVec w)`, integers and naturals to `Int`. Arrays are
//! not supported.

mod canonical;

use std::collections::HashSet;

use num::traits::{One, Zero};
use num::BigInt;
use ocelot_ir::expr::{Expr, ExprKind, Op};
use ocelot_ir::symbols::{SymbolError, SymbolTable};
use ocelot_ir::types::Type;
use thiserror::Error;

use crate::sorts::SmtSort;
use crate::terms::{BvCmp, BvOp, SmtTerm};

use canonical::canonical_term_key;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EncodeError {
    #[error("Cannot encode '{0}': expression is not instantiated")]
    NotFlat(&'static str),
    #[error("Unsupported type '{0}'")]
    UnsupportedType(Type),
    #[error("Constant {value} does not fit type '{ty}'")]
    ConstantOutOfRange { value: String, ty: Type },
    #[error("Operator '{op}' expects {expected} operands, found {found}")]
    Arity {
        op: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("Operator '{op}' is not defined on sort {sort}")]
    SortMismatch { op: &'static str, sort: SmtSort },
    #[error(transparent)]
    Symbol(#[from] SymbolError),
}

/// Declarations and deduplicated assertions of one unrolling.
#[derive(Debug, Clone, Default)]
pub struct Encoding {
    /// Variable declarations: (name, sort), in first-use order.
    pub declarations: Vec<(String, SmtSort)>,
    /// Assertions (constraints).
    pub assertions: Vec<SmtTerm>,
    declared: HashSet<String>,
    assertion_keys: HashSet<String>,
    assertion_candidates: usize,
    assertion_dedup_hits: usize,
}

impl Encoding {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` if `name` was already declared.
    pub fn declare(&mut self, name: String, sort: SmtSort) -> bool {
        if !self.declared.insert(name.clone()) {
            return false;
        }
        self.declarations.push((name, sort));
        true
    }

    pub fn assert_term(&mut self, term: SmtTerm) {
        self.assertion_candidates = self.assertion_candidates.saturating_add(1);
        let key = canonical_term_key(&term);
        if self.assertion_keys.insert(key) {
            self.assertions.push(term);
        } else {
            self.assertion_dedup_hits = self.assertion_dedup_hits.saturating_add(1);
        }
    }

    pub fn assertion_candidates(&self) -> usize {
        self.assertion_candidates
    }

    pub fn assertion_unique(&self) -> usize {
        self.assertions.len()
    }

    pub fn assertion_dedup_hits(&self) -> usize {
        self.assertion_dedup_hits
    }
}

/// Encodes flat expressions, declaring every variable it meets.
pub struct ExprEncoder<'a> {
    symbols: &'a SymbolTable,
    encoding: Encoding,
}

fn arity(op: Op, operands: &[Expr], expected: usize) -> Result<(), EncodeError> {
    if operands.len() != expected {
        return Err(EncodeError::Arity {
            op: op.symbol(),
            expected,
            found: operands.len(),
        });
    }
    Ok(())
}

fn at_least(op: Op, operands: &[Expr], expected: usize) -> Result<(), EncodeError> {
    if operands.len() < expected {
        return Err(EncodeError::Arity {
            op: op.symbol(),
            expected,
            found: operands.len(),
        });
    }
    Ok(())
}

fn fold(terms: Vec<SmtTerm>, f: impl Fn(SmtTerm, SmtTerm) -> SmtTerm) -> SmtTerm {
    let mut iter = terms.into_iter();
    // callers check arity first
    let first = iter.next().unwrap_or(SmtTerm::bool(false));
    iter.fold(first, f)
}

impl<'a> ExprEncoder<'a> {
    pub fn new(symbols: &'a SymbolTable) -> Self {
        Self {
            symbols,
            encoding: Encoding::new(),
        }
    }

    pub fn encoding(&self) -> &Encoding {
        &self.encoding
    }

    pub fn into_encoding(self) -> Encoding {
        self.encoding
    }

    /// Encodes `expr` and records it as an assertion.
    pub fn assert(&mut self, expr: &Expr) -> Result<(), EncodeError> {
        let term = self.encode(expr)?;
        self.encoding.assert_term(term);
        Ok(())
    }

    pub fn sort_of(&self, ty: &Type) -> Result<SmtSort, EncodeError> {
        match self.symbols.resolve_type(ty)? {
            Type::Bool => Ok(SmtSort::Bool),
            Type::Unsigned(w) | Type::Signed(w) if w > 0 => Ok(SmtSort::BitVec(w)),
            Type::Integer | Type::Natural => Ok(SmtSort::Int),
            _ => Err(EncodeError::UnsupportedType(ty.clone())),
        }
    }

    pub fn encode(&mut self, expr: &Expr) -> Result<SmtTerm, EncodeError> {
        match &expr.kind {
            ExprKind::Symbol(name) => {
                let sort = self.sort_of(&expr.ty)?;
                self.encoding.declare(name.clone(), sort);
                Ok(SmtTerm::var(name.clone()))
            }
            ExprKind::Constant(value) => self.constant(value, &expr.ty),
            ExprKind::Op(op, operands) => self.operator(*op, operands),
            other => Err(EncodeError::NotFlat(other.name())),
        }
    }

    fn constant(&self, value: &BigInt, ty: &Type) -> Result<SmtTerm, EncodeError> {
        let out_of_range = || EncodeError::ConstantOutOfRange {
            value: value.to_string(),
            ty: ty.clone(),
        };
        match self.sort_of(ty)? {
            SmtSort::Bool => Ok(SmtTerm::bool(!value.is_zero())),
            SmtSort::Int => Ok(SmtTerm::int(value.clone())),
            SmtSort::BitVec(width) => {
                let modulus = BigInt::one() << width;
                let (min, max) = if self.symbols.resolve_type(ty)?.is_signed() {
                    let half = BigInt::one() << (width - 1);
                    (-half.clone(), half)
                } else {
                    (BigInt::zero(), modulus.clone())
                };
                if value < &min || value >= &max {
                    return Err(out_of_range());
                }
                let bits = if value < &BigInt::zero() {
                    value + &modulus
                } else {
                    value.clone()
                };
                let bits = bits.to_biguint().ok_or_else(out_of_range)?;
                Ok(SmtTerm::bv(bits, width))
            }
        }
    }

    fn operator(&mut self, op: Op, operands: &[Expr]) -> Result<SmtTerm, EncodeError> {
        let sort = match operands.first() {
            Some(first) => self.sort_of(&first.ty)?,
            None => SmtSort::Bool,
        };
        let signed = match operands.first() {
            Some(first) => self.symbols.resolve_type(&first.ty)?.is_signed(),
            None => false,
        };
        let mismatch = |sort: SmtSort| EncodeError::SortMismatch {
            op: op.symbol(),
            sort,
        };
        let mut args = operands
            .iter()
            .map(|o| self.encode(o))
            .collect::<Result<Vec<_>, _>>()?;

        match op {
            Op::And | Op::Or => {
                if sort != SmtSort::Bool {
                    return Err(mismatch(sort));
                }
                Ok(if op == Op::And {
                    SmtTerm::and(args)
                } else {
                    SmtTerm::or(args)
                })
            }
            Op::Not | Op::BitNot => {
                arity(op, operands, 1)?;
                let arg = args.remove(0);
                match sort {
                    SmtSort::Bool => Ok(arg.not()),
                    SmtSort::BitVec(_) if op == Op::BitNot => Ok(arg.bv_not()),
                    other => Err(mismatch(other)),
                }
            }
            Op::Neg => {
                arity(op, operands, 1)?;
                let arg = args.remove(0);
                match sort {
                    SmtSort::Int => Ok(SmtTerm::int(0).sub(arg)),
                    SmtSort::BitVec(_) => Ok(arg.bv_neg()),
                    other => Err(mismatch(other)),
                }
            }
            Op::Implies => {
                arity(op, operands, 2)?;
                if sort != SmtSort::Bool {
                    return Err(mismatch(sort));
                }
                let rhs = args.remove(1);
                Ok(args.remove(0).implies(rhs))
            }
            Op::Equal | Op::NotEqual => {
                arity(op, operands, 2)?;
                let rhs = args.remove(1);
                let eq = args.remove(0).eq(rhs);
                Ok(if op == Op::Equal { eq } else { eq.not() })
            }
            Op::Lt | Op::Le | Op::Gt | Op::Ge => {
                arity(op, operands, 2)?;
                let rhs = args.remove(1);
                let lhs = args.remove(0);
                match sort {
                    SmtSort::Int => Ok(match op {
                        Op::Lt => lhs.lt(rhs),
                        Op::Le => lhs.le(rhs),
                        Op::Gt => lhs.gt(rhs),
                        _ => lhs.ge(rhs),
                    }),
                    SmtSort::BitVec(_) => {
                        let cmp = match op {
                            Op::Lt => BvCmp::Lt,
                            Op::Le => BvCmp::Le,
                            Op::Gt => BvCmp::Gt,
                            _ => BvCmp::Ge,
                        };
                        Ok(SmtTerm::bv_compare(cmp, signed, lhs, rhs))
                    }
                    other => Err(mismatch(other)),
                }
            }
            Op::Xor => {
                at_least(op, operands, 2)?;
                match sort {
                    SmtSort::Bool => Ok(fold(args, SmtTerm::xor)),
                    other => Err(mismatch(other)),
                }
            }
            Op::Add | Op::Sub | Op::Mul => {
                at_least(op, operands, 2)?;
                match sort {
                    SmtSort::Int => Ok(match op {
                        Op::Add => fold(args, SmtTerm::add),
                        Op::Sub => fold(args, SmtTerm::sub),
                        _ => fold(args, SmtTerm::mul),
                    }),
                    SmtSort::BitVec(_) => {
                        let bv_op = match op {
                            Op::Add => BvOp::Add,
                            Op::Sub => BvOp::Sub,
                            _ => BvOp::Mul,
                        };
                        Ok(fold(args, |l, r| SmtTerm::bv_binary(bv_op, l, r)))
                    }
                    other => Err(mismatch(other)),
                }
            }
            Op::BitAnd | Op::BitOr | Op::BitXor => {
                at_least(op, operands, 2)?;
                match sort {
                    SmtSort::Bool => Ok(match op {
                        Op::BitAnd => SmtTerm::and(args),
                        Op::BitOr => SmtTerm::or(args),
                        _ => fold(args, SmtTerm::xor),
                    }),
                    SmtSort::BitVec(_) => {
                        let bv_op = match op {
                            Op::BitAnd => BvOp::And,
                            Op::BitOr => BvOp::Or,
                            _ => BvOp::Xor,
                        };
                        Ok(fold(args, |l, r| SmtTerm::bv_binary(bv_op, l, r)))
                    }
                    other => Err(mismatch(other)),
                }
            }
            Op::Ite => {
                arity(op, operands, 3)?;
                if sort != SmtSort::Bool {
                    return Err(mismatch(sort));
                }
                let else_term = args.remove(2);
                let then_term = args.remove(1);
                Ok(args.remove(0).ite(then_term, else_term))
            }
        }
    }
}

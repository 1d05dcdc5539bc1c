#![allow(dead_code)]

use std::collections::HashMap;

use num::traits::{One, Zero};
use num::{BigInt, BigUint};
use ocelot_ir::expr::Expr;
use ocelot_ir::symbols::SymbolTable;
use ocelot_ir::transition_system::TransitionSystem;
use ocelot_ir::types::Type;
use ocelot_smt::solver::{Model, ModelValue, SatResult, SmtSolver};
use ocelot_smt::sorts::SmtSort;
use ocelot_smt::terms::{BvCmp, BvOp, SmtTerm};
use thiserror::Error;

const MAX_BITS: u32 = 20;

#[derive(Debug, Error)]
pub enum BruteForceError {
    #[error("unsupported: {0}")]
    Unsupported(String),
    #[error("undeclared variable {0}")]
    Undeclared(String),
    #[error("pop without push")]
    Pop,
}

#[derive(Debug, Clone, PartialEq)]
enum Value {
    Bool(bool),
    Int(BigInt),
    Bv(BigUint, u32),
}

/// Decides assertions over Bool and narrow bit-vector variables by trying
/// every assignment.
#[derive(Debug, Default)]
pub struct BruteForceSolver {
    vars: Vec<(String, SmtSort)>,
    scopes: Vec<Vec<SmtTerm>>,
    pub checks: usize,
}

impl BruteForceSolver {
    pub fn new() -> Self {
        Self {
            vars: Vec::new(),
            scopes: vec![Vec::new()],
            checks: 0,
        }
    }

    fn width(sort: &SmtSort) -> Result<u32, BruteForceError> {
        match sort {
            SmtSort::Bool => Ok(1),
            SmtSort::BitVec(w) => Ok(*w),
            SmtSort::Int => Err(BruteForceError::Unsupported("Int variables".into())),
        }
    }

    fn assignment(&self, mut index: u64) -> HashMap<String, Value> {
        let mut env = HashMap::new();
        for (name, sort) in &self.vars {
            let value = match sort {
                SmtSort::Bool => {
                    let b = index & 1 == 1;
                    index >>= 1;
                    Value::Bool(b)
                }
                SmtSort::BitVec(w) => {
                    let mask = (1u64 << w) - 1;
                    let v = index & mask;
                    index >>= w;
                    Value::Bv(BigUint::from(v), *w)
                }
                SmtSort::Int => Value::Int(BigInt::zero()),
            };
            env.insert(name.clone(), value);
        }
        env
    }

    fn search(&self) -> Result<Option<HashMap<String, Value>>, BruteForceError> {
        let mut bits = 0;
        for (_, sort) in &self.vars {
            bits += Self::width(sort)?;
        }
        if bits > MAX_BITS {
            return Err(BruteForceError::Unsupported(format!("{bits} bits")));
        }
        for index in 0..(1u64 << bits) {
            let env = self.assignment(index);
            let mut all = true;
            for term in self.scopes.iter().flatten() {
                if !as_bool(eval(term, &env)?)? {
                    all = false;
                    break;
                }
            }
            if all {
                return Ok(Some(env));
            }
        }
        Ok(None)
    }
}

fn as_bool(value: Value) -> Result<bool, BruteForceError> {
    match value {
        Value::Bool(b) => Ok(b),
        other => Err(BruteForceError::Unsupported(format!("{other:?} as Bool"))),
    }
}

fn as_bv(value: Value) -> Result<(BigUint, u32), BruteForceError> {
    match value {
        Value::Bv(v, w) => Ok((v, w)),
        other => Err(BruteForceError::Unsupported(format!("{other:?} as BitVec"))),
    }
}

fn as_int(value: Value) -> Result<BigInt, BruteForceError> {
    match value {
        Value::Int(n) => Ok(n),
        other => Err(BruteForceError::Unsupported(format!("{other:?} as Int"))),
    }
}

fn signed(v: &BigUint, w: u32) -> BigInt {
    let v = BigInt::from(v.clone());
    if v >= (BigInt::one() << (w - 1)) {
        v - (BigInt::one() << w)
    } else {
        v
    }
}

fn wrap(v: BigInt, w: u32) -> BigUint {
    let modulus = BigInt::one() << w;
    let r = ((v % &modulus) + &modulus) % &modulus;
    r.to_biguint().unwrap_or_default()
}

fn eval(term: &SmtTerm, env: &HashMap<String, Value>) -> Result<Value, BruteForceError> {
    let int2 = |l: &SmtTerm, r: &SmtTerm| -> Result<(BigInt, BigInt), BruteForceError> {
        Ok((as_int(eval(l, env)?)?, as_int(eval(r, env)?)?))
    };
    Ok(match term {
        SmtTerm::Var(name) => env
            .get(name)
            .cloned()
            .ok_or_else(|| BruteForceError::Undeclared(name.clone()))?,
        SmtTerm::IntLit(n) => Value::Int(n.clone()),
        SmtTerm::BoolLit(b) => Value::Bool(*b),
        SmtTerm::BvLit { value, width } => Value::Bv(value.clone(), *width),
        SmtTerm::Add(l, r) => {
            let (a, b) = int2(l, r)?;
            Value::Int(a + b)
        }
        SmtTerm::Sub(l, r) => {
            let (a, b) = int2(l, r)?;
            Value::Int(a - b)
        }
        SmtTerm::Mul(l, r) => {
            let (a, b) = int2(l, r)?;
            Value::Int(a * b)
        }
        SmtTerm::Eq(l, r) => Value::Bool(eval(l, env)? == eval(r, env)?),
        SmtTerm::Lt(l, r) => {
            let (a, b) = int2(l, r)?;
            Value::Bool(a < b)
        }
        SmtTerm::Le(l, r) => {
            let (a, b) = int2(l, r)?;
            Value::Bool(a <= b)
        }
        SmtTerm::Gt(l, r) => {
            let (a, b) = int2(l, r)?;
            Value::Bool(a > b)
        }
        SmtTerm::Ge(l, r) => {
            let (a, b) = int2(l, r)?;
            Value::Bool(a >= b)
        }
        SmtTerm::And(terms) => {
            let mut result = true;
            for t in terms {
                result &= as_bool(eval(t, env)?)?;
            }
            Value::Bool(result)
        }
        SmtTerm::Or(terms) => {
            let mut result = false;
            for t in terms {
                result |= as_bool(eval(t, env)?)?;
            }
            Value::Bool(result)
        }
        SmtTerm::Not(inner) => Value::Bool(!as_bool(eval(inner, env)?)?),
        SmtTerm::Xor(l, r) => Value::Bool(as_bool(eval(l, env)?)? ^ as_bool(eval(r, env)?)?),
        SmtTerm::Implies(l, r) => {
            Value::Bool(!as_bool(eval(l, env)?)? || as_bool(eval(r, env)?)?)
        }
        SmtTerm::BvBinary(op, l, r) => {
            let (a, w) = as_bv(eval(l, env)?)?;
            let (b, _) = as_bv(eval(r, env)?)?;
            let (a, b) = (BigInt::from(a), BigInt::from(b));
            let v = match op {
                BvOp::Add => a + b,
                BvOp::Sub => a - b,
                BvOp::Mul => a * b,
                BvOp::And => a & b,
                BvOp::Or => a | b,
                BvOp::Xor => a ^ b,
            };
            Value::Bv(wrap(v, w), w)
        }
        SmtTerm::BvNeg(inner) => {
            let (a, w) = as_bv(eval(inner, env)?)?;
            Value::Bv(wrap(-BigInt::from(a), w), w)
        }
        SmtTerm::BvNot(inner) => {
            let (a, w) = as_bv(eval(inner, env)?)?;
            let max = (BigUint::one() << w) - 1u32;
            Value::Bv(max - a, w)
        }
        SmtTerm::BvCompare {
            op,
            signed: is_signed,
            lhs,
            rhs,
        } => {
            let (a, w) = as_bv(eval(lhs, env)?)?;
            let (b, _) = as_bv(eval(rhs, env)?)?;
            let (a, b) = if *is_signed {
                (signed(&a, w), signed(&b, w))
            } else {
                (BigInt::from(a), BigInt::from(b))
            };
            Value::Bool(match op {
                BvCmp::Lt => a < b,
                BvCmp::Le => a <= b,
                BvCmp::Gt => a > b,
                BvCmp::Ge => a >= b,
            })
        }
        SmtTerm::Ite(c, t, e) => {
            if as_bool(eval(c, env)?)? {
                eval(t, env)?
            } else {
                eval(e, env)?
            }
        }
    })
}

impl SmtSolver for BruteForceSolver {
    type Error = BruteForceError;

    fn declare_var(&mut self, name: &str, sort: &SmtSort) -> Result<(), Self::Error> {
        Self::width(sort)?;
        self.vars.push((name.to_string(), sort.clone()));
        Ok(())
    }

    fn assert(&mut self, term: &SmtTerm) -> Result<(), Self::Error> {
        if let Some(scope) = self.scopes.last_mut() {
            scope.push(term.clone());
        }
        Ok(())
    }

    fn push(&mut self) -> Result<(), Self::Error> {
        self.scopes.push(Vec::new());
        Ok(())
    }

    fn pop(&mut self) -> Result<(), Self::Error> {
        if self.scopes.len() <= 1 {
            return Err(BruteForceError::Pop);
        }
        self.scopes.pop();
        Ok(())
    }

    fn check_sat(&mut self) -> Result<SatResult, Self::Error> {
        Ok(self.check_sat_with_model(&[])?.0)
    }

    fn check_sat_with_model(
        &mut self,
        var_names: &[(&str, &SmtSort)],
    ) -> Result<(SatResult, Option<Model>), Self::Error> {
        self.checks += 1;
        let Some(env) = self.search()? else {
            return Ok((SatResult::Unsat, None));
        };
        let mut values = HashMap::new();
        for (name, _) in var_names {
            let value = match env.get(*name) {
                Some(Value::Bool(b)) => ModelValue::Bool(*b),
                Some(Value::Bv(v, _)) => ModelValue::BitVec(v.clone()),
                Some(Value::Int(n)) => ModelValue::Int(n.clone()),
                None => continue,
            };
            values.insert(name.to_string(), value);
        }
        Ok((SatResult::Sat, Some(Model { values })))
    }

    fn reset(&mut self) -> Result<(), Self::Error> {
        *self = Self::new();
        Ok(())
    }
}

/// `x` starts false and flips every step.
pub fn toggle() -> TransitionSystem {
    let mut symbols = SymbolTable::new();
    symbols.declare_state("x", Type::Bool);
    TransitionSystem::new(
        symbols,
        Expr::not(x()),
        Expr::equal(Expr::next_symbol("x", Type::Bool), Expr::not(x())),
    )
}

/// `x` starts false and keeps its value.
pub fn stuck() -> TransitionSystem {
    let mut symbols = SymbolTable::new();
    symbols.declare_state("x", Type::Bool);
    TransitionSystem::new(
        symbols,
        Expr::not(x()),
        Expr::equal(Expr::next_symbol("x", Type::Bool), x()),
    )
}

/// `x` starts false and copies the free input `i`.
pub fn follower() -> TransitionSystem {
    let mut symbols = SymbolTable::new();
    symbols.declare_state("x", Type::Bool);
    symbols.declare_input("i", Type::Bool);
    TransitionSystem::new(
        symbols,
        Expr::not(x()),
        Expr::equal(Expr::next_symbol("x", Type::Bool), Expr::bool_symbol("i")),
    )
}

/// Two-bit counter starting at zero.
pub fn counter() -> TransitionSystem {
    let ty = Type::Unsigned(2);
    let mut symbols = SymbolTable::new();
    symbols.declare_state("cnt", ty.clone());
    TransitionSystem::new(
        symbols,
        Expr::equal(cnt(), Expr::constant(0, ty.clone())),
        Expr::equal(
            Expr::next_symbol("cnt", ty.clone()),
            Expr::op(
                ocelot_ir::expr::Op::Add,
                vec![cnt(), Expr::constant(1, ty.clone())],
                ty,
            ),
        ),
    )
}

pub fn x() -> Expr {
    Expr::bool_symbol("x")
}

pub fn cnt() -> Expr {
    Expr::symbol("cnt", Type::Unsigned(2))
}

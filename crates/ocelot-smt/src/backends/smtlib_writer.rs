//! A solver backend that only writes the SMT-LIB2 script.
//!
//! Satisfiability queries are recorded as `(check-sat)` and answered with
//! `unknown`, so a BMC run through this backend produces a script that can be
//! handed to any external solver.

use std::io::Write;

use thiserror::Error;

use crate::backends::smtlib_printer::{sort_to_smtlib, symbol_to_smtlib, to_smtlib};
use crate::solver::{Model, SatResult, SmtSolver};
use crate::sorts::SmtSort;
use crate::terms::SmtTerm;

const LOGIC: &str = "(set-logic ALL)";
const NOT_SOLVED: &str = "script written without solving";

#[derive(Debug, Error)]
pub enum SmtLibWriterError {
    #[error("SMT-LIB output error: {0}")]
    Io(#[from] std::io::Error),
    #[error("pop without matching push")]
    UnbalancedPop,
}

pub struct SmtLibWriter<W: Write> {
    out: W,
    scopes: usize,
    started: bool,
}

impl<W: Write> SmtLibWriter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            scopes: 0,
            started: false,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn command(&mut self, cmd: &str) -> Result<(), SmtLibWriterError> {
        if !self.started {
            self.started = true;
            writeln!(self.out, "{LOGIC}")?;
        }
        writeln!(self.out, "{cmd}")?;
        Ok(())
    }
}

impl SmtLibWriter<Vec<u8>> {
    pub fn in_memory() -> Self {
        Self::new(Vec::new())
    }

    /// The commands written so far.
    pub fn script(&self) -> String {
        String::from_utf8_lossy(&self.out).into_owned()
    }
}

impl<W: Write> SmtSolver for SmtLibWriter<W> {
    type Error = SmtLibWriterError;

    fn declare_var(&mut self, name: &str, sort: &SmtSort) -> Result<(), Self::Error> {
        let cmd = format!(
            "(declare-const {} {})",
            symbol_to_smtlib(name),
            sort_to_smtlib(sort)
        );
        self.command(&cmd)
    }

    fn assert(&mut self, term: &SmtTerm) -> Result<(), Self::Error> {
        let cmd = format!("(assert {})", to_smtlib(term));
        self.command(&cmd)
    }

    fn push(&mut self) -> Result<(), Self::Error> {
        self.scopes += 1;
        self.command("(push 1)")
    }

    fn pop(&mut self) -> Result<(), Self::Error> {
        if self.scopes == 0 {
            return Err(SmtLibWriterError::UnbalancedPop);
        }
        self.scopes -= 1;
        self.command("(pop 1)")
    }

    fn check_sat(&mut self) -> Result<SatResult, Self::Error> {
        self.command("(check-sat)")?;
        Ok(SatResult::Unknown(NOT_SOLVED.into()))
    }

    fn check_sat_with_model(
        &mut self,
        _var_names: &[(&str, &SmtSort)],
    ) -> Result<(SatResult, Option<Model>), Self::Error> {
        Ok((self.check_sat()?, None))
    }

    fn reset(&mut self) -> Result<(), Self::Error> {
        self.scopes = 0;
        if self.started {
            writeln!(self.out, "(reset)")?;
            self.started = false;
        }
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_commands_in_order() {
        let mut writer = SmtLibWriter::in_memory();
        writer.declare_var("req@0", &SmtSort::Bool).unwrap();
        writer.declare_var("mem[0]@0", &SmtSort::BitVec(8)).unwrap();
        writer.assert(&SmtTerm::var("req@0")).unwrap();
        writer.push().unwrap();
        writer.assert(&SmtTerm::var("req@0").not()).unwrap();
        let result = writer.check_sat().unwrap();
        writer.pop().unwrap();

        assert!(matches!(result, SatResult::Unknown(_)));
        assert_eq!(
            writer.script(),
            "(set-logic ALL)\n\
             (declare-const req@0 Bool)\n\
             (declare-const |mem[0]@0| (_ BitVec 8))\n\
             (assert req@0)\n\
             (push 1)\n\
             (assert (not req@0))\n\
             (check-sat)\n\
             (pop 1)\n"
        );
    }

    #[test]
    fn pop_requires_a_scope() {
        let mut writer = SmtLibWriter::in_memory();
        assert!(matches!(writer.pop(), Err(SmtLibWriterError::UnbalancedPop)));
    }

    #[test]
    fn reset_starts_a_new_script_section() {
        let mut writer = SmtLibWriter::in_memory();
        writer.reset().unwrap();
        assert_eq!(writer.script(), "");
        writer.declare_var("a@0", &SmtSort::Int).unwrap();
        writer.reset().unwrap();
        writer.declare_var("a@0", &SmtSort::Int).unwrap();
        assert_eq!(
            writer.script(),
            "(set-logic ALL)\n(declare-const a@0 Int)\n(reset)\n\
             (set-logic ALL)\n(declare-const a@0 Int)\n"
        );
    }
}

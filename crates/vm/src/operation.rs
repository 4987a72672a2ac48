//! OPR sub-operation dispatch.
//!
//! For two-operand forms the left operand is the deeper slot: `a OP b`
//! where `a` was pushed first.

use std::io::Write;

use crate::error::RuntimeError;
use crate::machine::VM;
use pl0_common::Operation;

impl<'a, W: Write> VM<'a, W> {
    pub(crate) fn exec_operation(&mut self, op: u8) -> Result<(), RuntimeError> {
        let operation =
            Operation::from_code(op).ok_or(RuntimeError::UnknownOperation { at: self.at, op })?;

        match operation {
            Operation::Neg => self.unary(i64::wrapping_neg),
            Operation::Odd => self.unary(|x| x & 1),
            Operation::Add => self.binary(i64::wrapping_add),
            Operation::Sub => self.binary(i64::wrapping_sub),
            Operation::Mul => self.binary(i64::wrapping_mul),
            Operation::Div => self.exec_div(),
            Operation::Eq => self.compare(|a, b| a == b),
            Operation::Neq => self.compare(|a, b| a != b),
            Operation::Ls => self.compare(|a, b| a < b),
            Operation::Gr => self.compare(|a, b| a > b),
            Operation::Lseq => self.compare(|a, b| a <= b),
            Operation::Greq => self.compare(|a, b| a >= b),
            Operation::Wrt => {
                let value = self.pop()?;
                write!(self.output, "{value} ").map_err(|e| self.output_error(e))
            }
            Operation::Wrl => writeln!(self.output).map_err(|e| self.output_error(e)),
            Operation::Lid => {
                let address = self.pop()?;
                let value = self.stack[self.slot(address)?];
                self.push(value)
            }
            Operation::Sid => {
                let value = self.pop()?;
                let address = self.pop()?;
                let slot = self.slot(address)?;
                self.stack[slot] = value;
                Ok(())
            }
        }
    }

    fn unary(&mut self, op: fn(i64) -> i64) -> Result<(), RuntimeError> {
        let x = self.pop()?;
        self.push(op(x))
    }

    fn binary(&mut self, op: fn(i64, i64) -> i64) -> Result<(), RuntimeError> {
        let b = self.pop()?;
        let a = self.pop()?;
        self.push(op(a, b))
    }

    fn compare(&mut self, op: fn(i64, i64) -> bool) -> Result<(), RuntimeError> {
        let b = self.pop()?;
        let a = self.pop()?;
        self.push(op(a, b) as i64)
    }

    /// Truncating division; `i64::MIN / -1` wraps.
    fn exec_div(&mut self) -> Result<(), RuntimeError> {
        let b = self.pop()?;
        let a = self.pop()?;
        if b == 0 {
            return Err(RuntimeError::DivisionByZero { at: self.at });
        }
        self.push(a.wrapping_div(b))
    }
}

//! Main execution loop and opcode dispatch for the PL/0 VM.
//!
//! Activation record layout, relative to the frame base `b = display[l]`:
//!
//! ```text
//! b - n .. b - 1   arguments pushed by the caller (LOD l -n .. -1)
//! b                saved display[l] of the caller
//! b + 1            return address
//! b + 2 ..         locals reserved by ICT
//! ```

use std::io::Write;

use tracing::debug;

use crate::error::RuntimeError;
use crate::machine::{Status, VM};
use pl0_common::{Instruction, Opcode};

impl<'a, W: Write> VM<'a, W> {
    /// Reset, then execute until the outermost frame returns or a fault.
    ///
    /// Output written before a fault is kept. The output sink is flushed
    /// either way.
    pub fn run(&mut self) -> Result<(), RuntimeError> {
        self.reset();
        debug!(instructions = self.program.len(), "run starting");

        let result = self.drive();
        let flushed = self.output.flush().map_err(|e| self.output_error(e));

        match &result {
            Ok(()) => debug!(steps = self.steps, "halted"),
            Err(e) => debug!(steps = self.steps, error = %e, "run aborted"),
        }
        result.and(flushed)
    }

    fn drive(&mut self) -> Result<(), RuntimeError> {
        while self.step()? == Status::Running {}
        Ok(())
    }

    /// Execute one instruction.
    ///
    /// Returns the status after the instruction. Once the VM has halted or
    /// faulted, further calls do nothing until [`VM::reset`].
    pub fn step(&mut self) -> Result<Status, RuntimeError> {
        if self.status != Status::Running {
            return Ok(self.status);
        }

        match self.cycle() {
            Ok(()) => {
                if self.pc == 0 {
                    self.status = Status::Halted;
                }
                Ok(self.status)
            }
            Err(e) => {
                self.status = Status::Faulted;
                Err(e)
            }
        }
    }

    fn cycle(&mut self) -> Result<(), RuntimeError> {
        self.at = self.pc;
        let instr = self.fetch()?;
        self.pc += 1;
        self.steps += 1;

        self.execute(&instr)?;

        if let Some(trace) = self.trace.as_mut() {
            // Trace write failures are ignored.
            let _ = writeln!(trace, "{instr}\n  pc={}", self.pc);
        }
        Ok(())
    }

    fn execute(&mut self, instr: &Instruction) -> Result<(), RuntimeError> {
        let at = self.at;
        let code = instr.code();
        let opcode = instr
            .opcode()
            .ok_or(RuntimeError::UnknownInstruction { at, code })?;

        match (opcode, *instr) {
            (Opcode::Lit, Instruction::Value { value, .. }) => self.push(value as i64),
            (Opcode::Lod, Instruction::Address { level, offset, .. }) => {
                let slot = self.slot(self.address_of(level, offset)?)?;
                let value = self.stack[slot];
                self.push(value)
            }
            (Opcode::Lda, Instruction::Address { level, offset, .. }) => {
                let address = self.address_of(level, offset)?;
                self.push(address)
            }
            (Opcode::Sto, Instruction::Address { level, offset, .. }) => {
                let value = self.pop()?;
                let slot = self.slot(self.address_of(level, offset)?)?;
                self.stack[slot] = value;
                Ok(())
            }
            (Opcode::Cal, Instruction::Address { level, offset, .. }) => {
                self.exec_call(level, offset)
            }
            (Opcode::Ret, Instruction::Address { level, offset, .. }) => {
                self.exec_ret(level, offset)
            }
            (Opcode::Ict, Instruction::Value { value, .. }) => {
                self.set_top(self.top as i64 + value as i64)
            }
            (Opcode::Jmp, Instruction::Value { value, .. }) => self.jump(value as i64),
            (Opcode::Jpc, Instruction::Value { value, .. }) => {
                if self.pop()? == 0 {
                    self.jump(value as i64)?;
                }
                Ok(())
            }
            (Opcode::Opr, Instruction::Operation { op }) => self.exec_operation(op),
            _ => Err(RuntimeError::MalformedInstruction { at, code }),
        }
    }

    /// Open a frame at `level + 1` and jump to `target`.
    ///
    /// The header words are written at `top` without advancing it; the
    /// callee's own ICT reserves them along with its locals.
    fn exec_call(&mut self, level: i16, target: i16) -> Result<(), RuntimeError> {
        let callee = self.level(level as i64 + 1)?;
        let base = self.top;
        if base + 2 > self.stack.len() {
            return Err(RuntimeError::StackOverflow { at: self.at });
        }

        self.stack[base] = self.display[callee];
        self.stack[base + 1] = self.pc as i64;
        self.display[callee] = base as i64;
        self.jump(target as i64)
    }

    /// Close the frame at `level`, drop `params` argument slots and leave
    /// the return value where the first argument was.
    fn exec_ret(&mut self, level: i16, params: i16) -> Result<(), RuntimeError> {
        let level = self.level(level as i64)?;
        let value = self.pop()?;

        let base = self.slot(self.display[level])?;
        let return_pc = self.stack[self.slot(base as i64 + 1)?];
        self.top = base;
        self.display[level] = self.stack[base];
        self.jump(return_pc)?;

        self.set_top(base as i64 - params as i64)?;
        self.push(value)
    }
}

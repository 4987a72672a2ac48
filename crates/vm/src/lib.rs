//! PL/0 virtual machine: executes decoded instruction streams.
//!
//! The VM is a stack machine with:
//! - One flat operand stack of signed integers holding every activation
//!   record, argument, local and temporary
//! - A display mapping each lexical level to its current frame base
//! - A program counter whose return to 0 halts the run
//!
//! # Usage
//!
//! ```
//! use pl0_common::{Instruction, Opcode, Operation, Program};
//! use pl0_vm::run_with_output;
//!
//! // begin write 10 + 2 end.
//! let program = Program::new(vec![
//!     Instruction::value(Opcode::Jmp, 1),
//!     Instruction::value(Opcode::Ict, 2),
//!     Instruction::value(Opcode::Lit, 10),
//!     Instruction::value(Opcode::Lit, 2),
//!     Instruction::operation(Operation::Add),
//!     Instruction::operation(Operation::Wrt),
//!     Instruction::address(Opcode::Ret, 0, 0),
//! ]);
//!
//! let mut out = Vec::new();
//! run_with_output(&program, &mut out).unwrap();
//! assert_eq!(out, b"12 ");
//! ```

pub mod error;
pub mod execute;
pub mod machine;
pub mod operation;

pub use error::RuntimeError;
pub use machine::{Limits, Status, MAX_LEVEL, STACK_SIZE, VM};

use std::io::{self, Write};

use pl0_common::Program;

/// Execute a program, writing its output to stdout.
///
/// # Errors
///
/// Returns the first [`RuntimeError`] encountered (unknown code, stack
/// overflow, division by zero, ...).
pub fn run(program: &Program) -> Result<(), RuntimeError> {
    run_with_output(program, io::stdout().lock())
}

/// Execute a program, writing its output to `output`.
pub fn run_with_output<W: Write>(program: &Program, output: W) -> Result<(), RuntimeError> {
    VM::new(program, output).run()
}

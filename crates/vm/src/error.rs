//! Runtime faults for the PL/0 VM.
//!
//! Every fault stops the run. Each variant carries the index of the
//! instruction that was executing (`at`).

use thiserror::Error;

/// Errors that occur during program execution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// Opcode byte outside the instruction set.
    #[error("unknown instruction code: {code} at instruction {at}")]
    UnknownInstruction { at: usize, code: u8 },

    /// OPR sub-operation byte outside the operation set.
    #[error("unknown operation type: {op} at instruction {at}")]
    UnknownOperation { at: usize, op: u8 },

    /// A known opcode carried by the wrong instruction shape.
    #[error("malformed instruction with code {code} at instruction {at}")]
    MalformedInstruction { at: usize, code: u8 },

    /// A push, call header or ICT went past the stack capacity.
    #[error("stack overflow at instruction {at}")]
    StackOverflow { at: usize },

    /// A pop on an empty stack, or `top` driven below zero.
    #[error("stack underflow at instruction {at}")]
    StackUnderflow { at: usize },

    /// A computed stack address outside `[0, capacity)`.
    #[error("stack address {address} out of range at instruction {at}")]
    AddressOutOfRange { at: usize, address: i64 },

    /// A lexical level outside the display.
    #[error("lexical level {level} out of range at instruction {at}")]
    LevelOutOfRange { at: usize, level: i64 },

    /// A jump, call or return to a position outside the program.
    #[error("program counter {pc} out of range at instruction {at}")]
    ProgramCounterOutOfRange { at: usize, pc: i64 },

    /// Integer division by zero.
    #[error("division by zero at instruction {at}")]
    DivisionByZero { at: usize },

    /// Writing to the output sink failed.
    #[error("output error at instruction {at}: {message}")]
    Output { at: usize, message: String },
}

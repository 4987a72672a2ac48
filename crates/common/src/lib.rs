//! PL/0 common types and instruction encoding.
//!
//! This crate provides the foundational data structures for the PL/0
//! virtual machine:
//!
//! - [`Opcode`]: the ten instruction codes
//! - [`Operation`]: the sixteen sub-operations of `OPR`
//! - [`Instruction`]: the three instruction shapes as one enum
//! - [`Program`]: a sequence of instructions with binary encode/decode
//! - [`DecodeError`] / [`EncodeError`]: errors from the binary format

pub mod error;
pub mod instruction;
pub mod opcode;
pub mod program;

// Re-export commonly used types at the crate root.
pub use error::{DecodeError, EncodeError};
pub use instruction::Instruction;
pub use opcode::{Opcode, Operation, Shape};
pub use program::Program;

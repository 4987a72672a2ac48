//! Decoded instruction representation.
//!
//! Every instruction keeps its raw opcode byte, so a stream built by hand can
//! carry codes outside the instruction set. Rejecting those is the VM's job.

use std::fmt;

use crate::opcode::{Opcode, Operation, Shape};

/// A single decoded PL/0 instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// LOD, LDA, STO, CAL, RET.
    Address { code: u8, level: i16, offset: i16 },
    /// LIT (32-bit immediate), ICT, JMP, JPC (16-bit immediate on the wire).
    Value { code: u8, value: i32 },
    /// OPR with a sub-operation code.
    Operation { op: u8 },
}

impl Instruction {
    /// Build an address instruction.
    pub fn address(opcode: Opcode, level: i16, offset: i16) -> Self {
        Instruction::Address {
            code: opcode as u8,
            level,
            offset,
        }
    }

    /// Build a value instruction.
    pub fn value(opcode: Opcode, value: i32) -> Self {
        Instruction::Value {
            code: opcode as u8,
            value,
        }
    }

    /// Build an OPR instruction.
    pub fn operation(op: Operation) -> Self {
        Instruction::Operation { op: op as u8 }
    }

    /// The raw opcode byte.
    pub fn code(&self) -> u8 {
        match *self {
            Instruction::Address { code, .. } | Instruction::Value { code, .. } => code,
            Instruction::Operation { .. } => Opcode::Opr as u8,
        }
    }

    /// The opcode, if the code is part of the instruction set.
    pub fn opcode(&self) -> Option<Opcode> {
        Opcode::from_code(self.code())
    }

    /// Shape of this instruction value.
    pub fn shape(&self) -> Shape {
        match self {
            Instruction::Address { .. } => Shape::Address,
            Instruction::Value { .. } => Shape::Value,
            Instruction::Operation { .. } => Shape::Operation,
        }
    }
}

/// Renders the canonical assembly line, e.g. `LOD 1 -2` or `OPR WRT`.
///
/// Codes outside the instruction set render as `#<code>`.
impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match Opcode::from_code(self.code()) {
            Some(op) => f.write_str(op.mnemonic())?,
            None => write!(f, "#{}", self.code())?,
        }
        match *self {
            Instruction::Address { level, offset, .. } => write!(f, " {level} {offset}"),
            Instruction::Value { value, .. } => write!(f, " {value}"),
            Instruction::Operation { op } => match Operation::from_code(op) {
                Some(op) => write!(f, " {}", op.mnemonic()),
                None => write!(f, " #{op}"),
            },
        }
    }
}

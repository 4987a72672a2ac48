//! Program representation and the binary instruction stream.
//!
//! A binary file is a headerless sequence of variable-length records. Each
//! record is a one-byte opcode followed by a payload fixed by the opcode,
//! multi-byte integers little-endian:
//!
//! ```text
//! LIT                      i32
//! OPR                      u8   sub-operation
//! LOD LDA STO CAL RET      i16 level, i16 offset
//! ICT JMP JPC              i16
//! ```

use crate::error::{DecodeError, EncodeError};
use crate::instruction::Instruction;
use crate::opcode::{Opcode, Shape};

/// A PL/0 program: a sequence of instructions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    /// The instruction stream.
    pub instructions: Vec<Instruction>,
}

impl Program {
    /// Create a new program from a vector of instructions.
    pub fn new(instructions: Vec<Instruction>) -> Self {
        Self { instructions }
    }

    /// Encode the entire program to bytes.
    pub fn encode(&self) -> Result<Vec<u8>, EncodeError> {
        let mut bytes = Vec::with_capacity(self.instructions.len() * 5);
        for (at, instr) in self.instructions.iter().enumerate() {
            encode_one(at, instr, &mut bytes)?;
        }
        Ok(bytes)
    }

    /// Decode a byte slice into a program.
    ///
    /// The whole stream is rejected on the first unknown opcode or
    /// truncated record.
    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        let mut instructions = Vec::new();
        let mut reader = Reader { bytes, pos: 0 };

        while let Some(code) = reader.byte() {
            let start = reader.pos - 1;
            let truncated = || DecodeError::Truncated {
                offset: start,
                code,
            };
            let opcode = Opcode::from_code(code).ok_or(DecodeError::UnknownInstruction {
                offset: start,
                code,
            })?;

            let instr = match opcode.shape() {
                Shape::Address => {
                    let level = reader.i16().ok_or_else(truncated)?;
                    let offset = reader.i16().ok_or_else(truncated)?;
                    Instruction::Address {
                        code,
                        level,
                        offset,
                    }
                }
                Shape::Value if opcode == Opcode::Lit => Instruction::Value {
                    code,
                    value: reader.i32().ok_or_else(truncated)?,
                },
                Shape::Value => Instruction::Value {
                    code,
                    value: reader.i16().ok_or_else(truncated)? as i32,
                },
                Shape::Operation => Instruction::Operation {
                    op: reader.byte().ok_or_else(truncated)?,
                },
            };
            instructions.push(instr);
        }

        Ok(Self { instructions })
    }

    /// Number of instructions in the program.
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Returns true if the program has no instructions.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }
}

fn encode_one(at: usize, instr: &Instruction, out: &mut Vec<u8>) -> Result<(), EncodeError> {
    let code = instr.code();
    let opcode = Opcode::from_code(code).ok_or(EncodeError::UnknownInstruction { at, code })?;
    if opcode.shape() != instr.shape() {
        return Err(EncodeError::ShapeMismatch { at, code });
    }

    out.push(code);
    match *instr {
        Instruction::Address { level, offset, .. } => {
            out.extend_from_slice(&level.to_le_bytes());
            out.extend_from_slice(&offset.to_le_bytes());
        }
        Instruction::Value { value, .. } if opcode == Opcode::Lit => {
            out.extend_from_slice(&value.to_le_bytes());
        }
        Instruction::Value { value, .. } => {
            let short =
                i16::try_from(value).map_err(|_| EncodeError::ImmediateOutOfRange { at, value })?;
            out.extend_from_slice(&short.to_le_bytes());
        }
        Instruction::Operation { op } => out.push(op),
    }
    Ok(())
}

struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl Reader<'_> {
    fn take<const N: usize>(&mut self) -> Option<[u8; N]> {
        let chunk = self.bytes.get(self.pos..self.pos + N)?;
        self.pos += N;
        chunk.try_into().ok()
    }

    fn byte(&mut self) -> Option<u8> {
        self.take::<1>().map(|[b]| b)
    }

    fn i16(&mut self) -> Option<i16> {
        self.take().map(i16::from_le_bytes)
    }

    fn i32(&mut self) -> Option<i32> {
        self.take().map(i32::from_le_bytes)
    }
}

//! Errors for PL/0 instruction streams.

use thiserror::Error;

/// Errors that occur while decoding a binary instruction stream.
///
/// `offset` is the byte position of the record's opcode.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Opcode byte not in the instruction set.
    #[error("unknown instruction code: {code} at byte {offset}")]
    UnknownInstruction { offset: usize, code: u8 },

    /// The stream ended in the middle of a record.
    #[error("truncated record for instruction code {code} at byte {offset}")]
    Truncated { offset: usize, code: u8 },
}

/// Errors that occur while encoding instructions to bytes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    /// The instruction carries a code with no wire representation.
    #[error("unknown instruction code: {code} at instruction {at}")]
    UnknownInstruction { at: usize, code: u8 },

    /// A known opcode carried by the wrong instruction shape.
    #[error("instruction code {code} has the wrong shape at instruction {at}")]
    ShapeMismatch { at: usize, code: u8 },

    /// A 16-bit immediate does not fit its field.
    #[error("immediate {value} does not fit in 16 bits at instruction {at}")]
    ImmediateOutOfRange { at: usize, value: i32 },
}

//! Assembly errors. Every variant names the 1-based source line.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AsmError {
    /// The first field is not one of the ten instruction mnemonics.
    #[error("line {line}: '{token}' is not an instruction")]
    UnknownOpcode { line: usize, token: String },

    /// `OPR` named something outside the sixteen sub-operations.
    #[error("line {line}: '{token}' is not an OPR operation")]
    UnknownOperation { line: usize, token: String },

    /// The line ended before the instruction's shape was filled.
    #[error("line {line}: {opcode} takes {expected} operand(s)")]
    MissingOperand {
        line: usize,
        opcode: &'static str,
        expected: usize,
    },

    /// A word that starts like a number but is not one.
    #[error("line {line}: malformed number '{token}'")]
    InvalidNumber { line: usize, token: String },

    /// A number too wide for the wire field it lands in.
    #[error("line {line}: {value} does not fit the {field} of {opcode}")]
    OutOfRange {
        line: usize,
        opcode: &'static str,
        field: &'static str,
        value: i64,
    },

    /// A token of the wrong kind, or one past the last operand.
    #[error("line {line}: unexpected '{token}'")]
    UnexpectedToken { line: usize, token: String },
}

impl AsmError {
    /// The 1-based line the error was found on.
    pub fn line(&self) -> usize {
        match *self {
            AsmError::UnknownOpcode { line, .. }
            | AsmError::UnknownOperation { line, .. }
            | AsmError::MissingOperand { line, .. }
            | AsmError::InvalidNumber { line, .. }
            | AsmError::OutOfRange { line, .. }
            | AsmError::UnexpectedToken { line, .. } => line,
        }
    }
}

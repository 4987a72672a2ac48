//! Parser for PL/0 assembly tokens into instructions.
//!
//! The opcode's [`Shape`] decides the argument pattern:
//!
//! - address: `LOD level offset` (two i16)
//! - value: `LIT n` (i32), `ICT n` / `JMP n` / `JPC n` (i16)
//! - operation: `OPR NAME` or `OPR #code`

use crate::error::AsmError;
use crate::lexer::Token;
use pl0_common::opcode::{ALL_OPCODES, ALL_OPERATIONS};
use pl0_common::{Instruction, Opcode, Operation, Shape};

fn lookup_opcode(mnemonic: &str) -> Option<Opcode> {
    ALL_OPCODES
        .iter()
        .find(|op| op.mnemonic() == mnemonic)
        .copied()
}

fn lookup_operation(mnemonic: &str) -> Option<Operation> {
    ALL_OPERATIONS
        .iter()
        .find(|op| op.mnemonic() == mnemonic)
        .copied()
}

/// Parse the tokens of a single line into an instruction.
///
/// Returns `Ok(None)` for blank lines (empty token list).
pub(crate) fn parse_line(
    tokens: &[Token],
    line_num: usize,
) -> Result<Option<Instruction>, AsmError> {
    let Some((first, args)) = tokens.split_first() else {
        return Ok(None);
    };

    let mnemonic = match first {
        Token::Ident(s) => s.as_str(),
        other => {
            return Err(AsmError::UnexpectedToken {
                line: line_num,
                token: other.text(),
            })
        }
    };

    let opcode = lookup_opcode(mnemonic).ok_or_else(|| AsmError::UnknownOpcode {
        line: line_num,
        token: mnemonic.to_string(),
    })?;

    let instr = match opcode.shape() {
        Shape::Address => {
            let operands = Operands::new(args, line_num, opcode, 2)?;
            Instruction::address(
                opcode,
                operands.int(0, "level")?,
                operands.int(1, "offset")?,
            )
        }
        // Only LIT carries a full 32-bit immediate on the wire.
        Shape::Value if opcode == Opcode::Lit => {
            let operands = Operands::new(args, line_num, opcode, 1)?;
            Instruction::value(opcode, operands.int(0, "immediate")?)
        }
        Shape::Value => {
            let operands = Operands::new(args, line_num, opcode, 1)?;
            let value: i16 = operands.int(0, "immediate")?;
            Instruction::value(opcode, value as i32)
        }
        Shape::Operation => {
            let operands = Operands::new(args, line_num, opcode, 1)?;
            Instruction::Operation {
                op: operands.operation()?,
            }
        }
    };

    Ok(Some(instr))
}

/// The operand tokens of one line, already checked for count.
struct Operands<'a> {
    tokens: &'a [Token],
    line: usize,
    opcode: Opcode,
}

impl<'a> Operands<'a> {
    /// Require exactly `expected` operands.
    fn new(
        tokens: &'a [Token],
        line: usize,
        opcode: Opcode,
        expected: usize,
    ) -> Result<Self, AsmError> {
        if tokens.len() < expected {
            return Err(AsmError::MissingOperand {
                line,
                opcode: opcode.mnemonic(),
                expected,
            });
        }
        if let Some(extra) = tokens.get(expected) {
            return Err(AsmError::UnexpectedToken {
                line,
                token: extra.text(),
            });
        }
        Ok(Self {
            tokens,
            line,
            opcode,
        })
    }

    fn unexpected(&self, idx: usize) -> AsmError {
        AsmError::UnexpectedToken {
            line: self.line,
            token: self.tokens[idx].text(),
        }
    }

    /// The number at `idx`, narrowed to the width of `field`.
    fn int<T: TryFrom<i64>>(&self, idx: usize, field: &'static str) -> Result<T, AsmError> {
        let Token::Number(n) = self.tokens[idx] else {
            return Err(self.unexpected(idx));
        };
        T::try_from(n).map_err(|_| AsmError::OutOfRange {
            line: self.line,
            opcode: self.opcode.mnemonic(),
            field,
            value: n,
        })
    }

    /// The sub-operation code at position 0: a mnemonic or a raw `#code`.
    fn operation(&self) -> Result<u8, AsmError> {
        match &self.tokens[0] {
            Token::Ident(name) => lookup_operation(name)
                .map(|op| op as u8)
                .ok_or_else(|| AsmError::UnknownOperation {
                    line: self.line,
                    token: name.clone(),
                }),
            Token::Raw(code) => Ok(*code),
            Token::Number(_) => Err(self.unexpected(0)),
        }
    }
}

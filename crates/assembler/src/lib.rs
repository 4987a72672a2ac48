//! PL/0 assembler: text assembly to instruction streams and back.
//!
//! The assembler is a mechanical 1:1 translation, one line per instruction.
//!
//! # Usage
//!
//! ```
//! use pl0_assembler::{assemble, disassemble};
//!
//! let text = "JMP 1\nICT 2\nLIT 12\nOPR WRT\nRET 0 0\n";
//! let program = assemble(text).unwrap();
//! assert_eq!(program.len(), 5);
//! assert_eq!(disassemble(&program), text);
//! ```
//!
//! # Roundtrip Guarantee
//!
//! `assemble(disassemble(program)) == program` holds for every program the
//! binary format can carry. The disassembler outputs canonical text; the
//! assembler also accepts lowercase mnemonics, hex literals, comments,
//! comma-separated fields and `N:` listing prefixes.

pub mod error;

mod disassembler;
mod lexer;
mod parser;

pub use disassembler::{disassemble, listing};
pub use error::AsmError;

use lexer::tokenize_line;
use parser::parse_line;
use pl0_common::Program;

/// Assemble text into a program.
///
/// Returns the first error encountered, tagged with its 1-based line.
pub fn assemble(text: &str) -> Result<Program, AsmError> {
    let mut instructions = Vec::new();

    for (idx, line) in text.lines().enumerate() {
        let line_num = idx + 1;
        let tokens = tokenize_line(line, line_num)?;
        if let Some(instr) = parse_line(&tokens, line_num)? {
            instructions.push(instr);
        }
    }

    Ok(Program::new(instructions))
}

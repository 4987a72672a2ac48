//! Disassembler: program to canonical assembly text.
//!
//! One instruction per line, no indentation, no comments. Sub-operation
//! codes outside the set are written as `OPR #code` so they reassemble.

use std::fmt::Write;

use pl0_common::Program;

/// Disassemble a program into canonical assembly text.
pub fn disassemble(program: &Program) -> String {
    let mut text = String::new();
    for instr in &program.instructions {
        // Writing into a String cannot fail.
        let _ = writeln!(text, "{instr}");
    }
    text
}

/// Render an indexed listing, one `index: instruction` line each.
///
/// Indices are right-aligned to the width of the largest one, which is
/// what jump and call targets refer to.
pub fn listing(program: &Program) -> String {
    let width = program.len().saturating_sub(1).to_string().len();
    let mut text = String::new();
    for (i, instr) in program.instructions.iter().enumerate() {
        let _ = writeln!(text, "{i:>width$}: {instr}");
    }
    text
}

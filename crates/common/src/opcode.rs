//! Opcode and sub-operation definitions for the PL/0 instruction set.

/// Identifies the instruction to execute.
///
/// The `#[repr(u8)]` attribute pins each variant to its wire byte.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    /// Push a 32-bit immediate.
    Lit = 1,
    /// Generic operate. The sub-operation selects the behavior.
    Opr = 2,
    /// Push the variable at (level, offset).
    Lod = 3,
    /// Pop into the variable at (level, offset).
    Sto = 4,
    /// Call the procedure at `offset`, opening a frame at `level + 1`.
    Cal = 5,
    /// Return from the frame at `level`, reclaiming `offset` parameters.
    Ret = 6,
    /// Grow the stack by the immediate (reserve locals).
    Ict = 7,
    /// Unconditional jump.
    Jmp = 8,
    /// Pop; jump if the value is zero.
    Jpc = 9,
    /// Push the stack address of (level, offset).
    Lda = 10,
}

/// All opcodes, in wire order.
pub const ALL_OPCODES: [Opcode; 10] = [
    Opcode::Lit,
    Opcode::Opr,
    Opcode::Lod,
    Opcode::Sto,
    Opcode::Cal,
    Opcode::Ret,
    Opcode::Ict,
    Opcode::Jmp,
    Opcode::Jpc,
    Opcode::Lda,
];

/// Instruction shape an opcode is carried by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// `(level, offset)` pair.
    Address,
    /// Single signed immediate.
    Value,
    /// Sub-operation code.
    Operation,
}

impl Opcode {
    /// Look up an opcode from its wire byte.
    pub fn from_code(code: u8) -> Option<Self> {
        ALL_OPCODES.get(code.checked_sub(1)? as usize).copied()
    }

    /// Canonical assembly mnemonic (uppercase).
    pub fn mnemonic(self) -> &'static str {
        match self {
            Opcode::Lit => "LIT",
            Opcode::Opr => "OPR",
            Opcode::Lod => "LOD",
            Opcode::Sto => "STO",
            Opcode::Cal => "CAL",
            Opcode::Ret => "RET",
            Opcode::Ict => "ICT",
            Opcode::Jmp => "JMP",
            Opcode::Jpc => "JPC",
            Opcode::Lda => "LDA",
        }
    }

    /// The instruction shape this opcode is encoded with.
    pub fn shape(self) -> Shape {
        match self {
            Opcode::Lod | Opcode::Lda | Opcode::Sto | Opcode::Cal | Opcode::Ret => Shape::Address,
            Opcode::Lit | Opcode::Ict | Opcode::Jmp | Opcode::Jpc => Shape::Value,
            Opcode::Opr => Shape::Operation,
        }
    }
}

/// Sub-operations reachable through [`Opcode::Opr`].
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Negate the top of stack.
    Neg = 1,
    /// `a + b`.
    Add = 2,
    /// `a - b`.
    Sub = 3,
    /// `a * b`.
    Mul = 4,
    /// `a / b`, truncating toward zero.
    Div = 5,
    /// `x & 1`.
    Odd = 6,
    /// `a == b`.
    Eq = 7,
    /// `a < b`.
    Ls = 8,
    /// `a > b`.
    Gr = 9,
    /// `a != b`.
    Neq = 10,
    /// `a <= b`.
    Lseq = 11,
    /// `a >= b`.
    Greq = 12,
    /// Pop and write the integer followed by a space.
    Wrt = 13,
    /// Write a newline.
    Wrl = 14,
    /// Indirect load through the address on top of the stack.
    Lid = 15,
    /// Indirect store: `stack[second] = top`.
    Sid = 16,
}

/// All sub-operations, in wire order.
pub const ALL_OPERATIONS: [Operation; 16] = [
    Operation::Neg,
    Operation::Add,
    Operation::Sub,
    Operation::Mul,
    Operation::Div,
    Operation::Odd,
    Operation::Eq,
    Operation::Ls,
    Operation::Gr,
    Operation::Neq,
    Operation::Lseq,
    Operation::Greq,
    Operation::Wrt,
    Operation::Wrl,
    Operation::Lid,
    Operation::Sid,
];

impl Operation {
    /// Look up a sub-operation from its wire byte.
    pub fn from_code(code: u8) -> Option<Self> {
        ALL_OPERATIONS.get(code.checked_sub(1)? as usize).copied()
    }

    /// Canonical assembly mnemonic (uppercase).
    pub fn mnemonic(self) -> &'static str {
        match self {
            Operation::Neg => "NEG",
            Operation::Add => "ADD",
            Operation::Sub => "SUB",
            Operation::Mul => "MUL",
            Operation::Div => "DIV",
            Operation::Odd => "ODD",
            Operation::Eq => "EQ",
            Operation::Ls => "LS",
            Operation::Gr => "GR",
            Operation::Neq => "NEQ",
            Operation::Lseq => "LSEQ",
            Operation::Greq => "GREQ",
            Operation::Wrt => "WRT",
            Operation::Wrl => "WRL",
            Operation::Lid => "LID",
            Operation::Sid => "SID",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opcode_bytes_match_wire_format() {
        for (i, &op) in ALL_OPCODES.iter().enumerate() {
            assert_eq!(op as u8, i as u8 + 1, "{op:?} out of order");
            assert_eq!(Opcode::from_code(op as u8), Some(op));
        }
    }

    #[test]
    fn operation_bytes_match_wire_format() {
        for (i, &op) in ALL_OPERATIONS.iter().enumerate() {
            assert_eq!(op as u8, i as u8 + 1, "{op:?} out of order");
            assert_eq!(Operation::from_code(op as u8), Some(op));
        }
    }

    #[test]
    fn unknown_codes_resolve_to_none() {
        assert_eq!(Opcode::from_code(0), None);
        assert_eq!(Opcode::from_code(11), None);
        assert_eq!(Opcode::from_code(0xFF), None);
        assert_eq!(Operation::from_code(0), None);
        assert_eq!(Operation::from_code(17), None);
    }

    #[test]
    fn every_byte_value_resolves() {
        let known = (0..=255u8).filter_map(Opcode::from_code).count();
        assert_eq!(known, ALL_OPCODES.len());
        let known = (0..=255u8).filter_map(Operation::from_code).count();
        assert_eq!(known, ALL_OPERATIONS.len());
    }

    #[test]
    fn shapes() {
        assert_eq!(Opcode::Lit.shape(), Shape::Value);
        assert_eq!(Opcode::Jpc.shape(), Shape::Value);
        assert_eq!(Opcode::Lda.shape(), Shape::Address);
        assert_eq!(Opcode::Ret.shape(), Shape::Address);
        assert_eq!(Opcode::Opr.shape(), Shape::Operation);
    }

    #[test]
    fn mnemonics_are_uppercase_and_unique() {
        let mut seen = std::collections::HashSet::new();
        for &op in &ALL_OPCODES {
            let m = op.mnemonic();
            assert_eq!(m, m.to_uppercase());
            assert!(seen.insert(m), "duplicate mnemonic {m}");
        }
        for &op in &ALL_OPERATIONS {
            let m = op.mnemonic();
            assert_eq!(m, m.to_uppercase());
            assert!(seen.insert(m), "duplicate mnemonic {m}");
        }
    }
}

//! Superinstruction bytecode produced by the compiler.

use std::fmt;
use std::io::{self, Write};

/// Operation kinds. The discriminant is the byte written by [`Program::dump`].
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpCode {
    Output = 0,
    Input = 1,
    JumpFwd = 2,
    JumpBack = 3,
    SetZero = 4,
    AddVal = 5,
    MovePos = 6,
    AddToNext = 7,
    MultiplyMove = 8,
    SetValue = 9,
    ScanRight = 10,
    ScanLeft = 11,
}

impl OpCode {
    pub fn mnemonic(self) -> &'static str {
        match self {
            OpCode::Output => "OUTPUT",
            OpCode::Input => "INPUT",
            OpCode::JumpFwd => "JUMP_FWD",
            OpCode::JumpBack => "JUMP_BACK",
            OpCode::SetZero => "SET_ZERO",
            OpCode::AddVal => "ADD_VAL",
            OpCode::MovePos => "MOVE_POS",
            OpCode::AddToNext => "ADD_TO_NEXT",
            OpCode::MultiplyMove => "MULTIPLY_MOVE",
            OpCode::SetValue => "SET_VALUE",
            OpCode::ScanRight => "SCAN_RIGHT",
            OpCode::ScanLeft => "SCAN_LEFT",
        }
    }
}

/// One (possibly fused) operation.
///
/// `jump_ref` only means something for [`OpCode::JumpFwd`] and
/// [`OpCode::JumpBack`]; `value` only for `AddVal`, `MovePos`,
/// `MultiplyMove` and `SetValue`. Both are zero otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    pub op: OpCode,
    pub jump_ref: usize,
    pub value: i64,
}

impl Instruction {
    pub const fn new(op: OpCode) -> Self {
        Self {
            op,
            jump_ref: 0,
            value: 0,
        }
    }

    pub const fn with_value(op: OpCode, value: i64) -> Self {
        Self {
            op,
            jump_ref: 0,
            value,
        }
    }

    pub const fn jump(op: OpCode, jump_ref: usize) -> Self {
        Self {
            op,
            jump_ref,
            value: 0,
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.op {
            OpCode::JumpFwd | OpCode::JumpBack => {
                write!(f, "{:<13} -> {}", self.op.mnemonic(), self.jump_ref)
            }
            OpCode::AddVal | OpCode::MovePos | OpCode::MultiplyMove | OpCode::SetValue => {
                write!(f, "{:<13} {}", self.op.mnemonic(), self.value)
            }
            _ => f.write_str(self.op.mnemonic()),
        }
    }
}

/// An immutable, compiled program.
///
/// Every paired `JumpFwd`/`JumpBack` reference each other's index. A
/// `JumpFwd` left open by the source points at `len()`, so taking it ends
/// the run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    instructions: Vec<Instruction>,
}

impl Program {
    pub(crate) fn from_instructions(instructions: Vec<Instruction>) -> Self {
        Self { instructions }
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Instruction> {
        self.instructions.get(index)
    }

    /// Opcode discriminants, one byte per instruction.
    pub fn opcode_bytes(&self) -> Vec<u8> {
        self.instructions.iter().map(|i| i.op as u8).collect()
    }

    /// Write the debug dump: one opcode byte per instruction, no operands.
    pub fn dump<W: Write>(&self, out: &mut W) -> io::Result<()> {
        out.write_all(&self.opcode_bytes())
    }

    /// Write a human-readable listing, one line per instruction.
    pub fn write_listing<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let width = self.len().saturating_sub(1).to_string().len();
        for (index, instr) in self.instructions.iter().enumerate() {
            writeln!(out, "{index:>width$}  {instr}")?;
        }
        Ok(())
    }
}

impl std::ops::Index<usize> for Program {
    type Output = Instruction;

    fn index(&self, index: usize) -> &Self::Output {
        &self.instructions[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discriminants_follow_declaration_order() {
        assert_eq!(OpCode::Output as u8, 0);
        assert_eq!(OpCode::JumpBack as u8, 3);
        assert_eq!(OpCode::MovePos as u8, 6);
        assert_eq!(OpCode::ScanLeft as u8, 11);
    }

    #[test]
    fn dump_writes_one_byte_per_instruction() {
        let program = Program::from_instructions(vec![
            Instruction::with_value(OpCode::AddVal, 3),
            Instruction::new(OpCode::Output),
        ]);
        let mut out = Vec::new();
        program.dump(&mut out).unwrap();
        assert_eq!(out, vec![5, 0]);
    }

    #[test]
    fn listing_shows_operands() {
        let program = Program::from_instructions(vec![
            Instruction::jump(OpCode::JumpFwd, 2),
            Instruction::with_value(OpCode::AddVal, -1),
            Instruction::jump(OpCode::JumpBack, 0),
            Instruction::new(OpCode::Output),
        ]);
        let mut out = Vec::new();
        program.write_listing(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        insta::assert_snapshot!(text, @r"
        0  JUMP_FWD      -> 2
        1  ADD_VAL       -1
        2  JUMP_BACK     -> 0
        3  OUTPUT
        ");
    }

    #[test]
    fn get_is_bounds_checked() {
        let program = Program::from_instructions(vec![Instruction::with_value(OpCode::MovePos, -2)]);
        assert_eq!(program.get(0), Some(&program[0]));
        assert_eq!(program.get(0).map(|i| i.value), Some(-2));
        assert_eq!(program.get(1), None);
    }

    #[test]
    fn empty_program_has_empty_dump() {
        let program = Program::default();
        assert!(program.is_empty());
        assert!(program.opcode_bytes().is_empty());
    }
}

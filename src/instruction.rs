//! Fixed-width two-word instructions and the `Code` sequence they form (§4.2).

use crate::opcode::OpCode;
use core::fmt;

/// A single long-form instruction: an opcode paired with a 16-bit argument.
///
/// `arg`'s meaning depends on the opcode: a chunk of a pushed constant for
/// `PUSH1..PUSH32`, 16 further bits of constant data for `DATA`, a
/// bytecode-space jump target for `JUMP_TO`, or the argument of whichever
/// component of a super-instruction's decomposition takes one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Instruction {
    pub opcode: OpCode,
    pub arg: u16,
}

impl Instruction {
    /// Builds an instruction from an opcode and argument.
    #[inline]
    pub const fn new(opcode: OpCode, arg: u16) -> Self {
        Self { opcode, arg }
    }

    /// Builds an instruction with no meaningful argument (`arg` defaults to 0).
    #[inline]
    pub const fn bare(opcode: OpCode) -> Self {
        Self { opcode, arg: 0 }
    }

    /// True when `arg` carries meaningful data for this instruction's opcode.
    #[inline]
    pub fn has_argument(&self) -> bool {
        self.opcode.has_argument()
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.has_argument() {
            write!(f, "{} 0x{:04x}", self.opcode, self.arg)
        } else {
            write!(f, "{}", self.opcode)
        }
    }
}

/// An ordered sequence of long-form [`Instruction`]s.
///
/// Indices into `Code` map one-to-one to bytecode-space offsets; gaps left by
/// multi-word source instructions are filled with `NOOP`/`DATA` by the
/// (external) converter, not by this type.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Code {
    instructions: Vec<Instruction>,
}

impl Code {
    /// Wraps an already-converted instruction sequence.
    #[inline]
    pub fn new(instructions: Vec<Instruction>) -> Self {
        Self { instructions }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Returns the instruction at `pc`, if `pc` is in bounds.
    #[inline]
    pub fn get(&self, pc: usize) -> Option<&Instruction> {
        self.instructions.get(pc)
    }

    #[inline]
    pub fn iter(&self) -> core::slice::Iter<'_, Instruction> {
        self.instructions.iter()
    }

    #[inline]
    pub fn as_slice(&self) -> &[Instruction] {
        &self.instructions
    }
}

impl FromIterator<Instruction> for Code {
    fn from_iter<I: IntoIterator<Item = Instruction>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Code {
    type Item = &'a Instruction;
    type IntoIter = core::slice::Iter<'a, Instruction>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (pc, instr) in self.instructions.iter().enumerate() {
            writeln!(f, "0x{pc:04x}: {instr}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opcode::{self, OpCode};

    #[test]
    fn display_no_argument() {
        let instr = Instruction::bare(OpCode::new(opcode::STOP));
        assert_eq!(instr.to_string(), "STOP");
    }

    #[test]
    fn display_with_argument() {
        let instr = Instruction::new(OpCode::new(opcode::PUSH1), 0x01);
        assert_eq!(instr.to_string(), "PUSH1 0x0001");
    }

    #[test]
    fn code_string_form() {
        let code = Code::new(vec![
            Instruction::new(OpCode::new(opcode::PUSH1), 0x2a),
            Instruction::bare(OpCode::new(opcode::STOP)),
        ]);
        assert_eq!(code.to_string(), "0x0000: PUSH1 0x002a\n0x0001: STOP\n");
    }

    #[test]
    fn empty_code_string_form() {
        assert_eq!(Code::default().to_string(), "");
    }

    #[test]
    #[cfg(feature = "serde")]
    fn code_serde_round_trip() {
        let code = Code::new(vec![
            Instruction::new(OpCode::new(opcode::PUSH1), 0x2a),
            Instruction::bare(OpCode::new(opcode::STOP)),
        ]);
        let serialized = serde_json::to_string(&code).unwrap();
        let deserialized: Code = serde_json::from_str(&serialized).unwrap();
        assert_eq!(code, deserialized);
    }
}

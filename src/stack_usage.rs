//! Per-opcode stack effect and the composition algebra for super-instructions (§4.4).

use crate::error::StaticAnalysisError;
use crate::opcode::{self, base_info, OpCode};

/// An opcode's effect on the stack pointer, relative to its value before the
/// opcode executes.
///
/// `from` is the lowest the stack pointer dips during execution (always
/// `<= 0`), `to` is the highest it reaches (always `>= 0`), and `delta` is
/// the net change (`pushes - pops`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StackUsage {
    pub from: i32,
    pub to: i32,
    pub delta: i32,
}

impl StackUsage {
    const IDENTITY: StackUsage = StackUsage { from: 0, to: 0, delta: 0 };

    fn from_pops_pushes(pops: u8, pushes: u8) -> Self {
        let pops = pops as i32;
        let pushes = pushes as i32;
        let delta = pushes - pops;
        Self {
            from: -pops,
            to: delta.max(0),
            delta,
        }
    }
}

/// Computes `(from, to, delta)` for any executable opcode, base or super.
///
/// Non-executable values (`INVALID`, `NOOP`, `DATA`, or anything out of
/// range) are a caller bug, not a runtime condition — this returns an error
/// rather than panicking so tests can assert on it directly.
pub fn compute_stack_usage(op: OpCode) -> Result<StackUsage, StaticAnalysisError> {
    if op.is_base_instruction() {
        return match base_info(op.get() as u8) {
            Some(info) if info.executable => Ok(StackUsage::from_pops_pushes(info.inputs, info.outputs)),
            _ => Err(StaticAnalysisError::NotExecutable(op.get())),
        };
    }

    if op.get() == opcode::JUMP_TO {
        return Ok(StackUsage::from_pops_pushes(0, 0));
    }

    if let Some(components) = op.decompose() {
        let usages: Result<Vec<StackUsage>, StaticAnalysisError> =
            components.iter().map(|&c| compute_stack_usage(c)).collect();
        return Ok(combine_stack_usage(usages?));
    }

    Err(StaticAnalysisError::NotExecutable(op.get()))
}

/// Simulates a sequence of stack usages executing one after another and
/// returns the usage of the whole sequence.
///
/// Tracks a running delta across the sequence; each sub-usage's `from`/`to`
/// are shifted by the delta accumulated so far, and the result's `from`/`to`
/// are the minimum/maximum shifted values seen (including the identity
/// starting point of `0`). The empty sequence is the identity `(0, 0, 0)`.
pub fn combine_stack_usage(usages: impl IntoIterator<Item = StackUsage>) -> StackUsage {
    let mut running_delta = 0;
    let mut from = StackUsage::IDENTITY.from;
    let mut to = StackUsage::IDENTITY.to;

    for usage in usages {
        let shifted_from = running_delta + usage.from;
        let shifted_to = running_delta + usage.to;
        from = from.min(shifted_from);
        to = to.max(shifted_to);
        running_delta += usage.delta;
    }

    StackUsage { from, to, delta: running_delta }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opcode::OpCode;

    #[test]
    fn base_opcode_usage_matches_pops_pushes() {
        let usage = compute_stack_usage(OpCode::new(opcode::ADD)).unwrap();
        assert_eq!(usage, StackUsage { from: -2, to: 0, delta: -1 });

        let usage = compute_stack_usage(OpCode::new(opcode::PUSH1)).unwrap();
        assert_eq!(usage, StackUsage { from: 0, to: 1, delta: 1 });

        let usage = compute_stack_usage(OpCode::new(opcode::DUP3)).unwrap();
        assert_eq!(usage, StackUsage { from: -3, to: 1, delta: 1 });

        let usage = compute_stack_usage(OpCode::new(opcode::LOG4)).unwrap();
        assert_eq!(usage, StackUsage { from: -6, to: 0, delta: -6 });
    }

    #[test]
    fn non_executable_opcodes_error() {
        assert_eq!(
            compute_stack_usage(OpCode::new(opcode::INVALID)),
            Err(StaticAnalysisError::NotExecutable(opcode::INVALID))
        );
        assert_eq!(
            compute_stack_usage(OpCode::new(opcode::NOOP)),
            Err(StaticAnalysisError::NotExecutable(opcode::NOOP))
        );
        assert_eq!(
            compute_stack_usage(OpCode::new(opcode::DATA)),
            Err(StaticAnalysisError::NotExecutable(opcode::DATA))
        );
    }

    #[test]
    fn jump_to_has_no_stack_effect() {
        let usage = compute_stack_usage(OpCode::new(opcode::JUMP_TO)).unwrap();
        assert_eq!(usage, StackUsage { from: 0, to: 0, delta: 0 });
    }

    #[test]
    fn super_instruction_usage_matches_decomposition() {
        let direct = compute_stack_usage(OpCode::new(opcode::PUSH1_ADD)).unwrap();
        let composed = combine_stack_usage(
            OpCode::new(opcode::PUSH1_ADD)
                .decompose()
                .unwrap()
                .iter()
                .map(|&c| compute_stack_usage(c).unwrap()),
        );
        assert_eq!(direct, composed);
    }

    #[test]
    fn combine_three_instruction_sequence() {
        let usages = [opcode::PUSH1, opcode::LOG4, opcode::PUSH1]
            .into_iter()
            .map(|raw| compute_stack_usage(OpCode::new(raw)).unwrap());
        let combined = combine_stack_usage(usages);
        assert_eq!(combined, StackUsage { from: -5, to: 1, delta: -4 });
    }

    #[test]
    fn combine_two_super_instruction_sequence() {
        let usages = [opcode::PUSH1_ADD, opcode::ISZERO_PUSH2_JUMPI]
            .into_iter()
            .map(|raw| compute_stack_usage(OpCode::new(raw)).unwrap());
        let combined = combine_stack_usage(usages);
        assert_eq!(combined, StackUsage { from: -1, to: 1, delta: -1 });
    }

    #[test]
    fn empty_sequence_is_identity() {
        assert_eq!(combine_stack_usage(core::iter::empty()), StackUsage::IDENTITY);
    }
}

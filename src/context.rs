//! Per-execution state and the terminal/non-terminal outcomes it can reach (§3, §6).

use crate::instruction::Code;
use crate::stack::{self, Stack};
use alloy_primitives::Bytes;

/// Inputs supplied by the host for a single `run` call.
///
/// Everything the host needs to interpret beyond this bundle — accounts,
/// storage, gas schedules — is consumed by the external `step` dispatcher,
/// not by the runners or by [`Context`] itself.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Parameters {
    pub input: Bytes,
    pub is_static: bool,
    pub gas: i64,
    pub bytecode: Bytes,
}

/// The terminal or non-terminal outcome of a `step`.
///
/// `Running` is the only non-terminal member; every runner's loop keeps
/// calling `step` until it sees anything else.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Status {
    Running,
    Stopped,
    Returned,
    Reverted,
    SelfDestructed,
    Invalid,
    OutOfGas,
    Error,
}

impl Status {
    /// True for every member other than [`Status::Running`].
    #[inline]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Status::Running)
    }
}

/// Per-execution mutable state: program counter, remaining gas, a reference
/// to the immutable long-form code, the owned stack, and an opaque host
/// handle threaded through to `step` handlers untouched by this crate.
///
/// The stack is drawn from the process-wide pool on construction and
/// returned to it on drop, along every exit path.
pub struct Context<'a, H = ()> {
    pub pc: usize,
    pub gas: i64,
    pub code: &'a Code,
    pub stack: Stack,
    pub host: H,
}

impl<'a, H> Context<'a, H> {
    /// Starts a fresh context at `pc = 0` with a stack drawn from the pool.
    pub fn new(code: &'a Code, gas: i64, host: H) -> Self {
        Self {
            pc: 0,
            gas,
            code,
            stack: stack::new_stack(),
            host,
        }
    }

    /// The instruction at the current program counter, if in bounds.
    #[inline]
    pub fn current(&self) -> Option<&'a crate::instruction::Instruction> {
        self.code.get(self.pc)
    }
}

impl<'a, H> Drop for Context<'a, H> {
    fn drop(&mut self) {
        let stack = core::mem::take(&mut self.stack);
        stack::return_stack(stack);
    }
}

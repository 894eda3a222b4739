//! Error taxonomy for the LFVM core.
//!
//! Terminal execution outcomes live in [`crate::context::Status`] and are not
//! errors. The types here cover two fault classes: execution faults
//! surfaced by a `step` dispatcher, and static-analysis errors raised by
//! [`crate::stack_usage::compute_stack_usage`] for opcodes that are not
//! executable.

use thiserror::Error;

/// A fault surfaced by the `step` dispatcher (external collaborator, §6).
///
/// These should never occur if the static stack-bounds table (§4.5) was
/// consulted by the dispatcher before invoking a handler; they exist so a
/// misbehaving or partially-implemented `step` has something to report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ExecutionError {
    /// A handler attempted to pop from or index below the bottom of the stack.
    #[error("stack underflow")]
    StackUnderflow,
    /// A handler attempted to push past [`crate::stack::MAX_STACK_SIZE`].
    #[error("stack overflow")]
    StackOverflow,
    /// The instruction stream is malformed (e.g. a `JUMP_TO` not immediately
    /// followed by a `NOOP` run terminated by the target `JUMPDEST`).
    #[error("malformed instruction stream")]
    MalformedInstructionStream,
    /// The host-state interface failed. The core treats this opaquely; the
    /// embedder's `step` is responsible for any richer diagnostics.
    #[error("host I/O failure")]
    HostIo,
}

/// A programmer error raised by the static stack-usage analysis (§4.4).
///
/// `computeStackUsage` is only defined over executable opcodes. Calling it on
/// `INVALID`, `NOOP`, `DATA`, or an out-of-range opcode value is a bug in the
/// caller, not a runtime condition — it is kept as a typed, comparable value
/// (rather than a panic) purely so tests can assert on it directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StaticAnalysisError {
    /// The opcode has no defined stack usage (non-executable or undefined).
    #[error("opcode {0:#06x} has no defined stack usage")]
    NotExecutable(u16),
}

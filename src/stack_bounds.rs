//! Precomputed static stack-height preconditions for the dispatcher fast path (§4.5).

use crate::opcode::{OpCode, PropertyMap};
use crate::stack::MAX_STACK_SIZE;
use crate::stack_usage::compute_stack_usage;

/// The stack-height window in which an opcode may execute without
/// under/overflowing the 1024-slot stack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StackBounds {
    /// Minimum live stack height required to execute (`= pops`).
    pub stack_min: u16,
    /// Largest live stack height that will not overflow on push.
    pub stack_max: u16,
    /// Net growth if positive, `0` otherwise.
    pub increase: u16,
}

impl StackBounds {
    /// Default entry for unknown or undefined opcodes: permit anything.
    const UNDEFINED: StackBounds = StackBounds {
        stack_min: 0,
        stack_max: MAX_STACK_SIZE as u16,
        increase: 0,
    };

    fn from_usage(delta: i32, pops: i32) -> Self {
        let increase = delta.max(0) as u16;
        Self {
            stack_min: pops.max(0) as u16,
            stack_max: (MAX_STACK_SIZE as i32 - increase as i32) as u16,
            increase,
        }
    }
}

/// Builds the 512-entry static bounds table, one entry per value in the
/// opcode space. Per §9's resolved open question, bounds for every opcode
/// (base and super alike) are derived uniformly through
/// [`compute_stack_usage`]/[`crate::stack_usage::combine_stack_usage`]; opcodes
/// with no defined usage fall back to [`StackBounds::UNDEFINED`].
pub fn build_stack_bounds_table() -> PropertyMap<StackBounds> {
    PropertyMap::new(|op| stack_bounds_for(op))
}

fn stack_bounds_for(op: OpCode) -> StackBounds {
    match compute_stack_usage(op) {
        Ok(usage) => StackBounds::from_usage(usage.delta, -usage.from),
        Err(_) => StackBounds::UNDEFINED,
    }
}

//! Process-wide pool of reusable [`Stack`] allocations (§4.3, §9).
//!
//! Keyed by nothing at all: every execution just wants *a* empty stack back,
//! not one tied to a particular call depth, so a flat free-list behind a
//! mutex is enough. `new_stack` and `return_stack` are safe to call from any
//! number of concurrently running executions.

use super::Stack;
use lazy_static::lazy_static;
use std::sync::Mutex;

lazy_static! {
    static ref POOL: Mutex<Vec<Stack>> = Mutex::new(Vec::new());
}

/// A handle to the process-wide stack pool, exposed for embedders that want
/// to pre-warm it or inspect its size rather than going through the free
/// functions.
#[derive(Debug, Default, Clone, Copy)]
pub struct StackPool;

impl StackPool {
    /// Number of stacks currently sitting idle in the pool.
    pub fn idle_count(&self) -> usize {
        POOL.lock().expect("stack pool mutex poisoned").len()
    }

    /// Pre-populates the pool with `count` fresh, empty stacks.
    pub fn warm_up(&self, count: usize) {
        let mut pool = POOL.lock().expect("stack pool mutex poisoned");
        pool.reserve(count);
        for _ in 0..count {
            pool.push(Stack::new());
        }
    }
}

/// Takes an empty stack from the pool, allocating a new one if it is empty.
///
/// Always returns an empty stack: a returned stack is cleared before it is
/// placed back in the pool, not before it is handed out, so this is the one
/// place that invariant is enforced regardless of what [`return_stack`]
/// callers do.
pub fn new_stack() -> Stack {
    let mut stack = POOL
        .lock()
        .expect("stack pool mutex poisoned")
        .pop()
        .unwrap_or_default();
    stack.clear();
    stack
}

/// Returns a stack to the pool for reuse, clearing it first.
pub fn return_stack(mut stack: Stack) {
    stack.clear();
    POOL.lock().expect("stack pool mutex poisoned").push(stack);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_stack_is_always_empty() {
        let stack = new_stack();
        assert!(stack.is_empty());
    }

    #[test]
    fn returned_stack_is_cleared_and_reused() {
        let mut stack = new_stack();
        stack.push(alloy_primitives::U256::from(7));
        return_stack(stack);

        let reused = new_stack();
        assert!(reused.is_empty());
    }

    #[test]
    fn warm_up_increases_idle_count() {
        let pool = StackPool;
        let before = pool.idle_count();
        pool.warm_up(3);
        assert!(pool.idle_count() >= before + 3);
        // drain what we just added so other tests aren't affected
        for _ in 0..3 {
            let _ = new_stack();
        }
    }
}

//! Pluggable execution strategies sharing a single `step` contract (§4.6).

mod logging;
mod statistics;

pub use logging::LoggingRunner;
pub use statistics::StatisticsRunner;

use crate::context::{Context, Status};
use crate::error::ExecutionError;

/// The external single-step dispatcher every runner drives.
///
/// Implemented for any `FnMut(&mut Context<H>) -> (Status, Option<ExecutionError>)`
/// so callers can pass a closure, or implement it directly on a richer
/// dispatcher type that needs to carry its own state (an opcode table, a
/// host-state handle borrow, ...).
pub trait Step<H> {
    fn step(&mut self, ctx: &mut Context<'_, H>) -> (Status, Option<ExecutionError>);
}

impl<H, F> Step<H> for F
where
    F: FnMut(&mut Context<'_, H>) -> (Status, Option<ExecutionError>),
{
    fn step(&mut self, ctx: &mut Context<'_, H>) -> (Status, Option<ExecutionError>) {
        self(ctx)
    }
}

/// An execution strategy: plain, logging, or statistics-collecting.
///
/// Modeled as a small trait with a single method rather than a tagged enum,
/// per §9's guidance that no multi-method dispatch is needed here.
pub trait Runner<H> {
    fn run<S: Step<H>>(&mut self, ctx: &mut Context<'_, H>, step: &mut S) -> (Status, Option<ExecutionError>);
}

/// Loops `step` until it returns a non-`Running` status, propagating the
/// first error. No observability beyond the returned status/error.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainRunner;

impl<H> Runner<H> for PlainRunner {
    fn run<S: Step<H>>(&mut self, ctx: &mut Context<'_, H>, step: &mut S) -> (Status, Option<ExecutionError>) {
        loop {
            let (status, err) = step.step(ctx);
            if err.is_some() {
                return (status, err);
            }
            if status != Status::Running {
                return (status, None);
            }
        }
    }
}

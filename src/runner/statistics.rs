//! The statistics runner: n-gram histograms aggregated across concurrent runs (§4.6, §4.7).

use super::{Runner, Step};
use crate::context::{Context, Status};
use crate::error::ExecutionError;
use crate::statistics::{StatsCollector, Statistics};
use lazy_static::lazy_static;
use std::sync::Mutex;

lazy_static! {
    static ref SHARED: Mutex<Statistics> = Mutex::new(Statistics::new());
}

/// Drives `step`, counting opcode n-grams into a process-wide histogram.
///
/// Each `run` builds its own [`StatsCollector`] and merges it into the shared
/// bundle under lock at the end, so concurrent runs never contend on every
/// single step. The opcode at `pc` is counted *before* `step` is called, so
/// a step that faults (out-of-gas, a bad jump target) still has its opcode
/// counted — this is deliberate, not an oversight (§9).
#[derive(Debug, Default, Clone, Copy)]
pub struct StatisticsRunner;

impl StatisticsRunner {
    /// A snapshot of the process-wide summary, formatted for humans.
    pub fn dump_profile() -> String {
        SHARED.lock().expect("statistics mutex poisoned").summary()
    }

    /// Discards all process-wide history.
    pub fn reset_profile() {
        SHARED.lock().expect("statistics mutex poisoned").reset();
    }
}

impl<H> Runner<H> for StatisticsRunner {
    fn run<S: Step<H>>(&mut self, ctx: &mut Context<'_, H>, step: &mut S) -> (Status, Option<ExecutionError>) {
        let mut collector = StatsCollector::new();

        let result = loop {
            if let Some(instr) = ctx.current() {
                collector.next_op(instr.opcode);
            }

            let (status, err) = step.step(ctx);
            if err.is_some() {
                break (status, err);
            }
            if status != Status::Running {
                break (status, None);
            }
        };

        SHARED
            .lock()
            .expect("statistics mutex poisoned")
            .merge(&collector.into_statistics());

        result
    }
}

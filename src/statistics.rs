//! Instruction n-gram histograms and their thread-safe cross-run aggregation (§4.6, §4.7).

use crate::opcode::OpCode;
use std::collections::HashMap;
use std::fmt::Write as _;

/// A bundle of four n-gram histograms (singles/pairs/triples/quads) plus a
/// total step count.
///
/// n-grams are encoded by packing consecutive 16-bit opcodes into a 64-bit
/// key, most-recent opcode in the low 16 bits — uniformly across all four
/// histograms, even though singles and pairs would fit in fewer bits, so one
/// key type serves every map.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Statistics {
    steps: u64,
    single_count: HashMap<u64, u64>,
    pair_count: HashMap<u64, u64>,
    triple_count: HashMap<u64, u64>,
    quad_count: HashMap<u64, u64>,
}

impl Statistics {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.steps == 0
    }

    #[inline]
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Discards all accumulated history.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Folds `other`'s counts into `self`. Commutative: merge order across
    /// concurrently-finishing runs is unspecified, but the final sum is not.
    pub fn merge(&mut self, other: &Statistics) {
        self.steps += other.steps;
        merge_counts(&mut self.single_count, &other.single_count);
        merge_counts(&mut self.pair_count, &other.pair_count);
        merge_counts(&mut self.triple_count, &other.triple_count);
        merge_counts(&mut self.quad_count, &other.quad_count);
    }

    /// Renders the human-readable summary block.
    pub fn summary(&self) -> String {
        let mut out = String::new();
        let _ = write!(out, "\n----- Statistics ------\n");
        let _ = write!(out, "\nSteps: {}\n", self.steps);
        write_section(&mut out, "Singles:", &self.single_count, 1, self.steps);
        write_section(&mut out, "Pairs:", &self.pair_count, 2, self.steps);
        write_section(&mut out, "Triples:", &self.triple_count, 3, self.steps);
        write_section(&mut out, "Quads:", &self.quad_count, 4, self.steps);
        out
    }
}

fn merge_counts(into: &mut HashMap<u64, u64>, from: &HashMap<u64, u64>) {
    for (key, count) in from {
        *into.entry(*key).or_insert(0) += count;
    }
}

fn write_section(out: &mut String, title: &str, counts: &HashMap<u64, u64>, n: usize, total_steps: u64) {
    let _ = writeln!(out, "{title}");
    let mut entries: Vec<(&u64, &u64)> = counts.iter().collect();
    entries.sort_by(|a, b| b.1.cmp(a.1).then(a.0.cmp(b.0)));
    for (key, count) in entries.into_iter().take(5) {
        let label = ngram_label(*key, n);
        let pct = percentage(*count, total_steps);
        let _ = writeln!(out, "\t{label:>30}: {count} ({pct})");
    }
}

fn ngram_label(key: u64, n: usize) -> String {
    (0..n)
        .rev()
        .map(|i| {
            let chunk = ((key >> (i * 16)) & 0xFFFF) as u16;
            OpCode::new(chunk).to_string()
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn percentage(count: u64, total_steps: u64) -> String {
    if total_steps == 0 {
        "+Inf%".to_string()
    } else {
        format!("{:.2}%", count as f64 * 100.0 / total_steps as f64)
    }
}

/// Packs `(secondLast, last, op)`-style windows into n-gram keys and feeds a
/// local [`Statistics`] instance, per the run-local half of the statistics
/// runner (§4.6). Built fresh per `run`, then merged into the process-wide
/// bundle under lock.
#[derive(Clone, Debug, Default)]
pub struct StatsCollector {
    last: u64,
    second_last: u64,
    third_last: u64,
    local: Statistics,
}

impl StatsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one executed opcode and advances the trailing window.
    pub fn next_op(&mut self, op: OpCode) {
        let op = op.get() as u64;
        self.local.steps += 1;
        *self.local.single_count.entry(op).or_insert(0) += 1;

        if self.local.steps >= 2 {
            let key = (self.last << 16) | op;
            *self.local.pair_count.entry(key).or_insert(0) += 1;
        }
        if self.local.steps >= 3 {
            let key = (self.second_last << 32) | (self.last << 16) | op;
            *self.local.triple_count.entry(key).or_insert(0) += 1;
        }
        if self.local.steps >= 4 {
            let key = (self.third_last << 48) | (self.second_last << 32) | (self.last << 16) | op;
            *self.local.quad_count.entry(key).or_insert(0) += 1;
        }

        self.third_last = self.second_last;
        self.second_last = self.last;
        self.last = op;
    }

    /// Consumes the collector, returning the local statistics it gathered.
    pub fn into_statistics(self) -> Statistics {
        self.local
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opcode;

    #[test]
    fn single_stop_run() {
        let mut collector = StatsCollector::new();
        collector.next_op(OpCode::new(opcode::STOP));
        let stats = collector.into_statistics();

        assert_eq!(stats.steps(), 1);
        assert_eq!(stats.pair_count.len(), 0);
        assert_eq!(stats.triple_count.len(), 0);
        assert_eq!(stats.quad_count.len(), 0);

        let summary = stats.summary();
        assert!(summary.contains("Steps: 1\n"));
        assert!(summary.contains("STOP: 1 (100.00%)"));
    }

    #[test]
    fn four_pushes_and_a_stop() {
        let mut collector = StatsCollector::new();
        for _ in 0..3 {
            collector.next_op(OpCode::new(opcode::PUSH1));
        }
        collector.next_op(OpCode::new(opcode::STOP));
        let stats = collector.into_statistics();

        let summary = stats.summary();
        assert!(summary.contains("Steps: 4\n"));
        assert!(summary.contains("PUSH1: 3 (75.00%)"));
        assert!(summary.contains("STOP: 1 (25.00%)"));
        assert!(summary.contains("PUSH1 PUSH1 PUSH1 STOP: 1 (25.00%)"));
    }

    #[test]
    fn merge_is_commutative_in_total() {
        let mut a = Statistics::new();
        let mut collector = StatsCollector::new();
        collector.next_op(OpCode::new(opcode::STOP));
        a.merge(&collector.into_statistics());

        let mut b = Statistics::new();
        let mut collector = StatsCollector::new();
        collector.next_op(OpCode::new(opcode::STOP));
        b.merge(&collector.into_statistics());

        let mut total = Statistics::new();
        total.merge(&a);
        total.merge(&b);
        assert_eq!(total.steps(), 2);
    }

    #[test]
    fn reset_clears_everything() {
        let mut stats = Statistics::new();
        let mut collector = StatsCollector::new();
        collector.next_op(OpCode::new(opcode::STOP));
        stats.merge(&collector.into_statistics());
        assert!(!stats.is_empty());
        stats.reset();
        assert!(stats.is_empty());
    }

    #[test]
    fn empty_statistics_reports_plus_inf_percent() {
        let stats = Statistics::new();
        assert_eq!(percentage(0, 0), "+Inf%");
        assert!(stats.summary().contains("Steps: 0\n"));
    }
}

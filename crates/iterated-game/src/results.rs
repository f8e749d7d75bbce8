//! Round result collection and summary statistics

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::game::{RepetitionResult, RoundResult};

/// Mean payoffs for one round index, averaged over repetitions
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoundPayoffs {
    pub round: u32,
    pub mean_a: f64,
    pub mean_b: f64,
}

/// Summed payoffs for one repetition
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RepetitionTotals {
    pub repetition: u32,
    pub total_a: f64,
    pub total_b: f64,
}

#[derive(Serialize)]
struct Report<'a> {
    results: &'a [RoundResult],
    cooperation_by_round: Vec<(u32, f64)>,
    payoffs_by_round: Vec<RoundPayoffs>,
}

/// Append-only store of every round played
///
/// All statistics are computed from the recorded rows on demand, so they
/// are valid mid-run.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ResultsAggregator {
    results: Vec<RoundResult>,
}

impl ResultsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, result: RoundResult) {
        self.results.push(result);
    }

    pub fn record_repetition(&mut self, repetition: RepetitionResult) {
        self.results.extend(repetition.rounds);
    }

    pub fn results(&self) -> &[RoundResult] {
        &self.results
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Number of distinct repetitions seen
    pub fn repetitions(&self) -> usize {
        self.results
            .iter()
            .map(|r| r.repetition)
            .collect::<BTreeSet<_>>()
            .len()
    }

    /// Fraction of individual choices that cooperated, per round index
    pub fn cooperation_rate_by_round(&self) -> Vec<(u32, f64)> {
        let mut counts: BTreeMap<u32, (u64, u64)> = BTreeMap::new();
        for r in &self.results {
            let entry = counts.entry(r.round).or_default();
            entry.0 += r.cooperators() as u64;
            entry.1 += 2;
        }
        counts
            .into_iter()
            .map(|(round, (cooperated, choices))| (round, cooperated as f64 / choices as f64))
            .collect()
    }

    /// Cooperation fraction over every recorded choice
    pub fn overall_cooperation_rate(&self) -> Option<f64> {
        if self.results.is_empty() {
            return None;
        }
        let cooperated: u64 = self.results.iter().map(|r| r.cooperators() as u64).sum();
        Some(cooperated as f64 / (2 * self.results.len()) as f64)
    }

    /// Per-seat mean payoff, per round index
    pub fn mean_payoffs_by_round(&self) -> Vec<RoundPayoffs> {
        let mut sums: BTreeMap<u32, (f64, f64, u64)> = BTreeMap::new();
        for r in &self.results {
            let entry = sums.entry(r.round).or_insert((0.0, 0.0, 0));
            entry.0 += r.payoff_a;
            entry.1 += r.payoff_b;
            entry.2 += 1;
        }
        sums.into_iter()
            .map(|(round, (a, b, n))| RoundPayoffs {
                round,
                mean_a: a / n as f64,
                mean_b: b / n as f64,
            })
            .collect()
    }

    /// Per-seat payoff totals, per repetition
    pub fn totals_by_repetition(&self) -> Vec<RepetitionTotals> {
        let mut sums: BTreeMap<u32, (f64, f64)> = BTreeMap::new();
        for r in &self.results {
            let entry = sums.entry(r.repetition).or_insert((0.0, 0.0));
            entry.0 += r.payoff_a;
            entry.1 += r.payoff_b;
        }
        sums.into_iter()
            .map(|(repetition, (total_a, total_b))| RepetitionTotals {
                repetition,
                total_a,
                total_b,
            })
            .collect()
    }

    /// Rows plus per-round summaries, for external tabulation or plotting
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&Report {
            results: &self.results,
            cooperation_by_round: self.cooperation_rate_by_round(),
            payoffs_by_round: self.mean_payoffs_by_round(),
        })
    }
}

//! Measurement counts.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Histogram of sampled basis states, keyed by amplitude index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counts {
    counts: FxHashMap<usize, u64>,
}

impl Counts {
    /// Create an empty histogram.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `n` occurrences of `outcome`.
    pub fn insert(&mut self, outcome: usize, n: u64) {
        *self.counts.entry(outcome).or_insert(0) += n;
    }

    /// Number of times `outcome` was observed.
    pub fn get(&self, outcome: usize) -> u64 {
        self.counts.get(&outcome).copied().unwrap_or(0)
    }

    /// Total number of recorded shots.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Number of distinct outcomes observed.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Check if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Dense frequency vector of length `dim`; unseen outcomes are zero.
    pub fn probabilities(&self, dim: usize) -> Vec<f64> {
        let total = self.total();
        let mut probs = vec![0.0; dim];
        if total == 0 {
            return probs;
        }
        for (&outcome, &n) in &self.counts {
            if outcome < dim {
                probs[outcome] = n as f64 / total as f64;
            }
        }
        probs
    }

    /// Outcomes sorted by descending count, ties by index.
    pub fn sorted(&self) -> Vec<(usize, u64)> {
        let mut entries: Vec<_> = self.counts.iter().map(|(&k, &v)| (k, v)).collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        entries
    }
}

impl FromIterator<usize> for Counts {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        let mut counts = Counts::new();
        for outcome in iter {
            counts.insert(outcome, 1);
        }
        counts
    }
}

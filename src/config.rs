//! Configuration for the two-sample report.

use std::env;

use serde::{Deserialize, Serialize};

use crate::analysis::{AsymmetryConfig, PairwiseConfig, ShiftConfig};
use crate::constants::DEFAULT_SEED;
use crate::data::{Family, SampleSpec};
use crate::statistics::counter_rng_seed;

/// One explicit seed per random stage.
///
/// Every stage owns its RNG; no stage draws from another stage's stream, so
/// changing the bootstrap count of one stage leaves the others untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageSeeds {
    /// Sample generation, group 1.
    pub group1: u64,
    /// Sample generation, group 2.
    pub group2: u64,
    /// Shift function bootstrap.
    pub shift: u64,
    /// Pairwise median bootstrap.
    pub pairwise: u64,
    /// Difference asymmetry bootstrap.
    pub asymmetry: u64,
    /// Weighted KS permutations.
    pub weighted_ks: u64,
    /// Horizontal jitter of the strip chart.
    pub jitter: u64,
}

impl StageSeeds {
    /// Derive all stage seeds from a single base seed.
    pub fn from_base(base: u64) -> Self {
        Self {
            group1: counter_rng_seed(base, 0),
            group2: counter_rng_seed(base, 1),
            shift: counter_rng_seed(base, 2),
            pairwise: counter_rng_seed(base, 3),
            asymmetry: counter_rng_seed(base, 4),
            weighted_ks: counter_rng_seed(base, 5),
            jitter: counter_rng_seed(base, 6),
        }
    }
}

impl Default for StageSeeds {
    fn default() -> Self {
        Self::from_base(DEFAULT_SEED)
    }
}

/// Configuration options for [`Report`](crate::Report).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Base seed the stage seeds were derived from.
    pub base_seed: u64,

    /// Per-stage seeds.
    pub seeds: StageSeeds,

    /// Recipe for group 1 (default: t(30) re-centred on 5.001, n = 50).
    pub group1: SampleSpec,

    /// Recipe for group 2 (default: chi-squared(30) re-centred on 5, n = 50).
    pub group2: SampleSpec,

    /// Display names of the two groups.
    pub names: (String, String),

    /// Confidence level of the Welch interval.
    pub conf_level: f64,

    /// Alpha of Cliff's delta interval and of the significance summary.
    pub alpha: f64,

    /// Permutations for the weighted KS test (default: 1,000).
    pub weighted_ks_permutations: usize,

    /// Shift function settings (default: 200 bootstrap samples, Hochberg coverage).
    pub shift: ShiftConfig,

    /// Pairwise-difference settings (default: 1,000 bootstrap samples).
    pub pairwise: PairwiseConfig,

    /// Difference asymmetry settings (default: levels 0.05..=0.40, 100 bootstrap samples).
    pub asymmetry: AsymmetryConfig,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            base_seed: DEFAULT_SEED,
            seeds: StageSeeds::default(),
            group1: SampleSpec {
                family: Family::StudentT { df: 30.0 },
                size: 50,
                target: 5.001,
            },
            group2: SampleSpec {
                family: Family::ChiSquared { df: 30.0 },
                size: 50,
                target: 5.0,
            },
            names: ("Group1".to_string(), "Group2".to_string()),
            conf_level: 0.95,
            alpha: 0.05,
            weighted_ks_permutations: 1_000,
            shift: ShiftConfig::default(),
            pairwise: PairwiseConfig::default(),
            asymmetry: AsymmetryConfig::default(),
        }
    }
}

impl ReportConfig {
    /// Set the base seed and re-derive every stage seed from it.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.base_seed = seed;
        self.seeds = StageSeeds::from_base(seed);
        self
    }

    /// Set the size of both groups.
    pub fn with_sample_size(mut self, n: usize) -> Self {
        self.group1.size = n;
        self.group2.size = n;
        self
    }

    /// Merge overrides from `DIFFASYM_*` environment variables.
    ///
    /// Unset or unparsable variables leave the current value in place.
    pub fn from_env(mut self) -> Self {
        if let Some(seed) = parse_u64_env("DIFFASYM_SEED") {
            self = self.with_seed(seed);
        }
        if let Some(n) = parse_usize_env("DIFFASYM_SAMPLE_SIZE") {
            self = self.with_sample_size(n);
        }
        if let Some(n) = parse_usize_env("DIFFASYM_SHIFT_BOOTSTRAP") {
            self.shift.bootstrap_samples = n;
        }
        if let Some(n) = parse_usize_env("DIFFASYM_PAIRWISE_BOOTSTRAP") {
            self.pairwise.bootstrap_samples = n;
        }
        if let Some(n) = parse_usize_env("DIFFASYM_ASYMMETRY_BOOTSTRAP") {
            self.asymmetry.bootstrap_samples = n;
        }
        if let Some(alpha) = parse_f64_env("DIFFASYM_ALPHA") {
            self.alpha = alpha;
            self.shift.alpha = alpha;
            self.pairwise.alpha = alpha;
            self.asymmetry.alpha = alpha;
        }
        self
    }
}

fn parse_usize_env(key: &str) -> Option<usize> {
    env::var(key).ok()?.parse().ok()
}

fn parse_u64_env(key: &str) -> Option<u64> {
    env::var(key).ok()?.parse().ok()
}

fn parse_f64_env(key: &str) -> Option<f64> {
    env::var(key).ok()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_seeds_are_distinct() {
        let s = StageSeeds::from_base(1);
        let all = [s.group1, s.group2, s.shift, s.pairwise, s.asymmetry, s.weighted_ks, s.jitter];
        for i in 0..all.len() {
            for j in i + 1..all.len() {
                assert_ne!(all[i], all[j]);
            }
        }
    }

    #[test]
    fn test_with_seed_rederives_stages() {
        let config = ReportConfig::default().with_seed(99);
        assert_eq!(config.base_seed, 99);
        assert_eq!(config.seeds, StageSeeds::from_base(99));
        assert_ne!(config.seeds, StageSeeds::default());
    }

    #[test]
    fn test_default_report_recipe() {
        let config = ReportConfig::default();
        assert_eq!(config.group1.size, 50);
        assert_eq!(config.group2.size, 50);
        assert_eq!(config.shift.bootstrap_samples, 200);
        assert_eq!(config.pairwise.bootstrap_samples, 1000);
        assert_eq!(config.asymmetry.bootstrap_samples, 100);
    }
}

//! Report result types.

use serde::{Deserialize, Serialize};

use crate::analysis::{AsymmetryFunction, PairwiseAnalysis, ShiftFunction, TestOutcome};
use crate::config::StageSeeds;

/// Complete numeric output of one report run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportResult {
    /// Descriptive summary of group 1.
    pub group1: GroupSummary,

    /// Descriptive summary of group 2.
    pub group2: GroupSummary,

    /// Classical two-sample tests.
    pub classical: ClassicalTests,

    /// Decile-wise shift function.
    pub shift: ShiftFunction,

    /// Pairwise-difference density, deciles and median interval.
    pub pairwise: PairwiseAnalysis,

    /// Difference asymmetry function.
    pub asymmetry: AsymmetryFunction,

    /// What the tests and functions say, taken together.
    pub interpretation: Interpretation,

    /// Metadata for reproducing the run.
    pub metadata: Metadata,
}

/// Robust descriptive summary of one group (the strip chart markers).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupSummary {
    /// Display name.
    pub name: String,
    /// Number of observations.
    pub n: usize,
    /// Arithmetic mean.
    pub mean: f64,
    /// Harrell–Davis lower quartile.
    pub hd_q1: f64,
    /// Harrell–Davis median.
    pub hd_median: f64,
    /// Harrell–Davis upper quartile.
    pub hd_q3: f64,
}

/// Results of the classical two-sample tests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassicalTests {
    /// Welch's t-test (means).
    pub welch: TestOutcome,
    /// Wilcoxon rank-sum test (ranks).
    pub wilcoxon: TestOutcome,
    /// Cliff's delta (stochastic dominance).
    pub cliffs_delta: TestOutcome,
    /// Kolmogorov–Smirnov test (whole distributions).
    pub ks: TestOutcome,
    /// Tail-weighted Kolmogorov–Smirnov test.
    pub weighted_ks: TestOutcome,
}

/// Qualitative reading of the report at the configured alpha.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interpretation {
    /// Alpha the flags below were evaluated at.
    pub alpha: f64,
    /// Welch's test rejects equal means.
    pub means_differ: bool,
    /// Wilcoxon test rejects equal locations.
    pub ranks_differ: bool,
    /// KS test rejects equal distributions.
    pub distributions_differ: bool,
    /// Deciles whose shift-function interval excludes zero.
    pub shifted_deciles: Vec<f64>,
    /// Asymmetry levels flagged after the Hochberg adjustment.
    pub asymmetric_levels: Vec<f64>,
}

impl Interpretation {
    /// True when the distributions differ but neither location test notices.
    pub fn location_tests_miss_difference(&self) -> bool {
        self.distributions_differ && !self.means_differ && !self.ranks_differ
    }

    /// Human-readable interpretation, one sentence per line.
    pub fn narrative(&self) -> Vec<String> {
        let mut lines = Vec::new();
        let verdict = |yes: bool| if yes { "differ" } else { "do not differ" };
        lines.push(format!(
            "At alpha = {}, the means {} (Welch) and the ranks {} (Wilcoxon).",
            self.alpha,
            verdict(self.means_differ),
            verdict(self.ranks_differ)
        ));
        lines.push(format!(
            "The distributions {} (Kolmogorov-Smirnov).",
            verdict(self.distributions_differ)
        ));
        if self.location_tests_miss_difference() {
            lines.push(
                "The groups share a location but not a shape: \
                 look at the quantiles, not the centre."
                    .to_string(),
            );
        }
        if self.shifted_deciles.is_empty() {
            lines.push("No decile difference excludes zero.".to_string());
        } else {
            lines.push(format!(
                "Decile differences exclude zero at {}.",
                format_levels(&self.shifted_deciles)
            ));
        }
        if self.asymmetric_levels.is_empty() {
            lines.push("The pairwise differences show no significant asymmetry.".to_string());
        } else {
            lines.push(format!(
                "The pairwise differences are asymmetric at q = {} (Hochberg-adjusted).",
                format_levels(&self.asymmetric_levels)
            ));
        }
        lines
    }
}

fn format_levels(levels: &[f64]) -> String {
    levels
        .iter()
        .map(|q| format!("{q:.2}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Metadata for debugging and reproduction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metadata {
    /// Crate version that produced the result.
    pub version: String,
    /// Base seed.
    pub base_seed: u64,
    /// Per-stage seeds.
    pub seeds: StageSeeds,
    /// Whether bootstrap replicates ran on the thread pool.
    pub parallel: bool,
    /// Total runtime in seconds.
    pub runtime_secs: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interpretation() -> Interpretation {
        Interpretation {
            alpha: 0.05,
            means_differ: false,
            ranks_differ: false,
            distributions_differ: true,
            shifted_deciles: vec![0.1, 0.9],
            asymmetric_levels: vec![],
        }
    }

    #[test]
    fn test_location_tests_miss_difference() {
        let mut i = interpretation();
        assert!(i.location_tests_miss_difference());
        i.ranks_differ = true;
        assert!(!i.location_tests_miss_difference());
    }

    #[test]
    fn test_narrative_mentions_levels() {
        let lines = interpretation().narrative();
        assert!(lines.iter().any(|l| l.contains("0.10, 0.90")));
        assert!(lines.iter().any(|l| l.contains("no significant asymmetry")));
    }
}

//! Analysis stages of the two-sample report.
//!
//! 1. **Classical tests** ([`classical`]): Welch, Wilcoxon rank-sum, Cliff's
//!    delta and Kolmogorov–Smirnov (plain and tail-weighted)
//! 2. **Shift function** ([`shift`]): decile differences with simultaneous
//!    bootstrap intervals
//! 3. **Pairwise differences** ([`pairwise`]): density, deciles and median
//!    interval of all g1 − g2 differences
//! 4. **Difference asymmetry** ([`asymmetry`]): q + (1 − q) quantile sums of the
//!    pairwise differences, Hochberg-adjusted
//!
//! [`adjust`] holds the Hochberg step-up shared by the bootstrap stages.

pub mod adjust;
mod asymmetry;
mod classical;
mod pairwise;
mod shift;

pub use adjust::{hochberg, hochberg_critical_values};
pub use asymmetry::{asymmetry_function, AsymmetryConfig, AsymmetryFunction, AsymmetryRow};
pub use classical::{
    cliffs_delta, ks_test, welch_t_test, weighted_ks_test, wilcoxon_rank_sum, TestOutcome,
};
pub use pairwise::{analyze_pairwise, PairwiseAnalysis, PairwiseConfig};
pub use shift::{shift_function, CoverageAdjustment, ShiftConfig, ShiftFunction, ShiftRow};

//! Shift function: decile-by-decile comparison of two groups.
//!
//! For each decile p in {0.1, ..., 0.9} the Harrell–Davis quantiles of both
//! groups are estimated and differenced (group 1 − group 2). Both groups are
//! bootstrapped independently; every replicate yields a full vector of nine
//! differences Δ*, from which the confidence intervals are built.
//!
//! ## Simultaneous coverage
//!
//! By default every interval is a percentile-bootstrap interval whose level
//! follows Hochberg: the decile with the i-th largest bootstrap p-value gets
//! its interval at α/i, so the decile most likely to differ gets the widest
//! interval.
//!
//! [`CoverageAdjustment::MaxStatistic`] is a studentized max-bootstrap
//! instead:
//!
//! M* = max_p |Δ*_p − Δ_p| / se_p
//!
//! and every interval is Δ_p ± c·se_p with c the (1−α) quantile of M*. These
//! intervals are symmetric around the estimate.

use serde::{Deserialize, Serialize};

use crate::analysis::adjust::{hochberg, hochberg_critical_values};
use crate::constants::DECILES;
use crate::error::{ensure_len, Error, Result};
use crate::statistics::{
    bootstrap_p_value, bootstrap_replicates, hd_deciles_with, hd_weight_set, percentile_interval,
    resample_into, sample_quantile, sorted_copy,
};
use crate::types::{QuantileInterval, TwoGroups, Vector9};

/// How the nine decile intervals are made simultaneous.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CoverageAdjustment {
    /// Percentile intervals at Hochberg's sequential levels α/i.
    #[default]
    Hochberg,
    /// Studentized max-bootstrap over the nine deciles.
    MaxStatistic,
    /// Percentile intervals at level α/9.
    Bonferroni,
    /// Percentile intervals at level α (pointwise coverage only).
    Unadjusted,
}

/// Shift function settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShiftConfig {
    /// Bootstrap resamples per group.
    pub bootstrap_samples: usize,
    /// Family-wise error rate of the intervals.
    pub alpha: f64,
    /// Simultaneous coverage method.
    pub adjustment: CoverageAdjustment,
}

impl Default for ShiftConfig {
    fn default() -> Self {
        Self {
            bootstrap_samples: 200,
            alpha: 0.05,
            adjustment: CoverageAdjustment::Hochberg,
        }
    }
}

/// One decile of the shift function.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShiftRow {
    /// Quantile level.
    pub level: f64,
    /// Harrell–Davis decile of group 1 (the x coordinate of the plot).
    pub group1: f64,
    /// Harrell–Davis decile of group 2.
    pub group2: f64,
    /// Difference group 1 − group 2 with its confidence interval.
    pub difference: QuantileInterval,
    /// Bootstrap p-value for "difference = 0".
    pub p_value: f64,
    /// Hochberg-adjusted p-value.
    pub p_adjusted: f64,
    /// `p_adjusted <= alpha`.
    pub significant: bool,
}

/// The full shift function.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShiftFunction {
    /// One row per decile, in increasing order.
    pub rows: Vec<ShiftRow>,
    /// Coverage method used.
    pub adjustment: CoverageAdjustment,
    /// Family-wise alpha.
    pub alpha: f64,
    /// Number of bootstrap replicates.
    pub bootstrap_samples: usize,
    /// Max-statistic critical value, when [`CoverageAdjustment::MaxStatistic`] is used.
    pub critical_value: Option<f64>,
}

impl ShiftFunction {
    /// Rows whose interval excludes zero.
    pub fn excluding_zero(&self) -> impl Iterator<Item = &ShiftRow> {
        self.rows.iter().filter(|r| !r.difference.contains(0.0))
    }
}

fn validate(config: &ShiftConfig) -> Result<()> {
    if config.bootstrap_samples == 0 {
        return Err(Error::InvalidInput(
            "shift function needs at least one bootstrap sample".to_string(),
        ));
    }
    if !(config.alpha > 0.0 && config.alpha < 1.0) {
        return Err(Error::InvalidInput(format!(
            "alpha must be in (0, 1), got {}",
            config.alpha
        )));
    }
    Ok(())
}

/// Compute the shift function of `data` (group 1 − group 2).
///
/// # Errors
///
/// Fails if either group has fewer than 2 observations, or on an invalid
/// bootstrap count or alpha.
pub fn shift_function(data: &TwoGroups, config: &ShiftConfig, seed: u64) -> Result<ShiftFunction> {
    ensure_len("shift function", &data.group1, 2)?;
    ensure_len("shift function", &data.group2, 2)?;
    validate(config)?;

    let g1 = &data.group1;
    let g2 = &data.group2;
    let w1 = hd_weight_set(g1.len(), &DECILES)?;
    let w2 = hd_weight_set(g2.len(), &DECILES)?;

    let q1 = hd_deciles_with(&sorted_copy(g1), &w1);
    let q2 = hd_deciles_with(&sorted_copy(g2), &w2);
    let observed = q1 - q2;

    let replicates: Vec<Vector9> = bootstrap_replicates(
        config.bootstrap_samples,
        seed,
        || (vec![0.0; g1.len()], vec![0.0; g2.len()]),
        |rng, (b1, b2): &mut (Vec<f64>, Vec<f64>)| {
            resample_into(g1, rng, b1);
            resample_into(g2, rng, b2);
            b1.sort_unstable_by(|a, b| a.total_cmp(b));
            b2.sort_unstable_by(|a, b| a.total_cmp(b));
            hd_deciles_with(b1, &w1) - hd_deciles_with(b2, &w2)
        },
    );

    let columns: Vec<Vec<f64>> = (0..DECILES.len())
        .map(|i| replicates.iter().map(|r| r[i]).collect())
        .collect();

    let p_values: Vec<f64> = columns.iter().map(|c| bootstrap_p_value(c)).collect();
    let p_adjusted = hochberg(&p_values);

    let (intervals, critical_value): (Vec<(f64, f64)>, Option<f64>) = match config.adjustment {
        CoverageAdjustment::Hochberg => {
            let levels = hochberg_critical_values(&p_values, config.alpha);
            let bounds = columns
                .iter()
                .zip(&levels)
                .map(|(c, &level)| percentile_interval(c, level))
                .collect();
            (bounds, None)
        }
        CoverageAdjustment::MaxStatistic => {
            let (bounds, c) = max_statistic_intervals(&observed, &replicates, config.alpha);
            (bounds, Some(c))
        }
        CoverageAdjustment::Bonferroni => {
            let level = config.alpha / DECILES.len() as f64;
            let bounds = columns.iter().map(|c| percentile_interval(c, level)).collect();
            (bounds, None)
        }
        CoverageAdjustment::Unadjusted => {
            let bounds = columns
                .iter()
                .map(|c| percentile_interval(c, config.alpha))
                .collect();
            (bounds, None)
        }
    };

    let rows = DECILES
        .iter()
        .enumerate()
        .map(|(i, &level)| ShiftRow {
            level,
            group1: q1[i],
            group2: q2[i],
            difference: QuantileInterval::new(observed[i], intervals[i].0, intervals[i].1),
            p_value: p_values[i],
            p_adjusted: p_adjusted[i],
            significant: p_adjusted[i] <= config.alpha,
        })
        .collect();

    tracing::debug!(
        n1 = g1.len(),
        n2 = g2.len(),
        replicates = config.bootstrap_samples,
        adjustment = ?config.adjustment,
        "shift function computed"
    );

    Ok(ShiftFunction {
        rows,
        adjustment: config.adjustment,
        alpha: config.alpha,
        bootstrap_samples: config.bootstrap_samples,
        critical_value,
    })
}

/// Studentized max-bootstrap intervals `Δ_p ± c·se_p`.
///
/// Deciles with zero bootstrap spread contribute nothing to M* and get a
/// degenerate interval at the estimate.
fn max_statistic_intervals(
    observed: &Vector9,
    replicates: &[Vector9],
    alpha: f64,
) -> (Vec<(f64, f64)>, f64) {
    let b = replicates.len() as f64;
    let mean: Vector9 = replicates.iter().fold(Vector9::zeros(), |acc, r| acc + r) / b;
    let se = Vector9::from_fn(|i, _| {
        if replicates.len() < 2 {
            return 0.0;
        }
        let ss: f64 = replicates.iter().map(|r| (r[i] - mean[i]).powi(2)).sum();
        (ss / (b - 1.0)).sqrt()
    });

    let mut max_stats: Vec<f64> = replicates
        .iter()
        .map(|r| {
            (0..DECILES.len())
                .filter(|&i| se[i] > 0.0)
                .map(|i| (r[i] - observed[i]).abs() / se[i])
                .fold(0.0_f64, f64::max)
        })
        .collect();
    max_stats.sort_unstable_by(|a, b| a.total_cmp(b));
    let critical = sample_quantile(&max_stats, 1.0 - alpha);

    let bounds = (0..DECILES.len())
        .map(|i| {
            let half = critical * se[i];
            (observed[i] - half, observed[i] + half)
        })
        .collect();
    (bounds, critical)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(n: usize, offset: f64) -> Vec<f64> {
        (0..n).map(|i| ((i * 37) % n) as f64 + offset).collect()
    }

    #[test]
    fn test_rows_cover_all_deciles() {
        let data = TwoGroups::new(ramp(40, 0.0), ramp(35, 1.0));
        let config = ShiftConfig {
            bootstrap_samples: 50,
            ..ShiftConfig::default()
        };
        let sf = shift_function(&data, &config, 3).unwrap();
        assert_eq!(sf.rows.len(), 9);
        for (row, &p) in sf.rows.iter().zip(DECILES.iter()) {
            assert_eq!(row.level, p);
            assert!((row.difference.estimate - (row.group1 - row.group2)).abs() < 1e-12);
            assert!(row.difference.lower <= row.difference.estimate);
            assert!(row.difference.estimate <= row.difference.upper);
            assert!(row.p_adjusted >= row.p_value - 1e-15);
        }
        assert_eq!(sf.adjustment, CoverageAdjustment::Hochberg);
        assert!(sf.critical_value.is_none());
    }

    #[test]
    fn test_pure_shift_is_constant() {
        let g1 = ramp(30, 0.0);
        let g2: Vec<f64> = g1.iter().map(|x| x - 2.5).collect();
        let data = TwoGroups::new(g1, g2);
        let sf = shift_function(&data, &ShiftConfig::default(), 11).unwrap();
        for row in &sf.rows {
            assert!((row.difference.estimate - 2.5).abs() < 1e-9);
        }
    }

    #[test]
    fn test_large_shift_excludes_zero_everywhere() {
        let data = TwoGroups::new(ramp(50, 100.0), ramp(50, 0.0));
        for adjustment in [
            CoverageAdjustment::Hochberg,
            CoverageAdjustment::MaxStatistic,
            CoverageAdjustment::Bonferroni,
            CoverageAdjustment::Unadjusted,
        ] {
            let config = ShiftConfig {
                bootstrap_samples: 100,
                adjustment,
                ..ShiftConfig::default()
            };
            let sf = shift_function(&data, &config, 1).unwrap();
            assert_eq!(sf.excluding_zero().count(), 9, "{adjustment:?}");
            assert!(sf.rows.iter().all(|r| r.significant));
        }
    }

    #[test]
    fn test_bonferroni_wider_than_unadjusted() {
        let data = TwoGroups::new(ramp(40, 0.0), ramp(40, 0.0));
        let run = |adjustment| {
            let config = ShiftConfig {
                bootstrap_samples: 200,
                adjustment,
                ..ShiftConfig::default()
            };
            shift_function(&data, &config, 9).unwrap()
        };
        let bonf = run(CoverageAdjustment::Bonferroni);
        let raw = run(CoverageAdjustment::Unadjusted);
        for (b, r) in bonf.rows.iter().zip(&raw.rows) {
            assert!(b.difference.width() >= r.difference.width() - 1e-12);
        }
    }

    #[test]
    fn test_hochberg_levels_sit_between_bonferroni_and_unadjusted() {
        let data = TwoGroups::new(ramp(40, 0.0), ramp(40, 0.8));
        let run = |adjustment| {
            let config = ShiftConfig {
                bootstrap_samples: 200,
                adjustment,
                ..ShiftConfig::default()
            };
            shift_function(&data, &config, 21).unwrap()
        };
        let hoch = run(CoverageAdjustment::Hochberg);
        let bonf = run(CoverageAdjustment::Bonferroni);
        let raw = run(CoverageAdjustment::Unadjusted);

        for ((h, b), r) in hoch.rows.iter().zip(&bonf.rows).zip(&raw.rows) {
            assert!(b.difference.lower <= h.difference.lower);
            assert!(h.difference.lower <= r.difference.lower);
            assert!(r.difference.upper <= h.difference.upper);
            assert!(h.difference.upper <= b.difference.upper);
        }

        // The decile with the largest p-value is tested at alpha itself.
        let max_p = hoch.rows.iter().map(|r| r.p_value).fold(f64::MIN, f64::max);
        let first = hoch.rows.iter().position(|r| r.p_value == max_p).unwrap();
        assert_eq!(hoch.rows[first].difference, raw.rows[first].difference);
    }

    #[test]
    fn test_percentile_intervals_follow_skew() {
        let g1: Vec<f64> = (0..50).map(|i| (((i * 37) % 50) as f64 / 8.0).exp()).collect();
        let g2: Vec<f64> = (0..50).map(|i| ((i * 13) % 50) as f64 * 10.0).collect();
        let data = TwoGroups::new(g1, g2);
        let top = |adjustment| {
            let config = ShiftConfig {
                adjustment,
                ..ShiftConfig::default()
            };
            let sf = shift_function(&data, &config, 1).unwrap();
            let d = sf.rows[8].difference;
            (d.estimate - d.lower, d.upper - d.estimate)
        };

        let (below, above) = top(CoverageAdjustment::MaxStatistic);
        assert!((below - above).abs() < 1e-9 * below.abs().max(1.0));

        let (below, above) = top(CoverageAdjustment::Hochberg);
        assert!((below - above).abs() > 1e-6, "below = {below}, above = {above}");
    }

    #[test]
    fn test_same_seed_same_result() {
        let data = TwoGroups::new(ramp(25, 0.0), ramp(25, 0.3));
        let config = ShiftConfig::default();
        let a = shift_function(&data, &config, 77).unwrap();
        let b = shift_function(&data, &config, 77).unwrap();
        for (x, y) in a.rows.iter().zip(&b.rows) {
            assert_eq!(x.difference, y.difference);
        }
    }

    #[test]
    fn test_rejects_invalid_config() {
        let data = TwoGroups::new(ramp(10, 0.0), ramp(10, 0.0));
        let zero = ShiftConfig {
            bootstrap_samples: 0,
            ..ShiftConfig::default()
        };
        assert!(shift_function(&data, &zero, 0).is_err());
        let tiny = TwoGroups::new(vec![1.0], ramp(10, 0.0));
        assert!(shift_function(&tiny, &ShiftConfig::default(), 0).is_err());
    }
}

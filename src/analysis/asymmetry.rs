//! Difference asymmetry function.
//!
//! For the pairwise differences D = {g1[i] − g2[j]} and a level q < 0.5, the
//! sum of the q and 1−q Harrell–Davis quantiles of D is zero when D is
//! symmetric about zero. Plotted against q, the sums show whether the two
//! groups differ in their tails as well as in location.

use serde::{Deserialize, Serialize};

use crate::analysis::adjust::hochberg;
use crate::constants::ASYMMETRY_LEVELS;
use crate::error::{ensure_len, Error, Result};
use crate::statistics::{
    bootstrap_p_value, bootstrap_replicates, hd_weight_set, pairwise_differences,
    pairwise_differences_into, percentile_interval, resample_into, sorted_copy, HdWeights,
};
use crate::types::QuantileInterval;

/// Difference asymmetry settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AsymmetryConfig {
    /// Lower quantile levels q, each strictly inside (0, 0.5).
    pub levels: Vec<f64>,
    /// Family-wise error rate for the Hochberg step-up.
    pub alpha: f64,
    /// Bootstrap replicates.
    pub bootstrap_samples: usize,
}

impl Default for AsymmetryConfig {
    fn default() -> Self {
        Self {
            levels: ASYMMETRY_LEVELS.to_vec(),
            alpha: 0.05,
            bootstrap_samples: 100,
        }
    }
}

/// One level of the difference asymmetry function.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AsymmetryRow {
    /// Lower quantile level q.
    pub level: f64,
    /// `hd(D, q) + hd(D, 1 - q)` with its unadjusted percentile interval.
    pub sum: QuantileInterval,
    /// Bootstrap p-value for "sum = 0".
    pub p_value: f64,
    /// Hochberg-adjusted p-value.
    pub p_adjusted: f64,
    /// `p_adjusted <= alpha`.
    pub significant: bool,
}

/// The difference asymmetry function over all configured levels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AsymmetryFunction {
    /// One row per level, in configuration order.
    pub rows: Vec<AsymmetryRow>,
    /// Family-wise alpha.
    pub alpha: f64,
    /// Number of bootstrap replicates.
    pub bootstrap_samples: usize,
}

impl AsymmetryFunction {
    /// Number of levels flagged after the Hochberg adjustment.
    pub fn significant_count(&self) -> usize {
        self.rows.iter().filter(|r| r.significant).count()
    }
}

fn validate(config: &AsymmetryConfig) -> Result<()> {
    if config.levels.is_empty() {
        return Err(Error::InvalidInput(
            "difference asymmetry function needs at least one level".to_string(),
        ));
    }
    if let Some(&bad) = config.levels.iter().find(|&&q| !(q > 0.0 && q < 0.5)) {
        return Err(Error::InvalidInput(format!(
            "asymmetry levels must be in (0, 0.5), got {bad}"
        )));
    }
    if !(config.alpha > 0.0 && config.alpha < 1.0) {
        return Err(Error::InvalidInput(format!(
            "alpha must be in (0, 1), got {}",
            config.alpha
        )));
    }
    if config.bootstrap_samples == 0 {
        return Err(Error::InvalidInput(
            "difference asymmetry function needs at least one bootstrap sample".to_string(),
        ));
    }
    Ok(())
}

/// Weight pairs `(q, 1 - q)` for every level.
struct LevelWeights {
    pairs: Vec<(HdWeights, HdWeights)>,
}

impl LevelWeights {
    fn new(n: usize, levels: &[f64]) -> Result<Self> {
        let low = hd_weight_set(n, levels)?;
        let upper_levels: Vec<f64> = levels.iter().map(|q| 1.0 - q).collect();
        let high = hd_weight_set(n, &upper_levels)?;
        Ok(Self {
            pairs: low.into_iter().zip(high).collect(),
        })
    }

    fn sums(&self, sorted: &[f64]) -> Vec<f64> {
        self.pairs
            .iter()
            .map(|(lo, hi)| lo.apply(sorted) + hi.apply(sorted))
            .collect()
    }
}

/// Compute the difference asymmetry function of `g1 - g2`.
///
/// Intervals are percentile intervals at level `1 - alpha` per level, without
/// family-wise adjustment; significance comes from the Hochberg-adjusted
/// bootstrap p-values.
///
/// # Errors
///
/// Fails on groups with fewer than 2 observations, a level outside (0, 0.5),
/// an alpha outside (0, 1) or a zero bootstrap count.
pub fn asymmetry_function(
    g1: &[f64],
    g2: &[f64],
    config: &AsymmetryConfig,
    seed: u64,
) -> Result<AsymmetryFunction> {
    ensure_len("difference asymmetry function", g1, 2)?;
    ensure_len("difference asymmetry function", g2, 2)?;
    validate(config)?;

    let count = g1.len() * g2.len();
    let weights = LevelWeights::new(count, &config.levels)?;
    let observed = weights.sums(&sorted_copy(&pairwise_differences(g1, g2)));

    let replicates: Vec<Vec<f64>> = bootstrap_replicates(
        config.bootstrap_samples,
        seed,
        || (vec![0.0; g1.len()], vec![0.0; g2.len()], Vec::with_capacity(count)),
        |rng, (b1, b2, diffs): &mut (Vec<f64>, Vec<f64>, Vec<f64>)| {
            resample_into(g1, rng, b1);
            resample_into(g2, rng, b2);
            pairwise_differences_into(b1, b2, diffs);
            diffs.sort_unstable_by(|a, b| a.total_cmp(b));
            weights.sums(diffs)
        },
    );

    let columns: Vec<Vec<f64>> = (0..config.levels.len())
        .map(|i| replicates.iter().map(|r| r[i]).collect())
        .collect();
    let p_values: Vec<f64> = columns.iter().map(|c| bootstrap_p_value(c)).collect();
    let p_adjusted = hochberg(&p_values);

    let rows: Vec<AsymmetryRow> = config
        .levels
        .iter()
        .enumerate()
        .map(|(i, &level)| {
            let (lower, upper) = percentile_interval(&columns[i], config.alpha);
            AsymmetryRow {
                level,
                sum: QuantileInterval::new(observed[i], lower, upper),
                p_value: p_values[i],
                p_adjusted: p_adjusted[i],
                significant: p_adjusted[i] <= config.alpha,
            }
        })
        .collect();

    let result = AsymmetryFunction {
        rows,
        alpha: config.alpha,
        bootstrap_samples: config.bootstrap_samples,
    };
    tracing::debug!(
        levels = config.levels.len(),
        replicates = config.bootstrap_samples,
        significant = result.significant_count(),
        "difference asymmetry function computed"
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> AsymmetryConfig {
        AsymmetryConfig {
            bootstrap_samples: 50,
            ..AsymmetryConfig::default()
        }
    }

    #[test]
    fn test_symmetric_differences_sum_to_zero() {
        // g2 is a copy of g1, so every difference set is symmetric about 0.
        let g1: Vec<f64> = (0..20).map(|x| ((x * 7) % 20) as f64).collect();
        let result = asymmetry_function(&g1, &g1, &small_config(), 2).unwrap();
        assert_eq!(result.rows.len(), ASYMMETRY_LEVELS.len());
        for row in &result.rows {
            assert!(row.sum.estimate.abs() < 1e-9, "q={} sum={}", row.level, row.sum.estimate);
            assert!(row.sum.contains(0.0));
        }
    }

    #[test]
    fn test_skewed_group_gives_nonzero_sums() {
        let g1: Vec<f64> = (0..30).map(|x| (x as f64 / 3.0).exp()).collect();
        let g2: Vec<f64> = (0..30).map(|x| x as f64).collect();
        let result = asymmetry_function(&g1, &g2, &small_config(), 6).unwrap();
        assert!(result.rows.iter().any(|r| r.sum.estimate.abs() > 1.0));
        for row in &result.rows {
            assert!(row.p_adjusted >= row.p_value - 1e-15);
            assert!(row.p_adjusted <= 1.0);
        }
    }

    #[test]
    fn test_rejects_levels_outside_open_half_interval() {
        let g: Vec<f64> = (0..10).map(|x| x as f64).collect();
        for bad in [0.0, 0.5, 0.7, -0.1] {
            let config = AsymmetryConfig {
                levels: vec![0.1, bad],
                ..AsymmetryConfig::default()
            };
            assert!(asymmetry_function(&g, &g, &config, 0).is_err(), "{bad}");
        }
    }

    #[test]
    fn test_rows_follow_configured_levels() {
        let g1: Vec<f64> = (0..12).map(|x| x as f64).collect();
        let g2: Vec<f64> = (0..9).map(|x| x as f64 * 1.5).collect();
        let config = AsymmetryConfig {
            levels: vec![0.25, 0.1],
            ..small_config()
        };
        let result = asymmetry_function(&g1, &g2, &config, 1).unwrap();
        assert_eq!(result.rows[0].level, 0.25);
        assert_eq!(result.rows[1].level, 0.1);
    }
}

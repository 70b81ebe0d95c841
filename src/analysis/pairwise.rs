//! Distribution of all pairwise differences between two groups.

use serde::{Deserialize, Serialize};

use crate::constants::{DECILES, MEDIAN_DECILE};
use crate::error::{ensure_len, Error, Result};
use crate::statistics::{
    bootstrap_replicates, gaussian_kde, hd_deciles_with, hd_weight_set, pairwise_differences,
    pairwise_differences_into, percentile_interval, resample_into, sorted_copy, DensityCurve,
    HdWeights,
};
use crate::types::QuantileInterval;

/// Pairwise-difference settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairwiseConfig {
    /// Bootstrap replicates for the median interval.
    pub bootstrap_samples: usize,
    /// Interval level is `1 - alpha`.
    pub alpha: f64,
}

impl Default for PairwiseConfig {
    fn default() -> Self {
        Self {
            bootstrap_samples: 1000,
            alpha: 0.05,
        }
    }
}

/// Kernel density, deciles and median interval of `g1[i] - g2[j]` over all pairs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairwiseAnalysis {
    /// Number of differences (`n1 * n2`).
    pub count: usize,
    /// Gaussian kernel density of the differences.
    pub density: DensityCurve,
    /// Harrell–Davis deciles 0.1..=0.9 of the differences.
    pub deciles: [f64; 9],
    /// Harrell–Davis median of the differences with its bootstrap interval.
    pub median: QuantileInterval,
    /// Bootstrap replicates behind the median interval.
    pub bootstrap_samples: usize,
}

/// Analyse the pairwise differences `g1 - g2`.
///
/// Every pair is kept (n1·n2 differences, no deduplication). The median
/// interval resamples both groups independently and recomputes the full set
/// of differences for every replicate.
pub fn analyze_pairwise(
    g1: &[f64],
    g2: &[f64],
    config: &PairwiseConfig,
    seed: u64,
) -> Result<PairwiseAnalysis> {
    ensure_len("pairwise differences", g1, 2)?;
    ensure_len("pairwise differences", g2, 2)?;
    if config.bootstrap_samples == 0 {
        return Err(Error::InvalidInput(
            "median interval needs at least one bootstrap sample".to_string(),
        ));
    }
    if !(config.alpha > 0.0 && config.alpha < 1.0) {
        return Err(Error::InvalidInput(format!(
            "alpha must be in (0, 1), got {}",
            config.alpha
        )));
    }

    let differences = pairwise_differences(g1, g2);
    let count = differences.len();
    let density = gaussian_kde(&differences)?;

    let weights = hd_weight_set(count, &DECILES)?;
    let deciles = hd_deciles_with(&sorted_copy(&differences), &weights);
    let median_weights: &HdWeights = &weights[MEDIAN_DECILE];

    let replicates = bootstrap_replicates(
        config.bootstrap_samples,
        seed,
        || (vec![0.0; g1.len()], vec![0.0; g2.len()], Vec::with_capacity(count)),
        |rng, (b1, b2, diffs): &mut (Vec<f64>, Vec<f64>, Vec<f64>)| {
            resample_into(g1, rng, b1);
            resample_into(g2, rng, b2);
            pairwise_differences_into(b1, b2, diffs);
            diffs.sort_unstable_by(|a, b| a.total_cmp(b));
            median_weights.apply(diffs)
        },
    );
    let (lower, upper) = percentile_interval(&replicates, config.alpha);
    let median = QuantileInterval::new(deciles[MEDIAN_DECILE], lower, upper);

    tracing::debug!(
        count,
        bandwidth = density.bandwidth,
        median = median.estimate,
        "pairwise differences analysed"
    );

    let mut decile_array = [0.0; 9];
    decile_array.copy_from_slice(deciles.as_slice());

    Ok(PairwiseAnalysis {
        count,
        density,
        deciles: decile_array,
        median,
        bootstrap_samples: config.bootstrap_samples,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_and_bracketing() {
        let g1: Vec<f64> = (0..20).map(|x| (x as f64 * 0.7).sin() + 5.0).collect();
        let g2: Vec<f64> = (0..15).map(|x| (x as f64 * 1.3).cos() + 4.0).collect();
        let config = PairwiseConfig {
            bootstrap_samples: 100,
            ..PairwiseConfig::default()
        };
        let result = analyze_pairwise(&g1, &g2, &config, 4).unwrap();
        assert_eq!(result.count, 300);
        assert!(result.median.lower <= result.median.estimate);
        assert!(result.median.estimate <= result.median.upper);
        assert_eq!(result.deciles[MEDIAN_DECILE], result.median.estimate);
        for w in result.deciles.windows(2) {
            assert!(w[1] >= w[0]);
        }
    }

    #[test]
    fn test_shifted_copy_centres_on_shift() {
        let g1: Vec<f64> = (0..30).map(|x| x as f64).collect();
        let g2: Vec<f64> = g1.iter().map(|x| x - 3.0).collect();
        let config = PairwiseConfig {
            bootstrap_samples: 200,
            ..PairwiseConfig::default()
        };
        let result = analyze_pairwise(&g1, &g2, &config, 8).unwrap();
        // Differences are symmetric around the shift.
        assert!((result.median.estimate - 3.0).abs() < 1e-9);
        assert!(result.median.contains(3.0));
    }

    #[test]
    fn test_requires_two_observations() {
        let config = PairwiseConfig::default();
        assert!(analyze_pairwise(&[1.0], &[1.0, 2.0], &config, 0).is_err());
    }
}

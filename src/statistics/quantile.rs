//! Quantile estimation.
//!
//! Two estimators live here:
//! - [`sample_quantile`]: the classic R-7 linear-interpolation quantile, used
//!   for bandwidth selection and other cheap summaries.
//! - the Harrell–Davis estimator ([`harrell_davis`], [`HdWeights`]): a weighted
//!   average of all order statistics with Beta((n+1)p, (n+1)(1-p)) weights.
//!   It is the estimator behind every quantile shown in the report.
//!
//! Harrell–Davis weights depend only on `n` and `p`, never on the data, so the
//! bootstrap loops build an [`HdWeights`] once and apply it to each sorted
//! resample.

use statrs::function::beta::checked_beta_reg;

use crate::constants::DECILES;
use crate::error::{ensure_len, Error, Result};
use crate::types::Vector9;

/// Sort a copy of `data` in ascending order.
pub fn sorted_copy(data: &[f64]) -> Vec<f64> {
    let mut sorted = data.to_vec();
    sorted.sort_unstable_by(|a, b| a.total_cmp(b));
    sorted
}

/// R-7 quantile of pre-sorted data (linear interpolation between order statistics).
///
/// # Panics
///
/// Panics if `sorted` is empty or if `p` is outside [0, 1].
pub fn sample_quantile(sorted: &[f64], p: f64) -> f64 {
    assert!(!sorted.is_empty(), "Cannot compute quantile of empty slice");
    assert!(
        (0.0..=1.0).contains(&p),
        "Quantile probability must be in [0, 1]"
    );

    let n = sorted.len();
    let h = (n - 1) as f64 * p;
    let h_floor = h.floor() as usize;
    let h_frac = h - h.floor();

    if h_floor >= n - 1 {
        sorted[n - 1]
    } else if h_frac == 0.0 {
        sorted[h_floor]
    } else {
        sorted[h_floor] + h_frac * (sorted[h_floor + 1] - sorted[h_floor])
    }
}

/// Precomputed Harrell–Davis weights for samples of size `n` at level `p`.
#[derive(Debug, Clone)]
pub struct HdWeights {
    weights: Vec<f64>,
}

impl HdWeights {
    /// Compute the weights `W_i = I_{i/n}(a, b) - I_{(i-1)/n}(a, b)`,
    /// with `a = (n+1)p` and `b = (n+1)(1-p)`.
    ///
    /// # Errors
    ///
    /// Fails if `n == 0` or if `p` is not strictly inside (0, 1).
    pub fn new(n: usize, p: f64) -> Result<Self> {
        if n == 0 {
            return Err(Error::InsufficientData {
                what: "Harrell-Davis quantile",
                required: 1,
                actual: 0,
            });
        }
        if !(p > 0.0 && p < 1.0) {
            return Err(Error::InvalidInput(format!(
                "Harrell-Davis quantile level must be in (0, 1), got {p}"
            )));
        }

        let m = (n + 1) as f64;
        let a = m * p;
        let b = m * (1.0 - p);

        let mut weights = Vec::with_capacity(n);
        let mut previous = 0.0;
        for i in 1..=n {
            let cdf = if i == n {
                1.0
            } else {
                checked_beta_reg(a, b, i as f64 / n as f64)
                    .map_err(|e| Error::Distribution(e.to_string()))?
            };
            weights.push(cdf - previous);
            previous = cdf;
        }

        Ok(Self { weights })
    }

    /// Apply the weights to sorted data of the matching length.
    pub fn apply(&self, sorted: &[f64]) -> f64 {
        debug_assert_eq!(sorted.len(), self.weights.len());
        self.weights
            .iter()
            .zip(sorted)
            .map(|(w, x)| w * x)
            .sum()
    }
}

/// Harrell–Davis estimate of the `p` quantile of unsorted `data`.
///
/// # Errors
///
/// Fails on empty data or a level outside (0, 1).
pub fn harrell_davis(data: &[f64], p: f64) -> Result<f64> {
    ensure_len("Harrell-Davis quantile", data, 1)?;
    let weights = HdWeights::new(data.len(), p)?;
    Ok(weights.apply(&sorted_copy(data)))
}

/// Harrell–Davis median.
pub fn hd_median(data: &[f64]) -> Result<f64> {
    harrell_davis(data, 0.5)
}

/// Harrell–Davis weight sets for each of `levels` at sample size `n`.
pub fn hd_weight_set(n: usize, levels: &[f64]) -> Result<Vec<HdWeights>> {
    levels.iter().map(|&p| HdWeights::new(n, p)).collect()
}

/// Harrell–Davis deciles of pre-sorted data using prebuilt weights.
pub fn hd_deciles_with(sorted: &[f64], weights: &[HdWeights]) -> Vector9 {
    debug_assert_eq!(weights.len(), DECILES.len());
    Vector9::from_fn(|i, _| weights[i].apply(sorted))
}

/// Harrell–Davis estimates of all 9 deciles [0.1, ..., 0.9].
pub fn hd_deciles(data: &[f64]) -> Result<Vector9> {
    ensure_len("Harrell-Davis deciles", data, 1)?;
    let weights = hd_weight_set(data.len(), &DECILES)?;
    Ok(hd_deciles_with(&sorted_copy(data), &weights))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_quantile_median() {
        let data = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        assert!((sample_quantile(&data, 0.5) - 3.0).abs() < 1e-10);
        assert!((sample_quantile(&data, 0.0) - 1.0).abs() < 1e-10);
        assert!((sample_quantile(&data, 1.0) - 5.0).abs() < 1e-10);
        assert!((sample_quantile(&data, 0.25) - 2.0).abs() < 1e-10);
    }

    #[test]
    fn test_hd_weights_sum_to_one() {
        for &n in &[1usize, 2, 7, 50, 2500] {
            for &p in &[0.05, 0.3, 0.5, 0.95] {
                let w = HdWeights::new(n, p).unwrap();
                let total: f64 = w.weights.iter().sum();
                assert!((total - 1.0).abs() < 1e-12, "n={n} p={p} sum={total}");
                assert!(w.weights.iter().all(|&x| x >= -1e-15));
            }
        }
    }

    #[test]
    fn test_hd_median_symmetric_data() {
        let data: Vec<f64> = (1..=11).map(|x| x as f64).collect();
        let median = hd_median(&data).unwrap();
        assert!((median - 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_hd_single_observation() {
        assert!((harrell_davis(&[4.2], 0.3).unwrap() - 4.2).abs() < 1e-12);
    }

    #[test]
    fn test_hd_is_translation_equivariant() {
        let data = vec![3.7, 1.2, 9.5, 2.1, 7.3, 4.8, 6.2, 8.9, 1.5, 5.4];
        let shifted: Vec<f64> = data.iter().map(|x| x + 10.0).collect();
        for &p in &DECILES {
            let a = harrell_davis(&data, p).unwrap();
            let b = harrell_davis(&shifted, p).unwrap();
            assert!((b - a - 10.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_hd_deciles_monotone() {
        let data: Vec<f64> = (0..200).map(|x| ((x * 37) % 101) as f64).collect();
        let deciles = hd_deciles(&data).unwrap();
        for i in 1..9 {
            assert!(deciles[i] >= deciles[i - 1]);
        }
    }

    #[test]
    fn test_hd_rejects_bad_level() {
        assert!(harrell_davis(&[1.0, 2.0], 0.0).is_err());
        assert!(harrell_davis(&[1.0, 2.0], 1.0).is_err());
        assert!(harrell_davis(&[], 0.5).is_err());
    }

    #[test]
    #[should_panic(expected = "Cannot compute quantile of empty slice")]
    fn test_empty_slice_panics() {
        sample_quantile(&[], 0.5);
    }
}

//! Gaussian kernel density estimation.

use serde::{Deserialize, Serialize};

use crate::constants::{KDE_CUT, KDE_GRID_POINTS};
use crate::error::{ensure_len, Error, Result};

use super::moments::sample_variance;
use super::quantile::{sample_quantile, sorted_copy};

/// A density curve evaluated on an evenly spaced grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DensityCurve {
    /// Grid positions.
    pub x: Vec<f64>,
    /// Density at each grid position.
    pub y: Vec<f64>,
    /// Kernel bandwidth (standard deviation of the Gaussian kernel).
    pub bandwidth: f64,
}

impl DensityCurve {
    /// Largest density value on the grid.
    pub fn peak(&self) -> f64 {
        self.y.iter().copied().fold(0.0, f64::max)
    }

    /// Trapezoid-rule integral over the grid.
    pub fn integral(&self) -> f64 {
        self.x
            .windows(2)
            .zip(self.y.windows(2))
            .map(|(x, y)| (x[1] - x[0]) * (y[0] + y[1]) / 2.0)
            .sum()
    }
}

/// Silverman's rule-of-thumb bandwidth: `0.9 · min(sd, IQR/1.34) · n^(-1/5)`.
///
/// Falls back to the standard deviation, then `|x₀|`, then 1 when the spread
/// estimates collapse to zero.
pub fn silverman_bandwidth(data: &[f64]) -> Result<f64> {
    ensure_len("bandwidth selection", data, 2)?;

    let sorted = sorted_copy(data);
    let sd = sample_variance(data).sqrt();
    let iqr = sample_quantile(&sorted, 0.75) - sample_quantile(&sorted, 0.25);

    let mut spread = sd.min(iqr / 1.34);
    if spread <= 0.0 {
        spread = sd;
    }
    if spread <= 0.0 {
        spread = data[0].abs();
    }
    if spread <= 0.0 {
        tracing::warn!("degenerate sample for bandwidth selection; using unit spread");
        spread = 1.0;
    }

    Ok(0.9 * spread * (data.len() as f64).powf(-0.2))
}

/// Gaussian KDE with Silverman bandwidth on a grid spanning the data range
/// extended by three bandwidths on each side.
pub fn gaussian_kde(data: &[f64]) -> Result<DensityCurve> {
    let bandwidth = silverman_bandwidth(data)?;
    gaussian_kde_with_bandwidth(data, bandwidth, KDE_GRID_POINTS)
}

/// Gaussian KDE with an explicit bandwidth and grid size.
pub fn gaussian_kde_with_bandwidth(
    data: &[f64],
    bandwidth: f64,
    points: usize,
) -> Result<DensityCurve> {
    ensure_len("kernel density", data, 1)?;
    if !(bandwidth.is_finite() && bandwidth > 0.0) {
        return Err(Error::InvalidInput(format!(
            "bandwidth must be positive and finite, got {bandwidth}"
        )));
    }

    let min = data.iter().copied().fold(f64::INFINITY, f64::min);
    let max = data.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let lo = min - KDE_CUT * bandwidth;
    let hi = max + KDE_CUT * bandwidth;
    let points = points.max(2);
    let step = (hi - lo) / (points - 1) as f64;

    let norm = 1.0 / (data.len() as f64 * bandwidth * (2.0 * std::f64::consts::PI).sqrt());
    let inv_bw = 1.0 / bandwidth;

    let x: Vec<f64> = (0..points).map(|i| lo + step * i as f64).collect();
    let y = x
        .iter()
        .map(|&at| {
            let sum: f64 = data
                .iter()
                .map(|&v| {
                    let z = (at - v) * inv_bw;
                    (-0.5 * z * z).exp()
                })
                .sum();
            sum * norm
        })
        .collect();

    Ok(DensityCurve { x, y, bandwidth })
}

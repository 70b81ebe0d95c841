//! Draw samples from parametric families and re-centre them on a target
//! Harrell–Davis median.

use rand::Rng;
use rand_distr::{ChiSquared, Distribution, LogNormal, Normal, StudentT};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::statistics::hd_median;
use crate::types::TwoGroups;

/// Parametric family a sample is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Family {
    /// Standard normal.
    Normal,
    /// Student's t with `df` degrees of freedom (symmetric, heavier tails).
    StudentT {
        /// Degrees of freedom.
        df: f64,
    },
    /// Chi-squared with `df` degrees of freedom (right-skewed).
    ChiSquared {
        /// Degrees of freedom.
        df: f64,
    },
    /// Log-normal with log-scale `sigma` (right-skewed).
    LogNormal {
        /// Standard deviation of the underlying normal.
        sigma: f64,
    },
}

impl Family {
    /// Short human-readable description.
    pub fn describe(&self) -> String {
        match self {
            Family::Normal => "normal".to_string(),
            Family::StudentT { df } => format!("t(df = {df})"),
            Family::ChiSquared { df } => format!("chi-squared(df = {df})"),
            Family::LogNormal { sigma } => format!("log-normal(sigma = {sigma})"),
        }
    }

    fn draw<R: Rng>(&self, n: usize, rng: &mut R) -> Result<Vec<f64>> {
        let sample = match *self {
            Family::Normal => {
                let dist = Normal::new(0.0, 1.0).map_err(distribution_error)?;
                dist.sample_iter(rng).take(n).collect()
            }
            Family::StudentT { df } => {
                let dist = StudentT::new(df).map_err(distribution_error)?;
                dist.sample_iter(rng).take(n).collect()
            }
            Family::ChiSquared { df } => {
                let dist = ChiSquared::new(df).map_err(distribution_error)?;
                dist.sample_iter(rng).take(n).collect()
            }
            Family::LogNormal { sigma } => {
                let dist = LogNormal::new(0.0, sigma).map_err(distribution_error)?;
                dist.sample_iter(rng).take(n).collect()
            }
        };
        Ok(sample)
    }
}

fn distribution_error<E: std::fmt::Display>(err: E) -> Error {
    Error::Distribution(err.to_string())
}

/// Recipe for one synthetic sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SampleSpec {
    /// Family to draw from.
    pub family: Family,
    /// Number of observations.
    pub size: usize,
    /// Harrell–Davis median of the returned sample.
    pub target: f64,
}

/// Draw `spec.size` values and shift them so their Harrell–Davis median is `spec.target`.
///
/// The same RNG state always yields the same sample.
///
/// # Errors
///
/// Fails if `spec.size < 2` or if the family parameters are invalid.
pub fn generate<R: Rng>(spec: &SampleSpec, rng: &mut R) -> Result<Vec<f64>> {
    if spec.size < 2 {
        return Err(Error::InsufficientData {
            what: "sample generation",
            required: 2,
            actual: spec.size,
        });
    }

    let mut sample = spec.family.draw(spec.size, rng)?;
    let shift = spec.target - hd_median(&sample)?;
    for x in &mut sample {
        *x += shift;
    }
    Ok(sample)
}

/// Generate both groups, each from its own RNG.
pub fn generate_pair<R1: Rng, R2: Rng>(
    spec1: &SampleSpec,
    rng1: &mut R1,
    spec2: &SampleSpec,
    rng2: &mut R2,
) -> Result<TwoGroups> {
    let group1 = generate(spec1, rng1)?;
    let group2 = generate(spec2, rng2)?;
    tracing::debug!(
        n1 = group1.len(),
        n2 = group2.len(),
        "generated {} and {} samples",
        spec1.family.describe(),
        spec2.family.describe()
    );
    Ok(TwoGroups::new(group1, group2))
}

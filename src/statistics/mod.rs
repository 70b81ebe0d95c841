//! Statistical building blocks behind the report.
//!
//! - Harrell–Davis and R-7 quantiles ([`quantile`])
//! - Percentile bootstrap with counter-seeded replicates ([`bootstrap`])
//! - Gaussian kernel density estimation ([`kde`])
//! - Pairwise differences and sample moments

mod bootstrap;
mod kde;
mod moments;
mod pairwise;
mod quantile;

pub use bootstrap::{
    bootstrap_p_value, bootstrap_replicates, counter_rng_seed, percentile_interval,
    resample_into,
};
pub use kde::{gaussian_kde, gaussian_kde_with_bandwidth, silverman_bandwidth, DensityCurve};
pub use moments::{mean, sample_variance};
pub use pairwise::{pairwise_differences, pairwise_differences_into};
pub use quantile::{
    harrell_davis, hd_deciles, hd_deciles_with, hd_median, hd_weight_set, sample_quantile,
    sorted_copy, HdWeights,
};

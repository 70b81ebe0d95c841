//! Percentile bootstrap machinery.
//!
//! Every replicate draws from its own RNG, seeded from the stage seed and the
//! replicate index with [`counter_rng_seed`]. Replicates are collected in index
//! order, so the parallel and sequential builds produce the same replicate
//! vector for the same seed.

use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Counter-based RNG seed generation using SplitMix64.
///
/// Stateless: the seed for replicate `counter` does not depend on which
/// replicates ran before it.
#[inline]
pub fn counter_rng_seed(base_seed: u64, counter: u64) -> u64 {
    // SplitMix64, see https://xoshiro.di.unimi.it/splitmix64.c
    let mut z = base_seed.wrapping_add(counter.wrapping_mul(0x9e3779b97f4a7c15));
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111eb);
    z ^ (z >> 31)
}

/// Resample `data` with replacement into `out` (same length).
///
/// # Panics
///
/// Panics if `out.len() != data.len()`.
pub fn resample_into<R: Rng>(data: &[f64], rng: &mut R, out: &mut [f64]) {
    assert_eq!(
        out.len(),
        data.len(),
        "Output buffer must have same length as input data"
    );

    let n = data.len();
    if n == 0 {
        return;
    }
    for slot in out.iter_mut() {
        *slot = data[rng.random_range(0..n)];
    }
}

/// Run `n_bootstrap` replicates of `statistic`.
///
/// `init` builds per-worker scratch state (buffers, cached weights); it is
/// called once per worker thread, or once in total for sequential builds.
/// `statistic` receives a freshly seeded RNG for each replicate.
#[cfg(feature = "parallel")]
pub fn bootstrap_replicates<S, T, I, F>(
    n_bootstrap: usize,
    seed: u64,
    init: I,
    statistic: F,
) -> Vec<T>
where
    T: Send,
    I: Fn() -> S + Sync + Send,
    F: Fn(&mut Xoshiro256PlusPlus, &mut S) -> T + Sync + Send,
{
    crate::thread_pool::install(|| {
        (0..n_bootstrap)
            .into_par_iter()
            .map_init(&init, |scratch, i| {
                let mut rng = Xoshiro256PlusPlus::seed_from_u64(counter_rng_seed(seed, i as u64));
                statistic(&mut rng, scratch)
            })
            .collect()
    })
}

/// Run `n_bootstrap` replicates of `statistic`.
///
/// `init` builds scratch state once; `statistic` receives a freshly seeded
/// RNG for each replicate.
#[cfg(not(feature = "parallel"))]
pub fn bootstrap_replicates<S, T, I, F>(
    n_bootstrap: usize,
    seed: u64,
    init: I,
    statistic: F,
) -> Vec<T>
where
    I: Fn() -> S,
    F: Fn(&mut Xoshiro256PlusPlus, &mut S) -> T,
{
    crate::thread_pool::install(|| {
        let mut scratch = init();
        (0..n_bootstrap)
            .map(|i| {
                let mut rng = Xoshiro256PlusPlus::seed_from_u64(counter_rng_seed(seed, i as u64));
                statistic(&mut rng, &mut scratch)
            })
            .collect()
    })
}

/// Percentile bounds `(lower, upper)` of a bootstrap distribution at level `1 - alpha`.
///
/// Uses the order statistics `round(alpha/2 · B) + 1` and `B - round(alpha/2 · B)`
/// (1-based). `round` is [`f64::round`], which rounds halves away from zero:
/// for `B = 100` and `alpha = 0.05` this gives the 4th and 97th order
/// statistics, where R's half-to-even `round()` would give the 3rd and 97th.
///
/// # Panics
///
/// Panics if `replicates` is empty.
pub fn percentile_interval(replicates: &[f64], alpha: f64) -> (f64, f64) {
    assert!(!replicates.is_empty(), "Cannot build interval from zero replicates");

    let mut sorted = replicates.to_vec();
    sorted.sort_unstable_by(|a, b| a.total_cmp(b));

    let b = sorted.len();
    let tail = ((alpha / 2.0) * b as f64).round() as usize;
    let low_idx = tail.min(b - 1);
    let high_idx = b.saturating_sub(tail).saturating_sub(1).max(low_idx);

    (sorted[low_idx], sorted[high_idx])
}

/// Two-sided bootstrap p-value for the null hypothesis "statistic = 0".
///
/// `p* = P(T* < 0) + 0.5·P(T* = 0)`, reported as `2·min(p*, 1 - p*)`.
pub fn bootstrap_p_value(replicates: &[f64]) -> f64 {
    if replicates.is_empty() {
        return 1.0;
    }
    let b = replicates.len() as f64;
    let below = replicates.iter().filter(|&&x| x < 0.0).count() as f64;
    let ties = replicates.iter().filter(|&&x| x == 0.0).count() as f64;
    let p_star = (below + 0.5 * ties) / b;
    (2.0 * p_star.min(1.0 - p_star)).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter_seed_differs_per_index() {
        let a = counter_rng_seed(42, 0);
        let b = counter_rng_seed(42, 1);
        assert_ne!(a, b);
        assert_eq!(a, counter_rng_seed(42, 0));
    }

    #[test]
    fn test_resample_preserves_length_and_support() {
        let data: Vec<f64> = (0..100).map(|x| x as f64).collect();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(42);
        let mut resampled = vec![0.0; data.len()];
        resample_into(&data, &mut rng, &mut resampled);
        assert_eq!(resampled.len(), data.len());
        for val in &resampled {
            assert!(data.contains(val));
        }
    }

    #[test]
    fn test_replicates_are_deterministic() {
        let data: Vec<f64> = (0..30).map(|x| x as f64).collect();
        let run = || {
            bootstrap_replicates(
                64,
                7,
                || vec![0.0; data.len()],
                |rng, buf: &mut Vec<f64>| {
                    resample_into(&data, rng, buf);
                    buf.iter().sum::<f64>()
                },
            )
        };
        let first = run();
        let second = run();
        assert_eq!(first.len(), 64);
        assert_eq!(first, second);
    }

    #[test]
    fn test_percentile_interval_bounds() {
        let reps: Vec<f64> = (1..=100).map(|x| x as f64).collect();
        let (lo, hi) = percentile_interval(&reps, 0.05);
        // round(0.025 * 100) = 3 (round half away from zero on 2.5)
        assert_eq!(lo, 4.0);
        assert_eq!(hi, 97.0);
        assert!(lo <= hi);
    }

    #[test]
    fn test_bootstrap_p_value() {
        let all_positive = vec![1.0; 50];
        assert_eq!(bootstrap_p_value(&all_positive), 0.0);

        let centred: Vec<f64> = (-50..50).map(|x| x as f64 + 0.5).collect();
        assert!((bootstrap_p_value(&centred) - 1.0).abs() < 1e-12);
    }
}

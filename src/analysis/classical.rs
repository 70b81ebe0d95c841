//! Classical two-sample tests.
//!
//! These are the reference points the robust analyses are read against:
//! a mean comparison (Welch), a rank comparison (Wilcoxon rank-sum), a
//! dominance effect size (Cliff's delta) and a full-distribution comparison
//! (Kolmogorov–Smirnov, optionally tail-weighted).
//!
//! All tests are two-sided and compare `a` against `b` (positive estimates
//! mean `a` tends to be larger).

use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal, StudentsT};

use crate::error::{ensure_len, Error, Result};
use crate::statistics::{
    bootstrap_replicates, mean, pairwise_differences, sample_quantile, sample_variance,
};

/// Outcome of one classical test.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestOutcome {
    /// Name of the test.
    pub name: String,
    /// How the p-value was obtained (exact, asymptotic, permutation, ...).
    pub method: String,
    /// Test statistic.
    pub statistic: f64,
    /// Two-sided p-value.
    pub p_value: f64,
    /// Point estimate of the effect, when the test has one.
    pub estimate: Option<f64>,
    /// Confidence interval for the estimate, when the test has one.
    pub conf_int: Option<(f64, f64)>,
    /// Degrees of freedom, for t-based tests.
    pub df: Option<f64>,
}

impl TestOutcome {
    /// Whether the test rejects at level `alpha`.
    pub fn is_significant(&self, alpha: f64) -> bool {
        self.p_value < alpha
    }
}

fn standard_normal() -> Result<Normal> {
    Normal::new(0.0, 1.0).map_err(|e| Error::Distribution(e.to_string()))
}

// =============================================================================
// Welch's t-test
// =============================================================================

/// Welch's unequal-variance t-test for a difference in means.
///
/// Degrees of freedom follow Welch–Satterthwaite; the interval is for
/// `mean(a) - mean(b)` at `conf_level`.
pub fn welch_t_test(a: &[f64], b: &[f64], conf_level: f64) -> Result<TestOutcome> {
    ensure_len("Welch t-test", a, 2)?;
    ensure_len("Welch t-test", b, 2)?;
    if !(conf_level > 0.0 && conf_level < 1.0) {
        return Err(Error::InvalidInput(format!(
            "confidence level must be in (0, 1), got {conf_level}"
        )));
    }

    let n1 = a.len() as f64;
    let n2 = b.len() as f64;
    let v1 = sample_variance(a) / n1;
    let v2 = sample_variance(b) / n2;
    let se = (v1 + v2).sqrt();
    if se == 0.0 {
        return Err(Error::InvalidInput("data are essentially constant".to_string()));
    }

    let diff = mean(a) - mean(b);
    let t = diff / se;
    let df = (v1 + v2).powi(2) / (v1.powi(2) / (n1 - 1.0) + v2.powi(2) / (n2 - 1.0));

    let dist = StudentsT::new(0.0, 1.0, df).map_err(|e| Error::Distribution(e.to_string()))?;
    let p_value = (2.0 * dist.sf(t.abs())).min(1.0);
    let crit = dist.inverse_cdf(1.0 - (1.0 - conf_level) / 2.0);

    Ok(TestOutcome {
        name: "Welch two-sample t-test".to_string(),
        method: "t distribution".to_string(),
        statistic: t,
        p_value,
        estimate: Some(diff),
        conf_int: Some((diff - crit * se, diff + crit * se)),
        df: Some(df),
    })
}

// =============================================================================
// Wilcoxon rank-sum test
// =============================================================================

/// Midranks (1-based) of `values`, plus the tie-group sizes.
fn midranks(values: &[f64]) -> (Vec<f64>, Vec<usize>) {
    let n = values.len();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&i, &j| values[i].total_cmp(&values[j]));

    let mut ranks = vec![0.0; n];
    let mut ties = Vec::new();
    let mut i = 0;
    while i < n {
        let mut j = i;
        while j + 1 < n && values[order[j + 1]] == values[order[i]] {
            j += 1;
        }
        // Positions i..=j share the average of ranks i+1..=j+1.
        let rank = (i + j + 2) as f64 / 2.0;
        for &idx in &order[i..=j] {
            ranks[idx] = rank;
        }
        if j > i {
            ties.push(j - i + 1);
        }
        i = j + 1;
    }
    (ranks, ties)
}

/// Null distribution counts of the Mann–Whitney statistic U for sizes
/// `(n1, n2)`: coefficient `u` of the Gaussian binomial `[n1 + n2, n1]_z`.
fn rank_sum_null_counts(n1: usize, n2: usize) -> Vec<u128> {
    let max = n1 * n2;
    let mut counts = vec![0u128; max + 1];
    counts[0] = 1;
    for k in 1..=n1 {
        // Divide by (1 - z^k).
        for i in k..=max {
            counts[i] += counts[i - k];
        }
        // Multiply by (1 - z^(n2 + k)).
        let m = n2 + k;
        for i in (m..=max).rev() {
            counts[i] -= counts[i - m];
        }
    }
    counts
}

/// Wilcoxon rank-sum (Mann–Whitney) test.
///
/// The statistic is `W = sum of ranks of a - n1(n1+1)/2`. The p-value is exact
/// when both samples have fewer than 50 observations and there are no ties;
/// otherwise the normal approximation with tie and continuity corrections is
/// used. The estimate is the Hodges–Lehmann shift (median of all pairwise
/// differences).
pub fn wilcoxon_rank_sum(a: &[f64], b: &[f64]) -> Result<TestOutcome> {
    ensure_len("Wilcoxon rank-sum test", a, 1)?;
    ensure_len("Wilcoxon rank-sum test", b, 1)?;

    let n1 = a.len();
    let n2 = b.len();
    let combined: Vec<f64> = a.iter().chain(b).copied().collect();
    let (ranks, ties) = midranks(&combined);

    let rank_sum: f64 = ranks[..n1].iter().sum();
    let w = rank_sum - (n1 * (n1 + 1)) as f64 / 2.0;

    let mut diffs = pairwise_differences(a, b);
    diffs.sort_unstable_by(|x, y| x.total_cmp(y));
    let hodges_lehmann = sample_quantile(&diffs, 0.5);

    let exact = n1 < 50 && n2 < 50 && ties.is_empty();
    let p_value = if exact {
        let counts = rank_sum_null_counts(n1, n2);
        let total: u128 = counts.iter().sum();
        let w_int = w.round() as usize;
        let cdf = |u: usize| -> f64 {
            let below: u128 = counts[..=u.min(counts.len() - 1)].iter().sum();
            below as f64 / total as f64
        };
        let half = (n1 * n2) as f64 / 2.0;
        let one_sided = if w > half {
            // P(U >= w)
            1.0 - if w_int == 0 { 0.0 } else { cdf(w_int - 1) }
        } else {
            cdf(w_int)
        };
        (2.0 * one_sided).min(1.0)
    } else {
        let nf1 = n1 as f64;
        let nf2 = n2 as f64;
        let n = nf1 + nf2;
        let tie_term: f64 = ties
            .iter()
            .map(|&t| {
                let t = t as f64;
                t * t * t - t
            })
            .sum::<f64>()
            / (n * (n - 1.0));
        let sigma = ((nf1 * nf2 / 12.0) * ((n + 1.0) - tie_term)).sqrt();
        if sigma == 0.0 {
            return Err(Error::InvalidInput(
                "rank-sum variance is zero (all values tied)".to_string(),
            ));
        }
        let centred = w - nf1 * nf2 / 2.0;
        let correction = if centred == 0.0 { 0.0 } else { 0.5 * centred.signum() };
        let z = (centred - correction) / sigma;
        let normal = standard_normal()?;
        (2.0 * normal.cdf(z).min(normal.sf(z))).min(1.0)
    };

    Ok(TestOutcome {
        name: "Wilcoxon rank-sum test".to_string(),
        method: if exact {
            "exact".to_string()
        } else {
            "normal approximation with continuity correction".to_string()
        },
        statistic: w,
        p_value,
        estimate: Some(hodges_lehmann),
        conf_int: None,
        df: None,
    })
}

// =============================================================================
// Cliff's delta
// =============================================================================

/// Cliff's delta, `P(a > b) - P(a < b)`, with Cliff's confidence interval.
///
/// The variance estimate is Cliff's consistent estimator, floored at
/// `(1 - d²) / (n1·n2 - 1)`; the p-value is from the normal approximation of
/// `d / se`.
pub fn cliffs_delta(a: &[f64], b: &[f64], alpha: f64) -> Result<TestOutcome> {
    ensure_len("Cliff's delta", a, 2)?;
    ensure_len("Cliff's delta", b, 2)?;
    if !(alpha > 0.0 && alpha < 1.0) {
        return Err(Error::InvalidInput(format!("alpha must be in (0, 1), got {alpha}")));
    }

    let n1 = a.len();
    let n2 = b.len();
    let sign = |x: f64, y: f64| -> f64 {
        if x > y {
            1.0
        } else if x < y {
            -1.0
        } else {
            0.0
        }
    };

    let mut row_means = vec![0.0; n1];
    let mut col_means = vec![0.0; n2];
    let mut total = 0.0;
    for (i, &x) in a.iter().enumerate() {
        for (j, &y) in b.iter().enumerate() {
            let s = sign(x, y);
            row_means[i] += s;
            col_means[j] += s;
            total += s;
        }
    }
    let nf1 = n1 as f64;
    let nf2 = n2 as f64;
    let d = total / (nf1 * nf2);
    row_means.iter_mut().for_each(|m| *m /= nf2);
    col_means.iter_mut().for_each(|m| *m /= nf1);

    let ss_rows: f64 = row_means.iter().map(|m| (m - d).powi(2)).sum();
    let ss_cols: f64 = col_means.iter().map(|m| (m - d).powi(2)).sum();
    let ss_cells: f64 = a
        .iter()
        .flat_map(|&x| b.iter().map(move |&y| (sign(x, y) - d).powi(2)))
        .sum();

    let raw_var = (nf2 * nf2 * ss_rows + nf1 * nf1 * ss_cols - ss_cells)
        / (nf1 * nf2 * (nf1 - 1.0) * (nf2 - 1.0));
    let floor = (1.0 - d * d) / (nf1 * nf2 - 1.0);
    let var = raw_var.max(floor);

    let normal = standard_normal()?;
    let z = normal.inverse_cdf(1.0 - alpha / 2.0);

    let (conf_int, p_value) = if var <= 0.0 {
        ((d, d), if d == 0.0 { 1.0 } else { 0.0 })
    } else {
        let se = var.sqrt();
        let root = ((1.0 - d * d).powi(2) + z * z * var).sqrt();
        let denom = 1.0 - d * d + z * z * var;
        let lower = (d - d.powi(3) - z * se * root) / denom;
        let upper = (d - d.powi(3) + z * se * root) / denom;
        let stat = d / se;
        ((lower.max(-1.0), upper.min(1.0)), (2.0 * normal.sf(stat.abs())).min(1.0))
    };

    Ok(TestOutcome {
        name: "Cliff's delta".to_string(),
        method: "Cliff's variance, normal approximation".to_string(),
        statistic: d,
        p_value,
        estimate: Some(d),
        conf_int: Some(conf_int),
        df: None,
    })
}

// =============================================================================
// Kolmogorov–Smirnov
// =============================================================================

/// Largest absolute ECDF difference, with an optional per-point weight
/// `g(F1, F2, H)` where `H` is the pooled ECDF.
fn ecdf_sup<W>(a: &[f64], b: &[f64], weight: W) -> f64
where
    W: Fn(f64, f64, f64) -> Option<f64>,
{
    let mut s1 = a.to_vec();
    let mut s2 = b.to_vec();
    s1.sort_unstable_by(|x, y| x.total_cmp(y));
    s2.sort_unstable_by(|x, y| x.total_cmp(y));

    let n1 = s1.len() as f64;
    let n2 = s2.len() as f64;
    let (mut i, mut j) = (0usize, 0usize);
    let mut sup = 0.0f64;

    while i < s1.len() || j < s2.len() {
        let next = match (s1.get(i), s2.get(j)) {
            (Some(&x), Some(&y)) => x.min(y),
            (Some(&x), None) => x,
            (None, Some(&y)) => y,
            (None, None) => break,
        };
        while i < s1.len() && s1[i] <= next {
            i += 1;
        }
        while j < s2.len() && s2[j] <= next {
            j += 1;
        }
        let f1 = i as f64 / n1;
        let f2 = j as f64 / n2;
        let h = (i + j) as f64 / (n1 + n2);
        if let Some(value) = weight(f1, f2, h) {
            sup = sup.max(value);
        }
    }
    sup
}

fn has_ties(a: &[f64], b: &[f64]) -> bool {
    let mut all: Vec<f64> = a.iter().chain(b).copied().collect();
    all.sort_unstable_by(|x, y| x.total_cmp(y));
    all.windows(2).any(|w| w[0] == w[1])
}

/// Exact `P(D < d)` for the two-sided two-sample statistic without ties
/// (lattice-path recursion).
fn smirnov_exact_cdf(d: f64, n1: usize, n2: usize) -> f64 {
    let (m, n) = if n1 > n2 { (n2, n1) } else { (n1, n2) };
    let md = m as f64;
    let nd = n as f64;
    let q = (0.5 + (d * md * nd - 1e-7).floor()) / (md * nd);

    let mut u: Vec<f64> = (0..=n)
        .map(|j| if j as f64 / nd > q { 0.0 } else { 1.0 })
        .collect();
    for i in 1..=m {
        let w = i as f64 / (i + n) as f64;
        let x = i as f64 / md;
        u[0] = if x > q { 0.0 } else { w * u[0] };
        for j in 1..=n {
            u[j] = if (x - j as f64 / nd).abs() > q {
                0.0
            } else {
                w * u[j] + u[j - 1]
            };
        }
    }
    u[n]
}

/// Survival function of the Kolmogorov distribution,
/// `2 Σ (-1)^(k-1) exp(-2 k² z²)`.
fn kolmogorov_sf(z: f64) -> f64 {
    if z <= 0.0 {
        return 1.0;
    }
    if z > 3.0 {
        return (2.0 * (-2.0 * z * z).exp()).clamp(0.0, 1.0);
    }

    let mut p = 0.0;
    for k in 1..=100 {
        let term = (-2.0 * (k as f64).powi(2) * z * z).exp();
        if k % 2 == 1 {
            p += term;
        } else {
            p -= term;
        }
        if term < 1e-12 {
            break;
        }
    }
    (2.0 * p).clamp(0.0, 1.0)
}

/// Two-sample Kolmogorov–Smirnov test, `D = sup |F_a - F_b|`.
///
/// Exact p-value when `n1·n2 < 10 000` and there are no ties, asymptotic
/// Kolmogorov distribution otherwise.
pub fn ks_test(a: &[f64], b: &[f64]) -> Result<TestOutcome> {
    ensure_len("Kolmogorov-Smirnov test", a, 1)?;
    ensure_len("Kolmogorov-Smirnov test", b, 1)?;

    let d = ecdf_sup(a, b, |f1, f2, _| Some((f1 - f2).abs()));
    let n1 = a.len();
    let n2 = b.len();

    let exact = n1 * n2 < 10_000 && !has_ties(a, b);
    let p_value = if exact {
        (1.0 - smirnov_exact_cdf(d, n1, n2)).clamp(0.0, 1.0)
    } else {
        let scale = ((n1 * n2) as f64 / (n1 + n2) as f64).sqrt();
        kolmogorov_sf(d * scale)
    };

    Ok(TestOutcome {
        name: "Two-sample Kolmogorov-Smirnov test".to_string(),
        method: if exact { "exact" } else { "asymptotic" }.to_string(),
        statistic: d,
        p_value,
        estimate: None,
        conf_int: None,
        df: None,
    })
}

fn weighted_ks_statistic(a: &[f64], b: &[f64]) -> f64 {
    let scale = ((a.len() * b.len()) as f64 / (a.len() + b.len()) as f64).sqrt();
    scale
        * ecdf_sup(a, b, |f1, f2, h| {
            let var = h * (1.0 - h);
            (var > 0.0).then(|| (f1 - f2).abs() / var.sqrt())
        })
}

/// Tail-weighted Kolmogorov–Smirnov test.
///
/// Each ECDF gap is divided by `sqrt(H(1 - H))` (pooled ECDF `H`), which
/// up-weights discrepancies in the tails. The p-value comes from
/// `permutations` random relabelings of the pooled sample, each seeded from
/// `seed` and its index.
pub fn weighted_ks_test(
    a: &[f64],
    b: &[f64],
    permutations: usize,
    seed: u64,
) -> Result<TestOutcome> {
    ensure_len("weighted Kolmogorov-Smirnov test", a, 1)?;
    ensure_len("weighted Kolmogorov-Smirnov test", b, 1)?;
    if permutations == 0 {
        return Err(Error::InvalidInput(
            "weighted KS test needs at least one permutation".to_string(),
        ));
    }

    let observed = weighted_ks_statistic(a, b);
    let n1 = a.len();
    let pooled: Vec<f64> = a.iter().chain(b).copied().collect();

    let null_stats = bootstrap_replicates(
        permutations,
        seed,
        || pooled.clone(),
        |rng, buf: &mut Vec<f64>| {
            buf.copy_from_slice(&pooled);
            buf.shuffle(rng);
            let (left, right) = buf.split_at(n1);
            weighted_ks_statistic(left, right)
        },
    );
    let exceed = null_stats.iter().filter(|&&s| s >= observed - 1e-12).count();
    let p_value = (exceed + 1) as f64 / (permutations + 1) as f64;

    Ok(TestOutcome {
        name: "Weighted Kolmogorov-Smirnov test".to_string(),
        method: format!("permutation ({permutations} relabelings)"),
        statistic: observed,
        p_value,
        estimate: None,
        conf_int: None,
        df: None,
    })
}

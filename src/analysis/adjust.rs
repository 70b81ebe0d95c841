//! Family-wise error control for a set of p-values.
//!
//! Hochberg's step-up procedure: with p-values sorted in decreasing order
//! `p(1) >= p(2) >= ... >= p(m)`, the adjusted value of the i-th largest is
//! `min_{j <= i} ( j · p(j) )`, capped at 1. A hypothesis is rejected at
//! family-wise level `alpha` when its adjusted p-value is at most `alpha`,
//! which is the same as comparing `p(i)` with `alpha / i`.

/// Hochberg-adjusted p-values, returned in the input order.
pub fn hochberg(p_values: &[f64]) -> Vec<f64> {
    let m = p_values.len();
    let mut order: Vec<usize> = (0..m).collect();
    // Largest first; ties keep input order.
    order.sort_by(|&a, &b| p_values[b].total_cmp(&p_values[a]));

    let mut adjusted = vec![0.0; m];
    let mut running_min = f64::INFINITY;
    for (rank, &idx) in order.iter().enumerate() {
        let candidate = (rank + 1) as f64 * p_values[idx];
        running_min = running_min.min(candidate);
        adjusted[idx] = running_min.min(1.0);
    }
    adjusted
}

/// Critical p-value thresholds `alpha / i` in Hochberg's sequential form,
/// aligned with the input order (the largest p-value gets `alpha`).
pub fn hochberg_critical_values(p_values: &[f64], alpha: f64) -> Vec<f64> {
    let m = p_values.len();
    let mut order: Vec<usize> = (0..m).collect();
    order.sort_by(|&a, &b| p_values[b].total_cmp(&p_values[a]));

    let mut critical = vec![0.0; m];
    for (rank, &idx) in order.iter().enumerate() {
        critical[idx] = alpha / (rank + 1) as f64;
    }
    critical
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_step_up_definition() {
        let p = [0.01, 0.04, 0.03, 0.005];
        let adj = hochberg(&p);
        // Sorted decreasing: 0.04 (x1), 0.03 (x2), 0.01 (x3), 0.005 (x4)
        // running min: 0.04, 0.04, 0.03, 0.02
        let expected = [0.03, 0.04, 0.04, 0.02];
        for (a, e) in adj.iter().zip(expected) {
            assert!((a - e).abs() < 1e-12, "{adj:?}");
        }
    }

    #[test]
    fn test_adjusted_bounds() {
        let p = [0.2, 0.5, 0.9, 0.001, 0.04];
        let adj = hochberg(&p);
        for (raw, a) in p.iter().zip(&adj) {
            assert!(a >= raw);
            assert!(*a <= 1.0);
        }
    }

    #[test]
    fn test_rejections_agree_with_critical_values() {
        let p = [0.012, 0.3, 0.02, 0.0001, 0.045];
        let alpha = 0.05;
        let crit = hochberg_critical_values(&p, alpha);
        let reject: Vec<bool> = hochberg(&p).into_iter().map(|a| a <= alpha).collect();

        // Step-up: find the largest-p position where p <= alpha / i, reject it
        // and everything smaller.
        let mut order: Vec<usize> = (0..p.len()).collect();
        order.sort_by(|&a, &b| p[b].total_cmp(&p[a]));
        let cutoff = order.iter().position(|&i| p[i] <= crit[i]);
        for (rank, &idx) in order.iter().enumerate() {
            let expected = cutoff.is_some_and(|c| rank >= c);
            assert_eq!(reject[idx], expected, "index {idx}");
        }
    }

    #[test]
    fn test_empty_input() {
        assert!(hochberg(&[]).is_empty());
    }
}

//! All-pairs differences between two samples.

/// Every `a[i] - b[j]`, row-major in `i`. Length is exactly `a.len() * b.len()`.
pub fn pairwise_differences(a: &[f64], b: &[f64]) -> Vec<f64> {
    let mut out = Vec::with_capacity(a.len() * b.len());
    pairwise_differences_into(a, b, &mut out);
    out
}

/// Same as [`pairwise_differences`], reusing `out` as the buffer.
pub fn pairwise_differences_into(a: &[f64], b: &[f64], out: &mut Vec<f64>) {
    out.clear();
    for &x in a {
        out.extend(b.iter().map(|&y| x - y));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_is_product() {
        let a: Vec<f64> = (0..50).map(|x| x as f64).collect();
        let b: Vec<f64> = (0..37).map(|x| x as f64 * 0.5).collect();
        assert_eq!(pairwise_differences(&a, &b).len(), 50 * 37);
    }

    #[test]
    fn test_order_and_duplicates_kept() {
        let diffs = pairwise_differences(&[1.0, 2.0], &[1.0, 1.0]);
        assert_eq!(diffs, vec![0.0, 0.0, 1.0, 1.0]);
    }
}

//! Limited multi-label projection
//!
//! `lml(v, k)` maps scores to weights in `[0, 1]` that sum to `k`:
//! `w_i = sigmoid(v_i + nu)`, with `nu` found by bisection. It is a smooth
//! stand-in for the indicator of the `k` largest scores (Amos, Koltun and
//! Kolter, "The limited multi-label projection layer", 2019).

use ndarray::Array1;

const BRACKET: f64 = 40.0;
const ITERATIONS: usize = 100;

fn sigmoid(t: f64) -> f64 {
    if t >= 0.0 {
        1.0 / (1.0 + (-t).exp())
    } else {
        let e = t.exp();
        e / (1.0 + e)
    }
}

/// Soft top-`k` weights of `v`
///
/// `k >= v.len()` selects everything; `k == 0` selects nothing.
pub fn lml(v: &Array1<f64>, k: usize) -> Array1<f64> {
    let n = v.len();
    if k >= n {
        return Array1::ones(n);
    }
    if k == 0 {
        return Array1::zeros(n);
    }
    let target = k as f64;
    let v_max = v.fold(f64::NEG_INFINITY, |a, &b| a.max(b));
    let v_min = v.fold(f64::INFINITY, |a, &b| a.min(b));

    // the sum is increasing in nu: ~0 at `lo`, ~n at `hi`
    let mut lo = -v_max - BRACKET;
    let mut hi = -v_min + BRACKET;
    for _ in 0..ITERATIONS {
        let mid = 0.5 * (lo + hi);
        let total: f64 = v.iter().map(|&x| sigmoid(x + mid)).sum();
        if total < target {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    let nu = 0.5 * (lo + hi);
    v.mapv(|x| sigmoid(x + nu))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_weights_sum_to_k() {
        let v = Array1::from_vec(vec![3.0, -1.0, 0.5, 2.0, -4.0, 0.0, 1.0]);
        for k in 1..v.len() {
            let w = lml(&v, k);
            assert_abs_diff_eq!(w.sum(), k as f64, epsilon = 1e-8);
            assert!(w.iter().all(|&x| (0.0..=1.0).contains(&x)));
        }
    }

    #[test]
    fn test_order_preserved() {
        let v = Array1::from_vec(vec![0.1, 5.0, -2.0, 1.0]);
        let w = lml(&v, 2);
        assert!(w[1] > w[3] && w[3] > w[0] && w[0] > w[2]);
    }

    #[test]
    fn test_well_separated_scores_are_hard() {
        let v = Array1::from_vec(vec![100.0, -100.0, 90.0, -90.0]);
        let w = lml(&v, 2);
        assert_abs_diff_eq!(w[0], 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(w[2], 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(w[1], 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_degenerate_k() {
        let v = Array1::from_vec(vec![1.0, 2.0]);
        assert_eq!(lml(&v, 2), Array1::<f64>::ones(2));
        assert_eq!(lml(&v, 5), Array1::<f64>::ones(2));
        assert_eq!(lml(&v, 0), Array1::<f64>::zeros(2));
    }
}

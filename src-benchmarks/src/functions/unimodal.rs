//! Unimodal test functions
//!
//! Single global optimum, mostly ill-conditioned quadratics and their
//! relatives. They measure how well an optimizer learns scale and
//! correlation of the search space.

use ndarray::Array1;

/// Linearly spaced exponents `0, 1/(n-1), ..., 1` used by the ill-conditioned
/// functions; a single dimension gets exponent 0.
pub(crate) fn unit_ramp(n: usize) -> impl Iterator<Item = f64> {
    (0..n).map(move |i| if n > 1 { i as f64 / (n - 1) as f64 } else { 0.0 })
}

/// Sphere function
/// Global minimum: f(x) = 0 at x = (0, 0, ..., 0)
/// Bounds: x_i in [-10, 10]
pub fn sphere(x: &Array1<f64>) -> f64 {
    x.iter().map(|&xi| xi * xi).sum()
}

/// Cigar function - one well-conditioned axis, all others scaled by 1e6
/// Global minimum: f(x) = 0 at x = (0, 0, ..., 0)
pub fn cigar(x: &Array1<f64>) -> f64 {
    let head = x[0] * x[0];
    let tail: f64 = x.iter().skip(1).map(|&xi| xi * xi).sum();
    head + 1e6 * tail
}

/// Discus (tablet) function - first axis scaled by 1e6
/// Global minimum: f(x) = 0 at x = (0, 0, ..., 0)
pub fn discus(x: &Array1<f64>) -> f64 {
    let head = x[0] * x[0];
    let tail: f64 = x.iter().skip(1).map(|&xi| xi * xi).sum();
    1e6 * head + tail
}

/// Cigar-discus function - first axis 1, middle axes 1e4, last axis 1e6
///
/// In two dimensions the middle term degenerates to the squared norm of `x`.
/// Global minimum: f(x) = 0 at x = (0, 0, ..., 0)
pub fn cigar_discus(x: &Array1<f64>) -> f64 {
    let n = x.len();
    let sq = x.mapv(|xi| xi * xi);
    if n == 2 {
        sq[0] + 1e4 * sq.sum() + 1e6 * sq[1]
    } else {
        let middle: f64 = sq.iter().skip(1).take(n.saturating_sub(2)).sum();
        sq[0] + 1e4 * middle + 1e6 * sq[n - 1]
    }
}

/// Ellipsoid function - axis weights from 1 to 1e6 on a log scale
/// Global minimum: f(x) = 0 at x = (0, 0, ..., 0)
pub fn ellipsoid(x: &Array1<f64>) -> f64 {
    x.iter()
        .zip(unit_ramp(x.len()))
        .map(|(&xi, t)| 10f64.powf(6.0 * t) * xi * xi)
        .sum()
}

/// Different powers function - exponents from 2 to 6
/// Global minimum: f(x) = 0 at x = (0, 0, ..., 0)
pub fn different_powers(x: &Array1<f64>) -> f64 {
    x.iter()
        .zip(unit_ramp(x.len()))
        .map(|(&xi, t)| xi.abs().powf(2.0 + 4.0 * t))
        .sum()
}

/// Schwefel 2.21 function - largest absolute coordinate
/// Global minimum: f(x) = 0 at x = (0, 0, ..., 0)
pub fn schwefel221(x: &Array1<f64>) -> f64 {
    x.iter().fold(0.0, |acc, &xi| acc.max(xi.abs()))
}

/// Step function - plateaus, discontinuous
/// Global minimum: f(x) = 0 for every x_i in [-0.5, 0.5)
pub fn step(x: &Array1<f64>) -> f64 {
    x.iter().map(|&xi| (xi + 0.5).floor().powi(2)).sum()
}

/// Schwefel 2.22 function - sum plus product of absolute values
/// Global minimum: f(x) = 0 at x = (0, 0, ..., 0)
pub fn schwefel222(x: &Array1<f64>) -> f64 {
    let sum: f64 = x.iter().map(|xi| xi.abs()).sum();
    let prod: f64 = x.iter().map(|xi| xi.abs()).product();
    sum + prod
}

/// Rosenbrock function - curved narrow valley
/// Global minimum: f(x) = 0 at x = (1, 1, ..., 1)
/// Bounds: x_i in [-5, 10]
pub fn rosenbrock(x: &Array1<f64>) -> f64 {
    x.iter()
        .zip(x.iter().skip(1))
        .map(|(&xi, &xn)| 100.0 * (xn - xi * xi).powi(2) + (xi - 1.0).powi(2))
        .sum()
}

/// Schwefel 1.2 function - squared partial sums, fully non-separable
/// Global minimum: f(x) = 0 at x = (0, 0, ..., 0)
pub fn schwefel12(x: &Array1<f64>) -> f64 {
    let mut partial = 0.0;
    let mut total = 0.0;
    for &xi in x.iter() {
        partial += xi;
        total += partial * partial;
    }
    total
}

/// Exponential function
/// Global minimum: f(x) = -1 at x = (0, 0, ..., 0)
pub fn exponential(x: &Array1<f64>) -> f64 {
    -(-0.5 * sphere(x)).exp()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ramp_endpoints() {
        let r: Vec<f64> = unit_ramp(3).collect();
        assert_eq!(r, vec![0.0, 0.5, 1.0]);
        let r: Vec<f64> = unit_ramp(1).collect();
        assert_eq!(r, vec![0.0]);
    }

    #[test]
    fn test_ill_conditioned_weights() {
        let e0 = Array1::from_vec(vec![1.0, 0.0, 0.0]);
        let e2 = Array1::from_vec(vec![0.0, 0.0, 1.0]);
        assert_eq!(cigar(&e0), 1.0);
        assert_eq!(cigar(&e2), 1e6);
        assert_eq!(discus(&e0), 1e6);
        assert_eq!(discus(&e2), 1.0);
        assert_eq!(ellipsoid(&e0), 1.0);
        assert!((ellipsoid(&e2) - 1e6).abs() < 1e-6);
        assert_eq!(cigar_discus(&e0), 1.0);
        assert_eq!(cigar_discus(&e2), 1e6);
    }

    #[test]
    fn test_cigar_discus_two_dimensions() {
        let x = Array1::from_vec(vec![1.0, 1.0]);
        // x0^2 + 1e4 * (x0^2 + x1^2) + 1e6 * x1^2
        assert_eq!(cigar_discus(&x), 1.0 + 2e4 + 1e6);
    }

    #[test]
    fn test_partial_sums() {
        let x = Array1::from_vec(vec![1.0, 2.0, 3.0]);
        // 1 + 9 + 36
        assert_eq!(schwefel12(&x), 46.0);
        assert_eq!(schwefel221(&x), 3.0);
        assert_eq!(schwefel222(&x), 6.0 + 6.0);
    }

    #[test]
    fn test_step_plateau() {
        let x = Array1::from_vec(vec![0.49, -0.5, 0.2]);
        assert_eq!(step(&x), 0.0);
        let x = Array1::from_vec(vec![0.5, 0.0]);
        assert_eq!(step(&x), 1.0);
    }

    #[test]
    fn test_rosenbrock_and_exponential() {
        assert_eq!(rosenbrock(&Array1::from_vec(vec![1.0, 1.0, 1.0])), 0.0);
        assert_eq!(rosenbrock(&Array1::from_vec(vec![0.0, 0.0])), 1.0);
        assert_eq!(exponential(&Array1::zeros(4)), -1.0);
    }
}

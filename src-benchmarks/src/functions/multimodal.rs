//! Multimodal test functions
//!
//! These functions have multiple local minima and are used to test the global
//! search capabilities and exploration of optimization algorithms.

use ndarray::Array1;
use std::f64::consts::{E, PI};

use super::unimodal::unit_ramp;

/// Griewank function - multimodal, challenging for large dimensions
/// Global minimum: f(x) = 0 at x = (0, 0, ..., 0)
/// Bounds: x_i in [-600, 600]
pub fn griewank(x: &Array1<f64>) -> f64 {
    let sum_squares: f64 = x.iter().map(|&xi| xi * xi).sum();
    let product_cos: f64 = x
        .iter()
        .enumerate()
        .map(|(i, &xi)| (xi / ((i + 1) as f64).sqrt()).cos())
        .product();
    sum_squares / 4000.0 - product_cos + 1.0
}

/// Bohachevsky function, chained over neighbouring coordinates
/// Global minimum: f(x) = 0 at x = (0, 0, ..., 0)
/// Bounds: x_i in [-100, 100]
pub fn bohachevsky(x: &Array1<f64>) -> f64 {
    x.iter()
        .zip(x.iter().skip(1))
        .map(|(&xi, &xn)| {
            xi * xi + 2.0 * xn * xn - 0.3 * (3.0 * PI * xi).cos() - 0.4 * (4.0 * PI * xn).cos()
                + 0.7
        })
        .sum()
}

/// Ackley function
/// Global minimum: f(x) = 0 at x = (0, 0, ..., 0)
/// Bounds: x_i in [-32.768, 32.768]
pub fn ackley(x: &Array1<f64>) -> f64 {
    let n = x.len() as f64;
    let sum_sq: f64 = x.iter().map(|&xi| xi * xi).sum();
    let sum_cos: f64 = x.iter().map(|&xi| (2.0 * PI * xi).cos()).sum();
    -20.0 * (-0.2 * (sum_sq / n).sqrt()).exp() - (sum_cos / n).exp() + 20.0 + E
}

/// Rastrigin function
/// Global minimum: f(x) = 0 at x = (0, 0, ..., 0)
/// Bounds: x_i in [-5.12, 5.12]
pub fn rastrigin(x: &Array1<f64>) -> f64 {
    10.0 * x.len() as f64
        + x.iter().map(|&xi| xi * xi - 10.0 * (2.0 * PI * xi).cos()).sum::<f64>()
}

/// Scaled Rastrigin function - coordinates stretched from 1 to 10 on a log scale
/// Global minimum: f(x) = 0 at x = (0, 0, ..., 0)
pub fn scaled_rastrigin(x: &Array1<f64>) -> f64 {
    let scaled: Array1<f64> =
        x.iter().zip(unit_ramp(x.len())).map(|(&xi, t)| xi * 10f64.powf(t)).collect();
    rastrigin(&scaled)
}

/// Skew Rastrigin function - positive coordinates multiplied by 10
/// Global minimum: f(x) = 0 at x = (0, 0, ..., 0)
pub fn skew_rastrigin(x: &Array1<f64>) -> f64 {
    let skewed = x.mapv(|xi| if xi > 0.0 { 10.0 * xi } else { xi });
    rastrigin(&skewed)
}

/// Levy-Montalvo function
/// Global minimum: f(x) = 0 at x = (-1, -1, ..., -1)
/// Bounds: x_i in [-10, 10]
pub fn levy_montalvo(x: &Array1<f64>) -> f64 {
    let n = x.len();
    let y = x.mapv(|xi| 1.0 + 0.25 * (xi + 1.0));
    let mut total = 10.0 * (PI * y[0]).sin().powi(2) + (y[n - 1] - 1.0).powi(2);
    for (&yi, &yn) in y.iter().zip(y.iter().skip(1)) {
        total += (yi - 1.0).powi(2) * (1.0 + 10.0 * (PI * yn).sin().powi(2));
    }
    total * PI / n as f64
}

/// Michalewicz function (steepness m = 10)
/// Global minimum (2D): f(x) = -1.8013 at x = (2.20, 1.57)
/// Bounds: x_i in [0, pi]
pub fn michalewicz(x: &Array1<f64>) -> f64 {
    -x.iter()
        .enumerate()
        .map(|(i, &xi)| xi.sin() * ((i + 1) as f64 * xi * xi / PI).sin().powi(20))
        .sum::<f64>()
}

/// Salomon function - rings around the origin
/// Global minimum: f(x) = 0 at x = (0, 0, ..., 0)
/// Bounds: x_i in [-100, 100]
pub fn salomon(x: &Array1<f64>) -> f64 {
    let norm = x.iter().map(|&xi| xi * xi).sum::<f64>().sqrt();
    1.0 - (2.0 * PI * norm).cos() + 0.1 * norm
}

/// Shubert function - product form, many global minima
/// Global minimum (2D): f(x) = -186.7309
/// Bounds: x_i in [-10, 10]
pub fn shubert(x: &Array1<f64>) -> f64 {
    x.iter()
        .map(|&xi| (1..=5).map(|j| j as f64 * ((j + 1) as f64 * xi + j as f64).cos()).sum::<f64>())
        .product()
}

/// Schaffer function (F7 form), chained over neighbouring coordinates
/// Global minimum: f(x) = 0 at x = (0, 0, ..., 0)
/// Bounds: x_i in [-100, 100]
pub fn schaffer(x: &Array1<f64>) -> f64 {
    x.iter()
        .zip(x.iter().skip(1))
        .map(|(&xi, &xn)| {
            let r2 = xi * xi + xn * xn;
            r2.powf(0.25) * ((50.0 * r2.powf(0.1)).sin().powi(2) + 1.0)
        })
        .sum()
}

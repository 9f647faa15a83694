//! Random sampling helpers shared by the optimizers

use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

use crate::error::Result;
use crate::problem::Problem;

/// Seeded generator, or one seeded from the thread RNG when `seed` is `None`
pub fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_rng(&mut rand::rng()),
    }
}

/// One point drawn uniformly in the box `[lower, upper)`
pub fn uniform_in<R: Rng + ?Sized>(rng: &mut R, lower: &Array1<f64>, upper: &Array1<f64>) -> Array1<f64> {
    Array1::from_shape_fn(lower.len(), |j| rng.random_range(lower[j]..upper[j]))
}

/// `n` points drawn uniformly in the box, one per row
pub fn uniform_matrix<R: Rng + ?Sized>(
    rng: &mut R,
    n: usize,
    lower: &Array1<f64>,
    upper: &Array1<f64>,
) -> Array2<f64> {
    Array2::from_shape_fn((n, lower.len()), |(_, j)| rng.random_range(lower[j]..upper[j]))
}

pub fn standard_normal<R: Rng + ?Sized>(rng: &mut R, n: usize) -> Array1<f64> {
    Array1::from_shape_fn(n, |_| rng.sample(StandardNormal))
}

pub fn standard_normal_matrix<R: Rng + ?Sized>(rng: &mut R, rows: usize, cols: usize) -> Array2<f64> {
    Array2::from_shape_fn((rows, cols), |_| rng.sample(StandardNormal))
}

/// The given starting point, or one drawn uniformly in the initial bounds
pub fn initial_mean<F, R>(rng: &mut R, problem: &Problem<F>, mean: Option<&Array1<f64>>) -> Result<Array1<f64>>
where
    F: Fn(&Array1<f64>) -> f64 + Sync,
    R: Rng + ?Sized,
{
    match mean {
        Some(m) => {
            problem.check_len("mean", m)?;
            Ok(m.clone())
        }
        None => Ok(uniform_in(rng, &problem.initial_lower, &problem.initial_upper)),
    }
}

/// Indices that sort `y` ascending; NaN sorts last
pub fn argsort(y: &Array1<f64>) -> Vec<usize> {
    let mut order: Vec<usize> = (0..y.len()).collect();
    order.sort_by(|&a, &b| y[a].total_cmp(&y[b]));
    order
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_rng_is_reproducible() {
        let lower = Array1::from_vec(vec![-1.0, 10.0]);
        let upper = Array1::from_vec(vec![1.0, 20.0]);
        let a = uniform_matrix(&mut make_rng(Some(3)), 50, &lower, &upper);
        let b = uniform_matrix(&mut make_rng(Some(3)), 50, &lower, &upper);
        assert_eq!(a, b);
        for row in a.outer_iter() {
            assert!(row[0] >= -1.0 && row[0] < 1.0);
            assert!(row[1] >= 10.0 && row[1] < 20.0);
        }
    }

    #[test]
    fn test_standard_normal_moments() {
        let z = standard_normal(&mut make_rng(Some(0)), 20_000);
        let mean = z.mean().unwrap();
        let var = z.mapv(|v| (v - mean).powi(2)).mean().unwrap();
        assert!(mean.abs() < 0.05, "mean {}", mean);
        assert!((var - 1.0).abs() < 0.05, "var {}", var);
    }

    #[test]
    fn test_argsort() {
        let y = Array1::from_vec(vec![3.0, f64::INFINITY, -1.0, 2.0]);
        assert_eq!(argsort(&y), vec![2, 3, 0, 1]);
    }

    #[test]
    fn test_initial_mean() {
        let p = Problem::with_uniform_bounds(|x: &Array1<f64>| x.sum(), 3, 2.0, 3.0).unwrap();
        let mut rng = make_rng(Some(1));
        let m = initial_mean(&mut rng, &p, None).unwrap();
        assert!(m.iter().all(|&v| (2.0..3.0).contains(&v)));
        let given = Array1::from_elem(3, 9.0);
        assert_eq!(initial_mean(&mut rng, &p, Some(&given)).unwrap(), given);
        assert!(initial_mean(&mut rng, &p, Some(&Array1::zeros(2))).is_err());
    }
}

//! Cross-entropy methods
//!
//! Both variants sample a diagonal Gaussian `mean + sigma * z` and refit it
//! to the best samples of each generation; they differ in how the samples
//! are weighted.

use ndarray::{Array1, Array2};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{OptError, Result};
use crate::problem::Problem;
use crate::sampling::standard_normal_matrix;

pub mod dcem;
pub mod lml;
pub mod scem;

pub use dcem::{Dcem, DcemConfig};
pub use scem::{Scem, ScemConfig};

/// Initial standard deviation: one value for every dimension, or one per dimension
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StepSize {
    Scalar(f64),
    PerDimension(Vec<f64>),
}

impl From<f64> for StepSize {
    fn from(v: f64) -> Self {
        StepSize::Scalar(v)
    }
}

impl From<Vec<f64>> for StepSize {
    fn from(v: Vec<f64>) -> Self {
        StepSize::PerDimension(v)
    }
}

/// Resolve the initial sigma, defaulting to 30% of the initial range
pub(crate) fn initial_sigma<F>(problem: &Problem<F>, sigma: Option<&StepSize>) -> Result<Array1<f64>>
where
    F: Fn(&Array1<f64>) -> f64 + Sync,
{
    let sigma = match sigma {
        None => problem.initial_range() * 0.3,
        Some(StepSize::Scalar(s)) => Array1::from_elem(problem.ndim, *s),
        Some(StepSize::PerDimension(v)) => {
            let v = Array1::from_vec(v.clone());
            problem.check_len("sigma", &v)?;
            v
        }
    };
    if sigma.iter().any(|&s| !(s > 0.0) || !s.is_finite()) {
        return Err(OptError::invalid("sigma", "every entry must be finite and > 0"));
    }
    Ok(sigma)
}

pub(crate) fn check_population(n_individuals: usize, n_parents: usize) -> Result<()> {
    if n_individuals < 2 {
        return Err(OptError::invalid("n_individuals", "must be >= 2"));
    }
    if n_parents == 0 || n_parents > n_individuals {
        return Err(OptError::invalid(
            "n_parents",
            format!("must be in 1..={}, got {}", n_individuals, n_parents),
        ));
    }
    Ok(())
}

/// `n` samples of `mean + sigma * z`, one per row
pub(crate) fn sample_diagonal<R: Rng + ?Sized>(
    rng: &mut R,
    n: usize,
    mean: &Array1<f64>,
    sigma: &Array1<f64>,
) -> Array2<f64> {
    let mut x = standard_normal_matrix(rng, n, mean.len());
    for mut row in x.outer_iter_mut() {
        row *= sigma;
        row += mean;
    }
    x
}

pub(crate) fn is_finite(a: &Array1<f64>) -> bool {
    a.iter().all(|v| v.is_finite())
}

//! Problem definition: the objective and its search box

use ndarray::Array1;

use crate::error::{OptError, Result};

/// A box-constrained minimization problem
///
/// `lower`/`upper` bound the search space; `initial_lower`/`initial_upper`
/// only bound where the starting population is drawn and default to the
/// search bounds.
pub struct Problem<F>
where
    F: Fn(&Array1<f64>) -> f64 + Sync,
{
    pub fitness_function: F,
    pub ndim: usize,
    pub lower: Array1<f64>,
    pub upper: Array1<f64>,
    pub initial_lower: Array1<f64>,
    pub initial_upper: Array1<f64>,
    /// Name used in logs and result files
    pub name: String,
}

fn check_box(lower: &Array1<f64>, upper: &Array1<f64>) -> Result<()> {
    if lower.len() != upper.len() {
        return Err(OptError::BoundsMismatch { lower_len: lower.len(), upper_len: upper.len() });
    }
    if lower.is_empty() {
        return Err(OptError::EmptyProblem);
    }
    for (index, (&lo, &hi)) in lower.iter().zip(upper.iter()).enumerate() {
        if !lo.is_finite() || !hi.is_finite() || lo >= hi {
            return Err(OptError::InvalidBounds { index, lower: lo, upper: hi });
        }
    }
    Ok(())
}

impl<F> Problem<F>
where
    F: Fn(&Array1<f64>) -> f64 + Sync,
{
    /// Problem over the box `[lower, upper]`
    pub fn new(fitness_function: F, lower: Array1<f64>, upper: Array1<f64>) -> Result<Self> {
        check_box(&lower, &upper)?;
        Ok(Self {
            fitness_function,
            ndim: lower.len(),
            initial_lower: lower.clone(),
            initial_upper: upper.clone(),
            lower,
            upper,
            name: "objective".to_string(),
        })
    }

    /// Problem over the hypercube `[lower, upper]^ndim`
    pub fn with_uniform_bounds(
        fitness_function: F,
        ndim: usize,
        lower: f64,
        upper: f64,
    ) -> Result<Self> {
        Self::new(fitness_function, Array1::from_elem(ndim, lower), Array1::from_elem(ndim, upper))
    }

    /// Restrict where the initial population is drawn
    pub fn initial_bounds(mut self, lower: Array1<f64>, upper: Array1<f64>) -> Result<Self> {
        check_box(&lower, &upper)?;
        if lower.len() != self.ndim {
            return Err(OptError::DimensionMismatch {
                name: "initial bounds",
                expected: self.ndim,
                got: lower.len(),
            });
        }
        self.initial_lower = lower;
        self.initial_upper = upper;
        Ok(self)
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Width of the search box per dimension
    pub fn range(&self) -> Array1<f64> {
        &self.upper - &self.lower
    }

    /// Width of the initial box per dimension
    pub fn initial_range(&self) -> Array1<f64> {
        &self.initial_upper - &self.initial_lower
    }

    /// Check that an optional per-dimension setting has length `ndim`
    pub(crate) fn check_len(&self, name: &'static str, v: &Array1<f64>) -> Result<()> {
        if v.len() != self.ndim {
            return Err(OptError::DimensionMismatch { name, expected: self.ndim, got: v.len() });
        }
        Ok(())
    }
}

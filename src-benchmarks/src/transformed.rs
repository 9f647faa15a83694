//! Rotated and shifted variants of the base functions
//!
//! - `Rotated`: `f(R x)`
//! - `Shifted`: `f(x - s)`
//! - `ShiftedRotated`: `f(R (x - s))`
//!
//! `R` and `s` come from a [`DataStore`] keyed by the base function name and
//! the input dimension, or are passed explicitly by the caller.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use crate::base::BaseFunction;
use crate::error::{BenchmarkError, Result};
use crate::rotation::check_rotation_shape;
use crate::shift::check_shift_length;
use crate::store::DataStore;

/// How the input is transformed before the base function sees it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transform {
    Rotated,
    Shifted,
    ShiftedRotated,
}

impl Transform {
    pub fn name(&self) -> &'static str {
        match self {
            Transform::Rotated => "rotated",
            Transform::Shifted => "shifted",
            Transform::ShiftedRotated => "shifted_rotated",
        }
    }

    pub fn needs_rotation(&self) -> bool {
        matches!(self, Transform::Rotated | Transform::ShiftedRotated)
    }

    pub fn needs_shift(&self) -> bool {
        matches!(self, Transform::Shifted | Transform::ShiftedRotated)
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Transform {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let t = s.trim().to_lowercase().replace('-', "_");
        match t.as_str() {
            "rotated" | "rotate" => Ok(Transform::Rotated),
            "shifted" | "shift" => Ok(Transform::Shifted),
            "shifted_rotated" | "shiftedrotated" | "rotated_shifted" => {
                Ok(Transform::ShiftedRotated)
            }
            _ => Err(format!("unknown transform: {}", s)),
        }
    }
}

/// Apply `transform` to `x` with explicit data, validating shapes
pub fn transform_input(
    transform: Transform,
    x: &Array1<f64>,
    rotation: Option<&Array2<f64>>,
    shift: Option<&Array1<f64>>,
) -> Result<Array1<f64>> {
    let ndim = x.len();
    let shifted = if transform.needs_shift() {
        let s = shift.ok_or(BenchmarkError::ShiftLength { len: 0, ndim })?;
        check_shift_length(s, ndim)?;
        x - s
    } else {
        x.clone()
    };
    if transform.needs_rotation() {
        let r = rotation.ok_or(BenchmarkError::RotationShape { rows: 0, cols: 0, ndim })?;
        check_rotation_shape(r, ndim)?;
        Ok(r.dot(&shifted))
    } else {
        Ok(shifted)
    }
}

/// A base function seen through a rotation and/or shift
#[derive(Debug, Clone)]
pub struct TransformedFunction {
    base: BaseFunction,
    transform: Transform,
    store: Arc<DataStore>,
}

impl TransformedFunction {
    pub fn new(base: BaseFunction, transform: Transform, store: Arc<DataStore>) -> Self {
        Self { base, transform, store }
    }

    pub fn base(&self) -> BaseFunction {
        self.base
    }

    pub fn transform(&self) -> Transform {
        self.transform
    }

    /// Name used in logs and result files, e.g. `rotated_ellipsoid`
    pub fn name(&self) -> String {
        format!("{}_{}", self.transform.name(), self.base.name())
    }

    /// Evaluate with data from the cache (loaded on first use)
    pub fn evaluate(&self, x: &Array1<f64>) -> Result<f64> {
        self.evaluate_with(x, None, None)
    }

    /// Evaluate with caller-provided data; a `None` falls back to the cache
    ///
    /// Explicit data bypasses the cache and is not stored in it.
    pub fn evaluate_with(
        &self,
        x: &Array1<f64>,
        rotation: Option<&Array2<f64>>,
        shift: Option<&Array1<f64>>,
    ) -> Result<f64> {
        self.base.check_input(x)?;
        let ndim = x.len();
        let cached_r = match rotation {
            None if self.transform.needs_rotation() => {
                Some(self.store.rotation(self.base.name(), ndim)?)
            }
            _ => None,
        };
        let cached_s = match shift {
            None if self.transform.needs_shift() => Some(self.store.shift(self.base.name(), ndim)?),
            _ => None,
        };
        let r = rotation.or(cached_r.as_deref());
        let s = shift.or(cached_s.as_deref());
        let z = transform_input(self.transform, x, r, s)?;
        Ok(self.base.evaluate(&z))
    }

    /// Resolve all data for dimension `ndim` once and return an infallible objective
    pub fn prepare(&self, ndim: usize) -> Result<PreparedFunction> {
        self.base.check_input(&Array1::zeros(ndim))?;
        let rotation = if self.transform.needs_rotation() {
            Some(self.store.rotation(self.base.name(), ndim)?)
        } else {
            None
        };
        let shift = if self.transform.needs_shift() {
            Some(self.store.shift(self.base.name(), ndim)?)
        } else {
            None
        };
        Ok(PreparedFunction { base: self.base, ndim, rotation, shift })
    }
}

/// A base function with its transform data already resolved
///
/// This is what gets handed to optimizers: calling it cannot fail as long as
/// the input has the prepared dimension.
#[derive(Debug, Clone)]
pub struct PreparedFunction {
    base: BaseFunction,
    ndim: usize,
    rotation: Option<Arc<Array2<f64>>>,
    shift: Option<Arc<Array1<f64>>>,
}

impl PreparedFunction {
    /// Untransformed base function in dimension `ndim`
    pub fn plain(base: BaseFunction, ndim: usize) -> Result<Self> {
        base.check_input(&Array1::zeros(ndim))?;
        Ok(Self { base, ndim, rotation: None, shift: None })
    }

    /// Build from explicit data, validating shapes against `ndim`
    pub fn with_data(
        base: BaseFunction,
        ndim: usize,
        rotation: Option<Array2<f64>>,
        shift: Option<Array1<f64>>,
    ) -> Result<Self> {
        base.check_input(&Array1::zeros(ndim))?;
        if let Some(r) = &rotation {
            check_rotation_shape(r, ndim)?;
        }
        if let Some(s) = &shift {
            check_shift_length(s, ndim)?;
        }
        Ok(Self { base, ndim, rotation: rotation.map(Arc::new), shift: shift.map(Arc::new) })
    }

    pub fn ndim(&self) -> usize {
        self.ndim
    }

    pub fn base(&self) -> BaseFunction {
        self.base
    }

    /// Evaluate; panics if `x.len()` differs from the prepared dimension
    pub fn call(&self, x: &Array1<f64>) -> f64 {
        let mut z = match &self.shift {
            Some(s) => x - s.as_ref(),
            None => x.clone(),
        };
        if let Some(r) = &self.rotation {
            z = r.dot(&z);
        }
        self.base.evaluate(&z)
    }

    /// Borrow as a closure, the shape every optimizer accepts
    pub fn as_fn(&self) -> impl Fn(&Array1<f64>) -> f64 + Sync + '_ {
        move |x: &Array1<f64>| self.call(x)
    }
}

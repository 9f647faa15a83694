//! Named base functions with input checking
//!
//! [`BaseFunction`] is the stable name of a benchmark: it parses from the
//! command line, serializes into configs and result files, and is the key
//! under which rotation matrices and shift vectors are persisted.

use std::fmt;
use std::str::FromStr;

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::error::{BenchmarkError, Result};
use crate::functions::*;

/// Plain objective signature shared by every base function
pub type ObjectiveFn = fn(&Array1<f64>) -> f64;

/// Every base test function of the suite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BaseFunction {
    Sphere,
    Cigar,
    Discus,
    CigarDiscus,
    Ellipsoid,
    DifferentPowers,
    Schwefel221,
    Step,
    Schwefel222,
    Rosenbrock,
    Schwefel12,
    Exponential,
    Griewank,
    Bohachevsky,
    Ackley,
    Rastrigin,
    ScaledRastrigin,
    SkewRastrigin,
    LevyMontalvo,
    Michalewicz,
    Salomon,
    Shubert,
    Schaffer,
}

const ALL: [BaseFunction; 23] = [
    BaseFunction::Sphere,
    BaseFunction::Cigar,
    BaseFunction::Discus,
    BaseFunction::CigarDiscus,
    BaseFunction::Ellipsoid,
    BaseFunction::DifferentPowers,
    BaseFunction::Schwefel221,
    BaseFunction::Step,
    BaseFunction::Schwefel222,
    BaseFunction::Rosenbrock,
    BaseFunction::Schwefel12,
    BaseFunction::Exponential,
    BaseFunction::Griewank,
    BaseFunction::Bohachevsky,
    BaseFunction::Ackley,
    BaseFunction::Rastrigin,
    BaseFunction::ScaledRastrigin,
    BaseFunction::SkewRastrigin,
    BaseFunction::LevyMontalvo,
    BaseFunction::Michalewicz,
    BaseFunction::Salomon,
    BaseFunction::Shubert,
    BaseFunction::Schaffer,
];

impl BaseFunction {
    /// All base functions, in suite order
    pub fn all() -> &'static [BaseFunction] {
        &ALL
    }

    /// Canonical snake_case name, used in file names
    pub fn name(&self) -> &'static str {
        match self {
            BaseFunction::Sphere => "sphere",
            BaseFunction::Cigar => "cigar",
            BaseFunction::Discus => "discus",
            BaseFunction::CigarDiscus => "cigar_discus",
            BaseFunction::Ellipsoid => "ellipsoid",
            BaseFunction::DifferentPowers => "different_powers",
            BaseFunction::Schwefel221 => "schwefel221",
            BaseFunction::Step => "step",
            BaseFunction::Schwefel222 => "schwefel222",
            BaseFunction::Rosenbrock => "rosenbrock",
            BaseFunction::Schwefel12 => "schwefel12",
            BaseFunction::Exponential => "exponential",
            BaseFunction::Griewank => "griewank",
            BaseFunction::Bohachevsky => "bohachevsky",
            BaseFunction::Ackley => "ackley",
            BaseFunction::Rastrigin => "rastrigin",
            BaseFunction::ScaledRastrigin => "scaled_rastrigin",
            BaseFunction::SkewRastrigin => "skew_rastrigin",
            BaseFunction::LevyMontalvo => "levy_montalvo",
            BaseFunction::Michalewicz => "michalewicz",
            BaseFunction::Salomon => "salomon",
            BaseFunction::Shubert => "shubert",
            BaseFunction::Schaffer => "schaffer",
        }
    }

    /// The raw, unchecked objective
    pub fn function(&self) -> ObjectiveFn {
        match self {
            BaseFunction::Sphere => sphere,
            BaseFunction::Cigar => cigar,
            BaseFunction::Discus => discus,
            BaseFunction::CigarDiscus => cigar_discus,
            BaseFunction::Ellipsoid => ellipsoid,
            BaseFunction::DifferentPowers => different_powers,
            BaseFunction::Schwefel221 => schwefel221,
            BaseFunction::Step => step,
            BaseFunction::Schwefel222 => schwefel222,
            BaseFunction::Rosenbrock => rosenbrock,
            BaseFunction::Schwefel12 => schwefel12,
            BaseFunction::Exponential => exponential,
            BaseFunction::Griewank => griewank,
            BaseFunction::Bohachevsky => bohachevsky,
            BaseFunction::Ackley => ackley,
            BaseFunction::Rastrigin => rastrigin,
            BaseFunction::ScaledRastrigin => scaled_rastrigin,
            BaseFunction::SkewRastrigin => skew_rastrigin,
            BaseFunction::LevyMontalvo => levy_montalvo,
            BaseFunction::Michalewicz => michalewicz,
            BaseFunction::Salomon => salomon,
            BaseFunction::Shubert => shubert,
            BaseFunction::Schaffer => schaffer,
        }
    }

    /// Smallest dimension the function is defined for
    pub fn min_dimension(&self) -> usize {
        match self {
            BaseFunction::Rosenbrock
            | BaseFunction::Schwefel12
            | BaseFunction::Bohachevsky
            | BaseFunction::Schaffer
            | BaseFunction::CigarDiscus => 2,
            _ => 1,
        }
    }

    /// Whether the landscape has many local minima
    pub fn is_multimodal(&self) -> bool {
        matches!(
            self,
            BaseFunction::Griewank
                | BaseFunction::Bohachevsky
                | BaseFunction::Ackley
                | BaseFunction::Rastrigin
                | BaseFunction::ScaledRastrigin
                | BaseFunction::SkewRastrigin
                | BaseFunction::LevyMontalvo
                | BaseFunction::Michalewicz
                | BaseFunction::Salomon
                | BaseFunction::Shubert
                | BaseFunction::Schaffer
        )
    }

    /// Validate that `x` can be passed to this function
    pub fn check_input(&self, x: &Array1<f64>) -> Result<()> {
        check_input(x, self.name(), self.min_dimension())
    }

    /// Evaluate without checks; indexing panics on inputs that are too short
    pub fn evaluate(&self, x: &Array1<f64>) -> f64 {
        (self.function())(x)
    }

    /// Evaluate after validating the input dimension
    pub fn try_evaluate(&self, x: &Array1<f64>) -> Result<f64> {
        self.check_input(x)?;
        Ok(self.evaluate(x))
    }
}

/// Reject empty vectors and vectors shorter than `min_dim`
pub fn check_input(x: &Array1<f64>, function: &'static str, min_dim: usize) -> Result<()> {
    if x.is_empty() {
        return Err(BenchmarkError::EmptyInput);
    }
    if x.len() < min_dim {
        return Err(BenchmarkError::DimensionTooSmall { function, min: min_dim, got: x.len() });
    }
    Ok(())
}

impl fmt::Display for BaseFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BaseFunction {
    type Err = BenchmarkError;

    fn from_str(s: &str) -> Result<Self> {
        let t = s.trim().to_lowercase().replace('-', "_");
        let found = match t.as_str() {
            "tablet" => Some(BaseFunction::Discus),
            "schwefel_221" | "schwefel2_21" => Some(BaseFunction::Schwefel221),
            "schwefel_222" | "schwefel2_22" => Some(BaseFunction::Schwefel222),
            "schwefel_12" | "schwefel1_2" => Some(BaseFunction::Schwefel12),
            "levy" => Some(BaseFunction::LevyMontalvo),
            _ => ALL.iter().copied().find(|f| f.name() == t || f.name().replace('_', "") == t),
        };
        found.ok_or_else(|| BenchmarkError::UnknownFunction(s.to_string()))
    }
}

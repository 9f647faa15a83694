//! Error types for the optimizers.
//!
//! Invalid problems and options are rejected up front; once an optimizer
//! runs, numerical trouble ends the run with a termination signal instead of
//! an error.

use std::path::PathBuf;

use blackbox_benchmarks::BenchmarkError;
use blackbox_env::EnvError;
use thiserror::Error;

/// Errors that can occur while setting up or running an optimizer.
#[derive(Debug, Error)]
pub enum OptError {
    /// The problem has no dimensions.
    #[error("problem dimension must be >= 1")]
    EmptyProblem,

    /// Lower and upper bounds have different lengths.
    #[error("bounds mismatch: lower has {lower_len} elements, upper has {upper_len}")]
    BoundsMismatch {
        /// Length of the lower bounds array
        lower_len: usize,
        /// Length of the upper bounds array
        upper_len: usize,
    },

    /// A lower bound is not strictly below its upper bound.
    #[error("invalid bounds at index {index}: lower ({lower}) must be < upper ({upper})")]
    InvalidBounds {
        /// Index of the invalid bound pair
        index: usize,
        /// The lower bound value
        lower: f64,
        /// The upper bound value
        upper: f64,
    },

    /// A vector option has the wrong length.
    #[error("{name} dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch {
        /// Option name
        name: &'static str,
        /// Expected dimension
        expected: usize,
        /// Actual dimension provided
        got: usize,
    },

    /// Neither an evaluation budget, a runtime budget nor a fitness threshold is set.
    #[error(
        "no termination criterion: set max_function_evaluations, max_runtime or fitness_threshold"
    )]
    NoTermination,

    /// An optimizer returned while no termination criterion had fired.
    #[error("{0} returned before any termination criterion fired")]
    NotTerminated(&'static str),

    /// An option or algorithm parameter is out of range.
    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter {
        /// Parameter name
        name: &'static str,
        /// Why the value was rejected
        reason: String,
    },

    /// Unknown algorithm name.
    #[error("unknown algorithm: {0}")]
    UnknownAlgorithm(String),

    /// Benchmark data (rotation/shift) could not be prepared.
    #[error(transparent)]
    Benchmark(#[from] BenchmarkError),

    /// Output directory could not be resolved.
    #[error(transparent)]
    Env(#[from] EnvError),

    /// Reading or writing a file failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// File being accessed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// JSON (de)serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV writing failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// A specialized `Result` type for optimizer operations.
pub type Result<T> = std::result::Result<T, OptError>;

impl OptError {
    /// Returns `true` if this is a bounds-related error.
    pub fn is_bounds_error(&self) -> bool {
        matches!(self, OptError::BoundsMismatch { .. } | OptError::InvalidBounds { .. })
    }

    /// Returns `true` if this is a configuration-related error.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            OptError::NoTermination
                | OptError::InvalidParameter { .. }
                | OptError::UnknownAlgorithm(_)
                | OptError::DimensionMismatch { .. }
        )
    }

    /// Returns `true` if the error comes from reading or writing files.
    pub fn is_io_error(&self) -> bool {
        matches!(
            self,
            OptError::Io { .. } | OptError::Json(_) | OptError::Csv(_) | OptError::Env(_)
        )
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        OptError::Io { path: path.into(), source }
    }

    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        OptError::InvalidParameter { name, reason: reason.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = OptError::BoundsMismatch { lower_len: 3, upper_len: 5 };
        assert_eq!(err.to_string(), "bounds mismatch: lower has 3 elements, upper has 5");
        let err = OptError::invalid("n_parents", "must be <= n_individuals");
        assert_eq!(err.to_string(), "invalid parameter n_parents: must be <= n_individuals");
    }

    #[test]
    fn test_categories() {
        let bounds = OptError::InvalidBounds { index: 0, lower: 1.0, upper: 0.0 };
        assert!(bounds.is_bounds_error());
        assert!(!bounds.is_config_error());
        assert!(OptError::NoTermination.is_config_error());
        assert!(OptError::UnknownAlgorithm("x".into()).is_config_error());
        let io = OptError::io("a.json", std::io::Error::other("boom"));
        assert!(io.is_io_error());
    }
}

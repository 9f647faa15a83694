//! Error types for the benchmark suite.
//!
//! Raw test functions are infallible; everything that validates input,
//! touches the filesystem or parses persisted data reports a [`BenchmarkError`].

use std::path::PathBuf;

use blackbox_env::EnvError;
use thiserror::Error;

/// Errors raised while evaluating checked functions or handling transform data.
#[derive(Debug, Error)]
pub enum BenchmarkError {
    /// The input vector has no coordinates.
    #[error("input vector is empty")]
    EmptyInput,

    /// The function couples neighbouring coordinates and needs more of them.
    #[error("{function} needs at least {min} dimensions, got {got}")]
    DimensionTooSmall {
        /// Function name
        function: &'static str,
        /// Smallest accepted dimension
        min: usize,
        /// Dimension provided
        got: usize,
    },

    /// A rotation matrix does not match the input dimension.
    #[error("rotation matrix shape {rows}x{cols} does not match input dimension {ndim}")]
    RotationShape {
        /// Matrix rows
        rows: usize,
        /// Matrix columns
        cols: usize,
        /// Input dimension
        ndim: usize,
    },

    /// A shift vector does not match the input dimension.
    #[error("shift vector length {len} does not match input dimension {ndim}")]
    ShiftLength {
        /// Vector length
        len: usize,
        /// Input dimension
        ndim: usize,
    },

    /// Unknown base function name.
    #[error("unknown test function: {0}")]
    UnknownFunction(String),

    /// Lower bound of a sampling range is not below the upper bound.
    #[error("invalid range: low ({low}) must be < high ({high})")]
    InvalidRange {
        /// Lower end
        low: f64,
        /// Upper end
        high: f64,
    },

    /// Gram-Schmidt met a (numerically) linearly dependent column.
    #[error("degenerate matrix: column {column} is linearly dependent")]
    Degenerate {
        /// Index of the offending column
        column: usize,
    },

    /// A persisted data file could not be parsed.
    #[error("failed to parse {path} line {line}: {message}")]
    Parse {
        /// File being read
        path: PathBuf,
        /// 1-based line number
        line: usize,
        /// What went wrong
        message: String,
    },

    /// Reading or writing a data file failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// File being accessed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The data directory could not be resolved.
    #[error(transparent)]
    Env(#[from] EnvError),
}

/// A specialized `Result` type for benchmark operations.
pub type Result<T> = std::result::Result<T, BenchmarkError>;

impl BenchmarkError {
    /// Returns `true` if the input had the wrong shape for the function or its data.
    pub fn is_dimension_error(&self) -> bool {
        matches!(
            self,
            BenchmarkError::EmptyInput
                | BenchmarkError::DimensionTooSmall { .. }
                | BenchmarkError::RotationShape { .. }
                | BenchmarkError::ShiftLength { .. }
        )
    }

    /// Returns `true` if persisted data could not be read, written or parsed.
    pub fn is_data_error(&self) -> bool {
        matches!(
            self,
            BenchmarkError::Parse { .. } | BenchmarkError::Io { .. } | BenchmarkError::Env(_)
        )
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        BenchmarkError::Io { path: path.into(), source }
    }
}

//! Environment variable utilities
//!
//! This module resolves the directories used to persist benchmark input data
//! (rotation matrices, shift vectors) and optimization records. Each directory
//! can be overridden with an environment variable and falls back to a path
//! relative to the current working directory.

use crate::constants::{DATA_DIR_ENV, DEFAULT_DATA_DIR, DEFAULT_RECORDS_DIR, RECORDS_DIR_ENV};
use std::env;
use std::path::{Path, PathBuf};

/// Error type for environment variable issues
#[derive(Debug, thiserror::Error)]
pub enum EnvError {
    #[error("{0} environment variable is not set")]
    NotSet(&'static str),

    #[error("{var} points to a non-existent directory: {path}")]
    NotFound { var: &'static str, path: PathBuf },

    #[error("failed to create directory {path}: {source}")]
    DirectoryCreationFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Read a directory from an environment variable and validate it exists
///
/// # Errors
///
/// Returns an error if the variable is not set or points to a non-existent
/// directory.
///
/// # Example
///
/// ```no_run
/// use blackbox_env::{get_env_dir, DATA_DIR_ENV};
///
/// let dir = get_env_dir(DATA_DIR_ENV)?;
/// println!("data directory: {}", dir.display());
/// # Ok::<(), blackbox_env::EnvError>(())
/// ```
pub fn get_env_dir(var: &'static str) -> Result<PathBuf, EnvError> {
    let value = env::var(var).map_err(|_| EnvError::NotSet(var))?;
    let path = PathBuf::from(value);
    if !path.is_dir() {
        return Err(EnvError::NotFound { var, path });
    }
    Ok(path)
}

/// Pick the configured directory if any, the default otherwise
///
/// Empty values are treated as unset.
pub fn resolve_dir(value: Option<String>, default: &str) -> PathBuf {
    match value {
        Some(v) if !v.trim().is_empty() => PathBuf::from(v),
        _ => PathBuf::from(default),
    }
}

fn ensure_dir(path: PathBuf) -> Result<PathBuf, EnvError> {
    if !path.exists() {
        log::debug!("creating directory {}", path.display());
        std::fs::create_dir_all(&path)
            .map_err(|source| EnvError::DirectoryCreationFailed { path: path.clone(), source })?;
    }
    Ok(path)
}

/// Get the benchmark input data directory, creating it if necessary
///
/// Uses `BLACKBOX_DATA_DIR` when set, `./benchmarks_input_data` otherwise.
///
/// # Errors
///
/// Returns an error if the directory cannot be created.
pub fn get_data_dir() -> Result<PathBuf, EnvError> {
    ensure_dir(resolve_dir(env::var(DATA_DIR_ENV).ok(), DEFAULT_DATA_DIR))
}

/// Get the records directory, creating it if necessary
///
/// Uses `BLACKBOX_RECORDS_DIR` when set, `./data_generated/records` otherwise.
///
/// # Errors
///
/// Returns an error if the directory cannot be created.
pub fn get_records_dir() -> Result<PathBuf, EnvError> {
    ensure_dir(resolve_dir(env::var(RECORDS_DIR_ENV).ok(), DEFAULT_RECORDS_DIR))
}

/// Resolve and create both directories, logging where they are
///
/// Useful at the start of the binaries to fail early with a clear message.
pub fn check_env() -> Result<(PathBuf, PathBuf), EnvError> {
    let data = get_data_dir()?;
    let records = get_records_dir()?;
    log::info!("data directory: {}", display(&data));
    log::info!("records directory: {}", display(&records));
    Ok((data, records))
}

fn display(path: &Path) -> String {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf()).display().to_string()
}

//! Environment helpers for the blackbox workspace
//!
//! Benchmark input data (rotation matrices, shift vectors) and optimization
//! records live in directories that can be relocated with environment
//! variables. See [`constants`] for the variable names.

pub mod constants;
pub mod env_utils;

pub use constants::*;
pub use env_utils::{
    EnvError, check_env, get_data_dir, get_env_dir, get_records_dir, resolve_dir,
};

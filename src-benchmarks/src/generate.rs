//! Generate transform data in advance
//!
//! Benchmarks on rotated/shifted functions must see the same matrices on
//! every run, so the data is produced once and then only read.

use std::path::Path;

use crate::base::BaseFunction;
use crate::error::Result;
use crate::rotation::generate_rotation_matrix;
use crate::shift::generate_shift_vector;
use crate::transformed::Transform;

/// What to generate and with which randomness
#[derive(Debug, Clone)]
pub struct GenerateConfig {
    pub functions: Vec<BaseFunction>,
    pub dimensions: Vec<usize>,
    pub transform: Transform,
    /// Base seed; every (function, dimension) pair derives its own from it
    pub seed: u64,
    /// Shift vectors are drawn uniformly in `[shift_low, shift_high)`
    pub shift_low: f64,
    pub shift_high: f64,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            functions: BaseFunction::all().to_vec(),
            dimensions: vec![2, 10, 100],
            transform: Transform::ShiftedRotated,
            seed: 0,
            shift_low: -5.0,
            shift_high: 5.0,
        }
    }
}

/// Seed of one (function, dimension) pair, stable across runs and orderings
pub fn derive_seed(seed: u64, function: BaseFunction, ndim: usize) -> u64 {
    let index = BaseFunction::all().iter().position(|f| *f == function).unwrap_or(0) as u64;
    seed.wrapping_mul(1_000_003).wrapping_add(index * 100_000 + ndim as u64)
}

/// Write every rotation matrix / shift vector needed by `config` into `dir`
///
/// Dimensions below a function's minimum are skipped with a warning.
/// Returns the number of files written.
pub fn generate_transform_data(config: &GenerateConfig, dir: &Path) -> Result<usize> {
    let mut written = 0usize;
    for &function in &config.functions {
        for &ndim in &config.dimensions {
            if ndim < function.min_dimension() {
                log::warn!(
                    "skipping {} in dimension {} (needs at least {})",
                    function,
                    ndim,
                    function.min_dimension()
                );
                continue;
            }
            let seed = derive_seed(config.seed, function, ndim);
            if config.transform.needs_rotation() {
                generate_rotation_matrix(function.name(), ndim, seed, dir)?;
                written += 1;
            }
            if config.transform.needs_shift() {
                generate_shift_vector(
                    function.name(),
                    ndim,
                    config.shift_low,
                    config.shift_high,
                    seed,
                    dir,
                )?;
                written += 1;
            }
        }
        log::info!("{}: data written for dimensions {:?}", function, config.dimensions);
    }
    Ok(written)
}

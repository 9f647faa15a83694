//! Random shift vectors moving the optimum away from the origin

use std::path::{Path, PathBuf};

use ndarray::Array1;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{BenchmarkError, Result};
use crate::matrix_io;

/// File holding the shift vector of `name` in dimension `ndim`
pub fn shift_vector_path(dir: &Path, name: &str, ndim: usize) -> PathBuf {
    dir.join(format!("shift_vector_{}_dim_{}.txt", name, ndim))
}

/// Draw a seeded vector uniformly in `[low, high)`
pub fn random_shift_vector(ndim: usize, low: f64, high: f64, seed: u64) -> Result<Array1<f64>> {
    if ndim == 0 {
        return Err(BenchmarkError::EmptyInput);
    }
    if !(low < high) || !low.is_finite() || !high.is_finite() {
        return Err(BenchmarkError::InvalidRange { low, high });
    }
    let mut rng = StdRng::seed_from_u64(seed);
    Ok(Array1::from_shape_simple_fn(ndim, || rng.random_range(low..high)))
}

/// Generate a shift vector, save it into `dir` and return it
pub fn generate_shift_vector(
    name: &str,
    ndim: usize,
    low: f64,
    high: f64,
    seed: u64,
    dir: &Path,
) -> Result<Array1<f64>> {
    let s = random_shift_vector(ndim, low, high, seed)?;
    let path = shift_vector_path(dir, name, ndim);
    matrix_io::save_vector(&path, &s)?;
    log::debug!("saved shift vector {}", path.display());
    Ok(s)
}

/// Load the shift vector of `name` in dimension `ndim` from `dir`
pub fn load_shift_vector(name: &str, ndim: usize, dir: &Path) -> Result<Array1<f64>> {
    let s = matrix_io::load_vector(&shift_vector_path(dir, name, ndim))?;
    check_shift_length(&s, ndim)?;
    Ok(s)
}

/// A shift must have exactly `ndim` entries
pub fn check_shift_length(s: &Array1<f64>, ndim: usize) -> Result<()> {
    if s.len() != ndim {
        return Err(BenchmarkError::ShiftLength { len: s.len(), ndim });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shift_in_range() {
        let s = random_shift_vector(50, -2.0, 3.0, 1).unwrap();
        assert!(s.iter().all(|&v| (-2.0..3.0).contains(&v)));
        assert_eq!(s, random_shift_vector(50, -2.0, 3.0, 1).unwrap());
    }

    #[test]
    fn test_invalid_range() {
        assert!(matches!(
            random_shift_vector(3, 1.0, 1.0, 0),
            Err(BenchmarkError::InvalidRange { .. })
        ));
        assert!(random_shift_vector(3, f64::NAN, 1.0, 0).is_err());
    }

    #[test]
    fn test_generate_then_load() {
        let tmp = tempfile::tempdir().unwrap();
        let s = generate_shift_vector("sphere", 4, -5.0, 5.0, 3, tmp.path()).unwrap();
        assert!(shift_vector_path(tmp.path(), "sphere", 4).exists());
        assert_eq!(load_shift_vector("sphere", 4, tmp.path()).unwrap(), s);
    }
}

//! Random orthonormal rotation matrices
//!
//! A rotation is built by drawing a standard normal square matrix and
//! orthonormalizing its columns with (classical) Gram-Schmidt. Matrices are
//! persisted under `rotation_matrix_<name>_dim_<ndim>.txt` so that every run
//! of a benchmark sees the same landscape.

use std::path::{Path, PathBuf};

use ndarray::{Array2, Axis};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

use crate::error::{BenchmarkError, Result};
use crate::matrix_io;

const DEGENERATE_NORM: f64 = 1e-12;

/// File holding the rotation matrix of `name` in dimension `ndim`
pub fn rotation_matrix_path(dir: &Path, name: &str, ndim: usize) -> PathBuf {
    dir.join(format!("rotation_matrix_{}_dim_{}.txt", name, ndim))
}

/// Orthonormalize the columns of `a`, in order
///
/// Column `i` loses its projections on the already orthonormalized columns
/// `j < i` and is then divided by its norm.
pub fn gram_schmidt(a: &Array2<f64>) -> Result<Array2<f64>> {
    let mut q = a.clone();
    for i in 0..q.ncols() {
        let mut col = q.column(i).to_owned();
        for j in 0..i {
            let qj = q.column(j);
            let proj = qj.dot(&col);
            col.scaled_add(-proj, &qj);
        }
        let norm = col.dot(&col).sqrt();
        if !norm.is_finite() || norm < DEGENERATE_NORM {
            return Err(BenchmarkError::Degenerate { column: i });
        }
        col /= norm;
        q.column_mut(i).assign(&col);
    }
    Ok(q)
}

/// Draw a seeded random rotation matrix without persisting it
pub fn random_rotation_matrix(ndim: usize, seed: u64) -> Result<Array2<f64>> {
    if ndim == 0 {
        return Err(BenchmarkError::EmptyInput);
    }
    let mut rng = StdRng::seed_from_u64(seed);
    let a = Array2::from_shape_simple_fn((ndim, ndim), || rng.sample::<f64, _>(StandardNormal));
    gram_schmidt(&a)
}

/// Generate a rotation matrix, save it into `dir` and return it
pub fn generate_rotation_matrix(
    name: &str,
    ndim: usize,
    seed: u64,
    dir: &Path,
) -> Result<Array2<f64>> {
    let r = random_rotation_matrix(ndim, seed)?;
    let path = rotation_matrix_path(dir, name, ndim);
    matrix_io::save_matrix(&path, &r)?;
    log::debug!("saved rotation matrix {}", path.display());
    Ok(r)
}

/// Load the rotation matrix of `name` in dimension `ndim` from `dir`
pub fn load_rotation_matrix(name: &str, ndim: usize, dir: &Path) -> Result<Array2<f64>> {
    let r = matrix_io::load_matrix(&rotation_matrix_path(dir, name, ndim))?;
    check_rotation_shape(&r, ndim)?;
    Ok(r)
}

/// A rotation must be `ndim x ndim`
pub fn check_rotation_shape(r: &Array2<f64>, ndim: usize) -> Result<()> {
    let (rows, cols) = r.dim();
    if rows != ndim || cols != ndim {
        return Err(BenchmarkError::RotationShape { rows, cols, ndim });
    }
    Ok(())
}

/// Largest deviation of `rᵀ r` from the identity
pub fn orthogonality_error(r: &Array2<f64>) -> f64 {
    let gram = r.t().dot(r);
    gram.indexed_iter()
        .map(|((i, j), &v)| (v - if i == j { 1.0 } else { 0.0 }).abs())
        .fold(0.0, f64::max)
}

/// Column norms, mostly useful in tests and diagnostics
pub fn column_norms(r: &Array2<f64>) -> Vec<f64> {
    r.axis_iter(Axis(1)).map(|c| c.dot(&c).sqrt()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_random_rotation_is_orthonormal() {
        for ndim in [1, 2, 5, 20] {
            let r = random_rotation_matrix(ndim, 7).unwrap();
            assert_eq!(r.dim(), (ndim, ndim));
            assert!(orthogonality_error(&r) < 1e-10, "ndim {}", ndim);
            for n in column_norms(&r) {
                assert_abs_diff_eq!(n, 1.0, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_seeded_rotation_is_deterministic() {
        let a = random_rotation_matrix(4, 11).unwrap();
        let b = random_rotation_matrix(4, 11).unwrap();
        let c = random_rotation_matrix(4, 12).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_gram_schmidt_detects_dependent_columns() {
        let a = Array2::from_shape_vec((2, 2), vec![1.0, 2.0, 1.0, 2.0]).unwrap();
        assert!(matches!(gram_schmidt(&a), Err(BenchmarkError::Degenerate { column: 1 })));
    }

    #[test]
    fn test_gram_schmidt_identity() {
        let eye = Array2::<f64>::eye(3);
        assert_eq!(gram_schmidt(&eye).unwrap(), eye);
    }

    #[test]
    fn test_shape_check() {
        let r = Array2::<f64>::eye(3);
        assert!(check_rotation_shape(&r, 3).is_ok());
        assert!(matches!(
            check_rotation_shape(&r, 2),
            Err(BenchmarkError::RotationShape { rows: 3, cols: 3, ndim: 2 })
        ));
    }

    #[test]
    fn test_file_name() {
        let p = rotation_matrix_path(Path::new("data"), "ellipsoid", 10);
        assert_eq!(p, PathBuf::from("data/rotation_matrix_ellipsoid_dim_10.txt"));
    }
}

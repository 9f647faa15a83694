//! Cache of rotation matrices and shift vectors
//!
//! Loading a dense `ndim x ndim` matrix from text is far more expensive than
//! evaluating a test function, and optimizers call the objective millions of
//! times. [`DataStore`] keeps every loaded item behind an `Arc`, keyed by
//! (function name, dimension): the first request reads the file, later ones
//! never touch the disk.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use ndarray::{Array1, Array2};
use parking_lot::RwLock;

use crate::error::{BenchmarkError, Result};
use crate::rotation::{self, check_rotation_shape};
use crate::shift;

type Key = (String, usize);

/// Thread-safe, lazily filled cache over a data directory
#[derive(Debug)]
pub struct DataStore {
    dir: PathBuf,
    rotations: RwLock<HashMap<Key, Arc<Array2<f64>>>>,
    shifts: RwLock<HashMap<Key, Arc<Array1<f64>>>>,
}

impl DataStore {
    /// Store reading from (and generating into) `dir`
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            rotations: RwLock::new(HashMap::new()),
            shifts: RwLock::new(HashMap::new()),
        }
    }

    /// Store over the directory named by `BLACKBOX_DATA_DIR` (or its default)
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(blackbox_env::get_data_dir()?))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Rotation matrix for `name` in dimension `ndim`, loaded on first use
    pub fn rotation(&self, name: &str, ndim: usize) -> Result<Arc<Array2<f64>>> {
        let key = (name.to_string(), ndim);
        if let Some(r) = self.rotations.read().get(&key) {
            return Ok(Arc::clone(r));
        }
        log::debug!("loading rotation matrix for {} (dim {})", name, ndim);
        let r = Arc::new(rotation::load_rotation_matrix(name, ndim, &self.dir)?);
        Ok(Arc::clone(self.rotations.write().entry(key).or_insert(r)))
    }

    /// Shift vector for `name` in dimension `ndim`, loaded on first use
    pub fn shift(&self, name: &str, ndim: usize) -> Result<Arc<Array1<f64>>> {
        let key = (name.to_string(), ndim);
        if let Some(s) = self.shifts.read().get(&key) {
            return Ok(Arc::clone(s));
        }
        log::debug!("loading shift vector for {} (dim {})", name, ndim);
        let s = Arc::new(shift::load_shift_vector(name, ndim, &self.dir)?);
        Ok(Arc::clone(self.shifts.write().entry(key).or_insert(s)))
    }

    /// Like [`DataStore::rotation`] but generates and saves the matrix when no
    /// file exists yet
    pub fn rotation_or_generate(
        &self,
        name: &str,
        ndim: usize,
        seed: u64,
    ) -> Result<Arc<Array2<f64>>> {
        if !self.contains_rotation(name, ndim)
            && !rotation::rotation_matrix_path(&self.dir, name, ndim).exists()
        {
            log::info!("generating rotation matrix for {} (dim {}, seed {})", name, ndim, seed);
            let r = rotation::generate_rotation_matrix(name, ndim, seed, &self.dir)?;
            self.insert_rotation(name, r)?;
        }
        self.rotation(name, ndim)
    }

    /// Like [`DataStore::shift`] but generates and saves the vector when no
    /// file exists yet
    pub fn shift_or_generate(
        &self,
        name: &str,
        ndim: usize,
        low: f64,
        high: f64,
        seed: u64,
    ) -> Result<Arc<Array1<f64>>> {
        if !self.contains_shift(name, ndim)
            && !shift::shift_vector_path(&self.dir, name, ndim).exists()
        {
            log::info!("generating shift vector for {} (dim {}, seed {})", name, ndim, seed);
            let s = shift::generate_shift_vector(name, ndim, low, high, seed, &self.dir)?;
            self.insert_shift(name, s)?;
        }
        self.shift(name, ndim)
    }

    /// Put a square matrix in the cache, replacing any previous entry
    pub fn insert_rotation(&self, name: &str, r: Array2<f64>) -> Result<()> {
        let ndim = r.nrows();
        check_rotation_shape(&r, ndim)?;
        self.rotations.write().insert((name.to_string(), ndim), Arc::new(r));
        Ok(())
    }

    /// Put a vector in the cache, replacing any previous entry
    pub fn insert_shift(&self, name: &str, s: Array1<f64>) -> Result<()> {
        let ndim = s.len();
        if ndim == 0 {
            return Err(BenchmarkError::EmptyInput);
        }
        self.shifts.write().insert((name.to_string(), ndim), Arc::new(s));
        Ok(())
    }

    pub fn contains_rotation(&self, name: &str, ndim: usize) -> bool {
        self.rotations.read().contains_key(&(name.to_string(), ndim))
    }

    pub fn contains_shift(&self, name: &str, ndim: usize) -> bool {
        self.shifts.read().contains_key(&(name.to_string(), ndim))
    }

    /// Drop every cached item; the next request reads from disk again
    pub fn clear(&self) {
        self.rotations.write().clear();
        self.shifts.write().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_does_not_touch_disk() {
        let tmp = tempfile::tempdir().unwrap();
        let store = DataStore::new(tmp.path());
        rotation::generate_rotation_matrix("sphere", 3, 0, tmp.path()).unwrap();

        let first = store.rotation("sphere", 3).unwrap();
        std::fs::remove_file(rotation::rotation_matrix_path(tmp.path(), "sphere", 3)).unwrap();
        let second = store.rotation("sphere", 3).unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        store.clear();
        assert!(store.rotation("sphere", 3).is_err());
    }

    #[test]
    fn test_keyed_by_name_and_dimension() {
        let tmp = tempfile::tempdir().unwrap();
        let store = DataStore::new(tmp.path());
        store.insert_rotation("a", Array2::eye(2)).unwrap();
        assert!(store.contains_rotation("a", 2));
        assert!(!store.contains_rotation("a", 3));
        assert!(!store.contains_rotation("b", 2));
    }

    #[test]
    fn test_non_square_rejected() {
        let store = DataStore::new("unused");
        let err = store.insert_rotation("a", Array2::zeros((2, 3))).unwrap_err();
        assert!(matches!(err, BenchmarkError::RotationShape { .. }));
    }

    #[test]
    fn test_generate_on_demand() {
        let tmp = tempfile::tempdir().unwrap();
        let store = DataStore::new(tmp.path());
        let r = store.rotation_or_generate("ackley", 4, 5).unwrap();
        assert!(rotation::rotation_matrix_path(tmp.path(), "ackley", 4).exists());
        // an existing file is reused, not regenerated with the new seed
        let other = DataStore::new(tmp.path());
        assert_eq!(*other.rotation_or_generate("ackley", 4, 99).unwrap(), *r);

        let s = store.shift_or_generate("ackley", 4, -1.0, 1.0, 5).unwrap();
        assert_eq!(s.len(), 4);
    }

    #[test]
    fn test_wrong_file_dimension_is_error() {
        let tmp = tempfile::tempdir().unwrap();
        // a 2x2 matrix stored under the dim-3 file name
        crate::matrix_io::save_matrix(
            &rotation::rotation_matrix_path(tmp.path(), "sphere", 3),
            &Array2::eye(2),
        )
        .unwrap();
        let store = DataStore::new(tmp.path());
        assert!(matches!(
            store.rotation("sphere", 3),
            Err(BenchmarkError::RotationShape { rows: 2, cols: 2, ndim: 3 })
        ));
    }
}

use std::fs::create_dir_all;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::{OptError, Result};
use crate::results::{Callback, CallbackAction, Intermediate};

/// Records optimization progress via per-generation callbacks
#[derive(Debug, Clone)]
pub struct OptimizationRecorder {
    /// Run name (used for the CSV filename)
    run_name: String,
    /// Shared records storage
    records: Arc<Mutex<Vec<OptimizationRecord>>>,
}

/// A single generation record
#[derive(Debug, Clone)]
pub struct OptimizationRecord {
    pub generation: usize,
    pub n_function_evaluations: usize,
    /// Best x found so far
    pub x: Vec<f64>,
    /// Best function result so far
    pub best_result: f64,
    pub runtime: f64,
    /// Whether this generation improved the best known result
    pub is_improvement: bool,
}

impl OptimizationRecorder {
    pub fn new(run_name: impl Into<String>) -> Self {
        Self { run_name: run_name.into(), records: Arc::new(Mutex::new(Vec::new())) }
    }

    /// Create a callback that appends one record per generation
    pub fn create_callback(&self) -> Callback {
        let records = Arc::clone(&self.records);
        Box::new(move |intermediate: &Intermediate| -> CallbackAction {
            let mut guard = records.lock();
            let is_improvement = guard.last().is_none_or(|r| intermediate.fun < r.best_result);
            guard.push(OptimizationRecord {
                generation: intermediate.generation,
                n_function_evaluations: intermediate.n_function_evaluations,
                x: intermediate.x.to_vec(),
                best_result: intermediate.fun,
                runtime: intermediate.runtime,
                is_improvement,
            });
            CallbackAction::Continue
        })
    }

    /// Save all records to `<output_dir>/<run_name>.csv` and return the path
    pub fn save_to_csv(&self, output_dir: &Path) -> Result<PathBuf> {
        create_dir_all(output_dir).map_err(|e| OptError::io(output_dir, e))?;
        let path = output_dir.join(format!("{}.csv", self.run_name));
        let mut writer = csv::Writer::from_path(&path)?;

        let records = self.records.lock();
        let ndim = records.first().map_or(0, |r| r.x.len());
        let mut header = vec!["generation".to_string(), "n_function_evaluations".to_string()];
        header.extend((0..ndim).map(|i| format!("x{}", i)));
        header.extend(["best_result", "runtime", "is_improvement"].map(String::from));
        writer.write_record(&header)?;

        for record in records.iter() {
            let mut row = vec![record.generation.to_string(), record.n_function_evaluations.to_string()];
            row.extend(record.x.iter().map(|xi| format!("{:.16e}", xi)));
            row.push(format!("{:.16e}", record.best_result));
            row.push(format!("{:.6}", record.runtime));
            row.push(record.is_improvement.to_string());
            writer.write_record(&row)?;
        }
        writer.flush().map_err(|e| OptError::io(&path, e))?;
        Ok(path)
    }

    /// Get a copy of all records
    pub fn get_records(&self) -> Vec<OptimizationRecord> {
        self.records.lock().clone()
    }

    pub fn num_generations(&self) -> usize {
        self.records.lock().len()
    }

    pub fn clear(&self) {
        self.records.lock().clear();
    }

    /// The last recorded best solution, if any
    pub fn get_best_solution(&self) -> Option<(Vec<f64>, f64)> {
        self.records.lock().last().map(|r| (r.x.clone(), r.best_result))
    }
}

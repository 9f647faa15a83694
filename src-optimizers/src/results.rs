//! What an optimizer reports, during and after a run

use std::fs;
use std::path::Path;

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::error::{OptError, Result};
use crate::termination::TerminationSignal;

/// Final outcome of an optimization run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizationResults {
    /// Optimizer name, e.g. `VDCMA`
    pub optimizer: String,
    /// Problem name
    pub problem: String,
    pub best_so_far_x: Array1<f64>,
    pub best_so_far_y: f64,
    pub n_function_evaluations: usize,
    pub n_generations: usize,
    /// Seconds
    pub runtime: f64,
    pub termination_signal: TerminationSignal,
    /// `(n_function_evaluations, best_so_far_y)` pairs
    pub fitness: Vec<(usize, f64)>,
    /// Final mean of the search distribution, where there is one
    pub mean: Option<Array1<f64>>,
    /// Final per-dimension step sizes, where there are some
    pub sigma: Option<Array1<f64>>,
}

impl OptimizationResults {
    pub fn to_json_file(&self, path: &Path) -> Result<()> {
        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => {
                fs::create_dir_all(parent).map_err(|e| OptError::io(parent, e))?;
            }
            _ => {}
        }
        let text = serde_json::to_string_pretty(self)?;
        fs::write(path, text).map_err(|e| OptError::io(path, e))
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| OptError::io(path, e))?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Short human-readable summary
    pub fn summary(&self) -> String {
        format!(
            "{} on {}: best {:.6e} after {} evaluations / {} generations in {:.3}s ({})",
            self.optimizer,
            self.problem,
            self.best_so_far_y,
            self.n_function_evaluations,
            self.n_generations,
            self.runtime,
            self.termination_signal
        )
    }
}

/// Snapshot handed to the per-generation callback
#[derive(Debug, Clone)]
pub struct Intermediate {
    pub generation: usize,
    pub n_function_evaluations: usize,
    /// Best solution so far
    pub x: Array1<f64>,
    /// Best fitness so far
    pub fun: f64,
    /// Seconds since the run started
    pub runtime: f64,
}

/// Action returned by the callback
pub enum CallbackAction {
    Continue,
    Stop,
}

/// Per-generation callback
pub type Callback = Box<dyn FnMut(&Intermediate) -> CallbackAction + Send>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_round_trip() {
        let results = OptimizationResults {
            optimizer: "PRS".to_string(),
            problem: "sphere".to_string(),
            best_so_far_x: Array1::from_vec(vec![0.5, -0.25]),
            best_so_far_y: 0.3125,
            n_function_evaluations: 10,
            n_generations: 1,
            runtime: 0.01,
            termination_signal: TerminationSignal::MaxFunctionEvaluations,
            fitness: vec![(1, 2.0), (10, 0.3125)],
            mean: None,
            sigma: Some(Array1::ones(2)),
        };
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nested").join("prs.json");
        results.to_json_file(&path).unwrap();
        let back = OptimizationResults::from_json_file(&path).unwrap();
        assert_eq!(back.best_so_far_x, results.best_so_far_x);
        assert_eq!(back.fitness, results.fitness);
        assert_eq!(back.termination_signal, TerminationSignal::MaxFunctionEvaluations);
        assert!(back.mean.is_none());
        assert!(back.summary().contains("PRS on sphere"));

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"max_function_evaluations\""));
    }
}

//! Run options shared by every optimizer

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{OptError, Result};

/// Termination criteria, seeding, logging and history settings
///
/// At least one of `max_function_evaluations`, `max_runtime` or
/// `fitness_threshold` must be set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Evaluation budget; never exceeded
    pub max_function_evaluations: Option<usize>,
    /// Wall-clock budget in seconds
    pub max_runtime: Option<f64>,
    /// Stop once the best fitness is <= this value
    pub fitness_threshold: Option<f64>,
    /// RNG seed; a fresh seed is drawn when absent
    pub seed: Option<u64>,
    /// Log progress every `verbose` generations (0 = quiet)
    pub verbose: usize,
    /// Record best-so-far every `saving_fitness` evaluations; the first and
    /// the last evaluation are always recorded
    pub saving_fitness: usize,
    /// Stop when the best fitness improved by less than
    /// `early_stopping_threshold` over this many evaluations
    pub early_stopping_evaluations: Option<usize>,
    pub early_stopping_threshold: f64,
    /// Evaluate batches with rayon
    pub parallel: bool,
    /// Size of a dedicated thread pool (rayon's global pool when absent)
    pub num_threads: Option<usize>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            max_function_evaluations: None,
            max_runtime: None,
            fitness_threshold: None,
            seed: None,
            verbose: 0,
            saving_fitness: 0,
            early_stopping_evaluations: None,
            early_stopping_threshold: 0.0,
            parallel: false,
            num_threads: None,
        }
    }
}

impl Options {
    pub fn builder() -> OptionsBuilder {
        OptionsBuilder::new()
    }

    /// Reject option sets that could never terminate or are out of range
    pub fn validate(&self) -> Result<()> {
        if self.max_function_evaluations.is_none()
            && self.max_runtime.is_none()
            && self.fitness_threshold.is_none()
        {
            return Err(OptError::NoTermination);
        }
        if self.max_function_evaluations == Some(0) {
            return Err(OptError::invalid("max_function_evaluations", "must be >= 1"));
        }
        match self.max_runtime {
            Some(t) if !(t > 0.0) => {
                return Err(OptError::invalid("max_runtime", format!("must be > 0, got {}", t)));
            }
            _ => {}
        }
        if self.early_stopping_evaluations == Some(0) {
            return Err(OptError::invalid("early_stopping_evaluations", "must be >= 1"));
        }
        if self.num_threads == Some(0) {
            return Err(OptError::invalid("num_threads", "must be >= 1"));
        }
        if self.early_stopping_threshold < 0.0 {
            return Err(OptError::invalid("early_stopping_threshold", "must be >= 0"));
        }
        Ok(())
    }

    /// Load options from a JSON file; missing fields take their defaults
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| OptError::io(path, e))?;
        let options: Options = serde_json::from_str(&text)?;
        options.validate()?;
        Ok(options)
    }

    pub fn to_json_file(&self, path: &Path) -> Result<()> {
        let text = serde_json::to_string_pretty(self)?;
        fs::write(path, text).map_err(|e| OptError::io(path, e))
    }
}

/// Fluent builder for [`Options`]
#[derive(Debug, Clone, Default)]
pub struct OptionsBuilder {
    options: Options,
}

impl OptionsBuilder {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn max_function_evaluations(mut self, v: usize) -> Self {
        self.options.max_function_evaluations = Some(v);
        self
    }
    pub fn max_runtime(mut self, seconds: f64) -> Self {
        self.options.max_runtime = Some(seconds);
        self
    }
    pub fn fitness_threshold(mut self, v: f64) -> Self {
        self.options.fitness_threshold = Some(v);
        self
    }
    pub fn seed(mut self, v: u64) -> Self {
        self.options.seed = Some(v);
        self
    }
    pub fn verbose(mut self, every: usize) -> Self {
        self.options.verbose = every;
        self
    }
    pub fn saving_fitness(mut self, every: usize) -> Self {
        self.options.saving_fitness = every;
        self
    }
    pub fn early_stopping(mut self, evaluations: usize, threshold: f64) -> Self {
        self.options.early_stopping_evaluations = Some(evaluations);
        self.options.early_stopping_threshold = threshold;
        self
    }
    pub fn parallel(mut self, enabled: bool) -> Self {
        self.options.parallel = enabled;
        self
    }
    pub fn num_threads(mut self, n: usize) -> Self {
        self.options.num_threads = Some(n);
        self
    }
    /// Validate and return the options
    pub fn build(self) -> Result<Options> {
        self.options.validate()?;
        Ok(self.options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_needs_a_limit() {
        assert!(matches!(Options::default().validate(), Err(OptError::NoTermination)));
        assert!(Options::builder().fitness_threshold(1e-8).build().is_ok());
        assert!(Options::builder().max_runtime(0.5).build().is_ok());
        assert!(Options::builder().max_runtime(0.0).build().is_err());
        assert!(Options::builder().max_function_evaluations(0).build().is_err());
    }

    #[test]
    fn test_builder() {
        let o = Options::builder()
            .max_function_evaluations(1000)
            .seed(7)
            .verbose(10)
            .saving_fitness(100)
            .early_stopping(500, 1e-10)
            .parallel(true)
            .build()
            .unwrap();
        assert_eq!(o.max_function_evaluations, Some(1000));
        assert_eq!(o.seed, Some(7));
        assert_eq!(o.early_stopping_evaluations, Some(500));
        assert!(o.parallel);
    }

    #[test]
    fn test_json_defaults_and_round_trip() {
        let o: Options = serde_json::from_str(r#"{"max_function_evaluations": 50}"#).unwrap();
        assert_eq!(o.max_function_evaluations, Some(50));
        assert_eq!(o.verbose, 0);
        assert!(!o.parallel);

        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("options.json");
        let o = Options::builder().max_runtime(2.0).seed(3).build().unwrap();
        o.to_json_file(&path).unwrap();
        assert_eq!(Options::from_json_file(&path).unwrap(), o);

        fs::write(&path, "{}").unwrap();
        assert!(Options::from_json_file(&path).unwrap_err().is_config_error());
    }
}

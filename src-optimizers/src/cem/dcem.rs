//! Differentiable cross-entropy method
//!
//! Amos and Yarats, "The differentiable cross-entropy method", ICML 2020.
//! The hard elite selection of CEM is replaced by the soft top-k weights of
//! [`lml`](super::lml::lml) applied to normalized fitness values.

use ndarray::{Array1, Axis};
use serde::{Deserialize, Serialize};

use super::lml::lml;
use super::{StepSize, check_population, initial_sigma, is_finite, sample_diagonal};
use crate::error::{OptError, Result};
use crate::evaluator::Evaluator;
use crate::optimizer::Optimizer;
use crate::options::Options;
use crate::problem::Problem;
use crate::results::{Callback, OptimizationResults};
use crate::sampling::{initial_mean, make_rng};
use crate::termination::TerminationSignal;

/// DCEM settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DcemConfig {
    /// Samples per generation
    pub n_individuals: usize,
    /// `k` of the soft top-k selection
    pub n_parents: usize,
    pub mean: Option<Array1<f64>>,
    pub sigma: Option<StepSize>,
    /// Sharpness of the soft selection
    pub temperature: f64,
}

impl Default for DcemConfig {
    fn default() -> Self {
        Self { n_individuals: 1000, n_parents: 200, mean: None, sigma: None, temperature: 1.0 }
    }
}

impl DcemConfig {
    pub fn n_individuals(mut self, n: usize) -> Self {
        self.n_individuals = n;
        self
    }
    pub fn n_parents(mut self, n: usize) -> Self {
        self.n_parents = n;
        self
    }
    pub fn mean(mut self, mean: Array1<f64>) -> Self {
        self.mean = Some(mean);
        self
    }
    pub fn sigma(mut self, sigma: impl Into<StepSize>) -> Self {
        self.sigma = Some(sigma.into());
        self
    }
    pub fn temperature(mut self, t: f64) -> Self {
        self.temperature = t;
        self
    }

    pub fn validate(&self) -> Result<()> {
        check_population(self.n_individuals, self.n_parents)?;
        if !(self.temperature > 0.0) || !self.temperature.is_finite() {
            return Err(OptError::invalid("temperature", "must be finite and > 0"));
        }
        Ok(())
    }
}

/// Normalize fitness to zero mean and unit spread
///
/// Infinite values (failed evaluations) are clamped to the worst finite
/// value of the batch first.
fn normalize(y: &Array1<f64>) -> Array1<f64> {
    let worst = y.iter().copied().filter(|v| v.is_finite()).fold(f64::NEG_INFINITY, f64::max);
    let worst = if worst.is_finite() { worst } else { 0.0 };
    let y = y.mapv(|v| if v.is_finite() { v } else { worst });
    let mean = y.mean().unwrap_or(0.0);
    let std = y.std(0.0);
    (y - mean) / (std + 1e-6)
}

/// Differentiable cross-entropy method
pub struct Dcem<F>
where
    F: Fn(&Array1<f64>) -> f64 + Sync,
{
    problem: Problem<F>,
    options: Options,
    config: DcemConfig,
    callback: Option<Callback>,
}

impl<F> Dcem<F>
where
    F: Fn(&Array1<f64>) -> f64 + Sync,
{
    pub fn new(problem: Problem<F>, options: Options, config: DcemConfig) -> Result<Self> {
        options.validate()?;
        config.validate()?;
        if let Some(m) = &config.mean {
            problem.check_len("mean", m)?;
        }
        Ok(Self { problem, options, config, callback: None })
    }
}

impl<F> Optimizer for Dcem<F>
where
    F: Fn(&Array1<f64>) -> f64 + Sync,
{
    fn name(&self) -> &'static str {
        "DCEM"
    }

    fn set_callback(&mut self, callback: Callback) {
        self.callback = Some(callback);
    }

    fn optimize(&mut self) -> Result<OptimizationResults> {
        let mut rng = make_rng(self.options.seed);
        let mut mean = initial_mean(&mut rng, &self.problem, self.config.mean.as_ref())?;
        let mut sigma = initial_sigma(&self.problem, self.config.sigma.as_ref())?;
        let mut ev = Evaluator::new("DCEM", &self.problem, &self.options)?;
        let k = self.config.n_parents as f64;

        let mut generation = 0;
        loop {
            let x = sample_diagonal(&mut rng, self.config.n_individuals, &mean, &sigma);
            let Some(y) = ev.evaluate_batch(&x) else { break };

            let scores = normalize(&y) * -self.config.temperature;
            let weights = lml(&scores, self.config.n_parents).insert_axis(Axis(1));
            mean = (&x * &weights).sum_axis(Axis(0)) / k;
            let centered = &x - &mean;
            sigma = ((&centered * &centered * &weights).sum_axis(Axis(0)) / k).mapv(f64::sqrt);
            if !is_finite(&mean) || !is_finite(&sigma) {
                ev.stop(TerminationSignal::NumericalInstability);
                break;
            }

            generation += 1;
            if !ev.report_generation(generation, &mut self.callback) {
                break;
            }
        }
        ev.finish(Some(mean), Some(sigma))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_normalize() {
        let y = Array1::from_vec(vec![1.0, 3.0, f64::INFINITY]);
        let z = normalize(&y);
        // inf becomes 3.0: values 1, 3, 3
        assert!(z[0] < 0.0);
        assert_abs_diff_eq!(z[1], z[2]);
        assert_abs_diff_eq!(z.sum(), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_config_validation() {
        let c = DcemConfig::default();
        assert!(c.validate().is_ok());
        // same population as SCEM
        assert_eq!((c.n_individuals, c.n_parents), (1000, 200));
        assert!(DcemConfig::default().temperature(0.0).validate().is_err());
        assert!(DcemConfig::default().n_parents(0).validate().is_err());
    }

    #[test]
    fn test_sphere_progress() {
        let p = Problem::with_uniform_bounds(|x: &Array1<f64>| x.dot(x), 3, -5.0, 5.0).unwrap();
        let o = Options::builder().max_function_evaluations(5000).seed(3).build().unwrap();
        let c = DcemConfig::default().n_individuals(100).n_parents(20).sigma(3.0);
        let mut dcem = Dcem::new(p, o, c).unwrap();
        let r = dcem.optimize().unwrap();
        assert_eq!(r.n_function_evaluations, 5000);
        assert_eq!(r.optimizer, "DCEM");
        assert!(r.best_so_far_y < 1e-1, "best {}", r.best_so_far_y);
    }
}

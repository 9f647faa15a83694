//! Standard cross-entropy method
//!
//! Kroese, Porotsky and Rubinstein, "The cross-entropy method for
//! continuous multi-extremal optimization", 2006.

use ndarray::{Array1, Axis};
use serde::{Deserialize, Serialize};

use super::{StepSize, check_population, initial_sigma, is_finite, sample_diagonal};
use crate::error::{OptError, Result};
use crate::optimizer::Optimizer;
use crate::options::Options;
use crate::problem::Problem;
use crate::results::{Callback, OptimizationResults};
use crate::sampling::{argsort, initial_mean, make_rng};
use crate::termination::TerminationSignal;
use crate::evaluator::Evaluator;

/// SCEM settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScemConfig {
    /// Samples per generation
    pub n_individuals: usize,
    /// Elites used to refit the distribution
    pub n_parents: usize,
    /// Initial mean (uniform in the initial bounds when absent)
    pub mean: Option<Array1<f64>>,
    /// Initial standard deviation (30% of the initial range when absent)
    pub sigma: Option<StepSize>,
    /// Smoothing factor of the mean/sigma updates
    pub alpha: f64,
}

impl Default for ScemConfig {
    fn default() -> Self {
        Self { n_individuals: 1000, n_parents: 200, mean: None, sigma: None, alpha: 0.8 }
    }
}

impl ScemConfig {
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
    pub fn alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn validate(&self) -> Result<()> {
        check_population(self.n_individuals, self.n_parents)?;
        if !(self.alpha > 0.0 && self.alpha <= 1.0) {
            return Err(OptError::invalid("alpha", format!("must be in (0, 1], got {}", self.alpha)));
        }
        Ok(())
    }
}

/// Standard cross-entropy method
pub struct Scem<F>
where
    F: Fn(&Array1<f64>) -> f64 + Sync,
{
    problem: Problem<F>,
    options: Options,
    config: ScemConfig,
    callback: Option<Callback>,
}

impl<F> Scem<F>
where
    F: Fn(&Array1<f64>) -> f64 + Sync,
{
    pub fn new(problem: Problem<F>, options: Options, config: ScemConfig) -> Result<Self> {
        options.validate()?;
        config.validate()?;
        if let Some(m) = &config.mean {
            problem.check_len("mean", m)?;
        }
        Ok(Self { problem, options, config, callback: None })
    }
}

impl<F> Optimizer for Scem<F>
where
    F: Fn(&Array1<f64>) -> f64 + Sync,
{
    fn name(&self) -> &'static str {
        "SCEM"
    }

    fn set_callback(&mut self, callback: Callback) {
        self.callback = Some(callback);
    }

    fn optimize(&mut self) -> Result<OptimizationResults> {
        let mut rng = make_rng(self.options.seed);
        let mut mean = initial_mean(&mut rng, &self.problem, self.config.mean.as_ref())?;
        let mut sigma = initial_sigma(&self.problem, self.config.sigma.as_ref())?;
        let mut ev = Evaluator::new("SCEM", &self.problem, &self.options)?;
        let alpha = self.config.alpha;

        let mut generation = 0;
        loop {
            let x = sample_diagonal(&mut rng, self.config.n_individuals, &mean, &sigma);
            let Some(y) = ev.evaluate_batch(&x) else { break };

            let order = argsort(&y);
            let elites = x.select(Axis(0), &order[..self.config.n_parents]);
            let Some(elite_mean) = elites.mean_axis(Axis(0)) else {
                ev.stop(TerminationSignal::NumericalInstability);
                break;
            };
            let elite_std = elites.std_axis(Axis(0), 0.0);
            mean = elite_mean * alpha + &mean * (1.0 - alpha);
            sigma = elite_std * alpha + &sigma * (1.0 - alpha);
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

    #[test]
    fn test_config_validation() {
        assert!(ScemConfig::default().validate().is_ok());
        assert!(ScemConfig::default().alpha(0.0).validate().is_err());
        assert!(ScemConfig::default().n_parents(2000).validate().is_err());
        let p = Problem::with_uniform_bounds(|x: &Array1<f64>| x.sum(), 2, -1.0, 1.0).unwrap();
        let o = Options::builder().max_function_evaluations(10).build().unwrap();
        let c = ScemConfig::default().mean(Array1::zeros(3));
        assert!(Scem::new(p, o, c).is_err());
    }

    #[test]
    fn test_distribution_shrinks_on_sphere() {
        let p = Problem::with_uniform_bounds(|x: &Array1<f64>| x.dot(x), 3, -5.0, 5.0).unwrap();
        let o = Options::builder().max_function_evaluations(3000).seed(5).build().unwrap();
        let c = ScemConfig::default().n_individuals(100).n_parents(20).sigma(2.0);
        let mut scem = Scem::new(p, o, c).unwrap();
        let r = scem.optimize().unwrap();
        assert_eq!(r.n_function_evaluations, 3000);
        assert_eq!(r.n_generations, 30);
        let sigma = r.sigma.unwrap();
        assert!(sigma.iter().all(|&s| s < 2.0), "sigma did not shrink: {}", sigma);
        assert!(r.best_so_far_y < 1e-2, "best {}", r.best_so_far_y);
    }
}

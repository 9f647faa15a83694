//! BErnoulli Smoothing (BES)
//!
//! Gao and Sener, "Generalizing Gaussian smoothing for random search",
//! ICML 2022. The gradient of the smoothed objective is estimated with
//! Rademacher perturbations:
//!
//! `g = sum_k (f(x + c u_k) - f(x)) u_k / (c K)`, `u_k` in `{-1, +1}^n`
//!
//! and the point moves by plain gradient descent `x <- x - lr g`.

use ndarray::Array1;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{OptError, Result};
use crate::evaluator::Evaluator;
use crate::optimizer::Optimizer;
use crate::options::Options;
use crate::problem::Problem;
use crate::results::{Callback, OptimizationResults};
use crate::sampling::{initial_mean, make_rng};
use crate::termination::TerminationSignal;

/// BES settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BesConfig {
    /// Perturbations per gradient estimate (`K`)
    pub n_individuals: usize,
    /// Learning rate
    pub lr: f64,
    /// Perturbation size
    pub c: f64,
    /// Starting point (uniform in the initial bounds when absent)
    pub mean: Option<Array1<f64>>,
}

impl Default for BesConfig {
    fn default() -> Self {
        Self { n_individuals: 10, lr: 0.001, c: 0.1, mean: None }
    }
}

impl BesConfig {
    pub fn n_individuals(mut self, n: usize) -> Self {
        self.n_individuals = n;
        self
    }
    pub fn lr(mut self, lr: f64) -> Self {
        self.lr = lr;
        self
    }
    pub fn c(mut self, c: f64) -> Self {
        self.c = c;
        self
    }
    pub fn mean(mut self, mean: Array1<f64>) -> Self {
        self.mean = Some(mean);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.n_individuals == 0 {
            return Err(OptError::invalid("n_individuals", "must be >= 1"));
        }
        if !(self.lr > 0.0) {
            return Err(OptError::invalid("lr", format!("must be > 0, got {}", self.lr)));
        }
        if !(self.c > 0.0) {
            return Err(OptError::invalid("c", format!("must be > 0, got {}", self.c)));
        }
        Ok(())
    }
}

/// Bernoulli smoothing random search
pub struct Bes<F>
where
    F: Fn(&Array1<f64>) -> f64 + Sync,
{
    problem: Problem<F>,
    options: Options,
    config: BesConfig,
    callback: Option<Callback>,
}

impl<F> Bes<F>
where
    F: Fn(&Array1<f64>) -> f64 + Sync,
{
    pub fn new(problem: Problem<F>, options: Options, config: BesConfig) -> Result<Self> {
        options.validate()?;
        config.validate()?;
        if let Some(m) = &config.mean {
            problem.check_len("mean", m)?;
        }
        Ok(Self { problem, options, config, callback: None })
    }
}

impl<F> Optimizer for Bes<F>
where
    F: Fn(&Array1<f64>) -> f64 + Sync,
{
    fn name(&self) -> &'static str {
        "BES"
    }

    fn set_callback(&mut self, callback: Callback) {
        self.callback = Some(callback);
    }

    fn optimize(&mut self) -> Result<OptimizationResults> {
        let mut rng = make_rng(self.options.seed);
        let mut x = initial_mean(&mut rng, &self.problem, self.config.mean.as_ref())?;
        let mut ev = Evaluator::new("BES", &self.problem, &self.options)?;
        let (k, lr, c) = (self.config.n_individuals, self.config.lr, self.config.c);
        let ndim = self.problem.ndim;

        let mut generation = 0;
        'run: loop {
            let Some(y) = ev.evaluate(&x) else { break };
            let mut gradient = Array1::<f64>::zeros(ndim);
            for _ in 0..k {
                let u = Array1::from_shape_fn(ndim, |_| if rng.random::<bool>() { 1.0 } else { -1.0 });
                let Some(yk) = ev.evaluate(&(&x + &(&u * c))) else { break 'run };
                gradient.scaled_add(yk - y, &u);
            }
            gradient /= c * k as f64;
            x.scaled_add(-lr, &gradient);
            if x.iter().any(|v| !v.is_finite()) {
                log::warn!("BES diverged after {} evaluations, try a smaller lr", ev.n_function_evaluations());
                ev.stop(TerminationSignal::NumericalInstability);
                break;
            }

            generation += 1;
            if !ev.report_generation(generation, &mut self.callback) {
                break;
            }
        }
        ev.finish(Some(x), None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_validation() {
        assert!(BesConfig::default().validate().is_ok());
        assert!(BesConfig::default().lr(0.0).validate().is_err());
        assert!(BesConfig::default().c(-1.0).validate().is_err());
        assert!(BesConfig::default().n_individuals(0).validate().is_err());
    }

    #[test]
    fn test_linear_gradient_is_exact() {
        // in one dimension u_k^2 = 1, so the estimate of a slope is exact
        let p = Problem::with_uniform_bounds(|x: &Array1<f64>| 2.0 * x[0], 1, -10.0, 10.0).unwrap();
        let o = Options::builder().max_function_evaluations(11).seed(1).build().unwrap();
        let c = BesConfig::default().lr(0.5).mean(Array1::zeros(1));
        let r = Bes::new(p, o, c).unwrap().optimize().unwrap();
        let x = r.mean.unwrap();
        assert!((x[0] + 1.0).abs() < 1e-12, "x = {}", x);
        assert_eq!(r.n_generations, 1);
        assert_eq!(r.termination_signal, TerminationSignal::MaxFunctionEvaluations);
    }

    #[test]
    fn test_divergence_is_reported() {
        let p = Problem::with_uniform_bounds(|x: &Array1<f64>| x.mapv(|v| v.powi(4)).sum(), 2, -5.0, 5.0)
            .unwrap();
        let o = Options::builder().max_function_evaluations(100_000).seed(0).build().unwrap();
        let c = BesConfig::default().lr(10.0).mean(Array1::from_elem(2, 3.0));
        let r = Bes::new(p, o, c).unwrap().optimize().unwrap();
        assert_eq!(r.termination_signal, TerminationSignal::NumericalInstability);
        assert!(r.n_function_evaluations < 100_000);
    }
}

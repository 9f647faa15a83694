//! Pure random search: uniform samples in the initial bounds
//!
//! The baseline every other optimizer should beat.

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::error::{OptError, Result};
use crate::evaluator::Evaluator;
use crate::optimizer::Optimizer;
use crate::options::Options;
use crate::problem::Problem;
use crate::results::{Callback, OptimizationResults};
use crate::sampling::{make_rng, uniform_matrix};

/// PRS settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrsConfig {
    /// Samples per generation; larger batches can be evaluated in parallel
    pub n_individuals: usize,
}

impl Default for PrsConfig {
    fn default() -> Self {
        Self { n_individuals: 1 }
    }
}

impl PrsConfig {
    pub fn n_individuals(mut self, n: usize) -> Self {
        self.n_individuals = n;
        self
    }
}

/// Pure random search
pub struct Prs<F>
where
    F: Fn(&Array1<f64>) -> f64 + Sync,
{
    problem: Problem<F>,
    options: Options,
    config: PrsConfig,
    callback: Option<Callback>,
}

impl<F> Prs<F>
where
    F: Fn(&Array1<f64>) -> f64 + Sync,
{
    pub fn new(problem: Problem<F>, options: Options, config: PrsConfig) -> Result<Self> {
        options.validate()?;
        if config.n_individuals == 0 {
            return Err(OptError::invalid("n_individuals", "must be >= 1"));
        }
        Ok(Self { problem, options, config, callback: None })
    }
}

impl<F> Optimizer for Prs<F>
where
    F: Fn(&Array1<f64>) -> f64 + Sync,
{
    fn name(&self) -> &'static str {
        "PRS"
    }

    fn set_callback(&mut self, callback: Callback) {
        self.callback = Some(callback);
    }

    fn optimize(&mut self) -> Result<OptimizationResults> {
        let mut rng = make_rng(self.options.seed);
        let mut ev = Evaluator::new("PRS", &self.problem, &self.options)?;
        let (lower, upper) = (&self.problem.initial_lower, &self.problem.initial_upper);

        let mut generation = 0;
        loop {
            let x = uniform_matrix(&mut rng, self.config.n_individuals, lower, upper);
            if ev.evaluate_batch(&x).is_none() {
                break;
            }
            generation += 1;
            if !ev.report_generation(generation, &mut self.callback) {
                break;
            }
        }
        ev.finish(None, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::termination::TerminationSignal;

    #[test]
    fn test_samples_initial_box_only() {
        let p = Problem::with_uniform_bounds(|x: &Array1<f64>| x.sum(), 2, -10.0, 10.0)
            .unwrap()
            .initial_bounds(Array1::from_elem(2, 1.0), Array1::from_elem(2, 2.0))
            .unwrap();
        let o = Options::builder().max_function_evaluations(95).seed(2).build().unwrap();
        let r = Prs::new(p, o, PrsConfig::default().n_individuals(10)).unwrap().optimize().unwrap();
        assert_eq!(r.n_function_evaluations, 95);
        // nine full batches, the tenth is cut short
        assert_eq!(r.n_generations, 9);
        assert!(r.best_so_far_y >= 2.0 && r.best_so_far_y < 2.5);
        assert_eq!(r.termination_signal, TerminationSignal::MaxFunctionEvaluations);
    }
}

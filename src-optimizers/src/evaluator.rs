//! Shared bookkeeping of every optimizer
//!
//! All fitness evaluations go through an [`Evaluator`]. It checks the
//! termination criteria before each evaluation, so a run never spends more
//! than `max_function_evaluations`, and keeps the best-so-far solution and the
//! fitness history that end up in [`OptimizationResults`].
//!
//! A parallel batch is evaluated as a whole, then recorded row by row with the
//! same checks as the sequential path: rows after the one that reached the
//! fitness threshold are discarded and do not count. The runtime limit can
//! only be noticed once the batch is back.

use std::time::Instant;

use ndarray::{Array1, Array2, ArrayView1, s};

use crate::error::{OptError, Result};
use crate::options::Options;
use crate::parallel_eval::{ParallelConfig, ParallelEvaluator};
use crate::problem::Problem;
use crate::results::{Callback, CallbackAction, Intermediate, OptimizationResults};
use crate::termination::TerminationSignal;

pub struct Evaluator<'a, F>
where
    F: Fn(&Array1<f64>) -> f64 + Sync,
{
    optimizer: &'static str,
    problem: &'a Problem<F>,
    options: &'a Options,
    parallel: ParallelEvaluator,
    start: Instant,
    n_fe: usize,
    n_generations: usize,
    best_x: Array1<f64>,
    best_y: f64,
    fitness: Vec<(usize, f64)>,
    signal: Option<TerminationSignal>,
    // best value and evaluation count at the last significant improvement
    stall_y: f64,
    stall_fe: usize,
}

impl<'a, F> Evaluator<'a, F>
where
    F: Fn(&Array1<f64>) -> f64 + Sync,
{
    /// Start the clock for `optimizer` on `problem`
    pub fn new(optimizer: &'static str, problem: &'a Problem<F>, options: &'a Options) -> Result<Self> {
        options.validate()?;
        log::debug!(
            "{} on {} (dim {}), budget {:?} evaluations / {:?}s, seed {:?}",
            optimizer,
            problem.name,
            problem.ndim,
            options.max_function_evaluations,
            options.max_runtime,
            options.seed
        );
        Ok(Self {
            optimizer,
            problem,
            options,
            parallel: ParallelEvaluator::new(&ParallelConfig {
                enabled: options.parallel,
                num_threads: options.num_threads,
            }),
            start: Instant::now(),
            n_fe: 0,
            n_generations: 0,
            best_x: Array1::zeros(problem.ndim),
            best_y: f64::INFINITY,
            fitness: Vec::new(),
            signal: None,
            stall_y: f64::INFINITY,
            stall_fe: 0,
        })
    }

    pub fn problem(&self) -> &Problem<F> {
        self.problem
    }

    pub fn n_function_evaluations(&self) -> usize {
        self.n_fe
    }

    pub fn best_y(&self) -> f64 {
        self.best_y
    }

    pub fn best_x(&self) -> &Array1<f64> {
        &self.best_x
    }

    /// Seconds since the evaluator was created
    pub fn elapsed(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }

    /// Evaluations left in the budget, if there is one
    pub fn remaining_evaluations(&self) -> Option<usize> {
        self.options.max_function_evaluations.map(|max| max.saturating_sub(self.n_fe))
    }

    pub fn is_terminated(&self) -> bool {
        self.signal.is_some()
    }

    /// End the run with `signal` unless it already ended
    pub fn stop(&mut self, signal: TerminationSignal) {
        if self.signal.is_none() {
            log::debug!("{} stopped: {}", self.optimizer, signal);
            self.signal = Some(signal);
        }
    }

    /// Check every criterion, in a fixed order, and latch the first that fires
    pub fn check_termination(&mut self) -> Option<TerminationSignal> {
        if self.signal.is_some() {
            return self.signal;
        }
        let o = self.options;
        let signal = if o.max_function_evaluations.is_some_and(|max| self.n_fe >= max) {
            Some(TerminationSignal::MaxFunctionEvaluations)
        } else if o.max_runtime.is_some_and(|max| self.elapsed() >= max) {
            Some(TerminationSignal::MaxRuntime)
        } else if o.fitness_threshold.is_some_and(|t| self.best_y <= t) {
            Some(TerminationSignal::FitnessThreshold)
        } else if o.early_stopping_evaluations.is_some_and(|w| self.n_fe - self.stall_fe >= w) {
            Some(TerminationSignal::EarlyStopping)
        } else {
            None
        };
        if let Some(signal) = signal {
            self.stop(signal);
        }
        signal
    }

    /// Evaluate one point; `None` once the run has terminated
    pub fn evaluate(&mut self, x: &Array1<f64>) -> Option<f64> {
        if self.check_termination().is_some() {
            return None;
        }
        let y = (self.problem.fitness_function)(x);
        Some(self.record(x.view(), y))
    }

    /// Evaluate every row of `xs`
    ///
    /// Returns `None` when the run terminated before the whole batch was
    /// evaluated; the rows that were evaluated still count towards the
    /// budget and the best-so-far.
    pub fn evaluate_batch(&mut self, xs: &Array2<f64>) -> Option<Array1<f64>> {
        if self.check_termination().is_some() {
            return None;
        }
        let n = xs.nrows();
        if !self.parallel.is_enabled() || n < 4 {
            let mut ys = Array1::zeros(n);
            for (i, row) in xs.outer_iter().enumerate() {
                ys[i] = self.evaluate(&row.to_owned())?;
            }
            return Some(ys);
        }

        let take = self.remaining_evaluations().map_or(n, |left| left.min(n));
        let rows = xs.slice(s![..take, ..]);
        let raw = self.parallel.evaluate_rows(rows, &self.problem.fitness_function);
        let mut ys = Vec::with_capacity(n);
        for (row, y) in rows.outer_iter().zip(raw) {
            if self.check_termination().is_some() {
                return None;
            }
            ys.push(self.record(row, y));
        }
        if take < n {
            self.check_termination();
            return None;
        }
        Some(Array1::from_vec(ys))
    }

    fn record(&mut self, x: ArrayView1<'_, f64>, y: f64) -> f64 {
        let y = if y.is_finite() { y } else { f64::INFINITY };
        self.n_fe += 1;
        if y < self.best_y {
            self.best_y = y;
            self.best_x.assign(&x);
        }
        if self.best_y < self.stall_y - self.options.early_stopping_threshold {
            self.stall_y = self.best_y;
            self.stall_fe = self.n_fe;
        }
        let every = self.options.saving_fitness;
        if self.n_fe == 1 || (every > 0 && self.n_fe % every == 0) {
            self.fitness.push((self.n_fe, self.best_y));
        }
        y
    }

    /// Close generation `generation`: log, run the callback, check termination
    ///
    /// Returns `false` when the optimizer must stop.
    pub fn report_generation(&mut self, generation: usize, callback: &mut Option<Callback>) -> bool {
        self.n_generations = generation;
        let every = self.options.verbose;
        if every > 0 && generation % every == 0 {
            log::info!(
                "{} gen {:>6} | fe {:>9} | best {:>14.6e} | {:.2}s",
                self.optimizer,
                generation,
                self.n_fe,
                self.best_y,
                self.elapsed()
            );
        }
        if let Some(cb) = callback.as_mut() {
            let intermediate = Intermediate {
                generation,
                n_function_evaluations: self.n_fe,
                x: self.best_x.clone(),
                fun: self.best_y,
                runtime: self.elapsed(),
            };
            if let CallbackAction::Stop = cb(&intermediate) {
                self.stop(TerminationSignal::Callback);
                return false;
            }
        }
        self.check_termination().is_none()
    }

    /// Build the results; `mean`/`sigma` describe the final search distribution
    ///
    /// The run must have ended through a termination criterion or [`stop`](Self::stop).
    pub fn finish(
        mut self,
        mean: Option<Array1<f64>>,
        sigma: Option<Array1<f64>>,
    ) -> Result<OptimizationResults> {
        let Some(signal) = self.check_termination() else {
            return Err(OptError::NotTerminated(self.optimizer));
        };
        if self.fitness.last().is_some_and(|&(fe, _)| fe != self.n_fe) {
            self.fitness.push((self.n_fe, self.best_y));
        }
        let results = OptimizationResults {
            optimizer: self.optimizer.to_string(),
            problem: self.problem.name.clone(),
            best_so_far_x: self.best_x,
            best_so_far_y: self.best_y,
            n_function_evaluations: self.n_fe,
            n_generations: self.n_generations,
            runtime: self.start.elapsed().as_secs_f64(),
            termination_signal: signal,
            fitness: self.fitness,
            mean,
            sigma,
        };
        if self.options.verbose > 0 {
            log::info!("{}", results.summary());
        }
        Ok(results)
    }
}

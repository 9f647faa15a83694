use ndarray::{Array1, ArrayView2};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

/// Parallel evaluation configuration
#[derive(Debug, Clone, Default)]
pub struct ParallelConfig {
    /// Enable parallel evaluation
    pub enabled: bool,
    /// Number of threads to use (None = use rayon default)
    pub num_threads: Option<usize>,
}

/// Batch evaluator holding the thread pool of one run
///
/// The dedicated pool (when `num_threads` is set) is built once and reused
/// for every batch.
pub struct ParallelEvaluator {
    enabled: bool,
    pool: Option<ThreadPool>,
}

impl ParallelEvaluator {
    pub fn new(config: &ParallelConfig) -> Self {
        let pool = match config.num_threads {
            Some(threads) if config.enabled => {
                match ThreadPoolBuilder::new().num_threads(threads).build() {
                    Ok(pool) => Some(pool),
                    Err(e) => {
                        log::warn!(
                            "cannot build a {}-thread pool ({}), using the global pool",
                            threads,
                            e
                        );
                        None
                    }
                }
            }
            _ => None,
        };
        Self { enabled: config.enabled, pool }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Threads a parallel batch runs on
    pub fn num_threads(&self) -> usize {
        self.pool.as_ref().map_or_else(rayon::current_num_threads, |p| p.current_num_threads())
    }

    /// Evaluate every row of `rows` in order
    ///
    /// Small batches (fewer than 4 rows) or a disabled config run sequentially.
    pub fn evaluate_rows<F>(&self, rows: ArrayView2<'_, f64>, eval_fn: &F) -> Vec<f64>
    where
        F: Fn(&Array1<f64>) -> f64 + Sync,
    {
        let n = rows.nrows();
        if !self.enabled || n < 4 {
            return rows.outer_iter().map(|row| eval_fn(&row.to_owned())).collect();
        }

        let run = || -> Vec<f64> {
            (0..n)
                .into_par_iter()
                .map(|i| eval_fn(&rows.row(i).to_owned()))
                .collect()
        };
        match &self.pool {
            Some(pool) => pool.install(run),
            None => run(),
        }
    }
}

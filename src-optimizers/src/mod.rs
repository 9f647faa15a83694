//! Black-box optimizers in pure Rust using ndarray
//!
//! Every optimizer minimizes a [`Problem`] under a common set of
//! [`Options`] and reports an [`OptimizationResults`]:
//!
//! - **Cross-entropy methods**: [`Scem`] (standard CEM) and [`Dcem`]
//!   (differentiable CEM with soft top-k weights from [`lml`])
//! - **Evolution strategies**: [`Vdcma`], a CMA-ES restricted to the
//!   covariance `D (I + v v^T) D`
//! - **Particle swarms**: [`Spso`] with a global or ring topology
//! - **Random search**: [`Bes`] (Bernoulli smoothing) and [`Prs`]
//!
//! Termination is checked before every fitness evaluation, so the evaluation
//! budget is never exceeded.
//!
//! # Example
//!
//! ```rust
//! use ndarray::Array1;
//! use blackbox_optimizers::{Optimizer, Options, Problem, Scem, ScemConfig};
//!
//! let problem = Problem::with_uniform_bounds(|x: &Array1<f64>| x.dot(x), 2, -5.0, 5.0).unwrap();
//! let options = Options::builder().max_function_evaluations(2_000).seed(1).build().unwrap();
//! let config = ScemConfig::default().n_individuals(50).n_parents(10);
//! let mut scem = Scem::new(problem, options, config).unwrap();
//! let results = scem.optimize().unwrap();
//! assert_eq!(results.n_function_evaluations, 2_000);
//! ```

pub mod cem;
pub mod error;
pub mod es;
pub mod evaluator;
pub mod options;
pub mod optimizer;
pub mod parallel_eval;
pub mod problem;
pub mod pso;
pub mod recorder;
pub mod registry;
pub mod results;
pub mod rs;
pub mod sampling;
pub mod termination;

pub use cem::{Dcem, DcemConfig, Scem, ScemConfig, StepSize, lml};
pub use error::{OptError, Result};
pub use es::{Vdcma, VdcmaConfig};
pub use evaluator::Evaluator;
pub use optimizer::Optimizer;
pub use options::{Options, OptionsBuilder};
pub use parallel_eval::{ParallelConfig, ParallelEvaluator};
pub use problem::Problem;
pub use pso::{Spso, SpsoConfig, Topology};
pub use recorder::{OptimizationRecord, OptimizationRecorder};
pub use registry::{Algorithm, make_optimizer, run_algorithm};
pub use results::{Callback, CallbackAction, Intermediate, OptimizationResults};
pub use rs::{Bes, BesConfig, Prs, PrsConfig};
pub use termination::TerminationSignal;

//! Standard particle swarm optimizer with linearly decreasing inertia
//!
//! Shi and Eberhart, "A modified particle swarm optimizer", 1998.
//!
//! Particles are updated one at a time: a particle that improves its
//! personal best is immediately visible to the particles updated after it in
//! the same generation.

use std::fmt;
use std::str::FromStr;

use ndarray::{Array1, Zip};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{OptError, Result};
use crate::evaluator::Evaluator;
use crate::optimizer::Optimizer;
use crate::options::Options;
use crate::problem::Problem;
use crate::results::{Callback, OptimizationResults};
use crate::sampling::{make_rng, uniform_matrix};

const W_START: f64 = 0.9;
const W_END: f64 = 0.4;

/// Which personal bests a particle learns from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topology {
    /// Every particle sees the whole swarm
    Global,
    /// Particle `i` sees particles `i - radius ..= i + radius` (wrapping)
    Ring { radius: usize },
}

impl fmt::Display for Topology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Topology::Global => write!(f, "global"),
            Topology::Ring { radius } => write!(f, "ring{}", radius),
        }
    }
}

impl FromStr for Topology {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let t = s.trim().to_lowercase();
        match t.as_str() {
            "global" | "gbest" | "star" => Ok(Topology::Global),
            "ring" | "lbest" | "local" => Ok(Topology::Ring { radius: 1 }),
            _ => match t.strip_prefix("ring").map(str::parse::<usize>) {
                Some(Ok(radius)) if radius > 0 => Ok(Topology::Ring { radius }),
                _ => Err(format!("unknown topology: {}", s)),
            },
        }
    }
}

impl Topology {
    /// Index of the best personal best in the neighbourhood of `i`
    fn best_neighbour(&self, i: usize, p_y: &Array1<f64>) -> usize {
        let n = p_y.len();
        let better = |a: usize, b: usize| if p_y[b] < p_y[a] { b } else { a };
        match *self {
            Topology::Global => (1..n).fold(0, better),
            Topology::Ring { radius } => {
                let r = radius.min(n / 2);
                (1..=2 * r).map(|k| (i + n - r + k) % n).fold((i + n - r) % n, better)
            }
        }
    }
}

/// SPSO settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpsoConfig {
    /// Swarm size
    pub n_individuals: usize,
    /// Pull towards the personal best
    pub cognition: f64,
    /// Pull towards the neighbourhood best
    pub society: f64,
    /// Speed limit as a fraction of the search range
    pub max_ratio_v: f64,
    pub topology: Topology,
}

impl Default for SpsoConfig {
    fn default() -> Self {
        Self {
            n_individuals: 20,
            cognition: 2.0,
            society: 2.0,
            max_ratio_v: 0.2,
            topology: Topology::Global,
        }
    }
}

impl SpsoConfig {
    /// Defaults with a ring of radius 1 (the SPSOL variant)
    pub fn local() -> Self {
        Self { topology: Topology::Ring { radius: 1 }, ..Self::default() }
    }
    pub fn n_individuals(mut self, n: usize) -> Self {
        self.n_individuals = n;
        self
    }
    pub fn cognition(mut self, c: f64) -> Self {
        self.cognition = c;
        self
    }
    pub fn society(mut self, c: f64) -> Self {
        self.society = c;
        self
    }
    pub fn max_ratio_v(mut self, r: f64) -> Self {
        self.max_ratio_v = r;
        self
    }
    pub fn topology(mut self, t: Topology) -> Self {
        self.topology = t;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.n_individuals < 2 {
            return Err(OptError::invalid("n_individuals", "must be >= 2"));
        }
        if !(self.cognition >= 0.0) || !(self.society >= 0.0) {
            return Err(OptError::invalid("cognition/society", "must be >= 0"));
        }
        if !(self.max_ratio_v > 0.0 && self.max_ratio_v <= 1.0) {
            return Err(OptError::invalid("max_ratio_v", "must be in (0, 1]"));
        }
        if self.topology == (Topology::Ring { radius: 0 }) {
            return Err(OptError::invalid("topology", "ring radius must be >= 1"));
        }
        Ok(())
    }
}

/// Standard particle swarm optimizer
pub struct Spso<F>
where
    F: Fn(&Array1<f64>) -> f64 + Sync,
{
    problem: Problem<F>,
    options: Options,
    config: SpsoConfig,
    callback: Option<Callback>,
}

impl<F> Spso<F>
where
    F: Fn(&Array1<f64>) -> f64 + Sync,
{
    pub fn new(problem: Problem<F>, options: Options, config: SpsoConfig) -> Result<Self> {
        options.validate()?;
        config.validate()?;
        Ok(Self { problem, options, config, callback: None })
    }

    /// Inertia weight for `generation` (0-based), going from 0.9 to 0.4
    ///
    /// The schedule follows the evaluation budget, or the runtime budget when
    /// there is no evaluation budget.
    fn inertia(&self, generation: usize, elapsed: f64) -> f64 {
        let progress = match (self.options.max_function_evaluations, self.options.max_runtime) {
            (Some(max_fe), _) => {
                let max_generations = max_fe.div_ceil(self.config.n_individuals).max(1);
                ((generation + 1) as f64 / max_generations as f64).min(1.0)
            }
            (None, Some(max_runtime)) => (elapsed / max_runtime).min(1.0),
            (None, None) => 0.0,
        };
        W_START - (W_START - W_END) * progress
    }
}

impl<F> Optimizer for Spso<F>
where
    F: Fn(&Array1<f64>) -> f64 + Sync,
{
    fn name(&self) -> &'static str {
        match self.config.topology {
            Topology::Global => "SPSO",
            Topology::Ring { .. } => "SPSOL",
        }
    }

    fn set_callback(&mut self, callback: Callback) {
        self.callback = Some(callback);
    }

    fn optimize(&mut self) -> Result<OptimizationResults> {
        let name = self.name();
        let c = &self.config;
        let (n, ndim) = (c.n_individuals, self.problem.ndim);
        let mut rng = make_rng(self.options.seed);
        let max_v = self.problem.range() * c.max_ratio_v;
        let min_v = -&max_v;

        let mut v = uniform_matrix(&mut rng, n, &min_v, &max_v);
        let mut x = uniform_matrix(&mut rng, n, &self.problem.initial_lower, &self.problem.initial_upper);
        let mut ev = Evaluator::new(name, &self.problem, &self.options)?;
        let Some(y) = ev.evaluate_batch(&x) else {
            return ev.finish(None, None);
        };
        let mut p_x = x.clone();
        let mut p_y = y;

        let mut generation = 0;
        'run: loop {
            let w = self.inertia(generation, ev.elapsed());
            for i in 0..n {
                let best = c.topology.best_neighbour(i, &p_y);
                let neighbour = p_x.row(best).to_owned();
                let r1: Array1<f64> = Array1::from_shape_fn(ndim, |_| rng.random::<f64>());
                let r2: Array1<f64> = Array1::from_shape_fn(ndim, |_| rng.random::<f64>());
                let mut vi = v.row_mut(i);
                let xi = x.row(i);
                let cognitive = (&p_x.row(i) - &xi) * &r1 * c.cognition;
                let social = (&neighbour - &xi) * &r2 * c.society;
                vi *= w;
                vi += &cognitive;
                vi += &social;
                Zip::from(&mut vi).and(&max_v).for_each(|vij, &m| *vij = (*vij).clamp(-m, m));

                let mut xi = x.row_mut(i);
                xi += &v.row(i);
                Zip::from(&mut xi)
                    .and(&self.problem.lower)
                    .and(&self.problem.upper)
                    .for_each(|xij, &lo, &hi| *xij = (*xij).clamp(lo, hi));

                let candidate = x.row(i).to_owned();
                let Some(yi) = ev.evaluate(&candidate) else { break 'run };
                if yi < p_y[i] {
                    p_y[i] = yi;
                    p_x.row_mut(i).assign(&candidate);
                }
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

    fn neighbourhood(topology: Topology, i: usize, n: usize) -> Vec<usize> {
        match topology {
            Topology::Global => (0..n).collect(),
            Topology::Ring { radius } => {
                let r = radius.min(n / 2);
                let mut idx: Vec<usize> = (0..=2 * r).map(|k| (i + n - r + k) % n).collect();
                idx.sort_unstable();
                idx.dedup();
                idx
            }
        }
    }

    #[test]
    fn test_topology_parse() {
        assert_eq!("global".parse::<Topology>().unwrap(), Topology::Global);
        assert_eq!("ring".parse::<Topology>().unwrap(), Topology::Ring { radius: 1 });
        assert_eq!("ring3".parse::<Topology>().unwrap(), Topology::Ring { radius: 3 });
        assert!("ring0".parse::<Topology>().is_err());
        assert!("mesh".parse::<Topology>().is_err());
        assert_eq!(Topology::Ring { radius: 2 }.to_string(), "ring2");
    }

    #[test]
    fn test_best_neighbour() {
        let p_y = Array1::from_vec(vec![5.0, 1.0, 4.0, 3.0, 0.5, 2.0]);
        assert_eq!(Topology::Global.best_neighbour(0, &p_y), 4);
        let ring = Topology::Ring { radius: 1 };
        assert_eq!(ring.best_neighbour(0, &p_y), 1);
        assert_eq!(ring.best_neighbour(2, &p_y), 1);
        assert_eq!(ring.best_neighbour(5, &p_y), 4);
        // wraps around: neighbours of 5 are 4, 5, 0
        assert_eq!(neighbourhood(ring, 5, 6), vec![0, 4, 5]);
        for i in 0..6 {
            let best = ring.best_neighbour(i, &p_y);
            assert!(neighbourhood(ring, i, 6).contains(&best));
        }
    }

    #[test]
    fn test_inertia_schedule() {
        let p = Problem::with_uniform_bounds(|x: &Array1<f64>| x.sum(), 2, -1.0, 1.0).unwrap();
        let o = Options::builder().max_function_evaluations(200).build().unwrap();
        let spso = Spso::new(p, o, SpsoConfig::default()).unwrap();
        // 10 generations of 20 particles
        assert!((spso.inertia(0, 0.0) - 0.85).abs() < 1e-12);
        assert!((spso.inertia(9, 0.0) - 0.4).abs() < 1e-12);
        assert!((spso.inertia(50, 0.0) - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_stays_in_bounds() {
        let p = Problem::with_uniform_bounds(|x: &Array1<f64>| -x.sum(), 3, -1.0, 1.0).unwrap();
        let o = Options::builder().max_function_evaluations(600).seed(11).build().unwrap();
        let mut spso = Spso::new(p, o, SpsoConfig::local()).unwrap();
        assert_eq!(spso.name(), "SPSOL");
        let r = spso.optimize().unwrap();
        assert_eq!(r.n_function_evaluations, 600);
        assert!(r.best_so_far_x.iter().all(|&xi| (-1.0..=1.0).contains(&xi)));
        // the optimum sits in the corner (1, 1, 1)
        assert!(r.best_so_far_y < -2.5, "best {}", r.best_so_far_y);
    }
}

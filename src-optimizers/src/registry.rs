//! Pick an optimizer by name
//!
//! Used by the command line tools; every algorithm gets its default settings.

use std::fmt;
use std::str::FromStr;

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::cem::{Dcem, DcemConfig, Scem, ScemConfig};
use crate::error::{OptError, Result};
use crate::es::{Vdcma, VdcmaConfig};
use crate::optimizer::Optimizer;
use crate::options::Options;
use crate::problem::Problem;
use crate::pso::{Spso, SpsoConfig};
use crate::results::{Callback, OptimizationResults};
use crate::rs::{Bes, BesConfig, Prs, PrsConfig};

/// Available optimizers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    Scem,
    Dcem,
    Vdcma,
    Spso,
    Spsol,
    Bes,
    Prs,
}

impl Algorithm {
    pub fn all() -> &'static [Algorithm] {
        &[
            Algorithm::Scem,
            Algorithm::Dcem,
            Algorithm::Vdcma,
            Algorithm::Spso,
            Algorithm::Spsol,
            Algorithm::Bes,
            Algorithm::Prs,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::Scem => "scem",
            Algorithm::Dcem => "dcem",
            Algorithm::Vdcma => "vdcma",
            Algorithm::Spso => "spso",
            Algorithm::Spsol => "spsol",
            Algorithm::Bes => "bes",
            Algorithm::Prs => "prs",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = OptError;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let t = s.trim().to_lowercase().replace(['-', '_'], "");
        match t.as_str() {
            "scem" | "cem" => Ok(Algorithm::Scem),
            "dcem" => Ok(Algorithm::Dcem),
            "vdcma" | "vdcmaes" => Ok(Algorithm::Vdcma),
            "spso" | "pso" => Ok(Algorithm::Spso),
            "spsol" | "lpso" => Ok(Algorithm::Spsol),
            "bes" => Ok(Algorithm::Bes),
            "prs" | "random" | "randomsearch" => Ok(Algorithm::Prs),
            _ => Err(OptError::UnknownAlgorithm(s.to_string())),
        }
    }
}

/// Build `algorithm` with its default settings
pub fn make_optimizer<'a, F>(
    algorithm: Algorithm,
    problem: Problem<F>,
    options: Options,
) -> Result<Box<dyn Optimizer + 'a>>
where
    F: Fn(&Array1<f64>) -> f64 + Sync + 'a,
{
    let optimizer: Box<dyn Optimizer + 'a> = match algorithm {
        Algorithm::Scem => Box::new(Scem::new(problem, options, ScemConfig::default())?),
        Algorithm::Dcem => Box::new(Dcem::new(problem, options, DcemConfig::default())?),
        Algorithm::Vdcma => Box::new(Vdcma::new(problem, options, VdcmaConfig::default())?),
        Algorithm::Spso => Box::new(Spso::new(problem, options, SpsoConfig::default())?),
        Algorithm::Spsol => Box::new(Spso::new(problem, options, SpsoConfig::local())?),
        Algorithm::Bes => Box::new(Bes::new(problem, options, BesConfig::default())?),
        Algorithm::Prs => Box::new(Prs::new(problem, options, PrsConfig::default())?),
    };
    Ok(optimizer)
}

/// Build and run `algorithm`, with an optional per-generation callback
pub fn run_algorithm<F>(
    algorithm: Algorithm,
    problem: Problem<F>,
    options: Options,
    callback: Option<Callback>,
) -> Result<OptimizationResults>
where
    F: Fn(&Array1<f64>) -> f64 + Sync,
{
    let mut optimizer = make_optimizer(algorithm, problem, options)?;
    if let Some(cb) = callback {
        optimizer.set_callback(cb);
    }
    optimizer.optimize()
}

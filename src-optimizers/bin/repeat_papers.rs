//! Re-run the experiments of the papers behind each optimizer.
//!
//! Every paper fixes a function, a dimension, a budget and a seed; the
//! reference value reported by the paper (or its reference code) is printed
//! next to ours.
//!
//! ```bash
//! cargo run --release --bin repeat_papers -- --paper dcem
//! cargo run --release --bin repeat_papers -- --paper scem --max-fe 100000 -v 20
//! ```

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::{Parser, ValueEnum};
use ndarray::Array1;

use blackbox_benchmarks::{BaseFunction, ObjectiveFn};
use blackbox_optimizers::{
    Bes, BesConfig, Dcem, DcemConfig, OptimizationResults, Optimizer, Options, Problem, Scem,
    ScemConfig, Spso, SpsoConfig, Vdcma, VdcmaConfig,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Paper {
    /// Amos and Yarats 2020, 100-D ellipsoid
    Dcem,
    /// Kroese et al. 2006, 1000-D rosenbrock
    Scem,
    /// Shi and Eberhart 1998, 100-D ackley
    Spsol,
    /// Akimoto et al. 2014, 2-D rosenbrock
    Vdcma,
    /// Gao and Sener 2022, 2-D rosenbrock
    Bes,
}

/// CLI arguments for the paper experiments
#[derive(Parser)]
#[command(name = "repeat_papers")]
#[command(about = "Repeat the published experiments of each optimizer")]
struct Args {
    /// Which experiment to run
    #[arg(short, long, value_enum)]
    paper: Paper,

    /// Override the evaluation budget of the experiment
    #[arg(long)]
    max_fe: Option<usize>,

    /// Log progress every N generations (0 = silent)
    #[arg(short, long, default_value_t = 0)]
    verbose: usize,

    /// Evaluate populations in parallel
    #[arg(long, default_value_t = false)]
    parallel: bool,

    /// Write the results as JSON
    #[arg(short, long)]
    output: Option<PathBuf>,
}

/// One experiment: the problem, the budget and the number to compare against
struct Experiment {
    function: BaseFunction,
    ndim: usize,
    bound: f64,
    max_fe: usize,
    seed: u64,
    saving_fitness: usize,
    reference: &'static str,
}

impl Experiment {
    fn of(paper: Paper) -> Self {
        match paper {
            Paper::Dcem => Self {
                function: BaseFunction::Ellipsoid,
                ndim: 100,
                bound: 5.0,
                max_fe: 2_000_000,
                seed: 0,
                saving_fitness: 2000,
                reference: "3.6024e-08 (dcem reference code)",
            },
            Paper::Scem => Self {
                function: BaseFunction::Rosenbrock,
                ndim: 1000,
                bound: 5.0,
                max_fe: 1_000_000,
                seed: 0,
                saving_fitness: 50_000,
                reference: "1050.51959312 (Matlab code of the paper)",
            },
            Paper::Spsol => Self {
                function: BaseFunction::Ackley,
                ndim: 100,
                bound: 32.768,
                max_fe: 1_000_000,
                seed: 1,
                saving_fitness: 10_000,
                reference: "0.19331169 (pymoo PSO, 20 particles)",
            },
            Paper::Vdcma => Self {
                function: BaseFunction::Rosenbrock,
                ndim: 2,
                bound: 5.0,
                max_fe: 5000,
                seed: 2022,
                saving_fitness: 100,
                reference: "close to 0",
            },
            Paper::Bes => Self {
                function: BaseFunction::Rosenbrock,
                ndim: 2,
                bound: 5.0,
                max_fe: 5000,
                seed: 2022,
                saving_fitness: 100,
                reference: "below 1.0 (bes reference test)",
            },
        }
    }
}

fn run_paper(paper: Paper, args: &Args) -> Result<OptimizationResults, Box<dyn std::error::Error>> {
    let exp = Experiment::of(paper);
    let f: ObjectiveFn = exp.function.function();
    let problem = Problem::with_uniform_bounds(f, exp.ndim, -exp.bound, exp.bound)?
        .name(format!("{}-{}d", exp.function, exp.ndim));
    let options = Options::builder()
        .max_function_evaluations(args.max_fe.unwrap_or(exp.max_fe))
        .seed(exp.seed)
        .verbose(args.verbose)
        .saving_fitness(exp.saving_fitness)
        .parallel(args.parallel)
        .build()?;
    log::info!(
        "{:?}: {} in {} dimensions, {} evaluations, seed {}",
        paper,
        exp.function,
        exp.ndim,
        options.max_function_evaluations.unwrap_or(exp.max_fe),
        exp.seed
    );

    let ndim = exp.ndim;
    let mut optimizer: Box<dyn Optimizer> = match paper {
        Paper::Dcem => Box::new(Dcem::new(problem, options, DcemConfig::default().sigma(1.0))?),
        Paper::Scem => Box::new(Scem::new(
            problem,
            options,
            ScemConfig::default().mean(Array1::from_elem(ndim, 2.0)).sigma(10.0),
        )?),
        Paper::Spsol => Box::new(Spso::new(problem, options, SpsoConfig::local())?),
        Paper::Vdcma => Box::new(Vdcma::new(
            problem,
            options,
            VdcmaConfig::default().mean(Array1::from_elem(ndim, 3.0)).sigma(3.0),
        )?),
        // random start within the bounds
        Paper::Bes => Box::new(Bes::new(problem, options, BesConfig::default())?),
    };

    let results = optimizer.optimize()?;
    println!("{}", results.summary());
    println!("  paper reference: {}", exp.reference);
    Ok(results)
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let start = Instant::now();
    let results = run_paper(args.paper, &args)?;
    if let Some(path) = &args.output {
        results.to_json_file(path)?;
        println!("results written to {}", path.display());
    }
    println!("*** Runtime: {:7.5e}", start.elapsed().as_secs_f64());
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

//! Run any optimizer on any benchmark function.
//!
//! ```bash
//! # 10-D rastrigin with SCEM, 50k evaluations
//! cargo run --release --bin run_optimizer -- -a scem -f rastrigin -n 10 --max-fe 50000
//!
//! # shifted and rotated ellipsoid, options from a file, per-generation CSV
//! cargo run --release --bin run_optimizer -- -a vdcma -f ellipsoid -t shifted_rotated \
//!     --config options.json --record -o results/vdcma_ellipsoid.json
//! ```
//!
//! Rotation matrices and shift vectors are read from `BLACKBOX_DATA_DIR`
//! (or `--data-dir`) and generated there on first use.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use ndarray::Array1;

use blackbox_benchmarks::generate::derive_seed;
use blackbox_benchmarks::{
    BaseFunction, DataStore, GenerateConfig, PreparedFunction, Transform, TransformedFunction,
    get_function_bounds,
};
use blackbox_optimizers::{Algorithm, OptimizationRecorder, Options, Problem, run_algorithm};

/// CLI arguments for a single optimization run
#[derive(Parser)]
#[command(name = "run_optimizer")]
#[command(about = "Minimize a benchmark function with one of the black-box optimizers")]
struct Args {
    /// scem, dcem, vdcma, spso, spsol, bes or prs
    #[arg(short, long)]
    algorithm: Algorithm,

    /// Base function, e.g. sphere, rosenbrock, ackley
    #[arg(short, long)]
    function: BaseFunction,

    /// rotated, shifted or shifted_rotated
    #[arg(short, long)]
    transform: Option<Transform>,

    /// Number of dimensions
    #[arg(short, long, default_value_t = 10)]
    ndim: usize,

    /// Lower bound (the function's usual domain when omitted)
    #[arg(long, allow_hyphen_values = true)]
    lower: Option<f64>,

    /// Upper bound (the function's usual domain when omitted)
    #[arg(long, allow_hyphen_values = true)]
    upper: Option<f64>,

    /// Options as JSON; the flags below override its fields
    #[arg(long)]
    config: Option<PathBuf>,

    /// Evaluation budget (1000 * ndim when no other limit is given)
    #[arg(long)]
    max_fe: Option<usize>,

    /// Wall-clock budget in seconds
    #[arg(long)]
    max_runtime: Option<f64>,

    /// Stop once the best fitness reaches this value
    #[arg(long, allow_hyphen_values = true)]
    fitness_threshold: Option<f64>,

    /// Random seed
    #[arg(short, long)]
    seed: Option<u64>,

    /// Log progress every N generations
    #[arg(short, long)]
    verbose: Option<usize>,

    /// Keep the best-so-far fitness every N evaluations
    #[arg(long)]
    saving_fitness: Option<usize>,

    /// Evaluate populations in parallel
    #[arg(long, default_value_t = false)]
    parallel: bool,

    /// Directory with rotation matrices and shift vectors
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Seed used when transform data has to be generated
    #[arg(long, default_value_t = 0)]
    data_seed: u64,

    /// Write the results as JSON
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write one CSV row per generation into BLACKBOX_RECORDS_DIR
    #[arg(long, default_value_t = false)]
    record: bool,
}

fn build_options(args: &Args) -> Result<Options, Box<dyn std::error::Error>> {
    let mut options = match &args.config {
        Some(path) => Options::from_json_file(path)?,
        None => Options::default(),
    };
    if let Some(v) = args.max_fe {
        options.max_function_evaluations = Some(v);
    }
    if let Some(v) = args.max_runtime {
        options.max_runtime = Some(v);
    }
    if let Some(v) = args.fitness_threshold {
        options.fitness_threshold = Some(v);
    }
    if let Some(v) = args.seed {
        options.seed = Some(v);
    }
    if let Some(v) = args.verbose {
        options.verbose = v;
    }
    if let Some(v) = args.saving_fitness {
        options.saving_fitness = v;
    }
    if args.parallel {
        options.parallel = true;
    }
    if options.max_function_evaluations.is_none()
        && options.max_runtime.is_none()
        && options.fitness_threshold.is_none()
    {
        options.max_function_evaluations = Some(1000 * args.ndim);
    }
    options.validate()?;
    Ok(options)
}

/// Resolve the objective, generating transform data when it is missing
fn prepare_function(args: &Args) -> Result<PreparedFunction, Box<dyn std::error::Error>> {
    let Some(transform) = args.transform else {
        return Ok(PreparedFunction::plain(args.function, args.ndim)?);
    };
    let dir = match &args.data_dir {
        Some(dir) => dir.clone(),
        None => blackbox_env::get_data_dir()?,
    };
    let store = Arc::new(DataStore::new(dir));
    let name = args.function.name();
    let seed = derive_seed(args.data_seed, args.function, args.ndim);
    if transform.needs_rotation() {
        store.rotation_or_generate(name, args.ndim, seed)?;
    }
    if transform.needs_shift() {
        let defaults = GenerateConfig::default();
        store.shift_or_generate(name, args.ndim, defaults.shift_low, defaults.shift_high, seed)?;
    }
    Ok(TransformedFunction::new(args.function, transform, store).prepare(args.ndim)?)
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let options = build_options(&args)?;
    let objective = prepare_function(&args)?;

    let (default_lower, default_upper) =
        get_function_bounds(args.function.name()).unwrap_or((-5.0, 5.0));
    let lower = Array1::from_elem(args.ndim, args.lower.unwrap_or(default_lower));
    let upper = Array1::from_elem(args.ndim, args.upper.unwrap_or(default_upper));
    let problem_name = match args.transform {
        Some(t) => format!("{}_{}-{}d", t, args.function, args.ndim),
        None => format!("{}-{}d", args.function, args.ndim),
    };
    let problem = Problem::new(objective.as_fn(), lower, upper)?.name(problem_name.clone());

    let recorder = args
        .record
        .then(|| OptimizationRecorder::new(format!("{}_{}", args.algorithm, problem_name)));
    let callback = recorder.as_ref().map(|r| r.create_callback());

    log::info!("running {} on {}", args.algorithm, problem_name);
    let results = run_algorithm(args.algorithm, problem, options, callback)?;
    println!("{}", results.summary());

    if let Some(recorder) = &recorder {
        let path = recorder.save_to_csv(&blackbox_env::get_records_dir()?)?;
        println!("{} generations recorded in {}", recorder.num_generations(), path.display());
    }
    if let Some(path) = &args.output {
        results.to_json_file(path)?;
        println!("results written to {}", path.display());
    }
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

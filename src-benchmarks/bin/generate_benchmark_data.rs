//! Pre-generate rotation matrices and shift vectors for the benchmark suite.
//!
//! Files land in `--output-dir`, or in the directory named by
//! `BLACKBOX_DATA_DIR` (default `./benchmarks_input_data`).

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use blackbox_benchmarks::{BaseFunction, GenerateConfig, Transform, generate_transform_data};

/// CLI arguments for generating transform data
#[derive(Parser)]
#[command(name = "generate_benchmark_data")]
#[command(about = "Generate rotation matrices and shift vectors for rotated/shifted benchmarks")]
struct Args {
    /// Functions (comma-separated), all base functions if omitted
    #[arg(short, long, value_delimiter = ',')]
    functions: Vec<String>,

    /// Dimensions (comma-separated)
    #[arg(short, long, value_delimiter = ',', default_value = "2,10,100")]
    dimensions: Vec<usize>,

    /// rotated, shifted or shifted_rotated
    #[arg(short, long, default_value = "shifted_rotated")]
    transform: Transform,

    /// Base random seed
    #[arg(short, long, default_value_t = 0)]
    seed: u64,

    /// Lower end of the shift vector range
    #[arg(long, default_value_t = -5.0, allow_hyphen_values = true)]
    shift_low: f64,

    /// Upper end of the shift vector range
    #[arg(long, default_value_t = 5.0, allow_hyphen_values = true)]
    shift_high: f64,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let functions = if args.functions.is_empty() {
        BaseFunction::all().to_vec()
    } else {
        args.functions
            .iter()
            .map(|f| f.parse::<BaseFunction>())
            .collect::<Result<Vec<_>, _>>()?
    };
    let dir = match args.output_dir {
        Some(dir) => dir,
        None => blackbox_env::get_data_dir()?,
    };

    let config = GenerateConfig {
        functions,
        dimensions: args.dimensions,
        transform: args.transform,
        seed: args.seed,
        shift_low: args.shift_low,
        shift_high: args.shift_high,
    };
    let written = generate_transform_data(&config, &dir)?;
    println!("wrote {} files to {}", written, dir.display());
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

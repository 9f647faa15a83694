//! Plot best-so-far fitness against evaluations for one or more runs.
//!
//! ```bash
//! cargo run --bin plot_convergence -- results/scem.json results/dcem.json -o convergence.html
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use plotly::{
    Layout, Plot, Scatter,
    common::{Mode, Title},
};

use blackbox_optimizers::OptimizationResults;

/// CLI arguments for convergence plots
#[derive(Parser)]
#[command(name = "plot_convergence")]
#[command(about = "Plot the fitness history of optimization result files")]
struct Args {
    /// Result JSON files written by run_optimizer or repeat_papers
    #[arg(required = true)]
    results: Vec<PathBuf>,

    /// Output HTML file
    #[arg(short, long, default_value = "convergence.html")]
    output: PathBuf,

    /// Plot width in pixels
    #[arg(long, default_value_t = 1000)]
    width: usize,

    /// Plot height in pixels
    #[arg(long, default_value_t = 700)]
    height: usize,

    /// Plot title
    #[arg(long, default_value = "Convergence")]
    title: String,
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let mut plot = Plot::new();
    let mut all_positive = true;

    for path in &args.results {
        let results = OptimizationResults::from_json_file(path)?;
        if results.fitness.is_empty() {
            log::warn!("{} has no fitness history, skipped", path.display());
            continue;
        }
        let evaluations: Vec<usize> = results.fitness.iter().map(|p| p.0).collect();
        let best: Vec<f64> = results.fitness.iter().map(|p| p.1).collect();
        all_positive &= best.iter().all(|&y| y > 0.0);
        println!("  {}", results.summary());
        let trace = Scatter::new(evaluations, best)
            .mode(Mode::Lines)
            .name(format!("{} ({})", results.optimizer, results.problem));
        plot.add_trace(trace);
    }

    let y_type = if all_positive {
        plotly::layout::AxisType::Log
    } else {
        log::warn!("fitness values <= 0, using a linear y axis");
        plotly::layout::AxisType::Linear
    };
    let layout = Layout::new()
        .title(Title::with_text(&args.title))
        .width(args.width)
        .height(args.height)
        .x_axis(
            plotly::layout::Axis::new()
                .title(Title::with_text("Function evaluations"))
                .type_(plotly::layout::AxisType::Linear),
        )
        .y_axis(
            plotly::layout::Axis::new()
                .title(Title::with_text("Best-so-far fitness"))
                .type_(y_type),
        );
    plot.set_layout(layout);
    plot.write_html(&args.output);
    println!("Created convergence plot: {}", args.output.display());
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

//! Terrain Sweep
//!
//! Runs safe exploration on a synthetic crater field for every combination
//! of kernel lengthscale and observation noise, and reports coverage of the
//! true safe region and the number of falsely certified entries.
//!
//! # Usage
//!
//! ```bash
//! cargo run --release --example terrain_sweep -- \
//!     --lengthscales 5,7 --noise 0.001,0.11 --iterations 20
//! ```

use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use log::{info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use kshetra::evaluation::{CoverageTrace, EvaluationReport, GroundTruth};
use kshetra::{
    Coord2D, ElevationGrid, GaussianProcess, GridConfig, GridGraph, KernelConfig, KshetraConfig,
    SafeExplorer, SeedSet, TrueField,
};

#[derive(Parser, Debug)]
#[command(name = "terrain_sweep")]
#[command(about = "Sweep kernel lengthscale and noise over a safe-exploration run")]
struct Args {
    /// YAML configuration (defaults to configs/kshetra.yaml or built-ins)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Kernel lengthscales to try
    #[arg(long, value_delimiter = ',', default_value = "5,7")]
    lengthscales: Vec<f64>,

    /// Observation noise standard deviations to try
    #[arg(long, value_delimiter = ',', default_value = "0.001,0.11")]
    noise: Vec<f64>,

    /// Exploration iterations per run (overrides the config)
    #[arg(short, long)]
    iterations: Option<usize>,

    /// Random seed for initial samples and seed placement
    #[arg(long, default_value_t = 0)]
    rng_seed: u64,
}

/// Outcome of one sweep point.
#[derive(Debug, Clone)]
struct RunSummary {
    lengthscale: f64,
    noise: f64,
    final_report: EvaluationReport,
    monotonic: bool,
    seconds: f64,
}

/// Crater field with a rolling background, centered to mid-range zero.
fn crater_field(config: &GridConfig) -> Result<ElevationGrid, kshetra::ConfigError> {
    let (rows, cols) = (config.rows as f64, config.cols as f64);
    let crater = Coord2D::new(0.55 * rows * config.step_x, 0.45 * cols * config.step_y);
    let ridge = Coord2D::new(0.2 * rows * config.step_x, 0.8 * cols * config.step_y);

    let field = ElevationGrid::from_fn(config, |c| {
        let background = 1.5 * (0.15 * c.x).sin() * (0.12 * c.y).cos();
        let rim = 4.0 * (-(c.distance(&crater) - 6.0).powi(2) / 8.0).exp();
        let bowl = -3.0 * (-c.distance_squared(&crater) / 30.0).exp();
        let hill = 5.0 * (-c.distance_squared(&ridge) / 60.0).exp();
        background + rim + bowl + hill
    })?;
    Ok(field.centered())
}

fn run(
    config: &KshetraConfig,
    graph: &GridGraph,
    field: &ElevationGrid,
    lengthscale: f64,
    noise: f64,
    iterations: usize,
    rng: &mut StdRng,
) -> Result<RunSummary, Box<dyn std::error::Error>> {
    let explorer_config = config.to_explorer_config();
    let h = explorer_config.threshold;

    let kernel = KernelConfig::new(lengthscale, config.surrogate.variance, noise);

    // One random sample to initialise the GP; discarded after warm-up.
    let first = rng.gen_range(0..graph.state_count());
    let first_coord = graph.coord(first);
    let first_value = field.elevation_at(first_coord);
    let gp = GaussianProcess::with_data(kernel, &[first_coord], &[first_value])?;

    let seed = SeedSet::from_config(graph, field, &config.to_seed_config(), h, rng)?;
    let truth = GroundTruth::compute(graph, field, h, noise, &seed)?;

    let mut explorer = SafeExplorer::new(&explorer_config, graph.clone(), gp, field, seed)?;

    let start = explorer.fully_safe_states();
    if start.is_empty() {
        warn!("No seed state has all moves certified, skipping warm-up");
    } else {
        let state = start[rng.gen_range(0..start.len())];
        let added = explorer.warm_up(state, config.sampling.warm_up_repeats)?;
        explorer.clear_observations(added)?;
    }

    let timer = Instant::now();
    let mut trace = CoverageTrace::default();
    let mut report = truth.evaluate(explorer.s_hat());

    for _ in 0..iterations {
        match explorer.step() {
            Ok(_) => {}
            Err(e) if e.is_terminal() => {
                warn!("Stopping early: {}", e);
                break;
            }
            Err(e) => return Err(e.into()),
        }
        report = truth.evaluate(explorer.s_hat());
        trace.push(report.coverage);
        println!(
            "  iter {:>3}: coverage {:>6.2}%  false safe {}",
            explorer.iteration(),
            report.coverage,
            report.false_safe
        );
    }

    Ok(RunSummary {
        lengthscale,
        noise,
        final_report: report,
        monotonic: trace.is_monotonic(1e-9),
        seconds: timer.elapsed().as_secs_f64(),
    })
}

fn print_table(
    title: &str,
    args: &Args,
    summaries: &[RunSummary],
    cell: impl Fn(&RunSummary) -> String,
) {
    println!("\n{}", title);
    print!("{:>10}", "noise \\ l");
    for l in &args.lengthscales {
        print!("{:>12}", l);
    }
    println!();
    for &n in &args.noise {
        print!("{:>10}", n);
        for &l in &args.lengthscales {
            let value = summaries
                .iter()
                .find(|s| s.lengthscale == l && s.noise == n)
                .map(&cell)
                .unwrap_or_else(|| "-".to_string());
            print!("{:>12}", value);
        }
        println!();
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => KshetraConfig::load(path)?,
        None => KshetraConfig::load_default()?,
    };
    let iterations = args.iterations.unwrap_or(config.sampling.iterations);

    let grid_config = config.to_grid_config();
    let graph = GridGraph::new(&grid_config)?;
    let field = crater_field(&grid_config)?;
    let (low, high) = field.range();
    info!(
        "Terrain {}x{}, elevation [{:.2}, {:.2}], h = {:.3}",
        graph.rows(),
        graph.cols(),
        low,
        high,
        config.to_explorer_config().threshold
    );

    let mut rng = StdRng::seed_from_u64(args.rng_seed);
    let mut summaries = Vec::new();

    for &lengthscale in &args.lengthscales {
        for &noise in &args.noise {
            println!("\n=== lengthscale {} / noise {} ===", lengthscale, noise);
            let summary = run(&config, &graph, &field, lengthscale, noise, iterations, &mut rng)?;
            println!(
                "  {:.2}s, coverage {}",
                summary.seconds,
                if summary.monotonic { "monotonic" } else { "NOT monotonic" }
            );
            summaries.push(summary);
        }
    }

    print_table("Size S_hat:", &args, &summaries, |s| {
        s.final_report.s_hat_size.to_string()
    });
    print_table("Coverage (%):", &args, &summaries, |s| {
        format!("{:.2}", s.final_report.coverage)
    });
    print_table("False safe:", &args, &summaries, |s| {
        s.final_report.false_safe.to_string()
    });

    Ok(())
}

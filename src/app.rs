//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and parses CLI arguments
//! - initialises logging
//! - builds the sieve series (lists, CSV, reference, or synthetic)
//! - runs fitting + model selection
//! - prints reports/plots
//! - writes optional exports

use clap::Parser;

use crate::cli::{Cli, Command, FitArgs, InputArgs, PlotArgs, RunArgs, ScaleArgs, SimulateArgs, TicksArgs};
use crate::data::{REFERENCE_SIZES, SyntheticSpec, reference_series, synthetic_series};
use crate::domain::{AnalysisRequest, SampleSeries};
use crate::error::AppError;
use crate::fit::FitOptions;
use crate::scale::{AxisScale, InverseFormula, ProbabilityScale, TICKS};

pub mod pipeline;

/// Entry point for the `psd` binary.
pub fn run() -> Result<(), AppError> {
    // A missing .env file is fine; PSD_* variables can also come from the shell.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(cli.log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Fit(args) => handle_fit(args),
        Command::Simulate(args) => handle_simulate(args),
        Command::Plot(args) => handle_plot(args),
        Command::Ticks(args) => handle_ticks(args),
    }
}

fn handle_fit(args: FitArgs) -> Result<(), AppError> {
    let series = series_from_input(&args.input)?;
    analyze(series, &args.run)
}

fn handle_simulate(args: SimulateArgs) -> Result<(), AppError> {
    let spec = SyntheticSpec {
        model: args.source,
        params: [args.p1, args.p2],
        sizes: REFERENCE_SIZES.to_vec(),
        noise_sd: args.noise,
        seed: args.seed,
    };
    let series = synthetic_series(&spec)?;
    println!(
        "Simulated {} ({}={}, {}={}) with noise sd={} seed={}\n",
        args.source.display_name(),
        args.source.param_names()[0],
        args.p1,
        args.source.param_names()[1],
        args.p2,
        args.noise,
        args.seed
    );
    analyze(series, &args.run)
}

/// Fit, print, plot, and export one series.
fn analyze(series: SampleSeries, args: &RunArgs) -> Result<(), AppError> {
    // Validate the axis before doing any work.
    let probability = probability_scale(&args.scale)?;

    let request = AnalysisRequest {
        series,
        model: args.model,
        fit: FitOptions::default(),
    };
    let run = pipeline::run_analysis(&request)?;

    println!(
        "{}",
        crate::report::format_run_summary(&run.series.stats(), &run.outcome)
    );
    println!(
        "{}",
        crate::report::format_observations(&run.residuals, &run.outcome.best)
    );

    if args.plot_enabled() {
        let plot = crate::plot::render_fit_plot(&run.series, &run.outcome.best, &probability, args.width, args.height);
        println!("{plot}");
    }

    // Optional exports.
    if let Some(path) = &args.export {
        crate::io::write_results_csv(path, &run.residuals, &run.outcome.best)?;
        tracing::info!(path = %path.display(), "results exported");
    }
    if let Some(path) = &args.export_fit {
        crate::io::write_fit_json(path, &run.outcome.best, &run.series)?;
        tracing::info!(path = %path.display(), "fit exported");
    }

    Ok(())
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let probability = probability_scale(&args.scale)?;
    let file = crate::io::read_fit_json(&args.fit)?;

    println!(
        "{} fit from {} (R2={:.5})",
        file.fit.model.display_name(),
        file.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
        file.fit.r_squared
    );
    let plot = crate::plot::render_fit_file_plot(&file, &probability, args.width, args.height);
    println!("{plot}");
    Ok(())
}

fn handle_ticks(args: TicksArgs) -> Result<(), AppError> {
    let scale = ProbabilityScale::new(args.threshold)?;
    let legacy = scale.with_inverse(InverseFormula::Legacy);
    let exact = scale.with_inverse(InverseFormula::Exact);

    println!("{:>8} {:>12} {:>12} {:>12}", "tick", "forward", "legacy_inv", "exact_inv");
    for t in TICKS {
        match scale.forward(t) {
            Some(c) => println!(
                "{:>8} {:>12.6} {:>12.6} {:>12.6}",
                scale.format_tick(t),
                c,
                legacy.inverse(c),
                exact.inverse(c)
            ),
            None => println!("{:>8} {:>12}", scale.format_tick(t), "masked"),
        }
    }
    Ok(())
}

fn probability_scale(args: &ScaleArgs) -> Result<ProbabilityScale, AppError> {
    Ok(ProbabilityScale::new(args.threshold)?.with_inverse(args.inverse.into()))
}

/// Resolve exactly one data source from the input flags.
fn series_from_input(input: &InputArgs) -> Result<SampleSeries, AppError> {
    let lists = input.sizes.is_some() || input.passing.is_some();
    let sources = [lists, input.csv.is_some(), input.reference]
        .iter()
        .filter(|s| **s)
        .count();
    if sources != 1 {
        return Err(AppError::configuration(
            "Provide exactly one data source: --sizes/--passing, --csv, or --reference.",
        ));
    }

    match (&input.sizes, &input.passing, &input.csv) {
        (Some(sizes), Some(passing), _) => crate::io::series_from_lists(sizes, passing),
        (Some(_), None, _) | (None, Some(_), _) => Err(AppError::configuration(
            "--sizes and --passing must be given together.",
        )),
        (None, None, Some(path)) => crate::io::load_series_csv(path),
        (None, None, None) => reference_series(),
    }
}

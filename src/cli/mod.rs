//! Command-line parsing for the particle-size distribution fitter.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the modeling/math code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::domain::{ModelKind, ModelSpec};
use crate::scale::{InverseFormula, MIN_THRESHOLD};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "psd", version, about = "Particle-size distribution fitter (GGS / Rosin-Rammler)")]
pub struct Cli {
    /// Log verbosity (error, warn, info, debug, trace).
    #[arg(long, global = true, env = "PSD_LOG_LEVEL", default_value = "warn")]
    pub log_level: tracing::Level,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fit sieve data, print diagnostics, and optionally plot/export.
    Fit(FitArgs),
    /// Generate noisy data from a model, then fit it.
    Simulate(SimulateArgs),
    /// Plot a previously exported fit JSON.
    Plot(PlotArgs),
    /// Print the probability-scale ticks with forward and inverse values.
    Ticks(TicksArgs),
}

/// Where the sieve data comes from.
#[derive(Debug, Args, Clone)]
pub struct InputArgs {
    /// Sieve sizes, comma separated (e.g. "4.75, 3.35, 2.36").
    #[arg(long, allow_hyphen_values = true)]
    pub sizes: Option<String>,

    /// Cumulative passing percentages, comma separated.
    #[arg(long, allow_hyphen_values = true)]
    pub passing: Option<String>,

    /// Two-column CSV (size, passing) with a header row.
    #[arg(long, value_name = "CSV")]
    pub csv: Option<PathBuf>,

    /// Use the built-in reference sieve analysis.
    #[arg(long)]
    pub reference: bool,
}

/// Fitting, plotting, and export options shared by `fit` and `simulate`.
#[derive(Debug, Args, Clone)]
pub struct RunArgs {
    /// Which model(s) to fit.
    #[arg(long, value_enum, default_value_t = ModelSpec::Best)]
    pub model: ModelSpec,

    #[command(flatten)]
    pub scale: ScaleArgs,

    /// Render an ASCII plot in the terminal (enabled by default).
    #[arg(long, default_value_t = true)]
    pub plot: bool,

    /// Disable the terminal plot.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width in columns, clamped to 10..=400.
    #[arg(long, default_value_t = 72)]
    pub width: usize,

    /// Plot height in rows, clamped to 5..=200.
    #[arg(long, default_value_t = 20)]
    pub height: usize,

    /// Export per-sieve results to CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Export the chosen fit (params + fitted grid) to JSON.
    #[arg(long = "export-fit")]
    pub export_fit: Option<PathBuf>,
}

impl RunArgs {
    pub fn plot_enabled(&self) -> bool {
        self.plot && !self.no_plot
    }
}

/// Probability-axis options.
#[derive(Debug, Args, Clone, Copy)]
pub struct ScaleArgs {
    /// Lowest plotted cumulative-retained percentage (>= 0.01).
    #[arg(long, env = "PSD_THRESHOLD", default_value_t = MIN_THRESHOLD)]
    pub threshold: f64,

    /// Inverse formula for the probability axis.
    #[arg(long, value_enum, default_value_t = InverseArg::Legacy)]
    pub inverse: InverseArg,
}

/// CLI spelling of [`InverseFormula`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum InverseArg {
    /// `10^(2 - 10^y')`
    Legacy,
    /// `100 * exp(-exp(y'))`
    Exact,
}

impl From<InverseArg> for InverseFormula {
    fn from(arg: InverseArg) -> Self {
        match arg {
            InverseArg::Legacy => InverseFormula::Legacy,
            InverseArg::Exact => InverseFormula::Exact,
        }
    }
}

/// Options for `psd fit`.
#[derive(Debug, Args, Clone)]
pub struct FitArgs {
    #[command(flatten)]
    pub input: InputArgs,

    #[command(flatten)]
    pub run: RunArgs,
}

/// Options for `psd simulate`.
#[derive(Debug, Args, Clone)]
pub struct SimulateArgs {
    /// Model that generates the data.
    #[arg(long = "from", value_enum, default_value_t = ModelKind::RosinRammler)]
    pub source: ModelKind,

    /// First parameter (d100 for GGS, k for Rosin-Rammler).
    #[arg(long, default_value_t = 1.3)]
    pub p1: f64,

    /// Second parameter (m for GGS, n for Rosin-Rammler).
    #[arg(long, default_value_t = 1.0)]
    pub p2: f64,

    /// Gaussian noise standard deviation, in percentage points.
    #[arg(long, default_value_t = 1.0)]
    pub noise: f64,

    /// Random seed.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    #[command(flatten)]
    pub run: RunArgs,
}

/// Options for plotting a saved fit.
#[derive(Debug, Args, Clone)]
pub struct PlotArgs {
    /// Fit JSON file produced by `psd fit --export-fit`.
    #[arg(long, value_name = "JSON")]
    pub fit: PathBuf,

    #[command(flatten)]
    pub scale: ScaleArgs,

    /// Plot width in columns, clamped to 10..=400.
    #[arg(long, default_value_t = 72)]
    pub width: usize,

    /// Plot height in rows, clamped to 5..=200.
    #[arg(long, default_value_t = 20)]
    pub height: usize,
}

/// Options for `psd ticks`.
#[derive(Debug, Args, Clone, Copy)]
pub struct TicksArgs {
    /// Lowest plotted cumulative-retained percentage (>= 0.01).
    #[arg(long, env = "PSD_THRESHOLD", default_value_t = MIN_THRESHOLD)]
    pub threshold: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_defaults() {
        let cli = Cli::try_parse_from(["psd", "fit", "--reference"]).unwrap();
        assert_eq!(cli.log_level, tracing::Level::WARN);
        let Command::Fit(args) = cli.command else { panic!("expected fit") };
        assert!(args.input.reference);
        assert_eq!(args.run.model, ModelSpec::Best);
        assert_eq!(args.run.scale.threshold, MIN_THRESHOLD);
        assert_eq!(args.run.scale.inverse, InverseArg::Legacy);
        assert!(args.run.plot_enabled());
    }

    #[test]
    fn no_plot_wins() {
        let cli = Cli::try_parse_from(["psd", "fit", "--reference", "--no-plot"]).unwrap();
        let Command::Fit(args) = cli.command else { panic!("expected fit") };
        assert!(!args.run.plot_enabled());
    }

    #[test]
    fn parses_lists_model_and_inverse() {
        let cli = Cli::try_parse_from([
            "psd",
            "--log-level",
            "debug",
            "fit",
            "--sizes",
            "4.75,2.36",
            "--passing",
            "100,85.3",
            "--model",
            "rosin-rammler",
            "--inverse",
            "exact",
            "--threshold",
            "0.5",
        ])
        .unwrap();
        assert_eq!(cli.log_level, tracing::Level::DEBUG);
        let Command::Fit(args) = cli.command else { panic!("expected fit") };
        assert_eq!(args.input.sizes.as_deref(), Some("4.75,2.36"));
        assert_eq!(args.run.model, ModelSpec::RosinRammler);
        assert_eq!(InverseFormula::from(args.run.scale.inverse), InverseFormula::Exact);
        assert_eq!(args.run.scale.threshold, 0.5);
    }

    #[test]
    fn simulate_takes_source_model() {
        let cli = Cli::try_parse_from(["psd", "simulate", "--from", "ggs", "--p1", "5", "--p2", "0.7"]).unwrap();
        let Command::Simulate(args) = cli.command else { panic!("expected simulate") };
        assert_eq!(args.source, ModelKind::Ggs);
        assert_eq!((args.p1, args.p2), (5.0, 0.7));
    }

    #[test]
    fn plot_requires_fit_file() {
        assert!(Cli::try_parse_from(["psd", "plot"]).is_err());
    }
}

//! Shared domain types.
//!
//! These types are intentionally kept lightweight so they can be:
//!
//! - built from CLI flags, CSV files, or library calls
//! - passed through fitting and selection without copies of global state
//! - exported to JSON/CSV and reloaded later for plotting

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::fit::FitOptions;

/// Concrete particle-size model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ModelKind {
    /// Gates-Gaudin-Schuhmann power law, fitted on cumulative passing.
    Ggs,
    /// Rosin-Rammler exponential, fitted on cumulative retained.
    RosinRammler,
}

impl ModelKind {
    pub const ALL: [ModelKind; 2] = [ModelKind::Ggs, ModelKind::RosinRammler];

    /// Human-readable label for terminal output.
    pub fn display_name(self) -> &'static str {
        match self {
            ModelKind::Ggs => "GGS",
            ModelKind::RosinRammler => "Rosin-Rammler",
        }
    }

    /// Machine-readable name, matching the serde and CLI spelling.
    pub fn slug(self) -> &'static str {
        match self {
            ModelKind::Ggs => "ggs",
            ModelKind::RosinRammler => "rosin-rammler",
        }
    }

    /// Parameter labels in fit order.
    pub fn param_names(self) -> [&'static str; 2] {
        match self {
            ModelKind::Ggs => ["d100", "m"],
            ModelKind::RosinRammler => ["k", "n"],
        }
    }

    pub fn param_count(self) -> usize {
        2
    }

    /// Which cumulative scale the model is fitted (and scored) on.
    pub fn response(self) -> ResponseKind {
        match self {
            ModelKind::Ggs => ResponseKind::Passing,
            ModelKind::RosinRammler => ResponseKind::Retained,
        }
    }
}

/// Which model(s) to fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ModelSpec {
    Ggs,
    RosinRammler,
    /// Fit both and keep the higher R² (ties go to Rosin-Rammler).
    Best,
}

/// Cumulative percentage convention.
///
/// `retained = 100 - passing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseKind {
    Passing,
    Retained,
}

impl ResponseKind {
    pub fn slug(self) -> &'static str {
        match self {
            ResponseKind::Passing => "passing",
            ResponseKind::Retained => "retained",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ResponseKind::Passing => "Cumulative Passing",
            ResponseKind::Retained => "Cumulative Retained",
        }
    }
}

/// Sieve sizes paired with cumulative-passing percentages.
///
/// Construction validates the invariants every model relies on:
/// equal non-zero lengths, strictly positive finite sizes, finite percentages.
/// Ordering is left to the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleSeries {
    sizes: Vec<f64>,
    passing: Vec<f64>,
}

impl SampleSeries {
    pub fn new(sizes: Vec<f64>, passing: Vec<f64>) -> Result<Self, AppError> {
        if sizes.is_empty() || passing.is_empty() {
            return Err(AppError::input_shape(
                "Sieve sizes and cumulative passing must both be non-empty.",
            ));
        }
        if sizes.len() != passing.len() {
            return Err(AppError::input_shape(format!(
                "Length mismatch: {} sieve sizes vs {} cumulative passing values.",
                sizes.len(),
                passing.len()
            )));
        }
        if let Some((i, s)) = sizes
            .iter()
            .enumerate()
            .find(|(_, s)| !(s.is_finite() && **s > 0.0))
        {
            return Err(AppError::input_shape(format!(
                "Sieve size #{} must be finite and > 0 (got {s}).",
                i + 1
            )));
        }
        if let Some((i, p)) = passing.iter().enumerate().find(|(_, p)| !p.is_finite()) {
            return Err(AppError::input_shape(format!(
                "Cumulative passing #{} must be finite (got {p}).",
                i + 1
            )));
        }
        if passing.iter().any(|p| !(0.0..=100.0).contains(p)) {
            tracing::warn!("cumulative passing values outside [0, 100]");
        }

        Ok(Self { sizes, passing })
    }

    pub fn sizes(&self) -> &[f64] {
        &self.sizes
    }

    pub fn passing(&self) -> &[f64] {
        &self.passing
    }

    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    /// Cumulative retained, `100 - passing`.
    pub fn retained(&self) -> Vec<f64> {
        self.passing.iter().map(|p| 100.0 - p).collect()
    }

    /// Observations on the scale a model is fitted on.
    pub fn response(&self, kind: ResponseKind) -> Vec<f64> {
        match kind {
            ResponseKind::Passing => self.passing.clone(),
            ResponseKind::Retained => self.retained(),
        }
    }

    pub fn stats(&self) -> SeriesStats {
        let (size_min, size_max) = min_max(&self.sizes);
        let (passing_min, passing_max) = min_max(&self.passing);
        SeriesStats {
            n: self.len(),
            size_min,
            size_max,
            passing_min,
            passing_max,
        }
    }
}

fn min_max(values: &[f64]) -> (f64, f64) {
    values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)))
}

/// Summary stats about the series actually fitted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesStats {
    pub n: usize,
    pub size_min: f64,
    pub size_max: f64,
    pub passing_min: f64,
    pub passing_max: f64,
}

/// Fit output for a single model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitResult {
    pub model: ModelKind,
    /// `[d100, m]` for GGS, `[k, n]` for Rosin-Rammler.
    pub parameters: [f64; 2],
    /// Parameter covariance. `None` when there are no residual degrees of freedom.
    pub covariance: Option<[[f64; 2]; 2]>,
    /// `1 - SSE/SST` on the model's native response scale.
    pub r_squared: f64,
    pub mse: f64,
    pub sse: f64,
    pub n: usize,
    /// Residual evaluations spent by the least-squares solver.
    pub iterations: usize,
}

impl FitResult {
    /// One-sigma parameter uncertainties from the covariance diagonal.
    pub fn std_errors(&self) -> Option<[f64; 2]> {
        self.covariance
            .map(|c| [c[0][0].max(0.0).sqrt(), c[1][1].max(0.0).sqrt()])
    }
}

/// Fits for both models plus the winner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitSelection {
    pub best: ModelKind,
    pub ggs: FitResult,
    pub rosin_rammler: FitResult,
}

impl FitSelection {
    pub fn get(&self, kind: ModelKind) -> &FitResult {
        match kind {
            ModelKind::Ggs => &self.ggs,
            ModelKind::RosinRammler => &self.rosin_rammler,
        }
    }

    pub fn best_fit(&self) -> &FitResult {
        self.get(self.best)
    }
}

/// A per-sieve fitted value on the model's response scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointResidual {
    pub size: f64,
    pub y_obs: f64,
    pub y_fit: f64,
    pub residual: f64,
}

/// One analysis run: the data plus how to fit it.
///
/// Everything a run needs is carried here; nothing is read from process state.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub series: SampleSeries,
    pub model: ModelSpec,
    pub fit: FitOptions,
}

/// A saved fit file (JSON).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitFile {
    pub tool: String,
    pub generated_at: DateTime<Utc>,
    pub fit: FitResult,
    pub response: ResponseKind,
    /// Observations on the model's response scale.
    #[serde(default)]
    pub observed: Option<FitGrid>,
    pub grid: FitGrid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitGrid {
    pub sizes: Vec<f64>,
    pub y: Vec<f64>,
}

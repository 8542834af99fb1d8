//! Shared analysis pipeline used by every front-end command.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! series -> fit/selection -> residuals
//!
//! The commands can then focus on presentation (printing, plotting, exports).

use crate::domain::{AnalysisRequest, PointResidual, SampleSeries};
use crate::error::AppError;
use crate::fit::{SelectionOutcome, fit_and_select};
use crate::report::compute_residuals;

/// All computed outputs of a single analysis run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub series: SampleSeries,
    pub outcome: SelectionOutcome,
    /// Residuals of the chosen model.
    pub residuals: Vec<PointResidual>,
}

/// Execute the full analysis pipeline and return the computed outputs.
pub fn run_analysis(request: &AnalysisRequest) -> Result<RunOutput, AppError> {
    tracing::debug!(n = request.series.len(), model = ?request.model, "analysis started");

    // 1) Fit the requested model(s) and select the best.
    let outcome = fit_and_select(request)?;

    // 2) Residuals for the chosen model, on its native response scale.
    let residuals = compute_residuals(&request.series, &outcome.best)?;

    Ok(RunOutput {
        series: request.series.clone(),
        outcome,
        residuals,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::reference_series;
    use crate::domain::{ModelKind, ModelSpec};
    use crate::error::ErrorKind;
    use crate::fit::FitOptions;

    #[test]
    fn reference_run_picks_rosin_rammler() {
        let request = AnalysisRequest {
            series: reference_series().unwrap(),
            model: ModelSpec::Best,
            fit: FitOptions::default(),
        };
        let run = run_analysis(&request).unwrap();
        assert_eq!(run.outcome.best_model(), ModelKind::RosinRammler);
        assert_eq!(run.outcome.fits.len(), 2);
        assert_eq!(run.residuals.len(), 11);
        // Residuals are on the retained scale for Rosin-Rammler.
        assert_eq!(run.residuals[0].y_obs, 0.0);
    }

    #[test]
    fn degenerate_series_fails_with_fit_error() {
        let request = AnalysisRequest {
            series: SampleSeries::new(vec![1.0, 1.0, 1.0], vec![10.0, 20.0, 30.0]).unwrap(),
            model: ModelSpec::Ggs,
            fit: FitOptions::default(),
        };
        let err = run_analysis(&request).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NumericalFit);
    }
}

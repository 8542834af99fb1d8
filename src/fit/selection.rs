//! Model selection (GGS vs Rosin-Rammler) by goodness of fit.
//!
//! Each model is fitted on its own response scale:
//! - GGS on cumulative passing, as entered
//! - Rosin-Rammler on cumulative retained (`100 - passing`)
//!
//! R² is computed on each native scale and the higher one wins. Equal R²
//! goes to Rosin-Rammler.

use crate::domain::{AnalysisRequest, FitResult, FitSelection, ModelKind, ModelSpec, SampleSeries};
use crate::error::AppError;
use crate::fit::fitter::{FitOptions, fit_model};

/// Output of fitting + selection for a request.
#[derive(Debug, Clone)]
pub struct SelectionOutcome {
    pub best: FitResult,
    /// Fits for all attempted models.
    pub fits: Vec<FitResult>,
}

impl SelectionOutcome {
    pub fn best_model(&self) -> ModelKind {
        self.best.model
    }
}

/// Fit a single model to a series, transforming the response as the model needs.
pub fn fit_series(model: ModelKind, series: &SampleSeries, opts: &FitOptions) -> Result<FitResult, AppError> {
    let y = series.response(model.response());
    fit_model(model, series.sizes(), &y, opts)
}

/// Fit both models and pick the one with the higher R².
///
/// Both fits must succeed; any failure is returned as-is.
pub fn fit_both(series: &SampleSeries, opts: &FitOptions) -> Result<FitSelection, AppError> {
    let ggs = fit_series(ModelKind::Ggs, series, opts)?;
    let rosin_rammler = fit_series(ModelKind::RosinRammler, series, opts)?;
    let best = pick(ggs.r_squared, rosin_rammler.r_squared);

    tracing::info!(
        r2_ggs = ggs.r_squared,
        r2_rr = rosin_rammler.r_squared,
        best = best.display_name(),
        "model selected"
    );

    Ok(FitSelection {
        best,
        ggs,
        rosin_rammler,
    })
}

/// Choose the better model for raw sizes and cumulative-passing values.
pub fn choose_best_model(x: &[f64], y: &[f64], opts: &FitOptions) -> Result<ModelKind, AppError> {
    let series = SampleSeries::new(x.to_vec(), y.to_vec())?;
    Ok(fit_both(&series, opts)?.best)
}

/// Fit the model(s) a request asks for.
pub fn fit_and_select(request: &AnalysisRequest) -> Result<SelectionOutcome, AppError> {
    match request.model {
        ModelSpec::Ggs => single(ModelKind::Ggs, request),
        ModelSpec::RosinRammler => single(ModelKind::RosinRammler, request),
        ModelSpec::Best => {
            let selection = fit_both(&request.series, &request.fit)?;
            Ok(SelectionOutcome {
                best: selection.best_fit().clone(),
                fits: vec![selection.ggs, selection.rosin_rammler],
            })
        }
    }
}

fn single(model: ModelKind, request: &AnalysisRequest) -> Result<SelectionOutcome, AppError> {
    let fit = fit_series(model, &request.series, &request.fit)?;
    Ok(SelectionOutcome {
        best: fit.clone(),
        fits: vec![fit],
    })
}

/// Rosin-Rammler unless GGS is strictly better.
///
/// NaN (constant response) compares false, so it also lands on Rosin-Rammler.
fn pick(r2_ggs: f64, r2_rr: f64) -> ModelKind {
    if r2_rr < r2_ggs {
        ModelKind::Ggs
    } else {
        ModelKind::RosinRammler
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::models::{ggs, rosin_rammler};

    fn sizes() -> Vec<f64> {
        (1..=16).map(|i| i as f64 * 0.3).collect()
    }

    #[test]
    fn tie_goes_to_rosin_rammler() {
        assert_eq!(pick(0.97, 0.97), ModelKind::RosinRammler);
        assert_eq!(pick(0.98, 0.97), ModelKind::Ggs);
        assert_eq!(pick(0.96, 0.97), ModelKind::RosinRammler);
    }

    #[test]
    fn picks_ggs_on_power_law_data() {
        let x = sizes();
        let d100 = 5.0;
        let y: Vec<f64> = x.iter().map(|&xi| ggs(xi, d100, 0.9)).collect();
        let best = choose_best_model(&x, &y, &FitOptions::default()).unwrap();
        assert_eq!(best, ModelKind::Ggs);
    }

    #[test]
    fn picks_rosin_rammler_on_rr_data() {
        let x = sizes();
        let y: Vec<f64> = x.iter().map(|&xi| 100.0 - rosin_rammler(xi, 1.5, 1.8)).collect();
        let best = choose_best_model(&x, &y, &FitOptions::default()).unwrap();
        assert_eq!(best, ModelKind::RosinRammler);
    }

    #[test]
    fn single_model_request_fits_only_that_model() {
        let x = sizes();
        let y: Vec<f64> = x.iter().map(|&xi| ggs(xi, 5.0, 1.1)).collect();
        let request = AnalysisRequest {
            series: SampleSeries::new(x, y).unwrap(),
            model: ModelSpec::Ggs,
            fit: FitOptions::default(),
        };
        let outcome = fit_and_select(&request).unwrap();
        assert_eq!(outcome.fits.len(), 1);
        assert_eq!(outcome.best_model(), ModelKind::Ggs);
    }

    #[test]
    fn best_request_reports_both_fits() {
        let x = sizes();
        let y: Vec<f64> = x.iter().map(|&xi| 100.0 - rosin_rammler(xi, 2.0, 1.2)).collect();
        let request = AnalysisRequest {
            series: SampleSeries::new(x, y).unwrap(),
            model: ModelSpec::Best,
            fit: FitOptions::default(),
        };
        let outcome = fit_and_select(&request).unwrap();
        assert_eq!(outcome.fits.len(), 2);
        assert_eq!(outcome.fits[0].model, ModelKind::Ggs);
        assert_eq!(outcome.fits[1].model, ModelKind::RosinRammler);
    }

    #[test]
    fn selection_requires_both_fits() {
        let err = choose_best_model(&[1.0, 1.0, 1.0], &[10.0, 20.0, 30.0], &FitOptions::default())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NumericalFit);
    }

    #[test]
    fn choose_best_model_validates_shapes() {
        let err = choose_best_model(&[1.0, 2.0], &[10.0], &FitOptions::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InputShape);
    }
}

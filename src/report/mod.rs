//! Reporting utilities: per-sieve residuals and formatted terminal output.

pub mod format;

pub use format::*;

use crate::domain::{FitResult, PointResidual, SampleSeries};
use crate::error::AppError;
use crate::models::predict;

/// Compute fitted values and residuals for each sieve on the fit's response scale.
pub fn compute_residuals(series: &SampleSeries, fit: &FitResult) -> Result<Vec<PointResidual>, AppError> {
    let y_obs = series.response(fit.model.response());
    let mut out = Vec::with_capacity(series.len());
    for (&size, &y) in series.sizes().iter().zip(&y_obs) {
        let y_fit = predict(fit.model, size, &fit.parameters);
        if !y_fit.is_finite() {
            return Err(AppError::domain(format!(
                "Non-finite {} prediction at size {size}.",
                fit.model.display_name()
            )));
        }
        out.push(PointResidual {
            size,
            y_obs: y,
            y_fit,
            residual: y - y_fit,
        });
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ModelKind;
    use crate::error::ErrorKind;
    use approx::assert_abs_diff_eq;

    fn fit(model: ModelKind, parameters: [f64; 2]) -> FitResult {
        FitResult {
            model,
            parameters,
            covariance: None,
            r_squared: 1.0,
            mse: 0.0,
            sse: 0.0,
            n: 2,
            iterations: 0,
        }
    }

    #[test]
    fn ggs_residuals_are_on_passing_scale() {
        let series = SampleSeries::new(vec![2.0, 1.0], vec![100.0, 60.0]).unwrap();
        let residuals = compute_residuals(&series, &fit(ModelKind::Ggs, [2.0, 1.0])).unwrap();
        assert_eq!(residuals.len(), 2);
        assert_abs_diff_eq!(residuals[0].residual, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(residuals[1].y_fit, 50.0, epsilon = 1e-12);
        assert_abs_diff_eq!(residuals[1].residual, 10.0, epsilon = 1e-12);
    }

    #[test]
    fn rosin_rammler_residuals_are_on_retained_scale() {
        let series = SampleSeries::new(vec![1.0], vec![40.0]).unwrap();
        let residuals = compute_residuals(&series, &fit(ModelKind::RosinRammler, [1.0, 1.0])).unwrap();
        assert_eq!(residuals[0].y_obs, 60.0);
        assert_abs_diff_eq!(residuals[0].y_fit, 100.0 / std::f64::consts::E, epsilon = 1e-12);
    }

    #[test]
    fn non_finite_prediction_is_a_domain_error() {
        let series = SampleSeries::new(vec![1.0], vec![40.0]).unwrap();
        let err = compute_residuals(&series, &fit(ModelKind::Ggs, [0.0, 1.0])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Domain);
    }
}

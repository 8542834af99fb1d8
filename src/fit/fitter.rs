//! Low-level fitting routines for a single model kind.
//!
//! Given:
//! - sieve sizes `x_i`
//! - observed responses `y_i` (passing or retained, depending on the model)
//! - a starting guess
//!
//! we hand the problem to the Levenberg–Marquardt solver in [`crate::math::lm`]
//! and then derive:
//! - the parameter covariance `inv(JᵀJ) · SSE / (n - p)`
//! - R² and MSE on the same response scale the model was fitted on

use nalgebra::DMatrix;

use crate::domain::{FitResult, ModelKind};
use crate::error::AppError;
use crate::math::{CurveModel, LmOptions, Termination, levenberg_marquardt, mse, r_squared, reciprocal_condition};
use crate::models::evaluate;

/// `JᵀJ` with a reciprocal condition below this is treated as singular.
const SINGULAR_RCOND: f64 = 1e-12;

/// Fitting options that affect how each model is calibrated.
#[derive(Debug, Clone, PartialEq)]
pub struct FitOptions {
    /// Starting parameters. The default `[1.0, 1.0]` mirrors the classic
    /// curve-fit convention of starting every parameter at one.
    pub initial_guess: [f64; 2],
    pub solver: LmOptions,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            initial_guess: [1.0, 1.0],
            solver: LmOptions::default(),
        }
    }
}

/// Raw curve-fit output, independent of any particular model.
#[derive(Debug, Clone)]
pub struct CurveFit {
    pub params: Vec<f64>,
    /// `None` when `n == p` (no residual degrees of freedom).
    pub covariance: Option<DMatrix<f64>>,
    pub sse: f64,
    pub evaluations: usize,
    pub termination: Termination,
}

/// Fit a parametric curve `f(x, params)` to `(x, y)`.
pub fn curve_fit<M>(model: &M, x: &[f64], y: &[f64], p0: &[f64], opts: &LmOptions) -> Result<CurveFit, AppError>
where
    M: CurveModel + ?Sized,
{
    if x.is_empty() || y.is_empty() {
        return Err(AppError::input_shape("No data points to fit."));
    }
    if x.len() != y.len() {
        return Err(AppError::input_shape(format!(
            "x and y must have the same length (got {} and {}).",
            x.len(),
            y.len()
        )));
    }
    if x.len() < p0.len() {
        return Err(AppError::input_shape(format!(
            "Need at least {} points to fit {} parameters (got {}).",
            p0.len(),
            p0.len(),
            x.len()
        )));
    }
    if x.iter().all(|v| *v == x[0]) {
        return Err(AppError::numerical_fit(
            "Degenerate input: every x value is identical.",
        ));
    }

    let out = levenberg_marquardt(model, x, y, p0, opts)?;

    let jtj = out.jacobian.transpose() * &out.jacobian;
    if reciprocal_condition(&jtj) < SINGULAR_RCOND {
        return Err(AppError::numerical_fit(
            "Singular Jacobian at the solution; parameters are not identifiable from this data.",
        ));
    }

    let dof = x.len() - p0.len();
    let covariance = if dof == 0 {
        None
    } else {
        let inv = jtj.try_inverse().ok_or_else(|| {
            AppError::numerical_fit("Failed to invert JᵀJ for the parameter covariance.")
        })?;
        Some(inv * (out.sse / dof as f64))
    };

    Ok(CurveFit {
        params: out.params,
        covariance,
        sse: out.sse,
        evaluations: out.evaluations,
        termination: out.termination,
    })
}

/// Fit one particle-size model to its native response.
///
/// `y` must already be on the model's scale: passing for GGS, retained for
/// Rosin-Rammler (see [`ModelKind::response`]).
pub fn fit_model(model: ModelKind, x: &[f64], y: &[f64], opts: &FitOptions) -> Result<FitResult, AppError> {
    let fit = curve_fit(&model, x, y, &opts.initial_guess, &opts.solver).map_err(|e| {
        AppError::new(e.kind(), format!("{} fit failed: {e}", model.display_name()))
    })?;

    let parameters = [fit.params[0], fit.params[1]];
    let y_fit = evaluate(model, x, &parameters);
    let r_squared = r_squared(y, &y_fit);
    let mse = mse(y, &y_fit);

    tracing::info!(
        model = model.display_name(),
        p0 = parameters[0],
        p1 = parameters[1],
        r_squared,
        mse,
        evaluations = fit.evaluations,
        "model fitted"
    );

    Ok(FitResult {
        model,
        parameters,
        covariance: fit
            .covariance
            .map(|c| [[c[(0, 0)], c[(0, 1)]], [c[(1, 0)], c[(1, 1)]]]),
        r_squared,
        mse,
        sse: fit.sse,
        n: x.len(),
        iterations: fit.evaluations,
    })
}

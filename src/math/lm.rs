//! Nonlinear least squares via the `levenberg-marquardt` crate (a MINPACK port).
//!
//! This module only adapts a [`CurveModel`] to the crate's
//! [`LeastSquaresProblem`] and maps its termination report into our error type.
//! Residuals are `f(x_i; p) - y_i`, so the problem Jacobian is the model
//! gradient `∂f/∂p`.

use ::levenberg_marquardt::{LeastSquaresProblem, LevenbergMarquardt, TerminationReason};
use nalgebra::storage::Owned;
use nalgebra::{DMatrix, DVector, Dyn};

use crate::error::AppError;

/// Residual substituted for a non-finite model value. The trial step then
/// looks uphill and the trust region shrinks instead of the solve aborting.
const OUT_OF_DOMAIN_RESIDUAL: f64 = 1e100;

/// An early stop is accepted only if the residuals are this close to
/// orthogonal to every Jacobian column.
const STALL_ORTHOGONALITY: f64 = 1e-6;

/// A parametric curve `y = f(x; p)` with an analytic parameter gradient.
pub trait CurveModel {
    fn value(&self, x: f64, params: &[f64]) -> f64;

    /// Write `∂f/∂p_j` at `x` into `grad[j]`.
    fn gradient(&self, x: f64, params: &[f64], grad: &mut [f64]);
}

/// Solver tolerances and limits, passed straight through to the crate.
#[derive(Debug, Clone, PartialEq)]
pub struct LmOptions {
    /// Residual evaluations are capped at `patience * (p + 1)`.
    pub patience: usize,
    pub ftol: f64,
    pub xtol: f64,
    pub gtol: f64,
    /// Initial trust-region bound, as a multiple of the scaled start point.
    pub stepbound: f64,
}

impl Default for LmOptions {
    fn default() -> Self {
        Self {
            patience: 200,
            ftol: 1e-10,
            xtol: 1e-10,
            gtol: 1e-10,
            stepbound: 100.0,
        }
    }
}

/// Why the solver stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Residuals orthogonal to the Jacobian columns.
    Gradient,
    CostChange,
    StepSize,
    /// Residuals are exactly zero.
    ExactFit,
    /// No further improvement at working precision, with a vanishing gradient.
    Stalled,
}

#[derive(Debug, Clone)]
pub struct LmOutcome {
    pub params: Vec<f64>,
    pub sse: f64,
    /// Model Jacobian (`∂f/∂p`, n × k) at `params`.
    pub jacobian: DMatrix<f64>,
    /// Residual evaluations spent by the solver.
    pub evaluations: usize,
    pub termination: Termination,
}

struct CurveProblem<'a, M: ?Sized> {
    model: &'a M,
    x: &'a [f64],
    y: &'a [f64],
    params: DVector<f64>,
}

impl<M: CurveModel + ?Sized> CurveProblem<'_, M> {
    fn raw_residuals(&self) -> DVector<f64> {
        let p = self.params.as_slice();
        DVector::from_iterator(
            self.x.len(),
            self.x.iter().zip(self.y).map(|(&xi, &yi)| self.model.value(xi, p) - yi),
        )
    }

    fn model_jacobian(&self) -> DMatrix<f64> {
        let p = self.params.as_slice();
        let mut jac = DMatrix::<f64>::zeros(self.x.len(), p.len());
        let mut grad = vec![0.0; p.len()];
        for (i, &xi) in self.x.iter().enumerate() {
            self.model.gradient(xi, p, &mut grad);
            for (j, g) in grad.iter().enumerate() {
                jac[(i, j)] = *g;
            }
        }
        jac
    }
}

impl<M: CurveModel + ?Sized> LeastSquaresProblem<f64, Dyn, Dyn> for CurveProblem<'_, M> {
    type ResidualStorage = Owned<f64, Dyn>;
    type JacobianStorage = Owned<f64, Dyn, Dyn>;
    type ParameterStorage = Owned<f64, Dyn>;

    fn set_params(&mut self, p: &DVector<f64>) {
        self.params.copy_from(p);
    }

    fn params(&self) -> DVector<f64> {
        self.params.clone()
    }

    fn residuals(&self) -> Option<DVector<f64>> {
        Some(
            self.raw_residuals()
                .map(|r| if r.is_finite() { r } else { OUT_OF_DOMAIN_RESIDUAL }),
        )
    }

    fn jacobian(&self) -> Option<DMatrix<f64>> {
        let jac = self.model_jacobian();
        jac.iter().all(|v| v.is_finite()).then_some(jac)
    }
}

/// Fit `model` to `(x, y)` starting from `p0`.
pub fn levenberg_marquardt<M>(
    model: &M,
    x: &[f64],
    y: &[f64],
    p0: &[f64],
    opts: &LmOptions,
) -> Result<LmOutcome, AppError>
where
    M: CurveModel + ?Sized,
{
    let problem = CurveProblem {
        model,
        x,
        y,
        params: DVector::from_column_slice(p0),
    };
    if problem.raw_residuals().iter().any(|r| !r.is_finite()) {
        return Err(AppError::numerical_fit(format!(
            "Model is not finite at the initial guess {p0:?}."
        )));
    }

    let (problem, report) = LevenbergMarquardt::new()
        .with_ftol(opts.ftol)
        .with_xtol(opts.xtol)
        .with_gtol(opts.gtol)
        .with_stepbound(opts.stepbound)
        .with_patience(opts.patience)
        .minimize(problem);

    let params: Vec<f64> = problem.params.iter().copied().collect();
    let residuals = problem.raw_residuals();
    if residuals.iter().any(|r| !r.is_finite()) {
        return Err(AppError::numerical_fit(format!(
            "Model is not finite at the solution {params:?}."
        )));
    }
    let jacobian = problem.model_jacobian();
    if jacobian.iter().any(|v| !v.is_finite()) {
        return Err(AppError::numerical_fit(format!(
            "Non-finite Jacobian at the solution {params:?}."
        )));
    }

    let termination = match report.termination {
        TerminationReason::Orthogonal => Termination::Gradient,
        TerminationReason::ResidualsZero => Termination::ExactFit,
        TerminationReason::Converged { ftol: true, .. } => Termination::CostChange,
        TerminationReason::Converged { .. } => Termination::StepSize,
        TerminationReason::NoImprovementPossible(_) if is_stationary(&jacobian, &residuals) => {
            Termination::Stalled
        }
        TerminationReason::LostPatience => {
            return Err(AppError::numerical_fit(format!(
                "Least-squares fit did not converge within {} evaluations.",
                report.number_of_evaluations
            )));
        }
        other => {
            return Err(AppError::numerical_fit(format!(
                "Least-squares fit stopped without converging ({other:?}) at {params:?}."
            )));
        }
    };

    let sse = residuals.norm_squared();
    tracing::debug!(
        ?termination,
        evaluations = report.number_of_evaluations,
        sse,
        params = ?params,
        "least squares finished"
    );
    Ok(LmOutcome {
        params,
        sse,
        jacobian,
        evaluations: report.number_of_evaluations,
        termination,
    })
}

/// `max_j |J_jᵀ r| / (‖J_j‖ ‖r‖) <= STALL_ORTHOGONALITY`; zero residuals count.
pub fn is_stationary(jacobian: &DMatrix<f64>, residuals: &DVector<f64>) -> bool {
    let r_norm = residuals.norm();
    if r_norm == 0.0 {
        return true;
    }
    jacobian.column_iter().all(|col| {
        let c_norm = col.norm();
        c_norm == 0.0 || (col.dot(residuals)).abs() / (c_norm * r_norm) <= STALL_ORTHOGONALITY
    })
}

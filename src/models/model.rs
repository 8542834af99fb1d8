//! Model evaluation for GGS / Rosin-Rammler.
//!
//! The fitter only needs `predict(model, x, params)`; everything else here is
//! closed-form post-processing of a fitted parameter pair.
//!
//! Conventions:
//! - GGS returns cumulative **passing** percentage.
//! - Rosin-Rammler returns cumulative **retained** percentage.

use crate::domain::ModelKind;
use crate::math::CurveModel;

/// Gates-Gaudin-Schuhmann: `100 * (x / d100)^m`.
pub fn ggs(x: f64, d100: f64, m: f64) -> f64 {
    100.0 * (x / d100).powf(m)
}

/// Size for a target passing percentage under an offset power law.
///
/// `((cum_pass + |c|) / a)^(1/b)`. With `a = 100 / d100^m`, `b = m`, `c = 0`
/// this inverts [`ggs`]; the offset `c` serves three-parameter variants.
pub fn inverse_ggs(cum_pass: f64, a: f64, b: f64, c: f64) -> f64 {
    ((cum_pass + c.abs()) / a).powf(1.0 / b)
}

/// Rosin-Rammler: `100 * exp(-(x / k)^n)`.
pub fn rosin_rammler(x: f64, k: f64, n: f64) -> f64 {
    100.0 * (-(x / k).powf(n)).exp()
}

/// Predict the model's native response at size `x`.
pub fn predict(model: ModelKind, x: f64, params: &[f64; 2]) -> f64 {
    match model {
        ModelKind::Ggs => ggs(x, params[0], params[1]),
        ModelKind::RosinRammler => rosin_rammler(x, params[0], params[1]),
    }
}

/// `[∂/∂d100, ∂/∂m]` of [`ggs`].
pub fn ggs_gradient(x: f64, d100: f64, m: f64) -> [f64; 2] {
    let f = ggs(x, d100, m);
    [-m / d100 * f, f * (x / d100).ln()]
}

/// `[∂/∂k, ∂/∂n]` of [`rosin_rammler`].
pub fn rosin_rammler_gradient(x: f64, k: f64, n: f64) -> [f64; 2] {
    let u = (x / k).powf(n);
    let f = 100.0 * (-u).exp();
    [f * u * n / k, -f * u * (x / k).ln()]
}

impl CurveModel for ModelKind {
    fn value(&self, x: f64, params: &[f64]) -> f64 {
        predict(*self, x, &[params[0], params[1]])
    }

    fn gradient(&self, x: f64, params: &[f64], grad: &mut [f64]) {
        let g = match self {
            ModelKind::Ggs => ggs_gradient(x, params[0], params[1]),
            ModelKind::RosinRammler => rosin_rammler_gradient(x, params[0], params[1]),
        };
        grad.copy_from_slice(&g);
    }
}

/// Vectorised [`predict`].
pub fn evaluate(model: ModelKind, xs: &[f64], params: &[f64; 2]) -> Vec<f64> {
    xs.iter().map(|&x| predict(model, x, params)).collect()
}

/// Convert a native model response into cumulative passing.
pub fn passing_from_response(model: ModelKind, y: f64) -> f64 {
    match model {
        ModelKind::Ggs => y,
        ModelKind::RosinRammler => 100.0 - y,
    }
}

/// Size at which `pct` percent of the material passes (e.g. P80).
///
/// Returns `None` for `pct` outside `(0, 100)` or when the parameters do not
/// produce a finite positive size.
pub fn size_at_passing(model: ModelKind, params: &[f64; 2], pct: f64) -> Option<f64> {
    if !(pct > 0.0 && pct < 100.0) {
        return None;
    }
    let size = match model {
        ModelKind::Ggs => {
            let (d100, m) = (params[0], params[1]);
            // a = 100 / d100^m turns the offset inverse into the plain GGS inverse.
            inverse_ggs(pct, 100.0 / d100.powf(m), m, 0.0)
        }
        ModelKind::RosinRammler => {
            let (k, n) = (params[0], params[1]);
            let retained = 100.0 - pct;
            k * (100.0 / retained).ln().powf(1.0 / n)
        }
    };
    (size.is_finite() && size > 0.0).then_some(size)
}

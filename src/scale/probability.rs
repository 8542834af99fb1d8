//! Rosin-Rammler probability scale.
//!
//! Cumulative retained `R` follows `R = 100 · exp(-(x/k)^n)` for a Rosin-Rammler
//! distribution, so
//!
//! ```text
//! ln(ln(100 / R)) = n · ln(x) - n · ln(k)
//! ```
//!
//! is linear in `ln(x)`. Plotting `ln(ln(100/R))` against a log size axis turns
//! the distribution into a straight line (the classic Weibull paper layout).
//!
//! Domain notes:
//! - values below `threshold` are masked, as are values whose transform is
//!   non-finite (`R >= 100` gives `ln(0)` or the log of a negative number)
//! - the visible range is always clamped to `[threshold, 99.9]`

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::scale::AxisScale;

/// Smallest accepted threshold (and the default).
pub const MIN_THRESHOLD: f64 = 0.01;

/// Upper limit of the visible range.
pub const UPPER_LIMIT: f64 = 99.9;

/// Fixed major tick positions (percent retained).
pub const TICKS: [f64; 15] = [
    0.01, 0.1, 1.0, 5.0, 10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0, 80.0, 90.0, 95.0, 99.0,
];

/// Which inverse to pair with the forward transform.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InverseFormula {
    /// `10^(2 - 10^y')`. Historical formula; mixes bases, so it does not
    /// round-trip with the natural-log forward transform.
    #[default]
    Legacy,
    /// `100 · exp(-exp(y'))`, the algebraic inverse of the forward transform.
    Exact,
}

/// Probability-axis configuration. Immutable once built.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbabilityScale {
    threshold: f64,
    inverse: InverseFormula,
}

impl Default for ProbabilityScale {
    fn default() -> Self {
        Self {
            threshold: MIN_THRESHOLD,
            inverse: InverseFormula::default(),
        }
    }
}

impl ProbabilityScale {
    pub fn new(threshold: f64) -> Result<Self, AppError> {
        if !threshold.is_finite() || threshold < MIN_THRESHOLD {
            return Err(AppError::configuration(format!(
                "Probability-scale threshold must be >= {MIN_THRESHOLD} (got {threshold})."
            )));
        }
        if threshold >= UPPER_LIMIT {
            return Err(AppError::configuration(format!(
                "Probability-scale threshold must be below {UPPER_LIMIT} (got {threshold})."
            )));
        }
        Ok(Self {
            threshold,
            inverse: InverseFormula::default(),
        })
    }

    pub fn with_inverse(self, inverse: InverseFormula) -> Self {
        Self { inverse, ..self }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn inverse_formula(&self) -> InverseFormula {
        self.inverse
    }

    /// `ln(ln(100 / y))`, or `None` when `y` is out of domain.
    pub fn transform(&self, y: f64) -> Option<f64> {
        if !(y >= self.threshold) {
            return None;
        }
        let t = (100.0 / y).ln().ln();
        t.is_finite().then_some(t)
    }

    /// Apply the forward transform element-wise, keeping the input shape.
    pub fn forward_all(&self, values: &[f64]) -> Vec<Option<f64>> {
        values.iter().map(|&v| self.transform(v)).collect()
    }

    /// Like [`forward_all`](Self::forward_all), but fails if nothing is in domain.
    pub fn forward_strict(&self, values: &[f64]) -> Result<Vec<Option<f64>>, AppError> {
        let out = self.forward_all(values);
        if out.iter().all(Option::is_none) {
            return Err(AppError::domain(format!(
                "No values inside the probability-scale domain [{}, 100).",
                self.threshold
            )));
        }
        Ok(out)
    }

    /// Inverse transform per the configured [`InverseFormula`].
    pub fn untransform(&self, coord: f64) -> f64 {
        match self.inverse {
            InverseFormula::Legacy => 10f64.powf(2.0 - 10f64.powf(coord)),
            InverseFormula::Exact => 100.0 * (-coord.exp()).exp(),
        }
    }

    /// `(max(vmin, threshold), min(vmax, 99.9))`.
    pub fn clamp_range(&self, vmin: f64, vmax: f64) -> (f64, f64) {
        (vmin.max(self.threshold), vmax.min(UPPER_LIMIT))
    }
}

impl AxisScale for ProbabilityScale {
    fn name(&self) -> &'static str {
        "rosin-rammler probability"
    }

    fn forward(&self, value: f64) -> Option<f64> {
        self.transform(value)
    }

    fn inverse(&self, coord: f64) -> f64 {
        self.untransform(coord)
    }

    fn limit_range(&self, vmin: f64, vmax: f64) -> (f64, f64) {
        self.clamp_range(vmin, vmax)
    }

    fn ticks(&self, vmin: f64, vmax: f64) -> Vec<f64> {
        let (lo, hi) = self.clamp_range(vmin, vmax);
        TICKS.iter().copied().filter(|t| *t >= lo && *t <= hi).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use approx::assert_relative_eq;

    #[test]
    fn rejects_threshold_below_minimum() {
        let err = ProbabilityScale::new(0.001).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert!(ProbabilityScale::new(f64::NAN).is_err());
        assert!(ProbabilityScale::new(99.9).is_err());
        assert!(ProbabilityScale::new(0.01).is_ok());
    }

    #[test]
    fn limit_range_clamps_to_domain() {
        let s = ProbabilityScale::new(0.01).unwrap();
        assert_eq!(s.limit_range(0.001, 200.0), (0.01, 99.9));
        assert_eq!(s.limit_range(1.0, 50.0), (1.0, 50.0));
    }

    #[test]
    fn forward_is_double_natural_log() {
        let s = ProbabilityScale::default();
        assert_relative_eq!(s.forward(50.0).unwrap(), (2f64.ln()).ln());
        assert_relative_eq!(s.forward(100.0 / std::f64::consts::E).unwrap(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn forward_masks_out_of_domain_values() {
        let s = ProbabilityScale::default();
        assert_eq!(s.forward(100.0), None);
        assert_eq!(s.forward(120.0), None);
        assert_eq!(s.forward(0.005), None);
        assert_eq!(s.forward(f64::NAN), None);
        assert_eq!(s.forward_all(&[0.0, 50.0, 100.0]).iter().filter(|v| v.is_some()).count(), 1);
    }

    #[test]
    fn forward_strict_fails_only_when_everything_is_masked() {
        let s = ProbabilityScale::new(1.0).unwrap();
        let err = s.forward_strict(&[0.5, 100.0]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Domain);
        assert_eq!(s.forward_strict(&[0.5, 20.0]).unwrap().len(), 2);
    }

    #[test]
    fn forward_strict_rejects_empty_input() {
        let err = ProbabilityScale::default().forward_strict(&[]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Domain);
    }

    #[test]
    fn exact_inverse_round_trips() {
        let s = ProbabilityScale::default().with_inverse(InverseFormula::Exact);
        for &y in &TICKS {
            let t = s.forward(y).unwrap();
            assert_relative_eq!(s.inverse(t), y, max_relative = 1e-10);
        }
    }

    #[test]
    fn legacy_inverse_keeps_historical_formula() {
        let s = ProbabilityScale::default();
        assert_eq!(s.inverse_formula(), InverseFormula::Legacy);
        assert_relative_eq!(s.inverse(0.0), 10.0);
        assert_relative_eq!(s.inverse(0.5), 10f64.powf(2.0 - 10f64.sqrt()));
        // Not an inverse of the forward transform.
        let t = s.forward(50.0).unwrap();
        assert!((s.inverse(t) - 50.0).abs() > 1.0);
    }

    #[test]
    fn ticks_are_the_fixed_set_inside_the_range() {
        let s = ProbabilityScale::default();
        assert_eq!(s.ticks(0.0, 100.0), TICKS.to_vec());
        assert_eq!(s.ticks(2.0, 25.0), vec![5.0, 10.0, 20.0]);
    }

    #[test]
    fn forward_is_decreasing_in_retained() {
        let s = ProbabilityScale::default();
        let coords: Vec<f64> = TICKS.iter().map(|&t| s.forward(t).unwrap()).collect();
        assert!(coords.windows(2).all(|w| w[0] > w[1]));
    }
}

//! Base-10 logarithmic scale.

use crate::scale::AxisScale;

/// Mantissas used for major ticks inside each decade.
const DECADE_STEPS: [f64; 3] = [1.0, 2.0, 5.0];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogScale;

impl AxisScale for LogScale {
    fn name(&self) -> &'static str {
        "log10"
    }

    fn forward(&self, value: f64) -> Option<f64> {
        (value > 0.0 && value.is_finite()).then(|| value.log10())
    }

    fn inverse(&self, coord: f64) -> f64 {
        10f64.powf(coord)
    }

    fn limit_range(&self, vmin: f64, vmax: f64) -> (f64, f64) {
        (vmin.max(f64::MIN_POSITIVE), vmax)
    }

    fn ticks(&self, vmin: f64, vmax: f64) -> Vec<f64> {
        let (lo, hi) = self.limit_range(vmin, vmax);
        if !(lo.is_finite() && hi.is_finite()) || hi < lo {
            return Vec::new();
        }
        let first = lo.log10().floor() as i32;
        let last = hi.log10().ceil() as i32;

        let mut out = Vec::new();
        for exp in first..=last {
            let base = 10f64.powi(exp);
            for step in DECADE_STEPS {
                let t = step * base;
                // Tolerate rounding at the range edges.
                if t >= lo * (1.0 - 1e-12) && t <= hi * (1.0 + 1e-12) {
                    out.push(t);
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_masks_non_positive() {
        assert_eq!(LogScale.forward(0.0), None);
        assert_eq!(LogScale.forward(-2.0), None);
        assert_eq!(LogScale.forward(100.0), Some(2.0));
    }

    #[test]
    fn inverse_round_trips() {
        let t = LogScale.forward(0.425).unwrap();
        assert!((LogScale.inverse(t) - 0.425).abs() < 1e-12);
    }

    #[test]
    fn ticks_follow_one_two_five() {
        let ticks = LogScale.ticks(0.15, 4.75);
        assert_eq!(ticks.len(), 4);
        let expected = [0.2, 0.5, 1.0, 2.0];
        for (t, e) in ticks.iter().zip(expected) {
            assert!((t - e).abs() < 1e-12, "{t} vs {e}");
        }
    }
}

//! Axis scales.
//!
//! A renderer never hard-codes a coordinate system; it asks an [`AxisScale`] to
//! map data values into axis coordinates. This is the whole plugin contract a
//! plotting backend needs:
//!
//! - `forward` / `inverse` coordinate transforms (masked values come back as `None`)
//! - `limit_range` to clamp the visible range to the transform's domain
//! - `ticks` / `format_tick` for major tick placement and labels
//!
//! Implementations:
//! - [`ProbabilityScale`]: Rosin-Rammler (Weibull) probability scale for cumulative retained
//! - [`LogScale`]: base-10 logarithmic scale for sieve sizes and the GGS log-log view

pub mod log;
pub mod probability;

pub use log::*;
pub use probability::*;

/// A one-dimensional, separable axis transform.
pub trait AxisScale {
    /// Short identifier (e.g. for headers).
    fn name(&self) -> &'static str;

    /// Map a data value to axis coordinates; `None` if the value is masked.
    fn forward(&self, value: f64) -> Option<f64>;

    /// Map an axis coordinate back to a data value.
    fn inverse(&self, coord: f64) -> f64;

    /// Clamp a requested data range to the scale's valid domain.
    fn limit_range(&self, vmin: f64, vmax: f64) -> (f64, f64);

    /// Major tick positions (data units) within `[vmin, vmax]`.
    fn ticks(&self, vmin: f64, vmax: f64) -> Vec<f64>;

    /// Plain (non-scientific) decimal label.
    fn format_tick(&self, value: f64) -> String {
        format!("{value}")
    }
}

/// Project `(x, y)` data through two scales, dropping masked points.
pub fn project(x_scale: &dyn AxisScale, y_scale: &dyn AxisScale, points: &[(f64, f64)]) -> Vec<(f64, f64)> {
    points
        .iter()
        .filter_map(|&(x, y)| Some((x_scale.forward(x)?, y_scale.forward(y)?)))
        .collect()
}

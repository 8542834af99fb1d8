//! Read/write fit JSON files.
//!
//! Fit JSON is the "portable" representation of a fitted model:
//! - model kind + parameters + fit quality
//! - the response scale the model was fitted on
//! - the observations that were fitted
//! - a precomputed fitted grid for quick plotting
//!
//! The schema is defined by `domain::FitFile`.

use std::fs::File;
use std::path::Path;

use chrono::Utc;

use crate::domain::{FitFile, FitGrid, FitResult, SampleSeries};
use crate::error::AppError;
use crate::models::evaluate;

/// Number of points in the saved fitted grid.
const GRID_POINTS: usize = 101;

/// Build the in-memory fit file for a fitted series.
pub fn build_fit_file(fit: &FitResult, series: &SampleSeries) -> FitFile {
    let response = fit.model.response();
    let stats = series.stats();
    let sizes = build_size_grid(stats.size_min, stats.size_max, GRID_POINTS);
    let y = evaluate(fit.model, &sizes, &fit.parameters);

    FitFile {
        tool: "psd".to_string(),
        generated_at: Utc::now(),
        fit: fit.clone(),
        response,
        observed: Some(FitGrid {
            sizes: series.sizes().to_vec(),
            y: series.response(response),
        }),
        grid: FitGrid { sizes, y },
    }
}

/// Write a fit JSON file.
pub fn write_fit_json(path: &Path, fit: &FitResult, series: &SampleSeries) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::io(format!("Failed to create fit JSON '{}': {e}", path.display())))?;

    let doc = build_fit_file(fit, series);
    serde_json::to_writer_pretty(file, &doc)
        .map_err(|e| AppError::io(format!("Failed to write fit JSON: {e}")))?;

    tracing::debug!(path = %path.display(), model = fit.model.slug(), "fit json written");
    Ok(())
}

/// Read a fit JSON file.
pub fn read_fit_json(path: &Path) -> Result<FitFile, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::io(format!("Failed to open fit JSON '{}': {e}", path.display())))?;
    let doc: FitFile =
        serde_json::from_reader(file).map_err(|e| AppError::io(format!("Invalid fit JSON: {e}")))?;

    if doc.grid.sizes.len() != doc.grid.y.len() {
        return Err(AppError::input_shape(format!(
            "Fit JSON grid has {} sizes but {} values.",
            doc.grid.sizes.len(),
            doc.grid.y.len()
        )));
    }
    Ok(doc)
}

/// Log-spaced sizes spanning `[size_min, size_max]`.
fn build_size_grid(size_min: f64, size_max: f64, n: usize) -> Vec<f64> {
    let n = n.max(2);
    let mut lo = size_min;
    let mut hi = size_max;
    if !(lo.is_finite() && hi.is_finite() && lo > 0.0) || hi < lo {
        lo = 0.1;
        hi = 10.0;
    }
    if (hi / lo - 1.0).abs() < 1e-9 {
        lo /= 2.0;
        hi *= 2.0;
    }

    let (l0, l1) = (lo.ln(), hi.ln());
    (0..n)
        .map(|i| {
            let u = i as f64 / (n as f64 - 1.0);
            (l0 + u * (l1 - l0)).exp()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ModelKind, ResponseKind};
    use approx::assert_relative_eq;

    fn fit() -> FitResult {
        FitResult {
            model: ModelKind::RosinRammler,
            parameters: [1.3, 1.0],
            covariance: Some([[0.01, 0.0], [0.0, 0.002]]),
            r_squared: 0.99,
            mse: 9.0,
            sse: 99.0,
            n: 3,
            iterations: 7,
        }
    }

    #[test]
    fn grid_is_log_spaced_and_covers_range() {
        let g = build_size_grid(0.1, 10.0, 5);
        assert_eq!(g.len(), 5);
        assert_relative_eq!(g[0], 0.1, epsilon = 1e-12);
        assert_relative_eq!(g[2], 1.0, epsilon = 1e-12);
        assert_relative_eq!(g[4], 10.0, epsilon = 1e-12);
    }

    #[test]
    fn degenerate_range_is_widened() {
        let g = build_size_grid(2.0, 2.0, 3);
        assert!(g[0] < 2.0 && g[2] > 2.0);
    }

    #[test]
    fn fit_file_carries_observations_on_response_scale() {
        let series = SampleSeries::new(vec![2.0, 1.0, 0.5], vec![90.0, 60.0, 30.0]).unwrap();
        let doc = build_fit_file(&fit(), &series);
        assert_eq!(doc.response, ResponseKind::Retained);
        let observed = doc.observed.unwrap();
        assert_eq!(observed.y, vec![10.0, 40.0, 70.0]);
        assert_eq!(doc.grid.sizes.len(), GRID_POINTS);
        assert_eq!(doc.grid.y.len(), GRID_POINTS);
    }

    #[test]
    fn write_then_read_preserves_fit() {
        let series = SampleSeries::new(vec![2.0, 1.0, 0.5], vec![90.0, 60.0, 30.0]).unwrap();
        let path = std::env::temp_dir().join(format!("psd_fit_{}.json", std::process::id()));
        write_fit_json(&path, &fit(), &series).unwrap();
        let doc = read_fit_json(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(doc.tool, "psd");
        assert_eq!(doc.fit, fit());
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = read_fit_json(Path::new("/definitely/not/here.json")).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Io);
    }
}

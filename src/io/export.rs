//! Export per-sieve results to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream scripts.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::{FitResult, PointResidual};
use crate::error::AppError;

/// Write per-sieve results to a CSV file.
///
/// Values are on the fitted model's response scale (`response` column).
pub fn write_results_csv(path: &Path, residuals: &[PointResidual], fit: &FitResult) -> Result<(), AppError> {
    let mut file = File::create(path)
        .map_err(|e| AppError::io(format!("Failed to create export CSV '{}': {e}", path.display())))?;
    write_results(&mut file, residuals, fit)
}

fn write_results<W: Write>(out: &mut W, residuals: &[PointResidual], fit: &FitResult) -> Result<(), AppError> {
    writeln!(out, "model,response,sieve_size,y_obs,y_fit,residual")
        .map_err(|e| AppError::io(format!("Failed to write export CSV header: {e}")))?;

    let model = fit.model.slug();
    let response = fit.model.response().slug();
    for r in residuals {
        writeln!(
            out,
            "{model},{response},{},{:.4},{:.4},{:.4}",
            r.size, r.y_obs, r.y_fit, r.residual
        )
        .map_err(|e| AppError::io(format!("Failed to write export CSV row: {e}")))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ModelKind;

    #[test]
    fn writes_header_and_rows() {
        let fit = FitResult {
            model: ModelKind::RosinRammler,
            parameters: [1.3, 1.0],
            covariance: None,
            r_squared: 0.99,
            mse: 1.0,
            sse: 11.0,
            n: 1,
            iterations: 4,
        };
        let residuals = [PointResidual {
            size: 0.6,
            y_obs: 65.6,
            y_fit: 63.1,
            residual: 2.5,
        }];

        let mut buf = Vec::new();
        write_results(&mut buf, &residuals, &fit).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(
            text,
            "model,response,sieve_size,y_obs,y_fit,residual\n\
             rosin-rammler,retained,0.6,65.6000,63.1000,2.5000\n"
        );
    }
}

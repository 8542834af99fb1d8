//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the math/fitting code stays clean and testable
//! - output changes are localized

use crate::domain::{FitResult, PointResidual, SeriesStats};
use crate::fit::SelectionOutcome;
use crate::models::size_at_passing;

/// Characteristic sizes reported for the chosen model.
const REPORTED_PASSING: [f64; 2] = [50.0, 80.0];

/// Format the full run summary (dataset stats + fit diagnostics + chosen model).
pub fn format_run_summary(stats: &SeriesStats, outcome: &SelectionOutcome) -> String {
    let mut out = String::new();

    out.push_str("=== psd - Particle Size Distribution Fit ===\n");
    out.push_str(&format!(
        "Sieves: n={} | size=[{:.3}, {:.3}] | passing=[{:.1}, {:.1}]%\n",
        stats.n, stats.size_min, stats.size_max, stats.passing_min, stats.passing_max
    ));

    out.push_str("\nModel diagnostics:\n");
    for fit in &outcome.fits {
        let chosen = if fit.model == outcome.best.model { "*" } else { " " };
        out.push_str(&format!(
            "{chosen} {:<14} R2={:.5} MSE={:.3} SSE={:.3} evals={} ({})\n",
            fit.model.display_name(),
            fit.r_squared,
            fit.mse,
            fit.sse,
            fit.iterations,
            fit.model.response().slug(),
        ));
    }

    let best = &outcome.best;
    out.push_str("\nChosen model:\n");
    out.push_str(&format!("- {}\n", best.model.display_name()));
    out.push_str(&format_parameters(best));
    for pct in REPORTED_PASSING {
        let label = format!("P{pct:.0}");
        match size_at_passing(best.model, &best.parameters, pct) {
            Some(size) => out.push_str(&format!("- {label:<5}: {size:.4}\n")),
            None => out.push_str(&format!("- {label:<5}: n/a\n")),
        }
    }
    out.push('\n');

    out
}

/// One line per parameter, with a one-sigma error when the covariance exists.
fn format_parameters(fit: &FitResult) -> String {
    let names = fit.model.param_names();
    let errors = fit.std_errors();
    let mut out = String::new();
    for (i, name) in names.iter().enumerate() {
        let value = fit.parameters[i];
        match errors {
            Some(se) => out.push_str(&format!("- {name:<5}: {value:.6} ± {:.6}\n", se[i])),
            None => out.push_str(&format!("- {name:<5}: {value:.6}\n")),
        }
    }
    out
}

/// Format the per-sieve observed vs fitted table.
pub fn format_observations(residuals: &[PointResidual], fit: &FitResult) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Per-sieve fit ({}, {}):\n",
        truncate(fit.model.display_name(), 14),
        fit.model.response().label()
    ));
    out.push_str(format!("{:>10} {:>10} {:>10} {:>10}\n", "size", "y_obs", "y_fit", "residual").trim_end());
    out.push('\n');
    out.push_str(format!("{:-<10} {:-<10} {:-<10} {:-<10}\n", "", "", "", "").trim_end());
    out.push('\n');

    for r in residuals {
        out.push_str(
            format!(
                "{:>10.3} {:>10.2} {:>10.2} {:>10.2}\n",
                r.size, r.y_obs, r.y_fit, r.residual
            )
            .trim_end(),
        );
        out.push('\n');
    }

    out
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ModelKind;

    fn fit(model: ModelKind, r_squared: f64) -> FitResult {
        FitResult {
            model,
            parameters: [1.333, 1.008],
            covariance: Some([[0.0004, 0.0], [0.0, 0.0009]]),
            r_squared,
            mse: 10.0,
            sse: 100.0,
            n: 11,
            iterations: 9,
        }
    }

    fn stats() -> SeriesStats {
        SeriesStats {
            n: 11,
            size_min: 0.149,
            size_max: 4.75,
            passing_min: 13.6,
            passing_max: 100.0,
        }
    }

    #[test]
    fn summary_marks_chosen_model() {
        let best = fit(ModelKind::RosinRammler, 0.99);
        let outcome = SelectionOutcome {
            best: best.clone(),
            fits: vec![fit(ModelKind::Ggs, 0.97), best],
        };
        let text = format_run_summary(&stats(), &outcome);
        assert!(text.contains("  GGS"));
        assert!(text.contains("* Rosin-Rammler"));
        assert!(text.contains("- k    : 1.333000 ± 0.020000"));
        assert!(text.contains("- P80"));
        assert!(text.contains("n=11"));
    }

    #[test]
    fn parameters_without_covariance_omit_error() {
        let mut f = fit(ModelKind::Ggs, 1.0);
        f.covariance = None;
        let text = format_parameters(&f);
        assert_eq!(text, "- d100 : 1.333000\n- m    : 1.008000\n");
    }

    #[test]
    fn observation_table_has_one_row_per_sieve() {
        let rows = [
            PointResidual { size: 4.75, y_obs: 0.0, y_fit: 2.9, residual: -2.9 },
            PointResidual { size: 0.6, y_obs: 65.6, y_fit: 63.8, residual: 1.8 },
        ];
        let text = format_observations(&rows, &fit(ModelKind::RosinRammler, 0.99));
        assert_eq!(text.lines().count(), 5);
        assert!(text.contains("Cumulative Retained"));
        assert!(text.lines().all(|l| l == l.trim_end()));
    }

    #[test]
    fn truncate_marks_cut() {
        assert_eq!(truncate("abc", 5), "abc");
        assert_eq!(truncate("abcdefgh", 4), "abc.");
    }
}

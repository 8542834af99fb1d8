//! Dense linear-algebra helpers on top of nalgebra.

use nalgebra::DMatrix;

/// Reciprocal condition number (`σ_min / σ_max`) of a matrix.
///
/// `0.0` for an all-zero or non-finite matrix.
pub fn reciprocal_condition(x: &DMatrix<f64>) -> f64 {
    if x.iter().any(|v| !v.is_finite()) {
        return 0.0;
    }
    let sv = x.singular_values();
    let max = sv.max();
    if max <= 0.0 {
        return 0.0;
    }
    sv.min() / max
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rank_deficient_matrix_has_zero_reciprocal_condition() {
        let x = DMatrix::from_row_slice(3, 2, &[1.0, 2.0, 2.0, 4.0, 3.0, 6.0]);
        assert!(reciprocal_condition(&x) < 1e-12);
        assert!((reciprocal_condition(&DMatrix::<f64>::identity(2, 2)) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn non_finite_matrix_is_treated_as_singular() {
        let x = DMatrix::from_row_slice(2, 2, &[1.0, f64::NAN, 0.0, 1.0]);
        assert_eq!(reciprocal_condition(&x), 0.0);
    }
}

use log::trace;
use nalgebra::{DMatrix, DVector};

use crate::config::EvaluationOptions;
use crate::error::EvalError;

/// Orthogonal projection of `signal` onto the span of the `basis` columns.
///
/// Equivalent to `B · pinv(B) · signal`, computed from the thin SVD
/// `B = U Σ Vᵗ` as `U_r U_rᵗ · signal`, where `U_r` keeps the left singular
/// vectors whose singular value exceeds `rcond · σ_max`. Collinear or zero
/// columns simply reduce the rank; they never make the projection fail.
///
/// Columns are scaled to unit norm before the SVD, so the span (and the
/// result) does not depend on how loud each basis signal is. All-zero
/// columns are dropped. An empty basis spans only the origin, so the result
/// is the zero vector.
pub fn project(
    signal: &[f64],
    basis: &[&[f64]],
    options: &EvaluationOptions,
) -> Result<Vec<f64>, EvalError> {
    let m = signal.len();

    for (j, col) in basis.iter().enumerate() {
        if col.len() != m {
            return Err(EvalError::Dimension {
                signal: format!("basis[{j}]"),
                expected: m,
                actual: col.len(),
            });
        }
    }

    let columns: Vec<Vec<f64>> = basis.iter().filter_map(|col| unit_column(col)).collect();
    let k = columns.len();
    if m == 0 || k == 0 {
        return Ok(vec![0.0; m]);
    }

    let b = DMatrix::from_fn(m, k, |r, c| columns[c][r]);
    let svd = b
        .try_svd(true, false, f64::EPSILON, 0)
        .ok_or(EvalError::SvdNotConverged)?;
    let u = svd.u.as_ref().ok_or(EvalError::SvdNotConverged)?;

    let sigma_max = svd.singular_values.max();
    let mut projected = DVector::<f64>::zeros(m);
    if sigma_max <= 0.0 {
        trace!("projection basis {m}x{k} is all zeros");
        return Ok(projected.iter().copied().collect());
    }

    let cutoff = options.rcond_for(m, k) * sigma_max;
    let s = DVector::from_column_slice(signal);
    let mut rank = 0;
    for (j, sigma) in svd.singular_values.iter().enumerate() {
        if *sigma <= cutoff {
            continue;
        }
        let uj = u.column(j);
        let coeff = uj.dot(&s);
        projected.axpy(coeff, &uj, 1.0);
        rank += 1;
    }
    trace!("projection basis {m}x{k} has numerical rank {rank}");

    Ok(projected.iter().copied().collect())
}

/// `col / ‖col‖`, or `None` for an all-zero column. The max-abs prescale
/// keeps the norm from under- or overflowing for extreme amplitudes.
fn unit_column(col: &[f64]) -> Option<Vec<f64>> {
    let peak = col.iter().fold(0.0f64, |acc, v| acc.max(v.abs()));
    if peak == 0.0 {
        return None;
    }
    let norm = col.iter().map(|v| (v / peak).powi(2)).sum::<f64>().sqrt() * peak;
    Some(col.iter().map(|v| v / norm).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: &[f64], b: &[f64]) {
        assert_eq!(a.len(), b.len());
        for (i, (x, y)) in a.iter().zip(b).enumerate() {
            assert!((x - y).abs() < 1e-10, "index {i}: {x} != {y}");
        }
    }

    fn opts() -> EvaluationOptions {
        EvaluationOptions::default()
    }

    #[test]
    fn single_column_is_scalar_projection() {
        let s = [1.0, 2.0, 3.0];
        let b = [1.0, 0.0, 1.0];
        // (s·b / b·b) b = (4 / 2) b
        let p = project(&s, &[&b], &opts()).unwrap();
        assert_close(&p, &[2.0, 0.0, 2.0]);
    }

    #[test]
    fn empty_basis_projects_to_zero() {
        let p = project(&[1.0, -2.0, 3.0], &[], &opts()).unwrap();
        assert_eq!(p, vec![0.0; 3]);
    }

    #[test]
    fn zero_column_projects_to_zero() {
        let p = project(&[1.0, -2.0, 3.0], &[&[0.0; 3]], &opts()).unwrap();
        assert_eq!(p, vec![0.0; 3]);
    }

    #[test]
    fn signal_in_span_is_unchanged() {
        let a = [1.0, 1.0, 0.0, 0.0];
        let b = [0.0, 1.0, -1.0, 2.0];
        let s: Vec<f64> = a.iter().zip(&b).map(|(x, y)| 3.0 * x - 0.5 * y).collect();
        let p = project(&s, &[&a, &b], &opts()).unwrap();
        assert_close(&p, &s);
    }

    #[test]
    fn orthogonal_signal_projects_to_zero() {
        let p = project(&[0.0, 0.0, 5.0], &[&[1.0, 0.0, 0.0], &[0.0, 1.0, 0.0]], &opts()).unwrap();
        assert_close(&p, &[0.0, 0.0, 0.0]);
    }

    #[test]
    fn collinear_columns_match_single_column() {
        let s = [0.3, -1.2, 2.5, 0.7];
        let a = [1.0, 2.0, 0.0, -1.0];
        let a2: Vec<f64> = a.iter().map(|v| -4.0 * v).collect();
        let single = project(&s, &[&a], &opts()).unwrap();
        let doubled = project(&s, &[&a, a2.as_slice(), &a], &opts()).unwrap();
        assert_close(&single, &doubled);
    }

    #[test]
    fn column_order_does_not_matter() {
        let s = [0.3, -1.2, 2.5, 0.7, 1.1];
        let a = [1.0, 2.0, 0.0, -1.0, 0.5];
        let b = [0.0, 1.0, 1.0, 3.0, -2.0];
        let ab = project(&s, &[&a, &b], &opts()).unwrap();
        let ba = project(&s, &[&b, &a], &opts()).unwrap();
        assert_close(&ab, &ba);
    }

    #[test]
    fn more_columns_than_samples_spans_everything() {
        let s = [1.5, -0.5];
        let p = project(&s, &[&[1.0, 0.0], &[1.0, 1.0], &[0.0, 2.0]], &opts()).unwrap();
        assert_close(&p, &s);
    }

    #[test]
    fn rcond_drops_nearly_collinear_directions() {
        let s = [1.0, 1.0, 0.0];
        let e1 = [1.0, 0.0, 0.0];
        let tilted = [1.0, 1e-6, 0.0];

        let kept = project(&s, &[&e1, &tilted], &opts()).unwrap();
        for (x, y) in kept.iter().zip(&[1.0, 1.0, 0.0]) {
            assert!((x - y).abs() < 1e-6, "{x} != {y}");
        }

        let coarse = EvaluationOptions {
            rcond: Some(1e-3),
            ..Default::default()
        };
        let dropped = project(&s, &[&e1, &tilted], &coarse).unwrap();
        assert!((dropped[0] - 1.0).abs() < 1e-5);
        assert!(dropped[1].abs() < 1e-5, "{}", dropped[1]);
        assert!(dropped[2].abs() < 1e-12);
    }

    #[test]
    fn column_scale_does_not_change_span() {
        let s = [0.3, -1.2, 2.5, 0.7];
        let a = [1.0, 2.0, 0.0, -1.0];
        let b = [0.0, 1.0, 1.0, 3.0];
        let reference = project(&s, &[&a, &b], &opts()).unwrap();

        let quiet: Vec<f64> = a.iter().map(|v| 1e-9 * v).collect();
        let loud: Vec<f64> = b.iter().map(|v| 1e6 * v).collect();
        let rescaled = project(&s, &[quiet.as_slice(), loud.as_slice()], &opts()).unwrap();
        assert_close(&rescaled, &reference);
    }

    #[test]
    fn tiny_column_next_to_loud_one_is_kept() {
        // 1e-9 vs 1e6 amplitude: far below rcond · σ_max without normalization.
        let s = [1.0, 0.0, 0.0];
        let quiet = [1e-9, 0.0, 0.0];
        let loud = [0.0, 1e6, 0.0];
        let p = project(&s, &[&quiet, &loud], &opts()).unwrap();
        assert_close(&p, &s);
    }

    #[test]
    fn mismatched_column_length_is_an_error() {
        let err = project(&[1.0, 2.0], &[&[1.0, 2.0], &[1.0]], &opts()).unwrap_err();
        assert_eq!(
            err,
            EvalError::Dimension {
                signal: "basis[1]".into(),
                expected: 2,
                actual: 1,
            }
        );
    }
}

//! Dense linear solves for the spline systems.
//!
//! The spline systems are small (one unknown per sieve, so rarely more than
//! ~20) and square. LU handles the regular case; we fall back to SVD with
//! progressively looser tolerances when sieve openings are nearly coincident
//! in log space and the matrix is close to singular.

use nalgebra::{DMatrix, DVector};

/// Solve `a * x = b` for square `a`.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_linear_system(a: &DMatrix<f64>, b: &DVector<f64>) -> Option<DVector<f64>> {
    if let Some(x) = a.clone().lu().solve(b) {
        if x.iter().all(|v| v.is_finite()) {
            return Some(x);
        }
    }

    let svd = a.clone().svd(true, true);
    for &tol in &[1e-12, 1e-10, 1e-8] {
        if let Ok(x) = svd.solve(b, tol) {
            if x.iter().all(|v| v.is_finite()) {
                return Some(x);
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solves_small_tridiagonal_system() {
        // [2 1 0; 1 2 1; 0 1 2] x = [4 8 8]  ->  x = [1 2 3]
        let a = DMatrix::from_row_slice(3, 3, &[2.0, 1.0, 0.0, 1.0, 2.0, 1.0, 0.0, 1.0, 2.0]);
        let b = DVector::from_row_slice(&[4.0, 8.0, 8.0]);

        let x = solve_linear_system(&a, &b).unwrap();
        assert!((x[0] - 1.0).abs() < 1e-12);
        assert!((x[1] - 2.0).abs() < 1e-12);
        assert!((x[2] - 3.0).abs() < 1e-12);
    }
}

//! Normal-equation solver for small linear regressions.
//!
//! The validator refits a linear model at every walk-forward step, so the
//! systems here are tiny (2-3 coefficients, tens to hundreds of rows). We
//! build `(X^T X) beta = X^T y` with an explicit intercept column and solve
//! by Gaussian elimination with partial pivoting.
//!
//! Near-singular systems are not rejected: pivots and divisors are floored
//! at a minimum magnitude (1e-10) so a degenerate design degrades to a
//! harmless solution instead of producing infinities.

use nalgebra::{DMatrix, DVector};

/// Minimum pivot/divisor magnitude substituted before any division.
const PIVOT_FLOOR: f64 = 1e-10;

/// Solve `(X^T X) beta = X^T y` for the design matrix `x` (one row per
/// observation, intercept column included by the caller).
///
/// Returns `None` when shapes are inconsistent or the result is non-finite.
pub fn solve_normal_equations(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    if x.nrows() == 0 || x.nrows() != y.len() {
        return None;
    }
    let xtx = x.transpose() * x;
    let xty = x.transpose() * y;
    let beta = gaussian_eliminate(xtx, xty)?;
    if beta.iter().all(|v| v.is_finite()) {
        Some(beta)
    } else {
        None
    }
}

/// Gaussian elimination with partial pivoting on a square system.
fn gaussian_eliminate(mut a: DMatrix<f64>, mut b: DVector<f64>) -> Option<DVector<f64>> {
    let n = a.nrows();
    if n != a.ncols() || n != b.len() {
        return None;
    }

    for col in 0..n {
        // Partial pivot: swap in the row with the largest magnitude in this column.
        let mut pivot_row = col;
        for row in (col + 1)..n {
            if a[(row, col)].abs() > a[(pivot_row, col)].abs() {
                pivot_row = row;
            }
        }
        if pivot_row != col {
            a.swap_rows(col, pivot_row);
            b.swap_rows(col, pivot_row);
        }

        let pivot = floored(a[(col, col)]);
        for row in (col + 1)..n {
            let factor = a[(row, col)] / pivot;
            for k in col..n {
                a[(row, k)] -= factor * a[(col, k)];
            }
            b[row] -= factor * b[col];
        }
    }

    // Back substitution.
    let mut out = DVector::zeros(n);
    for col in (0..n).rev() {
        let mut acc = b[col];
        for k in (col + 1)..n {
            acc -= a[(col, k)] * out[k];
        }
        out[col] = acc / floored(a[(col, col)]);
    }
    Some(out)
}

/// Substitute a minimum-magnitude value for near-zero divisors.
fn floored(v: f64) -> f64 {
    if v.abs() < PIVOT_FLOOR {
        if v < 0.0 { -PIVOT_FLOOR } else { PIVOT_FLOOR }
    } else {
        v
    }
}

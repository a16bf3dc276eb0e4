//! Linear regression via the normal equations.

use nalgebra::{DMatrix, DVector};

use crate::math::solve_normal_equations;
use crate::models::FittedModel;

/// Fit ordinary least squares with an intercept column.
///
/// Builds `(X^T X) beta = X^T y` and solves by Gaussian elimination with
/// partial pivoting (see `math::solve`). A degenerate design falls back to
/// the zero model rather than failing: the validator treats every fit as
/// one disposable candidate per step.
pub fn fit_linear(xs: &[Vec<f64>], ys: &[f64]) -> FittedModel {
    let n = xs.len().min(ys.len());
    let dims = xs.first().map(|row| row.len()).unwrap_or(0);
    if n == 0 || dims == 0 {
        return FittedModel {
            weights: vec![0.0; dims],
            bias: 0.0,
        };
    }

    // Intercept column first, then the features.
    let mut x = DMatrix::<f64>::zeros(n, dims + 1);
    let mut y = DVector::<f64>::zeros(n);
    for i in 0..n {
        x[(i, 0)] = 1.0;
        for j in 0..dims {
            x[(i, j + 1)] = xs[i][j];
        }
        y[i] = ys[i];
    }

    match solve_normal_equations(&x, &y) {
        Some(beta) => FittedModel {
            weights: (1..=dims).map(|j| beta[j]).collect(),
            bias: beta[0],
        },
        None => FittedModel {
            weights: vec![0.0; dims],
            bias: 0.0,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recovers_exact_linear_relation() {
        let xs: Vec<Vec<f64>> = (0..10).map(|i| vec![i as f64]).collect();
        let ys: Vec<f64> = (0..10).map(|i| 1.5 + 0.5 * i as f64).collect();

        let model = fit_linear(&xs, &ys);
        assert!((model.bias - 1.5).abs() < 1e-8);
        assert!((model.weights[0] - 0.5).abs() < 1e-8);
        assert!((model.predict_value(&[20.0]) - 11.5).abs() < 1e-7);
    }

    #[test]
    fn two_feature_fit() {
        // y = 1 + 2a - 3b.
        let mut xs = Vec::new();
        let mut ys = Vec::new();
        for a in 0..5 {
            for b in 0..5 {
                xs.push(vec![a as f64, b as f64]);
                ys.push(1.0 + 2.0 * a as f64 - 3.0 * b as f64);
            }
        }
        let model = fit_linear(&xs, &ys);
        assert!((model.bias - 1.0).abs() < 1e-7);
        assert!((model.weights[0] - 2.0).abs() < 1e-7);
        assert!((model.weights[1] + 3.0).abs() < 1e-7);
    }

    #[test]
    fn empty_input_yields_zero_model() {
        let model = fit_linear(&[], &[]);
        assert_eq!(model.bias, 0.0);
    }
}

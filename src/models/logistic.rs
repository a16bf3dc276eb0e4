//! Logistic regression via full-batch gradient descent.

use crate::models::FittedModel;

/// Fit a logistic model on the given feature rows and {0, 1} targets.
///
/// Full-batch gradient descent with a fixed iteration count; the linear
/// score is clamped to [-500, 500] before the sigmoid so extreme weights
/// cannot overflow `exp`. Feature rows are expected to be standardized by
/// the caller.
pub fn fit_logistic(
    xs: &[Vec<f64>],
    ys: &[f64],
    iterations: usize,
    learning_rate: f64,
) -> FittedModel {
    let n = xs.len().min(ys.len());
    let dims = xs.first().map(|row| row.len()).unwrap_or(0);
    let mut model = FittedModel {
        weights: vec![0.0; dims],
        bias: 0.0,
    };
    if n == 0 || dims == 0 {
        return model;
    }

    let scale = learning_rate / n as f64;
    let mut grad_w = vec![0.0; dims];

    for _ in 0..iterations {
        grad_w.iter_mut().for_each(|g| *g = 0.0);
        let mut grad_b = 0.0;

        for i in 0..n {
            let err = model.predict_proba(&xs[i]) - ys[i];
            for (g, &x) in grad_w.iter_mut().zip(xs[i].iter()) {
                *g += err * x;
            }
            grad_b += err;
        }

        for (w, g) in model.weights.iter_mut().zip(grad_w.iter()) {
            *w -= scale * g;
        }
        model.bias -= scale * grad_b;
    }

    model
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn separable_data_ranks_correctly() {
        // One feature, cleanly separated classes.
        let xs: Vec<Vec<f64>> = vec![
            vec![-2.0],
            vec![-1.5],
            vec![-1.0],
            vec![1.0],
            vec![1.5],
            vec![2.0],
        ];
        let ys = [0.0, 0.0, 0.0, 1.0, 1.0, 1.0];

        let model = fit_logistic(&xs, &ys, 800, 0.1);
        let p_neg = model.predict_proba(&[-1.5]);
        let p_pos = model.predict_proba(&[1.5]);
        assert!(p_pos > 0.8, "positive side should score high, got {p_pos}");
        assert!(p_neg < 0.2, "negative side should score low, got {p_neg}");
    }

    #[test]
    fn empty_input_yields_neutral_model() {
        let model = fit_logistic(&[], &[], 100, 0.1);
        assert!(model.weights.is_empty());
        assert_eq!(model.bias, 0.0);
    }

    #[test]
    fn fixed_iterations_are_deterministic() {
        let xs: Vec<Vec<f64>> = (0..20).map(|i| vec![i as f64 / 10.0 - 1.0]).collect();
        let ys: Vec<f64> = (0..20).map(|i| if i >= 10 { 1.0 } else { 0.0 }).collect();
        let a = fit_logistic(&xs, &ys, 500, 0.1);
        let b = fit_logistic(&xs, &ys, 500, 0.1);
        assert_eq!(a, b);
    }
}

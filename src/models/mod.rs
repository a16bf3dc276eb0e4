//! Regression models consumed by the walk-forward validator.
//!
//! Both models are stateless fits: a fresh [`FittedModel`] is produced for
//! every walk-forward step, used for one prediction, and discarded.

pub mod linear;
pub mod logistic;

pub use linear::fit_linear;
pub use logistic::fit_logistic;

use serde::{Deserialize, Serialize};

/// Coefficients and intercept for one walk-forward step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedModel {
    pub weights: Vec<f64>,
    pub bias: f64,
}

impl FittedModel {
    /// Linear score `w . x + b`.
    pub fn linear_score(&self, features: &[f64]) -> f64 {
        let dot: f64 = self
            .weights
            .iter()
            .zip(features.iter())
            .map(|(w, x)| w * x)
            .sum();
        dot + self.bias
    }

    /// Sigmoid of the linear score, clamped to avoid `exp` overflow.
    pub fn predict_proba(&self, features: &[f64]) -> f64 {
        let z = self.linear_score(features).clamp(-500.0, 500.0);
        1.0 / (1.0 + (-z).exp())
    }

    /// Raw linear prediction (regression).
    pub fn predict_value(&self, features: &[f64]) -> f64 {
        self.linear_score(features)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predict_proba_is_bounded_for_extreme_scores() {
        let model = FittedModel {
            weights: vec![1e6],
            bias: 0.0,
        };
        let hi = model.predict_proba(&[1e6]);
        let lo = model.predict_proba(&[-1e6]);
        assert!(hi > 0.999 && hi <= 1.0);
        assert!(lo < 0.001 && lo >= 0.0);
    }
}

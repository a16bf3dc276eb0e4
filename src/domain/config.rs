//! Component configuration with documented defaults.
//!
//! Every knob lives in an explicit struct validated at construction time:
//! out-of-range values are rejected with a descriptive error before any
//! computation starts, never mid-loop.

use serde::{Deserialize, Serialize};

use crate::domain::types::RiskStatus;
use crate::error::EngineError;

/// Formula weights for the composite indicator.
///
/// `score = (thrust * efficiency^2) / max(slack + drag, epsilon)^eta` with
/// `thrust = tanh(w_growth*dG + w_money*dA - w_rate*dr)` and
/// `drag = w_spread*yield_penalty + w_real*real_rate + w_vol*volatility`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorWeights {
    /// Weight on year-over-year investment growth.
    pub w_growth: f64,
    /// Weight on year-over-year money-supply growth.
    pub w_money: f64,
    /// Weight on the period-over-period policy-rate change.
    pub w_rate: f64,
    /// Efficiency uplift multiplier.
    pub mult: f64,
    /// Weight on the yield-inversion penalty.
    pub w_spread: f64,
    /// Weight on the positive real rate.
    pub w_real: f64,
    /// Weight on trailing rate volatility.
    pub w_vol: f64,
    /// Denominator exponent.
    pub eta: f64,
    /// Denominator floor applied before exponentiation.
    pub epsilon: f64,
}

impl Default for IndicatorWeights {
    fn default() -> Self {
        Self {
            w_growth: 1.0,
            w_money: 1.0,
            w_rate: 0.7,
            mult: 1.15,
            w_spread: 1.0,
            w_real: 1.0,
            w_vol: 1.0,
            eta: 1.5,
            epsilon: 0.001,
        }
    }
}

/// Names of the tunable parameters, in sweep order.
///
/// `epsilon` is a numeric guard rather than a tunable and is excluded.
pub const WEIGHT_PARAMS: [&str; 8] = [
    "w_growth", "w_money", "w_rate", "mult", "w_spread", "w_real", "w_vol", "eta",
];

impl IndicatorWeights {
    pub fn validate(&self) -> Result<(), EngineError> {
        for (name, v) in WEIGHT_PARAMS.iter().zip(self.params()) {
            if !v.is_finite() || v < 0.0 {
                return Err(EngineError::invalid_config(format!(
                    "Indicator weight '{name}' must be finite and >= 0 (got {v})."
                )));
            }
        }
        if self.eta <= 0.0 {
            return Err(EngineError::invalid_config(format!(
                "Denominator exponent eta must be > 0 (got {}).",
                self.eta
            )));
        }
        if !(self.epsilon.is_finite() && self.epsilon > 0.0) {
            return Err(EngineError::invalid_config(format!(
                "Denominator floor epsilon must be > 0 (got {}).",
                self.epsilon
            )));
        }
        Ok(())
    }

    /// Tunable parameter values in `WEIGHT_PARAMS` order.
    pub fn params(&self) -> [f64; 8] {
        [
            self.w_growth,
            self.w_money,
            self.w_rate,
            self.mult,
            self.w_spread,
            self.w_real,
            self.w_vol,
            self.eta,
        ]
    }

    /// Copy with the parameter at `idx` (in `WEIGHT_PARAMS` order) replaced.
    pub fn with_param(&self, idx: usize, value: f64) -> Self {
        let mut out = self.clone();
        match idx {
            0 => out.w_growth = value,
            1 => out.w_money = value,
            2 => out.w_rate = value,
            3 => out.mult = value,
            4 => out.w_spread = value,
            5 => out.w_real = value,
            6 => out.w_vol = value,
            7 => out.eta = value,
            _ => {}
        }
        out
    }

    /// Copy with every tunable parameter scaled by the matching factor.
    pub fn scaled(&self, factors: &[f64; 8]) -> Self {
        let mut out = self.clone();
        for (idx, f) in factors.iter().enumerate() {
            out = out.with_param(idx, out.params()[idx] * f);
        }
        out
    }
}

/// Continuous threshold classification of a score.
///
/// One of two score-to-status mappings carried by the engine; the other is
/// [`BucketPolicy`]. They are deliberately independent configurations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdPolicy {
    /// At or below: contraction.
    pub crisis: f64,
    /// Below: elevated risk.
    pub elevated: f64,
    /// Below: caution; at or above: healthy.
    pub caution: f64,
}

impl Default for ThresholdPolicy {
    fn default() -> Self {
        Self {
            crisis: 0.0,
            elevated: 0.015,
            caution: 0.035,
        }
    }
}

impl ThresholdPolicy {
    pub fn validate(&self) -> Result<(), EngineError> {
        if !(self.crisis <= self.elevated && self.elevated <= self.caution) {
            return Err(EngineError::invalid_config(format!(
                "Threshold policy must be ordered crisis <= elevated <= caution (got {}, {}, {}).",
                self.crisis, self.elevated, self.caution
            )));
        }
        Ok(())
    }

    pub fn classify(&self, score: f64) -> RiskStatus {
        if score <= self.crisis {
            RiskStatus::Contraction
        } else if score < self.elevated {
            RiskStatus::Elevated
        } else if score < self.caution {
            RiskStatus::Caution
        } else {
            RiskStatus::Healthy
        }
    }
}

/// Coarse four-bucket score-to-probability lookup.
///
/// Kept as a separate policy from [`ThresholdPolicy`] because the two
/// mappings are used by different consumers and are not reconciled upstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketPolicy {
    pub thresholds: ThresholdPolicy,
    /// Recession probability per bucket: contraction, elevated, caution, healthy.
    pub probabilities: [f64; 4],
}

impl Default for BucketPolicy {
    fn default() -> Self {
        Self {
            thresholds: ThresholdPolicy::default(),
            probabilities: [0.85, 0.55, 0.30, 0.10],
        }
    }
}

impl BucketPolicy {
    pub fn validate(&self) -> Result<(), EngineError> {
        self.thresholds.validate()?;
        for p in self.probabilities {
            if !(0.0..=1.0).contains(&p) {
                return Err(EngineError::invalid_config(format!(
                    "Bucket probability {p} is outside [0, 1]."
                )));
            }
        }
        Ok(())
    }

    pub fn classify(&self, score: f64) -> (RiskStatus, f64) {
        let status = self.thresholds.classify(score);
        let prob = match status {
            RiskStatus::Contraction => self.probabilities[0],
            RiskStatus::Elevated => self.probabilities[1],
            RiskStatus::Caution => self.probabilities[2],
            RiskStatus::Healthy => self.probabilities[3],
        };
        (status, prob)
    }
}

/// Whether the walk-forward target is a binary label or a continuous value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    /// Targets in {0, 1}; variants scored by AUC-ROC.
    Classification,
    /// Continuous targets; variants scored by RMSE.
    Regression,
}

/// Walk-forward validator options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalkForwardConfig {
    pub target: TargetKind,
    /// Rolling-mean window applied to the indicator feature (1 = no smoothing).
    pub smoothing_window: usize,
    /// Months the features lead the target.
    pub lag: usize,
    /// Minimum valid samples after filtering; fewer is a fatal error.
    pub min_samples: usize,
    /// Fraction of the sample count used as the initial training prefix.
    pub start_fraction: f64,
    /// Gradient-descent iterations for the logistic fits.
    pub logistic_iterations: usize,
    /// Gradient-descent learning rate.
    pub learning_rate: f64,
}

impl Default for WalkForwardConfig {
    fn default() -> Self {
        Self {
            target: TargetKind::Classification,
            smoothing_window: 3,
            lag: 1,
            min_samples: 50,
            start_fraction: 0.2,
            logistic_iterations: 800,
            learning_rate: 0.1,
        }
    }
}

impl WalkForwardConfig {
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.smoothing_window == 0 {
            return Err(EngineError::invalid_config(
                "Smoothing window must be >= 1.",
            ));
        }
        if !(self.start_fraction > 0.0 && self.start_fraction < 1.0) {
            return Err(EngineError::invalid_config(format!(
                "Start fraction must be in (0, 1) (got {}).",
                self.start_fraction
            )));
        }
        if self.logistic_iterations == 0 {
            return Err(EngineError::invalid_config(
                "Logistic iteration count must be >= 1.",
            ));
        }
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(EngineError::invalid_config(format!(
                "Learning rate must be > 0 (got {}).",
                self.learning_rate
            )));
        }
        if self.min_samples < 2 {
            return Err(EngineError::invalid_config(
                "Minimum sample count must be >= 2.",
            ));
        }
        Ok(())
    }
}

/// Score thresholds for the Monte Carlo outcome probabilities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeThresholds {
    /// Terminal score below this counts toward the crisis probability.
    pub crisis: f64,
    pub contraction: f64,
    pub slowdown: f64,
}

impl Default for OutcomeThresholds {
    fn default() -> Self {
        Self {
            crisis: 0.0,
            contraction: 0.015,
            slowdown: 0.035,
        }
    }
}

impl OutcomeThresholds {
    pub fn validate(&self) -> Result<(), EngineError> {
        if !(self.crisis <= self.contraction && self.contraction <= self.slowdown) {
            return Err(EngineError::invalid_config(format!(
                "Outcome thresholds must be ordered crisis <= contraction <= slowdown (got {}, {}, {}).",
                self.crisis, self.contraction, self.slowdown
            )));
        }
        Ok(())
    }
}

/// Monte Carlo simulator options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonteCarloConfig {
    pub iterations: usize,
    /// Multiplicative input perturbation half-width: each numeric field is
    /// scaled by a factor drawn from `U[1 - p, 1 + p]`.
    pub input_perturbation: f64,
    /// Multiplicative weight perturbation half-width.
    pub weight_perturbation: f64,
    /// Capacity utilization is perturbed at only this fraction of
    /// `input_perturbation`. Inherited behavior with no stated rationale;
    /// kept explicit here pending review rather than silently removed.
    pub capacity_dampening: f64,
    /// Thresholds for the below-threshold outcome probabilities
    /// (crisis / contraction / slowdown).
    pub thresholds: OutcomeThresholds,
    /// Seed for the perturbation stream; a fixed seed reproduces the
    /// distribution bit-for-bit.
    pub seed: u64,
}

impl Default for MonteCarloConfig {
    fn default() -> Self {
        Self {
            iterations: 1000,
            input_perturbation: 0.10,
            weight_perturbation: 0.10,
            capacity_dampening: 0.10,
            thresholds: OutcomeThresholds::default(),
            seed: 0,
        }
    }
}

impl MonteCarloConfig {
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.iterations == 0 {
            return Err(EngineError::invalid_config(
                "Monte Carlo iteration count must be >= 1.",
            ));
        }
        for (name, v) in [
            ("input_perturbation", self.input_perturbation),
            ("weight_perturbation", self.weight_perturbation),
            ("capacity_dampening", self.capacity_dampening),
        ] {
            if !(v.is_finite() && (0.0..1.0).contains(&v)) {
                return Err(EngineError::invalid_config(format!(
                    "Monte Carlo {name} must be in [0, 1) (got {v})."
                )));
            }
        }
        self.thresholds.validate()
    }
}

/// Tornado sweep options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityConfig {
    /// Symmetric perturbation applied to each parameter (0.2 = +/-20%).
    pub perturbation: f64,
}

impl Default for SensitivityConfig {
    fn default() -> Self {
        Self { perturbation: 0.20 }
    }
}

impl SensitivityConfig {
    pub fn validate(&self) -> Result<(), EngineError> {
        if !(self.perturbation.is_finite() && self.perturbation > 0.0 && self.perturbation < 1.0) {
            return Err(EngineError::invalid_config(format!(
                "Sensitivity perturbation must be in (0, 1) (got {}).",
                self.perturbation
            )));
        }
        Ok(())
    }
}

/// Forecast and risk-heatmap options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastConfig {
    /// Multiplier on average score in the effective rate.
    pub alpha: f64,
    /// Multiplier on average drag in the effective rate.
    pub beta: f64,
    /// Drag gain in the logistic tipping function.
    pub gamma: f64,
    /// Offset in the logistic tipping function.
    pub theta: f64,
    /// Forecast horizons in years.
    pub horizons: Vec<f64>,
    /// Trailing months averaged into the effective rate and drag.
    pub lookback_months: usize,
    /// Samples drawn per horizon for the percentile bands.
    pub band_samples: usize,
    /// Shock grid (standard-deviation units) applied to thrust and drag.
    pub shock_grid: Vec<f64>,
    /// Seed for band sampling.
    pub seed: u64,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            alpha: 1.0,
            beta: 0.5,
            gamma: 10.0,
            theta: 3.0,
            horizons: vec![1.0, 2.0, 3.0, 5.0, 10.0],
            lookback_months: 24,
            band_samples: 500,
            shock_grid: vec![-2.0, -1.0, 0.0, 1.0, 2.0],
            seed: 0,
        }
    }
}

impl ForecastConfig {
    pub fn validate(&self) -> Result<(), EngineError> {
        for (name, v) in [
            ("alpha", self.alpha),
            ("beta", self.beta),
            ("gamma", self.gamma),
            ("theta", self.theta),
        ] {
            if !v.is_finite() {
                return Err(EngineError::invalid_config(format!(
                    "Forecast {name} must be finite (got {v})."
                )));
            }
        }
        if self.horizons.is_empty() {
            return Err(EngineError::invalid_config(
                "Forecast horizons must not be empty.",
            ));
        }
        if self.horizons.iter().any(|h| !h.is_finite() || *h <= 0.0) {
            return Err(EngineError::invalid_config(
                "Forecast horizons must be finite and > 0.",
            ));
        }
        if self.lookback_months < 2 {
            return Err(EngineError::invalid_config(
                "Forecast lookback must be >= 2 months.",
            ));
        }
        if self.band_samples < 2 {
            return Err(EngineError::invalid_config(
                "Forecast band sample count must be >= 2.",
            ));
        }
        if self.shock_grid.is_empty() {
            return Err(EngineError::invalid_config(
                "Shock grid must not be empty.",
            ));
        }
        Ok(())
    }
}

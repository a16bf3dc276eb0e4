//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during computation
//! - exported to JSON/CSV by the embedding application
//! - reloaded later for comparisons

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One aligned monthly time point.
///
/// Every numeric field is optional: the upstream retrieval collaborator maps
/// its missing-value sentinel to `None`, and each consumer decides whether an
/// absent field means "skip the period" or "null feature". Records are never
/// mutated after alignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodRecord {
    pub date: NaiveDate,
    /// Gross private investment (quarterly, forward-filled).
    pub investment: Option<f64>,
    /// Broad money supply level.
    pub money_supply: Option<f64>,
    /// Policy rate, percent.
    pub policy_rate: Option<f64>,
    /// Output / GDP (quarterly, forward-filled).
    pub output: Option<f64>,
    /// Capacity utilization, percent of capacity.
    pub capacity_utilization: Option<f64>,
    /// 10y-3m (or similar) yield spread, percent.
    pub yield_spread: Option<f64>,
    /// Consumer price index level.
    pub price_index: Option<f64>,
}

impl PeriodRecord {
    /// An empty record at the given date (all fields absent).
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            investment: None,
            money_supply: None,
            policy_rate: None,
            output: None,
            capacity_utilization: None,
            yield_spread: None,
            price_index: None,
        }
    }
}

/// Derived indicator components for a single period.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndicatorComponents {
    /// Bounded (tanh) composite of investment growth, money growth, and rate drag.
    pub thrust: f64,
    /// Investment-to-output ratio with the uplift multiplier applied.
    pub efficiency: f64,
    /// Unused productive capacity, `1 - utilization/100`.
    pub slack: f64,
    /// Yield-curve inversion penalty (zero when the curve is not inverted).
    pub yield_penalty: f64,
    /// Positive real policy rate, floored at zero.
    pub real_rate: f64,
    /// Trailing 12-month policy-rate volatility (std dev / 100).
    pub volatility: f64,
    /// Weighted sum of the three drag sub-terms.
    pub drag: f64,
}

/// Discrete health classification of a composite score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskStatus {
    /// Score at or below zero: contraction / crisis territory.
    Contraction,
    /// Elevated recession risk.
    Elevated,
    /// Caution: weakening but not yet elevated.
    Caution,
    Healthy,
}

impl RiskStatus {
    /// Human-readable label for summaries and exports.
    pub fn display_name(self) -> &'static str {
        match self {
            RiskStatus::Contraction => "contraction",
            RiskStatus::Elevated => "elevated",
            RiskStatus::Caution => "caution",
            RiskStatus::Healthy => "healthy",
        }
    }
}

/// Indicator output for one period: components, composite score, and both
/// classification policies applied (continuous thresholds and the coarse
/// bucket lookup).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorResult {
    pub date: NaiveDate,
    pub components: IndicatorComponents,
    /// Composite score: `(thrust * efficiency^2) / max(slack + drag, eps)^eta`.
    pub score: f64,
    /// Continuous threshold classification.
    pub status: RiskStatus,
    /// Coarse bucket classification (may disagree with `status` by design).
    pub bucket_status: RiskStatus,
    /// Bucket-policy recession probability for this period.
    pub bucket_probability: f64,
}

/// One observation for walk-forward validation.
///
/// Invariant: for step `i`, the training set is exactly the samples with
/// index `< i` (strict prefix, no look-ahead).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalkForwardSample {
    pub date: NaiveDate,
    /// Derived indicator feature (optionally smoothed).
    pub indicator: f64,
    /// External baseline feature (e.g. yield spread).
    pub baseline: f64,
    /// Binary label (classification) or continuous value (regression).
    pub target: f64,
}

/// Model variant fit at each walk-forward step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    Baseline,
    Indicator,
    Hybrid,
}

impl Variant {
    pub fn display_name(self) -> &'static str {
        match self {
            Variant::Baseline => "baseline",
            Variant::Indicator => "indicator",
            Variant::Hybrid => "hybrid",
        }
    }
}

/// Out-of-sample sequences and the scalar score for one model variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantOutcome {
    /// AUC (classification, higher is better) or RMSE (regression, lower is better).
    pub score: f64,
    pub predictions: Vec<f64>,
    pub actuals: Vec<f64>,
    pub dates: Vec<NaiveDate>,
}

/// Full walk-forward validation output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// True when scores are AUC, false when RMSE.
    pub classification: bool,
    pub baseline: VariantOutcome,
    pub indicator: VariantOutcome,
    pub hybrid: VariantOutcome,
    pub winner: Variant,
    /// Steps that produced a prediction.
    pub steps_used: usize,
    /// Steps skipped (e.g. single-class training prefix).
    pub steps_skipped: usize,
}

impl ValidationResult {
    pub fn outcome(&self, variant: Variant) -> &VariantOutcome {
        match variant {
            Variant::Baseline => &self.baseline,
            Variant::Indicator => &self.indicator,
            Variant::Hybrid => &self.hybrid,
        }
    }
}

/// Distribution of final-period scores across Monte Carlo iterations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonteCarloDistribution {
    /// Terminal scores, sorted ascending.
    pub scores: Vec<f64>,
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
    pub p5: f64,
    pub p95: f64,
    pub min: f64,
    pub max: f64,
    /// Fraction of iterations below the crisis threshold.
    pub prob_crisis: f64,
    /// Fraction of iterations below the contraction threshold.
    pub prob_contraction: f64,
    /// Fraction of iterations below the slowdown threshold.
    pub prob_slowdown: f64,
}

/// One row of the tornado ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityEntry {
    pub parameter: String,
    /// Percent change in the final score when the parameter is scaled down.
    pub low_impact_pct: f64,
    /// Percent change in the final score when the parameter is scaled up.
    pub high_impact_pct: f64,
    /// Mean of the two absolute impacts; the ranking key.
    pub mean_abs_impact_pct: f64,
}

/// Second-order trend of the indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Accelerating,
    Decelerating,
    Stable,
}

impl Trend {
    pub fn display_name(self) -> &'static str {
        match self {
            Trend::Accelerating => "accelerating",
            Trend::Decelerating => "decelerating",
            Trend::Stable => "stable",
        }
    }
}

/// Display tier derived from collapse probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    Critical,
    High,
    Elevated,
    Moderate,
    Low,
}

impl RiskTier {
    /// Tier thresholds on collapse probability.
    pub fn from_collapse_probability(rho: f64) -> Self {
        if rho >= 0.75 {
            RiskTier::Critical
        } else if rho >= 0.5 {
            RiskTier::High
        } else if rho >= 0.25 {
            RiskTier::Elevated
        } else if rho >= 0.1 {
            RiskTier::Moderate
        } else {
            RiskTier::Low
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            RiskTier::Critical => "critical",
            RiskTier::High => "high",
            RiskTier::Elevated => "elevated",
            RiskTier::Moderate => "moderate",
            RiskTier::Low => "low",
        }
    }
}

/// Projection for one forecast horizon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPath {
    pub horizon_years: f64,
    /// Central compounding projection `V0 * e^(r*h) * (1 - rho)`.
    pub central: f64,
    pub p5: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub p95: f64,
    pub collapse_probability: f64,
    pub tier: RiskTier,
}

/// Full forecast output: current state, trend, and per-horizon paths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastReport {
    pub current_score: f64,
    pub previous_score: f64,
    pub trend: Trend,
    /// Effective compounding rate `alpha * avg_score - beta * avg_drag`.
    pub effective_rate: f64,
    pub avg_score: f64,
    pub avg_drag: f64,
    pub collapse_probability: f64,
    pub paths: Vec<ForecastPath>,
}

/// One cell of the shock-grid risk heatmap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskHeatmapCell {
    /// Thrust shock in standard-deviation units.
    pub thrust_shock: f64,
    /// Drag shock in standard-deviation units.
    pub drag_shock: f64,
    pub horizon_years: f64,
    pub projected_value: f64,
    pub collapse_probability: f64,
    pub tier: RiskTier,
}

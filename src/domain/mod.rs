//! Shared domain types and configuration.

pub mod config;
pub mod types;

pub use config::{
    BucketPolicy, ForecastConfig, IndicatorWeights, MonteCarloConfig, OutcomeThresholds,
    SensitivityConfig, TargetKind, ThresholdPolicy, WalkForwardConfig,
};
pub use types::{
    ForecastPath, ForecastReport, IndicatorComponents, IndicatorResult, MonteCarloDistribution,
    PeriodRecord, RiskHeatmapCell, RiskStatus, RiskTier, SensitivityEntry, Trend,
    ValidationResult, Variant, VariantOutcome, WalkForwardSample,
};

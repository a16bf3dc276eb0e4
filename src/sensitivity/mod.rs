//! Deterministic per-parameter sensitivity ("tornado") analysis.
//!
//! Each tunable weight parameter is perturbed by +/-p% in isolation, the
//! indicator is recomputed over the full series, and the percentage change
//! in the final-period score is recorded. No randomness anywhere: identical
//! data and perturbation always rank identically.

use crate::domain::{IndicatorWeights, PeriodRecord, SensitivityConfig, SensitivityEntry};
use crate::domain::config::WEIGHT_PARAMS;
use crate::error::EngineError;
use crate::indicator::final_score;

/// Run the one-at-a-time sweep and rank parameters by mean absolute impact.
pub fn analyze(
    records: &[PeriodRecord],
    weights: &IndicatorWeights,
    config: &SensitivityConfig,
) -> Result<Vec<SensitivityEntry>, EngineError> {
    weights.validate()?;
    config.validate()?;

    let base = final_score(records, weights)?;
    // Impacts are relative to the baseline score; a near-zero baseline would
    // explode the percentages, so floor the reference magnitude.
    let reference = base.abs().max(1e-9);

    let mut entries = Vec::with_capacity(WEIGHT_PARAMS.len());
    for (idx, name) in WEIGHT_PARAMS.iter().enumerate() {
        let value = weights.params()[idx];

        let low_score = final_score(
            records,
            &weights.with_param(idx, value * (1.0 - config.perturbation)),
        )?;
        let high_score = final_score(
            records,
            &weights.with_param(idx, value * (1.0 + config.perturbation)),
        )?;

        let low_impact_pct = 100.0 * (low_score - base) / reference;
        let high_impact_pct = 100.0 * (high_score - base) / reference;
        entries.push(SensitivityEntry {
            parameter: (*name).to_string(),
            low_impact_pct,
            high_impact_pct,
            mean_abs_impact_pct: (low_impact_pct.abs() + high_impact_pct.abs()) / 2.0,
        });
    }

    // Stable sort: equal impacts keep the fixed parameter order, so the
    // ranking is bit-for-bit reproducible.
    entries.sort_by(|a, b| {
        b.mean_abs_impact_pct
            .partial_cmp(&a.mean_abs_impact_pct)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    Ok(entries)
}

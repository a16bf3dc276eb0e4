//! The composite indicator formula pipeline.
//!
//! `compute` is the single canonical, weight-parameterized implementation of
//! the indicator. Every consumer (validator, Monte Carlo, sensitivity,
//! forecast) delegates to it; there are no per-call-site copies of the
//! formula to drift apart.
//!
//! Components per period:
//!
//! ```text
//! thrust        = tanh(w_growth*dG + w_money*dA - w_rate*dr)
//! efficiency    = investment * mult / output
//! slack         = 1 - capacity_utilization/100
//! yield_penalty = |yield_spread/100| if inverted else 0
//! real_rate     = max(0, policy_rate/100 - yoy inflation)
//! volatility    = stddev(trailing 12 policy rates) / 100
//! drag          = w_spread*yield_penalty + w_real*real_rate + w_vol*volatility
//! score         = thrust * efficiency^2 / max(slack + drag, eps)^eta
//! ```
//!
//! The denominator is floored at `eps` before exponentiation, so it is always
//! `>= eps^eta > 0` regardless of inputs.

use crate::domain::{
    BucketPolicy, IndicatorComponents, IndicatorResult, IndicatorWeights, PeriodRecord,
    ThresholdPolicy,
};
use crate::error::EngineError;
use crate::math::std_dev;

/// Months of history needed for year-over-year terms.
pub const MIN_PERIODS: usize = 13;

/// Trailing policy-rate window feeding the volatility component.
pub const VOLATILITY_WINDOW: usize = 12;

/// Compute the indicator components and score for one period.
///
/// Returns `None` when a required field is missing from the period, its
/// year-ago counterpart, or the previous period; the caller skips the period
/// entirely rather than zero-filling. A missing yield spread is not a skip:
/// an unobserved spread contributes no inversion penalty.
pub fn compute(
    record: &PeriodRecord,
    year_ago: &PeriodRecord,
    prev: &PeriodRecord,
    trailing_rates: &[f64],
    weights: &IndicatorWeights,
) -> Option<(IndicatorComponents, f64)> {
    let investment = record.investment?;
    let money_supply = record.money_supply?;
    let policy_rate = record.policy_rate?;
    let output = record.output?;
    let capacity = record.capacity_utilization?;
    let price_index = record.price_index?;

    let investment_ya = year_ago.investment?;
    let money_supply_ya = year_ago.money_supply?;
    let price_index_ya = year_ago.price_index?;
    let prev_rate = prev.policy_rate?;

    // Growth denominators must be usable; a zero base makes the YoY rate
    // meaningless, so the period is skipped like a missing field.
    if investment_ya.abs() < 1e-9
        || money_supply_ya.abs() < 1e-9
        || price_index_ya.abs() < 1e-9
        || output.abs() < 1e-9
    {
        return None;
    }

    let d_growth = (investment - investment_ya) / investment_ya;
    let d_money = (money_supply - money_supply_ya) / money_supply_ya;
    // Rates are quoted in percent; the thrust term wants the decimal change.
    let d_rate = (policy_rate - prev_rate) / 100.0;

    let thrust =
        (weights.w_growth * d_growth + weights.w_money * d_money - weights.w_rate * d_rate).tanh();
    let efficiency = investment * weights.mult / output;
    let slack = 1.0 - capacity / 100.0;

    let spread = record.yield_spread.unwrap_or(0.0);
    let yield_penalty = if spread < 0.0 { (spread / 100.0).abs() } else { 0.0 };

    let inflation = (price_index - price_index_ya) / price_index_ya;
    let real_rate = (policy_rate / 100.0 - inflation).max(0.0);

    let volatility = std_dev(trailing_rates) / 100.0;

    let drag = weights.w_spread * yield_penalty
        + weights.w_real * real_rate
        + weights.w_vol * volatility;

    let denominator = (slack + drag).max(weights.epsilon).powf(weights.eta);
    let score = thrust * efficiency * efficiency / denominator;

    if !score.is_finite() {
        return None;
    }

    Some((
        IndicatorComponents {
            thrust,
            efficiency,
            slack,
            yield_penalty,
            real_rate,
            volatility,
            drag,
        },
        score,
    ))
}

/// Run the indicator over a full aligned series.
///
/// Requires at least [`MIN_PERIODS`] records; periods with missing required
/// fields are skipped silently. Both classification policies are applied to
/// every computed period.
pub fn compute_series(
    records: &[PeriodRecord],
    weights: &IndicatorWeights,
    thresholds: &ThresholdPolicy,
    buckets: &BucketPolicy,
) -> Result<Vec<IndicatorResult>, EngineError> {
    weights.validate()?;
    thresholds.validate()?;
    buckets.validate()?;

    if records.len() < MIN_PERIODS {
        return Err(EngineError::insufficient_data(format!(
            "Need at least {MIN_PERIODS} aligned periods for year-over-year math, got {}.",
            records.len()
        )));
    }

    let mut out = Vec::with_capacity(records.len() - MIN_PERIODS + 1);
    for i in (MIN_PERIODS - 1)..records.len() {
        let record = &records[i];
        let year_ago = &records[i - 12];
        let prev = &records[i - 1];

        let window_start = (i + 1).saturating_sub(VOLATILITY_WINDOW);
        let trailing_rates: Vec<f64> = records[window_start..=i]
            .iter()
            .filter_map(|r| r.policy_rate)
            .collect();

        if let Some((components, score)) = compute(record, year_ago, prev, &trailing_rates, weights)
        {
            let status = thresholds.classify(score);
            let (bucket_status, bucket_probability) = buckets.classify(score);
            out.push(IndicatorResult {
                date: record.date,
                components,
                score,
                status,
                bucket_status,
                bucket_probability,
            });
        }
    }

    Ok(out)
}

/// Convenience used by the perturbation engines: the score of the most
/// recent computable period under the given weights.
pub fn final_score(records: &[PeriodRecord], weights: &IndicatorWeights) -> Result<f64, EngineError> {
    let thresholds = ThresholdPolicy::default();
    let buckets = BucketPolicy::default();
    let results = compute_series(records, weights, &thresholds, &buckets)?;
    results.last().map(|r| r.score).ok_or_else(|| {
        EngineError::insufficient_data("No computable periods (all skipped for missing fields).")
    })
}

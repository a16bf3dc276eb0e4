//! Walk-forward sample construction.
//!
//! A sample pairs the (optionally smoothed) indicator feature and the
//! external baseline feature at month `t` with the target at month
//! `t + lag`. Months missing any of the three values are excluded; the
//! harness never sees a null feature.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};

use crate::data::SeriesObservation;
use crate::domain::{IndicatorResult, WalkForwardConfig, WalkForwardSample};
use crate::math::rolling_mean;

/// Join indicator results, baseline observations, and targets into samples.
///
/// `baseline` and `targets` are keyed by month; the sample date is the
/// feature month. Output order follows the indicator results.
pub fn build_samples(
    results: &[IndicatorResult],
    baseline: &[SeriesObservation],
    targets: &[SeriesObservation],
    config: &WalkForwardConfig,
) -> Vec<WalkForwardSample> {
    let scores: Vec<f64> = results.iter().map(|r| r.score).collect();
    let smoothed: Vec<f64> = rolling_mean(&scores, config.smoothing_window).collect();

    let baseline_map = month_map(baseline);
    let target_map = month_map(targets);

    let mut out = Vec::new();
    for (i, result) in results.iter().enumerate() {
        let indicator = smoothed[i];
        if !indicator.is_finite() {
            continue;
        }
        let Some(&base) = baseline_map.get(&month_floor(result.date)) else {
            continue;
        };
        let target_month = add_months(month_floor(result.date), config.lag as u32);
        let Some(&target) = target_map.get(&target_month) else {
            continue;
        };
        if !base.is_finite() || !target.is_finite() {
            continue;
        }
        out.push(WalkForwardSample {
            date: result.date,
            indicator,
            baseline: base,
            target,
        });
    }
    out
}

fn month_map(observations: &[SeriesObservation]) -> BTreeMap<NaiveDate, f64> {
    let mut out = BTreeMap::new();
    for obs in observations {
        if let Some(v) = obs.value {
            if v.is_finite() {
                out.insert(month_floor(obs.date), v);
            }
        }
    }
    out
}

fn month_floor(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap_or(date)
}

fn add_months(start: NaiveDate, months: u32) -> NaiveDate {
    let total = start.year() as u32 * 12 + start.month0() + months;
    NaiveDate::from_ymd_opt((total / 12) as i32, total % 12 + 1, 1).unwrap_or(start)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{IndicatorComponents, RiskStatus};

    fn d(y: i32, m: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, 1).unwrap()
    }

    fn result_at(y: i32, m: u32, score: f64) -> IndicatorResult {
        IndicatorResult {
            date: d(y, m),
            components: IndicatorComponents {
                thrust: 0.0,
                efficiency: 0.0,
                slack: 0.0,
                yield_penalty: 0.0,
                real_rate: 0.0,
                volatility: 0.0,
                drag: 0.0,
            },
            score,
            status: RiskStatus::Healthy,
            bucket_status: RiskStatus::Healthy,
            bucket_probability: 0.1,
        }
    }

    fn obs(y: i32, m: u32, v: f64) -> SeriesObservation {
        SeriesObservation::new(d(y, m), Some(v))
    }

    #[test]
    fn lag_shifts_target_forward() {
        let results = vec![result_at(2024, 1, 0.02), result_at(2024, 2, 0.03)];
        let baseline = vec![obs(2024, 1, 1.0), obs(2024, 2, 1.1)];
        let targets = vec![obs(2024, 2, 1.0), obs(2024, 3, 0.0)];
        let config = WalkForwardConfig {
            smoothing_window: 1,
            lag: 1,
            ..Default::default()
        };

        let samples = build_samples(&results, &baseline, &targets, &config);
        assert_eq!(samples.len(), 2);
        // Feature month January pairs with the February target.
        assert_eq!(samples[0].date, d(2024, 1));
        assert_eq!(samples[0].target, 1.0);
        assert_eq!(samples[1].target, 0.0);
    }

    #[test]
    fn smoothing_drops_warmup_months() {
        let results = vec![
            result_at(2024, 1, 0.01),
            result_at(2024, 2, 0.02),
            result_at(2024, 3, 0.03),
        ];
        let baseline: Vec<_> = (1..=3).map(|m| obs(2024, m, 1.0)).collect();
        let targets: Vec<_> = (1..=3).map(|m| obs(2024, m, 0.0)).collect();
        let config = WalkForwardConfig {
            smoothing_window: 3,
            lag: 0,
            ..Default::default()
        };

        let samples = build_samples(&results, &baseline, &targets, &config);
        // Only March has a full smoothing window.
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].date, d(2024, 3));
        assert!((samples[0].indicator - 0.02).abs() < 1e-12);
    }

    #[test]
    fn missing_baseline_or_target_excludes_sample() {
        let results = vec![result_at(2024, 1, 0.01), result_at(2024, 2, 0.02)];
        let baseline = vec![obs(2024, 1, 1.0)];
        let targets = vec![obs(2024, 1, 0.0), obs(2024, 2, 1.0)];
        let config = WalkForwardConfig {
            smoothing_window: 1,
            lag: 0,
            ..Default::default()
        };

        let samples = build_samples(&results, &baseline, &targets, &config);
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].date, d(2024, 1));
    }
}

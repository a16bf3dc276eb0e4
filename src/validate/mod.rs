//! Walk-forward (expanding-window) out-of-sample validation.
//!
//! `samples` joins indicator output with the external baseline feature and
//! the prediction target; `walk` runs the strictly-past-only train/test
//! harness over the joined samples.

pub mod samples;
pub mod walk;

pub use samples::build_samples;
pub use walk::run;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::SeriesObservation;
    use crate::data::sample::synthetic_records;
    use crate::domain::{BucketPolicy, IndicatorWeights, ThresholdPolicy, WalkForwardConfig};
    use crate::indicator::compute_series;
    use crate::progress::NoopProgress;

    /// Full flow: synthetic records -> indicator series -> joined samples ->
    /// walk-forward validation, with labels derived from the synthetic cycle.
    #[test]
    fn records_to_validation_end_to_end() {
        let records = synthetic_records(140, 33);
        let results = compute_series(
            &records,
            &IndicatorWeights::default(),
            &ThresholdPolicy::default(),
            &BucketPolicy::default(),
        )
        .unwrap();

        let baseline: Vec<SeriesObservation> = records
            .iter()
            .map(|r| SeriesObservation::new(r.date, r.yield_spread))
            .collect();
        // Downturn label: capacity utilization below trend.
        let targets: Vec<SeriesObservation> = records
            .iter()
            .map(|r| {
                let label = r.capacity_utilization.map(|c| if c < 77.0 { 1.0 } else { 0.0 });
                SeriesObservation::new(r.date, label)
            })
            .collect();

        let config = WalkForwardConfig::default();
        let samples = build_samples(&results, &baseline, &targets, &config);
        assert!(samples.len() >= config.min_samples, "got {}", samples.len());

        let result = run(&samples, &config, &mut NoopProgress).unwrap();
        assert!(result.classification);
        assert!(result.steps_used > 0);
        for outcome in [&result.baseline, &result.indicator, &result.hybrid] {
            assert!((0.0..=1.0).contains(&outcome.score));
            assert!(outcome.predictions.iter().all(|p| (0.0..=1.0).contains(p)));
        }
        // Training sets are strict prefixes: every prediction date must be
        // strictly later than all sample dates before it in the sequence.
        for w in result.indicator.dates.windows(2) {
            assert!(w[0] < w[1]);
        }
    }
}

//! The expanding-window train/test harness.
//!
//! At every step `i` the training set is exactly `samples[..i]` — a strict
//! prefix, so no information from the test point (or any later point) can
//! reach the fit. Standardization parameters are learned on the training
//! prefix only and reused for the single test sample.
//!
//! Three model variants are fit per step:
//! - baseline: the external feature alone
//! - indicator: the derived indicator feature alone
//! - hybrid: both features
//!
//! Steps whose training prefix cannot support a fit (single-class targets
//! in classification) are skipped without failing the run.

use chrono::NaiveDate;

use crate::domain::{
    TargetKind, ValidationResult, Variant, VariantOutcome, WalkForwardConfig, WalkForwardSample,
};
use crate::error::EngineError;
use crate::math::{apply_standardize, auc, rmse, standardize};
use crate::models::{FittedModel, fit_linear, fit_logistic};
use crate::progress::ProgressObserver;

/// Minimum initial training prefix regardless of `start_fraction`.
const MIN_START: usize = 10;

/// How often the advisory progress observer is notified.
const PROGRESS_EVERY: usize = 10;

struct Accumulator {
    predictions: Vec<f64>,
    actuals: Vec<f64>,
    dates: Vec<NaiveDate>,
}

impl Accumulator {
    fn new() -> Self {
        Self {
            predictions: Vec::new(),
            actuals: Vec::new(),
            dates: Vec::new(),
        }
    }

    fn push(&mut self, prediction: f64, actual: f64, date: NaiveDate) {
        self.predictions.push(prediction);
        self.actuals.push(actual);
        self.dates.push(date);
    }

    fn into_outcome(self, classification: bool) -> VariantOutcome {
        let score = if classification {
            auc(&self.actuals, &self.predictions)
        } else {
            rmse(&self.actuals, &self.predictions)
        };
        VariantOutcome {
            score,
            predictions: self.predictions,
            actuals: self.actuals,
            dates: self.dates,
        }
    }
}

/// Run walk-forward validation over the prepared samples.
///
/// Fails only when the valid sample count is below `config.min_samples`;
/// individual unfittable steps are skipped and counted.
pub fn run(
    samples: &[WalkForwardSample],
    config: &WalkForwardConfig,
    progress: &mut dyn ProgressObserver,
) -> Result<ValidationResult, EngineError> {
    config.validate()?;

    let n = samples.len();
    if n < config.min_samples {
        return Err(EngineError::insufficient_data(format!(
            "Walk-forward validation needs at least {} valid samples, got {n}.",
            config.min_samples
        )));
    }

    let classification = config.target == TargetKind::Classification;
    let start = ((n as f64 * config.start_fraction).ceil() as usize).max(MIN_START);

    let mut baseline_acc = Accumulator::new();
    let mut indicator_acc = Accumulator::new();
    let mut hybrid_acc = Accumulator::new();
    let mut steps_used = 0usize;
    let mut steps_skipped = 0usize;

    for i in start..n {
        let train = &samples[..i];
        let test = &samples[i];

        if classification {
            let positives = train.iter().filter(|s| s.target > 0.5).count();
            if positives == 0 || positives == train.len() {
                steps_skipped += 1;
                continue;
            }
        }

        let targets: Vec<f64> = train.iter().map(|s| s.target).collect();

        let base_vals: Vec<f64> = train.iter().map(|s| s.baseline).collect();
        let ind_vals: Vec<f64> = train.iter().map(|s| s.indicator).collect();

        let (base_scaled, base_mean, base_std) = standardize(&base_vals);
        let (ind_scaled, ind_mean, ind_std) = standardize(&ind_vals);

        let base_xs: Vec<Vec<f64>> = base_scaled.iter().map(|&v| vec![v]).collect();
        let ind_xs: Vec<Vec<f64>> = ind_scaled.iter().map(|&v| vec![v]).collect();
        let hybrid_xs: Vec<Vec<f64>> = base_scaled
            .iter()
            .zip(ind_scaled.iter())
            .map(|(&b, &x)| vec![b, x])
            .collect();

        let base_test = vec![apply_standardize(test.baseline, base_mean, base_std)];
        let ind_test = vec![apply_standardize(test.indicator, ind_mean, ind_std)];
        let hybrid_test = vec![base_test[0], ind_test[0]];

        let predict = |model: &FittedModel, features: &[f64]| -> f64 {
            if classification {
                model.predict_proba(features)
            } else {
                model.predict_value(features)
            }
        };
        let fit = |xs: &[Vec<f64>]| -> FittedModel {
            if classification {
                fit_logistic(xs, &targets, config.logistic_iterations, config.learning_rate)
            } else {
                fit_linear(xs, &targets)
            }
        };

        let base_model = fit(&base_xs);
        let ind_model = fit(&ind_xs);
        let hybrid_model = fit(&hybrid_xs);

        baseline_acc.push(predict(&base_model, &base_test), test.target, test.date);
        indicator_acc.push(predict(&ind_model, &ind_test), test.target, test.date);
        hybrid_acc.push(predict(&hybrid_model, &hybrid_test), test.target, test.date);
        steps_used += 1;

        let done = i - start + 1;
        if done % PROGRESS_EVERY == 0 || i + 1 == n {
            let percent = 100.0 * done as f64 / (n - start) as f64;
            progress.on_progress(percent, "walk-forward validation");
        }
    }

    let baseline = baseline_acc.into_outcome(classification);
    let indicator = indicator_acc.into_outcome(classification);
    let hybrid = hybrid_acc.into_outcome(classification);

    let winner = pick_winner(
        classification,
        baseline.score,
        indicator.score,
        hybrid.score,
    );

    Ok(ValidationResult {
        classification,
        baseline,
        indicator,
        hybrid,
        winner,
        steps_used,
        steps_skipped,
    })
}

/// Best score wins; exact ties prefer indicator, then baseline, then hybrid.
fn pick_winner(classification: bool, baseline: f64, indicator: f64, hybrid: f64) -> Variant {
    let better = |a: f64, b: f64| -> bool {
        if classification { a > b } else { a < b }
    };

    let mut winner = Variant::Indicator;
    let mut best = indicator;
    for (variant, score) in [(Variant::Baseline, baseline), (Variant::Hybrid, hybrid)] {
        if better(score, best) {
            winner = variant;
            best = score;
        }
    }
    winner
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::{NoopProgress, RecordingProgress};
    use chrono::NaiveDate;

    fn sample(i: usize, indicator: f64, baseline: f64, target: f64) -> WalkForwardSample {
        let date = NaiveDate::from_ymd_opt(2000 + (i / 12) as i32, (i % 12) as u32 + 1, 1).unwrap();
        WalkForwardSample {
            date,
            indicator,
            baseline,
            target,
        }
    }

    /// Classification set where the indicator separates classes and the
    /// baseline is pure noise.
    fn separable_samples(n: usize) -> Vec<WalkForwardSample> {
        (0..n)
            .map(|i| {
                let label = if i % 3 == 0 { 1.0 } else { 0.0 };
                let indicator = if label > 0.5 { -0.02 } else { 0.03 };
                let baseline = ((i * 37) % 17) as f64 / 17.0;
                sample(i, indicator, baseline, label)
            })
            .collect()
    }

    #[test]
    fn rejects_too_few_samples() {
        let samples = separable_samples(40);
        let err = run(&samples, &WalkForwardConfig::default(), &mut NoopProgress).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::InsufficientData);
    }

    #[test]
    fn indicator_wins_on_separable_data() {
        let samples = separable_samples(80);
        let result = run(&samples, &WalkForwardConfig::default(), &mut NoopProgress).unwrap();
        assert!(result.classification);
        assert!(result.indicator.score > 0.95);
        assert_eq!(result.winner, Variant::Indicator);
    }

    #[test]
    fn sequences_stay_aligned_across_variants() {
        let samples = separable_samples(60);
        let result = run(&samples, &WalkForwardConfig::default(), &mut NoopProgress).unwrap();
        let len = result.baseline.predictions.len();
        assert_eq!(len, result.steps_used);
        for outcome in [&result.baseline, &result.indicator, &result.hybrid] {
            assert_eq!(outcome.predictions.len(), len);
            assert_eq!(outcome.actuals.len(), len);
            assert_eq!(outcome.dates.len(), len);
        }
    }

    #[test]
    fn single_class_prefix_is_skipped_not_fatal() {
        let mut samples = separable_samples(70);
        // Flatten the first 30 targets to one class: early steps must skip.
        for s in samples.iter_mut().take(30) {
            s.target = 0.0;
        }
        let result = run(&samples, &WalkForwardConfig::default(), &mut NoopProgress).unwrap();
        assert!(result.steps_skipped > 0);
        assert!(result.steps_used > 0);
    }

    #[test]
    fn future_samples_cannot_change_past_predictions() {
        let samples = separable_samples(60);
        let config = WalkForwardConfig::default();
        let full = run(&samples, &config, &mut NoopProgress).unwrap();

        // Corrupt the tail: predictions made before the corruption point must
        // be bit-identical, or the harness is leaking the future.
        let mut corrupted = samples.clone();
        let last = corrupted.len() - 1;
        corrupted[last].target = 1.0 - corrupted[last].target;
        corrupted[last].indicator = 99.0;
        corrupted[last].baseline = -99.0;
        let altered = run(&corrupted, &config, &mut NoopProgress).unwrap();

        let keep = full.indicator.predictions.len() - 1;
        assert_eq!(
            &full.indicator.predictions[..keep],
            &altered.indicator.predictions[..keep]
        );
        assert_eq!(
            &full.hybrid.predictions[..keep],
            &altered.hybrid.predictions[..keep]
        );
    }

    #[test]
    fn regression_scores_with_rmse() {
        // Continuous target tracked perfectly by the indicator feature.
        let samples: Vec<WalkForwardSample> = (0..60)
            .map(|i| {
                let x = (i as f64 / 10.0).sin();
                sample(i, x, 0.5, 2.0 * x + 1.0)
            })
            .collect();
        let config = WalkForwardConfig {
            target: TargetKind::Regression,
            ..Default::default()
        };
        let result = run(&samples, &config, &mut NoopProgress).unwrap();
        assert!(!result.classification);
        assert!(result.indicator.score < 0.05, "rmse {}", result.indicator.score);
        assert_eq!(result.winner, Variant::Indicator);
    }

    #[test]
    fn progress_is_monotonic_and_reaches_hundred() {
        let samples = separable_samples(90);
        let mut progress = RecordingProgress::default();
        run(&samples, &WalkForwardConfig::default(), &mut progress).unwrap();
        assert!(!progress.events.is_empty());
        for pair in progress.events.windows(2) {
            assert!(pair[1].0 >= pair[0].0);
        }
        assert!((progress.events.last().unwrap().0 - 100.0).abs() < 1e-9);
    }

    #[test]
    fn tie_break_prefers_indicator() {
        assert_eq!(pick_winner(true, 0.7, 0.7, 0.7), Variant::Indicator);
        assert_eq!(pick_winner(true, 0.8, 0.7, 0.7), Variant::Baseline);
        assert_eq!(pick_winner(true, 0.7, 0.7, 0.9), Variant::Hybrid);
        assert_eq!(pick_winner(false, 0.3, 0.3, 0.3), Variant::Indicator);
        assert_eq!(pick_winner(false, 0.1, 0.3, 0.3), Variant::Baseline);
    }
}

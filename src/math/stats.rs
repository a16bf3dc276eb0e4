//! Rolling means, standardization, and scoring metrics.
//!
//! Everything here is deterministic and allocation-light; these primitives
//! are the numeric floor the validator and forecast layers stand on.
//!
//! Standardization is split into `standardize` (learn mean/std from a
//! training slice) and `apply_standardize` (reuse those parameters) so that
//! test observations can never leak into the training statistics.

/// Rolling mean over `values` with the given window.
///
/// Lazily yields one value per input element; the first `window - 1` items
/// are `NaN` because the window is not yet full.
pub fn rolling_mean(values: &[f64], window: usize) -> impl Iterator<Item = f64> + '_ {
    let window = window.max(1);
    let mut sum = 0.0;
    values.iter().enumerate().map(move |(i, &v)| {
        sum += v;
        if i + 1 < window {
            return f64::NAN;
        }
        if i + 1 > window {
            sum -= values[i - window];
        }
        sum / window as f64
    })
}

/// Population standard deviation.
///
/// Uses the `n` (not `n - 1`) denominator; the trailing-volatility component
/// and the forecast shock scaling both follow this convention.
pub fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;
    var.sqrt()
}

/// Learn standardization parameters from a training slice and apply them.
///
/// Returns the scaled values plus `(mean, std)`. The std is floored at 1e-12
/// so a constant feature scales to zeros instead of dividing by zero.
pub fn standardize(train: &[f64]) -> (Vec<f64>, f64, f64) {
    if train.is_empty() {
        return (Vec::new(), 0.0, 1.0);
    }
    let mean = train.iter().sum::<f64>() / train.len() as f64;
    let std = std_dev(train).max(1e-12);
    let scaled = train.iter().map(|v| (v - mean) / std).collect();
    (scaled, mean, std)
}

/// Apply previously learned standardization parameters to a single value.
///
/// Must be fed training-only `(mean, std)`; recomputing them from test data
/// would leak future information into the fit.
pub fn apply_standardize(value: f64, mean: f64, std: f64) -> f64 {
    (value - mean) / std.max(1e-12)
}

/// Root-mean-square error between actual and predicted sequences.
pub fn rmse(actual: &[f64], predicted: &[f64]) -> f64 {
    let n = actual.len().min(predicted.len());
    if n == 0 {
        return 0.0;
    }
    let sse: f64 = actual
        .iter()
        .zip(predicted.iter())
        .take(n)
        .map(|(a, p)| (a - p) * (a - p))
        .sum();
    (sse / n as f64).sqrt()
}

/// Area under the ROC curve for binary actuals in {0, 1}.
///
/// Sorts descending by score, sweeps tie groups together, and integrates the
/// (FPR, TPR) curve with the trapezoid rule. Returns exactly 0.5 when either
/// class is absent; never fails.
pub fn auc(actuals: &[f64], scores: &[f64]) -> f64 {
    let n = actuals.len().min(scores.len());
    let positives = actuals.iter().take(n).filter(|&&a| a > 0.5).count();
    let negatives = n - positives;
    if positives == 0 || negatives == 0 {
        return 0.5;
    }

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&i, &j| {
        scores[j]
            .partial_cmp(&scores[i])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut area = 0.0;
    let mut tp = 0usize;
    let mut fp = 0usize;
    let mut prev_tpr = 0.0;
    let mut prev_fpr = 0.0;

    let mut k = 0;
    while k < n {
        // Advance over the whole tie group at this score before emitting a
        // ROC vertex, so ties contribute a single diagonal segment.
        let tie_score = scores[order[k]];
        while k < n && scores[order[k]] == tie_score {
            if actuals[order[k]] > 0.5 {
                tp += 1;
            } else {
                fp += 1;
            }
            k += 1;
        }
        let tpr = tp as f64 / positives as f64;
        let fpr = fp as f64 / negatives as f64;
        area += (fpr - prev_fpr) * (tpr + prev_tpr) / 2.0;
        prev_tpr = tpr;
        prev_fpr = fpr;
    }

    area.clamp(0.0, 1.0)
}

/// Percentile of an ascending-sorted slice, with linear interpolation
/// between ranks. `p` is in [0, 100].
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    if sorted.len() == 1 {
        return sorted[0];
    }
    let rank = (p.clamp(0.0, 100.0) / 100.0) * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        return sorted[lo];
    }
    let frac = rank - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

/// Pearson correlation coefficient.
///
/// Returns 0.0 when either series is (numerically) constant.
pub fn pearson_correlation(a: &[f64], b: &[f64]) -> f64 {
    let n = a.len().min(b.len());
    if n < 2 {
        return 0.0;
    }
    let mean_a = a.iter().take(n).sum::<f64>() / n as f64;
    let mean_b = b.iter().take(n).sum::<f64>() / n as f64;

    let mut cov = 0.0;
    let mut var_a = 0.0;
    let mut var_b = 0.0;
    for i in 0..n {
        let da = a[i] - mean_a;
        let db = b[i] - mean_b;
        cov += da * db;
        var_a += da * da;
        var_b += db * db;
    }
    let denom = (var_a * var_b).sqrt();
    if denom < 1e-12 {
        return 0.0;
    }
    cov / denom
}

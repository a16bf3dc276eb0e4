//! Formatted terminal/report summaries.

use crate::domain::{
    ForecastReport, IndicatorResult, MonteCarloDistribution, SensitivityEntry, ValidationResult,
    Variant,
};

/// Summarize a computed indicator series: latest reading plus range.
pub fn format_indicator_summary(results: &[IndicatorResult]) -> String {
    let mut out = String::new();
    out.push_str("=== Composite indicator ===\n");

    let Some(last) = results.last() else {
        out.push_str("(no computable periods)\n");
        return out;
    };

    out.push_str(&format!("Periods: {}\n", results.len()));
    out.push_str(&format!(
        "Latest: {} score={:.6} status={} (bucket {} p={:.2})\n",
        last.date,
        last.score,
        last.status.display_name(),
        last.bucket_status.display_name(),
        last.bucket_probability,
    ));

    let min = results.iter().map(|r| r.score).fold(f64::INFINITY, f64::min);
    let max = results.iter().map(|r| r.score).fold(f64::NEG_INFINITY, f64::max);
    out.push_str(&format!("Score range: [{min:.6}, {max:.6}]\n"));
    out.push_str(&format!(
        "Components: thrust={:.4} efficiency={:.4} slack={:.4} drag={:.4}\n",
        last.components.thrust, last.components.efficiency, last.components.slack,
        last.components.drag,
    ));
    out
}

/// Summarize walk-forward scores and the winning variant.
pub fn format_validation_summary(result: &ValidationResult) -> String {
    let metric = if result.classification { "AUC" } else { "RMSE" };
    let mut out = String::new();
    out.push_str("=== Walk-forward validation ===\n");
    out.push_str(&format!(
        "Steps: {} used, {} skipped\n",
        result.steps_used, result.steps_skipped
    ));
    for variant in [Variant::Baseline, Variant::Indicator, Variant::Hybrid] {
        let chosen = if variant == result.winner { "*" } else { " " };
        out.push_str(&format!(
            "{chosen} {:<10} {metric}={:.6}\n",
            variant.display_name(),
            result.outcome(variant).score,
        ));
    }
    out
}

/// Summarize a Monte Carlo distribution.
pub fn format_distribution_summary(dist: &MonteCarloDistribution) -> String {
    let mut out = String::new();
    out.push_str("=== Monte Carlo distribution ===\n");
    out.push_str(&format!("Iterations: {}\n", dist.scores.len()));
    out.push_str(&format!(
        "mean={:.6} median={:.6} std={:.6}\n",
        dist.mean, dist.median, dist.std_dev
    ));
    out.push_str(&format!(
        "p5={:.6} p95={:.6} min={:.6} max={:.6}\n",
        dist.p5, dist.p95, dist.min, dist.max
    ));
    out.push_str(&format!(
        "P(crisis)={:.4} P(contraction)={:.4} P(slowdown)={:.4}\n",
        dist.prob_crisis, dist.prob_contraction, dist.prob_slowdown
    ));
    out
}

/// Format the tornado ranking, strongest parameter first.
pub fn format_sensitivity_summary(entries: &[SensitivityEntry]) -> String {
    let mut out = String::new();
    out.push_str("=== Parameter sensitivity (tornado) ===\n");
    out.push_str(&format!(
        "{:<12} {:>10} {:>10} {:>10}\n",
        "parameter", "low%", "high%", "mean|%|"
    ));
    for e in entries {
        out.push_str(&format!(
            "{:<12} {:>10.4} {:>10.4} {:>10.4}\n",
            e.parameter, e.low_impact_pct, e.high_impact_pct, e.mean_abs_impact_pct
        ));
    }
    out
}

/// Summarize the forecast report and its horizon paths.
pub fn format_forecast_summary(report: &ForecastReport) -> String {
    let mut out = String::new();
    out.push_str("=== Forecast ===\n");
    out.push_str(&format!(
        "Current: {:.6} ({} vs {:.6})\n",
        report.current_score,
        report.trend.display_name(),
        report.previous_score,
    ));
    out.push_str(&format!(
        "Effective rate: {:.6} | collapse probability: {:.4}\n",
        report.effective_rate, report.collapse_probability
    ));
    for p in &report.paths {
        out.push_str(&format!(
            "{:>5.1}y central={:.6} band=[{:.6}, {:.6}] tier={}\n",
            p.horizon_years,
            p.central,
            p.p5,
            p.p95,
            p.tier.display_name(),
        ));
    }
    out
}

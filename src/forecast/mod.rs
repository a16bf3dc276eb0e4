//! Forward projection and risk surfaces.
//!
//! Three orders of analysis on top of the computed indicator series:
//!
//! 1. level: the most recent score
//! 2. trend: difference from the prior period
//! 3. projection: `C_h = V0 * e^(r*h) * (1 - rho)` where `r` is an effective
//!    rate built from the trailing average score and drag, and `rho` is a
//!    logistic tipping function of accumulated drag
//!
//! Percentile bands come from seeded Normal sampling around the trailing
//! averages; the risk heatmap evaluates the same projection deterministically
//! across a grid of thrust/drag shocks in standard-deviation units.

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;
use rayon::prelude::*;

use crate::domain::{
    ForecastConfig, ForecastPath, ForecastReport, IndicatorResult, RiskHeatmapCell, RiskTier,
    Trend,
};
use crate::error::EngineError;
use crate::math::{percentile, std_dev};

/// Score changes smaller than this count as a stable trend.
const TREND_EPS: f64 = 1e-9;

/// Trailing statistics feeding the projection.
struct Lookback {
    avg_score: f64,
    avg_drag: f64,
    sigma_score: f64,
    sigma_drag: f64,
}

/// Produce the forecast report: current state, trend, and per-horizon paths
/// with percentile bands.
pub fn forecast(
    results: &[IndicatorResult],
    config: &ForecastConfig,
) -> Result<ForecastReport, EngineError> {
    config.validate()?;
    let lookback = lookback_stats(results, config)?;

    let current = results[results.len() - 1].score;
    let previous = results[results.len() - 2].score;
    let trend = classify_trend(current, previous);

    let rate = config.alpha * lookback.avg_score - config.beta * lookback.avg_drag;
    let rho = collapse_probability(config, lookback.avg_drag);

    let mut paths = Vec::with_capacity(config.horizons.len());
    for (h_idx, &horizon) in config.horizons.iter().enumerate() {
        let central = project(current, rate, rho, horizon);

        // One derived RNG per horizon: band sampling for horizon k is
        // unaffected by which other horizons are configured.
        let mut rng = horizon_rng(config.seed, h_idx as u64);
        let score_dist = Normal::new(lookback.avg_score, lookback.sigma_score.max(1e-12))
            .map_err(|e| EngineError::numeric(format!("Band distribution error: {e}")))?;
        let drag_dist = Normal::new(lookback.avg_drag, lookback.sigma_drag.max(1e-12))
            .map_err(|e| EngineError::numeric(format!("Band distribution error: {e}")))?;

        let mut sampled = Vec::with_capacity(config.band_samples);
        for _ in 0..config.band_samples {
            let s = score_dist.sample(&mut rng);
            let d = drag_dist.sample(&mut rng).max(0.0);
            let r = config.alpha * s - config.beta * d;
            let p = collapse_probability(config, d);
            sampled.push(project(current, r, p, horizon));
        }
        sampled.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        paths.push(ForecastPath {
            horizon_years: horizon,
            central,
            p5: percentile(&sampled, 5.0),
            p25: percentile(&sampled, 25.0),
            p50: percentile(&sampled, 50.0),
            p75: percentile(&sampled, 75.0),
            p95: percentile(&sampled, 95.0),
            collapse_probability: rho,
            tier: RiskTier::from_collapse_probability(rho),
        });
    }

    Ok(ForecastReport {
        current_score: current,
        previous_score: previous,
        trend,
        effective_rate: rate,
        avg_score: lookback.avg_score,
        avg_drag: lookback.avg_drag,
        collapse_probability: rho,
        paths,
    })
}

/// Evaluate the projection across the thrust/drag shock grid.
///
/// Fully deterministic: shocks move the trailing averages by multiples of
/// their own standard deviations, and each (thrust shock, drag shock,
/// horizon) triple yields exactly one cell. Cell order is row-major over
/// (thrust, drag, horizon).
pub fn risk_heatmap(
    results: &[IndicatorResult],
    config: &ForecastConfig,
) -> Result<Vec<RiskHeatmapCell>, EngineError> {
    config.validate()?;
    let lookback = lookback_stats(results, config)?;
    let current = results[results.len() - 1].score;

    let grid = &config.shock_grid;
    let horizons = &config.horizons;
    let n_cells = grid.len() * grid.len() * horizons.len();

    let cells: Vec<RiskHeatmapCell> = (0..n_cells)
        .into_par_iter()
        .map(|flat| {
            let h_idx = flat % horizons.len();
            let d_idx = (flat / horizons.len()) % grid.len();
            let t_idx = flat / (horizons.len() * grid.len());

            let thrust_shock = grid[t_idx];
            let drag_shock = grid[d_idx];
            let horizon = horizons[h_idx];

            let shocked_score = lookback.avg_score + thrust_shock * lookback.sigma_score;
            let shocked_drag = (lookback.avg_drag + drag_shock * lookback.sigma_drag).max(0.0);

            let rate = config.alpha * shocked_score - config.beta * shocked_drag;
            let rho = collapse_probability(config, shocked_drag);

            RiskHeatmapCell {
                thrust_shock,
                drag_shock,
                horizon_years: horizon,
                projected_value: project(current, rate, rho, horizon),
                collapse_probability: rho,
                tier: RiskTier::from_collapse_probability(rho),
            }
        })
        .collect();

    Ok(cells)
}

fn lookback_stats(
    results: &[IndicatorResult],
    config: &ForecastConfig,
) -> Result<Lookback, EngineError> {
    if results.len() < config.lookback_months {
        return Err(EngineError::insufficient_data(format!(
            "Forecasting needs at least {} computed periods, got {}.",
            config.lookback_months,
            results.len()
        )));
    }

    let window = &results[results.len() - config.lookback_months..];
    let scores: Vec<f64> = window.iter().map(|r| r.score).collect();
    let drags: Vec<f64> = window.iter().map(|r| r.components.drag).collect();

    Ok(Lookback {
        avg_score: scores.iter().sum::<f64>() / scores.len() as f64,
        avg_drag: drags.iter().sum::<f64>() / drags.len() as f64,
        sigma_score: std_dev(&scores),
        sigma_drag: std_dev(&drags),
    })
}

fn classify_trend(current: f64, previous: f64) -> Trend {
    let diff = current - previous;
    if diff > TREND_EPS {
        Trend::Accelerating
    } else if diff < -TREND_EPS {
        Trend::Decelerating
    } else {
        Trend::Stable
    }
}

/// Logistic tipping function of accumulated drag.
fn collapse_probability(config: &ForecastConfig, avg_drag: f64) -> f64 {
    let z = (config.gamma * avg_drag - config.theta).clamp(-500.0, 500.0);
    1.0 / (1.0 + (-z).exp())
}

/// Compounding projection with the collapse haircut applied.
fn project(v0: f64, rate: f64, rho: f64, horizon_years: f64) -> f64 {
    v0 * (rate * horizon_years).exp() * (1.0 - rho)
}

fn horizon_rng(seed: u64, horizon_idx: u64) -> StdRng {
    let mut z = seed ^ horizon_idx.wrapping_mul(0xD1B5_4A32_D192_ED03);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    StdRng::seed_from_u64(z ^ (z >> 31))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sample::synthetic_records;
    use crate::domain::{BucketPolicy, IndicatorWeights, ThresholdPolicy};
    use crate::indicator::compute_series;

    fn results(months: usize, seed: u64) -> Vec<IndicatorResult> {
        let records = synthetic_records(months, seed);
        compute_series(
            &records,
            &IndicatorWeights::default(),
            &ThresholdPolicy::default(),
            &BucketPolicy::default(),
        )
        .unwrap()
    }

    #[test]
    fn bands_are_monotone_per_horizon() {
        let report = forecast(&results(60, 13), &ForecastConfig::default()).unwrap();
        assert_eq!(report.paths.len(), 5);
        for path in &report.paths {
            assert!(path.p5 <= path.p25);
            assert!(path.p25 <= path.p50);
            assert!(path.p50 <= path.p75);
            assert!(path.p75 <= path.p95);
        }
    }

    #[test]
    fn fixed_seed_reproduces_paths() {
        let res = results(60, 13);
        let a = forecast(&res, &ForecastConfig::default()).unwrap();
        let b = forecast(&res, &ForecastConfig::default()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn collapse_probability_rises_with_drag() {
        let config = ForecastConfig::default();
        let low = collapse_probability(&config, 0.05);
        let high = collapse_probability(&config, 0.5);
        assert!(low < high);
        assert!((0.0..=1.0).contains(&low));
        assert!((0.0..=1.0).contains(&high));
    }

    #[test]
    fn tier_thresholds() {
        assert_eq!(RiskTier::from_collapse_probability(0.8), RiskTier::Critical);
        assert_eq!(RiskTier::from_collapse_probability(0.75), RiskTier::Critical);
        assert_eq!(RiskTier::from_collapse_probability(0.6), RiskTier::High);
        assert_eq!(RiskTier::from_collapse_probability(0.3), RiskTier::Elevated);
        assert_eq!(RiskTier::from_collapse_probability(0.15), RiskTier::Moderate);
        assert_eq!(RiskTier::from_collapse_probability(0.05), RiskTier::Low);
    }

    #[test]
    fn trend_classification() {
        assert_eq!(classify_trend(0.03, 0.02), Trend::Accelerating);
        assert_eq!(classify_trend(0.01, 0.02), Trend::Decelerating);
        assert_eq!(classify_trend(0.02, 0.02), Trend::Stable);
    }

    #[test]
    fn heatmap_covers_full_grid_deterministically() {
        let res = results(60, 13);
        let config = ForecastConfig::default();
        let a = risk_heatmap(&res, &config).unwrap();
        let b = risk_heatmap(&res, &config).unwrap();

        assert_eq!(a.len(), 5 * 5 * 5);
        assert_eq!(a, b);

        // More drag shock can only raise collapse probability.
        let low_drag = a
            .iter()
            .find(|c| c.thrust_shock == 0.0 && c.drag_shock == -2.0 && c.horizon_years == 1.0)
            .unwrap();
        let high_drag = a
            .iter()
            .find(|c| c.thrust_shock == 0.0 && c.drag_shock == 2.0 && c.horizon_years == 1.0)
            .unwrap();
        assert!(high_drag.collapse_probability >= low_drag.collapse_probability);
    }

    #[test]
    fn short_series_is_insufficient() {
        let err = forecast(&results(40, 13)[..10].to_vec(), &ForecastConfig::default())
            .unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::InsufficientData);
    }
}

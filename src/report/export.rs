//! CSV writers with stable headers and fixed-point precision.
//!
//! The embedding application owns file paths and persistence policy; these
//! functions only write rows to a handle. Field names and the 6-decimal
//! precision are a compatibility contract for downstream consumers, so a
//! written indicator series can be re-parsed within 1e-6 of the original.

use std::io::Write;

use chrono::NaiveDate;

use crate::domain::{
    ForecastPath, IndicatorComponents, IndicatorResult, RiskHeatmapCell, RiskStatus,
    SensitivityEntry, ValidationResult,
};
use crate::error::EngineError;

const INDICATOR_HEADER: &str = "date,thrust,efficiency,slack,yield_penalty,real_rate,volatility,drag,score,status,bucket_status,bucket_probability";

fn io_err(context: &str, e: std::io::Error) -> EngineError {
    EngineError::format(format!("Failed to write {context}: {e}"))
}

/// Write the indicator series, one row per computed period.
pub fn write_indicator_csv(
    mut w: impl Write,
    results: &[IndicatorResult],
) -> Result<(), EngineError> {
    writeln!(w, "{INDICATOR_HEADER}").map_err(|e| io_err("indicator CSV header", e))?;
    for r in results {
        writeln!(
            w,
            "{},{:.6},{:.6},{:.6},{:.6},{:.6},{:.6},{:.6},{:.6},{},{},{:.6}",
            r.date,
            r.components.thrust,
            r.components.efficiency,
            r.components.slack,
            r.components.yield_penalty,
            r.components.real_rate,
            r.components.volatility,
            r.components.drag,
            r.score,
            r.status.display_name(),
            r.bucket_status.display_name(),
            r.bucket_probability,
        )
        .map_err(|e| io_err("indicator CSV row", e))?;
    }
    Ok(())
}

/// Re-parse an indicator CSV produced by [`write_indicator_csv`].
pub fn parse_indicator_csv(text: &str) -> Result<Vec<IndicatorResult>, EngineError> {
    let mut lines = text.lines();
    match lines.next() {
        Some(header) if header == INDICATOR_HEADER => {}
        other => {
            return Err(EngineError::format(format!(
                "Unexpected indicator CSV header: {other:?}."
            )));
        }
    }

    let mut out = Vec::new();
    for (row_idx, line) in lines.enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split(',').collect();
        if fields.len() != 12 {
            return Err(EngineError::format(format!(
                "Indicator CSV row {} has {} fields, expected 12.",
                row_idx + 2,
                fields.len()
            )));
        }

        let date = fields[0].parse::<NaiveDate>().map_err(|e| {
            EngineError::format(format!("Bad date in indicator CSV row {}: {e}", row_idx + 2))
        })?;
        let num = |idx: usize| -> Result<f64, EngineError> {
            fields[idx].parse::<f64>().map_err(|e| {
                EngineError::format(format!(
                    "Bad number in indicator CSV row {} column {}: {e}",
                    row_idx + 2,
                    idx + 1
                ))
            })
        };

        out.push(IndicatorResult {
            date,
            components: IndicatorComponents {
                thrust: num(1)?,
                efficiency: num(2)?,
                slack: num(3)?,
                yield_penalty: num(4)?,
                real_rate: num(5)?,
                volatility: num(6)?,
                drag: num(7)?,
            },
            score: num(8)?,
            status: parse_status(fields[9], row_idx)?,
            bucket_status: parse_status(fields[10], row_idx)?,
            bucket_probability: num(11)?,
        });
    }
    Ok(out)
}

fn parse_status(field: &str, row_idx: usize) -> Result<RiskStatus, EngineError> {
    match field {
        "contraction" => Ok(RiskStatus::Contraction),
        "elevated" => Ok(RiskStatus::Elevated),
        "caution" => Ok(RiskStatus::Caution),
        "healthy" => Ok(RiskStatus::Healthy),
        other => Err(EngineError::format(format!(
            "Unknown status '{other}' in indicator CSV row {}.",
            row_idx + 2
        ))),
    }
}

/// Write the per-step walk-forward predictions for all three variants.
pub fn write_validation_csv(
    mut w: impl Write,
    result: &ValidationResult,
) -> Result<(), EngineError> {
    writeln!(w, "date,actual,baseline_pred,indicator_pred,hybrid_pred")
        .map_err(|e| io_err("validation CSV header", e))?;
    for i in 0..result.indicator.predictions.len() {
        writeln!(
            w,
            "{},{:.6},{:.6},{:.6},{:.6}",
            result.indicator.dates[i],
            result.indicator.actuals[i],
            result.baseline.predictions[i],
            result.indicator.predictions[i],
            result.hybrid.predictions[i],
        )
        .map_err(|e| io_err("validation CSV row", e))?;
    }
    Ok(())
}

/// Write the tornado ranking.
pub fn write_sensitivity_csv(
    mut w: impl Write,
    entries: &[SensitivityEntry],
) -> Result<(), EngineError> {
    writeln!(w, "parameter,low_impact_pct,high_impact_pct,mean_abs_impact_pct")
        .map_err(|e| io_err("sensitivity CSV header", e))?;
    for e in entries {
        writeln!(
            w,
            "{},{:.6},{:.6},{:.6}",
            e.parameter, e.low_impact_pct, e.high_impact_pct, e.mean_abs_impact_pct
        )
        .map_err(|e| io_err("sensitivity CSV row", e))?;
    }
    Ok(())
}

/// Write the forecast paths.
pub fn write_forecast_csv(mut w: impl Write, paths: &[ForecastPath]) -> Result<(), EngineError> {
    writeln!(
        w,
        "horizon_years,central,p5,p25,p50,p75,p95,collapse_probability,tier"
    )
    .map_err(|e| io_err("forecast CSV header", e))?;
    for p in paths {
        writeln!(
            w,
            "{:.2},{:.6},{:.6},{:.6},{:.6},{:.6},{:.6},{:.6},{}",
            p.horizon_years,
            p.central,
            p.p5,
            p.p25,
            p.p50,
            p.p75,
            p.p95,
            p.collapse_probability,
            p.tier.display_name(),
        )
        .map_err(|e| io_err("forecast CSV row", e))?;
    }
    Ok(())
}

/// Write the shock-grid heatmap cells.
pub fn write_heatmap_csv(mut w: impl Write, cells: &[RiskHeatmapCell]) -> Result<(), EngineError> {
    writeln!(
        w,
        "thrust_shock,drag_shock,horizon_years,projected_value,collapse_probability,tier"
    )
    .map_err(|e| io_err("heatmap CSV header", e))?;
    for c in cells {
        writeln!(
            w,
            "{:.2},{:.2},{:.2},{:.6},{:.6},{}",
            c.thrust_shock,
            c.drag_shock,
            c.horizon_years,
            c.projected_value,
            c.collapse_probability,
            c.tier.display_name(),
        )
        .map_err(|e| io_err("heatmap CSV row", e))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sample::synthetic_records;
    use crate::domain::{BucketPolicy, IndicatorWeights, ThresholdPolicy};
    use crate::indicator::compute_series;

    #[test]
    fn indicator_csv_round_trips_within_tolerance() {
        let records = synthetic_records(48, 17);
        let results = compute_series(
            &records,
            &IndicatorWeights::default(),
            &ThresholdPolicy::default(),
            &BucketPolicy::default(),
        )
        .unwrap();

        let mut buf = Vec::new();
        write_indicator_csv(&mut buf, &results).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let parsed = parse_indicator_csv(&text).unwrap();

        assert_eq!(parsed.len(), results.len());
        for (orig, back) in results.iter().zip(parsed.iter()) {
            assert_eq!(orig.date, back.date);
            assert_eq!(orig.status, back.status);
            assert!((orig.score - back.score).abs() < 1e-6);
            assert!((orig.components.thrust - back.components.thrust).abs() < 1e-6);
            assert!((orig.components.drag - back.components.drag).abs() < 1e-6);
            assert!((orig.bucket_probability - back.bucket_probability).abs() < 1e-6);
        }
    }

    #[test]
    fn parse_rejects_wrong_header() {
        let err = parse_indicator_csv("nope\n1,2,3").unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Format);
    }

    #[test]
    fn parse_rejects_short_row() {
        let text = format!("{INDICATOR_HEADER}\n2024-01-01,0.1\n");
        assert!(parse_indicator_csv(&text).is_err());
    }

    #[test]
    fn sensitivity_csv_has_stable_header() {
        let entries = vec![SensitivityEntry {
            parameter: "mult".to_string(),
            low_impact_pct: -12.5,
            high_impact_pct: 14.0,
            mean_abs_impact_pct: 13.25,
        }];
        let mut buf = Vec::new();
        write_sensitivity_csv(&mut buf, &entries).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("parameter,low_impact_pct,high_impact_pct,mean_abs_impact_pct\n"));
        assert!(text.contains("mult,-12.500000,14.000000,13.250000"));
    }
}

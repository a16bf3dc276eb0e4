//! Deterministic synthetic macro series.
//!
//! Tests (and demo callers) need aligned record sets with a realistic shape:
//! trending levels, a business cycle, occasional yield-curve inversion. The
//! generator is fully seeded so every test run sees identical data.

use chrono::{Datelike, NaiveDate};
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::StandardNormal;

use crate::domain::PeriodRecord;

/// Cycle length in months for the synthetic business cycle.
const CYCLE_MONTHS: f64 = 48.0;

/// Generate `months` aligned monthly records starting January 2000.
///
/// Levels follow a slow growth trend modulated by a sinusoidal cycle plus
/// seeded Gaussian noise; the yield spread inverts near cycle troughs, so
/// downstream classifiers have genuine (if synthetic) signal to find.
pub fn synthetic_records(months: usize, seed: u64) -> Vec<PeriodRecord> {
    let mut rng = StdRng::seed_from_u64(seed);
    let noise = StandardNormal;

    let start = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap_or_default();

    let mut investment = 4000.0;
    let mut money_supply = 20000.0;
    let mut output = 26000.0;
    let mut price_index = 180.0;

    let mut out = Vec::with_capacity(months);
    for t in 0..months {
        let cycle = (2.0 * std::f64::consts::PI * t as f64 / CYCLE_MONTHS).sin();

        let inv_growth = 0.004 + 0.008 * cycle + 0.002 * Distribution::<f64>::sample(&noise, &mut rng);
        let money_growth = 0.005 + 0.004 * cycle + 0.001 * Distribution::<f64>::sample(&noise, &mut rng);
        let output_growth = 0.003 + 0.004 * cycle + 0.001 * Distribution::<f64>::sample(&noise, &mut rng);
        investment *= 1.0 + inv_growth;
        money_supply *= 1.0 + money_growth;
        output *= 1.0 + output_growth;
        price_index *= 1.0 + 0.0025 + 0.0005 * Distribution::<f64>::sample(&noise, &mut rng);

        let policy_rate = (3.0 - 1.5 * cycle + 0.1 * Distribution::<f64>::sample(&noise, &mut rng)).max(0.25);
        let capacity = 78.0 + 4.0 * cycle + 0.3 * Distribution::<f64>::sample(&noise, &mut rng);
        let yield_spread = 1.0 + 1.8 * cycle + 0.2 * Distribution::<f64>::sample(&noise, &mut rng);

        let date = add_months(start, t as u32);
        out.push(PeriodRecord {
            date,
            investment: Some(investment),
            money_supply: Some(money_supply),
            policy_rate: Some(policy_rate),
            output: Some(output),
            capacity_utilization: Some(capacity),
            yield_spread: Some(yield_spread),
            price_index: Some(price_index),
        });
    }
    out
}

fn add_months(start: NaiveDate, months: u32) -> NaiveDate {
    let total = start.year() as u32 * 12 + (start.month0()) + months;
    NaiveDate::from_ymd_opt((total / 12) as i32, total % 12 + 1, 1).unwrap_or(start)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_seed_reproduces_records() {
        let a = synthetic_records(60, 42);
        let b = synthetic_records(60, 42);
        assert_eq!(a, b);
    }

    #[test]
    fn different_seeds_differ() {
        let a = synthetic_records(24, 1);
        let b = synthetic_records(24, 2);
        assert_ne!(a, b);
    }

    #[test]
    fn dates_advance_monthly() {
        let records = synthetic_records(14, 0);
        assert_eq!(records[0].date, NaiveDate::from_ymd_opt(2000, 1, 1).unwrap());
        assert_eq!(records[12].date, NaiveDate::from_ymd_opt(2001, 1, 1).unwrap());
        for w in records.windows(2) {
            assert!(w[0].date < w[1].date);
        }
    }

    #[test]
    fn cycle_produces_inversions() {
        // Over a full cycle the spread should dip negative at the trough.
        let records = synthetic_records(60, 7);
        assert!(records.iter().any(|r| r.yield_spread.unwrap() < 0.0));
        assert!(records.iter().any(|r| r.yield_spread.unwrap() > 0.5));
    }
}

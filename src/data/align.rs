//! Alignment of heterogeneous-frequency series into monthly records.
//!
//! Upstream series arrive at mixed frequencies: investment and output are
//! quarterly, the rest are monthly (or better). Alignment produces one
//! [`PeriodRecord`] per calendar month over the union date range, carrying
//! quarterly values forward until superseded.
//!
//! Absence is preserved, not repaired: a month missing a field keeps `None`
//! and each downstream consumer decides whether that means "skip the period"
//! or "null feature". Nothing is dropped or zero-filled here.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::domain::PeriodRecord;

/// One raw observation: a date plus a value that may be absent.
///
/// The retrieval collaborator maps its missing-value sentinel (`"."`) to
/// `None` before records reach this crate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesObservation {
    pub date: NaiveDate,
    pub value: Option<f64>,
}

impl SeriesObservation {
    pub fn new(date: NaiveDate, value: Option<f64>) -> Self {
        Self { date, value }
    }
}

/// Raw observation lists for every input series.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawSeriesSet {
    /// Quarterly; forward-filled during alignment.
    pub investment: Vec<SeriesObservation>,
    pub money_supply: Vec<SeriesObservation>,
    pub policy_rate: Vec<SeriesObservation>,
    /// Quarterly; forward-filled during alignment.
    pub output: Vec<SeriesObservation>,
    pub capacity_utilization: Vec<SeriesObservation>,
    pub yield_spread: Vec<SeriesObservation>,
    pub price_index: Vec<SeriesObservation>,
}

/// Forward-fill state threaded through the alignment fold.
///
/// Explicit carry (rather than mutable loop variables) keeps the per-month
/// step a pure function of `(carry, observations)`.
#[derive(Debug, Clone, Copy, Default)]
struct CarryState {
    investment: Option<f64>,
    output: Option<f64>,
}

/// Align the raw series set into an ordered monthly record sequence.
///
/// Output covers every month from the earliest to the latest observation in
/// the union of all series, ascending, one record per month. Returns an
/// empty vector when no series has any observation.
pub fn align_monthly(raw: &RawSeriesSet) -> Vec<PeriodRecord> {
    let investment = monthly_latest(&raw.investment);
    let money_supply = monthly_latest(&raw.money_supply);
    let policy_rate = monthly_latest(&raw.policy_rate);
    let output = monthly_latest(&raw.output);
    let capacity = monthly_latest(&raw.capacity_utilization);
    let yield_spread = monthly_latest(&raw.yield_spread);
    let price_index = monthly_latest(&raw.price_index);

    let all_months = [
        &investment,
        &money_supply,
        &policy_rate,
        &output,
        &capacity,
        &yield_spread,
        &price_index,
    ];
    let first = all_months.iter().filter_map(|m| m.keys().next()).min().copied();
    let last = all_months
        .iter()
        .filter_map(|m| m.keys().next_back())
        .max()
        .copied();
    let (Some(first), Some(last)) = (first, last) else {
        return Vec::new();
    };

    let mut out = Vec::new();
    let mut carry = CarryState::default();
    let mut month = first;
    loop {
        // Quarterly fields: take this month's observation if present,
        // otherwise the carried value; update the carry on observation.
        let inv = investment.get(&month).copied().or(carry.investment);
        let outp = output.get(&month).copied().or(carry.output);
        carry = CarryState {
            investment: inv,
            output: outp,
        };

        out.push(PeriodRecord {
            date: month,
            investment: inv,
            money_supply: money_supply.get(&month).copied(),
            policy_rate: policy_rate.get(&month).copied(),
            output: outp,
            capacity_utilization: capacity.get(&month).copied(),
            yield_spread: yield_spread.get(&month).copied(),
            price_index: price_index.get(&month).copied(),
        });

        if month >= last {
            break;
        }
        month = next_month(month);
    }
    out
}

/// Reduce a raw series to one value per month (first of month), keeping the
/// latest present observation within each month and ignoring absent ones.
fn monthly_latest(observations: &[SeriesObservation]) -> BTreeMap<NaiveDate, f64> {
    let mut sorted: Vec<&SeriesObservation> = observations.iter().collect();
    sorted.sort_by_key(|o| o.date);

    let mut out = BTreeMap::new();
    for obs in sorted {
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

fn next_month(date: NaiveDate) -> NaiveDate {
    let (y, m) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(y, m, 1).unwrap_or(date)
}

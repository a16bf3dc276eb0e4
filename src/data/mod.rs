//! Data preparation: alignment of raw series into monthly records, plus a
//! deterministic synthetic generator for tests and demos.

pub mod align;
pub mod sample;

pub use align::{RawSeriesSet, SeriesObservation, align_monthly};
pub use sample::synthetic_records;

//! Reporting: formatted summaries and stable CSV output.
//!
//! We keep formatting code in one place so:
//! - the numeric modules stay clean and testable
//! - output changes are localized
//!
//! The CSV writers guarantee stable headers and fixed-point precision; the
//! embedding application decides where the bytes go.

pub mod export;
pub mod format;

pub use export::{
    parse_indicator_csv, write_forecast_csv, write_heatmap_csv, write_indicator_csv,
    write_sensitivity_csv, write_validation_csv,
};
pub use format::{
    format_distribution_summary, format_forecast_summary, format_indicator_summary,
    format_sensitivity_summary, format_validation_summary,
};

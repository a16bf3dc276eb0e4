//! `niv-engine` library crate.
//!
//! A composite macro-health indicator engine plus the statistical machinery
//! to validate and stress it:
//!
//! - `data`: alignment of heterogeneous-frequency series into monthly records
//! - `indicator`: the canonical weight-parameterized indicator formula
//! - `validate`: expanding-window (walk-forward) out-of-sample validation
//! - `mc`: seeded Monte Carlo perturbation of inputs and weights
//! - `sensitivity`: deterministic per-parameter (tornado) sweep
//! - `forecast`: compounding projections, collapse probability, risk heatmap
//!
//! The crate is a pure library: it consumes already-aligned numeric records
//! and configuration, and returns plain result structures. Data retrieval,
//! rendering, and file export policy belong to the embedding application.

pub mod data;
pub mod domain;
pub mod error;
pub mod forecast;
pub mod indicator;
pub mod math;
pub mod mc;
pub mod models;
pub mod progress;
pub mod report;
pub mod sensitivity;
pub mod validate;

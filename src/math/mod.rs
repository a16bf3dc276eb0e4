//! Stateless numeric utilities.

pub mod solve;
pub mod stats;

pub use solve::solve_normal_equations;
pub use stats::{
    apply_standardize, auc, pearson_correlation, percentile, rmse, rolling_mean, standardize,
    std_dev,
};

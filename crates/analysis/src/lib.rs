//! # Analysis Crate
//!
//! Turns the chi-squared record of a fitting run into model probabilities,
//! probability-weighted parameter distributions, and a convergence trend.
//! Everything here reads the run's tables; nothing mutates the run except
//! the table writers, which only add files under `prob/`.

pub mod convergence;
pub mod distribution;
pub mod error;
pub mod probabilities;

pub use convergence::{best_score_trend, ConvergenceTrend};
pub use distribution::{run_distributions, write_distribution_tables, ParameterDistribution};
pub use error::AnalysisError;
pub use probabilities::{
    generation_probabilities, write_generation_probabilities, ModelProbability,
};

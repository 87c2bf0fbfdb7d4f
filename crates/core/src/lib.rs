//! # Core Fitting Crate
//!
//! The `sedfit-core` crate provides the machinery for genetic-algorithm
//! SED fitting: free-parameter definitions, the genetic engine and its
//! operators, ski templates, flat-file tables, simulation launching,
//! chi-squared evaluation, and the fitting-run bookkeeping that ties them
//! together across CLI invocations.

pub mod engine;
pub mod errors;
pub mod evolution;
pub mod genome;
pub mod launch;
pub mod params;
pub mod prelude;
pub mod run;
pub mod sed;
pub mod ski;
pub mod storage;
pub mod tables;

pub use engine::GeneticEngine;
pub use params::{FreeParameter, ParameterRange, ParameterScale, ParameterSet};
pub use run::FittingRun;

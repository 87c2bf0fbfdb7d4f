//! Commonly used imports for convenience.
//!
//! # Example
//!
//! ```
//! use sedfit_core::prelude::*;
//!
//! let range = ParameterRange::new(1e5, 1e9).unwrap();
//! ```

pub use crate::errors;
pub use crate::engine::GeneticEngine;
pub use crate::evolution::{
    CrossoverConfig, CrossoverModel, GeneticSettings, MutationConfig, MutationModel,
    SelectionConfig, SelectionModel,
};
pub use crate::genome::{Genome, Individual};
pub use crate::launch::{ExternalRunner, SimulationJob, SimulationRunner, SimulatorConfig};
pub use crate::params::{FreeParameter, ParameterRange, ParameterScale, ParameterSet};
pub use crate::run::{FitConfig, FittingRun, Generation, GenerationInfo};
pub use crate::sed::{ObservedSed, SimulatedSed};
pub use crate::ski::SkiTemplate;

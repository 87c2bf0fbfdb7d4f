//! Genetic operators for the parameter search.
//!
//! The engine breeds a new generation from a scored one with selection,
//! crossover, mutation, and elitism. All operators work in *scaled* space
//! (see [`crate::params::ParameterScale`]) so that log-scale parameters are
//! explored per decade rather than per unit.

mod crossover;
mod elitism;
mod mutation;
mod selection;

pub use crossover::{CrossoverConfig, CrossoverModel};
pub use elitism::Elitism;
pub use mutation::{MutationConfig, MutationModel};
pub use selection::{SelectionConfig, SelectionModel};

use crate::errors::EngineError;
use serde::{Deserialize, Serialize};

/// Genetic-algorithm settings for a fitting run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneticSettings {
    /// Individuals (and hence simulations) per generation.
    pub population_size: usize,
    pub mutation: MutationConfig,
    pub crossover: CrossoverConfig,
    pub selection: SelectionConfig,
    /// Number of best parents carried unchanged into the next generation.
    pub n_elites: usize,
}

impl GeneticSettings {
    /// Validate the settings as a whole.
    ///
    /// Elites must leave room for bred offspring, and the population must be
    /// large enough for the selection model to pick distinct parents.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.population_size < 2 {
            return Err(EngineError::PopulationTooSmall {
                size: self.population_size,
                required: 2,
            });
        }
        if self.n_elites >= self.population_size {
            return Err(EngineError::NonPositive(
                "population size minus elites",
                (self.population_size as f64) - (self.n_elites as f64),
            ));
        }
        if let SelectionModel::Tournament { size } = self.selection.model {
            if size > self.population_size {
                return Err(EngineError::PopulationTooSmall {
                    size: self.population_size,
                    required: size,
                });
            }
        }
        Ok(())
    }
}

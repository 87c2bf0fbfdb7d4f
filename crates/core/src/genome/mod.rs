//! Candidate models: genomes and individuals.

mod individual;

pub use individual::Individual;

use crate::params::ParameterSet;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A candidate parameter vector.
///
/// Genes are physical parameter values, matched by position to the free
/// parameters of the run. A genome carries no knowledge of ranges or scales;
/// the genetic operators consult the [`ParameterSet`] for that.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Genome {
    values: Vec<f64>,
}

impl Genome {
    /// Create a genome from physical parameter values.
    pub fn new(values: Vec<f64>) -> Self {
        Self { values }
    }

    /// Number of genes.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Gene value by position.
    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }

    /// All gene values in parameter order.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Mutable access to the gene values.
    pub fn values_mut(&mut self) -> &mut [f64] {
        &mut self.values
    }

    /// Clamp every gene into its parameter range.
    pub fn clamp_to(&mut self, parameters: &ParameterSet) {
        for (index, value) in self.values.iter_mut().enumerate() {
            *value = parameters.at(index).range.clamp(*value);
        }
    }
}

impl fmt::Display for Genome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, value) in self.values.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{value}")?;
        }
        write!(f, ")")
    }
}

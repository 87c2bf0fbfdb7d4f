use crate::errors::ScoreError;
use crate::genome::Genome;
use serde::{Deserialize, Serialize};

/// A candidate model: a named genome with a write-once chi-squared score.
///
/// An individual is created unscored when a generation is bred. Its score is
/// set exactly once, after the corresponding simulation has been evaluated
/// against the observed SED. Overwriting a score is an error: scored
/// individuals are immutable records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Individual {
    /// Unique name within the engine population.
    name: String,
    /// Candidate parameter vector.
    genome: Genome,
    /// Chi-squared score. `None` until the simulation is evaluated.
    chi_squared: Option<f64>,
}

impl Individual {
    /// Create a new, unscored individual.
    pub fn new(name: impl Into<String>, genome: Genome) -> Self {
        Self {
            name: name.into(),
            genome,
            chi_squared: None,
        }
    }

    /// The individual's name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Borrow the genome (read-only).
    #[inline]
    pub fn genome(&self) -> &Genome {
        &self.genome
    }

    /// The chi-squared score, if the individual has been evaluated.
    #[inline]
    pub fn chi_squared(&self) -> Option<f64> {
        self.chi_squared
    }

    /// Whether the individual has been evaluated.
    #[inline]
    pub fn is_scored(&self) -> bool {
        self.chi_squared.is_some()
    }

    /// Set the chi-squared score.
    ///
    /// Fails if the individual is already scored or the value is not finite.
    pub fn set_chi_squared(&mut self, value: f64) -> Result<(), ScoreError> {
        if !value.is_finite() {
            return Err(ScoreError::InvalidScore(value));
        }
        if self.chi_squared.is_some() {
            return Err(ScoreError::AlreadyScored(self.name.clone()));
        }
        self.chi_squared = Some(value);
        Ok(())
    }
}

//! Per-gene mutation of candidate parameter vectors.

use crate::errors::EngineError;
use crate::genome::Genome;
use crate::params::ParameterSet;
use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

/// How a selected gene is perturbed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MutationModel {
    /// Redraw the gene uniformly within its (scaled) parameter range.
    Uniform,
    /// Perturb the gene with Gaussian noise whose sigma is this fraction of
    /// the (scaled) range width.
    Gaussian { sigma_fraction: f64 },
}

/// Mutation settings: a per-gene rate and a perturbation model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MutationConfig {
    /// Probability that each gene mutates.
    pub rate: f64,
    pub model: MutationModel,
}

impl MutationConfig {
    /// Uniform-redraw mutation with the given per-gene rate.
    pub fn uniform(rate: f64) -> Result<Self, EngineError> {
        Self::new(rate, MutationModel::Uniform)
    }

    /// Gaussian mutation with the given per-gene rate and sigma fraction.
    pub fn gaussian(rate: f64, sigma_fraction: f64) -> Result<Self, EngineError> {
        Self::new(rate, MutationModel::Gaussian { sigma_fraction })
    }

    /// Create a mutation configuration, validating the rate and model.
    pub fn new(rate: f64, model: MutationModel) -> Result<Self, EngineError> {
        if !(0.0..=1.0).contains(&rate) {
            return Err(EngineError::InvalidRate("mutation rate", rate));
        }
        if let MutationModel::Gaussian { sigma_fraction } = model {
            if sigma_fraction <= 0.0 || !sigma_fraction.is_finite() {
                return Err(EngineError::NonPositive("mutation sigma fraction", sigma_fraction));
            }
        }
        Ok(Self { rate, model })
    }

    /// Mutate a genome in place.
    ///
    /// Each gene mutates independently with probability `rate`. The result
    /// always stays within the parameter ranges.
    pub fn mutate<R: Rng + ?Sized>(
        &self,
        genome: &mut Genome,
        parameters: &ParameterSet,
        rng: &mut R,
    ) {
        for index in 0..genome.len() {
            if rng.random::<f64>() >= self.rate {
                continue;
            }
            let parameter = parameters.at(index);
            let scaled_range = parameter.scaled_range();
            let current = parameter.to_scaled(genome.values()[index]);

            let mutated = match self.model {
                MutationModel::Uniform => {
                    rng.random_range(scaled_range.min..=scaled_range.max)
                }
                MutationModel::Gaussian { sigma_fraction } => {
                    let sigma = sigma_fraction * scaled_range.span();
                    // Sigma is positive by construction, so unwrap is safe.
                    let normal = Normal::new(0.0, sigma).unwrap();
                    current + normal.sample(rng)
                }
            };

            genome.values_mut()[index] = parameter.from_scaled(mutated);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{FreeParameter, ParameterRange, ParameterScale};
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    fn parameters() -> ParameterSet {
        ParameterSet::new(vec![
            FreeParameter::new(
                "a",
                "",
                None,
                ParameterRange::new(0.0, 1.0).unwrap(),
                ParameterScale::Linear,
                3,
            )
            .unwrap(),
            FreeParameter::new(
                "b",
                "",
                None,
                ParameterRange::new(1.0, 1e6).unwrap(),
                ParameterScale::Log,
                3,
            )
            .unwrap(),
        ])
        .unwrap()
    }

    #[test]
    fn test_invalid_rate_rejected() {
        assert!(MutationConfig::uniform(-0.1).is_err());
        assert!(MutationConfig::uniform(1.1).is_err());
        assert!(MutationConfig::uniform(0.5).is_ok());
    }

    #[test]
    fn test_invalid_sigma_rejected() {
        assert!(MutationConfig::gaussian(0.1, 0.0).is_err());
        assert!(MutationConfig::gaussian(0.1, -1.0).is_err());
        assert!(MutationConfig::gaussian(0.1, 0.1).is_ok());
    }

    #[test]
    fn test_zero_rate_never_mutates() {
        let config = MutationConfig::uniform(0.0).unwrap();
        let parameters = parameters();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(1);
        let mut genome = Genome::new(vec![0.5, 1000.0]);
        config.mutate(&mut genome, &parameters, &mut rng);
        assert_eq!(genome.values(), &[0.5, 1000.0]);
    }

    #[test]
    fn test_full_rate_stays_in_range() {
        let config = MutationConfig::gaussian(1.0, 0.5).unwrap();
        let parameters = parameters();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(7);
        let mut genome = Genome::new(vec![0.5, 1000.0]);
        for _ in 0..100 {
            config.mutate(&mut genome, &parameters, &mut rng);
            assert!(parameters.at(0).range.contains(genome.values()[0]));
            assert!(parameters.at(1).range.contains(genome.values()[1]));
        }
    }

    #[test]
    fn test_uniform_mutation_changes_genes() {
        let config = MutationConfig::uniform(1.0).unwrap();
        let parameters = parameters();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(42);
        let mut genome = Genome::new(vec![0.5, 1000.0]);
        config.mutate(&mut genome, &parameters, &mut rng);
        // With a continuous redraw, staying exactly put has probability zero.
        assert_ne!(genome.values(), &[0.5, 1000.0]);
    }
}

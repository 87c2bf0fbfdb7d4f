//! Crossover operators combining two parent genomes.

use crate::errors::EngineError;
use crate::genome::Genome;
use crate::params::ParameterSet;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// How two parents are combined into two children.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CrossoverModel {
    /// Swap the tails after a random cut point.
    OnePoint,
    /// Swap each gene independently with probability one half.
    Uniform,
    /// BLX-alpha: sample each child gene uniformly from the interval spanned
    /// by the parents, extended by `alpha` times its width on both sides.
    Blend { alpha: f64 },
}

/// Crossover settings: an application rate and a combination model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrossoverConfig {
    /// Probability that a selected pair is actually crossed; otherwise the
    /// parents are cloned unchanged.
    pub rate: f64,
    pub model: CrossoverModel,
}

impl CrossoverConfig {
    /// Create a crossover configuration, validating the rate and model.
    pub fn new(rate: f64, model: CrossoverModel) -> Result<Self, EngineError> {
        if !(0.0..=1.0).contains(&rate) {
            return Err(EngineError::InvalidRate("crossover rate", rate));
        }
        if let CrossoverModel::Blend { alpha } = model {
            if alpha < 0.0 || !alpha.is_finite() {
                return Err(EngineError::NonPositive("blend alpha", alpha));
            }
        }
        Ok(Self { rate, model })
    }

    /// Combine two parents into two children.
    ///
    /// Works in scaled space and clamps the children back into the parameter
    /// ranges, so blend crossover cannot escape the search domain.
    pub fn cross<R: Rng + ?Sized>(
        &self,
        parent1: &Genome,
        parent2: &Genome,
        parameters: &ParameterSet,
        rng: &mut R,
    ) -> (Genome, Genome) {
        // One-point needs a cut position strictly inside the genome.
        let too_short = self.model == CrossoverModel::OnePoint && parent1.len() < 2;
        if rng.random::<f64>() >= self.rate || too_short {
            return (parent1.clone(), parent2.clone());
        }

        let n = parent1.len();
        let mut child1 = parent1.values().to_vec();
        let mut child2 = parent2.values().to_vec();

        match self.model {
            CrossoverModel::OnePoint => {
                let cut = rng.random_range(1..n);
                for i in cut..n {
                    std::mem::swap(&mut child1[i], &mut child2[i]);
                }
            }
            CrossoverModel::Uniform => {
                for i in 0..n {
                    if rng.random::<f64>() < 0.5 {
                        std::mem::swap(&mut child1[i], &mut child2[i]);
                    }
                }
            }
            CrossoverModel::Blend { alpha } => {
                for i in 0..n {
                    let parameter = parameters.at(i);
                    let a = parameter.to_scaled(child1[i]);
                    let b = parameter.to_scaled(child2[i]);
                    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
                    let extent = (hi - lo) * alpha;
                    let min = lo - extent;
                    let max = hi + extent;
                    child1[i] = parameter.from_scaled(rng.random_range(min..=max));
                    child2[i] = parameter.from_scaled(rng.random_range(min..=max));
                }
            }
        }

        let mut genome1 = Genome::new(child1);
        let mut genome2 = Genome::new(child2);
        genome1.clamp_to(parameters);
        genome2.clamp_to(parameters);
        (genome1, genome2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{FreeParameter, ParameterRange, ParameterScale};
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    fn parameters(n: usize) -> ParameterSet {
        let parameters = (0..n)
            .map(|i| {
                FreeParameter::new(
                    format!("p{i}"),
                    "",
                    None,
                    ParameterRange::new(0.0, 10.0).unwrap(),
                    ParameterScale::Linear,
                    3,
                )
                .unwrap()
            })
            .collect();
        ParameterSet::new(parameters).unwrap()
    }

    #[test]
    fn test_invalid_rate_rejected() {
        assert!(CrossoverConfig::new(1.5, CrossoverModel::OnePoint).is_err());
        assert!(CrossoverConfig::new(-0.1, CrossoverModel::Uniform).is_err());
    }

    #[test]
    fn test_invalid_alpha_rejected() {
        assert!(CrossoverConfig::new(0.5, CrossoverModel::Blend { alpha: -0.5 }).is_err());
        assert!(CrossoverConfig::new(0.5, CrossoverModel::Blend { alpha: 0.5 }).is_ok());
    }

    #[test]
    fn test_zero_rate_clones_parents() {
        let config = CrossoverConfig::new(0.0, CrossoverModel::OnePoint).unwrap();
        let parameters = parameters(3);
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(3);
        let p1 = Genome::new(vec![1.0, 2.0, 3.0]);
        let p2 = Genome::new(vec![4.0, 5.0, 6.0]);
        let (c1, c2) = config.cross(&p1, &p2, &parameters, &mut rng);
        assert_eq!(c1, p1);
        assert_eq!(c2, p2);
    }

    #[test]
    fn test_one_point_preserves_gene_multiset() {
        let config = CrossoverConfig::new(1.0, CrossoverModel::OnePoint).unwrap();
        let parameters = parameters(4);
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(11);
        let p1 = Genome::new(vec![1.0, 2.0, 3.0, 4.0]);
        let p2 = Genome::new(vec![5.0, 6.0, 7.0, 8.0]);
        let (c1, c2) = config.cross(&p1, &p2, &parameters, &mut rng);
        // Per position, the two children hold the two parent genes.
        for i in 0..4 {
            let pair = [c1.values()[i], c2.values()[i]];
            assert!(pair.contains(&p1.values()[i]));
            assert!(pair.contains(&p2.values()[i]));
        }
    }

    #[test]
    fn test_blend_stays_in_range() {
        let config = CrossoverConfig::new(1.0, CrossoverModel::Blend { alpha: 1.0 }).unwrap();
        let parameters = parameters(2);
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(5);
        let p1 = Genome::new(vec![0.5, 9.5]);
        let p2 = Genome::new(vec![9.5, 0.5]);
        for _ in 0..100 {
            let (c1, c2) = config.cross(&p1, &p2, &parameters, &mut rng);
            for genome in [&c1, &c2] {
                for (i, value) in genome.values().iter().enumerate() {
                    assert!(parameters.at(i).range.contains(*value));
                }
            }
        }
    }

    #[test]
    fn test_single_gene_genome_is_cloned() {
        let config = CrossoverConfig::new(1.0, CrossoverModel::OnePoint).unwrap();
        let parameters = parameters(1);
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(9);
        let p1 = Genome::new(vec![1.0]);
        let p2 = Genome::new(vec![2.0]);
        let (c1, c2) = config.cross(&p1, &p2, &parameters, &mut rng);
        assert_eq!(c1, p1);
        assert_eq!(c2, p2);
    }
}

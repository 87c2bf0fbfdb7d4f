//! Parent selection from a scored population.
//!
//! Lower chi-squared means a better fit, so selection minimizes. Both models
//! expect a fully scored population; the engine enforces that before
//! breeding.

use crate::errors::EngineError;
use crate::genome::Individual;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// How parents are picked from the scored population.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SelectionModel {
    /// Draw `size` distinct individuals at random and keep the best.
    Tournament { size: usize },
    /// Fitness-proportional sampling on `1 / (1 + chi_squared)`.
    Roulette,
}

/// Selection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionConfig {
    pub model: SelectionModel,
}

impl SelectionConfig {
    /// Tournament selection with the given tournament size (at least 2).
    pub fn tournament(size: usize) -> Result<Self, EngineError> {
        if size < 2 {
            return Err(EngineError::NonPositive("tournament size minus one", size as f64 - 1.0));
        }
        Ok(Self {
            model: SelectionModel::Tournament { size },
        })
    }

    /// Roulette-wheel selection on inverse chi-squared.
    pub fn roulette() -> Self {
        Self {
            model: SelectionModel::Roulette,
        }
    }

    /// Pick one parent index from a fully scored population.
    pub fn select<R: Rng + ?Sized>(
        &self,
        population: &[Individual],
        rng: &mut R,
    ) -> Result<usize, EngineError> {
        if population.is_empty() {
            return Err(EngineError::PopulationTooSmall { size: 0, required: 1 });
        }
        let unscored = population.iter().filter(|ind| !ind.is_scored()).count();
        if unscored > 0 {
            return Err(EngineError::UnscoredIndividuals(unscored));
        }

        match self.model {
            SelectionModel::Tournament { size } => {
                // Partial Fisher-Yates shuffle; the first `size` entries are
                // distinct contestants.
                let mut indices: Vec<usize> = (0..population.len()).collect();
                let size = size.min(indices.len());
                let first = rng.random_range(0..indices.len());
                indices.swap(0, first);
                let mut best = indices[0];
                for i in 1..size {
                    let next = rng.random_range(i..indices.len());
                    indices.swap(i, next);
                    let challenger = indices[i];
                    // Scores checked above, so unwrap is safe.
                    if population[challenger].chi_squared().unwrap()
                        < population[best].chi_squared().unwrap()
                    {
                        best = challenger;
                    }
                }
                Ok(best)
            }
            SelectionModel::Roulette => {
                let weights: Vec<f64> = population
                    .iter()
                    .map(|ind| 1.0 / (1.0 + ind.chi_squared().unwrap().max(0.0)))
                    .collect();
                let total: f64 = weights.iter().sum();
                let mut threshold = rng.random::<f64>() * total;
                for (index, weight) in weights.iter().enumerate() {
                    threshold -= weight;
                    if threshold <= 0.0 {
                        return Ok(index);
                    }
                }
                // Floating-point slack lands on the last individual.
                Ok(population.len() - 1)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genome::Genome;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    fn scored_population(scores: &[f64]) -> Vec<Individual> {
        scores
            .iter()
            .enumerate()
            .map(|(i, &score)| {
                let mut ind = Individual::new(format!("ind{i}"), Genome::new(vec![i as f64]));
                ind.set_chi_squared(score).unwrap();
                ind
            })
            .collect()
    }

    #[test]
    fn test_tournament_size_validation() {
        assert!(SelectionConfig::tournament(1).is_err());
        assert!(SelectionConfig::tournament(2).is_ok());
    }

    #[test]
    fn test_selection_rejects_unscored_population() {
        let mut population = scored_population(&[1.0, 2.0]);
        population.push(Individual::new("fresh", Genome::new(vec![0.0])));
        let config = SelectionConfig::tournament(2).unwrap();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(0);
        assert!(matches!(
            config.select(&population, &mut rng),
            Err(EngineError::UnscoredIndividuals(1))
        ));
    }

    #[test]
    fn test_tournament_prefers_lower_chi_squared() {
        // One individual is far better; in a tournament of three out of four
        // it wins whenever it is drawn.
        let population = scored_population(&[100.0, 100.0, 100.0, 0.1]);
        let config = SelectionConfig::tournament(3).unwrap();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(13);

        let mut wins = 0;
        for _ in 0..200 {
            if config.select(&population, &mut rng).unwrap() == 3 {
                wins += 1;
            }
        }
        // Drawn with probability 3/4, so roughly 150 expected wins.
        assert!(wins > 120, "best individual won only {wins}/200 tournaments");
    }

    #[test]
    fn test_tournament_contestants_are_distinct() {
        // A tournament spanning the whole population must always return the
        // best individual, since every contestant is distinct.
        let population = scored_population(&[100.0, 100.0, 100.0, 0.1]);
        let config = SelectionConfig::tournament(4).unwrap();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(13);

        for _ in 0..200 {
            assert_eq!(config.select(&population, &mut rng).unwrap(), 3);
        }
    }

    #[test]
    fn test_roulette_prefers_lower_chi_squared() {
        let population = scored_population(&[0.0, 99.0]);
        let config = SelectionConfig::roulette();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(21);

        let mut best_picks = 0;
        for _ in 0..500 {
            if config.select(&population, &mut rng).unwrap() == 0 {
                best_picks += 1;
            }
        }
        // Weights are 1.0 vs 0.01, so the best should be picked ~99% of the time.
        assert!(best_picks > 450, "best individual picked {best_picks}/500 times");
    }

    #[test]
    fn test_empty_population_is_an_error() {
        let config = SelectionConfig::roulette();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(1);
        assert!(config.select(&[], &mut rng).is_err());
    }
}

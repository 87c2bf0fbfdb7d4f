//! The genetic engine driving the parameter search.
//!
//! Unlike an in-process optimizer, the engine never evaluates candidates
//! itself: a generation is bred, persisted, and handed off to the external
//! simulator; scores come back through [`GeneticEngine::set_score`] in a
//! later invocation. The full engine state, including the RNG, is serialized
//! between invocations so a seeded run is reproducible across process
//! boundaries.

use crate::errors::{EngineError, ScoreError};
use crate::evolution::{Elitism, GeneticSettings};
use crate::genome::{Genome, Individual};
use crate::params::ParameterSet;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Genetic engine state for one fitting run.
#[derive(Debug, Serialize, Deserialize)]
pub struct GeneticEngine {
    /// Free parameters being explored.
    parameters: ParameterSet,
    /// Genetic-algorithm settings.
    settings: GeneticSettings,
    /// Current population, in breeding order.
    population: Vec<Individual>,
    /// Population counter: 0 for the initial population.
    generation: usize,
    /// Engine RNG, serialized with the state for cross-invocation
    /// reproducibility.
    rng: Xoshiro256PlusPlus,
}

impl GeneticEngine {
    /// Create an engine with an initial random population.
    ///
    /// Genomes are sampled uniformly within each parameter's scaled range
    /// (log-uniform for log-scale parameters).
    pub fn new(
        parameters: ParameterSet,
        settings: GeneticSettings,
        seed: Option<u64>,
    ) -> Result<Self, EngineError> {
        settings.validate()?;

        let mut rng = match seed {
            Some(seed) => Xoshiro256PlusPlus::seed_from_u64(seed),
            None => Xoshiro256PlusPlus::from_seed(rand::rng().random()),
        };

        let population = (0..settings.population_size)
            .map(|i| {
                let genome = sample_genome(&parameters, &mut rng);
                Individual::new(format!("g0_ind{i}"), genome)
            })
            .collect();

        Ok(Self {
            parameters,
            settings,
            population,
            generation: 0,
            rng,
        })
    }

    /// The current population.
    pub fn population(&self) -> &[Individual] {
        &self.population
    }

    /// The population counter (0 for the initial population).
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// The free parameters being explored.
    pub fn parameters(&self) -> &ParameterSet {
        &self.parameters
    }

    /// The genetic-algorithm settings.
    pub fn settings(&self) -> &GeneticSettings {
        &self.settings
    }

    /// Set the chi-squared score of a named individual.
    pub fn set_score(&mut self, name: &str, chi_squared: f64) -> Result<(), EngineError> {
        let individual = self
            .population
            .iter_mut()
            .find(|ind| ind.name() == name)
            .ok_or_else(|| ScoreError::UnknownIndividual(name.to_string()))?;
        individual.set_chi_squared(chi_squared)?;
        Ok(())
    }

    /// Number of individuals still waiting for a score.
    pub fn n_unscored(&self) -> usize {
        self.population.iter().filter(|ind| !ind.is_scored()).count()
    }

    /// Whether every individual has been scored.
    pub fn all_scored(&self) -> bool {
        self.n_unscored() == 0
    }

    /// The best (lowest chi-squared) scored individual, if any.
    pub fn best(&self) -> Option<&Individual> {
        self.population
            .iter()
            .filter_map(|ind| ind.chi_squared().map(|chi| (ind, chi)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(ind, _)| ind)
    }

    /// Breed the next population from the fully scored current one.
    ///
    /// Selection, crossover, and mutation produce `population_size` fresh
    /// unscored offspring; the best `n_elites` parents then displace the
    /// last offspring slots (genome only; elites are re-simulated, so every
    /// individual of a generation maps to a simulation). Returns the elitism
    /// replacement records.
    pub fn generate_new_population(&mut self) -> Result<Vec<Elitism>, EngineError> {
        let unscored = self.n_unscored();
        if unscored > 0 {
            return Err(EngineError::UnscoredIndividuals(unscored));
        }

        let size = self.settings.population_size;
        let next = self.generation + 1;
        let mut offspring: Vec<Individual> = Vec::with_capacity(size + 1);

        while offspring.len() < size {
            let index1 = self.settings.selection.select(&self.population, &mut self.rng)?;
            // No self-pairing: redraw the second parent until distinct.
            let index2 = loop {
                let candidate = self.settings.selection.select(&self.population, &mut self.rng)?;
                if candidate != index1 {
                    break candidate;
                }
            };

            let (mut genome1, mut genome2) = self.settings.crossover.cross(
                self.population[index1].genome(),
                self.population[index2].genome(),
                &self.parameters,
                &mut self.rng,
            );
            self.settings.mutation.mutate(&mut genome1, &self.parameters, &mut self.rng);
            self.settings.mutation.mutate(&mut genome2, &self.parameters, &mut self.rng);

            let i = offspring.len();
            offspring.push(Individual::new(format!("g{next}_ind{i}"), genome1));
            let i = offspring.len();
            offspring.push(Individual::new(format!("g{next}_ind{i}"), genome2));
        }
        offspring.truncate(size);

        // Elites: best parents, ascending chi-squared. All parents are
        // scored at this point, checked above.
        let mut ranked: Vec<(usize, f64)> = self
            .population
            .iter()
            .enumerate()
            .filter_map(|(i, ind)| ind.chi_squared().map(|chi| (i, chi)))
            .collect();
        ranked.sort_by(|a, b| a.1.total_cmp(&b.1));

        let mut records = Vec::with_capacity(self.settings.n_elites);
        for (rank, &(parent, chi)) in ranked.iter().take(self.settings.n_elites).enumerate() {
            let slot = size - 1 - rank;
            let elite = &self.population[parent];
            let displaced = offspring[slot].name().to_string();
            records.push(Elitism {
                index: slot,
                replaced: displaced.clone(),
                replacement: elite.name().to_string(),
                replacement_chi_squared: chi,
            });
            offspring[slot] = Individual::new(displaced, elite.genome().clone());
        }

        self.population = offspring;
        self.generation = next;
        Ok(records)
    }

    /// Persist the engine state (population, settings, RNG) to a file.
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<(), EngineError> {
        let bytes = bincode::serialize(self).map_err(|e| EngineError::State(e.to_string()))?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// Load an engine state previously written with [`Self::save_to`].
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let bytes = std::fs::read(path)?;
        bincode::deserialize(&bytes).map_err(|e| EngineError::State(e.to_string()))
    }
}

/// Sample a genome uniformly within the scaled parameter ranges.
fn sample_genome<R: Rng + ?Sized>(parameters: &ParameterSet, rng: &mut R) -> Genome {
    let values = parameters
        .parameters()
        .iter()
        .map(|parameter| {
            let scaled = parameter.scaled_range();
            parameter.from_scaled(rng.random_range(scaled.min..=scaled.max))
        })
        .collect();
    Genome::new(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evolution::{CrossoverConfig, CrossoverModel, MutationConfig, SelectionConfig};
    use crate::params::{FreeParameter, ParameterRange, ParameterScale};

    fn parameters() -> ParameterSet {
        ParameterSet::new(vec![
            FreeParameter::new(
                "mass",
                "dust mass",
                Some("Msun".into()),
                ParameterRange::new(1e5, 1e9).unwrap(),
                ParameterScale::Log,
                4,
            )
            .unwrap(),
            FreeParameter::new(
                "fraction",
                "young stellar fraction",
                None,
                ParameterRange::new(0.0, 1.0).unwrap(),
                ParameterScale::Linear,
                3,
            )
            .unwrap(),
        ])
        .unwrap()
    }

    fn settings() -> GeneticSettings {
        GeneticSettings {
            population_size: 8,
            mutation: MutationConfig::gaussian(0.1, 0.1).unwrap(),
            crossover: CrossoverConfig::new(0.7, CrossoverModel::Uniform).unwrap(),
            selection: SelectionConfig::tournament(3).unwrap(),
            n_elites: 2,
        }
    }

    fn engine() -> GeneticEngine {
        GeneticEngine::new(parameters(), settings(), Some(42)).unwrap()
    }

    fn score_all(engine: &mut GeneticEngine) {
        let names: Vec<String> =
            engine.population().iter().map(|ind| ind.name().to_string()).collect();
        for (i, name) in names.iter().enumerate() {
            engine.set_score(name, 10.0 + i as f64).unwrap();
        }
    }

    #[test]
    fn test_initial_population_in_ranges() {
        let engine = engine();
        assert_eq!(engine.population().len(), 8);
        assert_eq!(engine.generation(), 0);
        for ind in engine.population() {
            assert!(!ind.is_scored());
            for (i, value) in ind.genome().values().iter().enumerate() {
                assert!(engine.parameters().at(i).range.contains(*value));
            }
        }
    }

    #[test]
    fn test_seeded_engines_are_deterministic() {
        let a = GeneticEngine::new(parameters(), settings(), Some(7)).unwrap();
        let b = GeneticEngine::new(parameters(), settings(), Some(7)).unwrap();
        for (x, y) in a.population().iter().zip(b.population()) {
            assert_eq!(x.genome(), y.genome());
        }
    }

    #[test]
    fn test_set_score_unknown_name() {
        let mut engine = engine();
        let err = engine.set_score("nobody", 1.0).unwrap_err();
        assert!(matches!(err, EngineError::Score(ScoreError::UnknownIndividual(_))));
    }

    #[test]
    fn test_breeding_requires_all_scores() {
        let mut engine = engine();
        let first = engine.population()[0].name().to_string();
        engine.set_score(&first, 1.0).unwrap();
        assert!(matches!(
            engine.generate_new_population(),
            Err(EngineError::UnscoredIndividuals(7))
        ));
    }

    #[test]
    fn test_breeding_produces_unscored_generation() {
        let mut engine = engine();
        score_all(&mut engine);

        let records = engine.generate_new_population().unwrap();
        assert_eq!(engine.generation(), 1);
        assert_eq!(engine.population().len(), 8);
        assert_eq!(records.len(), 2);
        assert_eq!(engine.n_unscored(), 8);

        // Offspring names are unique and follow the generation prefix.
        let mut names: Vec<&str> = engine.population().iter().map(|i| i.name()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), 8);
        assert!(names.iter().all(|n| n.starts_with("g1_")));
    }

    #[test]
    fn test_elitism_carries_best_genome() {
        let mut engine = engine();
        score_all(&mut engine);
        // Scores are 10, 11, 12, ... so the first individual is the best.
        let best_genome = engine.population()[0].genome().clone();
        let best_name = engine.population()[0].name().to_string();

        let records = engine.generate_new_population().unwrap();
        let top = &records[0];
        assert_eq!(top.replacement, best_name);
        assert_eq!(top.replacement_chi_squared, 10.0);
        assert_eq!(engine.population()[top.index].genome(), &best_genome);
    }

    #[test]
    fn test_best_tracks_lowest_score() {
        let mut engine = engine();
        assert!(engine.best().is_none());
        score_all(&mut engine);
        assert_eq!(engine.best().unwrap().chi_squared(), Some(10.0));
    }

    #[test]
    fn test_state_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("engine.bin");

        let mut engine = engine();
        score_all(&mut engine);
        engine.save_to(&path).unwrap();

        let mut restored = GeneticEngine::load_from(&path).unwrap();
        assert_eq!(restored.generation(), engine.generation());
        for (a, b) in restored.population().iter().zip(engine.population()) {
            assert_eq!(a.name(), b.name());
            assert_eq!(a.genome(), b.genome());
            assert_eq!(a.chi_squared(), b.chi_squared());
        }

        // Both engines continue identically from the restored RNG state.
        let records_a = engine.generate_new_population().unwrap();
        let records_b = restored.generate_new_population().unwrap();
        assert_eq!(records_a, records_b);
        for (a, b) in engine.population().iter().zip(restored.population()) {
            assert_eq!(a.genome(), b.genome());
        }
    }
}

//! Creating the next generation of a fitting run.

use crate::engine::GeneticEngine;
use crate::errors::RunError;
use crate::run::generation::{Generation, GenerationInfo, GenerationMethod};
use crate::run::{generation_name_for_index, FittingRun};
use crate::tables::{timestamp, ElitismTable, IndividualsTable, ParametersTable};
use std::fs;

/// What an exploration step produced.
#[derive(Debug)]
pub struct ExplorationSummary {
    pub generation_name: String,
    pub index: i64,
    pub nsimulations: usize,
    pub n_elitism: usize,
}

/// Create the next generation of the run.
///
/// With no generation yet, samples the `initial` population at random.
/// Otherwise the previous generation must be finished; its engine state is
/// reloaded, the recorded scores are fed back, and a new population is bred.
/// Writes the generation directory with its info record, tables, ski files,
/// and engine state, then registers the generation in the run's table.
pub fn explore(run: &FittingRun) -> Result<ExplorationSummary, RunError> {
    let config = run.config();
    let mut generations = run.generations_table()?;

    let (mut engine, index, method, elitism) = match run.last_generation()? {
        None => {
            let engine = GeneticEngine::new(
                config.parameters.clone(),
                config.genetic.clone(),
                config.seed,
            )?;
            (engine, -1, GenerationMethod::Random, Vec::new())
        }
        Some(previous) => {
            if !previous.is_finished()? {
                return Err(RunError::UnfinishedGeneration(previous.name().to_string()));
            }
            let mut engine = GeneticEngine::load_from(previous.engine_path())?;
            feed_scores(&mut engine, &previous)?;
            let elitism = engine.generate_new_population()?;
            let index = previous.info().index + 1;
            (engine, index, GenerationMethod::Genetic, elitism)
        }
    };

    let name = generation_name_for_index(index);
    let nsimulations = engine.population().len();
    let generation = Generation::create(
        run.generation_path(&name),
        GenerationInfo {
            name: name.clone(),
            index,
            method,
            nsimulations,
            launching_time: timestamp(),
            finishing_time: None,
        },
    )?;

    let template = run.template()?;
    let mut individuals = IndividualsTable::new();
    let mut parameters = ParametersTable::new(&config.parameters);
    for (i, individual) in engine.population().iter().enumerate() {
        let simulation_name = format!("sim{i}");
        fs::create_dir_all(generation.simulation_dir(&simulation_name))?;
        template.write_instance(
            &config.parameters,
            individual.genome(),
            generation.ski_path(&simulation_name),
        )?;
        individuals.add_entry(individual.name(), &simulation_name)?;
        parameters.add_entry(&simulation_name, individual.genome().values().to_vec())?;
    }
    individuals.save(generation.individuals_path())?;
    parameters.save(generation.parameters_path())?;
    if method == GenerationMethod::Genetic {
        ElitismTable::new(elitism.clone()).save(generation.elitism_path())?;
    }
    engine.save_to(generation.engine_path())?;

    generations.add_entry(&name, index, nsimulations)?;
    generations.save(run.generations_table_path())?;

    Ok(ExplorationSummary {
        generation_name: name,
        index,
        nsimulations,
        n_elitism: elitism.len(),
    })
}

/// Feed the recorded chi-squared scores of a generation back into its engine.
fn feed_scores(engine: &mut GeneticEngine, generation: &Generation) -> Result<(), RunError> {
    let individuals = generation.individuals_table()?;
    let scores = generation.chi_squared_table()?;
    for row in individuals.rows() {
        let chi_squared = scores
            .chi_squared_for(&row.simulation_name)
            .ok_or_else(|| RunError::UnfinishedGeneration(generation.name().to_string()))?;
        engine.set_score(&row.individual_name, chi_squared)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evolution::{
        CrossoverConfig, CrossoverModel, GeneticSettings, MutationConfig, SelectionConfig,
    };
    use crate::launch::SimulatorConfig;
    use crate::params::{FreeParameter, ParameterRange, ParameterScale, ParameterSet};
    use crate::run::FitConfig;
    use crate::tables::ChiSquaredTable;
    use std::path::{Path, PathBuf};

    fn write_inputs(dir: &Path) -> (PathBuf, PathBuf) {
        let sed = dir.join("observed.dat");
        fs::write(
            &sed,
            "# Instrument\tBand\tWavelength\tFlux\tError\n\
             GALEX\tFUV\t0.153\t10\t1\nSDSS\tr\t0.616\t50\t2\nSPIRE\t250\t250\t30\t3\n",
        )
        .unwrap();
        let template = dir.join("template.ski");
        fs::write(&template, "mass=\"[[dust_mass]] Msun\"").unwrap();
        (sed, template)
    }

    fn test_config() -> FitConfig {
        FitConfig {
            run_name: "testrun".to_string(),
            parameters: ParameterSet::new(vec![FreeParameter::new(
                "dust_mass",
                "total dust mass",
                Some("Msun".to_string()),
                ParameterRange::new(1e5, 1e9).unwrap(),
                ParameterScale::Log,
                4,
            )
            .unwrap()])
            .unwrap(),
            genetic: GeneticSettings {
                population_size: 4,
                mutation: MutationConfig::uniform(0.1).unwrap(),
                crossover: CrossoverConfig::new(0.8, CrossoverModel::Uniform).unwrap(),
                selection: SelectionConfig::tournament(2).unwrap(),
                n_elites: 1,
            },
            simulator: SimulatorConfig {
                binary: PathBuf::from("/usr/bin/true"),
                nprocesses: 1,
                nthreads: 1,
                arguments: Vec::new(),
            },
            seed: Some(99),
        }
    }

    fn create_run(dir: &Path) -> FittingRun {
        let (sed, template) = write_inputs(dir);
        FittingRun::create(dir, test_config(), sed, template, None).unwrap()
    }

    #[test]
    fn test_initial_exploration() {
        let dir = tempfile::tempdir().unwrap();
        let run = create_run(dir.path());

        let summary = explore(&run).unwrap();
        assert_eq!(summary.generation_name, "initial");
        assert_eq!(summary.index, -1);
        assert_eq!(summary.nsimulations, 4);
        assert_eq!(summary.n_elitism, 0);

        let generation = run.generation("initial").unwrap();
        assert_eq!(generation.individuals_table().unwrap().len(), 4);
        assert_eq!(generation.parameters_table().unwrap().len(), 4);
        assert!(generation.engine_path().is_file());
        for i in 0..4 {
            let ski = fs::read_to_string(generation.ski_path(&format!("sim{i}"))).unwrap();
            assert!(!ski.contains("[["));
        }
    }

    #[test]
    fn test_explore_refuses_unfinished_previous() {
        let dir = tempfile::tempdir().unwrap();
        let run = create_run(dir.path());
        explore(&run).unwrap();

        assert!(matches!(
            explore(&run),
            Err(RunError::UnfinishedGeneration(name)) if name == "initial"
        ));
    }

    #[test]
    fn test_genetic_exploration_after_scoring() {
        let dir = tempfile::tempdir().unwrap();
        let run = create_run(dir.path());
        explore(&run).unwrap();

        let generation = run.generation("initial").unwrap();
        let mut scores = ChiSquaredTable::new();
        for i in 0..4 {
            scores.add_entry(format!("sim{i}"), 1.0 + i as f64).unwrap();
        }
        scores.save(generation.chi_squared_path()).unwrap();

        let summary = explore(&run).unwrap();
        assert_eq!(summary.generation_name, "Generation0");
        assert_eq!(summary.index, 0);
        assert_eq!(summary.n_elitism, 1);

        let bred = run.generation("Generation0").unwrap();
        assert_eq!(bred.info().method, GenerationMethod::Genetic);
        assert_eq!(bred.elitism_table().unwrap().len(), 1);
        assert!(!bred.is_finished().unwrap());

        let table = run.generations_table().unwrap();
        assert_eq!(table.generation_names(), vec!["initial", "Generation0"]);
    }
}

//! A single generation directory and its tables.

use crate::errors::RunError;
use crate::launch::SimulationJob;
use crate::tables::{
    ChiSquaredTable, ElitismTable, GenerationStatus, IndividualsTable, ParametersTable,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const INFO_FILE: &str = "info.json";
pub const ENGINE_FILE: &str = "engine.bin";
pub const INDIVIDUALS_FILE: &str = "individuals.dat";
pub const PARAMETERS_FILE: &str = "parameters.dat";
pub const CHI_SQUARED_FILE: &str = "chi_squared.dat";
pub const ELITISM_FILE: &str = "elitism.dat";
pub const SKI_FILE: &str = "model.ski";

/// How a generation's population was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GenerationMethod {
    /// Uniform random sampling within the parameter ranges.
    Random,
    /// Bred from the previous generation by the genetic engine.
    Genetic,
}

/// Descriptive record of a generation, stored as `info.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationInfo {
    pub name: String,
    /// -1 for the initial generation, 0, 1, 2, ... for genetic ones.
    pub index: i64,
    pub method: GenerationMethod,
    pub nsimulations: usize,
    pub launching_time: i64,
    pub finishing_time: Option<i64>,
}

/// Handle on one generation directory of a fitting run.
#[derive(Debug, Clone)]
pub struct Generation {
    path: PathBuf,
    info: GenerationInfo,
}

impl Generation {
    /// Create the generation directory and write its info record.
    pub fn create(path: impl Into<PathBuf>, info: GenerationInfo) -> Result<Self, RunError> {
        let path = path.into();
        fs::create_dir_all(&path)?;
        let generation = Self { path, info };
        generation.save_info()?;
        Ok(generation)
    }

    /// Open an existing generation directory.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, RunError> {
        let path = path.into();
        let info_path = path.join(INFO_FILE);
        if !info_path.is_file() {
            return Err(RunError::MissingFile(info_path));
        }
        let content = fs::read_to_string(&info_path)?;
        let info: GenerationInfo =
            serde_json::from_str(&content).map_err(|e| RunError::Config(e.to_string()))?;
        Ok(Self { path, info })
    }

    pub fn info(&self) -> &GenerationInfo {
        &self.info
    }

    pub fn name(&self) -> &str {
        &self.info.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn engine_path(&self) -> PathBuf {
        self.path.join(ENGINE_FILE)
    }

    pub fn individuals_path(&self) -> PathBuf {
        self.path.join(INDIVIDUALS_FILE)
    }

    pub fn parameters_path(&self) -> PathBuf {
        self.path.join(PARAMETERS_FILE)
    }

    pub fn chi_squared_path(&self) -> PathBuf {
        self.path.join(CHI_SQUARED_FILE)
    }

    pub fn elitism_path(&self) -> PathBuf {
        self.path.join(ELITISM_FILE)
    }

    /// Directory holding one simulation's ski file and output.
    pub fn simulation_dir(&self, simulation_name: &str) -> PathBuf {
        self.path.join(simulation_name)
    }

    pub fn ski_path(&self, simulation_name: &str) -> PathBuf {
        self.simulation_dir(simulation_name).join(SKI_FILE)
    }

    pub fn individuals_table(&self) -> Result<IndividualsTable, RunError> {
        Ok(IndividualsTable::load(self.individuals_path())?)
    }

    pub fn parameters_table(&self) -> Result<ParametersTable, RunError> {
        Ok(ParametersTable::load(self.parameters_path())?)
    }

    /// The chi-squared table; empty when nothing has been scored yet.
    pub fn chi_squared_table(&self) -> Result<ChiSquaredTable, RunError> {
        Ok(ChiSquaredTable::load_or_new(self.chi_squared_path())?)
    }

    pub fn elitism_table(&self) -> Result<ElitismTable, RunError> {
        Ok(ElitismTable::load(self.elitism_path())?)
    }

    /// Whether every simulation of this generation has been scored.
    ///
    /// Only scores for simulations listed in the individuals table count,
    /// so a stray chi-squared row cannot finish a generation early.
    pub fn status(&self) -> Result<GenerationStatus, RunError> {
        let individuals = self.individuals_table()?;
        let scores = self.chi_squared_table()?;
        let scored = individuals
            .rows()
            .iter()
            .filter(|row| scores.has_simulation(&row.simulation_name))
            .count();
        if scored >= self.info.nsimulations {
            Ok(GenerationStatus::Finished)
        } else {
            Ok(GenerationStatus::Unfinished)
        }
    }

    pub fn is_finished(&self) -> Result<bool, RunError> {
        Ok(self.status()? == GenerationStatus::Finished)
    }

    /// Launch jobs for every simulation of this generation, in table order.
    pub fn simulation_jobs(&self) -> Result<Vec<SimulationJob>, RunError> {
        let individuals = self.individuals_table()?;
        Ok(individuals
            .rows()
            .iter()
            .map(|row| SimulationJob {
                simulation_name: row.simulation_name.clone(),
                ski_path: self.ski_path(&row.simulation_name),
                output_dir: self.simulation_dir(&row.simulation_name),
            })
            .collect())
    }

    /// Simulations that produced output but have not been scored yet.
    pub fn unevaluated_jobs(&self) -> Result<Vec<SimulationJob>, RunError> {
        let scored = self.chi_squared_table()?;
        Ok(self
            .simulation_jobs()?
            .into_iter()
            .filter(|job| job.has_output() && !scored.has_simulation(&job.simulation_name))
            .collect())
    }

    /// Record the finishing timestamp in the info record.
    pub fn set_finishing_time(&mut self, finishing_time: i64) -> Result<(), RunError> {
        self.info.finishing_time = Some(finishing_time);
        self.save_info()
    }

    fn save_info(&self) -> Result<(), RunError> {
        let content = serde_json::to_string_pretty(&self.info)
            .map_err(|e| RunError::Config(e.to_string()))?;
        fs::write(self.path.join(INFO_FILE), content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::timestamp;

    fn info(name: &str, index: i64, nsim: usize) -> GenerationInfo {
        GenerationInfo {
            name: name.to_string(),
            index,
            method: if index < 0 {
                GenerationMethod::Random
            } else {
                GenerationMethod::Genetic
            },
            nsimulations: nsim,
            launching_time: timestamp(),
            finishing_time: None,
        }
    }

    #[test]
    fn test_create_and_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("initial");

        let generation = Generation::create(&path, info("initial", -1, 3)).unwrap();
        assert_eq!(generation.name(), "initial");

        let reopened = Generation::open(&path).unwrap();
        assert_eq!(reopened.info().index, -1);
        assert_eq!(reopened.info().method, GenerationMethod::Random);
        assert_eq!(reopened.info().nsimulations, 3);
    }

    #[test]
    fn test_open_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            Generation::open(dir.path().join("nope")),
            Err(RunError::MissingFile(_))
        ));
    }

    fn write_individuals(generation: &Generation, names: &[&str]) {
        let mut individuals = IndividualsTable::new();
        for (i, name) in names.iter().enumerate() {
            individuals.add_entry(format!("g0_ind{i}"), *name).unwrap();
        }
        individuals.save(generation.individuals_path()).unwrap();
    }

    #[test]
    fn test_status_follows_scored_count() {
        let dir = tempfile::tempdir().unwrap();
        let generation =
            Generation::create(dir.path().join("initial"), info("initial", -1, 2)).unwrap();
        write_individuals(&generation, &["sim0", "sim1"]);
        assert!(!generation.is_finished().unwrap());

        let mut scores = ChiSquaredTable::new();
        scores.add_entry("sim0", 1.0).unwrap();
        scores.add_entry("sim1", 2.0).unwrap();
        scores.save(generation.chi_squared_path()).unwrap();

        assert!(generation.is_finished().unwrap());
    }

    #[test]
    fn test_status_ignores_unknown_simulation_names() {
        let dir = tempfile::tempdir().unwrap();
        let generation =
            Generation::create(dir.path().join("initial"), info("initial", -1, 2)).unwrap();
        write_individuals(&generation, &["sim0", "sim1"]);

        let mut scores = ChiSquaredTable::new();
        scores.add_entry("sim0", 1.0).unwrap();
        scores.add_entry("sim99", 2.0).unwrap();
        scores.save(generation.chi_squared_path()).unwrap();

        assert!(!generation.is_finished().unwrap());
    }

    #[test]
    fn test_finishing_time_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Generation0");
        let mut generation = Generation::create(&path, info("Generation0", 0, 2)).unwrap();

        generation.set_finishing_time(12345).unwrap();
        let reopened = Generation::open(&path).unwrap();
        assert_eq!(reopened.info().finishing_time, Some(12345));
    }
}

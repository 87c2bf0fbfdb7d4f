//! Fitting runs: the umbrella context for one optimization session.
//!
//! A fitting run lives in its own directory and survives across process
//! invocations: `explore` creates a generation, `run` executes its
//! simulations, `analyse` scores them, and the cycle repeats. All state is
//! in flat-file tables, JSON records, the serialized engine, and the
//! statistics database.

pub mod analyser;
pub mod config;
pub mod explorer;
pub mod generation;

pub use analyser::{analyse_generation, AnalysisSummary};
pub use config::FitConfig;
pub use explorer::{explore, ExplorationSummary};
pub use generation::{Generation, GenerationInfo, GenerationMethod};

use crate::errors::RunError;
use crate::sed::ObservedSed;
use crate::ski::SkiTemplate;
use crate::storage::StatisticsRecorder;
use crate::tables::{
    BestParametersTable, GenerationStatus, GenerationsTable, MemoryTable, TimingTable,
    WeightsTable,
};
use std::fs;
use std::path::{Path, PathBuf};

pub const RUN_CONFIG_FILE: &str = "run.json";
pub const GENERATIONS_FILE: &str = "generations.dat";
pub const BEST_PARAMETERS_FILE: &str = "best_parameters.dat";
pub const WEIGHTS_FILE: &str = "weights.dat";
pub const TIMING_FILE: &str = "timing.dat";
pub const MEMORY_FILE: &str = "memory.dat";
pub const STATISTICS_DB_FILE: &str = "statistics.db";
pub const OBSERVED_SED_FILE: &str = "observed_sed.dat";
pub const TEMPLATE_FILE: &str = "template.ski";
pub const GENERATIONS_DIR: &str = "generations";
pub const PROB_DIR: &str = "prob";

/// Name of the initial, randomly sampled generation.
pub const INITIAL_GENERATION: &str = "initial";

/// Generation name for an index: -1 is `initial`, N >= 0 is `GenerationN`.
pub fn generation_name_for_index(index: i64) -> String {
    if index < 0 {
        INITIAL_GENERATION.to_string()
    } else {
        format!("Generation{index}")
    }
}

/// Parse a generation name back to its index.
pub fn parse_generation_name(name: &str) -> Result<i64, RunError> {
    if name == INITIAL_GENERATION {
        return Ok(-1);
    }
    name.strip_prefix("Generation")
        .and_then(|n| n.parse::<i64>().ok())
        .filter(|n| *n >= 0)
        .ok_or_else(|| RunError::InvalidGenerationName(name.to_string()))
}

/// An open fitting run.
#[derive(Debug)]
pub struct FittingRun {
    path: PathBuf,
    config: FitConfig,
}

impl FittingRun {
    /// Create a new fitting run under `base_dir`.
    ///
    /// Copies the observed SED and ski template into the run directory so
    /// the run stays self-contained, writes the configuration and empty
    /// tables, and initializes the statistics database. Custom per-band
    /// weights can be supplied; by default every observed band gets weight
    /// 1.0.
    pub fn create(
        base_dir: impl AsRef<Path>,
        config: FitConfig,
        observed_sed_path: impl AsRef<Path>,
        template_path: impl AsRef<Path>,
        weights: Option<WeightsTable>,
    ) -> Result<Self, RunError> {
        config.validate()?;
        let path = base_dir.as_ref().join(&config.run_name);
        if path.exists() {
            return Err(RunError::AlreadyExists(path));
        }

        let observed_sed_path = observed_sed_path.as_ref();
        if !observed_sed_path.is_file() {
            return Err(RunError::MissingFile(observed_sed_path.to_path_buf()));
        }
        let observed = ObservedSed::load(observed_sed_path)?;
        if observed.is_empty() {
            return Err(RunError::Config(
                "observed SED contains no flux points".to_string(),
            ));
        }

        let template_path = template_path.as_ref();
        if !template_path.is_file() {
            return Err(RunError::MissingFile(template_path.to_path_buf()));
        }
        let template = SkiTemplate::from_file(template_path)?;
        template.validate_against(&config.parameters)?;

        let weights = weights.unwrap_or_else(|| WeightsTable::uniform(observed.bands()));
        for point in observed.points() {
            if weights.weight_for(&point.instrument, &point.band).is_none() {
                return Err(RunError::Config(format!(
                    "no weight for the observed {} {} band",
                    point.instrument, point.band
                )));
            }
        }

        fs::create_dir_all(path.join(GENERATIONS_DIR))?;
        fs::create_dir_all(path.join(PROB_DIR))?;
        fs::copy(observed_sed_path, path.join(OBSERVED_SED_FILE))?;
        fs::copy(template_path, path.join(TEMPLATE_FILE))?;

        config.save(path.join(RUN_CONFIG_FILE))?;
        GenerationsTable::new().save(path.join(GENERATIONS_FILE))?;
        weights.save(path.join(WEIGHTS_FILE))?;

        let mut recorder = StatisticsRecorder::open(path.join(STATISTICS_DB_FILE))?;
        recorder.set_metadata("run_name", &config.run_name)?;
        recorder.close()?;

        Ok(Self { path, config })
    }

    /// Open an existing run directory.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, RunError> {
        let path = path.into();
        let config_path = path.join(RUN_CONFIG_FILE);
        if !config_path.is_file() {
            return Err(RunError::NotFound(path));
        }
        let config = FitConfig::load(config_path)?;
        Ok(Self { path, config })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn config(&self) -> &FitConfig {
        &self.config
    }

    pub fn name(&self) -> &str {
        &self.config.run_name
    }

    pub fn generations_table_path(&self) -> PathBuf {
        self.path.join(GENERATIONS_FILE)
    }

    pub fn best_parameters_path(&self) -> PathBuf {
        self.path.join(BEST_PARAMETERS_FILE)
    }

    pub fn timing_path(&self) -> PathBuf {
        self.path.join(TIMING_FILE)
    }

    pub fn memory_path(&self) -> PathBuf {
        self.path.join(MEMORY_FILE)
    }

    pub fn statistics_db_path(&self) -> PathBuf {
        self.path.join(STATISTICS_DB_FILE)
    }

    pub fn prob_dir(&self) -> PathBuf {
        self.path.join(PROB_DIR)
    }

    pub fn generation_path(&self, name: &str) -> PathBuf {
        self.path.join(GENERATIONS_DIR).join(name)
    }

    pub fn observed_sed(&self) -> Result<ObservedSed, RunError> {
        Ok(ObservedSed::load(self.path.join(OBSERVED_SED_FILE))?)
    }

    pub fn template(&self) -> Result<SkiTemplate, RunError> {
        Ok(SkiTemplate::from_file(self.path.join(TEMPLATE_FILE))?)
    }

    pub fn weights(&self) -> Result<WeightsTable, RunError> {
        Ok(WeightsTable::load(self.path.join(WEIGHTS_FILE))?)
    }

    pub fn generations_table(&self) -> Result<GenerationsTable, RunError> {
        Ok(GenerationsTable::load(self.generations_table_path())?)
    }

    pub fn timing_table(&self) -> Result<TimingTable, RunError> {
        Ok(TimingTable::load_or_new(self.timing_path())?)
    }

    pub fn memory_table(&self) -> Result<MemoryTable, RunError> {
        Ok(MemoryTable::load_or_new(self.memory_path())?)
    }

    pub fn best_parameters_table(&self) -> Result<BestParametersTable, RunError> {
        Ok(BestParametersTable::load_or_new(
            self.best_parameters_path(),
            &self.config.parameters,
        )?)
    }

    /// Open a generation by name, checking it is recorded in the run.
    pub fn generation(&self, name: &str) -> Result<Generation, RunError> {
        let table = self.generations_table()?;
        if !table.has_generation(name) {
            return Err(RunError::UnknownGeneration(name.to_string()));
        }
        Generation::open(self.generation_path(name))
    }

    /// The most recently created generation, if any.
    pub fn last_generation(&self) -> Result<Option<Generation>, RunError> {
        let table = self.generations_table()?;
        match table.last() {
            Some(row) => Ok(Some(Generation::open(self.generation_path(&row.name))?)),
            None => Ok(None),
        }
    }

    /// The last generation if it is still unfinished.
    pub fn last_unfinished_generation(&self) -> Result<Option<Generation>, RunError> {
        match self.last_generation()? {
            Some(generation) if generation.status()? == GenerationStatus::Unfinished => {
                Ok(Some(generation))
            }
            _ => Ok(None),
        }
    }
}

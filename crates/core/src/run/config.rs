//! The persisted configuration of a fitting run.

use crate::errors::RunError;
use crate::evolution::GeneticSettings;
use crate::launch::SimulatorConfig;
use crate::params::ParameterSet;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Everything a fitting run needs to know, stored as `run.json`.
///
/// File names inside the configuration are relative to the run directory;
/// the observed SED and ski template are copied in at init time so a run
/// directory is self-contained.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitConfig {
    /// Name of the run, also its directory name.
    pub run_name: String,
    /// Free parameters being fitted.
    pub parameters: ParameterSet,
    /// Genetic-algorithm settings.
    pub genetic: GeneticSettings,
    /// How to invoke the simulator.
    pub simulator: SimulatorConfig,
    /// RNG seed; `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl FitConfig {
    /// Validate the configuration before a run is created.
    pub fn validate(&self) -> Result<(), RunError> {
        if self.run_name.is_empty() {
            return Err(RunError::Config("run name must not be empty".to_string()));
        }
        if self
            .run_name
            .chars()
            .any(|c| !c.is_ascii_alphanumeric() && c != '_' && c != '-')
        {
            return Err(RunError::Config(format!(
                "run name '{}' may only contain letters, digits, '_' and '-'",
                self.run_name
            )));
        }
        self.genetic
            .validate()
            .map_err(|e| RunError::Config(e.to_string()))?;
        if self.simulator.binary.as_os_str().is_empty() {
            return Err(RunError::Config(
                "simulator binary path must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, RunError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(RunError::MissingFile(path.to_path_buf()));
        }
        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| RunError::Config(e.to_string()))
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), RunError> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| RunError::Config(e.to_string()))?;
        fs::write(path.as_ref(), content)?;
        Ok(())
    }
}

use sedfit_core::errors::{RunError, TableError};
use std::path::PathBuf;
use thiserror::Error;

/// Errors from the probability and convergence analysis.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("generation '{0}' has no chi-squared scores to analyse")]
    EmptyGeneration(String),

    #[error("the run has no finished generations yet")]
    NoFinishedGenerations,

    #[error("invalid bin count {0}; need at least 2 bins")]
    InvalidBinCount(usize),

    #[error("parameter value {value} for '{label}' lies outside its range")]
    ValueOutOfRange { label: String, value: f64 },

    #[error("failed to write analysis output to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Run(#[from] RunError),

    #[error(transparent)]
    Table(#[from] TableError),
}

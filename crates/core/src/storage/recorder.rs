//! Writing score statistics into the database.

use crate::errors::DatabaseError;
use crate::storage::database::Database;
use crate::tables::timestamp;
use rusqlite::params;
use std::path::Path;

/// Score statistics of one generation.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationStats {
    pub generation_index: i64,
    pub generation_name: String,
    pub n_simulations: usize,
    pub n_finished: usize,
    pub best_chi_squared: Option<f64>,
    pub worst_chi_squared: Option<f64>,
    pub mean_chi_squared: Option<f64>,
    pub stddev_chi_squared: Option<f64>,
    pub timestamp: i64,
}

impl GenerationStats {
    /// Summarize a set of chi-squared scores for a generation.
    pub fn from_scores(
        generation_index: i64,
        generation_name: impl Into<String>,
        n_simulations: usize,
        scores: &[f64],
    ) -> Self {
        let best = scores.iter().copied().reduce(f64::min);
        let worst = scores.iter().copied().reduce(f64::max);
        let mean = if scores.is_empty() {
            None
        } else {
            Some(scores.iter().sum::<f64>() / scores.len() as f64)
        };
        let stddev = mean.map(|m| {
            let variance =
                scores.iter().map(|s| (s - m) * (s - m)).sum::<f64>() / scores.len() as f64;
            variance.sqrt()
        });
        Self {
            generation_index,
            generation_name: generation_name.into(),
            n_simulations,
            n_finished: scores.len(),
            best_chi_squared: best,
            worst_chi_squared: worst,
            mean_chi_squared: mean,
            stddev_chi_squared: stddev,
            timestamp: timestamp(),
        }
    }
}

/// Records generation statistics and run metadata.
pub struct StatisticsRecorder {
    db: Database,
}

impl StatisticsRecorder {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DatabaseError> {
        Ok(Self {
            db: Database::open(path)?,
        })
    }

    /// Insert or replace the statistics row for a generation.
    pub fn record_generation(&mut self, stats: &GenerationStats) -> Result<(), DatabaseError> {
        self.db
            .connection()
            .execute(
                "INSERT OR REPLACE INTO generation_stats
                 (generation_index, generation_name, n_simulations, n_finished,
                  best_chi_squared, worst_chi_squared, mean_chi_squared,
                  stddev_chi_squared, timestamp)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    stats.generation_index,
                    stats.generation_name,
                    stats.n_simulations as i64,
                    stats.n_finished as i64,
                    stats.best_chi_squared,
                    stats.worst_chi_squared,
                    stats.mean_chi_squared,
                    stats.stddev_chi_squared,
                    stats.timestamp,
                ],
            )
            .map_err(|e| DatabaseError::Insert(e.to_string()))?;
        Ok(())
    }

    /// Set a run-level metadata entry.
    pub fn set_metadata(&mut self, key: &str, value: &str) -> Result<(), DatabaseError> {
        self.db
            .connection()
            .execute(
                "INSERT OR REPLACE INTO metadata (key, value) VALUES (?1, ?2)",
                params![key, value],
            )
            .map_err(|e| DatabaseError::Insert(e.to_string()))?;
        Ok(())
    }

    pub fn close(self) -> Result<(), DatabaseError> {
        self.db.close()
    }
}

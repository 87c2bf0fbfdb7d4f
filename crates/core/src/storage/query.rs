//! Read-only queries against the statistics database.

use crate::errors::DatabaseError;
use crate::storage::database::Database;
use crate::storage::recorder::GenerationStats;
use rusqlite::params;
use std::path::Path;

/// Read-only access to recorded statistics.
pub struct StatisticsQuery {
    db: Database,
}

impl StatisticsQuery {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DatabaseError> {
        Ok(Self {
            db: Database::open(path)?,
        })
    }

    /// A metadata value, if set.
    pub fn metadata(&self, key: &str) -> Result<Option<String>, DatabaseError> {
        let mut stmt = self
            .db
            .connection()
            .prepare("SELECT value FROM metadata WHERE key = ?1")
            .map_err(|e| DatabaseError::Query(e.to_string()))?;
        let mut rows = stmt
            .query(params![key])
            .map_err(|e| DatabaseError::Query(e.to_string()))?;
        match rows.next().map_err(|e| DatabaseError::Query(e.to_string()))? {
            Some(row) => Ok(Some(
                row.get(0).map_err(|e| DatabaseError::Query(e.to_string()))?,
            )),
            None => Ok(None),
        }
    }

    /// All generation statistics, ordered by generation index.
    pub fn generation_stats(&self) -> Result<Vec<GenerationStats>, DatabaseError> {
        let mut stmt = self
            .db
            .connection()
            .prepare(
                "SELECT generation_index, generation_name, n_simulations, n_finished,
                        best_chi_squared, worst_chi_squared, mean_chi_squared,
                        stddev_chi_squared, timestamp
                 FROM generation_stats ORDER BY generation_index",
            )
            .map_err(|e| DatabaseError::Query(e.to_string()))?;

        let rows = stmt
            .query_map([], |row| {
                Ok(GenerationStats {
                    generation_index: row.get(0)?,
                    generation_name: row.get(1)?,
                    n_simulations: row.get::<_, i64>(2)? as usize,
                    n_finished: row.get::<_, i64>(3)? as usize,
                    best_chi_squared: row.get(4)?,
                    worst_chi_squared: row.get(5)?,
                    mean_chi_squared: row.get(6)?,
                    stddev_chi_squared: row.get(7)?,
                    timestamp: row.get(8)?,
                })
            })
            .map_err(|e| DatabaseError::Query(e.to_string()))?;

        let mut stats = Vec::new();
        for row in rows {
            stats.push(row.map_err(|e| DatabaseError::Query(e.to_string()))?);
        }
        Ok(stats)
    }

    /// The best chi-squared recorded across all generations.
    pub fn overall_best(&self) -> Result<Option<(String, f64)>, DatabaseError> {
        let mut stmt = self
            .db
            .connection()
            .prepare(
                "SELECT generation_name, best_chi_squared FROM generation_stats
                 WHERE best_chi_squared IS NOT NULL
                 ORDER BY best_chi_squared ASC LIMIT 1",
            )
            .map_err(|e| DatabaseError::Query(e.to_string()))?;
        let mut rows = stmt
            .query([])
            .map_err(|e| DatabaseError::Query(e.to_string()))?;
        match rows.next().map_err(|e| DatabaseError::Query(e.to_string()))? {
            Some(row) => {
                let name: String = row.get(0).map_err(|e| DatabaseError::Query(e.to_string()))?;
                let best: f64 = row.get(1).map_err(|e| DatabaseError::Query(e.to_string()))?;
                Ok(Some((name, best)))
            }
            None => Ok(None),
        }
    }

    pub fn close(self) -> Result<(), DatabaseError> {
        self.db.close()
    }
}

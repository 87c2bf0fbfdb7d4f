//! Low-level database operations and schema management.

pub use crate::errors::DatabaseError;
use rusqlite::{Connection, Transaction};
use std::path::Path;

/// Database connection wrapper with schema management.
#[derive(Debug)]
pub struct Database {
    conn: Connection,
    db_path: String,
}

impl Database {
    /// Open (or create) a database at the specified path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DatabaseError> {
        let path_str = path.as_ref().to_string_lossy().to_string();
        let conn =
            Connection::open(&path_str).map_err(|e| DatabaseError::Connection(e.to_string()))?;

        conn.execute_batch(
            "PRAGMA synchronous = NORMAL;
             PRAGMA journal_mode = WAL;
             PRAGMA temp_store = MEMORY;",
        )
        .map_err(|e| DatabaseError::Initialization(e.to_string()))?;

        let mut db = Self {
            conn,
            db_path: path_str,
        };

        db.initialize_schema()?;
        Ok(db)
    }

    /// Initialize database schema.
    fn initialize_schema(&mut self) -> Result<(), DatabaseError> {
        self.conn
            .execute_batch(
                "-- Run-level metadata
                CREATE TABLE IF NOT EXISTS metadata (
                    key TEXT PRIMARY KEY,
                    value TEXT NOT NULL
                );

                -- Score statistics, one row per finished generation
                CREATE TABLE IF NOT EXISTS generation_stats (
                    generation_index INTEGER PRIMARY KEY,
                    generation_name TEXT NOT NULL UNIQUE,
                    n_simulations INTEGER NOT NULL,
                    n_finished INTEGER NOT NULL,
                    best_chi_squared REAL,
                    worst_chi_squared REAL,
                    mean_chi_squared REAL,
                    stddev_chi_squared REAL,
                    timestamp INTEGER NOT NULL
                );",
            )
            .map_err(|e| DatabaseError::Initialization(e.to_string()))?;

        Ok(())
    }

    /// Begin a transaction for batched operations.
    pub fn transaction(&mut self) -> Result<Transaction<'_>, DatabaseError> {
        self.conn
            .transaction()
            .map_err(|e| DatabaseError::Transaction(e.to_string()))
    }

    /// Get reference to underlying connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Get database path.
    pub fn path(&self) -> &str {
        &self.db_path
    }

    /// Close the database and clean up WAL files.
    pub fn close(self) -> Result<(), DatabaseError> {
        if let Err(e) = self.conn.execute_batch(
            "PRAGMA wal_checkpoint(TRUNCATE);
             PRAGMA journal_mode = DELETE;",
        ) {
            eprintln!("Warning: failed to checkpoint/truncate WAL: {e}");
        }

        self.conn
            .close()
            .map_err(|(_conn, e)| DatabaseError::Close(e.to_string()))?;

        for suffix in &["-wal", "-shm"] {
            let fname = format!("{}{}", self.db_path, suffix);
            if let Err(e) = std::fs::remove_file(&fname) {
                if e.kind() != std::io::ErrorKind::NotFound {
                    eprintln!("Warning: failed to remove {fname}: {e}");
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_creation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("statistics.db");

        let db = Database::open(&path).expect("Failed to create database");
        assert_eq!(db.path(), path.to_string_lossy());

        db.close().expect("Failed to close database");
    }

    #[test]
    fn test_schema_initialization() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(dir.path().join("statistics.db")).unwrap();

        let count: i64 = db
            .connection()
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table'
                 AND name IN ('metadata', 'generation_stats')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 2);

        db.close().unwrap();
    }

    #[test]
    fn test_transaction() {
        let dir = tempfile::tempdir().unwrap();
        let mut db = Database::open(dir.path().join("statistics.db")).unwrap();

        let tx = db.transaction().expect("Failed to begin transaction");
        tx.commit().expect("Failed to commit transaction");

        db.close().unwrap();
    }
}

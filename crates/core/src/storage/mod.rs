//! SQLite-backed score statistics for a fitting run.
//!
//! The flat-file tables remain the canonical record; the statistics
//! database is a queryable summary written as generations finish.

pub mod database;
pub mod query;
pub mod recorder;

pub use database::Database;
pub use query::StatisticsQuery;
pub use recorder::{GenerationStats, StatisticsRecorder};

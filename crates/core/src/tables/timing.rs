//! The run-level timing and memory tables.

use super::{expect_fields, header_line, parse_f64, read_raw, write_atomic, MISSING};
use crate::errors::TableError;
use std::path::Path;

/// Wall-clock runtime of one finished simulation.
#[derive(Debug, Clone, PartialEq)]
pub struct TimingRow {
    pub simulation_name: String,
    pub generation_name: String,
    pub runtime_s: f64,
}

/// Runtimes of all finished simulations of a run.
#[derive(Debug, Clone, Default)]
pub struct TimingTable {
    rows: Vec<TimingRow>,
}

impl TimingTable {
    const COLUMNS: [&'static str; 3] = ["Simulation name", "Generation name", "Runtime (s)"];

    pub fn new() -> Self {
        Self::default()
    }

    pub fn load_or_new(path: impl AsRef<Path>) -> Result<Self, TableError> {
        if path.as_ref().is_file() {
            Self::load(path)
        } else {
            Ok(Self::new())
        }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, TableError> {
        let (_, raw_rows) = read_raw(path.as_ref())?;
        let mut rows = Vec::with_capacity(raw_rows.len());
        for row in &raw_rows {
            expect_fields(row, Self::COLUMNS.len())?;
            rows.push(TimingRow {
                simulation_name: row.fields[0].clone(),
                generation_name: row.fields[1].clone(),
                runtime_s: parse_f64(&row.fields[2], row.line)?,
            });
        }
        Ok(Self { rows })
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), TableError> {
        let columns: Vec<String> = Self::COLUMNS.iter().map(|c| c.to_string()).collect();
        let mut content = header_line(&columns);
        for row in &self.rows {
            content.push_str(&format!(
                "{}\t{}\t{}\n",
                row.simulation_name, row.generation_name, row.runtime_s
            ));
        }
        write_atomic(path.as_ref(), &content)
    }

    pub fn rows(&self) -> &[TimingRow] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Simulation names repeat across generations, so entries are keyed
    /// on the (simulation, generation) pair.
    pub fn add_entry(
        &mut self,
        simulation_name: impl Into<String>,
        generation_name: impl Into<String>,
        runtime_s: f64,
    ) -> Result<(), TableError> {
        let simulation_name = simulation_name.into();
        let generation_name = generation_name.into();
        if self.rows.iter().any(|row| {
            row.simulation_name == simulation_name && row.generation_name == generation_name
        }) {
            return Err(TableError::DuplicateEntry(simulation_name));
        }
        self.rows.push(TimingRow {
            simulation_name,
            generation_name,
            runtime_s,
        });
        Ok(())
    }

    /// Mean runtime over all recorded simulations.
    pub fn mean_runtime(&self) -> Option<f64> {
        if self.rows.is_empty() {
            return None;
        }
        let sum: f64 = self.rows.iter().map(|row| row.runtime_s).sum();
        Some(sum / self.rows.len() as f64)
    }
}

/// Peak memory usage of one finished simulation, when its log reported it.
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryRow {
    pub simulation_name: String,
    pub generation_name: String,
    pub peak_gb: Option<f64>,
}

/// Peak memory usage of all finished simulations of a run.
#[derive(Debug, Clone, Default)]
pub struct MemoryTable {
    rows: Vec<MemoryRow>,
}

impl MemoryTable {
    const COLUMNS: [&'static str; 3] = ["Simulation name", "Generation name", "Peak memory (GB)"];

    pub fn new() -> Self {
        Self::default()
    }

    pub fn load_or_new(path: impl AsRef<Path>) -> Result<Self, TableError> {
        if path.as_ref().is_file() {
            Self::load(path)
        } else {
            Ok(Self::new())
        }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, TableError> {
        let (_, raw_rows) = read_raw(path.as_ref())?;
        let mut rows = Vec::with_capacity(raw_rows.len());
        for row in &raw_rows {
            expect_fields(row, Self::COLUMNS.len())?;
            let peak_gb = if row.fields[2] == MISSING {
                None
            } else {
                Some(parse_f64(&row.fields[2], row.line)?)
            };
            rows.push(MemoryRow {
                simulation_name: row.fields[0].clone(),
                generation_name: row.fields[1].clone(),
                peak_gb,
            });
        }
        Ok(Self { rows })
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), TableError> {
        let columns: Vec<String> = Self::COLUMNS.iter().map(|c| c.to_string()).collect();
        let mut content = header_line(&columns);
        for row in &self.rows {
            let peak = match row.peak_gb {
                Some(value) => value.to_string(),
                None => MISSING.to_string(),
            };
            content.push_str(&format!(
                "{}\t{}\t{}\n",
                row.simulation_name, row.generation_name, peak
            ));
        }
        write_atomic(path.as_ref(), &content)
    }

    pub fn rows(&self) -> &[MemoryRow] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn add_entry(
        &mut self,
        simulation_name: impl Into<String>,
        generation_name: impl Into<String>,
        peak_gb: Option<f64>,
    ) -> Result<(), TableError> {
        let simulation_name = simulation_name.into();
        let generation_name = generation_name.into();
        if self.rows.iter().any(|row| {
            row.simulation_name == simulation_name && row.generation_name == generation_name
        }) {
            return Err(TableError::DuplicateEntry(simulation_name));
        }
        self.rows.push(MemoryRow {
            simulation_name,
            generation_name,
            peak_gb,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timing_mean() {
        let mut table = TimingTable::new();
        table.add_entry("sim0", "initial", 10.0).unwrap();
        table.add_entry("sim1", "initial", 30.0).unwrap();
        assert_eq!(table.mean_runtime(), Some(20.0));
    }

    #[test]
    fn test_same_simulation_name_across_generations() {
        let mut table = TimingTable::new();
        table.add_entry("sim0", "initial", 10.0).unwrap();
        table.add_entry("sim0", "Generation0", 11.0).unwrap();
        assert!(table.add_entry("sim0", "initial", 12.0).is_err());
        assert_eq!(table.rows().len(), 2);
    }

    #[test]
    fn test_timing_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("timing.dat");

        let mut table = TimingTable::new();
        table.add_entry("sim0", "initial", 12.5).unwrap();
        table.save(&path).unwrap();

        let loaded = TimingTable::load(&path).unwrap();
        assert_eq!(loaded.rows(), table.rows());
    }

    #[test]
    fn test_memory_missing_marker() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("memory.dat");

        let mut table = MemoryTable::new();
        table.add_entry("sim0", "initial", Some(4.2)).unwrap();
        table.add_entry("sim1", "initial", None).unwrap();
        table.save(&path).unwrap();

        let loaded = MemoryTable::load(&path).unwrap();
        assert_eq!(loaded.rows()[0].peak_gb, Some(4.2));
        assert_eq!(loaded.rows()[1].peak_gb, None);
    }
}

//! The per-generation individuals table.

use super::{expect_fields, header_line, read_raw, write_atomic};
use crate::errors::TableError;
use std::path::Path;

/// Maps one engine individual to the simulation evaluating it.
#[derive(Debug, Clone, PartialEq)]
pub struct IndividualsRow {
    pub individual_name: String,
    pub simulation_name: String,
}

/// The individual-to-simulation mapping of a genetic generation.
#[derive(Debug, Clone, Default)]
pub struct IndividualsTable {
    rows: Vec<IndividualsRow>,
}

impl IndividualsTable {
    const COLUMNS: [&'static str; 2] = ["Individual name", "Simulation name"];

    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, TableError> {
        let (_, raw_rows) = read_raw(path.as_ref())?;
        let mut rows = Vec::with_capacity(raw_rows.len());
        for row in &raw_rows {
            expect_fields(row, Self::COLUMNS.len())?;
            rows.push(IndividualsRow {
                individual_name: row.fields[0].clone(),
                simulation_name: row.fields[1].clone(),
            });
        }
        Ok(Self { rows })
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), TableError> {
        let columns: Vec<String> = Self::COLUMNS.iter().map(|c| c.to_string()).collect();
        let mut content = header_line(&columns);
        for row in &self.rows {
            content.push_str(&format!(
                "{}\t{}\n",
                row.individual_name, row.simulation_name
            ));
        }
        write_atomic(path.as_ref(), &content)
    }

    pub fn rows(&self) -> &[IndividualsRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn simulation_for(&self, individual_name: &str) -> Option<&str> {
        self.rows
            .iter()
            .find(|row| row.individual_name == individual_name)
            .map(|row| row.simulation_name.as_str())
    }

    pub fn individual_for(&self, simulation_name: &str) -> Option<&str> {
        self.rows
            .iter()
            .find(|row| row.simulation_name == simulation_name)
            .map(|row| row.individual_name.as_str())
    }

    pub fn add_entry(
        &mut self,
        individual_name: impl Into<String>,
        simulation_name: impl Into<String>,
    ) -> Result<(), TableError> {
        let individual_name = individual_name.into();
        if self.simulation_for(&individual_name).is_some() {
            return Err(TableError::DuplicateEntry(individual_name));
        }
        self.rows.push(IndividualsRow {
            individual_name,
            simulation_name: simulation_name.into(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bidirectional_lookup() {
        let mut table = IndividualsTable::new();
        table.add_entry("g1_ind0", "sim0").unwrap();
        table.add_entry("g1_ind1", "sim1").unwrap();

        assert_eq!(table.simulation_for("g1_ind1"), Some("sim1"));
        assert_eq!(table.individual_for("sim0"), Some("g1_ind0"));
        assert!(table.simulation_for("g1_ind9").is_none());
    }

    #[test]
    fn test_duplicate_individual_rejected() {
        let mut table = IndividualsTable::new();
        table.add_entry("g1_ind0", "sim0").unwrap();
        assert!(table.add_entry("g1_ind0", "sim1").is_err());
    }

    #[test]
    fn test_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("individuals.dat");

        let mut table = IndividualsTable::new();
        table.add_entry("g1_ind0", "sim0").unwrap();
        table.save(&path).unwrap();

        let loaded = IndividualsTable::load(&path).unwrap();
        assert_eq!(loaded.rows(), table.rows());
    }
}

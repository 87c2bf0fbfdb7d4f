//! The per-generation chi-squared table.

use super::{expect_fields, header_line, parse_f64, read_raw, write_atomic};
use crate::errors::TableError;
use std::path::Path;

/// One scored simulation.
#[derive(Debug, Clone, PartialEq)]
pub struct ChiSquaredRow {
    pub simulation_name: String,
    pub chi_squared: f64,
}

/// Chi-squared scores of a generation, one row per evaluated simulation.
///
/// A generation is finished when this table holds as many rows as the
/// generation has simulations.
#[derive(Debug, Clone, Default)]
pub struct ChiSquaredTable {
    rows: Vec<ChiSquaredRow>,
}

impl ChiSquaredTable {
    const COLUMNS: [&'static str; 2] = ["Simulation name", "Chi squared"];

    pub fn new() -> Self {
        Self::default()
    }

    /// Load the table from file; an absent file is an empty table.
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
            rows.push(ChiSquaredRow {
                simulation_name: row.fields[0].clone(),
                chi_squared: parse_f64(&row.fields[1], row.line)?,
            });
        }
        Ok(Self { rows })
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), TableError> {
        let columns: Vec<String> = Self::COLUMNS.iter().map(|c| c.to_string()).collect();
        let mut content = header_line(&columns);
        for row in &self.rows {
            content.push_str(&format!("{}\t{}\n", row.simulation_name, row.chi_squared));
        }
        write_atomic(path.as_ref(), &content)
    }

    pub fn rows(&self) -> &[ChiSquaredRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_simulation(&self, simulation_name: &str) -> bool {
        self.rows.iter().any(|row| row.simulation_name == simulation_name)
    }

    pub fn chi_squared_for(&self, simulation_name: &str) -> Option<f64> {
        self.rows
            .iter()
            .find(|row| row.simulation_name == simulation_name)
            .map(|row| row.chi_squared)
    }

    /// Append a score; a simulation can be scored only once.
    pub fn add_entry(
        &mut self,
        simulation_name: impl Into<String>,
        chi_squared: f64,
    ) -> Result<(), TableError> {
        let simulation_name = simulation_name.into();
        if self.has_simulation(&simulation_name) {
            return Err(TableError::DuplicateEntry(simulation_name));
        }
        self.rows.push(ChiSquaredRow {
            simulation_name,
            chi_squared,
        });
        Ok(())
    }

    /// The best (lowest chi-squared) row, if any.
    pub fn best(&self) -> Option<&ChiSquaredRow> {
        self.rows
            .iter()
            .min_by(|a, b| a.chi_squared.total_cmp(&b.chi_squared))
    }
}

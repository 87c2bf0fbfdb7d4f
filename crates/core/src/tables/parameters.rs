//! The per-generation parameters table.

use super::{expect_fields, header_line, parse_f64, read_raw, write_atomic};
use crate::errors::TableError;
use crate::params::ParameterSet;
use std::path::Path;

/// Parameter values of one simulation.
#[derive(Debug, Clone, PartialEq)]
pub struct ParametersRow {
    pub simulation_name: String,
    pub values: Vec<f64>,
}

/// Model parameter values for every simulation of a generation.
///
/// The first column holds the simulation name; each further column is
/// labelled after one free parameter, in parameter set order.
#[derive(Debug, Clone)]
pub struct ParametersTable {
    labels: Vec<String>,
    rows: Vec<ParametersRow>,
}

impl ParametersTable {
    const NAME_COLUMN: &'static str = "Simulation name";

    pub fn new(parameters: &ParameterSet) -> Self {
        Self {
            labels: parameters.labels().iter().map(|l| l.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, TableError> {
        let (columns, raw_rows) = read_raw(path.as_ref())?;
        if columns.first().map(String::as_str) != Some(Self::NAME_COLUMN) {
            return Err(TableError::MissingColumn(Self::NAME_COLUMN.to_string()));
        }
        let labels: Vec<String> = columns[1..].to_vec();
        if labels.is_empty() {
            return Err(TableError::MissingColumn("parameter columns".to_string()));
        }

        let mut rows = Vec::with_capacity(raw_rows.len());
        for row in &raw_rows {
            expect_fields(row, columns.len())?;
            let mut values = Vec::with_capacity(labels.len());
            for field in &row.fields[1..] {
                values.push(parse_f64(field, row.line)?);
            }
            rows.push(ParametersRow {
                simulation_name: row.fields[0].clone(),
                values,
            });
        }
        Ok(Self { labels, rows })
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), TableError> {
        let mut columns = vec![Self::NAME_COLUMN.to_string()];
        columns.extend(self.labels.iter().cloned());
        let mut content = header_line(&columns);
        for row in &self.rows {
            content.push_str(&row.simulation_name);
            for value in &row.values {
                content.push_str(&format!("\t{value}"));
            }
            content.push('\n');
        }
        write_atomic(path.as_ref(), &content)
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn rows(&self) -> &[ParametersRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn values_for(&self, simulation_name: &str) -> Option<&[f64]> {
        self.rows
            .iter()
            .find(|row| row.simulation_name == simulation_name)
            .map(|row| row.values.as_slice())
    }

    pub fn add_entry(
        &mut self,
        simulation_name: impl Into<String>,
        values: Vec<f64>,
    ) -> Result<(), TableError> {
        let simulation_name = simulation_name.into();
        if self.values_for(&simulation_name).is_some() {
            return Err(TableError::DuplicateEntry(simulation_name));
        }
        if values.len() != self.labels.len() {
            return Err(TableError::Parse {
                line: self.rows.len() + 1,
                message: format!(
                    "expected {} parameter values, got {}",
                    self.labels.len(),
                    values.len()
                ),
            });
        }
        self.rows.push(ParametersRow {
            simulation_name,
            values,
        });
        Ok(())
    }
}

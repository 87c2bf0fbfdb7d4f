//! The run-level best parameters table.

use super::{expect_fields, header_line, parse_f64, read_raw, write_atomic};
use crate::errors::TableError;
use crate::params::ParameterSet;
use std::path::Path;

/// The best model of one finished generation.
#[derive(Debug, Clone, PartialEq)]
pub struct BestParametersRow {
    pub generation_name: String,
    pub values: Vec<f64>,
    pub chi_squared: f64,
}

/// Best parameter values per finished generation, one row each.
#[derive(Debug, Clone)]
pub struct BestParametersTable {
    labels: Vec<String>,
    rows: Vec<BestParametersRow>,
}

impl BestParametersTable {
    const NAME_COLUMN: &'static str = "Generation name";
    const CHI_SQUARED_COLUMN: &'static str = "Chi squared";

    pub fn new(parameters: &ParameterSet) -> Self {
        Self {
            labels: parameters.labels().iter().map(|l| l.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    /// Load the table from file; an absent file is an empty table.
    pub fn load_or_new(
        path: impl AsRef<Path>,
        parameters: &ParameterSet,
    ) -> Result<Self, TableError> {
        if path.as_ref().is_file() {
            Self::load(path)
        } else {
            Ok(Self::new(parameters))
        }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, TableError> {
        let (columns, raw_rows) = read_raw(path.as_ref())?;
        if columns.first().map(String::as_str) != Some(Self::NAME_COLUMN) {
            return Err(TableError::MissingColumn(Self::NAME_COLUMN.to_string()));
        }
        if columns.last().map(String::as_str) != Some(Self::CHI_SQUARED_COLUMN) {
            return Err(TableError::MissingColumn(
                Self::CHI_SQUARED_COLUMN.to_string(),
            ));
        }
        if columns.len() < 3 {
            return Err(TableError::MissingColumn("parameter columns".to_string()));
        }
        let labels: Vec<String> = columns[1..columns.len() - 1].to_vec();

        let mut rows = Vec::with_capacity(raw_rows.len());
        for row in &raw_rows {
            expect_fields(row, columns.len())?;
            let mut values = Vec::with_capacity(labels.len());
            for field in &row.fields[1..columns.len() - 1] {
                values.push(parse_f64(field, row.line)?);
            }
            rows.push(BestParametersRow {
                generation_name: row.fields[0].clone(),
                values,
                chi_squared: parse_f64(&row.fields[columns.len() - 1], row.line)?,
            });
        }
        Ok(Self { labels, rows })
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), TableError> {
        let mut columns = vec![Self::NAME_COLUMN.to_string()];
        columns.extend(self.labels.iter().cloned());
        columns.push(Self::CHI_SQUARED_COLUMN.to_string());
        let mut content = header_line(&columns);
        for row in &self.rows {
            content.push_str(&row.generation_name);
            for value in &row.values {
                content.push_str(&format!("\t{value}"));
            }
            content.push_str(&format!("\t{}\n", row.chi_squared));
        }
        write_atomic(path.as_ref(), &content)
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn rows(&self) -> &[BestParametersRow] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, generation_name: &str) -> Option<&BestParametersRow> {
        self.rows
            .iter()
            .find(|row| row.generation_name == generation_name)
    }

    /// The overall best row across all recorded generations.
    pub fn overall_best(&self) -> Option<&BestParametersRow> {
        self.rows
            .iter()
            .min_by(|a, b| a.chi_squared.total_cmp(&b.chi_squared))
    }

    pub fn add_entry(
        &mut self,
        generation_name: impl Into<String>,
        values: Vec<f64>,
        chi_squared: f64,
    ) -> Result<(), TableError> {
        let generation_name = generation_name.into();
        if self.get(&generation_name).is_some() {
            return Err(TableError::DuplicateEntry(generation_name));
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
        self.rows.push(BestParametersRow {
            generation_name,
            values,
            chi_squared,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{FreeParameter, ParameterRange, ParameterScale};

    fn test_parameters() -> ParameterSet {
        ParameterSet::new(vec![FreeParameter::new(
            "dust_mass",
            "",
            None,
            ParameterRange::new(1e5, 1e9).unwrap(),
            ParameterScale::Log,
            4,
        )
        .unwrap()])
        .unwrap()
    }

    #[test]
    fn test_overall_best() {
        let mut table = BestParametersTable::new(&test_parameters());
        table.add_entry("initial", vec![2e7], 12.0).unwrap();
        table.add_entry("Generation0", vec![4e6], 5.5).unwrap();
        table.add_entry("Generation1", vec![3e6], 7.0).unwrap();

        assert_eq!(
            table.overall_best().unwrap().generation_name,
            "Generation0"
        );
        assert_eq!(table.get("initial").unwrap().chi_squared, 12.0);
    }

    #[test]
    fn test_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("best_parameters.dat");

        let mut table = BestParametersTable::new(&test_parameters());
        table.add_entry("initial", vec![2e7], 12.0).unwrap();
        table.save(&path).unwrap();

        let loaded = BestParametersTable::load(&path).unwrap();
        assert_eq!(loaded.labels(), &["dust_mass"]);
        assert_eq!(loaded.rows(), table.rows());
    }

    #[test]
    fn test_duplicate_generation_rejected() {
        let mut table = BestParametersTable::new(&test_parameters());
        table.add_entry("initial", vec![2e7], 12.0).unwrap();
        assert!(table.add_entry("initial", vec![3e7], 8.0).is_err());
    }
}

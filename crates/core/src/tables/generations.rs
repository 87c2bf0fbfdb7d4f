//! The generations table: one row per generation of a fitting run.

use super::{
    expect_fields, header_line, parse_i64, parse_opt_i64, parse_usize, read_raw, timestamp,
    write_atomic, RawRow, MISSING,
};
use crate::errors::TableError;
use std::path::Path;

/// Lifecycle of a generation as recorded in the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationStatus {
    /// Simulations are still being run or evaluated.
    Unfinished,
    /// Every simulation has a chi-squared entry.
    Finished,
}

/// One row of the generations table.
#[derive(Debug, Clone)]
pub struct GenerationRow {
    /// Generation name: `initial` or `GenerationN`.
    pub name: String,
    /// Genetic generation index; -1 for the initial generation.
    pub index: i64,
    /// Number of simulations (individuals) in this generation.
    pub nsimulations: usize,
    /// Unix timestamp at which the generation was created.
    pub launching_time: i64,
    /// Unix timestamp at which the last simulation was scored.
    pub finishing_time: Option<i64>,
}

/// Append-only table of all generations, ordered by creation.
#[derive(Debug, Clone, Default)]
pub struct GenerationsTable {
    rows: Vec<GenerationRow>,
}

impl GenerationsTable {
    const COLUMNS: [&'static str; 5] = [
        "Generation name",
        "Index",
        "Number of simulations",
        "Launching time",
        "Finishing time",
    ];

    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the table from file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TableError> {
        let (_, raw_rows) = read_raw(path.as_ref())?;
        let mut rows = Vec::with_capacity(raw_rows.len());
        for row in &raw_rows {
            rows.push(Self::parse_row(row)?);
        }
        Ok(Self { rows })
    }

    fn parse_row(row: &RawRow) -> Result<GenerationRow, TableError> {
        expect_fields(row, Self::COLUMNS.len())?;
        Ok(GenerationRow {
            name: row.fields[0].clone(),
            index: parse_i64(&row.fields[1], row.line)?,
            nsimulations: parse_usize(&row.fields[2], row.line)?,
            launching_time: parse_i64(&row.fields[3], row.line)?,
            finishing_time: parse_opt_i64(&row.fields[4], row.line)?,
        })
    }

    /// Save the table to file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), TableError> {
        let columns: Vec<String> = Self::COLUMNS.iter().map(|c| c.to_string()).collect();
        let mut content = header_line(&columns);
        for row in &self.rows {
            let finishing = match row.finishing_time {
                Some(t) => t.to_string(),
                None => MISSING.to_string(),
            };
            content.push_str(&format!(
                "{}\t{}\t{}\t{}\t{}\n",
                row.name, row.index, row.nsimulations, row.launching_time, finishing
            ));
        }
        write_atomic(path.as_ref(), &content)
    }

    /// All rows in creation order.
    pub fn rows(&self) -> &[GenerationRow] {
        &self.rows
    }

    /// Names of all generations in creation order.
    pub fn generation_names(&self) -> Vec<&str> {
        self.rows.iter().map(|row| row.name.as_str()).collect()
    }

    /// Whether a generation is recorded.
    pub fn has_generation(&self, name: &str) -> bool {
        self.rows.iter().any(|row| row.name == name)
    }

    /// Row for a named generation.
    pub fn get(&self, name: &str) -> Result<&GenerationRow, TableError> {
        self.rows
            .iter()
            .find(|row| row.name == name)
            .ok_or_else(|| TableError::MissingEntry(name.to_string()))
    }

    /// The most recently added generation, if any.
    pub fn last(&self) -> Option<&GenerationRow> {
        self.rows.last()
    }

    /// Status of a named generation.
    pub fn status(&self, name: &str) -> Result<GenerationStatus, TableError> {
        let row = self.get(name)?;
        Ok(match row.finishing_time {
            Some(_) => GenerationStatus::Finished,
            None => GenerationStatus::Unfinished,
        })
    }

    /// Names of all finished generations.
    pub fn finished_generations(&self) -> Vec<&str> {
        self.rows
            .iter()
            .filter(|row| row.finishing_time.is_some())
            .map(|row| row.name.as_str())
            .collect()
    }

    /// Append a new generation with the current time as launching time.
    pub fn add_entry(
        &mut self,
        name: impl Into<String>,
        index: i64,
        nsimulations: usize,
    ) -> Result<(), TableError> {
        let name = name.into();
        if self.has_generation(&name) {
            return Err(TableError::DuplicateEntry(name));
        }
        self.rows.push(GenerationRow {
            name,
            index,
            nsimulations,
            launching_time: timestamp(),
            finishing_time: None,
        });
        Ok(())
    }

    /// Record that a generation finished at the given unix time.
    pub fn set_finishing_time(&mut self, name: &str, time: i64) -> Result<(), TableError> {
        let row = self
            .rows
            .iter_mut()
            .find(|row| row.name == name)
            .ok_or_else(|| TableError::MissingEntry(name.to_string()))?;
        row.finishing_time = Some(time);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_query() {
        let mut table = GenerationsTable::new();
        table.add_entry("initial", -1, 10).unwrap();
        table.add_entry("Generation0", 0, 10).unwrap();

        assert_eq!(table.generation_names(), vec!["initial", "Generation0"]);
        assert!(table.has_generation("initial"));
        assert_eq!(table.last().unwrap().name, "Generation0");
        assert_eq!(table.status("initial").unwrap(), GenerationStatus::Unfinished);
    }

    #[test]
    fn test_duplicate_entry_rejected() {
        let mut table = GenerationsTable::new();
        table.add_entry("initial", -1, 5).unwrap();
        assert!(matches!(
            table.add_entry("initial", -1, 5),
            Err(TableError::DuplicateEntry(_))
        ));
    }

    #[test]
    fn test_finishing_time_marks_finished() {
        let mut table = GenerationsTable::new();
        table.add_entry("initial", -1, 5).unwrap();
        table.set_finishing_time("initial", 12345).unwrap();
        assert_eq!(table.status("initial").unwrap(), GenerationStatus::Finished);
        assert_eq!(table.finished_generations(), vec!["initial"]);
    }

    #[test]
    fn test_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("generations.dat");

        let mut table = GenerationsTable::new();
        table.add_entry("initial", -1, 12).unwrap();
        table.add_entry("Generation0", 0, 12).unwrap();
        table.set_finishing_time("initial", 999).unwrap();
        table.save(&path).unwrap();

        let loaded = GenerationsTable::load(&path).unwrap();
        assert_eq!(loaded.rows().len(), 2);
        assert_eq!(loaded.get("initial").unwrap().finishing_time, Some(999));
        assert_eq!(loaded.get("Generation0").unwrap().finishing_time, None);
        assert_eq!(loaded.get("Generation0").unwrap().nsimulations, 12);
    }

    #[test]
    fn test_empty_table_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("generations.dat");
        GenerationsTable::new().save(&path).unwrap();
        let loaded = GenerationsTable::load(&path).unwrap();
        assert!(loaded.rows().is_empty());
    }
}

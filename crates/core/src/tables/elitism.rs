//! The per-generation elitism table.

use super::{expect_fields, header_line, parse_f64, parse_usize, read_raw, write_atomic};
use crate::errors::TableError;
use crate::evolution::Elitism;
use std::path::Path;

/// Elite replacements performed while breeding a generation.
#[derive(Debug, Clone, Default)]
pub struct ElitismTable {
    rows: Vec<Elitism>,
}

impl ElitismTable {
    const COLUMNS: [&'static str; 4] = [
        "Population index",
        "Replaced individual",
        "Replacement individual",
        "Replacement chi squared",
    ];

    pub fn new(rows: Vec<Elitism>) -> Self {
        Self { rows }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, TableError> {
        let (_, raw_rows) = read_raw(path.as_ref())?;
        let mut rows = Vec::with_capacity(raw_rows.len());
        for row in &raw_rows {
            expect_fields(row, Self::COLUMNS.len())?;
            rows.push(Elitism {
                index: parse_usize(&row.fields[0], row.line)?,
                replaced: row.fields[1].clone(),
                replacement: row.fields[2].clone(),
                replacement_chi_squared: parse_f64(&row.fields[3], row.line)?,
            });
        }
        Ok(Self { rows })
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), TableError> {
        let columns: Vec<String> = Self::COLUMNS.iter().map(|c| c.to_string()).collect();
        let mut content = header_line(&columns);
        for row in &self.rows {
            content.push_str(&format!(
                "{}\t{}\t{}\t{}\n",
                row.index, row.replaced, row.replacement, row.replacement_chi_squared
            ));
        }
        write_atomic(path.as_ref(), &content)
    }

    pub fn rows(&self) -> &[Elitism] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

//! The run-level weights table.

use super::{expect_fields, header_line, parse_f64, read_raw, write_atomic};
use crate::errors::TableError;
use std::path::Path;

/// The weight given to one observed band in the chi-squared sum.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightRow {
    pub instrument: String,
    pub band: String,
    pub weight: f64,
}

/// Fit weights per observed band.
///
/// Bands absent from this table do not contribute to the chi-squared.
#[derive(Debug, Clone, Default)]
pub struct WeightsTable {
    rows: Vec<WeightRow>,
}

impl WeightsTable {
    const COLUMNS: [&'static str; 3] = ["Instrument", "Band", "Weight"];

    pub fn new() -> Self {
        Self::default()
    }

    /// Uniform unit weights for the given bands.
    pub fn uniform(bands: impl IntoIterator<Item = (String, String)>) -> Self {
        let rows = bands
            .into_iter()
            .map(|(instrument, band)| WeightRow {
                instrument,
                band,
                weight: 1.0,
            })
            .collect();
        Self { rows }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, TableError> {
        let (_, raw_rows) = read_raw(path.as_ref())?;
        let mut rows = Vec::with_capacity(raw_rows.len());
        for row in &raw_rows {
            expect_fields(row, Self::COLUMNS.len())?;
            rows.push(WeightRow {
                instrument: row.fields[0].clone(),
                band: row.fields[1].clone(),
                weight: parse_f64(&row.fields[2], row.line)?,
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
                row.instrument, row.band, row.weight
            ));
        }
        write_atomic(path.as_ref(), &content)
    }

    pub fn rows(&self) -> &[WeightRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn weight_for(&self, instrument: &str, band: &str) -> Option<f64> {
        self.rows
            .iter()
            .find(|row| row.instrument == instrument && row.band == band)
            .map(|row| row.weight)
    }

    pub fn add_entry(
        &mut self,
        instrument: impl Into<String>,
        band: impl Into<String>,
        weight: f64,
    ) -> Result<(), TableError> {
        let instrument = instrument.into();
        let band = band.into();
        if self.weight_for(&instrument, &band).is_some() {
            return Err(TableError::DuplicateEntry(format!("{instrument}/{band}")));
        }
        self.rows.push(WeightRow {
            instrument,
            band,
            weight,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_weights() {
        let table = WeightsTable::uniform(vec![
            ("GALEX".to_string(), "FUV".to_string()),
            ("SDSS".to_string(), "r".to_string()),
        ]);
        assert_eq!(table.weight_for("GALEX", "FUV"), Some(1.0));
        assert_eq!(table.weight_for("SDSS", "r"), Some(1.0));
        assert!(table.weight_for("SDSS", "z").is_none());
    }

    #[test]
    fn test_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("weights.dat");

        let mut table = WeightsTable::new();
        table.add_entry("GALEX", "FUV", 0.5).unwrap();
        table.add_entry("GALEX", "NUV", 2.0).unwrap();
        table.save(&path).unwrap();

        let loaded = WeightsTable::load(&path).unwrap();
        assert_eq!(loaded.rows(), table.rows());
    }

    #[test]
    fn test_duplicate_band_rejected() {
        let mut table = WeightsTable::new();
        table.add_entry("GALEX", "FUV", 0.5).unwrap();
        assert!(table.add_entry("GALEX", "FUV", 1.0).is_err());
    }
}

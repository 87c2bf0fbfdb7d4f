//! Observed and simulated SEDs and the chi-squared comparison between them.

use crate::errors::{EvaluationError, TableError};
use crate::tables::{self};
use std::path::Path;

/// One observed flux point.
#[derive(Debug, Clone, PartialEq)]
pub struct ObservedPoint {
    pub instrument: String,
    pub band: String,
    pub wavelength: f64,
    pub flux: f64,
    pub error: f64,
}

/// The observed SED of the object being fitted.
///
/// Columns: Instrument, Band, Wavelength, Flux, Error. Flux and error are
/// in the same units as the mock fluxes of the simulated SEDs.
#[derive(Debug, Clone, Default)]
pub struct ObservedSed {
    points: Vec<ObservedPoint>,
}

impl ObservedSed {
    pub fn new(points: Vec<ObservedPoint>) -> Self {
        Self { points }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, TableError> {
        let (_, raw_rows) = tables::read_raw(path.as_ref())?;
        let mut points = Vec::with_capacity(raw_rows.len());
        for row in &raw_rows {
            tables::expect_fields(row, 5)?;
            let error = tables::parse_f64(&row.fields[4], row.line)?;
            // A zero error would blow up the chi-squared term.
            if error <= 0.0 {
                return Err(TableError::Parse {
                    line: row.line,
                    message: format!("flux error must be positive, found {error}"),
                });
            }
            points.push(ObservedPoint {
                instrument: row.fields[0].clone(),
                band: row.fields[1].clone(),
                wavelength: tables::parse_f64(&row.fields[2], row.line)?,
                flux: tables::parse_f64(&row.fields[3], row.line)?,
                error,
            });
        }
        Ok(Self { points })
    }

    pub fn points(&self) -> &[ObservedPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Instrument/band pairs in file order.
    pub fn bands(&self) -> Vec<(String, String)> {
        self.points
            .iter()
            .map(|p| (p.instrument.clone(), p.band.clone()))
            .collect()
    }

    pub fn point_for(&self, instrument: &str, band: &str) -> Option<&ObservedPoint> {
        self.points
            .iter()
            .find(|p| p.instrument == instrument && p.band == band)
    }
}

/// One mock flux point of a simulated SED.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulatedPoint {
    pub instrument: String,
    pub band: String,
    pub flux: f64,
}

/// The mock-observed SED produced for one simulation.
///
/// Columns: Instrument, Band, Flux.
#[derive(Debug, Clone, Default)]
pub struct SimulatedSed {
    points: Vec<SimulatedPoint>,
}

impl SimulatedSed {
    pub fn new(points: Vec<SimulatedPoint>) -> Self {
        Self { points }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, TableError> {
        let (_, raw_rows) = tables::read_raw(path.as_ref())?;
        let mut points = Vec::with_capacity(raw_rows.len());
        for row in &raw_rows {
            tables::expect_fields(row, 3)?;
            points.push(SimulatedPoint {
                instrument: row.fields[0].clone(),
                band: row.fields[1].clone(),
                flux: tables::parse_f64(&row.fields[2], row.line)?,
            });
        }
        Ok(Self { points })
    }

    pub fn points(&self) -> &[SimulatedPoint] {
        &self.points
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// The per-band contribution to a chi-squared score.
#[derive(Debug, Clone, PartialEq)]
pub struct FluxDifference {
    pub instrument: String,
    pub band: String,
    pub difference: f64,
    pub relative_difference: f64,
    pub chi_squared_term: f64,
}

/// Per-band differences between a simulated and the observed SED.
///
/// Bands with no observed counterpart or no weight entry are skipped; the
/// skipped bands are reported alongside the differences so callers can warn.
pub struct FluxComparison {
    pub differences: Vec<FluxDifference>,
    pub skipped_bands: Vec<(String, String)>,
}

pub fn flux_differences(
    observed: &ObservedSed,
    simulated: &SimulatedSed,
    weights: &crate::tables::WeightsTable,
) -> FluxComparison {
    let mut differences = Vec::new();
    let mut skipped_bands = Vec::new();
    for point in simulated.points() {
        let observed_point = observed.point_for(&point.instrument, &point.band);
        let weight = weights.weight_for(&point.instrument, &point.band);
        let (observed_point, weight) = match (observed_point, weight) {
            (Some(o), Some(w)) => (o, w),
            _ => {
                skipped_bands.push((point.instrument.clone(), point.band.clone()));
                continue;
            }
        };
        let difference = point.flux - observed_point.flux;
        let relative_difference = difference / observed_point.flux;
        let chi_squared_term =
            weight * difference * difference / (observed_point.error * observed_point.error);
        differences.push(FluxDifference {
            instrument: point.instrument.clone(),
            band: point.band.clone(),
            difference,
            relative_difference,
            chi_squared_term,
        });
    }
    FluxComparison {
        differences,
        skipped_bands,
    }
}

/// Reduced chi-squared of a comparison.
///
/// Divides the weighted sum of squares by the degrees of freedom,
/// `n_observed_points - n_free_parameters - 1`. The dof counts the
/// observed points, not the compared bands, so skipping a band leaves
/// the scale of the scores unchanged.
pub fn reduced_chi_squared(
    differences: &[FluxDifference],
    n_observed_points: usize,
    n_free_parameters: usize,
) -> Result<f64, EvaluationError> {
    if differences.is_empty() {
        return Err(EvaluationError::NoComparableBands);
    }
    let dof = n_observed_points as i64 - n_free_parameters as i64 - 1;
    if dof <= 0 {
        return Err(EvaluationError::NonPositiveDof {
            points: n_observed_points,
            free_parameters: n_free_parameters,
        });
    }
    let sum: f64 = differences.iter().map(|d| d.chi_squared_term).sum();
    Ok(sum / dof as f64)
}

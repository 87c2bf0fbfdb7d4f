//! Free-parameter definitions for a fitting run.
//!
//! A fitting run explores a fixed, ordered set of free model parameters.
//! Each parameter carries a label, an allowed range, a scale (linear or
//! logarithmic) that controls how the genetic operators move through the
//! range, an optional unit, and the number of significant digits used when
//! values are written into simulator parameter files and tables.

use crate::errors::ParameterError;
use serde::{Deserialize, Serialize};

/// Scale on which a parameter is explored.
///
/// Log-scale parameters (luminosities, masses, opacities) are sampled and
/// perturbed in log space so that the search treats each decade equally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParameterScale {
    Linear,
    Log,
}

/// An inclusive parameter range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParameterRange {
    pub min: f64,
    pub max: f64,
}

impl ParameterRange {
    /// Create a new range. Both bounds must be finite and `min < max`.
    pub fn new(min: f64, max: f64) -> Result<Self, ParameterError> {
        if !min.is_finite() || !max.is_finite() || min >= max {
            return Err(ParameterError::InvalidRange { min, max });
        }
        Ok(Self { min, max })
    }

    /// Width of the range.
    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Clamp a value into the range.
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    /// Whether a value lies inside the range (inclusive).
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// A single free model parameter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FreeParameter {
    /// Short label, also the placeholder name in the ski template.
    pub label: String,
    /// Human-readable description.
    pub description: String,
    /// Unit string, if the parameter is dimensional.
    pub unit: Option<String>,
    /// Allowed range in linear (physical) units.
    pub range: ParameterRange,
    /// Scale on which the range is explored.
    pub scale: ParameterScale,
    /// Significant digits when formatting values.
    pub ndigits: usize,
}

impl FreeParameter {
    /// Create a new free parameter, validating the range against the scale.
    pub fn new(
        label: impl Into<String>,
        description: impl Into<String>,
        unit: Option<String>,
        range: ParameterRange,
        scale: ParameterScale,
        ndigits: usize,
    ) -> Result<Self, ParameterError> {
        if scale == ParameterScale::Log && range.min <= 0.0 {
            return Err(ParameterError::NonPositiveLogRange { min: range.min });
        }
        Ok(Self {
            label: label.into(),
            description: description.into(),
            unit,
            range,
            scale,
            ndigits: ndigits.max(1),
        })
    }

    /// Map a physical value into the scaled space the operators work in.
    pub fn to_scaled(&self, value: f64) -> f64 {
        match self.scale {
            ParameterScale::Linear => value,
            ParameterScale::Log => value.ln(),
        }
    }

    /// Map a scaled value back to physical units, clamped to the range.
    pub fn from_scaled(&self, scaled: f64) -> f64 {
        let value = match self.scale {
            ParameterScale::Linear => scaled,
            ParameterScale::Log => scaled.exp(),
        };
        self.range.clamp(value)
    }

    /// The range expressed in scaled space.
    pub fn scaled_range(&self) -> ParameterRange {
        // Construction validated min < max, which ln() preserves.
        ParameterRange {
            min: self.to_scaled(self.range.min),
            max: self.to_scaled(self.range.max),
        }
    }

    /// Format a value with this parameter's number of significant digits.
    pub fn format_value(&self, value: f64) -> String {
        format_significant(value, self.ndigits)
    }
}

/// Format a value with a given number of significant digits.
pub fn format_significant(value: f64, ndigits: usize) -> String {
    if value == 0.0 || !value.is_finite() {
        return format!("{value}");
    }
    let magnitude = value.abs().log10().floor() as i32;
    let decimals = (ndigits as i32 - 1 - magnitude).max(0) as usize;
    if magnitude.abs() >= 5 {
        format!("{:.*e}", ndigits.saturating_sub(1), value)
    } else {
        format!("{value:.decimals$}")
    }
}

/// The ordered set of free parameters of a fitting run.
///
/// The order is significant: genomes are plain vectors whose genes are
/// matched to parameters by position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParameterSet {
    parameters: Vec<FreeParameter>,
}

impl ParameterSet {
    /// Create a parameter set. Labels must be unique and the set non-empty.
    pub fn new(parameters: Vec<FreeParameter>) -> Result<Self, ParameterError> {
        if parameters.is_empty() {
            return Err(ParameterError::EmptySet);
        }
        for (i, parameter) in parameters.iter().enumerate() {
            if parameters[..i].iter().any(|p| p.label == parameter.label) {
                return Err(ParameterError::DuplicateLabel(parameter.label.clone()));
            }
        }
        Ok(Self { parameters })
    }

    /// Number of free parameters.
    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    /// All parameters in order.
    pub fn parameters(&self) -> &[FreeParameter] {
        &self.parameters
    }

    /// The labels in order.
    pub fn labels(&self) -> Vec<&str> {
        self.parameters.iter().map(|p| p.label.as_str()).collect()
    }

    /// Position of a label in the set.
    pub fn index_for_label(&self, label: &str) -> Result<usize, ParameterError> {
        self.parameters
            .iter()
            .position(|p| p.label == label)
            .ok_or_else(|| ParameterError::UnknownLabel(label.to_string()))
    }

    /// Parameter definition for a label.
    pub fn get(&self, label: &str) -> Result<&FreeParameter, ParameterError> {
        let index = self.index_for_label(label)?;
        Ok(&self.parameters[index])
    }

    /// Parameter definition by position.
    pub fn at(&self, index: usize) -> &FreeParameter {
        &self.parameters[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parameter(label: &str, min: f64, max: f64, scale: ParameterScale) -> FreeParameter {
        FreeParameter::new(label, "", None, ParameterRange::new(min, max).unwrap(), scale, 4)
            .unwrap()
    }

    #[test]
    fn test_range_validation() {
        assert!(ParameterRange::new(0.0, 1.0).is_ok());
        assert!(ParameterRange::new(1.0, 1.0).is_err());
        assert!(ParameterRange::new(2.0, 1.0).is_err());
        assert!(ParameterRange::new(f64::NAN, 1.0).is_err());
        assert!(ParameterRange::new(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_log_scale_requires_positive_min() {
        let range = ParameterRange::new(0.0, 10.0).unwrap();
        let result = FreeParameter::new("mass", "", None, range, ParameterScale::Log, 3);
        assert!(matches!(result, Err(ParameterError::NonPositiveLogRange { .. })));
    }

    #[test]
    fn test_scaled_round_trip() {
        let p = parameter("mass", 1e5, 1e9, ParameterScale::Log);
        let value = 3.2e7;
        let back = p.from_scaled(p.to_scaled(value));
        assert!((back - value).abs() / value < 1e-12);
    }

    #[test]
    fn test_from_scaled_clamps() {
        let p = parameter("fraction", 0.1, 0.5, ParameterScale::Linear);
        assert_eq!(p.from_scaled(2.0), 0.5);
        assert_eq!(p.from_scaled(-1.0), 0.1);
    }

    #[test]
    fn test_format_significant() {
        assert_eq!(format_significant(1234.5, 3), "1234");
        assert_eq!(format_significant(0.012345, 3), "0.0123");
        assert_eq!(format_significant(0.0, 3), "0");
        // Large magnitudes switch to scientific notation
        assert_eq!(format_significant(1.2345e7, 3), "1.23e7");
    }

    #[test]
    fn test_parameter_set_rejects_duplicates() {
        let p1 = parameter("mass", 1.0, 2.0, ParameterScale::Linear);
        let p2 = parameter("mass", 3.0, 4.0, ParameterScale::Linear);
        assert!(matches!(
            ParameterSet::new(vec![p1, p2]),
            Err(ParameterError::DuplicateLabel(_))
        ));
    }

    #[test]
    fn test_parameter_set_rejects_empty() {
        assert!(matches!(ParameterSet::new(vec![]), Err(ParameterError::EmptySet)));
    }

    #[test]
    fn test_parameter_set_lookup() {
        let set = ParameterSet::new(vec![
            parameter("mass", 1.0, 2.0, ParameterScale::Linear),
            parameter("luminosity", 1.0, 100.0, ParameterScale::Log),
        ])
        .unwrap();

        assert_eq!(set.len(), 2);
        assert_eq!(set.index_for_label("luminosity").unwrap(), 1);
        assert_eq!(set.labels(), vec!["mass", "luminosity"]);
        assert!(matches!(
            set.index_for_label("radius"),
            Err(ParameterError::UnknownLabel(_))
        ));
    }
}

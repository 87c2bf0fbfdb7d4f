//! Simulation configuration templates.
//!
//! A template is the simulator's native configuration file with free
//! parameter values replaced by `[[label]]` placeholders. Instantiating a
//! template substitutes concrete, rounded values for the placeholders.

use crate::errors::SkiError;
use crate::genome::Genome;
use crate::params::ParameterSet;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// A simulation configuration template with `[[label]]` placeholders.
#[derive(Debug, Clone)]
pub struct SkiTemplate {
    content: String,
    placeholders: Vec<String>,
}

impl SkiTemplate {
    pub fn new(content: impl Into<String>) -> Result<Self, SkiError> {
        let content = content.into();
        let placeholders = scan_placeholders(&content)?;
        Ok(Self {
            content,
            placeholders,
        })
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SkiError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::new(content)
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Placeholder labels in order of first appearance, without duplicates.
    pub fn placeholders(&self) -> &[String] {
        &self.placeholders
    }

    /// Checks that the placeholders and the free parameters match one to one.
    pub fn validate_against(&self, parameters: &ParameterSet) -> Result<(), SkiError> {
        for placeholder in &self.placeholders {
            if parameters.index_for_label(placeholder).is_err() {
                return Err(SkiError::UnknownPlaceholder(placeholder.clone()));
            }
        }
        for label in parameters.labels() {
            if !self.placeholders.iter().any(|p| p == label) {
                return Err(SkiError::MissingPlaceholder(label.to_string()));
            }
        }
        Ok(())
    }

    /// Substitutes the genome's values into the template.
    ///
    /// Values are formatted with each parameter's significant digit count,
    /// so the written file matches what the parameters table records.
    pub fn instantiate(
        &self,
        parameters: &ParameterSet,
        genome: &Genome,
    ) -> Result<String, SkiError> {
        self.validate_against(parameters)?;
        let mut result = self.content.clone();
        for (index, parameter) in parameters.parameters().iter().enumerate() {
            let value = genome.get(index).unwrap_or(parameter.range.min);
            let needle = format!("[[{}]]", parameter.label);
            result = result.replace(&needle, &parameter.format_value(value));
        }
        Ok(result)
    }

    /// Instantiates the template and writes the result to `path`.
    pub fn write_instance(
        &self,
        parameters: &ParameterSet,
        genome: &Genome,
        path: impl AsRef<Path>,
    ) -> Result<(), SkiError> {
        let instance = self.instantiate(parameters, genome)?;
        fs::write(path.as_ref(), instance)?;
        Ok(())
    }
}

fn scan_placeholders(content: &str) -> Result<Vec<String>, SkiError> {
    let mut placeholders = Vec::new();
    let mut seen = HashSet::new();
    let mut offset = 0;
    while let Some(start) = content[offset..].find("[[") {
        let open = offset + start;
        let after = &content[open + 2..];
        let end = after
            .find("]]")
            .ok_or(SkiError::UnterminatedPlaceholder(open))?;
        let label = after[..end].trim().to_string();
        if label.is_empty() {
            return Err(SkiError::UnterminatedPlaceholder(open));
        }
        if seen.insert(label.clone()) {
            placeholders.push(label);
        }
        offset = open + 2 + end + 2;
    }
    Ok(placeholders)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{FreeParameter, ParameterRange, ParameterScale};

    fn test_parameters() -> ParameterSet {
        ParameterSet::new(vec![
            FreeParameter::new(
                "dust_mass",
                "",
                Some("Msun".to_string()),
                ParameterRange::new(1e5, 1e9).unwrap(),
                ParameterScale::Log,
                4,
            )
            .unwrap(),
            FreeParameter::new(
                "inclination",
                "",
                Some("deg".to_string()),
                ParameterRange::new(0.0, 90.0).unwrap(),
                ParameterScale::Linear,
                3,
            )
            .unwrap(),
        ])
        .unwrap()
    }

    #[test]
    fn test_scan_placeholders() {
        let template =
            SkiTemplate::new("mass=\"[[dust_mass]] Msun\" angle=\"[[inclination]] deg\"").unwrap();
        assert_eq!(template.placeholders(), &["dust_mass", "inclination"]);
    }

    #[test]
    fn test_duplicate_placeholder_listed_once() {
        let template = SkiTemplate::new("[[a]] and [[a]] again").unwrap();
        assert_eq!(template.placeholders(), &["a"]);
    }

    #[test]
    fn test_unterminated_placeholder() {
        assert!(matches!(
            SkiTemplate::new("mass=\"[[dust_mass\""),
            Err(SkiError::UnterminatedPlaceholder(_))
        ));
    }

    #[test]
    fn test_validate_unknown_and_missing() {
        let parameters = test_parameters();
        let unknown = SkiTemplate::new("[[dust_mass]] [[inclination]] [[extra]]").unwrap();
        assert!(matches!(
            unknown.validate_against(&parameters),
            Err(SkiError::UnknownPlaceholder(label)) if label == "extra"
        ));

        let missing = SkiTemplate::new("[[dust_mass]]").unwrap();
        assert!(matches!(
            missing.validate_against(&parameters),
            Err(SkiError::MissingPlaceholder(label)) if label == "inclination"
        ));
    }

    #[test]
    fn test_instantiate() {
        let parameters = test_parameters();
        let template =
            SkiTemplate::new("mass=\"[[dust_mass]] Msun\" angle=\"[[inclination]] deg\"").unwrap();
        let genome = Genome::new(vec![2.5e7, 45.0]);
        let instance = template.instantiate(&parameters, &genome).unwrap();
        assert!(!instance.contains("[["));
        assert!(instance.contains("45"));
    }
}

//! Model probabilities from chi-squared scores.

use crate::error::AnalysisError;
use sedfit_core::run::FittingRun;
use sedfit_core::tables::ChiSquaredTable;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;

/// The probability assigned to one scored model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelProbability {
    pub simulation_name: String,
    pub chi_squared: f64,
    pub probability: f64,
}

/// Turn a generation's chi-squared scores into normalized probabilities.
///
/// A model's likelihood is `exp(-chi2 / 2)`, normalized over the
/// generation. When every likelihood underflows to zero the models are
/// assigned equal probability rather than dividing by zero.
pub fn generation_probabilities(
    generation_name: &str,
    scores: &ChiSquaredTable,
) -> Result<Vec<ModelProbability>, AnalysisError> {
    if scores.is_empty() {
        return Err(AnalysisError::EmptyGeneration(generation_name.to_string()));
    }
    let likelihoods: Vec<f64> = scores
        .rows()
        .iter()
        .map(|row| (-row.chi_squared / 2.0).exp())
        .collect();
    let total: f64 = likelihoods.iter().sum();

    let probabilities = scores
        .rows()
        .iter()
        .zip(&likelihoods)
        .map(|(row, likelihood)| {
            let probability = if total > 0.0 {
                likelihood / total
            } else {
                1.0 / scores.len() as f64
            };
            ModelProbability {
                simulation_name: row.simulation_name.clone(),
                chi_squared: row.chi_squared,
                probability,
            }
        })
        .collect();
    Ok(probabilities)
}

/// Compute and write the probability table for one finished generation.
///
/// The table lands in the run's `prob/` directory, one file per generation,
/// in the same tab-delimited format as the run tables.
pub fn write_generation_probabilities(
    run: &FittingRun,
    generation_name: &str,
) -> Result<PathBuf, AnalysisError> {
    let generation = run.generation(generation_name)?;
    let probabilities = generation_probabilities(generation_name, &generation.chi_squared_table()?)?;

    let mut content = String::from("# Simulation name\tChi squared\tProbability\n");
    for entry in &probabilities {
        content.push_str(&format!(
            "{}\t{}\t{}\n",
            entry.simulation_name, entry.chi_squared, entry.probability
        ));
    }
    let path = run
        .prob_dir()
        .join(format!("{generation_name}_probabilities.dat"));
    fs::write(&path, content).map_err(|source| AnalysisError::Write {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores(values: &[f64]) -> ChiSquaredTable {
        let mut table = ChiSquaredTable::new();
        for (i, value) in values.iter().enumerate() {
            table.add_entry(format!("sim{i}"), *value).unwrap();
        }
        table
    }

    #[test]
    fn test_probabilities_are_normalized() {
        let probabilities = generation_probabilities("initial", &scores(&[1.0, 2.0, 4.0])).unwrap();
        let total: f64 = probabilities.iter().map(|p| p.probability).sum();
        assert!((total - 1.0).abs() < 1e-12);
        // Lower chi-squared gets the larger probability.
        assert!(probabilities[0].probability > probabilities[1].probability);
        assert!(probabilities[1].probability > probabilities[2].probability);
    }

    #[test]
    fn test_equal_scores_give_equal_probability() {
        let probabilities = generation_probabilities("initial", &scores(&[3.0, 3.0])).unwrap();
        assert!((probabilities[0].probability - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_underflowing_scores_fall_back_to_uniform() {
        let probabilities =
            generation_probabilities("initial", &scores(&[5000.0, 6000.0])).unwrap();
        assert!((probabilities[0].probability - 0.5).abs() < 1e-12);
        assert!((probabilities[1].probability - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_empty_generation_is_an_error() {
        assert!(matches!(
            generation_probabilities("initial", &ChiSquaredTable::new()),
            Err(AnalysisError::EmptyGeneration(_))
        ));
    }
}

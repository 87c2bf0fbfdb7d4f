//! Probability-weighted parameter distributions.

use crate::error::AnalysisError;
use crate::probabilities::generation_probabilities;
use sedfit_core::params::{FreeParameter, ParameterScale};
use sedfit_core::run::FittingRun;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;

/// A probability-weighted histogram over one free parameter.
///
/// Bin edges follow the parameter scale: equal-width bins in linear space,
/// equal-ratio bins in log space. Weights sum to the total probability mass
/// that was accumulated.
#[derive(Debug, Clone, Serialize)]
pub struct ParameterDistribution {
    pub label: String,
    pub scale: ParameterScale,
    /// `n_bins + 1` edges in physical units, ascending.
    pub bin_edges: Vec<f64>,
    pub weights: Vec<f64>,
}

impl ParameterDistribution {
    /// Empty distribution with bins spanning the parameter range.
    pub fn new(parameter: &FreeParameter, n_bins: usize) -> Result<Self, AnalysisError> {
        if n_bins < 2 {
            return Err(AnalysisError::InvalidBinCount(n_bins));
        }
        let scaled = parameter.scaled_range();
        let step = scaled.span() / n_bins as f64;
        let bin_edges = (0..=n_bins)
            .map(|i| parameter.from_scaled(scaled.min + step * i as f64))
            .collect();
        Ok(Self {
            label: parameter.label.clone(),
            scale: parameter.scale,
            bin_edges,
            weights: vec![0.0; n_bins],
        })
    }

    pub fn n_bins(&self) -> usize {
        self.weights.len()
    }

    /// Accumulate one weighted sample.
    pub fn add_sample(&mut self, value: f64, probability: f64) -> Result<(), AnalysisError> {
        let n = self.n_bins();
        let min = self.bin_edges[0];
        let max = self.bin_edges[n];
        if value < min || value > max {
            return Err(AnalysisError::ValueOutOfRange {
                label: self.label.clone(),
                value,
            });
        }
        // Edges are ascending; the last bin is closed on both sides.
        let bin = self
            .bin_edges
            .windows(2)
            .position(|edges| value >= edges[0] && value < edges[1])
            .unwrap_or(n - 1);
        self.weights[bin] += probability;
        Ok(())
    }

    /// Center of a bin, on the parameter's scale.
    pub fn bin_center(&self, bin: usize) -> f64 {
        let low = self.bin_edges[bin];
        let high = self.bin_edges[bin + 1];
        match self.scale {
            ParameterScale::Linear => (low + high) / 2.0,
            ParameterScale::Log => (low * high).sqrt(),
        }
    }

    /// Center of the most heavily weighted bin, if anything was accumulated.
    pub fn most_probable_value(&self) -> Option<f64> {
        let (bin, weight) = self
            .weights
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))?;
        if *weight > 0.0 {
            Some(self.bin_center(bin))
        } else {
            None
        }
    }
}

/// Accumulate distributions for every free parameter over all finished
/// generations of a run.
pub fn run_distributions(
    run: &FittingRun,
    n_bins: usize,
) -> Result<Vec<ParameterDistribution>, AnalysisError> {
    let parameters = &run.config().parameters;
    let mut distributions: Vec<ParameterDistribution> = parameters
        .parameters()
        .iter()
        .map(|p| ParameterDistribution::new(p, n_bins))
        .collect::<Result<_, _>>()?;

    let generations = run.generations_table()?;
    let finished: Vec<String> = generations
        .finished_generations()
        .into_iter()
        .map(str::to_string)
        .collect();
    if finished.is_empty() {
        return Err(AnalysisError::NoFinishedGenerations);
    }

    for name in &finished {
        let generation = run.generation(name)?;
        let probabilities = generation_probabilities(name, &generation.chi_squared_table()?)?;
        let values = generation.parameters_table()?;
        for entry in &probabilities {
            if let Some(row_values) = values.values_for(&entry.simulation_name) {
                for (distribution, value) in distributions.iter_mut().zip(row_values) {
                    distribution.add_sample(*value, entry.probability)?;
                }
            }
        }
    }

    // Each finished generation carries total mass 1; renormalize to 1 overall.
    let n = finished.len() as f64;
    for distribution in &mut distributions {
        for weight in &mut distribution.weights {
            *weight /= n;
        }
    }
    Ok(distributions)
}

/// Write one distribution table per free parameter into the `prob/` directory.
pub fn write_distribution_tables(
    run: &FittingRun,
    n_bins: usize,
) -> Result<Vec<PathBuf>, AnalysisError> {
    let distributions = run_distributions(run, n_bins)?;
    let mut paths = Vec::with_capacity(distributions.len());
    for distribution in &distributions {
        let mut content = String::from("# Bin low\tBin high\tBin center\tProbability\n");
        for bin in 0..distribution.n_bins() {
            content.push_str(&format!(
                "{}\t{}\t{}\t{}\n",
                distribution.bin_edges[bin],
                distribution.bin_edges[bin + 1],
                distribution.bin_center(bin),
                distribution.weights[bin]
            ));
        }
        let path = run
            .prob_dir()
            .join(format!("{}_distribution.dat", distribution.label));
        fs::write(&path, content).map_err(|source| AnalysisError::Write {
            path: path.clone(),
            source,
        })?;
        paths.push(path);
    }
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sedfit_core::params::ParameterRange;

    fn linear_parameter() -> FreeParameter {
        FreeParameter::new(
            "inclination",
            "",
            Some("deg".to_string()),
            ParameterRange::new(0.0, 90.0).unwrap(),
            ParameterScale::Linear,
            3,
        )
        .unwrap()
    }

    fn log_parameter() -> FreeParameter {
        FreeParameter::new(
            "dust_mass",
            "",
            None,
            ParameterRange::new(1e2, 1e6).unwrap(),
            ParameterScale::Log,
            4,
        )
        .unwrap()
    }

    #[test]
    fn test_linear_bins_are_equal_width() {
        let distribution = ParameterDistribution::new(&linear_parameter(), 9).unwrap();
        assert_eq!(distribution.bin_edges.len(), 10);
        for edges in distribution.bin_edges.windows(2) {
            assert!((edges[1] - edges[0] - 10.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_log_bins_are_equal_ratio() {
        let distribution = ParameterDistribution::new(&log_parameter(), 4).unwrap();
        for edges in distribution.bin_edges.windows(2) {
            assert!((edges[1] / edges[0] - 10.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_most_probable_value() {
        let mut distribution = ParameterDistribution::new(&linear_parameter(), 9).unwrap();
        assert!(distribution.most_probable_value().is_none());

        distribution.add_sample(44.0, 0.6).unwrap();
        distribution.add_sample(12.0, 0.4).unwrap();
        let most_probable = distribution.most_probable_value().unwrap();
        // 44.0 falls in the [40, 50) bin.
        assert!((most_probable - 45.0).abs() < 1e-9);
    }

    #[test]
    fn test_range_endpoint_lands_in_last_bin() {
        let mut distribution = ParameterDistribution::new(&linear_parameter(), 9).unwrap();
        distribution.add_sample(90.0, 1.0).unwrap();
        assert_eq!(distribution.weights[8], 1.0);
    }

    #[test]
    fn test_out_of_range_sample_rejected() {
        let mut distribution = ParameterDistribution::new(&linear_parameter(), 9).unwrap();
        assert!(matches!(
            distribution.add_sample(91.0, 1.0),
            Err(AnalysisError::ValueOutOfRange { .. })
        ));
    }

    #[test]
    fn test_too_few_bins() {
        assert!(matches!(
            ParameterDistribution::new(&linear_parameter(), 1),
            Err(AnalysisError::InvalidBinCount(1))
        ));
    }
}

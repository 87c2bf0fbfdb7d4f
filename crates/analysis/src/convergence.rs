//! Convergence of the best chi-squared across generations.

use crate::error::AnalysisError;
use sedfit_core::run::FittingRun;
use serde::Serialize;

/// The best chi-squared of each finished generation, in creation order.
#[derive(Debug, Clone, Serialize)]
pub struct ConvergenceTrend {
    pub points: Vec<(String, f64)>,
}

impl ConvergenceTrend {
    /// Relative improvement between successive generations.
    ///
    /// Positive values mean the best score got lower. One entry per
    /// consecutive pair of generations.
    pub fn relative_improvements(&self) -> Vec<f64> {
        self.points
            .windows(2)
            .map(|pair| {
                let (_, previous) = &pair[0];
                let (_, current) = &pair[1];
                if *previous > 0.0 {
                    (previous - current) / previous
                } else {
                    0.0
                }
            })
            .collect()
    }

    /// Whether the last improvement dropped below the threshold.
    ///
    /// Needs at least two finished generations to say anything.
    pub fn converged(&self, threshold: f64) -> bool {
        match self.relative_improvements().last() {
            Some(improvement) => improvement.abs() < threshold,
            None => false,
        }
    }

    /// The best chi-squared seen so far, with its generation.
    pub fn best(&self) -> Option<&(String, f64)> {
        self.points.iter().min_by(|a, b| a.1.total_cmp(&b.1))
    }
}

/// Build the convergence trend from the run's best-parameters table.
pub fn best_score_trend(run: &FittingRun) -> Result<ConvergenceTrend, AnalysisError> {
    let best = run.best_parameters_table()?;
    if best.is_empty() {
        return Err(AnalysisError::NoFinishedGenerations);
    }
    Ok(ConvergenceTrend {
        points: best
            .rows()
            .iter()
            .map(|row| (row.generation_name.clone(), row.chi_squared))
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trend(scores: &[f64]) -> ConvergenceTrend {
        ConvergenceTrend {
            points: scores
                .iter()
                .enumerate()
                .map(|(i, s)| (format!("Generation{i}"), *s))
                .collect(),
        }
    }

    #[test]
    fn test_relative_improvements() {
        let trend = trend(&[10.0, 5.0, 4.0]);
        let improvements = trend.relative_improvements();
        assert_eq!(improvements.len(), 2);
        assert!((improvements[0] - 0.5).abs() < 1e-12);
        assert!((improvements[1] - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_converged() {
        assert!(!trend(&[10.0, 5.0]).converged(0.01));
        assert!(trend(&[10.0, 5.0, 4.999]).converged(0.01));
        // A single point can never be declared converged.
        assert!(!trend(&[10.0]).converged(0.5));
    }

    #[test]
    fn test_best() {
        let trend = trend(&[10.0, 4.0, 6.0]);
        let (name, score) = trend.best().unwrap();
        assert_eq!(name, "Generation1");
        assert_eq!(*score, 4.0);
    }
}

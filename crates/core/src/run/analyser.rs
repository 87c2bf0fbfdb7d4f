//! Scoring finished simulations against the observed SED.

use crate::errors::{RunError, TableError};
use crate::sed::{flux_differences, reduced_chi_squared, SimulatedSed};
use crate::run::FittingRun;
use crate::storage::{GenerationStats, StatisticsRecorder};
use crate::tables::timestamp;

/// What an analysis step did.
#[derive(Debug)]
pub struct AnalysisSummary {
    pub generation_name: String,
    /// Simulations scored by this invocation, with their chi-squared.
    pub newly_scored: Vec<(String, f64)>,
    /// Simulated bands skipped for lack of an observed flux or weight.
    pub skipped_bands: Vec<(String, String)>,
    /// Whether the generation is now finished.
    pub finished: bool,
    /// Best simulation of the generation, set when it finishes.
    pub best: Option<(String, f64)>,
}

/// Score every simulation of a generation that has output but no score.
///
/// When the last pending simulation is scored the generation is marked
/// finished: its finishing time is stamped, the run's best-parameters table
/// gains a row, and the statistics database is updated.
pub fn analyse_generation(
    run: &FittingRun,
    generation_name: &str,
) -> Result<AnalysisSummary, RunError> {
    let mut generation = run.generation(generation_name)?;
    let observed = run.observed_sed()?;
    let weights = run.weights()?;
    let n_free = run.config().parameters.len();

    let mut scores = generation.chi_squared_table()?;
    let mut newly_scored = Vec::new();
    let mut skipped_bands = Vec::new();
    for job in generation.unevaluated_jobs()? {
        let simulated = SimulatedSed::load(job.sed_path())?;
        let comparison = flux_differences(&observed, &simulated, &weights);
        for band in comparison.skipped_bands {
            if !skipped_bands.contains(&band) {
                skipped_bands.push(band);
            }
        }
        let chi_squared = reduced_chi_squared(&comparison.differences, observed.len(), n_free)?;
        scores.add_entry(&job.simulation_name, chi_squared)?;
        newly_scored.push((job.simulation_name, chi_squared));
    }
    if !newly_scored.is_empty() {
        scores.save(generation.chi_squared_path())?;
    }

    // Only rows naming one of the generation's own simulations count.
    let individuals = generation.individuals_table()?;
    let n_scored = individuals
        .rows()
        .iter()
        .filter(|row| scores.has_simulation(&row.simulation_name))
        .count();
    let finished = n_scored >= generation.info().nsimulations;
    let mut best = None;
    if finished {
        best = individuals
            .rows()
            .iter()
            .filter_map(|row| {
                scores
                    .chi_squared_for(&row.simulation_name)
                    .map(|chi| (row.simulation_name.clone(), chi))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1));
    }

    // First invocation that completes the generation also closes the books.
    if finished && generation.info().finishing_time.is_none() {
        let now = timestamp();
        generation.set_finishing_time(now)?;
        let mut generations = run.generations_table()?;
        generations.set_finishing_time(generation_name, now)?;
        generations.save(run.generations_table_path())?;

        if let Some((best_simulation, best_chi_squared)) = &best {
            let parameters = generation.parameters_table()?;
            let values = parameters
                .values_for(best_simulation)
                .ok_or_else(|| TableError::MissingEntry(best_simulation.clone()))?;
            let mut best_table = run.best_parameters_table()?;
            best_table.add_entry(generation_name, values.to_vec(), *best_chi_squared)?;
            best_table.save(run.best_parameters_path())?;
        }

        let all_scores: Vec<f64> = individuals
            .rows()
            .iter()
            .filter_map(|row| scores.chi_squared_for(&row.simulation_name))
            .collect();
        let stats = GenerationStats::from_scores(
            generation.info().index,
            generation_name,
            generation.info().nsimulations,
            &all_scores,
        );
        let mut recorder = StatisticsRecorder::open(run.statistics_db_path())?;
        recorder.record_generation(&stats)?;
        recorder.close()?;
    }

    Ok(AnalysisSummary {
        generation_name: generation_name.to_string(),
        newly_scored,
        skipped_bands,
        finished,
        best,
    })
}

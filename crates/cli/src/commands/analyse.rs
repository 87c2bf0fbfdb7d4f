use anyhow::{bail, Context, Result};
use sedfit_analysis::{best_score_trend, write_distribution_tables, write_generation_probabilities};
use sedfit_core::run::{analyse_generation, FittingRun};
use std::path::Path;

pub fn analyse_run(run_path: &Path, generation: Option<&str>, bins: usize) -> Result<()> {
    println!("📊 sedfit - Analysing Simulations");
    println!("============================================\n");

    let run = FittingRun::open(run_path)
        .with_context(|| format!("failed to open the run at {}", run_path.display()))?;

    let generation_name = match generation {
        Some(name) => name.to_string(),
        None => match run.last_generation()? {
            Some(generation) => generation.name().to_string(),
            None => bail!("no generation to analyse; run `sedfit explore` first"),
        },
    };
    println!("Generation: {generation_name}");

    let summary = analyse_generation(&run, &generation_name)
        .with_context(|| format!("failed to analyse generation '{generation_name}'"))?;

    for (instrument, band) in &summary.skipped_bands {
        println!("  ⚠ skipping simulated band {instrument} {band}: no observed flux or weight");
    }
    println!("✓ {} simulation(s) newly scored", summary.newly_scored.len());
    for (simulation, chi_squared) in &summary.newly_scored {
        println!("  • {simulation}: chi-squared {chi_squared:.4}");
    }

    if !summary.finished {
        println!("\nGeneration '{generation_name}' is not finished yet; launch the remaining simulations and analyse again.");
        return Ok(());
    }

    if let Some((best_simulation, best_chi_squared)) = &summary.best {
        println!("\n🏆 Generation finished. Best model: {best_simulation} (chi-squared {best_chi_squared:.4})");
    }

    let probabilities_path = write_generation_probabilities(&run, &generation_name)
        .context("failed to write the probability table")?;
    println!("✓ Probabilities written to {}", probabilities_path.display());

    let distribution_paths = write_distribution_tables(&run, bins)
        .context("failed to write the parameter distribution tables")?;
    for path in distribution_paths {
        println!("✓ Distribution written to {}", path.display());
    }

    let trend = best_score_trend(&run)?;
    if let Some(&improvement) = trend.relative_improvements().last() {
        println!(
            "\nBest chi-squared improved by {:.2}% over the previous generation.",
            improvement * 100.0
        );
    }

    println!(
        "\nNext: `sedfit explore --run {}` to breed the next generation.",
        run.path().display()
    );
    Ok(())
}

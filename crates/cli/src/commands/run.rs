use anyhow::{bail, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use sedfit_core::launch::{launch_pending, ExternalRunner, SimulationJob};
use sedfit_core::run::FittingRun;
use std::path::Path;

pub fn run_simulations(run_path: &Path, generation: Option<&str>, progress: bool) -> Result<()> {
    println!("🚀 sedfit - Launching Simulations");
    println!("============================================\n");

    let run = FittingRun::open(run_path)
        .with_context(|| format!("failed to open the run at {}", run_path.display()))?;

    let generation = match generation {
        Some(name) => run
            .generation(name)
            .with_context(|| format!("unknown generation '{name}'"))?,
        None => match run.last_unfinished_generation()? {
            Some(generation) => generation,
            None => bail!(
                "no unfinished generation to launch; run `sedfit explore` first or pass --generation"
            ),
        },
    };
    println!("Generation: {}", generation.name());

    let jobs = generation.simulation_jobs()?;
    let pending: Vec<&SimulationJob> = jobs.iter().filter(|job| !job.has_output()).collect();
    if pending.is_empty() {
        println!("✓ All {} simulations already have output; nothing to launch.", jobs.len());
        return Ok(());
    }
    println!("{} of {} simulations still need output\n", pending.len(), jobs.len());

    let bar = if progress {
        let bar = ProgressBar::new(pending.len() as u64);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
                .unwrap()
                .progress_chars("#>-"),
        );
        Some(bar)
    } else {
        None
    };

    let runner = ExternalRunner::new(run.config().simulator.clone());
    let summary = launch_pending(&jobs, &runner, |job| {
        if let Some(bar) = &bar {
            bar.set_message(job.simulation_name.clone());
            bar.inc(1);
        }
    });
    if let Some(bar) = bar {
        bar.finish_and_clear();
    }

    let mut timing = run.timing_table()?;
    let mut memory = run.memory_table()?;
    for outcome in &summary.outcomes {
        if outcome.succeeded() {
            timing.add_entry(&outcome.simulation_name, generation.name(), outcome.runtime_s)?;
            memory.add_entry(&outcome.simulation_name, generation.name(), outcome.peak_gb)?;
        }
    }
    timing.save(run.timing_path())?;
    memory.save(run.memory_path())?;

    println!("✓ {} simulation(s) completed", summary.n_succeeded());
    for outcome in &summary.outcomes {
        if let Some(error) = &outcome.error {
            println!("  ✗ {}: {error}", outcome.simulation_name);
        }
    }
    if summary.n_failed() > 0 {
        println!(
            "\n{} simulation(s) failed; re-run this command to retry only those.",
            summary.n_failed()
        );
    } else {
        println!(
            "\nNext: `sedfit analyse --run {}` to score the generation.",
            run.path().display()
        );
    }
    Ok(())
}

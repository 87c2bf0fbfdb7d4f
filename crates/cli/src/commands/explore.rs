use anyhow::{Context, Result};
use sedfit_core::run::{explore, FittingRun};
use std::path::Path;

pub fn explore_run(run_path: &Path) -> Result<()> {
    println!("🧬 sedfit - Exploring Parameter Space");
    println!("============================================\n");

    let run = FittingRun::open(run_path)
        .with_context(|| format!("failed to open the run at {}", run_path.display()))?;

    let summary = explore(&run).context("failed to create the next generation")?;

    println!("✓ Created generation '{}' (index {})", summary.generation_name, summary.index);
    println!("✓ {} simulations prepared", summary.nsimulations);
    if summary.n_elitism > 0 {
        println!("✓ {} elite(s) reinserted from the previous generation", summary.n_elitism);
    }
    println!(
        "\nNext: `sedfit run --run {}` to launch the simulations.",
        run.path().display()
    );
    Ok(())
}

use anyhow::{Context, Result};
use sedfit_core::run::FittingRun;
use sedfit_core::storage::StatisticsQuery;
use std::path::Path;

use crate::printing::{print_config, print_generations};

pub fn show_status(run_path: &Path) -> Result<()> {
    println!("🔍 sedfit - Run Status");
    println!("============================================");

    let run = FittingRun::open(run_path)
        .with_context(|| format!("failed to open the run at {}", run_path.display()))?;

    print_config(run.config());

    println!("\n  Generations:");
    print_generations(&run.generations_table()?);

    let query = StatisticsQuery::open(run.statistics_db_path())
        .context("failed to open the statistics database")?;
    let stats = query.generation_stats()?;
    if !stats.is_empty() {
        println!("\n  Chi-squared per finished generation:");
        println!(
            "  {:<14} {:>10} {:>10} {:>10} {:>10}",
            "Generation", "Best", "Worst", "Mean", "Stddev"
        );
        for row in &stats {
            let fmt = |value: Option<f64>| match value {
                Some(v) => format!("{v:.4}"),
                None => "--".to_string(),
            };
            println!(
                "  {:<14} {:>10} {:>10} {:>10} {:>10}",
                row.generation_name,
                fmt(row.best_chi_squared),
                fmt(row.worst_chi_squared),
                fmt(row.mean_chi_squared),
                fmt(row.stddev_chi_squared)
            );
        }
        if let Some((generation, chi_squared)) = query.overall_best()? {
            println!("\n  Overall best so far: {generation} (chi-squared {chi_squared:.4})");
        }
    }
    query.close()?;

    let timing = run.timing_table()?;
    if let Some(mean) = timing.mean_runtime() {
        println!("\n  Mean simulation runtime: {mean:.1} s over {} run(s)", timing.rows().len());
    }
    Ok(())
}

use anyhow::{bail, Context, Result};
use sedfit_core::run::FittingRun;
use std::path::Path;

use crate::printing::print_best_values;

pub fn show_best(run_path: &Path, generation: Option<&str>) -> Result<()> {
    println!("🏆 sedfit - Best Parameters");
    println!("============================================\n");

    let run = FittingRun::open(run_path)
        .with_context(|| format!("failed to open the run at {}", run_path.display()))?;

    let table = run.best_parameters_table()?;
    if table.is_empty() {
        bail!("no finished generation yet; launch and analyse one first");
    }

    let row = match generation {
        Some(name) => table
            .get(name)
            .with_context(|| format!("generation '{name}' has no best-parameters record"))?,
        None => match table.overall_best() {
            Some(row) => row,
            None => bail!("no finished generation yet; launch and analyse one first"),
        },
    };

    println!("Generation: {}", row.generation_name);
    print_best_values(table.labels(), &row.values, row.chi_squared);
    Ok(())
}

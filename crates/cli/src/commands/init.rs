use anyhow::{Context, Result};
use sedfit_core::launch::SimulatorConfig;
use sedfit_core::run::{FitConfig, FittingRun};
use sedfit_core::tables::WeightsTable;

use crate::args::InitArgs;
use crate::printing::print_config;
use crate::utils::{build_genetic_settings, build_parameter_set};

pub fn init_run(args: &InitArgs) -> Result<()> {
    println!("🔭 sedfit - Creating Fitting Run");
    println!("============================================\n");

    let parameters = build_parameter_set(&args.parameters)?;
    let genetic = build_genetic_settings(args)?;

    let config = FitConfig {
        run_name: args.name.clone(),
        parameters,
        genetic,
        simulator: SimulatorConfig {
            binary: args.simulator.clone(),
            nprocesses: args.nprocesses,
            nthreads: args.nthreads,
            arguments: args.simulator_args.clone(),
        },
        seed: args.seed,
    };

    let weights = match &args.weights {
        Some(path) => Some(
            WeightsTable::load(path)
                .with_context(|| format!("failed to load weights from {}", path.display()))?,
        ),
        None => None,
    };

    let run = FittingRun::create(
        &args.directory,
        config,
        &args.observed_sed,
        &args.template,
        weights,
    )
    .context("failed to create the fitting run")?;

    print_config(run.config());

    let observed = run.observed_sed()?;
    println!("\n✓ Observed SED: {} flux points", observed.len());
    println!("✓ Run created at {}", run.path().display());
    println!("\nNext: `sedfit explore --run {}` to build the initial generation.", run.path().display());
    Ok(())
}

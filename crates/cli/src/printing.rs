use sedfit_core::evolution::{CrossoverModel, MutationModel, SelectionModel};
use sedfit_core::params::ParameterScale;
use sedfit_core::run::FitConfig;
use sedfit_core::tables::{GenerationsTable, GenerationStatus};

pub fn print_config(config: &FitConfig) {
    println!("\n📋 Fitting Run Configuration");
    println!("  • Run name: {}", config.run_name);
    println!("  • Population size: {} [-n, --population-size]", config.genetic.population_size);
    println!("  • Elites: {} [--elites]", config.genetic.n_elites);
    match config.genetic.mutation.model {
        MutationModel::Uniform => {
            println!("  • Mutation: uniform, rate {}", config.genetic.mutation.rate)
        }
        MutationModel::Gaussian { sigma_fraction } => println!(
            "  • Mutation: gaussian (sigma {sigma_fraction}), rate {}",
            config.genetic.mutation.rate
        ),
    }
    match config.genetic.crossover.model {
        CrossoverModel::OnePoint => {
            println!("  • Crossover: one-point, rate {}", config.genetic.crossover.rate)
        }
        CrossoverModel::Uniform => {
            println!("  • Crossover: uniform, rate {}", config.genetic.crossover.rate)
        }
        CrossoverModel::Blend { alpha } => println!(
            "  • Crossover: blend (alpha {alpha}), rate {}",
            config.genetic.crossover.rate
        ),
    }
    match config.genetic.selection.model {
        SelectionModel::Tournament { size } => println!("  • Selection: tournament of {size}"),
        SelectionModel::Roulette => println!("  • Selection: roulette"),
    }
    println!(
        "  • Simulator: {} ({} processes, {} threads)",
        config.simulator.binary.display(),
        config.simulator.nprocesses,
        config.simulator.nthreads
    );
    match config.seed {
        Some(seed) => println!("  • Seed: {seed}"),
        None => println!("  • Seed: from entropy"),
    }

    println!("\n  Free parameters:");
    for parameter in config.parameters.parameters() {
        let scale = match parameter.scale {
            ParameterScale::Linear => "linear",
            ParameterScale::Log => "log",
        };
        let unit = parameter.unit.as_deref().unwrap_or("-");
        println!(
            "  • {}: [{}, {}] ({scale}, {} digits, unit {unit})",
            parameter.label, parameter.range.min, parameter.range.max, parameter.ndigits
        );
    }
}

pub fn print_generations(table: &GenerationsTable) {
    if table.rows().is_empty() {
        println!("  (no generations yet; run `sedfit explore` to create one)");
        return;
    }
    println!("  {:<14} {:>6} {:>12} {:>10}", "Generation", "Index", "Simulations", "Status");
    for row in table.rows() {
        let status = match row.finishing_time {
            Some(_) => "finished",
            None => "unfinished",
        };
        println!(
            "  {:<14} {:>6} {:>12} {:>10}",
            row.name, row.index, row.nsimulations, status
        );
    }
    let finished = table
        .rows()
        .iter()
        .filter(|row| table.status(&row.name).ok() == Some(GenerationStatus::Finished))
        .count();
    println!("\n  {} generation(s), {} finished", table.rows().len(), finished);
}

pub fn print_best_values(labels: &[String], values: &[f64], chi_squared: f64) {
    for (label, value) in labels.iter().zip(values) {
        println!("  • {label} = {value}");
    }
    println!("  • chi-squared = {chi_squared}");
}

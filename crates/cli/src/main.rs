//! sedfit command line interface.

mod args;
mod commands;
pub mod defaults;
mod printing;
mod utils;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::args::InitArgs;

#[derive(Parser)]
#[command(
    name = "sedfit",
    about = "Fit SED models to observations with a genetic algorithm driving a radiative transfer simulator",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new fitting run
    Init(Box<InitArgs>),

    /// Create the next generation (random initially, bred afterwards)
    Explore {
        /// Run directory
        #[arg(short, long, default_value = defaults::BASE_DIRECTORY)]
        run: PathBuf,
    },

    /// Launch the pending simulations of a generation
    Run {
        /// Run directory
        #[arg(short, long, default_value = defaults::BASE_DIRECTORY)]
        run: PathBuf,

        /// Generation to launch (defaults to the last unfinished one)
        #[arg(short, long)]
        generation: Option<String>,

        /// Suppress the progress bar
        #[arg(long)]
        no_progress: bool,
    },

    /// Score finished simulations against the observed SED
    Analyse {
        /// Run directory
        #[arg(short, long, default_value = defaults::BASE_DIRECTORY)]
        run: PathBuf,

        /// Generation to analyse (defaults to the last one)
        #[arg(short, long)]
        generation: Option<String>,

        /// Bin count for the parameter distribution tables
        #[arg(long, default_value_t = defaults::DISTRIBUTION_BINS)]
        bins: usize,
    },

    /// Show the run configuration and generation progress
    Status {
        /// Run directory
        #[arg(short, long, default_value = defaults::BASE_DIRECTORY)]
        run: PathBuf,
    },

    /// Show the best parameter values found so far
    Best {
        /// Run directory
        #[arg(short, long, default_value = defaults::BASE_DIRECTORY)]
        run: PathBuf,

        /// Restrict to one generation (defaults to the overall best)
        #[arg(short, long)]
        generation: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Init(args) => commands::init::init_run(&args),
        Commands::Explore { run } => commands::explore::explore_run(&run),
        Commands::Run {
            run,
            generation,
            no_progress,
        } => commands::run::run_simulations(&run, generation.as_deref(), !no_progress),
        Commands::Analyse {
            run,
            generation,
            bins,
        } => commands::analyse::analyse_run(&run, generation.as_deref(), bins),
        Commands::Status { run } => commands::status::show_status(&run),
        Commands::Best { run, generation } => commands::best::show_best(&run, generation.as_deref()),
    }
}

//! Shared default values for fitting-run configuration.
//! Used by the `init` command's clap defaults and echoed by `status`.

pub const BASE_DIRECTORY: &str = ".";

pub const POPULATION_SIZE: usize = 32;
pub const N_ELITES: usize = 2;

pub const MUTATION_RATE: f64 = 0.05;
pub const MUTATION_MODEL: &str = "gaussian";
pub const MUTATION_SIGMA: f64 = 0.1;

pub const CROSSOVER_RATE: f64 = 0.65;
pub const CROSSOVER_MODEL: &str = "blend";
pub const BLEND_ALPHA: f64 = 0.5;

pub const SELECTION_MODEL: &str = "tournament";
pub const TOURNAMENT_SIZE: usize = 3;

pub const SIMULATOR_BINARY: &str = "skirt";
pub const NPROCESSES: usize = 1;
pub const NTHREADS: usize = 1;

pub const DISTRIBUTION_BINS: usize = 20;

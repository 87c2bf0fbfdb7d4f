use crate::defaults;
use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Fitting run name (also its directory name)
    #[arg(short = 'N', long)]
    pub name: String,

    /// Directory the run is created under
    #[arg(short = 'd', long, default_value = defaults::BASE_DIRECTORY)]
    pub directory: PathBuf,

    /// Observed SED file (Instrument/Band/Wavelength/Flux/Error columns)
    #[arg(long)]
    pub observed_sed: PathBuf,

    /// Ski template with [[label]] placeholders
    #[arg(long)]
    pub template: PathBuf,

    /// Optional per-band weights table (defaults to weight 1.0 everywhere)
    #[arg(long)]
    pub weights: Option<PathBuf>,

    /// Free parameter spec, repeatable: label:min:max[:scale[:ndigits[:unit]]]
    ///
    /// Scale is "lin" or "log"; ndigits is the significant digit count used
    /// when writing values into ski files. Example:
    /// -p dust_mass:1e5:1e9:log:4:Msun -p inclination:0:90
    #[arg(short = 'p', long = "parameter", required = true)]
    pub parameters: Vec<String>,

    /// Individuals (and simulations) per generation
    #[arg(short = 'n', long, default_value_t = defaults::POPULATION_SIZE)]
    pub population_size: usize,

    /// Number of elite parents carried into each new generation
    #[arg(long, default_value_t = defaults::N_ELITES)]
    pub elites: usize,

    /// Per-gene mutation rate
    #[arg(long, default_value_t = defaults::MUTATION_RATE)]
    pub mutation_rate: f64,

    /// Mutation model: "uniform" or "gaussian"
    #[arg(long, default_value = defaults::MUTATION_MODEL)]
    pub mutation_model: String,

    /// Gaussian mutation sigma, as a fraction of the scaled range width
    #[arg(long, default_value_t = defaults::MUTATION_SIGMA)]
    pub mutation_sigma: f64,

    /// Crossover rate
    #[arg(long, default_value_t = defaults::CROSSOVER_RATE)]
    pub crossover_rate: f64,

    /// Crossover model: "one-point", "uniform", or "blend"
    #[arg(long, default_value = defaults::CROSSOVER_MODEL)]
    pub crossover_model: String,

    /// Alpha for blend crossover
    #[arg(long, default_value_t = defaults::BLEND_ALPHA)]
    pub blend_alpha: f64,

    /// Selection model: "tournament" or "roulette"
    #[arg(long, default_value = defaults::SELECTION_MODEL)]
    pub selection: String,

    /// Tournament size (tournament selection only)
    #[arg(long, default_value_t = defaults::TOURNAMENT_SIZE)]
    pub tournament_size: usize,

    /// Path to the simulator executable
    #[arg(long, default_value = defaults::SIMULATOR_BINARY)]
    pub simulator: PathBuf,

    /// Process count passed to the simulator
    #[arg(long, default_value_t = defaults::NPROCESSES)]
    pub nprocesses: usize,

    /// Thread count passed to the simulator
    #[arg(long, default_value_t = defaults::NTHREADS)]
    pub nthreads: usize,

    /// Extra arguments appended to every simulator invocation
    #[arg(long = "simulator-arg")]
    pub simulator_args: Vec<String>,

    /// Random seed (omit for a randomly seeded run)
    #[arg(long)]
    pub seed: Option<u64>,
}

use std::error;
use std::fmt;
use std::path::PathBuf;

/// Error type for invalid free-parameter definitions.
#[derive(Debug, Clone, PartialEq)]
pub enum ParameterError {
    /// The range bounds are not a valid interval.
    InvalidRange { min: f64, max: f64 },
    /// A log-scale parameter requires strictly positive bounds.
    NonPositiveLogRange { min: f64 },
    /// A parameter label appears more than once in a parameter set.
    DuplicateLabel(String),
    /// The parameter set is empty.
    EmptySet,
    /// A label was looked up that is not part of the parameter set.
    UnknownLabel(String),
}

impl fmt::Display for ParameterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidRange { min, max } => {
                write!(f, "Invalid parameter range [{min}, {max}]: min must be finite and smaller than max")
            }
            Self::NonPositiveLogRange { min } => {
                write!(f, "Invalid log-scale range: lower bound {min} must be positive")
            }
            Self::DuplicateLabel(label) => write!(f, "Duplicate parameter label: '{label}'"),
            Self::EmptySet => write!(f, "A parameter set must contain at least one free parameter"),
            Self::UnknownLabel(label) => write!(f, "Unknown parameter label: '{label}'"),
        }
    }
}

impl error::Error for ParameterError {}

/// Error type for chi-squared score bookkeeping on individuals.
#[derive(Debug, Clone, PartialEq)]
pub enum ScoreError {
    /// The individual already carries a score; scores are write-once.
    AlreadyScored(String),
    /// No individual with this name exists in the population.
    UnknownIndividual(String),
    /// The score is not a finite number.
    InvalidScore(f64),
}

impl fmt::Display for ScoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyScored(name) => {
                write!(f, "Individual '{name}' is already scored; scores are immutable")
            }
            Self::UnknownIndividual(name) => write!(f, "Unknown individual: '{name}'"),
            Self::InvalidScore(value) => write!(f, "Invalid chi-squared value: {value}"),
        }
    }
}

impl error::Error for ScoreError {}

/// Errors raised by the genetic engine.
#[derive(Debug)]
pub enum EngineError {
    /// A rate or probability is outside [0.0, 1.0].
    InvalidRate(&'static str, f64),
    /// A strictly positive setting was zero or negative.
    NonPositive(&'static str, f64),
    /// The population is empty or smaller than required.
    PopulationTooSmall { size: usize, required: usize },
    /// Breeding was requested while some individuals are still unscored.
    UnscoredIndividuals(usize),
    /// Score bookkeeping failed.
    Score(ScoreError),
    /// Engine state could not be serialized or deserialized.
    State(String),
    /// IO error while persisting engine state.
    Io(std::io::Error),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidRate(name, value) => {
                write!(f, "Invalid {name}: {value} (must be between 0.0 and 1.0)")
            }
            Self::NonPositive(name, value) => {
                write!(f, "Invalid {name}: {value} (must be positive)")
            }
            Self::PopulationTooSmall { size, required } => {
                write!(f, "Population of {size} individuals is too small (need at least {required})")
            }
            Self::UnscoredIndividuals(count) => {
                write!(f, "Cannot breed a new population: {count} individuals are still unscored")
            }
            Self::Score(e) => write!(f, "Score error: {e}"),
            Self::State(msg) => write!(f, "Engine state error: {msg}"),
            Self::Io(e) => write!(f, "IO error: {e}"),
        }
    }
}

impl error::Error for EngineError {}

impl From<ScoreError> for EngineError {
    fn from(e: ScoreError) -> Self {
        Self::Score(e)
    }
}

impl From<std::io::Error> for EngineError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

/// Errors for reading and writing the flat-file tables.
#[derive(Debug)]
pub enum TableError {
    /// Underlying IO failure.
    Io(std::io::Error),
    /// A data row could not be parsed; lines are 1-based.
    Parse { line: usize, message: String },
    /// The header comment does not declare an expected column.
    MissingColumn(String),
    /// A row with this key already exists.
    DuplicateEntry(String),
    /// A row with this key does not exist.
    MissingEntry(String),
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "IO error: {e}"),
            Self::Parse { line, message } => write!(f, "Parse error at line {line}: {message}"),
            Self::MissingColumn(name) => write!(f, "Missing table column: '{name}'"),
            Self::DuplicateEntry(key) => write!(f, "Duplicate table entry: '{key}'"),
            Self::MissingEntry(key) => write!(f, "No table entry for '{key}'"),
        }
    }
}

impl error::Error for TableError {}

impl From<std::io::Error> for TableError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

/// Errors raised by fitting-run bookkeeping.
#[derive(Debug)]
pub enum RunError {
    /// A run with this name already exists under the base directory.
    AlreadyExists(PathBuf),
    /// No run was found at this path.
    NotFound(PathBuf),
    /// A named generation does not exist in this run.
    UnknownGeneration(String),
    /// The generation name does not follow the initial/GenerationN convention.
    InvalidGenerationName(String),
    /// A new generation was requested while the previous one is unfinished.
    UnfinishedGeneration(String),
    /// A required input file is missing.
    MissingFile(PathBuf),
    /// The run configuration is invalid.
    Config(String),
    /// Table bookkeeping failed.
    Table(TableError),
    /// Engine failure during exploration.
    Engine(EngineError),
    /// Ski template failure.
    Ski(SkiError),
    /// SED evaluation failure.
    Evaluation(EvaluationError),
    /// Statistics database failure.
    Database(DatabaseError),
    /// Underlying IO failure.
    Io(std::io::Error),
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyExists(path) => {
                write!(f, "Fitting run already exists at {}", path.display())
            }
            Self::NotFound(path) => write!(f, "No fitting run found at {}", path.display()),
            Self::UnknownGeneration(name) => write!(f, "Unknown generation: '{name}'"),
            Self::InvalidGenerationName(name) => {
                write!(f, "Invalid generation name: '{name}'")
            }
            Self::UnfinishedGeneration(name) => {
                write!(f, "Generation '{name}' is not finished yet; evaluate its simulations first")
            }
            Self::MissingFile(path) => write!(f, "Missing input file: {}", path.display()),
            Self::Config(msg) => write!(f, "Invalid run configuration: {msg}"),
            Self::Table(e) => write!(f, "Table error: {e}"),
            Self::Engine(e) => write!(f, "Engine error: {e}"),
            Self::Ski(e) => write!(f, "Ski template error: {e}"),
            Self::Evaluation(e) => write!(f, "Evaluation error: {e}"),
            Self::Database(e) => write!(f, "Statistics database error: {e}"),
            Self::Io(e) => write!(f, "IO error: {e}"),
        }
    }
}

impl error::Error for RunError {}

impl From<DatabaseError> for RunError {
    fn from(e: DatabaseError) -> Self {
        Self::Database(e)
    }
}

impl From<TableError> for RunError {
    fn from(e: TableError) -> Self {
        Self::Table(e)
    }
}

impl From<EngineError> for RunError {
    fn from(e: EngineError) -> Self {
        Self::Engine(e)
    }
}

impl From<SkiError> for RunError {
    fn from(e: SkiError) -> Self {
        Self::Ski(e)
    }
}

impl From<EvaluationError> for RunError {
    fn from(e: EvaluationError) -> Self {
        Self::Evaluation(e)
    }
}

impl From<std::io::Error> for RunError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

/// Errors in the ski template machinery.
#[derive(Debug)]
pub enum SkiError {
    /// A placeholder in the template has no matching free parameter.
    UnknownPlaceholder(String),
    /// A free parameter label never appears in the template.
    MissingPlaceholder(String),
    /// A placeholder was opened but never closed.
    UnterminatedPlaceholder(usize),
    /// Underlying IO failure.
    Io(std::io::Error),
}

impl fmt::Display for SkiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownPlaceholder(label) => {
                write!(f, "Template placeholder '[[{label}]]' does not match any free parameter")
            }
            Self::MissingPlaceholder(label) => {
                write!(f, "Free parameter '{label}' has no placeholder in the template")
            }
            Self::UnterminatedPlaceholder(offset) => {
                write!(f, "Unterminated placeholder starting at byte {offset}")
            }
            Self::Io(e) => write!(f, "IO error: {e}"),
        }
    }
}

impl error::Error for SkiError {}

impl From<std::io::Error> for SkiError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

/// Errors during chi-squared evaluation of a simulated SED.
#[derive(Debug)]
pub enum EvaluationError {
    /// No overlapping bands between simulated and observed SED.
    NoComparableBands,
    /// Degrees of freedom would be zero or negative.
    NonPositiveDof { points: usize, free_parameters: usize },
    /// The SED file could not be parsed.
    Table(TableError),
}

impl fmt::Display for EvaluationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoComparableBands => {
                write!(f, "Simulated and observed SED share no bands to compare")
            }
            Self::NonPositiveDof { points, free_parameters } => {
                write!(
                    f,
                    "Non-positive degrees of freedom: {points} data points with {free_parameters} free parameters"
                )
            }
            Self::Table(e) => write!(f, "SED table error: {e}"),
        }
    }
}

impl error::Error for EvaluationError {}

impl From<TableError> for EvaluationError {
    fn from(e: TableError) -> Self {
        Self::Table(e)
    }
}

/// Errors while launching external simulations.
#[derive(Debug)]
pub enum LaunchError {
    /// The simulator executable could not be spawned.
    Spawn { binary: PathBuf, message: String },
    /// The simulator exited with a non-zero status.
    Failed { simulation: String, status: Option<i32> },
    /// The simulator finished but produced no SED output.
    MissingOutput(PathBuf),
    /// Underlying IO failure.
    Io(std::io::Error),
}

impl fmt::Display for LaunchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Spawn { binary, message } => {
                write!(f, "Failed to spawn simulator '{}': {message}", binary.display())
            }
            Self::Failed { simulation, status } => match status {
                Some(code) => write!(f, "Simulation '{simulation}' failed with exit code {code}"),
                None => write!(f, "Simulation '{simulation}' was terminated by a signal"),
            },
            Self::MissingOutput(path) => {
                write!(f, "Simulation produced no SED output at {}", path.display())
            }
            Self::Io(e) => write!(f, "IO error: {e}"),
        }
    }
}

impl error::Error for LaunchError {}

impl From<std::io::Error> for LaunchError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

/// Database error types for the statistics database.
#[derive(Debug, Clone)]
pub enum DatabaseError {
    Connection(String),
    Initialization(String),
    Transaction(String),
    Query(String),
    Insert(String),
    Close(String),
}

impl fmt::Display for DatabaseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connection(e) => write!(f, "Database connection error: {e}"),
            Self::Initialization(e) => write!(f, "Database initialization error: {e}"),
            Self::Transaction(e) => write!(f, "Transaction error: {e}"),
            Self::Query(e) => write!(f, "Query error: {e}"),
            Self::Insert(e) => write!(f, "Insert error: {e}"),
            Self::Close(e) => write!(f, "Close error: {e}"),
        }
    }
}

impl error::Error for DatabaseError {}

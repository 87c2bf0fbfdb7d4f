//! Launching the external simulator, one process per simulation.
//!
//! Simulations run sequentially in the calling thread. The simulator itself
//! may parallelize internally; its process and thread counts are passed on
//! the command line but never managed here.

use crate::errors::LaunchError;
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Instant;

/// Name of the SED file the simulator writes into its output directory.
pub const SED_FILE_NAME: &str = "sed.dat";
/// Name of the log file the simulator output is captured into.
pub const LOG_FILE_NAME: &str = "simulation_log.txt";

/// How to invoke the external simulator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulatorConfig {
    /// Path to the simulator executable.
    pub binary: PathBuf,
    /// Number of processes; more than one launches the binary under mpirun.
    pub nprocesses: usize,
    /// Number of threads per process.
    pub nthreads: usize,
    /// Extra arguments appended verbatim.
    #[serde(default)]
    pub arguments: Vec<String>,
}

/// One simulation to execute: a ski file and an output directory.
#[derive(Debug, Clone)]
pub struct SimulationJob {
    pub simulation_name: String,
    pub ski_path: PathBuf,
    pub output_dir: PathBuf,
}

impl SimulationJob {
    pub fn sed_path(&self) -> PathBuf {
        self.output_dir.join(SED_FILE_NAME)
    }

    pub fn log_path(&self) -> PathBuf {
        self.output_dir.join(LOG_FILE_NAME)
    }

    /// Whether this simulation already produced its SED output.
    pub fn has_output(&self) -> bool {
        self.sed_path().is_file()
    }
}

/// Executes a single simulation job.
///
/// The seam for alternative execution backends; production uses
/// [`ExternalRunner`], tests substitute a stub.
pub trait SimulationRunner {
    fn run(&self, job: &SimulationJob) -> Result<(), LaunchError>;
}

/// Runs the simulator as a child process, capturing its output to the log.
#[derive(Debug, Clone)]
pub struct ExternalRunner {
    config: SimulatorConfig,
}

impl ExternalRunner {
    pub fn new(config: SimulatorConfig) -> Self {
        Self { config }
    }

    /// Program and argument list for one job.
    ///
    /// A multi-process configuration launches the binary under
    /// `mpirun -np N`, the way an MPI build of the simulator expects.
    fn command_line(&self, job: &SimulationJob) -> (PathBuf, Vec<OsString>) {
        let mut args: Vec<OsString> = Vec::new();
        let program = if self.config.nprocesses > 1 {
            args.push("-np".into());
            args.push(self.config.nprocesses.to_string().into());
            args.push(self.config.binary.clone().into_os_string());
            PathBuf::from("mpirun")
        } else {
            self.config.binary.clone()
        };
        args.push(job.ski_path.clone().into_os_string());
        args.push("-o".into());
        args.push(job.output_dir.clone().into_os_string());
        args.push("-t".into());
        args.push(self.config.nthreads.to_string().into());
        args.extend(self.config.arguments.iter().map(OsString::from));
        (program, args)
    }
}

impl SimulationRunner for ExternalRunner {
    fn run(&self, job: &SimulationJob) -> Result<(), LaunchError> {
        let log = File::create(job.log_path())?;
        let log_err = log.try_clone()?;

        let (program, args) = self.command_line(job);
        let status = Command::new(&program)
            .args(&args)
            .stdout(Stdio::from(log))
            .stderr(Stdio::from(log_err))
            .status()
            .map_err(|e| LaunchError::Spawn {
                binary: program,
                message: e.to_string(),
            })?;

        if !status.success() {
            return Err(LaunchError::Failed {
                simulation: job.simulation_name.clone(),
                status: status.code(),
            });
        }
        if !job.has_output() {
            return Err(LaunchError::MissingOutput(job.sed_path()));
        }
        Ok(())
    }
}

/// Result of one attempted simulation.
#[derive(Debug)]
pub struct LaunchOutcome {
    pub simulation_name: String,
    pub runtime_s: f64,
    pub peak_gb: Option<f64>,
    pub error: Option<LaunchError>,
}

impl LaunchOutcome {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Outcome of launching a batch of simulations.
#[derive(Debug, Default)]
pub struct LaunchSummary {
    pub outcomes: Vec<LaunchOutcome>,
}

impl LaunchSummary {
    pub fn n_succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.succeeded()).count()
    }

    pub fn n_failed(&self) -> usize {
        self.outcomes.len() - self.n_succeeded()
    }
}

/// Run every job sequentially, tolerating individual failures.
///
/// Jobs that already have output are skipped, which makes re-invocation
/// after a partial failure retry only the missing simulations. The progress
/// callback fires before each attempted job.
pub fn launch_pending(
    jobs: &[SimulationJob],
    runner: &dyn SimulationRunner,
    mut progress: impl FnMut(&SimulationJob),
) -> LaunchSummary {
    let mut summary = LaunchSummary::default();
    for job in jobs {
        if job.has_output() {
            continue;
        }
        progress(job);
        let start = Instant::now();
        let error = runner.run(job).err();
        let runtime_s = start.elapsed().as_secs_f64();
        let peak_gb = if error.is_none() {
            peak_memory_gb(job.log_path())
        } else {
            None
        };
        summary.outcomes.push(LaunchOutcome {
            simulation_name: job.simulation_name.clone(),
            runtime_s,
            peak_gb,
            error,
        });
    }
    summary
}

/// Parse the peak memory figure from a simulator log, when reported.
///
/// Looks for a line containing `Peak memory usage:` followed by a value
/// in GB, the way the simulator's final log summary states it.
pub fn peak_memory_gb(log_path: impl AsRef<Path>) -> Option<f64> {
    let content = std::fs::read_to_string(log_path.as_ref()).ok()?;
    for line in content.lines() {
        if let Some(rest) = line.split("Peak memory usage:").nth(1) {
            let value = rest.trim().split_whitespace().next()?;
            return value.parse::<f64>().ok();
        }
    }
    None
}

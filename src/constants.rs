//! Application-wide constants.
//!
//! All fixed flags, file names and user-facing strings live here so the
//! generated command stays easy to audit.

/// Application name used for config directories and user-facing messages.
pub const APP_NAME: &str = "ants-dbm";

/// Working directory created relative to the caller's cwd.
pub const DEFAULT_WORK_DIR: &str = "ants_dbm";

/// File the assembled command is written to inside the working directory.
pub const DEFAULT_COMMAND_FILE: &str = "exec.sh";

/// Banner printed before the command file contents.
pub const BANNER: &str = "Running the following commonspace registration:";

/// Lock file name inside the working directory.
pub const LOCK_FILE_NAME: &str = ".ants-dbm.lock";

/// Environment variables read for the variable flags.
pub mod env {
    /// Base directory of the RABIES installation.
    pub const RABIES: &str = "RABIES";
    /// Cluster backend selector.
    pub const CLUSTER_TYPE: &str = "ants_dbm_cluster_type";
    /// Walltime budget per cluster job.
    pub const WALLTIME: &str = "ants_dbm_walltime";
    /// Memory budget per cluster job.
    pub const MEMORY_REQUEST: &str = "ants_dbm_memory_request";
    /// Thread count for local execution.
    pub const LOCAL_THREADS: &str = "local_threads";
    /// Override for the config file location.
    pub const CONFIG: &str = "ANTS_DBM_CONFIG";
}

/// Defaults for the modelling parameters handed to the external tool.
pub mod modelbuild {
    /// External template-construction program.
    pub const TOOL: &str = "twolevel_dbm.py";

    /// Model-build helper script, relative to the RABIES base directory.
    pub const SCRIPT: &str = "rabies/shell_scripts/antsMultivariateTemplateConstruction2.sh";

    /// Registration transform type.
    pub const TRANSFORM: &str = "SyN";

    /// Averaging method used between iterations.
    pub const AVERAGE_TYPE: &str = "normmean";

    /// Gradient step of the template update.
    pub const GRADIENT_STEP: f64 = 0.25;

    /// Number of template-building iterations.
    pub const MODEL_ITERATIONS: u32 = 3;
}

/// Flag names understood by the external tool.
pub mod flags {
    /// Rigid alignment target.
    pub const RIGID_MODEL_TARGET: &str = "--rigid-model-target";
    /// Disable N4 bias-field correction.
    pub const NO_N4: &str = "--no-N4";
    /// Transform type.
    pub const TRANSFORM: &str = "--transform";
    /// Single-precision computation.
    pub const FLOAT: &str = "--float";
    /// Averaging method.
    pub const AVERAGE_TYPE: &str = "--average-type";
    /// Gradient step.
    pub const GRADIENT_STEP: &str = "--gradient-step";
    /// Iteration count.
    pub const MODEL_ITERATIONS: &str = "--model-iterations";
    /// Model-build helper script.
    pub const MODELBUILD_COMMAND: &str = "--modelbuild-command";
    /// Cluster backend.
    pub const CLUSTER_TYPE: &str = "--cluster-type";
    /// Walltime.
    pub const WALLTIME: &str = "--walltime";
    /// Memory request.
    pub const MEMORY_REQUEST: &str = "--memory-request";
    /// Local threads.
    pub const LOCAL_THREADS: &str = "--local-threads";
}

/// Process exit codes.
pub mod exit_code {
    /// Generic local failure.
    pub const FAILURE: i32 = 1;
    /// External tool could not be started (matches shell convention).
    pub const SPAWN_FAILED: i32 = 127;
    /// Interrupted by Ctrl+C (128 + SIGINT).
    pub const INTERRUPTED: i32 = 130;
    /// Offset added to a signal number when the child was killed by one.
    pub const SIGNAL_BASE: i32 = 128;
}

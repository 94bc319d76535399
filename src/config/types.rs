//! Configuration type definitions.

use crate::constants::{DEFAULT_COMMAND_FILE, DEFAULT_WORK_DIR, modelbuild};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Complete application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Modelling parameters handed to the external tool.
    #[serde(default)]
    pub modelbuild: ModelbuildConfig,

    /// Cluster submission settings.
    #[serde(default)]
    pub cluster: ClusterConfig,

    /// Local run settings.
    #[serde(default)]
    pub run: RunConfig,
}

/// Template-construction parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelbuildConfig {
    /// External program to invoke.
    pub tool: String,

    /// Model-build helper script, relative to the RABIES base directory.
    pub script: PathBuf,

    /// Registration transform type.
    pub transform: String,

    /// Averaging method.
    pub average_type: String,

    /// Gradient step of the template update.
    pub gradient_step: f64,

    /// Number of template-building iterations.
    pub model_iterations: u32,

    /// Run N4 bias-field correction.
    pub n4: bool,

    /// Use single-precision computation.
    pub float: bool,

    /// One- or two-level template construction.
    pub level: DbmLevel,
}

impl Default for ModelbuildConfig {
    fn default() -> Self {
        Self {
            tool: modelbuild::TOOL.to_string(),
            script: PathBuf::from(modelbuild::SCRIPT),
            transform: modelbuild::TRANSFORM.to_string(),
            average_type: modelbuild::AVERAGE_TYPE.to_string(),
            gradient_step: modelbuild::GRADIENT_STEP,
            model_iterations: modelbuild::MODEL_ITERATIONS,
            n4: false,
            float: true,
            level: DbmLevel::OneLevel,
        }
    }
}

/// Cluster settings. Unset fields must come from the CLI or environment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterConfig {
    /// Cluster backend selector.
    pub cluster_type: Option<String>,

    /// Walltime budget.
    pub walltime: Option<String>,

    /// Memory budget.
    pub memory_request: Option<String>,

    /// Thread count for local execution.
    pub local_threads: Option<u32>,
}

/// Local run settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Working directory, relative to the caller's cwd.
    pub work_dir: PathBuf,

    /// Command file name inside the working directory.
    pub command_file: String,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            work_dir: PathBuf::from(DEFAULT_WORK_DIR),
            command_file: DEFAULT_COMMAND_FILE.to_string(),
        }
    }
}

/// Template-construction mode.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
pub enum DbmLevel {
    /// Single group template.
    #[default]
    #[serde(rename = "1level")]
    #[value(name = "1level")]
    OneLevel,
    /// Per-subject templates followed by a group template.
    #[serde(rename = "2level")]
    #[value(name = "2level")]
    TwoLevel,
}

impl std::fmt::Display for DbmLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OneLevel => write!(f, "1level"),
            Self::TwoLevel => write!(f, "2level"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_level_display() {
        assert_eq!(DbmLevel::OneLevel.to_string(), "1level");
        assert_eq!(DbmLevel::TwoLevel.to_string(), "2level");
    }

    #[test]
    fn test_modelbuild_defaults() {
        let mb = ModelbuildConfig::default();
        assert_eq!(mb.tool, "twolevel_dbm.py");
        assert_eq!(mb.transform, "SyN");
        assert_eq!(mb.average_type, "normmean");
        assert_eq!(mb.gradient_step, 0.25);
        assert_eq!(mb.model_iterations, 3);
        assert!(!mb.n4);
        assert!(mb.float);
        assert_eq!(mb.level, DbmLevel::OneLevel);
    }

    #[test]
    fn test_run_defaults() {
        let run = RunConfig::default();
        assert_eq!(run.work_dir, PathBuf::from("ants_dbm"));
        assert_eq!(run.command_file, "exec.sh");
    }

    #[test]
    fn test_cluster_defaults_are_unset() {
        let cluster = ClusterConfig::default();
        assert!(cluster.cluster_type.is_none());
        assert!(cluster.walltime.is_none());
        assert!(cluster.memory_request.is_none());
        assert!(cluster.local_threads.is_none());
    }
}

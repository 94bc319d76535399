//! Resolution of invocation parameters.
//!
//! Every value the external tool needs is gathered here from the CLI
//! (which already folds in the environment) and the config file. Missing
//! or empty values are rejected before any side effect happens.

use crate::cli::RunArgs;
use crate::config::{Config, DbmLevel};
use crate::constants::{env, flags};
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Fully resolved parameters for one template-construction run.
#[derive(Debug, Clone, PartialEq)]
pub struct InvocationParams {
    /// External program to invoke.
    pub tool: String,
    /// File listing the input images.
    pub input_file: String,
    /// Rigid-model target.
    pub template_anat: String,
    /// Absolute path of the model-build helper script.
    pub modelbuild_command: String,
    /// Cluster backend selector.
    pub cluster_type: String,
    /// Walltime budget.
    pub walltime: String,
    /// Memory budget.
    pub memory_request: String,
    /// Local thread count.
    pub local_threads: u32,
    /// Registration transform type.
    pub transform: String,
    /// Averaging method.
    pub average_type: String,
    /// Gradient step.
    pub gradient_step: f64,
    /// Number of template-building iterations.
    pub model_iterations: u32,
    /// Run N4 bias-field correction.
    pub n4: bool,
    /// Single-precision computation.
    pub float: bool,
    /// Template construction mode.
    pub level: DbmLevel,
}

impl InvocationParams {
    /// Resolve parameters from the positional inputs, run arguments and config.
    ///
    /// CLI values (including their environment fallbacks) take precedence
    /// over the config file. Relative paths are made absolute against the
    /// caller's cwd since the tool runs inside the working directory.
    pub fn resolve(
        file_path: Option<&Path>,
        template_anat: Option<&Path>,
        args: &RunArgs,
        config: &Config,
    ) -> Result<Self> {
        let input_file = required_path(file_path, "FILE_PATH", "the first positional argument")?;
        let template_anat = required_path(
            template_anat,
            flags::RIGID_MODEL_TARGET,
            "the second positional argument",
        )?;

        let rabies = required_path(
            non_blank(args.rabies.as_deref()).map(Path::new),
            flags::MODELBUILD_COMMAND,
            &env_hint("--rabies", env::RABIES),
        )?;
        let modelbuild_command = path_to_string(&Path::new(&rabies).join(&config.modelbuild.script))?;

        let cluster_type = required_str(
            non_blank(args.cluster_type.as_deref()).or(config.cluster.cluster_type.as_deref()),
            flags::CLUSTER_TYPE,
            env::CLUSTER_TYPE,
        )?;
        let walltime = required_str(
            non_blank(args.walltime.as_deref()).or(config.cluster.walltime.as_deref()),
            flags::WALLTIME,
            env::WALLTIME,
        )?;
        let memory_request = required_str(
            non_blank(args.memory_request.as_deref()).or(config.cluster.memory_request.as_deref()),
            flags::MEMORY_REQUEST,
            env::MEMORY_REQUEST,
        )?;
        let local_threads = match non_blank(args.local_threads.as_deref()) {
            Some(value) => parse_threads(value)?,
            None => config
                .cluster
                .local_threads
                .ok_or_else(|| Error::MissingParameter {
                    flag: flags::LOCAL_THREADS,
                    source_hint: env_hint(flags::LOCAL_THREADS, env::LOCAL_THREADS),
                })?,
        };

        let mb = &config.modelbuild;
        let tool = resolve_tool(non_blank(args.tool.as_deref()).unwrap_or(&mb.tool))?;

        let params = Self {
            tool,
            input_file,
            template_anat,
            modelbuild_command,
            cluster_type,
            walltime,
            memory_request,
            local_threads,
            transform: mb.transform.clone(),
            average_type: mb.average_type.clone(),
            gradient_step: mb.gradient_step,
            model_iterations: mb.model_iterations,
            n4: mb.n4,
            float: mb.float,
            level: args.level.unwrap_or(mb.level),
        };

        debug!("Resolved invocation parameters: {params:?}");
        Ok(params)
    }
}

fn env_hint(flag: &str, var: &str) -> String {
    format!("{flag} or the {var} environment variable")
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_threads(value: &str) -> Result<u32> {
    match value.trim().parse::<u32>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(Error::InvalidParameter {
            flag: flags::LOCAL_THREADS,
            source_hint: env_hint(flags::LOCAL_THREADS, env::LOCAL_THREADS),
            value: value.to_string(),
            reason: "expected an integer of at least 1",
        }),
    }
}

/// Tool paths are made absolute; bare names are left for the `PATH` lookup.
fn resolve_tool(tool: &str) -> Result<String> {
    if tool.trim().is_empty() {
        return Err(Error::MissingParameter {
            flag: "--tool",
            source_hint: "--tool or modelbuild.tool in the config file".to_string(),
        });
    }

    if tool.contains('/') || tool.contains(std::path::MAIN_SEPARATOR) {
        path_to_string(&absolutize(Path::new(tool))?)
    } else {
        Ok(tool.to_string())
    }
}

fn required_str(value: Option<&str>, flag: &'static str, var: &str) -> Result<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.to_string()),
        _ => Err(Error::MissingParameter {
            flag,
            source_hint: env_hint(flag, var),
        }),
    }
}

fn required_path(value: Option<&Path>, flag: &'static str, hint: &str) -> Result<String> {
    match value {
        Some(p) if !p.as_os_str().is_empty() => path_to_string(&absolutize(p)?),
        _ => Err(Error::MissingParameter {
            flag,
            source_hint: hint.to_string(),
        }),
    }
}

fn absolutize(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::path::absolute(path)?)
    }
}

fn path_to_string(path: &Path) -> Result<String> {
    path.to_str()
        .map(str::to_owned)
        .ok_or_else(|| Error::NonUtf8Path {
            path: path.to_path_buf(),
        })
}

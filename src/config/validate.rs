//! Configuration validation.

use crate::config::Config;
use crate::error::{Error, Result};
use std::path::{Component, Path};

/// Validate the entire configuration.
pub fn validate_config(config: &Config) -> Result<()> {
    validate_modelbuild(config)?;
    validate_cluster(config)?;
    validate_run(config)?;
    Ok(())
}

fn validate_modelbuild(config: &Config) -> Result<()> {
    let mb = &config.modelbuild;

    require_non_empty("modelbuild.tool", &mb.tool)?;
    require_non_empty("modelbuild.transform", &mb.transform)?;
    require_non_empty("modelbuild.average_type", &mb.average_type)?;

    if mb.script.as_os_str().is_empty() {
        return Err(validation("modelbuild.script must not be empty"));
    }

    if !mb.gradient_step.is_finite() || mb.gradient_step <= 0.0 {
        return Err(validation(format!(
            "modelbuild.gradient_step must be a positive number, got {}",
            mb.gradient_step
        )));
    }

    if mb.model_iterations == 0 {
        return Err(validation("modelbuild.model_iterations must be at least 1"));
    }

    Ok(())
}

fn validate_cluster(config: &Config) -> Result<()> {
    let cluster = &config.cluster;

    if let Some(ref v) = cluster.cluster_type {
        require_non_empty("cluster.cluster_type", v)?;
    }
    if let Some(ref v) = cluster.walltime {
        require_non_empty("cluster.walltime", v)?;
    }
    if let Some(ref v) = cluster.memory_request {
        require_non_empty("cluster.memory_request", v)?;
    }
    if cluster.local_threads == Some(0) {
        return Err(validation("cluster.local_threads must be at least 1"));
    }

    Ok(())
}

fn validate_run(config: &Config) -> Result<()> {
    if config.run.work_dir.as_os_str().is_empty() {
        return Err(validation("run.work_dir must not be empty"));
    }
    validate_command_file_name(&config.run.command_file)
}

/// Check that the command file is a bare file name inside the working directory.
pub fn validate_command_file_name(name: &str) -> Result<()> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => Err(validation(format!(
            "run.command_file must be a plain file name, got '{name}'"
        ))),
    }
}

fn require_non_empty(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(validation(format!("{field} must not be empty")));
    }
    Ok(())
}

fn validation(message: impl Into<String>) -> Error {
    Error::ConfigValidation {
        message: message.into(),
    }
}

//! Template-construction run: build, record, display and execute the command.

mod command;
mod params;
mod runner;
mod workdir;

pub use command::DbmCommand;
pub use params::InvocationParams;
pub use runner::{ExecMode, execute, note_interrupt, print_command, status_code};
pub use workdir::WorkDir;

use crate::cli::RunArgs;
use crate::config::Config;
use crate::error::Result;
use crate::locking::WorkDirLock;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Local options controlling a run, separate from what the tool receives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    /// Working directory.
    pub work_dir: PathBuf,
    /// Command file name inside the working directory.
    pub command_file: String,
    /// Execution mode.
    pub mode: ExecMode,
    /// Stop after printing the command.
    pub dry_run: bool,
    /// Lock the working directory for the duration of the run.
    pub lock: bool,
    /// Remove an existing lock before acquiring it.
    pub force_unlock: bool,
}

impl RunOptions {
    /// Combine CLI arguments with the config file.
    pub fn from_args(args: &RunArgs, config: &Config) -> Self {
        Self {
            work_dir: args
                .work_dir
                .clone()
                .unwrap_or_else(|| config.run.work_dir.clone()),
            command_file: config.run.command_file.clone(),
            mode: args
                .shell
                .clone()
                .map_or(ExecMode::Direct, ExecMode::Shell),
            dry_run: args.dry_run,
            lock: !args.no_lock,
            force_unlock: args.force_unlock,
        }
    }
}

/// Run one template construction.
///
/// Creates the working directory, writes the command file, prints the
/// banner and the file contents to `out`, then executes the command.
/// The caller's cwd is never changed.
pub fn run<W: std::io::Write>(
    params: &InvocationParams,
    options: &RunOptions,
    out: &mut W,
) -> Result<()> {
    let command = DbmCommand::from_params(params);
    let contents = command.render();
    debug!("Command: {command}");

    let work_dir = WorkDir::prepare(&options.work_dir)?;
    let _lock = if options.lock {
        if options.force_unlock {
            warn!("Removing any existing lock in {}", work_dir.path().display());
            WorkDirLock::force_release(work_dir.path())?;
        }
        Some(WorkDirLock::acquire(
            work_dir.path(),
            Path::new(&params.input_file),
        )?)
    } else {
        None
    };

    let command_path = work_dir.write_command_file(&options.command_file, &contents)?;
    info!("Command written to {}", command_path.display());

    print_command(out, &contents)?;

    if options.dry_run {
        info!("Dry run: not executing {}", command.program());
        return Ok(());
    }

    execute(
        &command,
        work_dir.path(),
        &options.command_file,
        &options.mode,
    )
}

#[cfg(test)]
pub(crate) mod tests_support {
    use super::InvocationParams;
    use crate::config::DbmLevel;

    pub fn params() -> InvocationParams {
        InvocationParams {
            tool: "twolevel_dbm.py".to_string(),
            input_file: "/a/in.txt".to_string(),
            template_anat: "/a/tpl.nii.gz".to_string(),
            modelbuild_command:
                "/opt/RABIES/rabies/shell_scripts/antsMultivariateTemplateConstruction2.sh"
                    .to_string(),
            cluster_type: "local".to_string(),
            walltime: "20:00:00".to_string(),
            memory_request: "8gb".to_string(),
            local_threads: 4,
            transform: "SyN".to_string(),
            average_type: "normmean".to_string(),
            gradient_step: 0.25,
            model_iterations: 3,
            n4: false,
            float: true,
            level: DbmLevel::OneLevel,
        }
    }
}

//! CLI argument definitions.

use crate::config::DbmLevel;
use crate::constants::env;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Build a deformation-based morphometry template with `twolevel_dbm.py`.
#[derive(Debug, Parser)]
#[command(name = "ants-dbm")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Config file to use instead of the platform default.
    #[arg(long, global = true, env = env::CONFIG)]
    pub config: Option<PathBuf>,

    /// File listing the input images.
    pub file_path: Option<PathBuf>,

    /// Reference anatomical template used as the rigid-model target.
    pub template_anat: Option<PathBuf>,

    /// Options for the registration run.
    #[command(flatten)]
    pub run: RunArgs,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage configuration.
    Config {
        /// Configuration action to perform.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommand actions.
#[derive(Debug, Clone, Copy, Subcommand)]
pub enum ConfigAction {
    /// Create default configuration file.
    Init,
    /// Display effective configuration.
    Show,
    /// Print configuration file path.
    Path,
}

/// Arguments for a registration run.
#[derive(Debug, Default, Args)]
#[allow(clippy::struct_excessive_bools)]
pub struct RunArgs {
    /// RABIES installation directory holding the model-build script.
    #[arg(long, value_name = "DIR", env = env::RABIES)]
    pub rabies: Option<String>,

    /// Cluster backend passed to the template tool.
    #[arg(long, env = env::CLUSTER_TYPE)]
    pub cluster_type: Option<String>,

    /// Walltime budget per cluster job.
    #[arg(long, env = env::WALLTIME)]
    pub walltime: Option<String>,

    /// Memory budget per cluster job.
    #[arg(long, env = env::MEMORY_REQUEST)]
    pub memory_request: Option<String>,

    /// Threads used when running locally (integer, at least 1).
    #[arg(long, env = env::LOCAL_THREADS)]
    pub local_threads: Option<String>,

    /// Template construction mode.
    #[arg(long, value_enum)]
    pub level: Option<DbmLevel>,

    /// External template-construction program.
    #[arg(long)]
    pub tool: Option<String>,

    /// Working directory (default: ants_dbm).
    #[arg(long)]
    pub work_dir: Option<PathBuf>,

    /// Run the command file through this shell instead of spawning the tool directly.
    #[arg(long, value_name = "SHELL")]
    pub shell: Option<String>,

    /// Write and print the command without running it.
    #[arg(long)]
    pub dry_run: bool,

    /// Do not lock the working directory.
    #[arg(long)]
    pub no_lock: bool,

    /// Remove an existing working-directory lock before starting.
    #[arg(long, conflicts_with = "no_lock")]
    pub force_unlock: bool,

    /// Only print warnings and errors.
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase verbosity (-v: debug, -vv: trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_positionals() {
        let cli = Cli::try_parse_from(["ants-dbm", "/a/in.txt", "/a/tpl.nii.gz"]).unwrap();
        assert_eq!(cli.file_path, Some(PathBuf::from("/a/in.txt")));
        assert_eq!(cli.template_anat, Some(PathBuf::from("/a/tpl.nii.gz")));
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_cli_parse_with_options() {
        let cli = Cli::try_parse_from([
            "ants-dbm",
            "in.txt",
            "tpl.nii.gz",
            "--cluster-type",
            "slurm",
            "--local-threads",
            "4",
            "--level",
            "2level",
            "--dry-run",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.run.cluster_type.as_deref(), Some("slurm"));
        assert_eq!(cli.run.local_threads.as_deref(), Some("4"));
        assert_eq!(cli.run.level, Some(DbmLevel::TwoLevel));
        assert!(cli.run.dry_run);
        assert_eq!(cli.run.verbose, 2);
    }

    #[test]
    fn test_cli_accepts_empty_rabies() {
        // Empty values are rejected later, naming the environment variable
        let cli = Cli::try_parse_from(["ants-dbm", "in.txt", "tpl.nii.gz", "--rabies", ""]).unwrap();
        assert_eq!(cli.run.rabies.as_deref(), Some(""));
    }

    #[test]
    fn test_cli_force_unlock_conflicts_with_no_lock() {
        let cli = Cli::try_parse_from([
            "ants-dbm",
            "in.txt",
            "tpl.nii.gz",
            "--no-lock",
            "--force-unlock",
        ]);
        assert!(cli.is_err());
    }

    #[test]
    fn test_cli_rejects_unknown_level() {
        let cli =
            Cli::try_parse_from(["ants-dbm", "in.txt", "tpl.nii.gz", "--level", "3level"]);
        assert!(cli.is_err());
    }

    #[test]
    fn test_cli_parse_config_subcommand() {
        let cli = Cli::try_parse_from(["ants-dbm", "config", "show"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Command::Config {
                action: ConfigAction::Show
            })
        ));
    }

    #[test]
    fn test_cli_positionals_optional_at_parse_time() {
        let cli = Cli::try_parse_from(["ants-dbm"]).unwrap();
        assert!(cli.file_path.is_none());
        assert!(cli.template_anat.is_none());
    }
}

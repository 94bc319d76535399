//! ants-dbm - launcher for deformation-based morphometry template construction.
//!
//! Assembles a `twolevel_dbm.py` invocation from two positional inputs,
//! the environment and an optional config file, records it in
//! `ants_dbm/exec.sh`, prints it and runs it.

#![warn(missing_docs)]

pub mod cli;
pub mod config;
pub mod constants;
pub mod dbm;
pub mod error;
pub mod locking;

use clap::Parser;
use cli::{Cli, Command, ConfigAction};
use config::{Config, config_file_path, init_config, load_config};
use constants::exit_code;
use dbm::{InvocationParams, RunOptions};
use std::path::Path;
use tracing::{info, warn};

pub use error::{Error, Result};

/// Main entry point for the ants-dbm CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.run.verbose, cli.run.quiet);

    // While the tool runs, the run waits for it and releases the lock itself.
    if let Err(e) = ctrlc::set_handler(|| {
        if dbm::note_interrupt() {
            return;
        }
        locking::cleanup_all_locks();
        std::process::exit(exit_code::INTERRUPTED);
    }) {
        warn!("Failed to install Ctrl+C handler: {e}");
    }

    let config = load_config(cli.config.as_deref(), cli.command.is_none())?;

    if let Some(command) = cli.command {
        return handle_command(command, cli.config.as_deref(), &config);
    }

    config::validate_config(&config)?;

    let params = InvocationParams::resolve(
        cli.file_path.as_deref(),
        cli.template_anat.as_deref(),
        &cli.run,
        &config,
    )?;
    let options = RunOptions::from_args(&cli.run, &config);

    info!(
        "Building template from {} with target {}",
        params.input_file, params.template_anat
    );

    dbm::run(&params, &options, &mut std::io::stdout())
}

fn init_logging(verbose: u8, quiet: bool) {
    use tracing_subscriber::{EnvFilter, fmt};

    // Logs go to stderr so stdout carries only the banner and the command.
    let filter_str = if quiet {
        "warn"
    } else {
        match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter_str));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn handle_command(command: Command, explicit: Option<&Path>, config: &Config) -> Result<()> {
    match command {
        Command::Config { action } => handle_config_command(action, explicit, config),
    }
}

fn handle_config_command(
    action: ConfigAction,
    explicit: Option<&Path>,
    config: &Config,
) -> Result<()> {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => config_file_path()?,
    };

    match action {
        ConfigAction::Init => init_config_file(&path),
        ConfigAction::Show => {
            let contents =
                toml::to_string_pretty(config).map_err(|e| Error::ConfigSerialize { source: e })?;
            print!("{contents}");
            Ok(())
        }
        ConfigAction::Path => {
            println!("{}", path.display());
            Ok(())
        }
    }
}

fn init_config_file(path: &Path) -> Result<()> {
    if !init_config(&Config::default(), path)? {
        println!("Configuration file already exists: {}", path.display());
        return Ok(());
    }

    println!("Created configuration file: {}", path.display());
    println!("\nSet cluster defaults under [cluster] to avoid exporting:");
    println!(
        "  {}, {}, {}, {}",
        constants::env::CLUSTER_TYPE,
        constants::env::WALLTIME,
        constants::env::MEMORY_REQUEST,
        constants::env::LOCAL_THREADS
    );
    Ok(())
}

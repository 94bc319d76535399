//! Configuration file loading and creation.

use crate::config::{Config, config_file_path};
use crate::error::{Error, Result};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use tracing::debug;

/// Load the configuration for this invocation.
///
/// `explicit` comes from `--config` or `ANTS_DBM_CONFIG`. It must exist when
/// `require_exists` is set; `config` subcommands may name a file that is
/// about to be created. Without an explicit path the platform file is read
/// if present. In every other case the built-in defaults apply.
pub fn load_config(explicit: Option<&Path>, require_exists: bool) -> Result<Config> {
    match explicit {
        Some(path) if path.exists() => read_config(path),
        Some(path) if require_exists => Err(Error::ConfigRead {
            path: path.to_path_buf(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        }),
        Some(path) => {
            debug!("{} does not exist yet, using defaults", path.display());
            Ok(Config::default())
        }
        None => match config_file_path() {
            Ok(path) if path.exists() => read_config(&path),
            Ok(_) => Ok(Config::default()),
            Err(e) => {
                debug!("No platform config: {e}");
                Ok(Config::default())
            }
        },
    }
}

fn read_config(path: &Path) -> Result<Config> {
    debug!("Loading config from {}", path.display());

    let contents = std::fs::read_to_string(path).map_err(|e| Error::ConfigRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    toml::from_str(&contents).map_err(|e| Error::ConfigParse {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Write `config` to a new file at `path`, creating parent directories.
///
/// Returns `false` if the file already exists; its contents are left as they are.
pub fn init_config(config: &Config, path: &Path) -> Result<bool> {
    let write_err = |source: std::io::Error| Error::ConfigWrite {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(write_err)?;
    }

    let contents = toml::to_string_pretty(config).map_err(|e| Error::ConfigSerialize { source: e })?;

    let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => return Ok(false),
        Err(e) => return Err(write_err(e)),
    };
    file.write_all(contents.as_bytes()).map_err(write_err)?;

    Ok(true)
}

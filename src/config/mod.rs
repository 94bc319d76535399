//! Configuration loading and management.

mod file;
mod paths;
mod types;
mod validate;

pub use file::{init_config, load_config};
pub use paths::{config_dir, config_file_path};
pub use types::{ClusterConfig, Config, DbmLevel, ModelbuildConfig, RunConfig};
pub use validate::{validate_command_file_name, validate_config};

//! Error types for ants-dbm.

use crate::constants::exit_code;

/// Result type alias for ants-dbm operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for ants-dbm.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration directory could not be determined.
    #[error("could not determine configuration directory for this platform")]
    ConfigDirNotFound,

    /// Failed to read configuration file.
    #[error("failed to read config file '{path}'")]
    ConfigRead {
        /// Path to the config file.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse configuration file.
    #[error("failed to parse config file '{path}'")]
    ConfigParse {
        /// Path to the config file.
        path: std::path::PathBuf,
        /// Underlying parse error.
        #[source]
        source: toml::de::Error,
    },

    /// Configuration validation failed.
    #[error("configuration validation failed: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    /// Failed to write configuration file.
    #[error("failed to write config file '{path}'")]
    ConfigWrite {
        /// Path to the config file.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to serialize configuration.
    #[error("failed to serialize config")]
    ConfigSerialize {
        /// Underlying serialization error.
        #[source]
        source: toml::ser::Error,
    },

    /// A required invocation parameter was not provided.
    #[error("missing required parameter {flag} (from {source_hint})")]
    MissingParameter {
        /// Flag or argument name on the external tool's command line.
        flag: &'static str,
        /// Where the value is normally taken from.
        source_hint: String,
    },

    /// An invocation parameter was provided but is not usable.
    #[error("invalid value '{value}' for {flag} (from {source_hint}): {reason}")]
    InvalidParameter {
        /// Flag on the external tool's command line.
        flag: &'static str,
        /// Where the value was taken from.
        source_hint: String,
        /// Offending value.
        value: String,
        /// What was expected instead.
        reason: &'static str,
    },

    /// A path could not be represented as UTF-8 on the command line.
    #[error("path is not valid UTF-8: {path}")]
    NonUtf8Path {
        /// Offending path.
        path: std::path::PathBuf,
    },

    /// Failed to create the working directory.
    #[error("failed to create working directory '{path}'")]
    WorkDirCreate {
        /// Path to the working directory.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write the command file.
    #[error("failed to write command file '{path}'")]
    CommandFileWrite {
        /// Path to the command file.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Another run holds the working directory.
    #[error(
        "working directory is locked by another run: {path} \
         (if no run is active, rerun with --force-unlock)"
    )]
    WorkDirLocked {
        /// Path to the lock file.
        path: std::path::PathBuf,
    },

    /// Failed to create lock file.
    #[error("failed to create lock file '{path}'")]
    LockCreate {
        /// Path to the lock file.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to remove a lock file.
    #[error("failed to remove lock file '{path}'")]
    LockRemove {
        /// Path to the lock file.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The run was interrupted by Ctrl+C.
    #[error("interrupted")]
    Interrupted,

    /// The external tool could not be started.
    #[error("failed to start '{program}'")]
    ToolSpawn {
        /// Program that failed to start.
        program: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The external tool exited unsuccessfully.
    #[error("'{program}' exited with status {code}")]
    ToolFailed {
        /// Program that failed.
        program: String,
        /// Exit code propagated to the caller.
        code: i32,
    },
}

impl Error {
    /// Process exit code for this error.
    ///
    /// Tool failures propagate the child's own code; everything else
    /// is a local failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ToolFailed { code, .. } => *code,
            Self::ToolSpawn { .. } => exit_code::SPAWN_FAILED,
            Self::Interrupted => exit_code::INTERRUPTED,
            _ => exit_code::FAILURE,
        }
    }
}

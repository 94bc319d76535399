//! Display and execution of the assembled command.

use super::DbmCommand;
use crate::constants::{BANNER, exit_code};
use crate::error::{Error, Result};
use std::io::Write;
use std::path::Path;
use std::process::{Command, ExitStatus};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info, warn};

/// Set while the external tool is running.
static CHILD_RUNNING: AtomicBool = AtomicBool::new(false);

/// Set when Ctrl+C arrives.
static INTERRUPTED: AtomicBool = AtomicBool::new(false);

/// Record a Ctrl+C.
///
/// Returns `true` while the tool is running. The terminal delivers the
/// signal to the tool as well; the run then waits for it to exit and
/// reports the interrupt itself, so the working-directory lock is held
/// until the tool is gone.
pub fn note_interrupt() -> bool {
    INTERRUPTED.store(true, Ordering::SeqCst);
    CHILD_RUNNING.load(Ordering::SeqCst)
}

struct ChildGuard;

impl ChildGuard {
    fn start() -> Self {
        INTERRUPTED.store(false, Ordering::SeqCst);
        CHILD_RUNNING.store(true, Ordering::SeqCst);
        Self
    }
}

impl Drop for ChildGuard {
    fn drop(&mut self) {
        CHILD_RUNNING.store(false, Ordering::SeqCst);
    }
}

/// How the command is executed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ExecMode {
    /// Spawn the tool directly with a structured argument list.
    #[default]
    Direct,
    /// Run the command file through the named shell.
    Shell(String),
}

/// Write the banner followed by the command file contents.
pub fn print_command<W: Write>(out: &mut W, contents: &str) -> std::io::Result<()> {
    writeln!(out, "{BANNER}")?;
    out.write_all(contents.as_bytes())?;
    out.flush()
}

/// Execute the command synchronously inside `work_dir`.
///
/// Standard streams are inherited. A non-zero exit becomes
/// [`Error::ToolFailed`] carrying the code to propagate. If Ctrl+C arrives
/// while the tool runs and it exits on its own, the result is
/// [`Error::Interrupted`].
pub fn execute(
    command: &DbmCommand,
    work_dir: &Path,
    command_file: &str,
    mode: &ExecMode,
) -> Result<()> {
    let (program, mut process) = match mode {
        ExecMode::Direct => {
            let mut process = Command::new(command.program());
            process.args(command.args());
            (command.program().to_string(), process)
        }
        ExecMode::Shell(shell) => {
            let mut process = Command::new(shell);
            process.arg(command_file);
            (shell.clone(), process)
        }
    };
    process.current_dir(work_dir);

    info!("Starting {program} in {}", work_dir.display());
    debug!("Process: {process:?}");

    let _child = ChildGuard::start();
    if INTERRUPTED.load(Ordering::SeqCst) {
        return Err(Error::Interrupted);
    }

    let status = process.status().map_err(|e| Error::ToolSpawn {
        program: program.clone(),
        source: e,
    })?;

    if INTERRUPTED.load(Ordering::SeqCst) && status.code().is_some() {
        warn!("{program} exited after interrupt with {status}");
        return Err(Error::Interrupted);
    }

    check_status(&program, status)
}

fn check_status(program: &str, status: ExitStatus) -> Result<()> {
    if status.success() {
        info!("{program} finished successfully");
        return Ok(());
    }

    Err(Error::ToolFailed {
        program: program.to_string(),
        code: status_code(status),
    })
}

/// Exit code to report for a finished child.
///
/// Children killed by a signal map to 128 + signal, as shells report them.
pub fn status_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return exit_code::SIGNAL_BASE + signal;
        }
    }

    exit_code::FAILURE
}

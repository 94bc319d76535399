//! Exclusive lock on a working directory.

use crate::constants::LOCK_FILE_NAME;
use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Lock file content, used to identify the holder.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct LockInfo {
    /// Process ID that holds the lock.
    pub pid: u32,
    /// Hostname of the machine.
    pub hostname: String,
    /// When the lock was acquired.
    pub started: DateTime<Utc>,
    /// Input file of the run holding the lock.
    pub input: PathBuf,
}

impl LockInfo {
    /// Whether the holder was a process on this host that has since exited.
    ///
    /// Holders on other hosts sharing the directory are never considered gone.
    pub fn holder_is_gone(&self) -> bool {
        self.hostname == current_hostname() && !process_exists(self.pid)
    }
}

/// RAII guard for a working-directory lock.
#[derive(Debug)]
pub struct WorkDirLock {
    lock_path: PathBuf,
}

impl WorkDirLock {
    /// Attempt to lock `work_dir` for a run on `input`.
    ///
    /// A lock left behind by a process on this host that no longer exists
    /// is removed and taken over.
    pub fn acquire(work_dir: &Path, input: &Path) -> Result<Self> {
        let lock_path = Self::lock_path_for(work_dir);

        match Self::create(&lock_path, input) {
            Err(Error::WorkDirLocked { .. }) if Self::clear_stale(work_dir)? => {
                Self::create(&lock_path, input)
            }
            other => other,
        }
    }

    fn create(lock_path: &Path, input: &Path) -> Result<Self> {
        let mut file = match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(lock_path)
        {
            Ok(f) => f,
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                return Err(Error::WorkDirLocked {
                    path: lock_path.to_path_buf(),
                });
            }
            Err(e) => {
                return Err(Error::LockCreate {
                    path: lock_path.to_path_buf(),
                    source: e,
                });
            }
        };

        let info = LockInfo {
            pid: std::process::id(),
            hostname: current_hostname(),
            started: Utc::now(),
            input: input.to_path_buf(),
        };

        let written = serde_json::to_string_pretty(&info)
            .map_err(std::io::Error::from)
            .and_then(|json| file.write_all(json.as_bytes()));
        if let Err(e) = written {
            // An empty lock body could never be identified as stale
            let _ = fs::remove_file(lock_path);
            return Err(Error::LockCreate {
                path: lock_path.to_path_buf(),
                source: e,
            });
        }

        register_lock(lock_path);

        Ok(Self {
            lock_path: lock_path.to_path_buf(),
        })
    }

    /// Remove the lock if its holder is gone. Returns whether it was removed.
    fn clear_stale(work_dir: &Path) -> Result<bool> {
        let Some(holder) = Self::read_info(work_dir) else {
            return Ok(false);
        };

        if holder.holder_is_gone() {
            warn!(
                "Removing stale lock left by pid {} on {} since {}",
                holder.pid, holder.hostname, holder.started
            );
            Self::force_release(work_dir)?;
            return Ok(true);
        }

        warn!(
            "Working directory held by pid {} on {} since {} (input {})",
            holder.pid,
            holder.hostname,
            holder.started,
            holder.input.display()
        );
        Ok(false)
    }

    /// Remove the lock of `work_dir` regardless of its holder.
    ///
    /// A missing lock is not an error.
    pub fn force_release(work_dir: &Path) -> Result<()> {
        let lock_path = Self::lock_path_for(work_dir);
        match fs::remove_file(&lock_path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::LockRemove {
                path: lock_path,
                source: e,
            }),
        }
    }

    /// Get the lock file path for a working directory.
    pub fn lock_path_for(work_dir: &Path) -> PathBuf {
        work_dir.join(LOCK_FILE_NAME)
    }

    /// Check if a lock file exists.
    pub fn is_locked(work_dir: &Path) -> bool {
        Self::lock_path_for(work_dir).exists()
    }

    /// Read the holder information of an existing lock.
    pub(crate) fn read_info(work_dir: &Path) -> Option<LockInfo> {
        let contents = fs::read_to_string(Self::lock_path_for(work_dir)).ok()?;
        serde_json::from_str(&contents).ok()
    }
}

fn current_hostname() -> String {
    hostname::get().map_or_else(
        |_| "unknown".to_string(),
        |h| h.to_string_lossy().into_owned(),
    )
}

#[cfg(target_os = "linux")]
fn process_exists(pid: u32) -> bool {
    Path::new("/proc").join(pid.to_string()).exists()
}

// No portable liveness check; treat the holder as alive.
#[cfg(not(target_os = "linux"))]
fn process_exists(_pid: u32) -> bool {
    true
}

impl Drop for WorkDirLock {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.lock_path);
        unregister_lock(&self.lock_path);
    }
}

/// Global registry of active lock paths for cleanup on signal.
static ACTIVE_LOCKS: std::sync::LazyLock<std::sync::Mutex<Vec<PathBuf>>> =
    std::sync::LazyLock::new(|| std::sync::Mutex::new(Vec::new()));

/// Register a lock path for cleanup on signal.
pub(crate) fn register_lock(path: &Path) {
    if let Ok(mut locks) = ACTIVE_LOCKS.lock() {
        locks.push(path.to_path_buf());
    }
}

/// Unregister a lock path after normal cleanup.
pub(crate) fn unregister_lock(path: &Path) {
    if let Ok(mut locks) = ACTIVE_LOCKS.lock() {
        locks.retain(|p| p != path);
    }
}

/// Clean up all registered locks. Called on signal.
pub fn cleanup_all_locks() {
    if let Ok(locks) = ACTIVE_LOCKS.lock() {
        for lock_path in locks.iter() {
            let _ = fs::remove_file(lock_path);
        }
    }
}

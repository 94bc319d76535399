//! Working directory handling.

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

/// The directory the external tool runs in and writes its artifacts to.
#[derive(Debug, Clone)]
pub struct WorkDir {
    path: PathBuf,
}

impl WorkDir {
    /// Create the working directory if needed.
    ///
    /// Existing directories and their contents are left as they are.
    pub fn prepare(path: &Path) -> Result<Self> {
        std::fs::create_dir_all(path).map_err(|e| Error::WorkDirCreate {
            path: path.to_path_buf(),
            source: e,
        })?;
        debug!("Working directory ready: {}", path.display());
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    /// Path of the working directory.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the command file, replacing any previous content.
    pub fn write_command_file(&self, name: &str, contents: &str) -> Result<PathBuf> {
        let file_path = self.path.join(name);
        std::fs::write(&file_path, contents).map_err(|e| Error::CommandFileWrite {
            path: file_path.clone(),
            source: e,
        })?;
        debug!("Wrote command file: {}", file_path.display());
        Ok(file_path)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_prepare_creates_directory() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("ants_dbm");

        let work_dir = WorkDir::prepare(&path).unwrap();
        assert!(work_dir.path().is_dir());
    }

    #[test]
    fn test_prepare_keeps_existing_files() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("ants_dbm");
        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("previous_output.nii.gz"), b"data").unwrap();

        WorkDir::prepare(&path).unwrap();
        assert_eq!(
            std::fs::read(path.join("previous_output.nii.gz")).unwrap(),
            b"data"
        );
    }

    #[test]
    fn test_prepare_fails_when_path_is_a_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("ants_dbm");
        std::fs::write(&path, b"not a dir").unwrap();

        let result = WorkDir::prepare(&path);
        assert!(matches!(result, Err(Error::WorkDirCreate { .. })));
    }

    #[test]
    fn test_command_file_is_overwritten() {
        let temp = TempDir::new().unwrap();
        let work_dir = WorkDir::prepare(temp.path()).unwrap();

        work_dir
            .write_command_file("exec.sh", "a much longer first command\n")
            .unwrap();
        let path = work_dir.write_command_file("exec.sh", "second\n").unwrap();

        assert_eq!(std::fs::read_to_string(path).unwrap(), "second\n");
    }
}

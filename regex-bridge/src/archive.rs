//! Archive reference resolution
//!
//! The archive must be an existing regular file before the runtime is
//! touched. Directories, dangling symlinks and unreadable paths are all
//! reported the same way: as a missing archive.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{BridgeError, Result};

/// A verified path to a runtime archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveRef {
    path: PathBuf,
}

impl ArchiveRef {
    /// Check that `path` names an existing regular file
    pub fn verify(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !is_regular_file(path) {
            tracing::debug!(path = %path.display(), "archive missing or not a regular file");
            return Err(BridgeError::ArchiveNotFound {
                path: path.display().to_string(),
            });
        }
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    /// The verified path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The path as a class path entry
    pub fn class_path(&self) -> String {
        self.path.display().to_string()
    }
}

fn is_regular_file(path: &Path) -> bool {
    fs::metadata(path).map(|m| m.is_file()).unwrap_or(false)
}

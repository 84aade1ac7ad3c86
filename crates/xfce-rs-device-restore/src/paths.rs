use std::path::{Path, PathBuf};
use tracing::debug;

use crate::RestoreError;

/// Maps a state file name to the location it is kept at
pub trait StatePaths {
    fn resolve(&self, file_name: &str) -> Result<PathBuf, RestoreError>;
}

/// Per-user state directory, created on first use
#[derive(Debug, Clone)]
pub struct StateDir {
    dir: Option<PathBuf>,
}

impl StateDir {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: Some(dir.into()),
        }
    }

    /// `$XDG_STATE_HOME/xfce-rs`, falling back to the local data directory
    pub fn user_default() -> Self {
        Self {
            dir: dirs::state_dir()
                .or_else(dirs::data_local_dir)
                .map(|dir| dir.join("xfce-rs")),
        }
    }

    pub fn dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }
}

impl StatePaths for StateDir {
    fn resolve(&self, file_name: &str) -> Result<PathBuf, RestoreError> {
        let dir = self.dir.as_ref().ok_or_else(|| RestoreError::PathResolution {
            file: file_name.to_string(),
            reason: "no per-user state directory available".to_string(),
        })?;

        std::fs::create_dir_all(dir).map_err(|e| RestoreError::PathResolution {
            file: file_name.to_string(),
            reason: format!("cannot create {}: {}", dir.display(), e),
        })?;

        let path = dir.join(file_name);
        debug!("State file {} resolved to {}", file_name, path.display());
        Ok(path)
    }
}

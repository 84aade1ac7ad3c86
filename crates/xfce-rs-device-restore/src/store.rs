// Single-line state files for the saved default sink and source
use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::{DeviceKind, RestoreError};

/// Reads and writes the `default-sink` and `default-source` state files.
///
/// Each file holds the internal device name on its first line, or an empty
/// line when no default was recorded. Writes truncate in place; there is no
/// rename step, so a crash mid-write can leave an empty file behind.
#[derive(Debug, Clone)]
pub struct PersistenceStore {
    sink_path: PathBuf,
    source_path: PathBuf,
}

impl PersistenceStore {
    pub fn new(sink_path: impl Into<PathBuf>, source_path: impl Into<PathBuf>) -> Self {
        Self {
            sink_path: sink_path.into(),
            source_path: source_path.into(),
        }
    }

    /// Store with both files placed in `dir` under their default names
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(
            dir.join(DeviceKind::Sink.state_file_name()),
            dir.join(DeviceKind::Source.state_file_name()),
        )
    }

    pub fn path(&self, kind: DeviceKind) -> &Path {
        match kind {
            DeviceKind::Sink => &self.sink_path,
            DeviceKind::Source => &self.source_path,
        }
    }

    /// Load the saved default for `kind`.
    ///
    /// A missing file is the normal first-run case and yields `Ok(None)`,
    /// as does an empty first line.
    pub fn load(&self, kind: DeviceKind) -> Result<Option<String>, RestoreError> {
        let path = self.path(kind);
        let load_err = |source| RestoreError::Load {
            kind,
            path: path.to_path_buf(),
            source,
        };

        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No state file for default {} at {}", kind, path.display());
                return Ok(None);
            }
            Err(e) => return Err(load_err(e)),
        };

        let mut line = String::new();
        BufReader::new(file).read_line(&mut line).map_err(load_err)?;

        let name = line.trim_end_matches(['\n', '\r']);
        if name.is_empty() {
            Ok(None)
        } else {
            Ok(Some(name.to_string()))
        }
    }

    /// Overwrite the state file for `kind`. `None` is written as an empty line.
    pub fn save(&self, kind: DeviceKind, name: Option<&str>) -> Result<(), RestoreError> {
        let name = name.unwrap_or_default();
        if name.contains(['\n', '\r']) {
            return Err(RestoreError::InvalidName {
                kind,
                name: name.to_string(),
            });
        }

        let path = self.path(kind);
        std::fs::write(path, format!("{}\n", name)).map_err(|source| RestoreError::Save {
            kind,
            path: path.to_path_buf(),
            source,
        })?;

        debug!("Saved default {} {:?} to {}", kind, name, path.display());
        Ok(())
    }
}

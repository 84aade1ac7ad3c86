use std::path::PathBuf;
use thiserror::Error;

use crate::DeviceKind;

/// Error types for default device persistence
#[derive(Error, Debug)]
pub enum RestoreError {
    #[error("Could not resolve state path for {file}: {reason}")]
    PathResolution { file: String, reason: String },

    #[error("Failed to load default {kind} from {}: {source}", .path.display())]
    Load {
        kind: DeviceKind,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to save default {kind} to {}: {source}", .path.display())]
    Save {
        kind: DeviceKind,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to query current default {kind}: {reason}")]
    Query { kind: DeviceKind, reason: String },

    #[error("Default {kind} name {name:?} contains a line break and cannot be stored")]
    InvalidName { kind: DeviceKind, name: String },
}

impl RestoreError {
    /// Whether this error should abort module initialization
    pub fn is_fatal(&self) -> bool {
        matches!(self, RestoreError::PathResolution { .. })
    }
}

// Startup restore of the saved default sink and source
use tracing::{info, warn};

use crate::{DefaultDeviceLookup, DeviceKind, PersistenceStore};

/// What happened when restoring one device kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestoreOutcome {
    /// A manually configured default was left alone
    Manual,
    /// No state file, or an empty one
    NoPreviousSetting,
    Restored(String),
    /// The saved device is not currently present
    DeviceNotFound(String),
    /// The state file exists but could not be read
    LoadFailed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestoreReport {
    pub sink: RestoreOutcome,
    pub source: RestoreOutcome,
}

impl RestoreReport {
    pub fn outcome(&self, kind: DeviceKind) -> &RestoreOutcome {
        match kind {
            DeviceKind::Sink => &self.sink,
            DeviceKind::Source => &self.source,
        }
    }
}

/// Restore both saved defaults. Manually configured defaults always win.
pub fn restore_defaults(store: &PersistenceStore, lookup: &dyn DefaultDeviceLookup) -> RestoreReport {
    RestoreReport {
        sink: restore_kind(store, lookup, DeviceKind::Sink),
        source: restore_kind(store, lookup, DeviceKind::Source),
    }
}

fn restore_kind(
    store: &PersistenceStore,
    lookup: &dyn DefaultDeviceLookup,
    kind: DeviceKind,
) -> RestoreOutcome {
    if lookup.has_manual_default(kind) {
        info!("Manually configured default {}, not overwriting.", kind);
        return RestoreOutcome::Manual;
    }

    match store.load(kind) {
        Ok(None) => {
            info!("No previous default {} setting, ignoring.", kind);
            RestoreOutcome::NoPreviousSetting
        }
        Ok(Some(name)) if lookup.resolve(&name, kind) => {
            lookup.set_default(&name, kind);
            info!("Restored default {} '{}'.", kind, name);
            RestoreOutcome::Restored(name)
        }
        Ok(Some(name)) => {
            info!(
                "Saved default {} '{}' not present, not restoring default {} setting.",
                kind, name, kind
            );
            RestoreOutcome::DeviceNotFound(name)
        }
        Err(e) => {
            warn!("{}", e);
            RestoreOutcome::LoadFailed
        }
    }
}

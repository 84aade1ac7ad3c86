// PulseAudio integration module - default device lookup using pulsectl-rs
//
// pulsectl controllers are blocking and not Send; they live on the event
// loop thread for the whole run and are only borrowed per call.
use anyhow::Result;
use std::cell::RefCell;
use tracing::{debug, info, warn};
use pulsectl::controllers::{DeviceControl, SinkController, SourceController};
use xfce_rs_device_restore::{DefaultDeviceLookup, DeviceKind, RestoreError};

use crate::config::ManualDefaults;

pub struct PulseLookup {
    sinks: RefCell<SinkController>,
    sources: RefCell<SourceController>,
    manual: ManualDefaults,
}

impl PulseLookup {
    pub fn connect(manual: ManualDefaults) -> Result<Self> {
        info!("Connecting to PulseAudio daemon");

        let sinks = SinkController::create()
            .map_err(|e| anyhow::anyhow!("Failed to create SinkController: {}", e))?;
        let sources = SourceController::create()
            .map_err(|e| anyhow::anyhow!("Failed to create SourceController: {}", e))?;

        Ok(Self {
            sinks: RefCell::new(sinks),
            sources: RefCell::new(sources),
            manual,
        })
    }

    /// Apply the defaults named in the configuration. Runs before restore,
    /// which then leaves these kinds alone.
    pub fn apply_manual_defaults(&self) {
        for kind in DeviceKind::ALL {
            if let Some(name) = self.manual.get(kind) {
                if self.resolve(name, kind) {
                    self.set_default(name, kind);
                } else {
                    warn!("Configured default {} '{}' does not exist", kind, name);
                }
            }
        }
    }

    fn reconnect(&self, kind: DeviceKind) -> Result<()> {
        match kind {
            DeviceKind::Sink => {
                let controller = SinkController::create()
                    .map_err(|e| anyhow::anyhow!("Failed to recreate SinkController: {}", e))?;
                *self.sinks.borrow_mut() = controller;
            }
            DeviceKind::Source => {
                let controller = SourceController::create()
                    .map_err(|e| anyhow::anyhow!("Failed to recreate SourceController: {}", e))?;
                *self.sources.borrow_mut() = controller;
            }
        }
        info!("Reconnected {} controller to PulseAudio", kind);
        Ok(())
    }

    fn set_default_device(&self, name: &str, kind: DeviceKind) -> Result<bool> {
        let result = match kind {
            DeviceKind::Sink => self.sinks.borrow_mut().set_default_device(name),
            DeviceKind::Source => self.sources.borrow_mut().set_default_device(name),
        };
        result.map_err(|e| anyhow::anyhow!("Failed to set default {}: {}", kind, e))
    }
}

impl DefaultDeviceLookup for PulseLookup {
    fn has_manual_default(&self, kind: DeviceKind) -> bool {
        self.manual.get(kind).is_some()
    }

    fn resolve(&self, name: &str, kind: DeviceKind) -> bool {
        let found = match kind {
            DeviceKind::Sink => self.sinks.borrow_mut().get_device_by_name(name).is_ok(),
            DeviceKind::Source => self.sources.borrow_mut().get_device_by_name(name).is_ok(),
        };
        debug!("Lookup of {} '{}': found={}", kind, name, found);
        found
    }

    fn set_default(&self, name: &str, kind: DeviceKind) {
        match self.set_default_device(name, kind) {
            Ok(_) => info!("Default {} set to {}", kind, name),
            Err(e) => warn!("{}", e),
        }
    }

    fn current_default_name(&self, kind: DeviceKind) -> Result<Option<String>, RestoreError> {
        let server_info = match kind {
            DeviceKind::Sink => self.sinks.borrow_mut().get_server_info(),
            DeviceKind::Source => self.sources.borrow_mut().get_server_info(),
        };

        match server_info {
            Ok(info) => Ok(match kind {
                DeviceKind::Sink => info.default_sink_name,
                DeviceKind::Source => info.default_source_name,
            }),
            Err(e) => {
                // The server may have restarted; the next query uses a fresh connection
                if let Err(reconnect) = self.reconnect(kind) {
                    debug!("{}", reconnect);
                }
                Err(RestoreError::Query {
                    kind,
                    reason: format!("failed to get server info: {}", e),
                })
            }
        }
    }
}

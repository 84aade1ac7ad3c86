// Turns polled server defaults into ServerDefaultsChanged notifications
use std::rc::Rc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};
use xfce_rs_device_restore::{DefaultDeviceLookup, DeviceKind, EventCategory, RestoreError};

use crate::event_loop::LocalBus;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DefaultsSnapshot {
    pub sink: Option<String>,
    pub source: Option<String>,
}

impl DefaultsSnapshot {
    /// Fails when either default could not be queried, so an unreachable
    /// server is never mistaken for one without defaults.
    pub fn take(lookup: &dyn DefaultDeviceLookup) -> Result<Self, RestoreError> {
        Ok(Self {
            sink: lookup.current_default_name(DeviceKind::Sink)?,
            source: lookup.current_default_name(DeviceKind::Source)?,
        })
    }
}

pub struct DefaultsWatcher {
    lookup: Rc<dyn DefaultDeviceLookup>,
    bus: Rc<LocalBus>,
    last: DefaultsSnapshot,
}

impl DefaultsWatcher {
    /// Takes the baseline snapshot immediately, so anything set before
    /// this point (such as restored defaults) is not reported as a change.
    pub fn new(lookup: Rc<dyn DefaultDeviceLookup>, bus: Rc<LocalBus>) -> Self {
        let last = DefaultsSnapshot::take(lookup.as_ref()).unwrap_or_else(|e| {
            warn!("No baseline for server defaults: {}", e);
            DefaultsSnapshot::default()
        });
        Self { lookup, bus, last }
    }

    /// Compare against the previous snapshot and publish on change.
    /// Returns whether a change was published. A failed query skips the
    /// tick and keeps the previous snapshot.
    pub fn poll(&mut self) -> bool {
        let current = match DefaultsSnapshot::take(self.lookup.as_ref()) {
            Ok(current) => current,
            Err(e) => {
                warn!("Skipping default device poll: {}", e);
                return false;
            }
        };
        if current == self.last {
            return false;
        }

        debug!(
            "Server defaults changed: sink {:?} -> {:?}, source {:?} -> {:?}",
            self.last.sink, current.sink, self.last.source, current.source
        );
        self.last = current;
        self.bus.publish(EventCategory::ServerDefaultsChanged);
        true
    }

    pub async fn run(mut self, interval: Duration) {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately; the baseline is already taken
        ticker.tick().await;

        loop {
            ticker.tick().await;
            self.poll();
        }
    }
}

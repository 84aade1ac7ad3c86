// In-memory stand-ins for the host capabilities, used by unit tests
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::PathBuf;
use std::time::Duration;

use crate::{
    DefaultDeviceLookup, DeviceKind, EventBus, EventCategory, EventHandler, RestoreError,
    Scheduler, StatePaths, SubscriptionToken, TimerCallback, TimerHandle,
};

/// Scheduler whose timers only fire when the test says so
#[derive(Default)]
pub struct ManualScheduler {
    next_id: Cell<u64>,
    pending: RefCell<BTreeMap<u64, TimerCallback>>,
    delays: RefCell<Vec<Duration>>,
    cancelled: Cell<usize>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run every pending callback, returning how many ran
    pub fn fire_all(&self) -> usize {
        let mut fired = 0;
        loop {
            // Release the borrow before running, the callback may re-arm
            let next = self.pending.borrow_mut().pop_first();
            match next {
                Some((_, callback)) => {
                    callback();
                    fired += 1;
                }
                None => return fired,
            }
        }
    }

    pub fn pending_count(&self) -> usize {
        self.pending.borrow().len()
    }

    pub fn scheduled_count(&self) -> usize {
        self.delays.borrow().len()
    }

    pub fn cancelled_count(&self) -> usize {
        self.cancelled.get()
    }

    pub fn last_delay(&self) -> Option<Duration> {
        self.delays.borrow().last().copied()
    }
}

impl Scheduler for ManualScheduler {
    fn schedule_once(&self, delay: Duration, callback: TimerCallback) -> TimerHandle {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        self.pending.borrow_mut().insert(id, callback);
        self.delays.borrow_mut().push(delay);
        TimerHandle::new(id)
    }

    fn cancel(&self, handle: TimerHandle) {
        if self.pending.borrow_mut().remove(&handle.id()).is_some() {
            self.cancelled.set(self.cancelled.get() + 1);
        }
    }
}

/// Bus that delivers `publish` calls synchronously
#[derive(Default)]
pub struct RecordingBus {
    next_id: Cell<u64>,
    subscriptions: RefCell<Vec<(SubscriptionToken, EventCategory, EventHandler)>>,
    unsubscribes: Cell<usize>,
}

impl RecordingBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish(&self, category: EventCategory) {
        let mut subscriptions = self.subscriptions.borrow_mut();
        for (_, subscribed, handler) in subscriptions.iter_mut() {
            if *subscribed == category {
                handler();
            }
        }
    }

    pub fn subscriber_count(&self, category: EventCategory) -> usize {
        self.subscriptions
            .borrow()
            .iter()
            .filter(|(_, subscribed, _)| *subscribed == category)
            .count()
    }

    pub fn unsubscribe_calls(&self) -> usize {
        self.unsubscribes.get()
    }
}

impl EventBus for RecordingBus {
    fn subscribe(&self, category: EventCategory, handler: EventHandler) -> SubscriptionToken {
        let token = SubscriptionToken::new(self.next_id.get() + 1);
        self.next_id.set(token.id());
        self.subscriptions.borrow_mut().push((token, category, handler));
        token
    }

    fn unsubscribe(&self, token: SubscriptionToken) {
        self.unsubscribes.set(self.unsubscribes.get() + 1);
        self.subscriptions.borrow_mut().retain(|(t, _, _)| *t != token);
    }
}

/// Device registry kept in memory
#[derive(Default)]
pub struct FakeLookup {
    devices: RefCell<HashSet<(DeviceKind, String)>>,
    manual: RefCell<HashSet<DeviceKind>>,
    current: RefCell<HashMap<DeviceKind, String>>,
    set_calls: RefCell<Vec<(DeviceKind, String)>>,
    failing: RefCell<HashSet<DeviceKind>>,
    current_queries: Cell<usize>,
}

impl FakeLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_device(&self, kind: DeviceKind, name: &str) {
        self.devices.borrow_mut().insert((kind, name.to_string()));
    }

    pub fn set_manual(&self, kind: DeviceKind) {
        self.manual.borrow_mut().insert(kind);
    }

    /// Change the live default without going through `set_default`
    pub fn set_current(&self, kind: DeviceKind, name: Option<&str>) {
        let mut current = self.current.borrow_mut();
        match name {
            Some(name) => current.insert(kind, name.to_string()),
            None => current.remove(&kind),
        };
    }

    /// Make `current_default_name` for `kind` fail, as if the server were gone
    pub fn fail_queries(&self, kind: DeviceKind, failing: bool) {
        let mut set = self.failing.borrow_mut();
        if failing {
            set.insert(kind);
        } else {
            set.remove(&kind);
        }
    }

    pub fn set_default_calls(&self) -> Vec<(DeviceKind, String)> {
        self.set_calls.borrow().clone()
    }

    pub fn current_queries(&self) -> usize {
        self.current_queries.get()
    }
}

impl DefaultDeviceLookup for FakeLookup {
    fn has_manual_default(&self, kind: DeviceKind) -> bool {
        self.manual.borrow().contains(&kind)
    }

    fn resolve(&self, name: &str, kind: DeviceKind) -> bool {
        self.devices.borrow().contains(&(kind, name.to_string()))
    }

    fn set_default(&self, name: &str, kind: DeviceKind) {
        self.set_calls.borrow_mut().push((kind, name.to_string()));
        self.current.borrow_mut().insert(kind, name.to_string());
    }

    fn current_default_name(&self, kind: DeviceKind) -> Result<Option<String>, RestoreError> {
        self.current_queries.set(self.current_queries.get() + 1);
        if self.failing.borrow().contains(&kind) {
            return Err(RestoreError::Query {
                kind,
                reason: "connection refused".to_string(),
            });
        }
        Ok(self.current.borrow().get(&kind).cloned())
    }
}

/// Resolves every state file inside one directory, or fails on demand
pub struct FixedPaths {
    pub dir: Option<PathBuf>,
}

impl StatePaths for FixedPaths {
    fn resolve(&self, file_name: &str) -> Result<PathBuf, RestoreError> {
        match &self.dir {
            Some(dir) => Ok(dir.join(file_name)),
            None => Err(RestoreError::PathResolution {
                file: file_name.to_string(),
                reason: "no state directory".to_string(),
            }),
        }
    }
}

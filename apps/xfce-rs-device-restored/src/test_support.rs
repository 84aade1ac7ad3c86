use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use xfce_rs_device_restore::{DefaultDeviceLookup, DeviceKind, RestoreError};

/// Device registry where every name resolves
#[derive(Default)]
pub struct StaticLookup {
    current: RefCell<HashMap<DeviceKind, String>>,
    unreachable: Cell<bool>,
}

impl StaticLookup {
    pub fn set(&self, kind: DeviceKind, name: &str) {
        self.current.borrow_mut().insert(kind, name.to_string());
    }

    /// Fail every default query, like a server that went away
    pub fn set_unreachable(&self, unreachable: bool) {
        self.unreachable.set(unreachable);
    }
}

impl DefaultDeviceLookup for StaticLookup {
    fn has_manual_default(&self, _kind: DeviceKind) -> bool {
        false
    }

    fn resolve(&self, _name: &str, _kind: DeviceKind) -> bool {
        true
    }

    fn set_default(&self, name: &str, kind: DeviceKind) {
        self.set(kind, name);
    }

    fn current_default_name(&self, kind: DeviceKind) -> Result<Option<String>, RestoreError> {
        if self.unreachable.get() {
            return Err(RestoreError::Query {
                kind,
                reason: "connection terminated".to_string(),
            });
        }
        Ok(self.current.borrow().get(&kind).cloned())
    }
}

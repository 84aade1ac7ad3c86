// Coalesces bursts of default-device changes into one delayed save
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::{DefaultDeviceLookup, DeviceKind, PersistenceStore, Scheduler, TimerHandle};

/// Delay between the first change after an idle period and the save
pub const DEFAULT_SAVE_INTERVAL: Duration = Duration::from_secs(5);

/// Mutable state of the running module
#[derive(Debug, Default)]
struct ModuleState {
    /// A change happened since the last save attempt
    dirty: bool,
    /// Armed flush timer, `None` while idle
    pending: Option<TimerHandle>,
    saves: u64,
}

struct Inner {
    state: RefCell<ModuleState>,
    store: PersistenceStore,
    lookup: Rc<dyn DefaultDeviceLookup>,
    timers: Rc<dyn Scheduler>,
}

/// Two-state (idle / armed) debouncer in front of the [`PersistenceStore`].
///
/// Clones share the same state, so a clone can be handed to a bus handler
/// while the controller keeps another for flushing at shutdown.
#[derive(Clone)]
pub struct DebounceScheduler {
    inner: Rc<Inner>,
}

impl std::fmt::Debug for DebounceScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DebounceScheduler")
            .field("state", &self.inner.state)
            .field("store", &self.inner.store)
            .field("lookup", &"<DefaultDeviceLookup>")
            .field("timers", &"<Scheduler>")
            .finish()
    }
}

impl DebounceScheduler {
    pub fn new(
        store: PersistenceStore,
        lookup: Rc<dyn DefaultDeviceLookup>,
        timers: Rc<dyn Scheduler>,
    ) -> Self {
        Self {
            inner: Rc::new(Inner {
                state: RefCell::new(ModuleState::default()),
                store,
                lookup,
                timers,
            }),
        }
    }

    /// Record a change. Arms the flush timer unless one is already pending.
    pub fn on_change(&self) {
        let armed = {
            let mut state = self.inner.state.borrow_mut();
            state.dirty = true;
            state.pending.is_some()
        };

        if armed {
            debug!("Default device change coalesced into pending save");
            return;
        }

        let weak: Weak<Inner> = Rc::downgrade(&self.inner);
        let handle = self.inner.timers.schedule_once(
            DEFAULT_SAVE_INTERVAL,
            Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.on_timer();
                }
            }),
        );
        debug!(
            "Default device changed, saving in {}s (timer {})",
            DEFAULT_SAVE_INTERVAL.as_secs(),
            handle.id()
        );
        self.inner.state.borrow_mut().pending = Some(handle);
    }

    /// Save both defaults now if anything changed. Returns whether a save
    /// was attempted.
    pub fn flush(&self) -> bool {
        self.inner.flush()
    }

    /// Disarm the pending timer without saving
    pub fn cancel(&self) {
        let pending = self.inner.state.borrow_mut().pending.take();
        if let Some(handle) = pending {
            self.inner.timers.cancel(handle);
            debug!("Cancelled pending save timer {}", handle.id());
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.inner.state.borrow().dirty
    }

    pub fn is_armed(&self) -> bool {
        self.inner.state.borrow().pending.is_some()
    }

    /// Number of flushes that attempted to write the state files
    pub fn save_count(&self) -> u64 {
        self.inner.state.borrow().saves
    }

    pub fn store(&self) -> &PersistenceStore {
        &self.inner.store
    }
}

impl Inner {
    fn on_timer(&self) {
        self.flush();
        self.state.borrow_mut().pending = None;
    }

    fn flush(&self) -> bool {
        if !self.state.borrow().dirty {
            return false;
        }

        for kind in DeviceKind::ALL {
            // An unknown default must not overwrite the saved one
            let name = match self.lookup.current_default_name(kind) {
                Ok(name) => name,
                Err(e) => {
                    warn!("{}, keeping saved default {}", e, kind);
                    continue;
                }
            };
            match self.store.save(kind, name.as_deref()) {
                Ok(()) => info!("Saved default {} {:?}", kind, name.as_deref().unwrap_or("")),
                Err(e) => error!("{}", e),
            }
        }

        // Cleared even when a write failed; the next change re-arms the timer
        let mut state = self.state.borrow_mut();
        state.dirty = false;
        state.saves += 1;
        true
    }
}

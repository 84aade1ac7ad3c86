//! Remembers the default PulseAudio sink and source across restarts.
//!
//! Changes to the server defaults arrive in bursts (device enumeration at
//! login, hot-plugging), so they are coalesced by a [`DebounceScheduler`]
//! into one write every [`DEFAULT_SAVE_INTERVAL`]. At startup the
//! [`Controller`] restores the saved defaults unless the user configured
//! them manually.
//!
//! The event loop, notification bus, device registry and state location
//! are supplied by the host through [`ModuleContext`].

pub mod bus;
pub mod controller;
pub mod debounce;
pub mod error;
pub mod kind;
pub mod lookup;
pub mod paths;
pub mod restore;
pub mod scheduler;
pub mod store;

#[cfg(test)]
pub(crate) mod testing;

pub use bus::{ChangeSubscriber, EventBus, EventCategory, EventHandler, SubscriptionToken};
pub use controller::{Controller, ModuleContext};
pub use debounce::{DebounceScheduler, DEFAULT_SAVE_INTERVAL};
pub use error::RestoreError;
pub use kind::DeviceKind;
pub use lookup::DefaultDeviceLookup;
pub use paths::{StateDir, StatePaths};
pub use restore::{restore_defaults, RestoreOutcome, RestoreReport};
pub use scheduler::{Scheduler, TimerCallback, TimerHandle};
pub use store::PersistenceStore;

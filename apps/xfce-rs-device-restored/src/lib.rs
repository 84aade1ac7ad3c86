// Default device restore daemon library
pub mod config;
pub mod daemon;
pub mod event_loop;
pub mod pulseaudio;
pub mod watcher;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::{ConfigError, DaemonConfig, ManualDefaults};
pub use daemon::Daemon;
pub use event_loop::{LocalBus, TokioScheduler};
pub use pulseaudio::PulseLookup;
pub use watcher::{DefaultsSnapshot, DefaultsWatcher};

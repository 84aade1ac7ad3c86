use std::time::Duration;

/// Callback run once when a timer expires
pub type TimerCallback = Box<dyn FnOnce()>;

/// Opaque handle to a timer that has been armed but has not fired yet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

impl TimerHandle {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(self) -> u64 {
        self.0
    }
}

/// One-shot timers on the host's event loop.
///
/// Callbacks run on the loop thread, one at a time, and never from inside
/// `schedule_once` itself.
pub trait Scheduler {
    fn schedule_once(&self, delay: Duration, callback: TimerCallback) -> TimerHandle;

    /// Drop a timer before it fires. Unknown or already fired handles are ignored.
    fn cancel(&self, handle: TimerHandle);
}

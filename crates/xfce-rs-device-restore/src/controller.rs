// Module lifecycle: restore on init, flush and teardown on shutdown
use std::rc::Rc;
use tracing::{error, info};

use crate::{
    restore_defaults, ChangeSubscriber, DebounceScheduler, DefaultDeviceLookup, DeviceKind,
    EventBus, PersistenceStore, RestoreError, RestoreReport, Scheduler, StatePaths,
};

/// Capabilities the host hands to the module at init
pub struct ModuleContext {
    pub lookup: Rc<dyn DefaultDeviceLookup>,
    pub scheduler: Rc<dyn Scheduler>,
    pub bus: Rc<dyn EventBus>,
    pub paths: Box<dyn StatePaths>,
}

/// Owns all module state from `init` until `shutdown`
pub struct Controller {
    bus: Rc<dyn EventBus>,
    subscriber: ChangeSubscriber,
    debounce: Option<DebounceScheduler>,
    report: Option<RestoreReport>,
}

impl std::fmt::Debug for Controller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Controller")
            .field("subscriber", &self.subscriber)
            .field("debounce", &self.debounce)
            .field("report", &self.report)
            .finish()
    }
}

impl Controller {
    /// Resolve the state files, restore saved defaults, then start listening
    /// for changes.
    ///
    /// Restore runs before the subscription exists so that defaults set by
    /// the restore are not written straight back. On failure everything set
    /// up so far is torn down again through [`Controller::shutdown`].
    pub fn init(ctx: ModuleContext) -> Result<Self, RestoreError> {
        let mut controller = Self {
            bus: Rc::clone(&ctx.bus),
            subscriber: ChangeSubscriber::new(),
            debounce: None,
            report: None,
        };

        match controller.setup(ctx) {
            Ok(()) => Ok(controller),
            Err(e) => {
                error!("Failed to initialize default device restore: {}", e);
                controller.shutdown();
                Err(e)
            }
        }
    }

    fn setup(&mut self, ctx: ModuleContext) -> Result<(), RestoreError> {
        let sink_path = ctx.paths.resolve(DeviceKind::Sink.state_file_name())?;
        let source_path = ctx.paths.resolve(DeviceKind::Source.state_file_name())?;
        let store = PersistenceStore::new(sink_path, source_path);

        self.report = Some(restore_defaults(&store, ctx.lookup.as_ref()));

        let debounce = DebounceScheduler::new(store, ctx.lookup, ctx.scheduler);
        self.subscriber.register(self.bus.as_ref(), &debounce);
        self.debounce = Some(debounce);

        info!("Default device restore initialized");
        Ok(())
    }

    /// Save pending changes, unsubscribe and disarm the timer.
    ///
    /// Safe to call more than once and on a partially initialized controller.
    pub fn shutdown(&mut self) {
        let debounce = self.debounce.take();

        if let Some(debounce) = &debounce {
            debounce.flush();
        }
        self.subscriber.unregister(self.bus.as_ref());
        if let Some(debounce) = debounce {
            debounce.cancel();
            info!("Default device restore shut down");
        }
    }

    pub fn is_running(&self) -> bool {
        self.debounce.is_some()
    }

    pub fn debounce(&self) -> Option<&DebounceScheduler> {
        self.debounce.as_ref()
    }

    pub fn restore_report(&self) -> Option<&RestoreReport> {
        self.report.as_ref()
    }
}

impl Drop for Controller {
    fn drop(&mut self) {
        self.shutdown();
    }
}

use anyhow::{Context, Result};
use std::rc::Rc;
use tokio::task::JoinHandle;
use tracing::info;
use xfce_rs_device_restore::{Controller, DefaultDeviceLookup, ModuleContext};

use crate::config::DaemonConfig;
use crate::event_loop::{LocalBus, TokioScheduler};
use crate::watcher::DefaultsWatcher;

/// Restore controller plus the poller feeding it, on the current `LocalSet`
pub struct Daemon {
    controller: Controller,
    watcher: JoinHandle<()>,
}

impl Daemon {
    pub fn start(lookup: Rc<dyn DefaultDeviceLookup>, config: &DaemonConfig) -> Result<Self> {
        let bus = Rc::new(LocalBus::new());

        let controller = Controller::init(ModuleContext {
            lookup: Rc::clone(&lookup),
            scheduler: Rc::new(TokioScheduler::new()),
            bus: bus.clone(),
            paths: Box::new(config.state_paths()),
        })
        .context("Failed to initialize default device restore")?;

        // Baseline is taken after restore
        let watcher = DefaultsWatcher::new(lookup, bus);
        let watcher = tokio::task::spawn_local(watcher.run(config.poll_interval()));

        info!(
            "Watching default devices every {}ms",
            config.poll_interval().as_millis()
        );
        Ok(Self {
            controller,
            watcher,
        })
    }

    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    /// Stop polling, then flush and tear down the controller
    pub fn shutdown(mut self) {
        self.watcher.abort();
        self.controller.shutdown();
    }
}

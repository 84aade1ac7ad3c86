// Subscription to server-level change notifications
use tracing::{debug, info};

use crate::DebounceScheduler;

/// Notification categories published by the audio server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventCategory {
    /// Server-level change, including a new default sink or source
    ServerDefaultsChanged,
}

/// Handler invoked for every published event of a category
pub type EventHandler = Box<dyn FnMut()>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionToken(u64);

impl SubscriptionToken {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(self) -> u64 {
        self.0
    }
}

/// Notification bus of the audio server.
///
/// Handlers run on the event loop, never concurrently with each other.
pub trait EventBus {
    fn subscribe(&self, category: EventCategory, handler: EventHandler) -> SubscriptionToken;

    /// Remove a subscription. Unknown tokens are ignored.
    fn unsubscribe(&self, token: SubscriptionToken);
}

/// Forwards default-changed notifications to a [`DebounceScheduler`]
#[derive(Debug, Default)]
pub struct ChangeSubscriber {
    token: Option<SubscriptionToken>,
}

impl ChangeSubscriber {
    pub fn new() -> Self {
        Self { token: None }
    }

    /// Subscribe `debounce` to server default changes on `bus`.
    ///
    /// Registering again first drops the previous subscription.
    pub fn register(&mut self, bus: &dyn EventBus, debounce: &DebounceScheduler) {
        self.unregister(bus);

        let debounce = debounce.clone();
        let token = bus.subscribe(
            EventCategory::ServerDefaultsChanged,
            Box::new(move || debounce.on_change()),
        );
        debug!("Subscribed to server default changes (token {})", token.id());
        self.token = Some(token);
    }

    pub fn unregister(&mut self, bus: &dyn EventBus) {
        if let Some(token) = self.token.take() {
            bus.unsubscribe(token);
            info!("Unsubscribed from server default changes");
        }
    }

    pub fn is_registered(&self) -> bool {
        self.token.is_some()
    }
}

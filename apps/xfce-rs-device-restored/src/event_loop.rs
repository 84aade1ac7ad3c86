// Scheduler and notification bus on a single-threaded tokio LocalSet
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, trace};
use xfce_rs_device_restore::{
    EventBus, EventCategory, EventHandler, Scheduler, SubscriptionToken, TimerCallback,
    TimerHandle,
};

/// One-shot timers backed by `tokio::task::spawn_local`.
///
/// Must be used from within a `LocalSet`.
#[derive(Default)]
pub struct TokioScheduler {
    next_id: Cell<u64>,
    tasks: Rc<RefCell<HashMap<u64, JoinHandle<()>>>>,
}

impl TokioScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending_count(&self) -> usize {
        self.tasks.borrow().len()
    }
}

impl Scheduler for TokioScheduler {
    fn schedule_once(&self, delay: Duration, callback: TimerCallback) -> TimerHandle {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);

        let tasks = Rc::clone(&self.tasks);
        let task = tokio::task::spawn_local(async move {
            tokio::time::sleep(delay).await;
            tasks.borrow_mut().remove(&id);
            trace!("Timer {} fired", id);
            callback();
        });

        // spawn_local never polls inline, so the entry exists before the task runs
        self.tasks.borrow_mut().insert(id, task);
        TimerHandle::new(id)
    }

    fn cancel(&self, handle: TimerHandle) {
        if let Some(task) = self.tasks.borrow_mut().remove(&handle.id()) {
            task.abort();
            debug!("Timer {} cancelled", handle.id());
        }
    }
}

impl Drop for TokioScheduler {
    fn drop(&mut self) {
        for (_, task) in self.tasks.borrow_mut().drain() {
            task.abort();
        }
    }
}

struct Subscription {
    token: SubscriptionToken,
    category: EventCategory,
    handler: EventHandler,
}

/// In-process notification bus.
///
/// Handlers run synchronously inside `publish` and must not subscribe or
/// unsubscribe from within the handler.
#[derive(Default)]
pub struct LocalBus {
    next_id: Cell<u64>,
    subscriptions: RefCell<Vec<Subscription>>,
}

impl LocalBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver `category` to its subscribers in subscription order
    pub fn publish(&self, category: EventCategory) {
        let mut subscriptions = self.subscriptions.borrow_mut();
        for subscription in subscriptions.iter_mut().filter(|s| s.category == category) {
            (subscription.handler)();
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscriptions.borrow().len()
    }
}

impl EventBus for LocalBus {
    fn subscribe(&self, category: EventCategory, handler: EventHandler) -> SubscriptionToken {
        let token = SubscriptionToken::new(self.next_id.get() + 1);
        self.next_id.set(token.id());
        self.subscriptions.borrow_mut().push(Subscription {
            token,
            category,
            handler,
        });
        token
    }

    fn unsubscribe(&self, token: SubscriptionToken) {
        self.subscriptions.borrow_mut().retain(|s| s.token != token);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::task::LocalSet;

    #[tokio::test(start_paused = true)]
    async fn test_timer_fires_after_delay() {
        LocalSet::new()
            .run_until(async {
                let scheduler = TokioScheduler::new();
                let fired = Rc::new(Cell::new(false));
                let flag = Rc::clone(&fired);

                scheduler.schedule_once(Duration::from_secs(5), Box::new(move || flag.set(true)));
                assert_eq!(scheduler.pending_count(), 1);

                tokio::time::sleep(Duration::from_secs(4)).await;
                assert!(!fired.get());

                tokio::time::sleep(Duration::from_secs(2)).await;
                assert!(fired.get());
                assert_eq!(scheduler.pending_count(), 0);
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_timer_never_fires() {
        LocalSet::new()
            .run_until(async {
                let scheduler = TokioScheduler::new();
                let fired = Rc::new(Cell::new(false));
                let flag = Rc::clone(&fired);

                let handle = scheduler
                    .schedule_once(Duration::from_secs(5), Box::new(move || flag.set(true)));
                scheduler.cancel(handle);
                scheduler.cancel(handle);

                tokio::time::sleep(Duration::from_secs(10)).await;
                assert!(!fired.get());
                assert_eq!(scheduler.pending_count(), 0);
            })
            .await;
    }

    #[test]
    fn test_bus_delivers_by_category_until_unsubscribed() {
        let bus = LocalBus::new();
        let count = Rc::new(Cell::new(0));
        let counter = Rc::clone(&count);

        let token = bus.subscribe(
            EventCategory::ServerDefaultsChanged,
            Box::new(move || counter.set(counter.get() + 1)),
        );
        bus.publish(EventCategory::ServerDefaultsChanged);
        bus.publish(EventCategory::ServerDefaultsChanged);
        assert_eq!(count.get(), 2);

        bus.unsubscribe(token);
        bus.unsubscribe(token);
        bus.publish(EventCategory::ServerDefaultsChanged);
        assert_eq!(count.get(), 2);
        assert_eq!(bus.subscriber_count(), 0);
    }
}

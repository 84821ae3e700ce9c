//! Subscriber registry and history-keeping notification center.

use std::sync::Arc;

/// Receiver of events of type `E`.
///
/// Any `Fn(&E)` closure is a subscriber.
pub trait Subscriber<E> {
    fn receive(&self, event: &E);
}

impl<E, F> Subscriber<E> for F
where
    F: Fn(&E),
{
    fn receive(&self, event: &E) {
        self(event)
    }
}

/// Ordered set of subscribers for one event type.
pub struct NotificationHub<E> {
    subscribers: Vec<Arc<dyn Subscriber<E>>>,
}

impl<E> Default for NotificationHub<E> {
    fn default() -> Self {
        Self {
            subscribers: Vec::new(),
        }
    }
}

impl<E> NotificationHub<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `subscriber`. Returns `false` when it is already attached.
    pub fn attach(&mut self, subscriber: Arc<dyn Subscriber<E>>) -> bool {
        if self.position(&subscriber).is_some() {
            return false;
        }
        self.subscribers.push(subscriber);
        true
    }

    /// Removes `subscriber`. Returns `false` when it was not attached.
    pub fn detach(&mut self, subscriber: &Arc<dyn Subscriber<E>>) -> bool {
        match self.position(subscriber) {
            Some(index) => {
                self.subscribers.remove(index);
                true
            }
            None => false,
        }
    }

    /// Delivers `event` to every subscriber in attachment order.
    pub fn notify(&self, event: &E) {
        for subscriber in &self.subscribers {
            subscriber.receive(event);
        }
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    fn position(&self, subscriber: &Arc<dyn Subscriber<E>>) -> Option<usize> {
        self.subscribers
            .iter()
            .position(|current| std::ptr::addr_eq(Arc::as_ptr(current), Arc::as_ptr(subscriber)))
    }
}

/// Hub that also records every published event.
///
/// History is unbounded and lives as long as the center.
pub struct NotificationCenter<E> {
    hub: NotificationHub<E>,
    history: Vec<E>,
}

impl<E> Default for NotificationCenter<E> {
    fn default() -> Self {
        Self {
            hub: NotificationHub::new(),
            history: Vec::new(),
        }
    }
}

impl<E> NotificationCenter<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach(&mut self, subscriber: Arc<dyn Subscriber<E>>) -> bool {
        self.hub.attach(subscriber)
    }

    pub fn detach(&mut self, subscriber: &Arc<dyn Subscriber<E>>) -> bool {
        self.hub.detach(subscriber)
    }

    /// Delivers `event` to all subscribers, then records it.
    pub fn publish(&mut self, event: E) {
        self.hub.notify(&event);
        self.history.push(event);
    }

    /// Every event published so far, oldest first.
    pub fn history(&self) -> &[E] {
        &self.history
    }

    pub fn subscriber_count(&self) -> usize {
        self.hub.len()
    }
}

//! Schemas-updated signaling
//!
//! A small synchronous pub/sub bus over `std::sync::mpsc`. The store emits
//! one [`SchemasUpdated`] per successful load/reload; the event carries no
//! payload and consumers re-fetch what they need through the store.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Mutex;

/// Emitted once per successful schema-set load or reload, after the new
/// snapshot is visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemasUpdated;

/// Consumer handle for receiving update events.
pub struct Consumer {
    receiver: Receiver<SchemasUpdated>,
}

impl Consumer {
    /// Try to receive an event without blocking.
    pub fn try_recv(&mut self) -> Result<SchemasUpdated, mpsc::TryRecvError> {
        self.receiver.try_recv()
    }

    /// Receive an event, blocking until one is available.
    pub fn recv(&mut self) -> Result<SchemasUpdated, mpsc::RecvError> {
        self.receiver.recv()
    }

    /// Try to receive an event with a timeout.
    pub fn recv_timeout(
        &mut self,
        timeout: std::time::Duration,
    ) -> Result<SchemasUpdated, mpsc::RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }
}

/// Synchronous message bus for schema update notifications.
#[derive(Default)]
pub struct MessageBus {
    subscribers: Mutex<Vec<Sender<SchemasUpdated>>>,
}

impl MessageBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to update events.
    pub fn subscribe(&self) -> Consumer {
        let (sender, receiver) = mpsc::channel();
        if let Ok(mut subscribers) = self.subscribers.lock() {
            subscribers.push(sender);
        }
        Consumer { receiver }
    }

    /// Publish an event to all subscribers. Having no subscribers is not an
    /// error; senders whose consumer was dropped are pruned.
    pub fn publish(&self, event: SchemasUpdated) {
        if let Ok(mut subscribers) = self.subscribers.lock() {
            subscribers.retain(|sender| sender.send(event).is_ok());
        }
    }
}

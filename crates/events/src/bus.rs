//! Observer registration mechanics (pub/sub, no IO, no async).

use std::sync::{Mutex, mpsc};
use std::time::Duration;

/// A registered observer's receiving end.
///
/// Each subscription gets a copy of every message published after it was
/// registered (broadcast semantics). Designed for single-threaded
/// consumption, matching the engine's one-writer model.
#[derive(Debug)]
pub struct Subscription<M> {
    receiver: mpsc::Receiver<M>,
}

impl<M> Subscription<M> {
    pub fn new(receiver: mpsc::Receiver<M>) -> Self {
        Self { receiver }
    }

    /// Block until the next message is available.
    pub fn recv(&self) -> Result<M, mpsc::RecvError> {
        self.receiver.recv()
    }

    /// Try to receive a message without blocking.
    pub fn try_recv(&self) -> Result<M, mpsc::TryRecvError> {
        self.receiver.try_recv()
    }

    /// Block for up to `timeout` waiting for a message.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<M, mpsc::RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }
}

/// Change-notification bus (observer registration abstraction).
///
/// Publishing is best-effort: a mutation must never fail because nobody is
/// listening or a listener went away.
pub trait ChangeBus<M>: Send + Sync {
    fn publish(&self, message: M);

    fn subscribe(&self) -> Subscription<M>;
}

/// In-process fan-out bus over std mpsc channels.
#[derive(Debug)]
pub struct InProcessBus<M> {
    subscribers: Mutex<Vec<mpsc::Sender<M>>>,
}

impl<M> InProcessBus<M> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<M> Default for InProcessBus<M> {
    fn default() -> Self {
        Self {
            subscribers: Mutex::new(Vec::new()),
        }
    }
}

impl<M> ChangeBus<M> for InProcessBus<M>
where
    M: Clone + Send + 'static,
{
    fn publish(&self, message: M) {
        let Ok(mut subs) = self.subscribers.lock() else {
            return;
        };

        // Drop any dead subscribers while publishing.
        subs.retain(|tx| tx.send(message.clone()).is_ok());
    }

    fn subscribe(&self) -> Subscription<M> {
        let (tx, rx) = mpsc::channel();

        if let Ok(mut subs) = self.subscribers.lock() {
            subs.push(tx);
        }

        Subscription::new(rx)
    }
}

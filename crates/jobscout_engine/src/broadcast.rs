//! Transport-agnostic fan-out of progress events.

use jobscout_core::ProgressEvent;
use tokio::sync::broadcast;

const DEFAULT_CAPACITY: usize = 256;

/// Observer seam for progress delivery.
pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: ProgressEvent);
}

/// Fans each event out to every subscribed observer.
///
/// Scoped to one session: subscribers only ever see the owning session's
/// events. Each event still carries its session id, so a transport
/// multiplexing several sessions over one connection can be layered on
/// top.
pub struct EventBroadcaster {
    tx: broadcast::Sender<ProgressEvent>,
}

impl EventBroadcaster {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ProgressEvent> {
        self.tx.subscribe()
    }

    pub fn observer_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for EventBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSink for EventBroadcaster {
    fn emit(&self, event: ProgressEvent) {
        // A send with no live observers is not an error; late subscribers
        // simply miss earlier events.
        let _ = self.tx.send(event);
    }
}

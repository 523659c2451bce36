//! Broadcast channel for explorer events.

use tokio::sync::broadcast;

use assethub_core::error::AppError;
use assethub_core::events::{EventPayload, ExplorerEvent};
use assethub_core::types::NodeId;

/// In-process fan-out of [`ExplorerEvent`]s.
///
/// Publishing never blocks and never fails; events sent while nobody is
/// subscribed are dropped, and slow subscribers observe `Lagged`.
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<ExplorerEvent>,
}

impl EventBus {
    /// Create a bus buffering up to `buffer_size` events per subscriber.
    pub fn new(buffer_size: usize) -> Self {
        let (tx, _) = broadcast::channel(buffer_size.max(1));
        Self { tx }
    }

    /// Publish an event to every current subscriber.
    pub fn publish(&self, payload: EventPayload) {
        let _ = self.tx.send(ExplorerEvent::new(payload));
    }

    /// Publish a load failure.
    pub fn load_failed(&self, node_id: Option<NodeId>, error: &AppError) {
        self.publish(EventPayload::LoadFailed {
            node_id,
            kind: error.kind,
            message: error.message.clone(),
        });
    }

    /// Subscribe to events published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<ExplorerEvent> {
        self.tx.subscribe()
    }
}

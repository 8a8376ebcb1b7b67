use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// Events emitted when the active dataset changes generation. Downstream
/// consumers (views, caches) reload their reads on receipt instead of
/// polling storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    /// A sync committed a new synced generation.
    DatasetSynced {
        products_count: usize,
        suppliers_count: usize,
    },
    /// The synced generation was cleared; reads fall back to seed data.
    DatasetRestored,
}

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event; delivery is best-effort and a closed receiver is
    /// not fatal to the pipeline that emitted the event.
    pub async fn send(&self, event: Event) {
        if let Err(err) = self.sender.send(event).await {
            tracing::warn!(error = %err, "no event consumers; dropping dataset event");
        }
    }
}

/// Creates the event channel pair.
pub fn channel(capacity: usize) -> (EventSender, mpsc::Receiver<Event>) {
    let (tx, rx) = mpsc::channel(capacity);
    (EventSender::new(tx), rx)
}

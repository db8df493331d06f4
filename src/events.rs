use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::info;
use uuid::Uuid;

/// Record-lifecycle events emitted by the services.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    DishCreated(Uuid),
    DishUpdated(Uuid),
    DishDeleted(Uuid),
    SaleRecorded { sale_id: Uuid, order_no: String },
    InvestorAdded(Uuid),
    InvestorUpdated(Uuid),
    InvestorRemoved(Uuid),
    ExpenseAdded(Uuid),
    ExpenseRemoved(Uuid),
}

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously.
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }
}

/// Drains the event channel. Events are informational; processing is a
/// structured log line per event.
pub async fn process_events(mut receiver: mpsc::Receiver<Event>) {
    while let Some(event) = receiver.recv().await {
        info!(event = ?event, "Processing event");
    }
}

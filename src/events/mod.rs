use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::info;

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

// The events emitted as a stock day moves through its stages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    // Day lifecycle
    DayStarted { stock_day_id: i64, stock_date: NaiveDate },
    DayClosed { stock_day_id: i64, stock_date: NaiveDate },

    // Stock stages
    OpeningStockRecorded { stock_day_id: i64 },
    PlantMovementsRecorded { stock_day_id: i64, no_movement: bool },
    DeliveryIssuesSaved { stock_day_id: i64, staff_id: i64 },
    DeliveryIssuesFinalized { stock_day_id: i64, no_movement: bool },
    StockFinalized { stock_day_id: i64 },

    // Office counter
    OfficeSalesSaved { stock_day_id: i64 },
    OfficeSalesFinalized { stock_day_id: i64 },

    // Cash stages
    ExpectedCashComputed { stock_day_id: i64 },
    CashDeposited { stock_day_id: i64, staff_id: i64 },
    CashCollectionReset { stock_day_id: i64 },
    CashReconciled { stock_day_id: i64 },
}

/// Drains the event channel, logging each event. Runs for the life of the
/// process; exits when every sender has been dropped.
pub async fn process_events(mut rx: mpsc::Receiver<Event>) {
    info!("Starting event processing loop");

    while let Some(event) = rx.recv().await {
        match &event {
            Event::DayStarted {
                stock_day_id,
                stock_date,
            } => {
                info!(stock_day_id, %stock_date, "stock day opened");
            }
            Event::DayClosed {
                stock_day_id,
                stock_date,
            } => {
                info!(stock_day_id, %stock_date, "stock day closed");
            }
            Event::StockFinalized { stock_day_id } => {
                info!(stock_day_id, "godown stock finalized");
            }
            Event::CashReconciled { stock_day_id } => {
                info!(stock_day_id, "cash reconciled");
            }
            other => {
                info!(event = ?other, "stage event");
            }
        }
    }

    info!("Event processing loop stopped");
}

//! Service event bus
//!
//! Services announce completed loads and mutations on an in-process
//! broadcast channel. Front ends subscribe to refresh views or log activity;
//! when nobody listens, events are dropped without blocking the emitter.
//!
//! # Example
//!
//! ```no_run
//! use libvillastay::service::events::{Event, EventBus};
//!
//! # async fn example() {
//! let event_bus = EventBus::new(100);
//! let mut receiver = event_bus.subscribe();
//!
//! event_bus.emit(Event::MessageSent {
//!     booking_id: "bk-1001".to_string(),
//!     message_id: "m42".to_string(),
//! });
//!
//! if let Ok(event) = receiver.recv().await {
//!     println!("Received: {:?}", event);
//! }
//! # }
//! ```

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

pub type EventReceiver = broadcast::Receiver<Event>;

/// Broadcast bus shared by all services
///
/// `capacity` events are buffered per subscriber; a lagging subscriber loses
/// the oldest ones.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<Event>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> EventReceiver {
        self.sender.subscribe()
    }

    /// Emit to all current subscribers. Never blocks.
    pub fn emit(&self, event: Event) {
        // Err only means nobody is listening
        let _ = self.sender.send(event);
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

/// Events emitted by services after a backend round trip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// Thread list for a tab arrived
    ThreadsLoaded { tab: String, count: usize },

    /// A page of message history arrived
    HistoryPageLoaded {
        booking_id: String,
        offset: usize,
        count: usize,
        has_more: bool,
    },

    /// The backend accepted a message
    MessageSent { booking_id: String, message_id: String },

    /// A message could not be delivered
    MessageSendFailed { booking_id: String, error: String },

    /// A review was created
    ReviewSubmitted {
        booking_id: String,
        review_id: String,
        rating: u8,
    },

    /// A review submission failed
    ReviewSubmitFailed { booking_id: String, error: String },
}

//! In-process broadcast bus adapter
//!
//! Backs the cross-client channel when several client runtimes live in one
//! process (a hot-seat table, or the integration tests). Delivery matches
//! the channel contract: at-most-once, no acknowledgment, a lagging
//! subscriber simply loses messages.

use tokio::sync::broadcast;

use crate::application::dto::ChannelMessage;
use crate::application::ports::outbound::{BusError, MessageBusPort};

/// A publish/subscribe channel over `tokio::sync::broadcast`.
pub struct LocalBus {
    sender: broadcast::Sender<ChannelMessage>,
}

impl LocalBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Subscribe a client runtime's listener to the channel.
    pub fn subscribe(&self) -> broadcast::Receiver<ChannelMessage> {
        self.sender.subscribe()
    }
}

impl Default for LocalBus {
    fn default() -> Self {
        Self::new(64)
    }
}

impl MessageBusPort for LocalBus {
    fn publish(&self, message: ChannelMessage) -> Result<(), BusError> {
        // send only fails when no subscriber exists; with nobody listening
        // the fire-and-forget message is simply lost.
        self.sender
            .send(message)
            .map(|_| ())
            .map_err(|_| BusError::Closed("no connected subscribers".to_string()))
    }
}

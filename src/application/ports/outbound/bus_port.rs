//! Cross-client message bus port

use thiserror::Error;

use crate::application::dto::ChannelMessage;

/// Error publishing to the channel.
#[derive(Debug, Error)]
pub enum BusError {
    #[error("Channel closed: {0}")]
    Closed(String),
}

/// Outbound port for the cross-client publish/subscribe channel.
///
/// Publishing is fire-and-forget and never suspends: the publisher learns
/// nothing about delivery, ordering across clients, or whether anyone acted
/// on the message. Subscription is an adapter concern; the application only
/// ever publishes here and receives inbound messages through its own
/// handler entry points.
pub trait MessageBusPort: Send + Sync {
    fn publish(&self, message: ChannelMessage) -> Result<(), BusError>;
}

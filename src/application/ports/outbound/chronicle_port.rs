//! Shared chronicle port - the session's append-only log

use crate::domain::events::ChronicleEntry;

/// Outbound port for the append-only shared chronicle.
///
/// Appends are infallible from the caller's point of view: an adapter that
/// cannot deliver an entry logs the loss and drops it rather than stalling
/// a resolution flow.
pub trait ChroniclePort: Send + Sync {
    fn append(&self, entry: ChronicleEntry);
}

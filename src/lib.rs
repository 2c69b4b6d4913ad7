//! Devotion Engine - Turn-start prayer coordination for live TTRPG sessions
//!
//! Coordinates the Conduit's per-turn prayer decision across the clients of
//! a shared session: working out which connected user may decide for a
//! hero, routing the prompt to that client over a fire-and-forget channel,
//! resolving the table-driven outcome, and publishing the resulting effect
//! to the shared chronicle.
//!
//! The crate ships two halves:
//! - the client-side core (`application` services behind injectable ports,
//!   assembled by `infrastructure::client::ClientRuntime`), and
//! - the session relay binary (`infrastructure::websocket`), the dumb
//!   broadcast transport clients coordinate through.

pub mod application;
pub mod domain;
pub mod infrastructure;

//! Session management for the relay
//!
//! Tracks WebSocket connections joined to shared prayer sessions: who is
//! connected, which users they are, the in-play heroes, and the session's
//! shared chronicle tail. Clients converge on session state through the
//! snapshots and broadcasts issued here.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;

use crate::domain::entities::{Hero, HeroRegistry, Roster, SessionUser};
use crate::domain::events::ChronicleEntry;
use crate::domain::value_objects::{SessionId, UserId};
use crate::infrastructure::websocket::ServerMessage;

/// Unique identifier for a connected client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClientId(uuid::Uuid);

impl ClientId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for ClientId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ClientId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One WebSocket connection participating in a session.
///
/// Several connections may carry the same user (multiple tabs); the user
/// counts as online while at least one of them remains.
#[derive(Debug, Clone)]
pub struct SessionParticipant {
    pub client_id: ClientId,
    pub user_id: UserId,
    #[allow(dead_code)] // Kept for future session analytics
    pub joined_at: DateTime<Utc>,
    /// Channel to send messages to this client
    pub sender: mpsc::UnboundedSender<ServerMessage>,
}

/// An active shared prayer session.
#[derive(Debug)]
pub struct GameSession {
    pub id: SessionId,
    /// Every user the session has seen, with live online flags.
    pub roster: Roster,
    /// Heroes registered by joining clients.
    pub heroes: HeroRegistry,
    participants: HashMap<ClientId, SessionParticipant>,
    chronicle: Vec<ChronicleEntry>,
    max_chronicle: usize,
    pub created_at: DateTime<Utc>,
}

impl GameSession {
    pub fn new(id: SessionId, max_chronicle: usize) -> Self {
        Self {
            id,
            roster: Roster::new(),
            heroes: HeroRegistry::new(),
            participants: HashMap::new(),
            chronicle: Vec::new(),
            max_chronicle: max_chronicle.max(1),
            created_at: Utc::now(),
        }
    }

    /// Add a connection for a user, marking the user online in the roster.
    pub fn add_participant(
        &mut self,
        client_id: ClientId,
        user: SessionUser,
        sender: mpsc::UnboundedSender<ServerMessage>,
    ) {
        let user_id = user.id;
        self.roster.upsert(SessionUser {
            online: true,
            ..user
        });
        self.participants.insert(
            client_id,
            SessionParticipant {
                client_id,
                user_id,
                joined_at: Utc::now(),
                sender,
            },
        );
    }

    /// Drop a connection. The user record stays in the roster so an offline
    /// controller is still visible to authority resolution; it only flips
    /// offline once its last connection is gone.
    pub fn remove_participant(&mut self, client_id: ClientId) -> Option<SessionParticipant> {
        let participant = self.participants.remove(&client_id)?;
        let still_connected = self
            .participants
            .values()
            .any(|p| p.user_id == participant.user_id);
        if !still_connected {
            self.roster.set_online(participant.user_id, false);
        }
        Some(participant)
    }

    pub fn register_heroes(&mut self, heroes: Vec<Hero>) {
        for hero in heroes {
            self.heroes.insert(hero);
        }
    }

    /// Append to the shared chronicle, trimming the oldest entries beyond
    /// the retained window.
    pub fn append_chronicle(&mut self, entry: ChronicleEntry) {
        self.chronicle.push(entry);
        if self.chronicle.len() > self.max_chronicle {
            let excess = self.chronicle.len() - self.max_chronicle;
            self.chronicle.drain(0..excess);
        }
    }

    pub fn chronicle(&self) -> &[ChronicleEntry] {
        &self.chronicle
    }

    /// Broadcast a message to all participants
    pub fn broadcast(&self, message: &ServerMessage) {
        for participant in self.participants.values() {
            if let Err(e) = participant.sender.send(message.clone()) {
                tracing::warn!(
                    "Failed to send message to client {}: {}",
                    participant.client_id,
                    e
                );
            }
        }
    }

    /// Broadcast a message to all participants except one
    pub fn broadcast_except(&self, message: &ServerMessage, exclude: ClientId) {
        for participant in self.participants.values() {
            if participant.client_id != exclude {
                if let Err(e) = participant.sender.send(message.clone()) {
                    tracing::warn!(
                        "Failed to send message to client {}: {}",
                        participant.client_id,
                        e
                    );
                }
            }
        }
    }

    /// Send a message to every connection carrying one user.
    pub fn send_to_user(&self, user_id: UserId, message: &ServerMessage) {
        for participant in self.participants.values() {
            if participant.user_id == user_id {
                if let Err(e) = participant.sender.send(message.clone()) {
                    tracing::warn!(
                        "Failed to send message to participant {}: {}",
                        participant.client_id,
                        e
                    );
                }
            }
        }
    }

    pub fn participant_count(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }
}

/// Manages active prayer sessions
pub struct SessionManager {
    sessions: HashMap<SessionId, GameSession>,
    /// Maps client IDs to their current session
    client_sessions: HashMap<ClientId, SessionId>,
    /// Retained chronicle entries per session
    chronicle_capacity: usize,
}

impl SessionManager {
    pub fn new(chronicle_capacity: usize) -> Self {
        Self {
            sessions: HashMap::new(),
            client_sessions: HashMap::new(),
            chronicle_capacity,
        }
    }

    /// Join an existing session, or create it when the id is new.
    pub fn join_session(
        &mut self,
        session_id: SessionId,
        client_id: ClientId,
        user: SessionUser,
        heroes: Vec<Hero>,
        sender: mpsc::UnboundedSender<ServerMessage>,
    ) {
        let chronicle_capacity = self.chronicle_capacity;
        let session = self
            .sessions
            .entry(session_id)
            .or_insert_with(|| GameSession::new(session_id, chronicle_capacity));

        let user_name = user.name.clone();
        session.add_participant(client_id, user, sender);
        session.register_heroes(heroes);
        self.client_sessions.insert(client_id, session_id);

        tracing::info!(
            "Client {} (user: {}) joined session {}",
            client_id,
            user_name,
            session_id
        );
    }

    /// Leave a session, removing it once its last connection is gone.
    pub fn leave_session(&mut self, client_id: ClientId) -> Option<(SessionId, SessionParticipant)> {
        let session_id = self.client_sessions.remove(&client_id)?;
        let session = self.sessions.get_mut(&session_id)?;
        let participant = session.remove_participant(client_id)?;

        tracing::info!(
            "Client {} left session {} (user: {})",
            client_id,
            session_id,
            participant.user_id
        );

        if session.is_empty() {
            self.sessions.remove(&session_id);
            tracing::info!("Removed empty session {}", session_id);
        }

        Some((session_id, participant))
    }

    pub fn get_session(&self, session_id: SessionId) -> Option<&GameSession> {
        self.sessions.get(&session_id)
    }

    pub fn get_session_mut(&mut self, session_id: SessionId) -> Option<&mut GameSession> {
        self.sessions.get_mut(&session_id)
    }

    /// Get the session ID for a client
    pub fn get_client_session(&self, client_id: ClientId) -> Option<SessionId> {
        self.client_sessions.get(&client_id).copied()
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new(200)
    }
}

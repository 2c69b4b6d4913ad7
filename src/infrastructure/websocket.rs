//! WebSocket relay handler for session clients
//!
//! The relay is deliberately dumb: it tracks who is in a session, fans
//! published channel messages out to every other connection, and appends
//! chronicle entries. It never arbitrates prayer decisions; those live on
//! the clients.

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::application::dto::ChannelMessage;
use crate::domain::entities::{Hero, SessionUser};
use crate::domain::events::ChronicleEntry;
use crate::domain::value_objects::{SessionId, UserId};
use crate::infrastructure::session::ClientId;
use crate::infrastructure::state::AppState;

/// Messages from client to relay
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClientMessage {
    /// Join a prayer session, bringing the local user and its heroes
    JoinSession {
        user: SessionUser,
        #[serde(default)]
        heroes: Vec<Hero>,
        /// Session to join (a fresh session is created if not provided)
        #[serde(default)]
        session_id: Option<SessionId>,
    },
    /// Publish a message on the cross-client channel (fire-and-forget)
    Publish { message: ChannelMessage },
    /// Append an entry to the shared chronicle
    Chronicle { entry: ChronicleEntry },
    /// Heartbeat ping
    Heartbeat,
}

/// Messages from relay to client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ServerMessage {
    /// Session successfully joined with a full state snapshot
    SessionJoined {
        session_id: SessionId,
        roster: Vec<SessionUser>,
        heroes: Vec<Hero>,
        chronicle: Vec<ChronicleEntry>,
    },
    /// A user joined the session (broadcast to others)
    UserJoined { user: SessionUser },
    /// A user went offline (broadcast to others)
    UserLeft { user_id: UserId },
    /// A channel message published by another client
    Channel { message: ChannelMessage },
    /// An entry was appended to the shared chronicle
    ChronicleAppended { entry: ChronicleEntry },
    /// Error message
    Error { code: String, message: String },
    /// Heartbeat response
    Pong,
}

/// WebSocket upgrade handler
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handle an individual WebSocket connection
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (mut ws_sender, mut ws_receiver) = socket.split();

    let client_id = ClientId::new();
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerMessage>();

    tracing::info!("New WebSocket connection established: {}", client_id);

    // Forward messages from the channel to the WebSocket
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if let Ok(json) = serde_json::to_string(&msg) {
                if ws_sender.send(Message::Text(json.into())).await.is_err() {
                    break;
                }
            }
        }
    });

    while let Some(result) = ws_receiver.next().await {
        match result {
            Ok(Message::Text(text)) => match serde_json::from_str::<ClientMessage>(&text) {
                Ok(msg) => {
                    if let Some(response) = handle_message(msg, &state, client_id, tx.clone()).await
                    {
                        if tx.send(response).is_err() {
                            break;
                        }
                    }
                }
                Err(e) => {
                    // Malformed traffic is answered, logged, and otherwise
                    // ignored; it must never wedge the session.
                    tracing::warn!("Failed to parse message: {}", e);
                    let error = ServerMessage::Error {
                        code: "PARSE_ERROR".to_string(),
                        message: format!("Invalid message format: {}", e),
                    };
                    if tx.send(error).is_err() {
                        break;
                    }
                }
            },
            Ok(Message::Close(_)) => {
                tracing::info!("WebSocket connection closed by client: {}", client_id);
                break;
            }
            Ok(Message::Ping(_)) => {
                let _ = tx.send(ServerMessage::Pong);
            }
            Err(e) => {
                tracing::error!("WebSocket error for client {}: {}", client_id, e);
                break;
            }
            _ => {}
        }
    }

    // Clean up: drop the connection and tell the others when the user went
    // offline with it.
    {
        let mut sessions = state.sessions.write().await;
        if let Some((session_id, participant)) = sessions.leave_session(client_id) {
            if let Some(session) = sessions.get_session(session_id) {
                let gone_offline = session
                    .roster
                    .get(participant.user_id)
                    .map(|u| !u.online)
                    .unwrap_or(true);
                if gone_offline {
                    session.broadcast(&ServerMessage::UserLeft {
                        user_id: participant.user_id,
                    });
                }
            }
        }
    }

    send_task.abort();
    tracing::info!("WebSocket connection terminated: {}", client_id);
}

/// Handle a parsed client message
async fn handle_message(
    msg: ClientMessage,
    state: &AppState,
    client_id: ClientId,
    sender: mpsc::UnboundedSender<ServerMessage>,
) -> Option<ServerMessage> {
    match msg {
        ClientMessage::Heartbeat => Some(ServerMessage::Pong),

        ClientMessage::JoinSession {
            user,
            heroes,
            session_id,
        } => {
            let session_id = session_id.unwrap_or_default();
            tracing::info!("User {} joining session {}", user.name, session_id);

            let user_joined = ServerMessage::UserJoined { user: user.clone() };
            let mut sessions = state.sessions.write().await;
            sessions.join_session(session_id, client_id, user, heroes, sender);

            let Some(session) = sessions.get_session(session_id) else {
                return Some(ServerMessage::Error {
                    code: "SESSION_ERROR".to_string(),
                    message: "Session vanished during join".to_string(),
                });
            };
            session.broadcast_except(&user_joined, client_id);
            Some(ServerMessage::SessionJoined {
                session_id,
                roster: session.roster.users().cloned().collect(),
                heroes: session.heroes.iter().cloned().collect(),
                chronicle: session.chronicle().to_vec(),
            })
        }

        ClientMessage::Publish { message } => {
            let sessions = state.sessions.read().await;
            let Some(session_id) = sessions.get_client_session(client_id) else {
                return Some(ServerMessage::Error {
                    code: "NOT_IN_SESSION".to_string(),
                    message: "You must join a session before publishing".to_string(),
                });
            };

            if let Some(session) = sessions.get_session(session_id) {
                // Fire-and-forget fan-out: every other connection gets one
                // delivery attempt, nobody gets an acknowledgment.
                session.broadcast_except(&ServerMessage::Channel { message }, client_id);
            }
            None
        }

        ClientMessage::Chronicle { entry } => {
            let mut sessions = state.sessions.write().await;
            let Some(session_id) = sessions.get_client_session(client_id) else {
                return Some(ServerMessage::Error {
                    code: "NOT_IN_SESSION".to_string(),
                    message: "You must join a session before writing the chronicle".to_string(),
                });
            };

            if let Some(session) = sessions.get_session_mut(session_id) {
                session.append_chronicle(entry.clone());
                session.broadcast(&ServerMessage::ChronicleAppended { entry });
            }
            None
        }
    }
}

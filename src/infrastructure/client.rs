//! Client runtime - one connected client's view of the session
//!
//! Wires the prayer services to a client's local session view and its
//! channel subscription. Each runtime owns its own copy of the roster and
//! hero registry (clients share no memory; their views converge through
//! session messages, not through this crate).

use std::sync::Arc;

use tokio::sync::{broadcast, RwLock};
use tokio::task::JoinHandle;

use crate::application::dto::ChannelMessage;
use crate::application::ports::outbound::{
    ChroniclePort, MessageBusPort, PromptPort, RandomizerPort, TurnHandlerPort,
};
use crate::application::services::{
    EffectEmitter, OutcomeResolver, PrayerRouter, TurnStartInterceptor,
};
use crate::domain::entities::{HeroRegistry, Roster, SessionUser};
use crate::domain::events::TurnStartEvent;
use crate::domain::value_objects::{HeroId, UserId};

/// A client's local copy of the shared session state.
#[derive(Debug, Default)]
pub struct SessionState {
    pub roster: Roster,
    pub heroes: HeroRegistry,
}

/// One connected client's runtime.
pub struct ClientRuntime {
    local_user_id: UserId,
    state: Arc<RwLock<SessionState>>,
    interceptor: Option<Arc<TurnStartInterceptor>>,
}

impl ClientRuntime {
    /// Assemble the runtime, wrapping the host's turn-start handler.
    ///
    /// When the host exposes no handler to wrap, interception is disabled
    /// with a diagnostic and turn starts keep their default behavior. The
    /// session still works; this client just never runs the prayer flow.
    pub fn new(
        local_user: &SessionUser,
        state: Arc<RwLock<SessionState>>,
        bus: Arc<dyn MessageBusPort>,
        prompt: Arc<dyn PromptPort>,
        dice: Arc<dyn RandomizerPort>,
        chronicle: Arc<dyn ChroniclePort>,
        default_handler: Option<Arc<dyn TurnHandlerPort>>,
    ) -> Self {
        let interceptor = match default_handler {
            Some(handler) => {
                let router = Arc::new(PrayerRouter::new(
                    local_user.id,
                    local_user.name.clone(),
                    bus,
                    prompt,
                ));
                let outcome = Arc::new(OutcomeResolver::new(dice, chronicle.clone()));
                let emitter = Arc::new(EffectEmitter::new(chronicle));
                Some(Arc::new(TurnStartInterceptor::wrap(
                    handler, router, outcome, emitter,
                )))
            }
            None => {
                tracing::warn!(
                    user = %local_user.name,
                    "Could not wrap turn-start handler - handler not found, prayer interception disabled"
                );
                None
            }
        };

        Self {
            local_user_id: local_user.id,
            state,
            interceptor,
        }
    }

    pub fn local_user_id(&self) -> UserId {
        self.local_user_id
    }

    pub fn state(&self) -> Arc<RwLock<SessionState>> {
        Arc::clone(&self.state)
    }

    /// Feed one locally observed turn-start occurrence into the flow.
    pub async fn observe_turn_start(&self, hero_id: HeroId) {
        let Some(interceptor) = &self.interceptor else {
            return;
        };
        let event = TurnStartEvent::new(hero_id, self.local_user_id);
        let state = self.state.read().await;
        interceptor
            .on_turn_start(&event, &state.roster, &state.heroes)
            .await;
    }

    /// Spawn the channel listener for this client.
    ///
    /// Lagged receivers lose messages, which the at-most-once channel
    /// contract permits; the loss is logged and the listener keeps going.
    pub fn spawn_listener(
        self: &Arc<Self>,
        mut receiver: broadcast::Receiver<ChannelMessage>,
    ) -> JoinHandle<()> {
        let runtime = Arc::clone(self);
        tokio::spawn(async move {
            loop {
                match receiver.recv().await {
                    Ok(message) => {
                        let Some(interceptor) = &runtime.interceptor else {
                            continue;
                        };
                        let state = runtime.state.read().await;
                        interceptor
                            .on_channel_message(&message, &state.roster, &state.heroes)
                            .await;
                    }
                    Err(broadcast::error::RecvError::Lagged(dropped)) => {
                        tracing::warn!("Channel listener lagged, {dropped} messages dropped");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        })
    }
}

//! Decision routing - local prompt vs. cross-client forwarding
//!
//! One router instance runs on every connected client. The instance that
//! observes a turn start either prompts its own user (it is the authority,
//! or no authority is connected and it falls back to itself) or publishes a
//! prayer request on the channel and walks away. The authoritative client's
//! instance picks the request up, re-validates it against its own view of
//! the session, and prompts locally.

use std::sync::Arc;

use crate::application::dto::ChannelMessage;
use crate::application::ports::outbound::{
    MessageBusPort, PrayerPromptRequest, PromptError, PromptPort,
};
use crate::domain::entities::{Hero, HeroRegistry, Roster, SessionUser};
use crate::domain::events::TurnStartEvent;
use crate::domain::value_objects::{Decision, UserId};

/// Where a routed decision ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Routed {
    /// The local user decided; the caller owns the rest of the flow.
    Local(Decision),
    /// The request went out on the channel; the remote authority owns the
    /// rest of the flow and this client's occurrence is finished.
    Forwarded,
}

/// Routes prayer decisions to the authoritative client.
pub struct PrayerRouter {
    local_user_id: UserId,
    local_user_name: String,
    bus: Arc<dyn MessageBusPort>,
    prompt: Arc<dyn PromptPort>,
}

impl PrayerRouter {
    pub fn new(
        local_user_id: UserId,
        local_user_name: impl Into<String>,
        bus: Arc<dyn MessageBusPort>,
        prompt: Arc<dyn PromptPort>,
    ) -> Self {
        Self {
            local_user_id,
            local_user_name: local_user_name.into(),
            bus,
            prompt,
        }
    }

    pub fn local_user_id(&self) -> UserId {
        self.local_user_id
    }

    /// Route one occurrence: prompt locally or forward to the authority.
    ///
    /// Forwarding is fire-and-forget. A publish failure is logged and
    /// dropped; at-most-once delivery means the occurrence may simply be
    /// lost, which the session survives.
    pub async fn route(
        &self,
        event: &TurnStartEvent,
        hero: &Hero,
        authority: Option<&SessionUser>,
    ) -> Result<Routed, PromptError> {
        if let Some(authority) = authority {
            if authority.id != self.local_user_id {
                let message = ChannelMessage::PromptPrayer {
                    hero_id: hero.id,
                    hero_name: hero.name.clone(),
                    requester_id: self.local_user_id,
                    requester_name: self.local_user_name.clone(),
                    occurrence: Some(event.occurrence),
                };
                if let Err(e) = self.bus.publish(message) {
                    tracing::warn!(
                        hero = %hero.name,
                        authority = %authority.name,
                        "Dropping prayer request, channel unavailable: {e}"
                    );
                }
                return Ok(Routed::Forwarded);
            }
        }

        // We are the authority, or nobody is: prompt here. A missing
        // authority must not silently drop the hero's turn gain.
        let choice = self.prompt.prompt(PrayerPromptRequest::for_hero(hero)).await?;
        Ok(Routed::Local(choice.normalize()))
    }

    /// Handle a prayer request received from the channel.
    ///
    /// Re-validates everything the requester claimed against this client's
    /// own session view before prompting: the hero must exist, still
    /// qualify, and actually be controlled by the local user. Anything
    /// stale, spoofed, or malformed is a logged no-op (fail-open) so a bad
    /// message can never stall the session.
    pub async fn accept_remote<'h>(
        &self,
        message: &ChannelMessage,
        roster: &Roster,
        heroes: &'h HeroRegistry,
    ) -> Result<Option<(&'h Hero, Decision)>, PromptError> {
        let ChannelMessage::PromptPrayer {
            hero_id,
            hero_name,
            requester_name,
            ..
        } = message;

        let Some(hero) = heroes.get(*hero_id) else {
            tracing::warn!(
                hero = %hero_name,
                requester = %requester_name,
                "Ignoring prayer request for unknown hero"
            );
            return Ok(None);
        };

        if !hero.is_conduit() || hero.turn_gain.is_none() {
            tracing::warn!(
                hero = %hero.name,
                requester = %requester_name,
                "Ignoring prayer request for non-qualifying hero"
            );
            return Ok(None);
        }

        let is_controller = roster
            .get(self.local_user_id)
            .map(|user| user.controls == Some(hero.id))
            .unwrap_or(false);
        if !is_controller {
            // Every client hears every broadcast; silence is the normal
            // case for all but the controller.
            return Ok(None);
        }

        let choice = self.prompt.prompt(PrayerPromptRequest::for_hero(hero)).await?;
        Ok(Some((hero, choice.normalize())))
    }
}

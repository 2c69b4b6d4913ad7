//! Application DTOs - the closed cross-client message set

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{HeroId, OccurrenceId, UserId};

/// Messages exchanged on the cross-client channel.
///
/// Delivery is at-most-once, unordered across clients, fire-and-forget: no
/// acknowledgment, no retry. Every connected client receives every message;
/// each variant documents who acts on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ChannelMessage {
    /// Ask the hero's owning controller to run the prayer prompt.
    ///
    /// Acted on only by the client whose local user controls `hero_id`;
    /// everyone else ignores it. The occurrence id is an idempotency key
    /// reserved for future duplicate suppression; receivers carry it but do
    /// not yet deduplicate on it.
    #[serde(rename = "promptPrayer")]
    PromptPrayer {
        #[serde(rename = "entityId")]
        hero_id: HeroId,
        #[serde(rename = "entityName")]
        hero_name: String,
        #[serde(rename = "requesterId")]
        requester_id: UserId,
        #[serde(rename = "requesterName")]
        requester_name: String,
        #[serde(rename = "occurrence", default, skip_serializing_if = "Option::is_none")]
        occurrence: Option<OccurrenceId>,
    },
}

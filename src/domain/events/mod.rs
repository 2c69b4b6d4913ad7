//! Domain events - Turn-start occurrences and shared-chronicle records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{
    DamageInstruction, GainInstruction, HeroId, OccurrenceId, OutcomeLabel, UserId,
};

/// One turn-start occurrence for one hero, as observed by one client.
///
/// Ephemeral: created when the host's turn event fires and discarded once
/// the occurrence resolves. The occurrence id doubles as the idempotency key
/// carried on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnStartEvent {
    pub occurrence: OccurrenceId,
    pub hero_id: HeroId,
    /// The user whose client observed the event firing.
    pub observed_by: UserId,
}

impl TurnStartEvent {
    pub fn new(hero_id: HeroId, observed_by: UserId) -> Self {
        Self {
            occurrence: OccurrenceId::new(),
            hero_id,
            observed_by,
        }
    }
}

/// A baseline-roll announcement surfaced to the chronicle before the outcome
/// table is applied, so every observer sees the roll ahead of its
/// consequences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollAnnouncement {
    pub hero_name: String,
    pub roll: u8,
    pub flavor: String,
}

/// The single immutable artifact emitted per resolved occurrence.
///
/// External collaborators consume the instructions: the gain collaborator
/// applies `gain`, the damage collaborator applies `damage` when present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectCommand {
    pub hero_id: HeroId,
    pub hero_name: String,
    pub label: OutcomeLabel,
    pub narrative: String,
    pub gain: GainInstruction,
    pub damage: Option<DamageInstruction>,
    pub boon_available: bool,
    pub issued_at: DateTime<Utc>,
}

/// An entry in the append-only shared chronicle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ChronicleEntry {
    /// A dice roll made visible to the table.
    Roll(RollAnnouncement),
    /// A resolved prayer outcome.
    Effect(EffectCommand),
}

//! Outcome records and the instructions they carry
//!
//! These are the value objects a resolved prayer produces: the gain
//! instruction consumed by the external piety-application collaborator and
//! the damage instruction consumed by the external damage collaborator. The
//! engine itself never touches a hero's piety.

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{BaselineRoll, Decision, DiceFormula};

/// Resource category for gain instructions. Conduit piety rides the heroic
/// resource track.
pub const GAIN_CATEGORY_HEROIC: &str = "heroic";

/// A resource-gain instruction of the form `gain <amount> <category>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GainInstruction {
    pub amount: u8,
    pub category: String,
}

impl GainInstruction {
    pub fn heroic(amount: u8) -> Self {
        Self {
            amount,
            category: GAIN_CATEGORY_HEROIC.to_string(),
        }
    }

    /// Render the instruction for the shared chronicle.
    pub fn render(&self) -> String {
        format!("gain {} {}", self.amount, self.category)
    }
}

/// Damage type carried by a damage instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DamageType {
    Psychic,
}

impl std::fmt::Display for DamageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DamageType::Psychic => write!(f, "psychic"),
        }
    }
}

/// A damage instruction of the form `damage <dice> <type> [unblockable]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageInstruction {
    pub dice: DiceFormula,
    pub damage_type: DamageType,
    pub unblockable: bool,
}

impl DamageInstruction {
    /// The backlash a Conduit suffers when the gods are angered:
    /// `1d6 + level` psychic, unblockable.
    pub fn psychic_backlash(level: u8) -> Self {
        Self {
            dice: DiceFormula::new(1, 6).with_modifier(i32::from(level)),
            damage_type: DamageType::Psychic,
            unblockable: true,
        }
    }

    /// Render the instruction for the shared chronicle.
    pub fn render(&self) -> String {
        if self.unblockable {
            format!("damage {} {} unblockable", self.dice, self.damage_type)
        } else {
            format!("damage {} {}", self.dice, self.damage_type)
        }
    }
}

/// Narrative label attached to a resolved prayer outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutcomeLabel {
    Declined,
    GodsAngered,
    DivineGrace,
    DivineFavor,
}

impl OutcomeLabel {
    pub fn display_name(&self) -> &'static str {
        match self {
            OutcomeLabel::Declined => "declined",
            OutcomeLabel::GodsAngered => "gods angered",
            OutcomeLabel::DivineGrace => "divine grace",
            OutcomeLabel::DivineFavor => "divine favor",
        }
    }

    /// Chronicle header line for this outcome.
    pub fn header(&self) -> &'static str {
        match self {
            OutcomeLabel::Declined => "Prayer Declined",
            OutcomeLabel::GodsAngered => "THE GODS ARE ANGERED!",
            OutcomeLabel::DivineGrace => "DIVINE GRACE",
            OutcomeLabel::DivineFavor => "DIVINE FAVOR!",
        }
    }
}

/// A fully resolved prayer outcome for one turn-start occurrence.
///
/// `total_gain` is always `baseline + bonus(decision, baseline)`; the bonus
/// comes from the outcome table and nowhere else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeRecord {
    pub baseline: BaselineRoll,
    pub decision: Decision,
    pub total_gain: u8,
    pub damage: Option<DamageInstruction>,
    pub boon_available: bool,
    pub label: OutcomeLabel,
}

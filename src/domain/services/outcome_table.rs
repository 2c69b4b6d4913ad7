//! The fixed prayer outcome table
//!
//! Single source of truth for the bonus amounts and side effects keyed by
//! (decision, baseline roll). Resolution code looks rows up here and never
//! recomputes them.

use crate::domain::value_objects::{BaselineRoll, Decision, OutcomeLabel};

/// One row of the outcome table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableRow {
    /// Piety gained on top of the baseline roll.
    pub bonus: u8,
    /// Whether the psychic backlash applies.
    pub inflicts_damage: bool,
    /// Whether the hero may activate one domain effect.
    pub boon_available: bool,
    pub label: OutcomeLabel,
}

/// Look up the outcome row for a decision and baseline roll.
///
/// Declining always yields the bare baseline. Praying maps the baseline
/// through the fixed table: 1 angers the gods, 2 is safe grace, 3 is favor
/// with a domain-effect choice.
pub fn lookup(decision: Decision, baseline: BaselineRoll) -> TableRow {
    match decision {
        Decision::Skip => TableRow {
            bonus: 0,
            inflicts_damage: false,
            boon_available: false,
            label: OutcomeLabel::Declined,
        },
        Decision::Pray => match baseline.value() {
            1 => TableRow {
                bonus: 1,
                inflicts_damage: true,
                boon_available: false,
                label: OutcomeLabel::GodsAngered,
            },
            2 => TableRow {
                bonus: 1,
                inflicts_damage: false,
                boon_available: false,
                label: OutcomeLabel::DivineGrace,
            },
            _ => TableRow {
                bonus: 2,
                inflicts_damage: false,
                boon_available: true,
                label: OutcomeLabel::DivineFavor,
            },
        },
    }
}

//! Outcome resolution - baseline roll plus the prayer table
//!
//! Draws the baseline d3 through the injected randomizer, surfaces the roll
//! to the chronicle BEFORE the table lookup (display-before-decide: the
//! table sees the roll, never the other way around), and composes the final
//! outcome record.

use std::sync::Arc;

use crate::application::ports::outbound::{ChroniclePort, RandomizerPort};
use crate::domain::entities::Hero;
use crate::domain::events::{ChronicleEntry, RollAnnouncement};
use crate::domain::services::outcome_table;
use crate::domain::value_objects::{
    BaselineRoll, DamageInstruction, Decision, OutcomeRecord,
};

/// Resolves a decision into an outcome record.
pub struct OutcomeResolver {
    dice: Arc<dyn RandomizerPort>,
    chronicle: Arc<dyn ChroniclePort>,
}

impl OutcomeResolver {
    pub fn new(dice: Arc<dyn RandomizerPort>, chronicle: Arc<dyn ChroniclePort>) -> Self {
        Self { dice, chronicle }
    }

    /// Draw one fresh baseline roll and apply the outcome table.
    ///
    /// Exactly one baseline is drawn per call, regardless of the decision.
    pub fn resolve(&self, hero: &Hero, decision: Decision) -> OutcomeRecord {
        let baseline = BaselineRoll::from_die(self.dice.roll_uniform(BaselineRoll::MAX));

        let flavor = match decision {
            Decision::Pray => format!("{} - Baseline Piety Roll", hero.name),
            Decision::Skip => format!("{} - Piety Gain (No Prayer)", hero.name),
        };
        self.chronicle.append(ChronicleEntry::Roll(RollAnnouncement {
            hero_name: hero.name.clone(),
            roll: baseline.value(),
            flavor,
        }));

        let row = outcome_table::lookup(decision, baseline);
        let damage = row
            .inflicts_damage
            .then(|| DamageInstruction::psychic_backlash(hero.level));

        tracing::debug!(
            hero = %hero.name,
            baseline = baseline.value(),
            label = row.label.display_name(),
            "Resolved prayer outcome"
        );

        OutcomeRecord {
            baseline,
            decision,
            total_gain: baseline.value() + row.bonus,
            damage,
            boon_available: row.boon_available,
            label: row.label,
        }
    }
}

//! Effect emission - publishing the resolved outcome to the chronicle
//!
//! Renders the outcome record into one immutable EffectCommand and appends
//! it once. Called at most once per occurrence by construction of the
//! interceptor and router; the emitter itself performs no deduplication.

use std::sync::Arc;

use chrono::Utc;

use crate::application::ports::outbound::ChroniclePort;
use crate::domain::entities::Hero;
use crate::domain::events::{ChronicleEntry, EffectCommand};
use crate::domain::value_objects::{GainInstruction, OutcomeLabel, OutcomeRecord};

/// Publishes resolved outcomes to the shared chronicle.
pub struct EffectEmitter {
    chronicle: Arc<dyn ChroniclePort>,
}

impl EffectEmitter {
    pub fn new(chronicle: Arc<dyn ChroniclePort>) -> Self {
        Self { chronicle }
    }

    /// Build and append the effect command for a resolved occurrence.
    pub fn emit(&self, hero: &Hero, outcome: &OutcomeRecord) -> EffectCommand {
        let command = EffectCommand {
            hero_id: hero.id,
            hero_name: hero.name.clone(),
            label: outcome.label,
            narrative: render_narrative(hero, outcome),
            gain: GainInstruction::heroic(outcome.total_gain),
            damage: outcome.damage.clone(),
            boon_available: outcome.boon_available,
            issued_at: Utc::now(),
        };

        tracing::info!(
            hero = %hero.name,
            label = outcome.label.display_name(),
            gain = outcome.total_gain,
            "Emitting prayer effect"
        );
        self.chronicle.append(ChronicleEntry::Effect(command.clone()));
        command
    }
}

/// Render the human-readable chronicle text for an outcome.
fn render_narrative(hero: &Hero, outcome: &OutcomeRecord) -> String {
    let mut lines = vec![outcome.label.header().to_string()];

    match outcome.label {
        OutcomeLabel::Declined => {
            lines.push(format!(
                "{} declines to pray and gains {} Piety.",
                hero.name, outcome.total_gain
            ));
        }
        _ => {
            lines.push(format!("Prayer Roll: {}", outcome.baseline));
            lines.push(format!("Total Piety Gain: +{}", outcome.total_gain));
            if let Some(damage) = &outcome.damage {
                lines.push(format!("Psychic Damage: {} (unblockable)", damage.dice));
            }
            if outcome.boon_available {
                lines.push("Domain Effect: Choose one to activate!".to_string());
            }
        }
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::CONDUIT_CLASS;
    use crate::domain::value_objects::{BaselineRoll, DamageInstruction, Decision};
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingChronicle {
        entries: Mutex<Vec<ChronicleEntry>>,
    }

    impl ChroniclePort for RecordingChronicle {
        fn append(&self, entry: ChronicleEntry) {
            self.entries.lock().unwrap().push(entry);
        }
    }

    fn hero() -> Hero {
        Hero::new("Brother Aldric", 2, CONDUIT_CLASS)
    }

    fn angered_outcome() -> OutcomeRecord {
        OutcomeRecord {
            baseline: BaselineRoll::from_die(1),
            decision: Decision::Pray,
            total_gain: 2,
            damage: Some(DamageInstruction::psychic_backlash(2)),
            boon_available: false,
            label: OutcomeLabel::GodsAngered,
        }
    }

    #[test]
    fn test_emit_builds_gain_and_damage_instructions() {
        let chronicle = Arc::new(RecordingChronicle::default());
        let emitter = EffectEmitter::new(chronicle.clone());

        let command = emitter.emit(&hero(), &angered_outcome());

        assert_eq!(command.gain.render(), "gain 2 heroic");
        assert_eq!(
            command.damage.as_ref().map(|d| d.render()),
            Some("damage 1d6+2 psychic unblockable".to_string())
        );
        assert_eq!(chronicle.entries.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_narrative_for_angered_gods() {
        let emitter = EffectEmitter::new(Arc::new(RecordingChronicle::default()));
        let command = emitter.emit(&hero(), &angered_outcome());

        assert!(command.narrative.starts_with("THE GODS ARE ANGERED!"));
        assert!(command.narrative.contains("Prayer Roll: 1"));
        assert!(command.narrative.contains("Total Piety Gain: +2"));
        assert!(command.narrative.contains("Psychic Damage: 1d6+2"));
    }

    #[test]
    fn test_narrative_for_decline() {
        let emitter = EffectEmitter::new(Arc::new(RecordingChronicle::default()));
        let outcome = OutcomeRecord {
            baseline: BaselineRoll::from_die(2),
            decision: Decision::Skip,
            total_gain: 2,
            damage: None,
            boon_available: false,
            label: OutcomeLabel::Declined,
        };

        let command = emitter.emit(&hero(), &outcome);

        assert!(command.narrative.starts_with("Prayer Declined"));
        assert!(command
            .narrative
            .contains("Brother Aldric declines to pray and gains 2 Piety."));
        assert!(command.damage.is_none());
    }

    #[test]
    fn test_narrative_for_favor_mentions_domain_effect() {
        let emitter = EffectEmitter::new(Arc::new(RecordingChronicle::default()));
        let outcome = OutcomeRecord {
            baseline: BaselineRoll::from_die(3),
            decision: Decision::Pray,
            total_gain: 5,
            damage: None,
            boon_available: true,
            label: OutcomeLabel::DivineFavor,
        };

        let command = emitter.emit(&hero(), &outcome);
        assert!(command.narrative.contains("Domain Effect: Choose one to activate!"));
        assert!(command.boon_available);
    }
}

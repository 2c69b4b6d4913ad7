//! Decision prompt port - the user-facing prayer gate

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::entities::Hero;
use crate::domain::value_objects::{HeroId, PromptChoice};

/// Error raised while presenting the prompt.
///
/// A presentation failure is NOT a decision: callers abort the occurrence
/// without emitting anything, rather than quietly treating the error as a
/// decline. Dismissal, in contrast, arrives as `PromptChoice::Dismissed`.
#[derive(Debug, Error)]
pub enum PromptError {
    #[error("Prompt presentation failed: {0}")]
    Presentation(String),
}

/// Everything the prompt surface needs to pose the prayer question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrayerPromptRequest {
    pub hero_id: HeroId,
    pub hero_name: String,
    pub hero_level: u8,
}

impl PrayerPromptRequest {
    /// Label for the risk-bearing action.
    pub const ACTION_PRAY: &'static str = "Pray to the Gods";
    /// Label for the safe action.
    pub const ACTION_SKIP: &'static str = "Decline Prayer";

    pub fn for_hero(hero: &Hero) -> Self {
        Self {
            hero_id: hero.id,
            hero_name: hero.name.clone(),
            hero_level: hero.level,
        }
    }

    pub fn title(&self) -> String {
        format!("{} - Prayer?", self.hero_name)
    }

    /// The question and the stakes of the three prayer outcomes.
    pub fn body(&self) -> String {
        format!(
            "{name}, it's the start of your turn.\n\
             Will you PRAY to the gods before rolling for piety?\n\
             \n\
             If you pray (d3 roll determines prayer effects):\n\
             - Roll 1: +1 additional piety + 1d6+{level} psychic damage (unblockable)\n\
             - Roll 2: +1 additional piety (safe)\n\
             - Roll 3: +2 additional piety + activate one domain effect\n\
             \n\
             You'll roll 1d3 for baseline piety either way. Prayer adds to that result.",
            name = self.hero_name,
            level = self.hero_level,
        )
    }

    /// The pre-selected action. The prompt still waits for explicit input;
    /// there is no timeout that silently takes the default.
    pub fn default_choice(&self) -> PromptChoice {
        PromptChoice::Pray
    }
}

/// Outbound port for the blocking prayer prompt.
///
/// The call suspends until the user picks an action or dismisses the
/// prompt; there is no programmatic cancellation once it is shown.
#[async_trait]
pub trait PromptPort: Send + Sync {
    async fn prompt(&self, request: PrayerPromptRequest) -> Result<PromptChoice, PromptError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::CONDUIT_CLASS;

    #[test]
    fn test_body_scales_stakes_with_level() {
        let hero = Hero::new("Brother Aldric", 4, CONDUIT_CLASS);
        let request = PrayerPromptRequest::for_hero(&hero);

        let body = request.body();
        assert!(body.contains("1d6+4 psychic damage"));
        assert!(body.contains("Brother Aldric"));
    }

    #[test]
    fn test_default_selection_is_pray() {
        let hero = Hero::new("Brother Aldric", 1, CONDUIT_CLASS);
        let request = PrayerPromptRequest::for_hero(&hero);
        assert_eq!(request.default_choice(), PromptChoice::Pray);
    }
}

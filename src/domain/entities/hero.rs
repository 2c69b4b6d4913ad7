//! Hero entity - the in-session characters whose turns the engine intercepts

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{DiceFormula, HeroId};

/// Class identifier for the Conduit, the one class whose turn-start piety
/// gain is replaced by the prayer flow.
pub const CONDUIT_CLASS: &str = "conduit";

/// A hero in the session.
///
/// `piety` is owned by the external gain-application collaborator; this
/// engine reads it for display at most and never writes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hero {
    pub id: HeroId,
    pub name: String,
    /// Hero level, used to scale the psychic backlash.
    pub level: u8,
    /// Class identifier, e.g. `"conduit"` or `"tactician"`.
    pub class_id: String,
    /// Current piety. Mutated only by the gain collaborator.
    pub piety: i32,
    /// The passive per-turn gain formula this engine suppresses and replaces.
    /// Heroes without one keep their default turn-start behavior.
    pub turn_gain: Option<DiceFormula>,
}

impl Hero {
    pub fn new(name: impl Into<String>, level: u8, class_id: impl Into<String>) -> Self {
        Self {
            id: HeroId::new(),
            name: name.into(),
            level,
            class_id: class_id.into(),
            piety: 0,
            turn_gain: None,
        }
    }

    pub fn with_turn_gain(mut self, formula: DiceFormula) -> Self {
        self.turn_gain = Some(formula);
        self
    }

    /// Whether this hero belongs to the qualifying class.
    pub fn is_conduit(&self) -> bool {
        self.class_id == CONDUIT_CLASS
    }
}

/// The session's in-play heroes, keyed by id.
///
/// Like the roster, this is shared session state owned by the host and
/// passed into every operation explicitly.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HeroRegistry {
    heroes: HashMap<HeroId, Hero>,
}

impl HeroRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, hero: Hero) {
        self.heroes.insert(hero.id, hero);
    }

    pub fn get(&self, id: HeroId) -> Option<&Hero> {
        self.heroes.get(&id)
    }

    pub fn remove(&mut self, id: HeroId) -> Option<Hero> {
        self.heroes.remove(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Hero> {
        self.heroes.values()
    }

    pub fn len(&self) -> usize {
        self.heroes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heroes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conduit_detection() {
        let conduit = Hero::new("Brother Aldric", 3, CONDUIT_CLASS);
        let tactician = Hero::new("Vara", 3, "tactician");

        assert!(conduit.is_conduit());
        assert!(!tactician.is_conduit());
    }

    #[test]
    fn test_registry_lookup() {
        let mut registry = HeroRegistry::new();
        let hero = Hero::new("Brother Aldric", 1, CONDUIT_CLASS);
        let id = hero.id;
        registry.insert(hero);

        assert_eq!(registry.get(id).map(|h| h.name.as_str()), Some("Brother Aldric"));
        assert!(registry.get(HeroId::new()).is_none());
    }
}

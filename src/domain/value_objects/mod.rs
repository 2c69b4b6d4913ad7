//! Value objects - Typed ids, decisions, dice notation, and outcome records

mod decision;
mod dice;
mod ids;
mod outcome;

pub use decision::{BaselineRoll, Decision, PromptChoice};
pub use dice::{DiceError, DiceFormula};
pub use ids::{HeroId, OccurrenceId, SessionId, UserId};
pub use outcome::{
    DamageInstruction, DamageType, GainInstruction, OutcomeLabel, OutcomeRecord,
    GAIN_CATEGORY_HEROIC,
};

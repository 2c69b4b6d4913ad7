//! The prayer decision and the baseline piety roll

use serde::{Deserialize, Serialize};

/// The player's risk choice at the start of a Conduit's turn.
///
/// There is no third state: a prompt that is dismissed without an explicit
/// choice normalizes to `Skip` before it reaches any resolution code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision {
    /// Pray to the gods before rolling for piety.
    Pray,
    /// Take the baseline piety roll and nothing else.
    Skip,
}

/// Raw result of presenting the prayer prompt, before normalization.
///
/// `Dismissed` is a real answer (the dialog was closed without picking a
/// button), distinct from a presentation error, which surfaces as an `Err`
/// at the prompt boundary instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptChoice {
    Pray,
    Skip,
    Dismissed,
}

impl PromptChoice {
    /// Collapse the prompt result into a `Decision`.
    ///
    /// Dismissal counts as declining, deterministically.
    pub fn normalize(self) -> Decision {
        match self {
            PromptChoice::Pray => Decision::Pray,
            PromptChoice::Skip | PromptChoice::Dismissed => Decision::Skip,
        }
    }
}

/// A baseline piety roll: a uniform d3 drawn once per turn-start occurrence,
/// independent of the decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaselineRoll(u8);

impl BaselineRoll {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 3;

    /// Build from a raw die result. Out-of-band values can only come from a
    /// misbehaving roller, so they are clamped into the valid band rather
    /// than turned into an error the flow cannot act on.
    pub fn from_die(value: u8) -> Self {
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl std::fmt::Display for BaselineRoll {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

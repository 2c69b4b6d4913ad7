//! Dice formula notation (`XdY+Z`)
//!
//! The engine never evaluates these itself: the turn-gain formula is only
//! checked for presence, and damage formulas travel to the external damage
//! collaborator as text. Parsing exists so malformed formulas are rejected at
//! the edge instead of inside a resolution flow.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error type for dice formula parsing.
#[derive(Debug, Error)]
pub enum DiceError {
    #[error("Invalid dice notation: {0}")]
    InvalidNotation(String),
    #[error("Dice count must be at least 1")]
    ZeroCount,
    #[error("Die size must be at least 2, got {0}")]
    InvalidDieSize(u32),
}

/// A single-component dice formula such as `1d3` or `1d6+4`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceFormula {
    pub count: u32,
    pub sides: u32,
    pub modifier: i32,
}

impl DiceFormula {
    pub fn new(count: u32, sides: u32) -> Self {
        Self {
            count,
            sides,
            modifier: 0,
        }
    }

    pub fn with_modifier(mut self, modifier: i32) -> Self {
        self.modifier = modifier;
        self
    }

    /// Parse dice notation of the form `XdY`, `XdY+Z`, or `XdY-Z`.
    pub fn parse(notation: &str) -> Result<Self, DiceError> {
        let notation = notation.trim().to_lowercase();
        let d_pos = notation
            .find('d')
            .ok_or_else(|| DiceError::InvalidNotation(notation.clone()))?;

        let count_str = &notation[..d_pos];
        let rest = &notation[d_pos + 1..];

        let count: u32 = if count_str.is_empty() {
            1
        } else {
            count_str
                .parse()
                .map_err(|_| DiceError::InvalidNotation(notation.clone()))?
        };
        if count == 0 {
            return Err(DiceError::ZeroCount);
        }

        let (sides_str, modifier) = if let Some(plus_pos) = rest.find('+') {
            let modifier: i32 = rest[plus_pos + 1..]
                .trim()
                .parse()
                .map_err(|_| DiceError::InvalidNotation(notation.clone()))?;
            (&rest[..plus_pos], modifier)
        } else if let Some(minus_pos) = rest.find('-') {
            let modifier: i32 = rest[minus_pos + 1..]
                .trim()
                .parse()
                .map_err(|_| DiceError::InvalidNotation(notation.clone()))?;
            (&rest[..minus_pos], -modifier)
        } else {
            (rest, 0)
        };

        let sides: u32 = sides_str
            .trim()
            .parse()
            .map_err(|_| DiceError::InvalidNotation(notation.clone()))?;
        if sides < 2 {
            return Err(DiceError::InvalidDieSize(sides));
        }

        Ok(Self {
            count,
            sides,
            modifier,
        })
    }
}

impl FromStr for DiceFormula {
    type Err = DiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DiceFormula::parse(s)
    }
}

impl fmt::Display for DiceFormula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d{}", self.count, self.sides)?;
        if self.modifier > 0 {
            write!(f, "+{}", self.modifier)?;
        } else if self.modifier < 0 {
            write!(f, "-{}", self.modifier.abs())?;
        }
        Ok(())
    }
}

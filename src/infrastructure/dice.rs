//! Thread-local RNG adapter for the randomizer port

use rand::Rng;

use crate::application::ports::outbound::RandomizerPort;

/// Uniform dice trials backed by `rand::thread_rng`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRngDice;

impl RandomizerPort for ThreadRngDice {
    fn roll_uniform(&self, sides: u8) -> u8 {
        rand::thread_rng().gen_range(1..=sides.max(1))
    }
}

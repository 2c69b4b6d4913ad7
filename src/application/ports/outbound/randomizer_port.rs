//! Randomizer port - injectable uniform trials

/// Outbound port for uniform dice trials.
///
/// Implementations return a value in `1..=sides`. Injecting this instead of
/// reaching for a process-wide RNG lets tests script exact roll sequences.
pub trait RandomizerPort: Send + Sync {
    fn roll_uniform(&self, sides: u8) -> u8;
}

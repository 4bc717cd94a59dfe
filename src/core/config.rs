//! Engine configuration with documented constants
//!
//! All tunables are collected here with explanations of their purpose
//! and how they interact with each other.

/// Configuration for the battle engine
///
/// These values have been tuned to reproduce the reference pacing.
/// Changing them affects charge speed and telegraph timing feel.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Simulation ticks per second
    ///
    /// The gauge formula is expressed in frames, so this value scales every
    /// per-tick increment. Callers are still expected to pass the matching
    /// `dt` (usually `1.0 / tick_rate`) into `BattleState::tick`.
    pub tick_rate: f32,

    /// Seed for the battle's ChaCha RNG
    ///
    /// All randomness (target sampling, variance draws, chance-based effect
    /// expiry, weighted action selection) routes through this one stream,
    /// so a fixed seed replays a battle exactly.
    pub seed: u64,

    /// Divisor applied to adversary gauge fill while a cooldown is burning
    ///
    /// At the default (10.0) an adversary on cooldown charges at one tenth
    /// of its normal rate until the cooldown runs out.
    pub cooldown_fill_divisor: f32,

    /// Relaxation steps applied to display HP/mana per tick
    ///
    /// More steps make the displayed bar chase the authoritative value
    /// faster. Purely cosmetic; never feeds back into combat math.
    pub display_smoothing_steps: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_rate: 60.0,
            seed: 0,
            cooldown_fill_divisor: 10.0,
            display_smoothing_steps: 5,
        }
    }
}

impl EngineConfig {
    /// Seconds advanced by one tick at the configured rate
    pub fn tick_dt(&self) -> f32 {
        1.0 / self.tick_rate
    }
}

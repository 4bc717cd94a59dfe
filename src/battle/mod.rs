//! Real-time battle system - action gauges, telegraphed attacks, and a
//! floored multiplicative damage pipeline
//!
//! Players stand on a 4x4 field and adversaries face them from fixed
//! ranks. Everything runs off one fixed-step tick: gauges charge, queued
//! telegraphs burn down, effects pulse, and passives fire, all through a
//! single seeded RNG stream so battles replay exactly.

pub mod actions;
pub mod behavior;
pub mod command;
pub mod constants;
pub mod damage;
pub mod effect;
pub mod events;
pub mod gauge;
pub mod movement;
pub mod passive;
pub mod queue;
pub mod state;
pub mod unit;

// Re-exports for convenient access
pub use actions::{ActionKind, WeightedAction};
pub use command::{Command, ItemKind};
pub use constants::*;
pub use damage::{
    adversary_row_modifier, casting_efficiency, player_row_modifier, resolve_magical,
    resolve_physical, CastingCost, MagicalStrike, PhysicalStrike,
};
pub use effect::{EffectKind, Lifetime, StatusEffect};
pub use events::{CombatEvent, UnitId};
pub use passive::{MoltStats, Passive, PassiveKind};
pub use queue::{QueuedAttack, StrikeKind};
pub use state::{BattleOutcome, BattleState, TelegraphView, UnitView};
pub use unit::{
    Adversary, AdversaryDefinition, Capabilities, GuardState, ManaDefinition, ManaPool,
    PlayerDefinition, PlayerUnit, Unit,
};

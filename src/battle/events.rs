//! Combat events emitted by `BattleState::tick`
//!
//! Events are the engine's only outward channel: rendering, sound, and
//! logging all hang off this stream instead of poking at internal state.

use serde::Serialize;

use crate::battle::command::ItemKind;
use crate::core::types::{AdversaryId, Cell, PlayerId};

/// Either side of an exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UnitId {
    Player(PlayerId),
    Adversary(AdversaryId),
}

#[derive(Debug, Clone, Serialize)]
pub enum CombatEvent {
    /// A unit's gauge reached full this tick
    GaugeReady { unit: UnitId },
    /// A player command took effect (instant, or a charge that finished)
    CommandExecuted { player: PlayerId, command: String },
    /// A player command with a charge delay started counting down
    ChargeStarted { player: PlayerId, command: String },
    /// A strike connected; `delta` is the signed HP change (negative on hit)
    StrikeLanded {
        attacker: UnitId,
        target: UnitId,
        delta: i64,
    },
    /// A strike found no target at all
    StrikeMissed { attacker: UnitId },
    /// An adversary committed to an action; its telegraphs are now queued
    AdversaryActed {
        adversary: AdversaryId,
        action: String,
    },
    /// A queued telegraph became visible on its cell
    TelegraphRevealed { adversary: AdversaryId, cell: Cell },
    /// A status effect was attached to a unit
    EffectApplied { target: UnitId, effect: String },
    /// A periodic effect fired; `delta` is the HP change it caused
    EffectTicked {
        target: UnitId,
        effect: String,
        delta: i64,
    },
    /// A status effect ran out or was shaken off
    EffectExpired { target: UnitId, effect: String },
    /// A consumable was used
    ItemUsed { player: PlayerId, kind: ItemKind },
    UnitDied { unit: UnitId },
    /// A revival passive brought an adversary back
    UnitRevived { adversary: AdversaryId },
}

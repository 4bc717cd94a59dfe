//! Player command definitions
//!
//! Commands are data, defined per character and submitted by index once the
//! unit's gauge is full. Mana costs for casts are a percent-of-remaining
//! component plus a flat component.

use serde::{Deserialize, Serialize};

use crate::battle::effect::StatusEffect;
use crate::element::Element;

/// Consumable kinds usable through an item command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemKind {
    /// Restores a flat amount of HP
    Potion,
    /// Restores a flat amount of mana
    ManaPotion,
    /// Grants a timed speed-up to gauge fill
    FalconFeather,
}

/// One entry in a player's command list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Command {
    /// Physical strike against the targeted adversary
    Attack {
        name: String,
        power: i64,
        element: Element,
        /// Seconds of charge before the strike lands
        charge_delay: f32,
        /// Effects copied onto every adversary the strike connects with
        effects: Vec<StatusEffect>,
    },
    /// Raise a guard that persists until the gauge next refills
    Defend {
        name: String,
        /// Percent of incoming damage shaved off
        reduce_percent: f32,
        /// Flat damage shaved after the percent cut
        reduce_const: f32,
        /// Movement speed while guarding, percent of normal
        speed_modifier: f32,
    },
    /// Spell against the targeted adversary, paid from mana
    Magic {
        name: String,
        power: i64,
        element: Element,
        /// Percent of remaining mana consumed
        mp_percent: f32,
        /// Flat mana consumed on top
        mp_const: f32,
        charge_delay: f32,
        /// Effects copied onto every adversary the strike connects with
        effects: Vec<StatusEffect>,
    },
    /// Use a consumable on self
    Item { name: String, kind: ItemKind },
}

impl Command {
    pub fn name(&self) -> &str {
        match self {
            Command::Attack { name, .. }
            | Command::Defend { name, .. }
            | Command::Magic { name, .. }
            | Command::Item { name, .. } => name,
        }
    }

    /// Mana cost of this command given the caster's remaining mana
    pub fn mana_cost(&self, left_mana: f32) -> f32 {
        match self {
            Command::Magic {
                mp_percent,
                mp_const,
                ..
            } => left_mana * mp_percent / 100.0 + mp_const,
            _ => 0.0,
        }
    }

    /// Charge time before the command takes effect, zero for instants
    pub fn charge_delay(&self) -> f32 {
        match self {
            Command::Attack { charge_delay, .. } | Command::Magic { charge_delay, .. } => {
                *charge_delay
            }
            _ => 0.0,
        }
    }
}

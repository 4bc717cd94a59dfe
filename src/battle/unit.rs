//! Unit records shared by players and adversaries
//!
//! A `Unit` holds everything both sides have in common: stats, resource
//! pools, the action gauge, capability flags, and the active effect list.
//! `PlayerUnit` and `Adversary` wrap it with their side-specific state.

use serde::{Deserialize, Serialize};

use crate::battle::actions::WeightedAction;
use crate::battle::command::Command;
use crate::battle::constants::GAUGE_MAX;
use crate::battle::effect::StatusEffect;
use crate::battle::passive::Passive;
use crate::battle::queue::QueuedAttack;
use crate::core::types::{AdversaryRow, Cell, Role};
use crate::element::Element;

/// Capability flags a status effect may suspend and later restore
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Capabilities {
    pub can_move: bool,
    pub can_act: bool,
    pub can_attack: bool,
    pub can_defend: bool,
    pub can_cast: bool,
    pub can_use_item: bool,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            can_move: true,
            can_act: true,
            can_attack: true,
            can_defend: true,
            can_cast: true,
            can_use_item: true,
        }
    }
}

/// Mana pool with authoritative and displayed values
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManaPool {
    pub max: f32,
    pub left: f32,
    pub disp: f32,
    /// Regeneration per second
    pub recover: f32,
    /// Efficiency stat feeding the casting falloff model
    pub efficiency: f32,
}

impl ManaPool {
    pub fn new(max: f32, recover: f32, efficiency: f32) -> Self {
        Self {
            max,
            left: max,
            disp: max,
            recover,
            efficiency,
        }
    }

    /// Regenerate toward max; overflow clamps
    pub fn regenerate(&mut self, dt: f32) {
        if self.recover > 0.0 {
            self.left = (self.left + self.recover * dt).min(self.max);
        }
    }

    pub fn spend(&mut self, amount: f32) {
        self.left = (self.left - amount).max(0.0);
    }

    pub fn restore(&mut self, amount: f32) {
        self.left = (self.left + amount).min(self.max);
    }
}

/// Active defensive stance parameters
///
/// Set by a defend command, dropped again the next time the unit's gauge
/// refills.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GuardState {
    pub active: bool,
    pub reduce_percent: f32,
    pub reduce_const: f32,
    /// Movement speed while guarding, percent of normal
    pub speed_modifier: f32,
}

impl Default for GuardState {
    fn default() -> Self {
        Self {
            active: false,
            reduce_percent: 0.0,
            reduce_const: 0.0,
            speed_modifier: 100.0,
        }
    }
}

impl GuardState {
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Stat/resource/effect record shared by both sides
#[derive(Debug, Clone)]
pub struct Unit {
    pub name: String,
    pub role: Role,
    pub max_hp: f32,
    /// Authoritative HP
    pub left_hp: f32,
    /// Smoothed HP for display only
    pub disp_hp: f32,
    pub attack: i64,
    pub defense: i64,
    pub guard: GuardState,
    pub mana: ManaPool,
    /// Gauge fill stat (higher charges faster)
    pub intellect: i64,
    pub gauge: f32,
    /// Multiplier on gauge fill from haste-style buffs
    pub gauge_rate_factor: f32,
    pub alive: bool,
    pub caps: Capabilities,
    pub elements: Vec<Element>,
    pub effects: Vec<StatusEffect>,
}

impl Unit {
    pub fn gauge_ready(&self) -> bool {
        self.gauge >= GAUGE_MAX
    }

    pub fn reset_gauge(&mut self) {
        self.gauge = 0.0;
    }

    /// Apply a signed HP delta, clamping heal overflow at max
    ///
    /// HP may go to zero or below here; the death sweep at the end of the
    /// tick is what flips `alive`.
    pub fn apply_hp_delta(&mut self, delta: i64) {
        self.left_hp += delta as f32;
        if self.left_hp > self.max_hp {
            self.left_hp = self.max_hp;
        }
    }

    pub fn has_element(&self, element: Element) -> bool {
        self.elements.contains(&element)
    }
}

/// A command the player has started charging
#[derive(Debug, Clone, Copy)]
pub struct ChargingCommand {
    pub command_index: usize,
    pub remaining: f32,
}

/// A player-controlled unit
#[derive(Debug, Clone)]
pub struct PlayerUnit {
    pub unit: Unit,
    /// Movement speed stat
    pub speed: i64,
    /// Gauge fill while moving, percent of normal
    pub move_gauge_modifier: f32,
    pub commands: Vec<Command>,
    /// Continuous position on the field; the occupied cell is the rounded
    /// coordinate pair
    pub position: (f32, f32),
    /// Queued waypoints; the unit is "moving" while two or more remain
    pub route: Vec<Cell>,
    pub charging: Option<ChargingCommand>,
}

impl PlayerUnit {
    /// Cell currently occupied, for hit tests
    pub fn cell(&self) -> Cell {
        Cell::new(
            self.position.0.round().clamp(0.0, 3.0) as u8,
            self.position.1.round().clamp(0.0, 3.0) as u8,
        )
    }

    /// Front-to-back row used by the positional damage modifier
    pub fn row(&self) -> f64 {
        f64::from(self.position.1)
    }

    pub fn is_moving(&self) -> bool {
        self.route.len() >= 2
    }
}

/// An AI-controlled adversary
#[derive(Debug, Clone)]
pub struct Adversary {
    pub unit: Unit,
    pub row: AdversaryRow,
    /// Player-field columns this adversary can be hit from
    pub hit_cells: Vec<u8>,
    pub queue: Vec<QueuedAttack>,
    pub actions: Vec<WeightedAction>,
    /// Post-action cooldown in seconds; slows gauge fill while positive
    pub cooldown: f32,
    pub passives: Vec<Passive>,
}

// ---------------------------------------------------------------------------
// Externally supplied definitions (parsed by the data provider, consumed here)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManaDefinition {
    pub max: f32,
    pub recover: f32,
    pub efficiency: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerDefinition {
    pub name: String,
    pub hp: f32,
    pub attack: i64,
    pub defense: i64,
    pub mana: ManaDefinition,
    pub speed: i64,
    pub intellect: i64,
    /// Gauge fill while moving, percent of normal
    pub move_gauge_modifier: f32,
    pub elements: Vec<Element>,
    pub commands: Vec<Command>,
    /// Starting cell
    pub start: Cell,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdversaryDefinition {
    pub name: String,
    pub hp: f32,
    pub attack: i64,
    pub defense: i64,
    pub mana: ManaDefinition,
    pub intellect: i64,
    pub row: AdversaryRow,
    pub hit_cells: Vec<u8>,
    pub elements: Vec<Element>,
    pub passives: Vec<crate::battle::passive::PassiveKind>,
    pub actions: Vec<WeightedAction>,
}

impl PlayerUnit {
    pub fn from_definition(def: &PlayerDefinition) -> Self {
        Self {
            unit: Unit {
                name: def.name.clone(),
                role: Role::Player,
                max_hp: def.hp,
                left_hp: def.hp,
                disp_hp: def.hp,
                attack: def.attack,
                defense: def.defense,
                guard: GuardState::default(),
                mana: ManaPool::new(def.mana.max, def.mana.recover, def.mana.efficiency),
                intellect: def.intellect,
                gauge: 0.0,
                gauge_rate_factor: 1.0,
                alive: true,
                caps: Capabilities::default(),
                elements: def.elements.clone(),
                effects: Vec::new(),
            },
            speed: def.speed,
            move_gauge_modifier: def.move_gauge_modifier,
            commands: def.commands.clone(),
            position: (f32::from(def.start.x), f32::from(def.start.y)),
            route: Vec::new(),
            charging: None,
        }
    }
}

impl Adversary {
    pub fn from_definition(def: &AdversaryDefinition) -> Self {
        Self {
            unit: Unit {
                name: def.name.clone(),
                role: Role::Adversary,
                max_hp: def.hp,
                left_hp: def.hp,
                disp_hp: def.hp,
                attack: def.attack,
                defense: def.defense,
                guard: GuardState::default(),
                mana: ManaPool::new(def.mana.max, def.mana.recover, def.mana.efficiency),
                intellect: def.intellect,
                gauge: 0.0,
                gauge_rate_factor: 1.0,
                alive: true,
                caps: Capabilities::default(),
                elements: def.elements.clone(),
                effects: Vec::new(),
            },
            row: def.row,
            hit_cells: def.hit_cells.clone(),
            queue: Vec::new(),
            actions: def.actions.clone(),
            cooldown: 0.0,
            passives: def.passives.iter().cloned().map(Passive::new).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare_unit() -> Unit {
        Unit {
            name: "test".into(),
            role: Role::Player,
            max_hp: 100.0,
            left_hp: 100.0,
            disp_hp: 100.0,
            attack: 100,
            defense: 100,
            guard: GuardState::default(),
            mana: ManaPool::new(50.0, 0.0, 100.0),
            intellect: 100,
            gauge: 0.0,
            gauge_rate_factor: 1.0,
            alive: true,
            caps: Capabilities::default(),
            elements: vec![Element::Normal],
            effects: Vec::new(),
        }
    }

    #[test]
    fn test_heal_overflow_clamps_to_max() {
        let mut unit = bare_unit();
        unit.left_hp = 90.0;
        unit.apply_hp_delta(50);
        assert_eq!(unit.left_hp, 100.0);
    }

    #[test]
    fn test_damage_can_cross_zero() {
        let mut unit = bare_unit();
        unit.apply_hp_delta(-150);
        assert!(unit.left_hp <= 0.0);
    }

    #[test]
    fn test_mana_regen_clamps() {
        let mut pool = ManaPool::new(50.0, 10.0, 100.0);
        pool.left = 45.0;
        pool.regenerate(1.0);
        assert_eq!(pool.left, 50.0);
    }
}

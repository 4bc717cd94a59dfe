//! Damage resolution pipeline
//!
//! Damage is computed as a chain of multiplicative steps, each floored
//! before the next is applied, so rounding is part of the balance. The
//! functions here are pure: the variance roll is drawn by the caller and
//! passed in, which keeps every step reproducible in tests.
//!
//! Physical strikes apply positional modifiers on both ends and honor the
//! defender's guard; magical strikes ignore position and guard entirely
//! and instead pay a mana-efficiency toll on the caster's side.

use crate::battle::constants::{
    ROW_BACK_MULT, ROW_FRONT_MULT, ROW_MIDDLE_MULT, SAME_ELEMENT_BONUS,
};
use crate::battle::unit::GuardState;
use crate::core::types::AdversaryRow;
use crate::element::{matchup, Element};

/// Positional multiplier for a player at the given row depth
///
/// The front row (0) doubles damage dealt and received; each step back
/// decays geometrically, passing 1.0 at depth 1.5.
pub fn player_row_modifier(row: f64) -> f64 {
    2.0 * 0.5_f64.powf(row / 1.5)
}

/// Positional multiplier for an adversary in the given rank
pub fn adversary_row_modifier(row: AdversaryRow) -> f64 {
    match row {
        AdversaryRow::Front => ROW_FRONT_MULT,
        AdversaryRow::Middle => ROW_MIDDLE_MULT,
        AdversaryRow::Back => ROW_BACK_MULT,
    }
}

/// Casting falloff for a caster at `left_mana` of `max_mana` paying `cost`
///
/// Linear in the caster's mana fraction, anchored so a full pool yields
/// `efficiency`/100 and an empty pool yields (100-`efficiency`)/100. The
/// fraction is evaluated at the midpoint of the cast, after half the cost
/// is notionally paid.
pub fn casting_efficiency(efficiency: f32, left_mana: f32, max_mana: f32, cost: f32) -> f64 {
    let a = f64::from(2.0 * efficiency - 100.0) / 100.0;
    let b = f64::from(100.0 - efficiency);
    let midpoint_fraction = 100.0 * f64::from(left_mana - cost / 2.0) / f64::from(max_mana);

    (a * midpoint_fraction + b) / 100.0
}

/// A physical strike, fully described
#[derive(Debug, Clone)]
pub struct PhysicalStrike<'a> {
    pub attack: i64,
    pub defense: i64,
    pub power: i64,
    pub element: Element,
    pub attacker_elements: &'a [Element],
    /// Defender's stance, if one is raised
    pub guard: Option<GuardState>,
    /// Row depth of whichever side is the player in this exchange
    pub player_row: f64,
    /// Rank of whichever side is the adversary
    pub adversary_row: AdversaryRow,
}

/// A magical strike; offense and defense are both remaining mana
#[derive(Debug, Clone)]
pub struct MagicalStrike<'a> {
    pub attacker_mana: f32,
    pub defender_mana: f32,
    pub power: i64,
    pub element: Element,
    pub attacker_elements: &'a [Element],
    /// Caster-side falloff; adversary casts skip it
    pub efficiency: Option<CastingCost>,
}

#[derive(Debug, Clone, Copy)]
pub struct CastingCost {
    pub efficiency: f32,
    pub left_mana: f32,
    pub max_mana: f32,
    pub cost: f32,
}

fn base_damage(offense: f64, defense: f64) -> f64 {
    (22.0 * (offense + 20.0) / (defense + 20.0)).floor()
}

fn apply_power(damage: f64, power: i64) -> f64 {
    (damage * power as f64 / 50.0 + 5.0).floor()
}

fn apply_attunement(damage: f64, element: Element, attacker_elements: &[Element]) -> f64 {
    if attacker_elements.contains(&element) {
        (damage * SAME_ELEMENT_BONUS).floor()
    } else {
        damage
    }
}

/// Resolve a physical strike into a signed HP delta (negative on hit)
///
/// `variance` is the caller's roll in 85..=100.
pub fn resolve_physical(strike: &PhysicalStrike, defender_elements: &[Element], variance: u32) -> i64 {
    let mut damage = base_damage(strike.attack as f64, strike.defense as f64);

    if let Some(guard) = strike.guard.filter(|g| g.active) {
        damage = (damage * f64::from(100.0 - guard.reduce_percent) / 100.0
            - f64::from(guard.reduce_const))
        .floor();
    }

    damage = apply_power(damage, strike.power);
    damage = (damage * matchup(defender_elements, strike.element)).floor();
    damage = apply_attunement(damage, strike.element, strike.attacker_elements);
    damage = (damage * player_row_modifier(strike.player_row)).floor();
    damage = (damage * adversary_row_modifier(strike.adversary_row)).floor();
    damage = (damage * f64::from(variance) / 100.0).floor();

    -(damage as i64)
}

/// Resolve a magical strike into a signed HP delta (negative on hit)
pub fn resolve_magical(strike: &MagicalStrike, defender_elements: &[Element], variance: u32) -> i64 {
    let mut damage = base_damage(
        f64::from(strike.attacker_mana),
        f64::from(strike.defender_mana),
    );

    if let Some(cost) = strike.efficiency {
        damage = (damage
            * casting_efficiency(cost.efficiency, cost.left_mana, cost.max_mana, cost.cost))
        .floor();
    }

    damage = apply_power(damage, strike.power);
    damage = (damage * matchup(defender_elements, strike.element)).floor();
    damage = apply_attunement(damage, strike.element, strike.attacker_elements);
    damage = (damage * f64::from(variance) / 100.0).floor();

    -(damage as i64)
}

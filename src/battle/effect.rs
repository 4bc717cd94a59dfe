//! Status effect engine
//!
//! Effects live on the unit they afflict and are evaluated once per tick:
//! the handler for each effect runs first (seeing the lifetime as it stood
//! at the start of the tick), then timed lifetimes are aged, then expired
//! entries are removed back-to-front in one batch. Capability locks restore
//! their flag on the same tick the lifetime runs out.

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::battle::constants::{
    BURN_DAMAGE, BURN_DAMAGE_VULNERABLE, BURN_HEAL, BURN_PERIOD, CHILL_FRACTION, CHILL_PERIOD,
    FREEZE_PERIOD, SHAKE_OFF_CHANCE,
};
use crate::battle::events::{CombatEvent, UnitId};
use crate::battle::unit::Unit;
use crate::core::types::Role;
use crate::element::Element;

/// How long an effect persists
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum Lifetime {
    /// Expires after this many seconds
    Timed(f32),
    /// Persists until the effect clears itself (shake-off, immunity)
    UntilCleared,
}

/// Periodic damage with a fixed amount
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlipState {
    /// Seconds until the next pulse
    pub until_next: f32,
    pub period: f32,
    pub amount: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChillState {
    pub until_next: f32,
}

impl Default for ChillState {
    fn default() -> Self {
        Self {
            until_next: CHILL_PERIOD,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FreezeState {
    pub until_next: f32,
}

impl Default for FreezeState {
    fn default() -> Self {
        Self {
            until_next: FREEZE_PERIOD,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BurnState {
    pub until_next: f32,
}

impl Default for BurnState {
    fn default() -> Self {
        Self {
            until_next: BURN_PERIOD,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HasteState {
    pub factor: f32,
    /// Latch so the stat factor is applied exactly once
    pub applied: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EffectKind {
    /// Suspends movement while active
    MoveLock,
    /// Suspends command submission while active
    ActLock,
    Slip(SlipState),
    /// Periodic cold damage; heals ice-elementals, shaken off by chance,
    /// cannot take hold on fire-elementals
    Chill(ChillState),
    /// Locks movement and action; fire and ice elementals thaw instantly,
    /// otherwise each pulse rolls to break free
    Freeze(FreezeState),
    /// Fast periodic fire damage; heals fire-elementals, worse for ice
    /// and leaf
    Burn(BurnState),
    /// Multiplies gauge fill for the duration
    Haste(HasteState),
}

impl EffectKind {
    pub fn name(&self) -> &'static str {
        match self {
            EffectKind::MoveLock => "move_lock",
            EffectKind::ActLock => "act_lock",
            EffectKind::Slip(_) => "slip",
            EffectKind::Chill(_) => "chill",
            EffectKind::Freeze(_) => "freeze",
            EffectKind::Burn(_) => "burn",
            EffectKind::Haste(_) => "haste",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusEffect {
    pub kind: EffectKind,
    pub lifetime: Lifetime,
    /// Set by handlers that end their own effect early
    pub cleared: bool,
}

impl StatusEffect {
    pub fn new(kind: EffectKind, lifetime: Lifetime) -> Self {
        Self {
            kind,
            lifetime,
            cleared: false,
        }
    }

    pub fn timed(kind: EffectKind, seconds: f32) -> Self {
        Self::new(kind, Lifetime::Timed(seconds))
    }

    fn expired(&self) -> bool {
        self.cleared
            || match self.lifetime {
                Lifetime::Timed(left) => left <= 0.0,
                Lifetime::UntilCleared => false,
            }
    }
}

/// Advance `until_next` by `dt`; true when the cadence fires this tick
fn cadence_fires(until_next: &mut f32, period: f32, dt: f32) -> bool {
    if *until_next > 0.0 {
        *until_next -= dt;
        false
    } else {
        *until_next = period;
        true
    }
}

fn chill_amount(max_hp: f32) -> i64 {
    (max_hp * CHILL_FRACTION).floor() as i64
}

/// Evaluate every effect on one unit for one tick
///
/// HP changes land on the unit immediately; deaths are left for the sweep
/// at the end of the tick.
pub fn tick_effects(
    unit: &mut Unit,
    id: UnitId,
    rng: &mut ChaCha8Rng,
    dt: f32,
    events: &mut Vec<CombatEvent>,
) {
    let mut effects = std::mem::take(&mut unit.effects);

    for effect in effects.iter_mut() {
        if effect.expired() {
            continue;
        }

        match &mut effect.kind {
            EffectKind::MoveLock => {
                unit.caps.can_move = false;
            }
            EffectKind::ActLock => {
                unit.caps.can_act = false;
            }
            EffectKind::Slip(state) => {
                if cadence_fires(&mut state.until_next, state.period, dt) {
                    unit.apply_hp_delta(-state.amount);
                    // Floating damage is a player-side cue only
                    if matches!(unit.role, Role::Player) {
                        events.push(CombatEvent::EffectTicked {
                            target: id,
                            effect: "slip".into(),
                            delta: -state.amount,
                        });
                    }
                }
            }
            EffectKind::Chill(state) => {
                if unit.elements.contains(&Element::Fire) {
                    // Too warm for chill to stick
                    effect.cleared = true;
                } else if cadence_fires(&mut state.until_next, CHILL_PERIOD, dt) {
                    let delta = if unit.elements.contains(&Element::Ice) {
                        chill_amount(unit.max_hp)
                    } else {
                        -chill_amount(unit.max_hp)
                    };
                    unit.apply_hp_delta(delta);
                    events.push(CombatEvent::EffectTicked {
                        target: id,
                        effect: "chill".into(),
                        delta,
                    });
                    if rng.gen_bool(SHAKE_OFF_CHANCE) {
                        effect.cleared = true;
                    }
                }
            }
            EffectKind::Freeze(state) => {
                if unit.elements.contains(&Element::Fire) || unit.elements.contains(&Element::Ice)
                {
                    effect.cleared = true;
                } else {
                    unit.caps.can_move = false;
                    unit.caps.can_act = false;
                    if cadence_fires(&mut state.until_next, FREEZE_PERIOD, dt)
                        && rng.gen_bool(SHAKE_OFF_CHANCE)
                    {
                        effect.cleared = true;
                    }
                }
            }
            EffectKind::Burn(state) => {
                if cadence_fires(&mut state.until_next, BURN_PERIOD, dt) {
                    let delta = if unit.elements.contains(&Element::Fire) {
                        BURN_HEAL
                    } else if unit.elements.contains(&Element::Ice)
                        || unit.elements.contains(&Element::Leaf)
                    {
                        -BURN_DAMAGE_VULNERABLE
                    } else {
                        -BURN_DAMAGE
                    };
                    unit.apply_hp_delta(delta);
                    events.push(CombatEvent::EffectTicked {
                        target: id,
                        effect: "burn".into(),
                        delta,
                    });
                }
            }
            EffectKind::Haste(state) => {
                if !state.applied {
                    unit.gauge_rate_factor *= state.factor;
                    state.applied = true;
                }
            }
        }

        if let Lifetime::Timed(left) = &mut effect.lifetime {
            *left -= dt;
        }
    }

    // Collect expired entries, run their restore, then remove back-to-front
    let mut expired: Vec<usize> = effects
        .iter()
        .enumerate()
        .filter(|(_, e)| e.expired())
        .map(|(i, _)| i)
        .collect();
    expired.sort_unstable_by(|a, b| b.cmp(a));

    for index in expired {
        let effect = effects.remove(index);
        match &effect.kind {
            EffectKind::MoveLock => unit.caps.can_move = true,
            EffectKind::ActLock => unit.caps.can_act = true,
            EffectKind::Freeze(_) => {
                unit.caps.can_move = true;
                unit.caps.can_act = true;
            }
            EffectKind::Haste(state) => {
                if state.applied {
                    unit.gauge_rate_factor /= state.factor;
                }
            }
            _ => {}
        }
        events.push(CombatEvent::EffectExpired {
            target: id,
            effect: effect.kind.name().into(),
        });
    }

    unit.effects = effects;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    use crate::battle::unit::{Capabilities, GuardState, ManaPool};
    use crate::core::types::{AdversaryId, PlayerId};

    fn unit_with(elements: Vec<Element>) -> Unit {
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
            elements,
            effects: Vec::new(),
        }
    }

    fn id() -> UnitId {
        UnitId::Player(PlayerId(0))
    }

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(7)
    }

    #[test]
    fn test_move_lock_restores_on_expiry() {
        let mut unit = unit_with(vec![]);
        unit.effects
            .push(StatusEffect::timed(EffectKind::MoveLock, 0.05));
        let mut events = Vec::new();
        let mut rng = rng();

        tick_effects(&mut unit, id(), &mut rng, 1.0 / 60.0, &mut events);
        assert!(!unit.caps.can_move);

        // Lifetime runs out after a few more ticks and the flag comes back
        for _ in 0..5 {
            tick_effects(&mut unit, id(), &mut rng, 1.0 / 60.0, &mut events);
        }
        assert!(unit.caps.can_move);
        assert!(unit.effects.is_empty());
    }

    #[test]
    fn test_slip_pulses_on_period() {
        let mut unit = unit_with(vec![]);
        unit.effects.push(StatusEffect::timed(
            EffectKind::Slip(SlipState {
                until_next: 0.0,
                period: 1.0,
                amount: 10,
            }),
            10.0,
        ));
        let mut events = Vec::new();
        let mut rng = rng();

        tick_effects(&mut unit, id(), &mut rng, 1.0 / 60.0, &mut events);
        assert_eq!(unit.left_hp, 90.0);

        // Next pulse only lands after the period elapses again
        tick_effects(&mut unit, id(), &mut rng, 1.0 / 60.0, &mut events);
        assert_eq!(unit.left_hp, 90.0);
    }

    #[test]
    fn test_slip_on_adversary_bleeds_without_an_event() {
        let mut unit = unit_with(vec![]);
        unit.role = Role::Adversary;
        unit.effects.push(StatusEffect::timed(
            EffectKind::Slip(SlipState {
                until_next: 0.0,
                period: 1.0,
                amount: 10,
            }),
            10.0,
        ));
        let mut events = Vec::new();
        let mut rng = rng();

        tick_effects(
            &mut unit,
            UnitId::Adversary(AdversaryId(0)),
            &mut rng,
            1.0 / 60.0,
            &mut events,
        );
        assert_eq!(unit.left_hp, 90.0);
        assert!(!events
            .iter()
            .any(|e| matches!(e, CombatEvent::EffectTicked { .. })));
    }

    #[test]
    fn test_chill_cannot_stick_to_fire_elemental() {
        let mut unit = unit_with(vec![Element::Fire]);
        unit.effects.push(StatusEffect::timed(
            EffectKind::Chill(ChillState { until_next: 0.0 }),
            10.0,
        ));
        let mut events = Vec::new();
        let mut rng = rng();

        tick_effects(&mut unit, id(), &mut rng, 1.0 / 60.0, &mut events);
        // Gone on the first evaluation without dealing anything
        assert!(unit.effects.is_empty());
        assert_eq!(unit.left_hp, 100.0);
    }

    #[test]
    fn test_chill_heals_ice_elemental() {
        let mut unit = unit_with(vec![Element::Ice]);
        unit.left_hp = 50.0;
        unit.effects.push(StatusEffect::timed(
            EffectKind::Chill(ChillState { until_next: 0.0 }),
            10.0,
        ));
        let mut events = Vec::new();
        let mut rng = rng();

        tick_effects(&mut unit, id(), &mut rng, 1.0 / 60.0, &mut events);
        assert_eq!(unit.left_hp, 53.0);
    }

    #[test]
    fn test_freeze_thaws_instantly_on_fire() {
        let mut unit = unit_with(vec![Element::Fire]);
        unit.effects.push(StatusEffect::new(
            EffectKind::Freeze(FreezeState::default()),
            Lifetime::UntilCleared,
        ));
        let mut events = Vec::new();
        let mut rng = rng();

        tick_effects(&mut unit, id(), &mut rng, 1.0 / 60.0, &mut events);
        assert!(unit.effects.is_empty());
        assert!(unit.caps.can_move);
        assert!(unit.caps.can_act);
    }

    #[test]
    fn test_burn_heals_fire_hurts_leaf() {
        let mut fire = unit_with(vec![Element::Fire]);
        fire.left_hp = 50.0;
        fire.effects.push(StatusEffect::timed(
            EffectKind::Burn(BurnState { until_next: 0.0 }),
            10.0,
        ));
        let mut leaf = unit_with(vec![Element::Leaf]);
        leaf.effects.push(StatusEffect::timed(
            EffectKind::Burn(BurnState { until_next: 0.0 }),
            10.0,
        ));
        let mut events = Vec::new();
        let mut rng = rng();

        tick_effects(&mut fire, id(), &mut rng, 1.0 / 60.0, &mut events);
        tick_effects(&mut leaf, id(), &mut rng, 1.0 / 60.0, &mut events);
        assert_eq!(fire.left_hp, 52.0);
        assert_eq!(leaf.left_hp, 96.0);
    }

    #[test]
    fn test_haste_applies_and_reverts_factor_once() {
        let mut unit = unit_with(vec![]);
        unit.effects.push(StatusEffect::timed(
            EffectKind::Haste(HasteState {
                factor: 1.5,
                applied: false,
            }),
            0.05,
        ));
        let mut events = Vec::new();
        let mut rng = rng();

        tick_effects(&mut unit, id(), &mut rng, 1.0 / 60.0, &mut events);
        assert!((unit.gauge_rate_factor - 1.5).abs() < 1e-6);

        // Re-evaluating an active haste must not stack the factor
        tick_effects(&mut unit, id(), &mut rng, 1.0 / 60.0, &mut events);
        assert!((unit.gauge_rate_factor - 1.5).abs() < 1e-6);

        for _ in 0..5 {
            tick_effects(&mut unit, id(), &mut rng, 1.0 / 60.0, &mut events);
        }
        assert!((unit.gauge_rate_factor - 1.0).abs() < 1e-6);
        assert!(unit.effects.is_empty());
    }
}

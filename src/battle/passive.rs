//! Adversary passives
//!
//! Passives are one-shot triggers evaluated once per tick after damage has
//! landed. Each is armed or disarmed through its `valid` flag, so a fired
//! passive stays in the list but never fires again until something re-arms
//! it.

use serde::{Deserialize, Serialize};

use crate::battle::constants::GAUGE_MAX;
use crate::battle::events::CombatEvent;
use crate::battle::unit::Adversary;
use crate::core::types::AdversaryId;

/// Stat block swapped in when a molt fires
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MoltStats {
    pub attack: i64,
    pub intellect: i64,
    pub defense: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PassiveKind {
    /// Once, the first time HP falls to half or below, pin it just under
    /// half instead
    HalfGuarantee,
    /// Once, at half HP, swap in a new stat block and arm the molt guard
    Molt(MoltStats),
    /// Once, after molting, negate the next HP loss entirely
    MoltGuard,
    /// On death with a living resonance partner: keep charging, then
    /// revive at just under half HP when the gauge fills
    Resonance,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Passive {
    pub kind: PassiveKind,
    pub valid: bool,
    /// HP as of the last tick, kept while a molt guard is armed
    pub hp_snapshot: f32,
    /// Resonance partner recorded at arming time
    pub partner: Option<AdversaryId>,
}

impl Passive {
    pub fn new(kind: PassiveKind) -> Self {
        // Guards and resonance start disarmed and wait for their trigger
        let valid = matches!(kind, PassiveKind::HalfGuarantee | PassiveKind::Molt(_));
        Self {
            kind,
            valid,
            hp_snapshot: 0.0,
            partner: None,
        }
    }
}

/// Whether this adversary is dead but still charging toward a revival
pub fn resonance_armed(adversary: &Adversary) -> bool {
    adversary
        .passives
        .iter()
        .any(|p| matches!(p.kind, PassiveKind::Resonance) && p.valid)
}

fn has_living_resonance_partner(adversaries: &[Adversary], index: usize) -> Option<AdversaryId> {
    adversaries.iter().enumerate().find_map(|(i, a)| {
        let holds = i != index
            && a.unit.alive
            && a.passives
                .iter()
                .any(|p| matches!(p.kind, PassiveKind::Resonance));
        holds.then(|| AdversaryId(i as u32))
    })
}

/// Evaluate every adversary's passives for one tick
pub fn tick_passives(adversaries: &mut [Adversary], events: &mut Vec<CombatEvent>) {
    for index in 0..adversaries.len() {
        let max_hp = adversaries[index].unit.max_hp;
        let left_hp = adversaries[index].unit.left_hp;

        // Half guarantee fires before the guard chain sees the damage
        if let Some(passive) = adversaries[index]
            .passives
            .iter_mut()
            .find(|p| matches!(p.kind, PassiveKind::HalfGuarantee) && p.valid)
        {
            if left_hp / max_hp <= 0.5 {
                passive.valid = false;
                adversaries[index].unit.left_hp = max_hp / 2.0 - 1.0;
            }
        }

        let left_hp = adversaries[index].unit.left_hp;
        let mut arm_guard = false;
        if let Some(passive) = adversaries[index]
            .passives
            .iter_mut()
            .find(|p| matches!(p.kind, PassiveKind::Molt(_)) && p.valid)
        {
            if left_hp / max_hp <= 0.5 {
                passive.valid = false;
                if let PassiveKind::Molt(stats) = passive.kind {
                    adversaries[index].unit.attack = stats.attack;
                    adversaries[index].unit.intellect = stats.intellect;
                    adversaries[index].unit.defense = stats.defense;
                }
                arm_guard = true;
            }
        }

        let left_hp = adversaries[index].unit.left_hp;
        if let Some(passive) = adversaries[index]
            .passives
            .iter_mut()
            .find(|p| matches!(p.kind, PassiveKind::MoltGuard))
        {
            if arm_guard {
                passive.valid = true;
                passive.hp_snapshot = left_hp;
            } else if passive.valid {
                if left_hp < passive.hp_snapshot {
                    // Shed skin eats the hit
                    passive.valid = false;
                    adversaries[index].unit.left_hp = passive.hp_snapshot;
                } else {
                    passive.hp_snapshot = left_hp;
                }
            }
        }

        // Resonance: arm on death, revive once the gauge refills
        let resonance_index = adversaries[index]
            .passives
            .iter()
            .position(|p| matches!(p.kind, PassiveKind::Resonance));
        if let Some(passive_index) = resonance_index {
            let valid = adversaries[index].passives[passive_index].valid;
            let stored_partner = adversaries[index].passives[passive_index].partner;
            let left_hp = adversaries[index].unit.left_hp;
            let gauge_full = adversaries[index].unit.gauge >= GAUGE_MAX;

            if !valid && left_hp <= 0.0 {
                if let Some(partner) = has_living_resonance_partner(adversaries, index) {
                    let adversary = &mut adversaries[index];
                    adversary.passives[passive_index].valid = true;
                    adversary.passives[passive_index].partner = Some(partner);
                    adversary.unit.gauge = 0.0;
                }
            } else if valid && gauge_full {
                let partner_alive = stored_partner
                    .map(|AdversaryId(i)| adversaries[i as usize].unit.alive)
                    .unwrap_or(false);
                if partner_alive {
                    let adversary = &mut adversaries[index];
                    adversary.passives[passive_index].valid = false;
                    adversary.unit.left_hp = max_hp / 2.0 - 1.0;
                    adversary.unit.alive = true;
                    adversary.unit.gauge = 0.0;
                    events.push(CombatEvent::UnitRevived {
                        adversary: AdversaryId(index as u32),
                    });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::battle::unit::{AdversaryDefinition, ManaDefinition};
    use crate::core::types::AdversaryRow;

    fn adversary(passives: Vec<PassiveKind>) -> Adversary {
        Adversary::from_definition(&AdversaryDefinition {
            name: "test".into(),
            hp: 1000.0,
            attack: 300,
            defense: 400,
            mana: ManaDefinition {
                max: 100.0,
                recover: 0.0,
                efficiency: 100.0,
            },
            intellect: 200,
            row: AdversaryRow::Middle,
            hit_cells: vec![0, 1, 2, 3],
            elements: vec![],
            passives,
            actions: vec![],
        })
    }

    #[test]
    fn test_half_guarantee_fires_exactly_once() {
        let mut advs = vec![adversary(vec![PassiveKind::HalfGuarantee])];
        let mut events = Vec::new();

        advs[0].unit.left_hp = 400.0;
        tick_passives(&mut advs, &mut events);
        assert_eq!(advs[0].unit.left_hp, 499.0);

        // Second drop below half goes through untouched
        advs[0].unit.left_hp = 100.0;
        tick_passives(&mut advs, &mut events);
        assert_eq!(advs[0].unit.left_hp, 100.0);
    }

    #[test]
    fn test_molt_swaps_stats_and_arms_guard() {
        let stats = MoltStats {
            attack: 500,
            intellect: 350,
            defense: 300,
        };
        let mut advs = vec![adversary(vec![
            PassiveKind::Molt(stats),
            PassiveKind::MoltGuard,
        ])];
        let mut events = Vec::new();

        advs[0].unit.left_hp = 450.0;
        tick_passives(&mut advs, &mut events);
        assert_eq!(advs[0].unit.attack, 500);
        assert_eq!(advs[0].unit.intellect, 350);
        assert_eq!(advs[0].unit.defense, 300);

        // The guard now negates the next hit entirely
        advs[0].unit.left_hp = 200.0;
        tick_passives(&mut advs, &mut events);
        assert_eq!(advs[0].unit.left_hp, 450.0);

        // But only that one
        advs[0].unit.left_hp = 200.0;
        tick_passives(&mut advs, &mut events);
        assert_eq!(advs[0].unit.left_hp, 200.0);
    }

    #[test]
    fn test_resonance_arms_only_with_living_partner() {
        let mut advs = vec![
            adversary(vec![PassiveKind::Resonance]),
            adversary(vec![PassiveKind::Resonance]),
        ];
        let mut events = Vec::new();

        advs[0].unit.left_hp = 0.0;
        advs[0].unit.alive = false;
        tick_passives(&mut advs, &mut events);
        assert!(resonance_armed(&advs[0]));

        // Gauge fills while dead, then the revival lands
        advs[0].unit.gauge = 1000.0;
        tick_passives(&mut advs, &mut events);
        assert!(advs[0].unit.alive);
        assert_eq!(advs[0].unit.left_hp, 499.0);
        assert_eq!(advs[0].unit.gauge, 0.0);
        assert!(!resonance_armed(&advs[0]));
    }

    #[test]
    fn test_resonance_dead_partner_blocks_arming() {
        let mut advs = vec![
            adversary(vec![PassiveKind::Resonance]),
            adversary(vec![PassiveKind::Resonance]),
        ];
        let mut events = Vec::new();

        advs[1].unit.alive = false;
        advs[1].unit.left_hp = 0.0;
        advs[0].unit.left_hp = 0.0;
        advs[0].unit.alive = false;
        tick_passives(&mut advs, &mut events);
        assert!(!resonance_armed(&advs[0]));
    }
}

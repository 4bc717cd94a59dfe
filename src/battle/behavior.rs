//! Adversary decision making
//!
//! When an adversary's gauge is full it draws from its weighted action
//! table and executes the pick. A pick it cannot pay for changes nothing;
//! the gauge stays full and the table is drawn again on a later tick.

use rand::distributions::{Distribution, WeightedIndex};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use crate::battle::actions::{self, ActionKind};
use crate::battle::unit::Adversary;

/// Draw one action from the weighted table
pub fn choose_action(adversary: &Adversary, rng: &mut ChaCha8Rng) -> Option<ActionKind> {
    if adversary.actions.is_empty() {
        return None;
    }

    let weights = adversary.actions.iter().map(|a| a.weight);
    let distribution = WeightedIndex::new(weights).ok()?;
    Some(adversary.actions[distribution.sample(rng)].kind)
}

/// Decide and execute, returning the action that actually fired
pub fn act(adversary: &mut Adversary, rng: &mut ChaCha8Rng) -> Option<ActionKind> {
    let kind = choose_action(adversary, rng)?;

    if actions::perform(adversary, kind, rng) {
        debug!(name = %adversary.unit.name, action = kind.name(), "adversary action");
        Some(kind)
    } else {
        debug!(
            name = %adversary.unit.name,
            action = kind.name(),
            "action unaffordable, holding gauge"
        );
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    use crate::battle::actions::WeightedAction;
    use crate::battle::unit::{AdversaryDefinition, ManaDefinition};
    use crate::core::types::AdversaryRow;

    fn adversary(actions: Vec<WeightedAction>) -> Adversary {
        Adversary::from_definition(&AdversaryDefinition {
            name: "test".into(),
            hp: 500.0,
            attack: 100,
            defense: 100,
            mana: ManaDefinition {
                max: 100.0,
                recover: 0.0,
                efficiency: 100.0,
            },
            intellect: 100,
            row: AdversaryRow::Middle,
            hit_cells: vec![0, 1, 2, 3],
            elements: vec![],
            passives: vec![],
            actions,
        })
    }

    #[test]
    fn test_zero_weight_entries_never_drawn() {
        let adv = adversary(vec![
            WeightedAction {
                kind: ActionKind::TailRush,
                weight: 0.0,
            },
            WeightedAction {
                kind: ActionKind::Tightening,
                weight: 1.0,
            },
        ]);
        let mut rng = ChaCha8Rng::seed_from_u64(11);

        for _ in 0..50 {
            assert_eq!(choose_action(&adv, &mut rng), Some(ActionKind::Tightening));
        }
    }

    #[test]
    fn test_empty_table_yields_nothing() {
        let adv = adversary(vec![]);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert_eq!(choose_action(&adv, &mut rng), None);
    }

    #[test]
    fn test_same_seed_same_draws() {
        let adv = adversary(vec![
            WeightedAction {
                kind: ActionKind::TailRush,
                weight: 3.0,
            },
            WeightedAction {
                kind: ActionKind::SnakeDash,
                weight: 1.0,
            },
            WeightedAction {
                kind: ActionKind::Tightening,
                weight: 1.0,
            },
        ]);

        let draw = |seed: u64| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            (0..20)
                .map(|_| choose_action(&adv, &mut rng))
                .collect::<Vec<_>>()
        };
        assert_eq!(draw(42), draw(42));
    }
}

//! Elemental matchup matrix
//!
//! Eight elements with fixed strong/weak/immune tables. The multiplier
//! compounds per matching defender element; an immune match pins the
//! result to zero no matter what else the defender carries.

use serde::{Deserialize, Serialize};

/// Elemental tag carried by units and moves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Element {
    Normal,
    Fire,
    Water,
    Electric,
    Leaf,
    Wind,
    Ice,
    Ground,
}

/// Strong / weak / immune defender sets for one attacking element
struct Matchups {
    strong: &'static [Element],
    weak: &'static [Element],
    immune: &'static [Element],
}

use Element::*;

impl Element {
    /// Defender elements this attacking element is strong, weak, and
    /// useless against. Normal has empty tables and is neutral everywhere.
    fn matchups(self) -> Matchups {
        match self {
            Normal => Matchups {
                strong: &[],
                weak: &[],
                immune: &[],
            },
            Fire => Matchups {
                strong: &[Leaf, Ice],
                weak: &[Fire, Water, Wind],
                immune: &[],
            },
            Water => Matchups {
                strong: &[Fire],
                weak: &[Water, Leaf],
                immune: &[],
            },
            Electric => Matchups {
                strong: &[Water, Wind],
                weak: &[Electric],
                immune: &[Ground],
            },
            Leaf => Matchups {
                strong: &[Water, Ground],
                weak: &[Fire, Leaf, Wind],
                immune: &[],
            },
            Wind => Matchups {
                strong: &[Fire, Leaf, Ground],
                weak: &[Wind],
                immune: &[],
            },
            Ice => Matchups {
                strong: &[Leaf, Wind, Ground],
                weak: &[Fire, Ice],
                immune: &[],
            },
            Ground => Matchups {
                strong: &[Electric],
                weak: &[Ground],
                immune: &[Wind],
            },
        }
    }
}

/// Multiplier for `attack` hitting a defender tagged with `defender_elements`
///
/// Starts at 1; each matching defender element doubles or halves it, and an
/// immune match forces 0 (absorbing).
pub fn matchup(defender_elements: &[Element], attack: Element) -> f64 {
    let tables = attack.matchups();
    let mut mag = 1.0;

    for tag in defender_elements {
        if tables.strong.contains(tag) {
            mag *= 2.0;
        }
        if tables.weak.contains(tag) {
            mag /= 2.0;
        }
        if tables.immune.contains(tag) {
            mag = 0.0;
        }
    }

    mag
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neutral_attack_is_one() {
        assert_eq!(matchup(&[Fire], Normal), 1.0);
        assert_eq!(matchup(&[], Fire), 1.0);
    }

    #[test]
    fn test_strong_and_weak_pairs() {
        assert_eq!(matchup(&[Leaf], Fire), 2.0);
        assert_eq!(matchup(&[Water], Fire), 0.5);
        assert_eq!(matchup(&[Fire], Water), 2.0);
        assert_eq!(matchup(&[Ground], Ice), 2.0);
        assert_eq!(matchup(&[Ice], Ice), 0.5);
    }

    #[test]
    fn test_dual_element_compounds() {
        // Leaf + Ice defender doubles twice against Fire
        assert_eq!(matchup(&[Leaf, Ice], Fire), 4.0);
        // Strong and weak cancel out
        assert_eq!(matchup(&[Leaf, Water], Fire), 1.0);
    }

    #[test]
    fn test_immune_is_absorbing() {
        assert_eq!(matchup(&[Ground], Electric), 0.0);
        assert_eq!(matchup(&[Wind], Ground), 0.0);
        // A strong match elsewhere cannot rescue an immune pairing
        assert_eq!(matchup(&[Water, Ground], Electric), 0.0);
        assert_eq!(matchup(&[Ground, Water], Electric), 0.0);
    }

    #[test]
    fn test_matchup_not_symmetric() {
        // Electric is strong into Water, but Water is neutral into Electric
        assert_eq!(matchup(&[Water], Electric), 2.0);
        assert_eq!(matchup(&[Electric], Water), 1.0);
    }
}

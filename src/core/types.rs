//! Core type definitions used throughout the combat engine

use serde::{Deserialize, Serialize};

/// Index of a player unit within the battle roster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u32);

/// Stable handle to an adversary within the battle roster
///
/// Handles are resolved through the live collection on every use; nothing
/// in the engine captures a raw index across ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AdversaryId(pub u32);

/// A cell on the 4x4 player field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub x: u8,
    pub y: u8,
}

impl Cell {
    pub fn new(x: u8, y: u8) -> Self {
        Self { x, y }
    }

    /// Whether the cell lies on the playable field
    pub fn in_field(&self) -> bool {
        self.x < crate::battle::constants::FIELD_WIDTH
            && self.y < crate::battle::constants::FIELD_HEIGHT
    }
}

/// Which rank an adversary occupies, for the positional damage modifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AdversaryRow {
    Front,
    Middle,
    Back,
}

/// Player or adversary side of the battle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Player,
    Adversary,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_field_bounds() {
        assert!(Cell::new(0, 0).in_field());
        assert!(Cell::new(3, 3).in_field());
        assert!(!Cell::new(4, 0).in_field());
        assert!(!Cell::new(0, 4).in_field());
    }

    #[test]
    fn test_adversary_id_hash() {
        use std::collections::HashMap;
        let mut map: HashMap<AdversaryId, &str> = HashMap::new();
        map.insert(AdversaryId(1), "serpent");
        assert_eq!(map.get(&AdversaryId(1)), Some(&"serpent"));
    }
}

//! Battle system constants - all tunable values in one place

// Field
pub const FIELD_WIDTH: u8 = 4;
pub const FIELD_HEIGHT: u8 = 4;

// Action gauge
pub const GAUGE_MAX: f32 = 1000.0;
/// Seconds a zero-intellect unit needs to fill its gauge
pub const GAUGE_BASE_SECONDS: f32 = 20.0;

// Damage pipeline
pub const VARIANCE_MIN: u32 = 85;
pub const VARIANCE_MAX: u32 = 100;
/// Attunement bonus when a move's element matches its user's tags
pub const SAME_ELEMENT_BONUS: f64 = 1.5;

// Adversary row modifiers
pub const ROW_FRONT_MULT: f64 = 1.5;
pub const ROW_MIDDLE_MULT: f64 = 1.0;
pub const ROW_BACK_MULT: f64 = 2.0 / 3.0;

// Status effect cadences (seconds)
pub const CHILL_PERIOD: f32 = 1.0;
pub const FREEZE_PERIOD: f32 = 1.0;
pub const BURN_PERIOD: f32 = 0.25;
/// Per-cadence chance that chill or freeze shakes off
pub const SHAKE_OFF_CHANCE: f64 = 0.20;
/// Fraction of max HP moved by one chill cadence
pub const CHILL_FRACTION: f32 = 0.03;
pub const BURN_HEAL: i64 = 2;
pub const BURN_DAMAGE: i64 = 2;
pub const BURN_DAMAGE_VULNERABLE: i64 = 4;

// Item effects
pub const POTION_HEAL: i64 = 50;
pub const MANA_POTION_HEAL: f32 = 50.0;
pub const FALCON_FEATHER_DURATION: f32 = 10.0;
pub const FALCON_FEATHER_FACTOR: f32 = 1.5;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variance_bounds_ordered() {
        assert!(VARIANCE_MIN < VARIANCE_MAX);
        assert_eq!(VARIANCE_MAX, 100);
    }

    #[test]
    fn test_row_mults_ordered() {
        assert!(ROW_FRONT_MULT > ROW_MIDDLE_MULT);
        assert!(ROW_MIDDLE_MULT > ROW_BACK_MULT);
    }
}

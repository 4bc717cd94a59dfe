//! Action gauge scheduling
//!
//! Every unit charges a gauge from 0 to 1000 and may act when it is full.
//! The fill time halves for every 100 points of intellect, so charge order
//! between units is a pure function of stats plus the modifiers below.

use crate::battle::constants::{GAUGE_BASE_SECONDS, GAUGE_MAX};
use crate::battle::unit::{Adversary, PlayerUnit};
use crate::core::config::EngineConfig;

/// Frames needed to fill an empty gauge at the given tick rate
///
/// Kept in frame units so pacing stays fixed relative to the tick rate the
/// battle was configured with.
pub fn fill_frames(intellect: i64, tick_rate: f32) -> f32 {
    tick_rate * GAUGE_BASE_SECONDS * 0.5_f32.powf(intellect as f32 / 100.0)
}

/// Gauge units gained per second at the given intellect
pub fn fill_rate(intellect: i64, tick_rate: f32) -> f32 {
    GAUGE_MAX * tick_rate / fill_frames(intellect, tick_rate)
}

/// Advance a player's gauge by `dt` seconds
///
/// Returns true when this call pushed the gauge to full. Units in motion
/// charge at their move modifier fraction; haste buffs scale the rate on
/// top. A refill drops any guard still standing from the previous turn,
/// which the caller handles on the returned flag.
pub fn charge_player(player: &mut PlayerUnit, config: &EngineConfig, dt: f32) -> bool {
    if !player.unit.alive || player.unit.gauge >= GAUGE_MAX {
        return false;
    }

    let mut rate = fill_rate(player.unit.intellect, config.tick_rate) * player.unit.gauge_rate_factor;
    if player.is_moving() {
        rate *= player.move_gauge_modifier / 100.0;
    }

    player.unit.gauge = (player.unit.gauge + rate * dt).min(GAUGE_MAX);
    player.unit.gauge >= GAUGE_MAX
}

/// Advance an adversary's gauge by `dt` seconds
///
/// While a cooldown is burning the fill rate is divided down and the
/// cooldown itself is consumed. Dead adversaries normally stay frozen;
/// `charge_while_dead` overrides that for units a revival passive is
/// still counting down for.
pub fn charge_adversary(
    adversary: &mut Adversary,
    config: &EngineConfig,
    dt: f32,
    charge_while_dead: bool,
) -> bool {
    if !adversary.unit.alive && !charge_while_dead {
        return false;
    }
    if adversary.unit.gauge >= GAUGE_MAX {
        return true;
    }

    let mut rate = fill_rate(adversary.unit.intellect, config.tick_rate)
        * adversary.unit.gauge_rate_factor;
    if adversary.cooldown > 0.0 {
        rate /= config.cooldown_fill_divisor;
        adversary.cooldown -= dt;
    }

    adversary.unit.gauge = (adversary.unit.gauge + rate * dt).min(GAUGE_MAX);
    adversary.unit.gauge >= GAUGE_MAX
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_frames_halves_per_hundred_intellect() {
        let base = fill_frames(0, 60.0);
        assert!((base - 60.0 * 20.0).abs() < 1e-3);
        assert!((fill_frames(100, 60.0) - base / 2.0).abs() < 1e-3);
        assert!((fill_frames(200, 60.0) - base / 4.0).abs() < 1e-3);
    }

    #[test]
    fn test_fill_rate_matches_frame_count() {
        // Integrating the rate over the frame count lands exactly on full
        let frames = fill_frames(150, 60.0);
        let per_frame = fill_rate(150, 60.0) / 60.0;
        assert!((per_frame * frames - GAUGE_MAX).abs() < 1e-2);
    }
}

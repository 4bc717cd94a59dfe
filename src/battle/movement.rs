//! Player movement along a waypoint route
//!
//! The route holds the segment start at index 0 and the next waypoint at
//! index 1; a unit is "moving" while both exist. Progress is continuous
//! per axis, snapped onto the waypoint at arrival, and always clamped to
//! the field.

use crate::battle::unit::PlayerUnit;
use crate::core::types::Cell;

/// Euclidean distance between two cells
fn segment_distance(from: Cell, to: Cell) -> f32 {
    let dx = f32::from(to.x) - f32::from(from.x);
    let dy = f32::from(to.y) - f32::from(from.y);
    (dx * dx + dy * dy).sqrt()
}

/// Seconds to cross one route segment at the given speed stat
///
/// A speed of 100 crosses one cell per second; each additional 100 points
/// divides the time by five.
pub fn segment_seconds(speed: i64, from: Cell, to: Cell) -> f32 {
    segment_distance(from, to) * 5.0 * 0.2_f32.powf(speed as f32 / 100.0)
}

fn step_axis(current: f32, target: f32, step: f32) -> f32 {
    if target > current {
        (current + step).min(target)
    } else if target < current {
        (current - step).max(target)
    } else {
        current
    }
}

/// Advance one player along its route by `dt` seconds
pub fn advance(player: &mut PlayerUnit, dt: f32) {
    if !player.unit.caps.can_move || !player.unit.alive {
        return;
    }
    while player.route.len() >= 2 {
        let from = player.route[0];
        let to = player.route[1];
        let seconds = segment_seconds(player.speed, from, to);
        if seconds <= 0.0 {
            // Degenerate segment, fall through to the next waypoint
            player.route.remove(0);
            continue;
        }

        let pace = player.unit.guard.speed_modifier / 100.0;
        let step_x =
            pace * (f32::from(to.x) - f32::from(from.x)).abs() / seconds * dt;
        let step_y =
            pace * (f32::from(to.y) - f32::from(from.y)).abs() / seconds * dt;

        let (x, y) = player.position;
        let x = step_axis(x, f32::from(to.x), step_x).clamp(0.0, 3.0);
        let y = step_axis(y, f32::from(to.y), step_y).clamp(0.0, 3.0);
        player.position = (x, y);

        if (x - f32::from(to.x)).abs() < 1e-3 && (y - f32::from(to.y)).abs() < 1e-3 {
            player.position = (f32::from(to.x), f32::from(to.y));
            player.route.remove(0);
        }
        break;
    }
}

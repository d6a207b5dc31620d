//! Rolling resistance
//!
//! Birds and pigs resting vertically lose a fixed amount of horizontal speed
//! every step, so nothing rolls forever on the floor.

use glam::Vec2;

use super::world::{BodyId, PhysicsWorld};

/// Move `vx` toward zero by `decel`, snapping to zero when within reach
#[inline]
pub fn damp_horizontal(vx: f32, decel: f32) -> f32 {
    if vx.abs() <= decel {
        0.0
    } else {
        vx - decel * vx.signum()
    }
}

/// Apply one step of resistance to every rollable body at vertical rest
///
/// Returns the bodies whose velocity changed.
pub fn apply_rolling_resistance(world: &mut PhysicsWorld, decel: f32) -> Vec<BodyId> {
    let targets: Vec<(BodyId, Vec2)> = world
        .bodies()
        .filter(|b| b.dynamic && b.class.is_rollable())
        .filter(|b| b.velocity.y.round() == 0.0 && b.velocity.x != 0.0)
        .map(|b| (b.id, b.velocity))
        .collect();

    let mut changed = Vec::with_capacity(targets.len());
    for (id, velocity) in targets {
        let damped = Vec2::new(damp_horizontal(velocity.x, decel), velocity.y);
        if world.set_velocity(id, damped) {
            changed.push(id);
        }
    }
    changed
}

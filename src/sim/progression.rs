//! Level and attempt progression
//!
//! Evaluated once per frame after physics and collision processing:
//! 1. sweep bodies that drifted past the side edges
//! 2. wait until every body is at rest
//! 3. decide: advance, finish the campaign, issue the next attempt, restart,
//!    or hold
//!
//! Rest time is counted in ticks, so the outcome depends only on the world
//! population, attempts left and the tick count.

use glam::Vec2;

use super::entity::CollisionClass;
use super::world::{BodyId, PhysicsWorld};
use crate::is_at_rest;

/// What the frame loop should do next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Something is still moving
    Settling,
    /// At rest, nothing to do yet
    Hold,
    /// Level cleared, load the next one
    Advance,
    /// Final level cleared
    CampaignComplete,
    /// Spawn a fresh bird for another attempt
    NextAttempt,
    /// Out of attempts with pigs left: reload the level
    Restart,
}

/// Facts about the level the decision depends on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outlook {
    pub pigs: usize,
    pub bird_launched: bool,
    pub attempts: u32,
    pub level_index: usize,
    pub level_count: usize,
}

/// Decision for a world that is at rest
pub fn decide(outlook: &Outlook, rest_ticks: u32, grace_ticks: u32) -> Decision {
    if outlook.pigs == 0 {
        if outlook.level_index + 1 < outlook.level_count {
            Decision::Advance
        } else {
            Decision::CampaignComplete
        }
    } else if outlook.bird_launched && outlook.attempts > 0 {
        Decision::NextAttempt
    } else if outlook.attempts == 0 && rest_ticks > grace_ticks {
        Decision::Restart
    } else {
        Decision::Hold
    }
}

/// Pull bodies that left the playfield horizontally back in
///
/// Pigs past the margin are removed; anything else is clamped to the edge
/// and stopped, spin included. Returns the removed pigs.
pub fn sweep_out_of_bounds(world: &mut PhysicsWorld, margin: f32) -> Vec<BodyId> {
    let width = world.playfield().width;
    let strays: Vec<_> = world
        .bodies()
        .filter(|b| b.dynamic && (b.position.x > width + margin || b.position.x < -margin))
        .map(|b| (b.id, b.class, b.position))
        .collect();

    let mut removed = Vec::new();
    for (id, class, position) in strays {
        if class == CollisionClass::Pig {
            if world.remove_body(id) {
                log::debug!("Pig {:?} left the playfield at x = {:.0}", id, position.x);
                removed.push(id);
            }
        } else {
            let clamped = Vec2::new(position.x.clamp(0.0, width), position.y);
            log::debug!("Returning {:?} {:?} to x = {:.0}", class, id, clamped.x);
            world.set_position(id, clamped);
            world.halt(id);
        }
    }
    removed
}

/// True when every body's rounded velocity is zero
pub fn world_at_rest(world: &PhysicsWorld) -> bool {
    world.bodies().all(|b| is_at_rest(b.velocity))
}

/// Rest timer plus the decision function
#[derive(Debug, Clone, Default)]
pub struct Progression {
    rest_ticks: u32,
    grace_ticks: u32,
}

impl Progression {
    pub fn new(grace_ticks: u32) -> Self {
        Self {
            rest_ticks: 0,
            grace_ticks,
        }
    }

    pub fn rest_ticks(&self) -> u32 {
        self.rest_ticks
    }

    pub fn reset(&mut self) {
        self.rest_ticks = 0;
    }

    /// One frame of progression for an already-swept world
    pub fn evaluate(&mut self, world: &PhysicsWorld, outlook: &Outlook) -> Decision {
        if !world_at_rest(world) {
            self.rest_ticks = 0;
            return Decision::Settling;
        }
        self.rest_ticks = self.rest_ticks.saturating_add(1);
        decide(outlook, self.rest_ticks, self.grace_ticks)
    }
}

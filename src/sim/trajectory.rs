//! Trajectory preview
//!
//! Kinematic parabola for the current aim, sampled at a fixed time interval.
//! Purely presentational: the physics world is never consulted, so drag and
//! collisions are ignored.

use glam::Vec2;

use super::entity::Playfield;

/// Sampling cap; a preview never holds more points than this
pub const MAX_POINTS: usize = 120;

/// Sampled flight path of an aimed bird
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Trajectory {
    points: Vec<Vec2>,
    apex: Option<Vec2>,
}

impl Trajectory {
    /// Sample the parabola from `start` with launch `velocity`
    ///
    /// Sampling stops when the arc drops below `floor_y`, leaves the
    /// playfield horizontally, or reaches `MAX_POINTS`. Zero velocity yields
    /// an empty preview.
    pub fn preview(
        start: Vec2,
        velocity: Vec2,
        gravity: Vec2,
        interval: f32,
        floor_y: f32,
        playfield: Playfield,
    ) -> Self {
        if velocity == Vec2::ZERO || interval <= 0.0 {
            return Self::default();
        }

        let mut points = Vec::new();
        for i in 1..=MAX_POINTS {
            let t = i as f32 * interval;
            let p = start + velocity * t + 0.5 * gravity * t * t;
            if p.y < floor_y || p.x < 0.0 || p.x > playfield.width {
                break;
            }
            points.push(p);
        }

        Self {
            points,
            apex: apex(start, velocity, gravity),
        }
    }

    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    /// Highest point of the arc, if the bird rises at all
    pub fn apex(&self) -> Option<Vec2> {
        self.apex
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn clear(&mut self) {
        self.points.clear();
        self.apex = None;
    }
}

/// Vertex of the parabola: rises vy²/2g above the start
fn apex(start: Vec2, velocity: Vec2, gravity: Vec2) -> Option<Vec2> {
    let g = -gravity.y;
    if velocity.y <= 0.0 || g <= 0.0 {
        return None;
    }
    let t = velocity.y / g;
    Some(Vec2::new(
        start.x + velocity.x * t,
        start.y + velocity.y * velocity.y / (2.0 * g),
    ))
}

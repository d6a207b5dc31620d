//! Slingshot - A projectile-physics puzzle game core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics adapter, collision rules, aiming, level progression)
//! - `settings`: Numeric startup configuration
//! - `error`: Construction and level-data errors

pub mod error;
pub mod settings;
pub mod sim;

pub use error::{GameError, GameResult};
pub use settings::{ImpactThresholds, Settings};

use glam::Vec2;

/// Reference configuration constants
pub mod consts {
    /// Playfield size in world units (y-up)
    pub const SCREEN_WIDTH: f32 = 1913.0;
    pub const SCREEN_HEIGHT: f32 = 1050.0;

    /// Frames (and physics steps) per second
    pub const FPS: u32 = 30;

    /// Downward gravity (world units/s²)
    pub const GRAVITY_Y: f32 = -500.0;

    /// Bird defaults
    pub const BIRD_RADIUS: f32 = 20.0;
    pub const BIRD_X: f32 = 220.0;
    pub const BIRD_Y: f32 = 200.0 + BIRD_RADIUS; // resting on the floor

    /// Height of the floor's top surface
    pub const FLOOR_HEIGHT: f32 = 200.0;
    /// Floor overhang past each playfield edge
    pub const FLOOR_OVERHANG: f32 = 500.0;

    /// Maximum pointer distance that still increases launch speed
    pub const AIMING_RANGE: f32 = 200.0;
    /// Pointer distance is scaled by SCREEN_WIDTH / AIM_REFERENCE_WIDTH
    pub const AIM_REFERENCE_WIDTH: f32 = 400.0;
    /// Speed change per frame while a speed key is held
    pub const KEY_SPEED_STEP: f32 = 10.0;

    /// Horizontal deceleration for settled birds/pigs (units per step)
    pub const ROLLING_DECELERATION: f32 = 3.0;

    /// How far past the side edges a body may drift before being swept
    pub const OFFSCREEN_MARGIN: f32 = 50.0;

    /// Rest time with no attempts left before the level restarts
    pub const RESTART_GRACE_SECS: f32 = 1.0;

    /// Impact energy thresholds
    pub const BIRD_PIG_THRESHOLD: f32 = 3_000_000.0;
    pub const FLOOR_PIG_THRESHOLD: f32 = 40_000_000.0;
    pub const PIG_CRUSH_THRESHOLD: f32 = 23_000_000.0;
    pub const WOOD_BREAK_THRESHOLD: f32 = 300_000_000.0;
}

/// Normalize an angle in degrees to [0, 360)
#[inline]
pub fn wrap_degrees(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Unit direction for an angle in degrees (0° = +x, counter-clockwise)
#[inline]
pub fn direction_from_degrees(angle: f32) -> Vec2 {
    let rad = angle.to_radians();
    Vec2::new(rad.cos(), rad.sin())
}

/// True when both velocity components round to zero
#[inline]
pub fn is_at_rest(velocity: Vec2) -> bool {
    velocity.x.round() == 0.0 && velocity.y.round() == 0.0
}

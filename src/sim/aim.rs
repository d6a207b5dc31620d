//! Aiming and launch state machine
//!
//! Two input modes feed the same `Aim`:
//! - pointer: drag away from the bird, slingshot style; the bird flies
//!   opposite the drag and speed grows with drag distance
//! - keys: up/down rotate by 1° per frame, right/left change speed by a
//!   fixed step per frame
//!
//! A launch fires on pointer release (only if the press grabbed the bird) or
//! on the launch key, and only with a non-zero speed.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::Bird;
use crate::settings::Settings;
use crate::{direction_from_degrees, wrap_degrees};

/// Where the current attempt is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LaunchPhase {
    /// Bird waiting, no aim input
    #[default]
    Idle,
    /// Pointer held on the bird, or aim keys held, with zero speed
    Aiming,
    /// Non-zero speed set, waiting for release or launch key
    Armed,
    /// Velocity handed to the bird this frame
    Launched,
    /// Bird in flight; world stepping until rest
    Resolving,
    /// No pigs left on the final level
    LevelCleared,
    /// Pigs remain and no attempts are left
    LevelFailed,
}

impl LaunchPhase {
    /// Phases in which aim input is accepted
    pub fn accepts_aim(self) -> bool {
        matches!(self, LaunchPhase::Idle | LaunchPhase::Aiming | LaunchPhase::Armed)
    }
}

/// Held aim keys for one frame (up/w, down/s, right/d, left/a)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AimKeys {
    pub up: bool,
    pub down: bool,
    pub right: bool,
    pub left: bool,
}

impl AimKeys {
    pub fn any(&self) -> bool {
        self.up || self.down || self.right || self.left
    }
}

/// Launch angle (degrees, counter-clockwise from +x) and speed
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Aim {
    pub angle: f32,
    pub speed: f32,
}

impl Aim {
    pub fn new(angle: f32, speed: f32) -> Self {
        Self {
            angle: wrap_degrees(angle),
            speed,
        }
    }

    /// One frame of key-driven adjustment
    pub fn apply_keys(&mut self, keys: AimKeys, speed_step: f32, max_speed: f32) {
        if keys.up {
            self.angle = wrap_degrees(self.angle + 1.0);
        }
        if keys.down {
            self.angle = wrap_degrees(self.angle - 1.0);
        }
        if keys.right {
            self.speed = (self.speed + speed_step).min(max_speed);
        }
        if keys.left {
            self.speed = (self.speed - speed_step).max(0.0);
        }
    }

    /// Aim for a pointer dragged to `pointer` from the bird at `origin`
    pub fn from_pointer(origin: Vec2, pointer: Vec2, aiming_range: f32, speed_scale: f32) -> Self {
        let delta = pointer - origin;
        let distance = delta.length();
        Self {
            angle: slingshot_angle(delta),
            speed: distance.min(aiming_range) * speed_scale,
        }
    }

    /// Launch velocity
    pub fn velocity(&self) -> Vec2 {
        direction_from_degrees(self.angle) * self.speed
    }
}

/// Launch angle for a drag vector, pointing away from the drag
///
/// The inclination is measured against the horizontal, then placed in the
/// quadrant opposite the pointer.
pub fn slingshot_angle(delta: Vec2) -> f32 {
    let distance = delta.length();
    let inclination = if distance > 0.0 {
        (delta.y.abs() / distance).clamp(0.0, 1.0).asin().to_degrees()
    } else {
        0.0
    };
    let angle = if delta.x > 0.0 && delta.y < 0.0 {
        180.0 - inclination
    } else if delta.x > 0.0 && delta.y > 0.0 {
        180.0 + inclination
    } else if delta.x < 0.0 && delta.y > 0.0 {
        360.0 - inclination
    } else {
        inclination
    };
    wrap_degrees(angle)
}

/// Aim-related input for one frame
#[derive(Debug, Clone, Copy, Default)]
pub struct AimInput {
    /// Pointer position in world coordinates, if known
    pub pointer: Option<Vec2>,
    pub pressed: bool,
    pub released: bool,
    /// Secondary button released: drop the grab and zero the speed
    pub cancel: bool,
    pub keys: AimKeys,
    pub launch: bool,
}

/// Drives `LaunchPhase` from per-frame input
#[derive(Debug, Clone, Default)]
pub struct Launcher {
    phase: LaunchPhase,
    /// Pointer was pressed on the bird and not yet released
    grabbed: bool,
}

impl Launcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> LaunchPhase {
        self.phase
    }

    pub fn set_phase(&mut self, phase: LaunchPhase) {
        self.phase = phase;
    }

    pub fn is_grabbed(&self) -> bool {
        self.grabbed
    }

    /// Back to `Idle` for a fresh bird
    pub fn reset(&mut self) {
        self.phase = LaunchPhase::Idle;
        self.grabbed = false;
    }

    /// Feed one frame of input. Returns `true` when the bird should launch now.
    pub fn update(
        &mut self,
        aim: &mut Aim,
        bird_position: Vec2,
        bird_radius: f32,
        input: &AimInput,
        settings: &Settings,
    ) -> bool {
        if !self.phase.accepts_aim() {
            return false;
        }

        if input.cancel {
            aim.speed = 0.0;
            self.grabbed = false;
            self.phase = LaunchPhase::Idle;
            return false;
        }

        if input.pressed {
            if let Some(pointer) = input.pointer {
                if Bird::is_on_circle(bird_position, bird_radius, pointer) {
                    self.grabbed = true;
                }
            }
        }

        // Pointer mode wins while the bird is grabbed
        if self.grabbed {
            if let Some(pointer) = input.pointer {
                *aim = Aim::from_pointer(
                    bird_position,
                    pointer,
                    settings.aiming_range,
                    settings.speed_scale(),
                );
            }
        } else if input.keys.any() {
            aim.apply_keys(input.keys, settings.key_speed_step, settings.max_speed());
        }

        let released = self.grabbed && input.released;
        if released {
            self.grabbed = false;
        }

        self.phase = if aim.speed > 0.0 {
            LaunchPhase::Armed
        } else if self.grabbed || input.keys.any() {
            LaunchPhase::Aiming
        } else {
            LaunchPhase::Idle
        };

        if released || input.launch {
            if aim.speed > 0.0 {
                self.phase = LaunchPhase::Launched;
                return true;
            }
            log::warn!("Ignoring launch with zero speed");
        }
        false
    }
}

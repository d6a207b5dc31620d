//! Game settings
//!
//! Every numeric input the simulation needs, supplied once at startup.
//! Defaults reproduce the reference 1913x1050 configuration; a JSON document
//! may override any subset of fields.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{GameError, GameResult};

/// Impact energy above which a collision destroys a body
///
/// Tunable; only the ordering (stone > wood > floor impact) carries meaning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImpactThresholds {
    /// Bird hitting a pig (pig is absorbed)
    pub bird_pig: f32,
    /// Pig slamming into the floor
    pub floor_pig: f32,
    /// Pig hit by a bar, or two pigs colliding
    pub pig_crush: f32,
    /// Wooden bar hitting the floor, another bar, or stone
    pub wood_break: f32,
}

impl Default for ImpactThresholds {
    fn default() -> Self {
        Self {
            bird_pig: BIRD_PIG_THRESHOLD,
            floor_pig: FLOOR_PIG_THRESHOLD,
            pig_crush: PIG_CRUSH_THRESHOLD,
            wood_break: WOOD_BREAK_THRESHOLD,
        }
    }
}

/// Startup configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Playfield ===
    pub screen_width: f32,
    pub screen_height: f32,
    /// Top of the floor; level data y positions are offset by this
    pub floor_height: f32,

    // === Simulation ===
    /// Frames per second; one physics step per frame
    pub fps: u32,
    pub gravity: Vec2,

    // === Bird / aiming ===
    pub bird_radius: f32,
    /// Launch position (bird spawns here every attempt)
    pub bird_position: Vec2,
    pub aiming_range: f32,
    pub reference_width: f32,
    pub key_speed_step: f32,

    // === Post-processing and progression ===
    pub rolling_deceleration: f32,
    pub offscreen_margin: f32,
    pub restart_grace_secs: f32,

    pub thresholds: ImpactThresholds,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,
            floor_height: FLOOR_HEIGHT,

            fps: FPS,
            gravity: Vec2::new(0.0, GRAVITY_Y),

            bird_radius: BIRD_RADIUS,
            bird_position: Vec2::new(BIRD_X, BIRD_Y),
            aiming_range: AIMING_RANGE,
            reference_width: AIM_REFERENCE_WIDTH,
            key_speed_step: KEY_SPEED_STEP,

            rolling_deceleration: ROLLING_DECELERATION,
            offscreen_margin: OFFSCREEN_MARGIN,
            restart_grace_secs: RESTART_GRACE_SECS,

            thresholds: ImpactThresholds::default(),
        }
    }
}

impl Settings {
    /// Parse settings from JSON; missing fields keep their defaults
    pub fn from_json_str(json: &str) -> GameResult<Self> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> GameResult<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let settings = Self::from_json_str(&json)?;
        log::info!("Loaded settings from {}", path.as_ref().display());
        Ok(settings)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> GameResult<()> {
        let positive = [
            ("screen_width", self.screen_width),
            ("screen_height", self.screen_height),
            ("floor_height", self.floor_height),
            ("bird_radius", self.bird_radius),
            ("aiming_range", self.aiming_range),
            ("reference_width", self.reference_width),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(GameError::InvalidSetting { name, value });
            }
        }
        if self.fps == 0 {
            return Err(GameError::InvalidSetting { name: "fps", value: 0.0 });
        }
        let non_negative = [
            ("key_speed_step", self.key_speed_step),
            ("rolling_deceleration", self.rolling_deceleration),
            ("offscreen_margin", self.offscreen_margin),
            ("restart_grace_secs", self.restart_grace_secs),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(GameError::InvalidSetting { name, value });
            }
        }
        Ok(())
    }

    /// Fixed timestep (seconds per frame)
    pub fn dt(&self) -> f32 {
        1.0 / self.fps as f32
    }

    /// Pointer distance to launch speed scale
    pub fn speed_scale(&self) -> f32 {
        self.screen_width / self.reference_width
    }

    /// Launch speed cap, shared by pointer and key aiming
    pub fn max_speed(&self) -> f32 {
        self.aiming_range * self.speed_scale()
    }

    /// Rest ticks that must pass before an exhausted level restarts
    pub fn restart_grace_ticks(&self) -> u32 {
        (self.restart_grace_secs * self.fps as f32).round() as u32
    }
}

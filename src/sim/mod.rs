//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only, one physics step per frame
//! - No randomness
//! - Stable iteration order (body creation order)
//! - No rendering or platform dependencies

pub mod aim;
pub mod collision;
pub mod entity;
pub mod level;
pub mod progression;
pub mod resistance;
pub mod state;
pub mod tick;
pub mod trajectory;
pub mod world;

pub use aim::{Aim, AimInput, AimKeys, LaunchPhase, Launcher};
pub use collision::{Removal, Resolution, Verdict, judge, resolve_contacts};
pub use entity::{
    Bar, BarKind, Bird, BodyMode, CollisionClass, Color, Floor, Material, Pig, Playfield, Shape,
    palette,
};
pub use level::{Campaign, Level, LevelData};
pub use progression::{Decision, Outlook, Progression, decide, sweep_out_of_bounds};
pub use resistance::{apply_rolling_resistance, damp_horizontal};
pub use state::{GamePhase, GameState};
pub use tick::{TickInput, tick};
pub use trajectory::Trajectory;
pub use world::{BodyDesc, BodyId, BodyView, Contact, PhysicsWorld};

//! Error types for entity construction and level loading.

use std::fmt;

/// Result alias used across the crate.
pub type GameResult<T> = Result<T, GameError>;

/// Errors surfaced synchronously to the caller.
///
/// None of these are fatal to the frame loop: they come from construction or
/// mutation with bad arguments, or from level/settings data that failed to load.
#[derive(Debug)]
pub enum GameError {
    /// Position lies outside the playfield (or is not finite).
    InvalidCoordinates { x: f32, y: f32 },
    /// Radius or bar dimension is not positive.
    InvalidSize { what: &'static str, value: f32 },
    /// Density, elasticity or friction is negative.
    InvalidMaterial { property: &'static str, value: f32 },
    /// Bar body type is neither "static" nor "dynamic".
    InvalidBodyKind(String),
    /// Malformed JSON in a level or settings document.
    LevelData(serde_json::Error),
    /// Reading a level or settings file failed.
    Io(std::io::Error),
    /// The campaign has no levels.
    NoLevels,
    /// Requested level index does not exist.
    LevelOutOfRange { index: usize, count: usize },
    /// Settings value that cannot drive a simulation.
    InvalidSetting { name: &'static str, value: f32 },
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::InvalidCoordinates { x, y } => {
                write!(f, "invalid coordinates ({}, {})", x, y)
            }
            GameError::InvalidSize { what, value } => {
                write!(f, "{} has to be positive (got {})", what, value)
            }
            GameError::InvalidMaterial { property, value } => {
                write!(f, "{} cannot be negative (got {})", property, value)
            }
            GameError::InvalidBodyKind(kind) => {
                write!(f, "invalid body type '{}', has to be static or dynamic", kind)
            }
            GameError::LevelData(e) => write!(f, "invalid level data: {}", e),
            GameError::Io(e) => write!(f, "i/o error: {}", e),
            GameError::NoLevels => write!(f, "campaign contains no levels"),
            GameError::LevelOutOfRange { index, count } => {
                write!(f, "level index {} out of range (count: {})", index, count)
            }
            GameError::InvalidSetting { name, value } => {
                write!(f, "setting {} has invalid value {}", name, value)
            }
        }
    }
}

impl std::error::Error for GameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GameError::LevelData(e) => Some(e),
            GameError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for GameError {
    fn from(e: serde_json::Error) -> Self {
        GameError::LevelData(e)
    }
}

impl From<std::io::Error> for GameError {
    fn from(e: std::io::Error) -> Self {
        GameError::Io(e)
    }
}

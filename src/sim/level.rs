//! Level data and population
//!
//! Level files are JSON documents of the form
//! `{ "levels": [ { "level": 1, "objects": { "birds": {...}, "pigs": [...], "bars": [...] } } ] }`.
//! File coordinates are mirrored horizontally and measured from the floor's
//! top surface; `Level::to_world` applies that transform.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::{Bar, CollisionClass, Floor, Pig};
use super::world::PhysicsWorld;
use crate::error::{GameError, GameResult};
use crate::settings::Settings;

/// Bird supply for a level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BirdSupply {
    pub amount: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PigData {
    pub x_position: f32,
    pub y_position: f32,
    pub radius: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarData {
    pub x_position: f32,
    pub y_position: f32,
    pub x_size: f32,
    pub y_size: f32,
    /// `"wooden"`, `"stone"`, `"static"`, `"dynamic"`; absent means wood
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelObjects {
    pub birds: BirdSupply,
    #[serde(default)]
    pub pigs: Vec<PigData>,
    #[serde(default)]
    pub bars: Vec<BarData>,
}

/// One level record as stored in the file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelData {
    pub level: u32,
    pub objects: LevelObjects,
}

/// Ordered list of levels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Campaign {
    levels: Vec<LevelData>,
}

impl Campaign {
    pub fn new(levels: Vec<LevelData>) -> GameResult<Self> {
        if levels.is_empty() {
            return Err(GameError::NoLevels);
        }
        Ok(Self { levels })
    }

    pub fn from_json_str(json: &str) -> GameResult<Self> {
        let campaign: Campaign = serde_json::from_str(json)?;
        Self::new(campaign.levels)
    }

    pub fn load(path: impl AsRef<Path>) -> GameResult<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let campaign = Self::from_json_str(&json)?;
        log::info!(
            "Loaded {} levels from {}",
            campaign.len(),
            path.as_ref().display()
        );
        Ok(campaign)
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn levels(&self) -> &[LevelData] {
        &self.levels
    }

    pub fn get(&self, index: usize) -> GameResult<&LevelData> {
        self.levels.get(index).ok_or(GameError::LevelOutOfRange {
            index,
            count: self.levels.len(),
        })
    }

    /// Populate every level into a scratch world, surfacing bad data up front
    pub fn validate(&self, settings: &Settings) -> GameResult<()> {
        for index in 0..self.levels.len() {
            let mut scratch = PhysicsWorld::from_settings(settings);
            Level::populate(&mut scratch, self, index, settings)?;
        }
        Ok(())
    }
}

/// A level loaded into the world
#[derive(Debug, Clone)]
pub struct Level {
    index: usize,
    number: u32,
    total: usize,
    attempts: u32,
    floor: Floor,
    pigs: Vec<Pig>,
    bars: Vec<Bar>,
}

impl Level {
    /// Level-file coordinates to world space
    pub fn to_world(settings: &Settings, x: f32, y: f32) -> Vec2 {
        Vec2::new(settings.screen_width - x, y + settings.floor_height)
    }

    /// Create the floor, pigs and bars of level `index` in `world`
    ///
    /// The world is expected to be empty; a failure part-way leaves the
    /// bodies created so far in place.
    pub fn populate(
        world: &mut PhysicsWorld,
        campaign: &Campaign,
        index: usize,
        settings: &Settings,
    ) -> GameResult<Self> {
        let data = campaign.get(index)?;
        let floor = Floor::new(world, settings.floor_height)?;

        let pigs = data
            .objects
            .pigs
            .iter()
            .map(|p| {
                let pos = Self::to_world(settings, p.x_position, p.y_position);
                Pig::new(world, pos, p.radius)
            })
            .collect::<GameResult<Vec<_>>>()?;

        let bars = data
            .objects
            .bars
            .iter()
            .map(|b| {
                let pos = Self::to_world(settings, b.x_position, b.y_position);
                Bar::from_type(world, pos, Vec2::new(b.x_size, b.y_size), b.kind.as_deref())
            })
            .collect::<GameResult<Vec<_>>>()?;

        Ok(Self {
            index,
            number: data.level,
            total: campaign.len(),
            attempts: data.objects.birds.amount,
            floor,
            pigs,
            bars,
        })
    }

    /// Zero-based position in the campaign
    pub fn index(&self) -> usize {
        self.index
    }

    /// Level number as written in the file
    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn is_last(&self) -> bool {
        self.index + 1 >= self.total
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn reduce_attempts(&mut self) {
        self.attempts = self.attempts.saturating_sub(1);
    }

    pub fn floor(&self) -> &Floor {
        &self.floor
    }

    /// Pigs as placed at load time; some may since have been removed
    pub fn pigs(&self) -> &[Pig] {
        &self.pigs
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    /// Pigs still alive in the world
    pub fn live_pigs(world: &PhysicsWorld) -> usize {
        world.count_class(CollisionClass::Pig)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::{BarKind, BodyMode, Material};

    const ONE_LEVEL: &str = r#"{
        "levels": [
            {
                "level": 1,
                "objects": {
                    "birds": { "amount": 3 },
                    "pigs": [ { "x_position": 1113, "y_position": 120, "radius": 20 } ],
                    "bars": [
                        { "x_position": 1000, "y_position": 50, "x_size": 20, "y_size": 100 },
                        { "x_position": 1200, "y_position": 50, "x_size": 20, "y_size": 100, "type": "stone" },
                        { "x_position": 400, "y_position": 300, "x_size": 220, "y_size": 20, "type": "static" }
                    ]
                }
            }
        ]
    }"#;

    #[test]
    fn test_parse_and_populate() {
        let settings = Settings::default();
        let campaign = Campaign::from_json_str(ONE_LEVEL).unwrap();
        let mut world = PhysicsWorld::from_settings(&settings);
        let level = Level::populate(&mut world, &campaign, 0, &settings).unwrap();

        assert_eq!(level.number(), 1);
        assert_eq!(level.attempts(), 3);
        assert!(level.is_last());
        assert_eq!(Level::live_pigs(&world), 1);
        // Floor + 1 pig + 3 bars
        assert_eq!(world.len(), 5);

        let pig = &level.pigs()[0];
        assert_eq!(world.position(pig.body()), Some(Vec2::new(800.0, 320.0)));
    }

    #[test]
    fn test_bar_types() {
        let settings = Settings::default();
        let campaign = Campaign::from_json_str(ONE_LEVEL).unwrap();
        let mut world = PhysicsWorld::from_settings(&settings);
        let level = Level::populate(&mut world, &campaign, 0, &settings).unwrap();

        let kinds: Vec<BarKind> = level.bars().iter().map(|b| b.kind()).collect();
        assert_eq!(
            kinds,
            vec![BarKind::Wooden, BarKind::Stone, BarKind::Plain(BodyMode::Static)]
        );
        assert_eq!(level.bars()[0].material(), Material::WOODEN);
        assert_eq!(level.bars()[1].material(), Material::STONE);
        assert_eq!(
            world.class(level.bars()[1].body()),
            Some(CollisionClass::StoneBar)
        );
    }

    #[test]
    fn test_reduce_attempts_saturates() {
        let settings = Settings::default();
        let json = ONE_LEVEL.replace(r#""amount": 3"#, r#""amount": 1"#);
        let campaign = Campaign::from_json_str(&json).unwrap();
        let mut world = PhysicsWorld::from_settings(&settings);
        let mut level = Level::populate(&mut world, &campaign, 0, &settings).unwrap();
        level.reduce_attempts();
        level.reduce_attempts();
        assert_eq!(level.attempts(), 0);
    }

    #[test]
    fn test_empty_campaign_rejected() {
        assert!(matches!(
            Campaign::from_json_str(r#"{ "levels": [] }"#),
            Err(GameError::NoLevels)
        ));
        assert!(matches!(
            Campaign::from_json_str(r#"{ "levels": "#),
            Err(GameError::LevelData(_))
        ));
    }

    #[test]
    fn test_out_of_range_index() {
        let settings = Settings::default();
        let campaign = Campaign::from_json_str(ONE_LEVEL).unwrap();
        let mut world = PhysicsWorld::from_settings(&settings);
        assert!(matches!(
            Level::populate(&mut world, &campaign, 4, &settings),
            Err(GameError::LevelOutOfRange { index: 4, count: 1 })
        ));
    }

    #[test]
    fn test_validate_catches_bad_data() {
        let settings = Settings::default();
        let bad_kind = ONE_LEVEL.replace(r#""type": "stone""#, r#""type": "glass""#);
        let campaign = Campaign::from_json_str(&bad_kind).unwrap();
        assert!(matches!(
            campaign.validate(&settings),
            Err(GameError::InvalidBodyKind(kind)) if kind == "glass"
        ));

        let off_field = ONE_LEVEL.replace(r#""x_position": 1113"#, r#""x_position": 5000"#);
        let campaign = Campaign::from_json_str(&off_field).unwrap();
        assert!(matches!(
            campaign.validate(&settings),
            Err(GameError::InvalidCoordinates { .. })
        ));

        assert!(Campaign::from_json_str(ONE_LEVEL).unwrap().validate(&settings).is_ok());
    }
}

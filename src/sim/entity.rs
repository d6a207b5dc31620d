//! Physical entities: birds, pigs, bars and the floor
//!
//! Every entity validates its arguments before touching the world, then
//! registers one body + one collider stamped with its collision class.
//! Mutators re-run the same validation and update the live collider in place;
//! bad input is rejected, never clamped.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::aim::Aim;
use super::world::{BodyDesc, BodyId, PhysicsWorld};
use crate::consts::FLOOR_OVERHANG;
use crate::error::{GameError, GameResult};

/// Material role of a collider, used to pick collision rules
///
/// Declaration order is the canonical pair order used by the rule table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CollisionClass {
    Bird,
    Floor,
    Pig,
    Bar,
    WoodenBar,
    StoneBar,
}

impl CollisionClass {
    /// Bodies that roll and receive rolling resistance
    pub fn is_rollable(self) -> bool {
        matches!(self, CollisionClass::Bird | CollisionClass::Pig)
    }

    pub fn is_bar(self) -> bool {
        matches!(
            self,
            CollisionClass::Bar | CollisionClass::WoodenBar | CollisionClass::StoneBar
        )
    }
}

/// RGBA color for renderers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}

/// Default entity colors
pub mod palette {
    use super::Color;

    pub const BIRD: Color = Color::rgb(200, 30, 30);
    pub const PIG: Color = Color::rgb(110, 200, 60);
    pub const GROUND: Color = Color::rgb(120, 85, 50);
    pub const BAR: Color = Color::rgb(110, 50, 20);
    pub const STATIC_BAR: Color = Color::rgb(90, 90, 90);
    pub const WOODEN_BAR: Color = Color::rgb(180, 120, 60);
    pub const STONE_BAR: Color = Color::rgb(150, 150, 160);
}

/// Collider geometry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Circle { radius: f32 },
    /// Axis-aligned box, full extents
    Box { width: f32, height: f32 },
}

impl Shape {
    pub fn area(&self) -> f32 {
        match *self {
            Shape::Circle { radius } => std::f32::consts::PI * radius * radius,
            Shape::Box { width, height } => width * height,
        }
    }
}

/// Physical constants bundled with a collision class
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub density: f32,
    pub elasticity: f32,
    pub friction: f32,
    pub class: CollisionClass,
    pub color: Color,
}

impl Material {
    pub const BIRD: Material = Material {
        density: 0.7,
        elasticity: 0.6,
        friction: 0.8,
        class: CollisionClass::Bird,
        color: palette::BIRD,
    };
    pub const PIG: Material = Material {
        density: 0.8,
        elasticity: 0.7,
        friction: 0.8,
        class: CollisionClass::Pig,
        color: palette::PIG,
    };
    pub const FLOOR: Material = Material {
        density: 1.0,
        elasticity: 0.6,
        friction: 0.8,
        class: CollisionClass::Floor,
        color: palette::GROUND,
    };
    pub const BAR: Material = Material {
        density: 0.7,
        elasticity: 0.4,
        friction: 0.6,
        class: CollisionClass::Bar,
        color: palette::BAR,
    };
    pub const WOODEN: Material = Material {
        density: 0.6,
        elasticity: 0.5,
        friction: 0.6,
        class: CollisionClass::WoodenBar,
        color: palette::WOODEN_BAR,
    };
    pub const STONE: Material = Material {
        density: 0.9,
        elasticity: 0.3,
        friction: 0.6,
        class: CollisionClass::StoneBar,
        color: palette::STONE_BAR,
    };

    /// Density, elasticity and friction must be finite and non-negative
    pub fn validate(&self) -> GameResult<()> {
        for (property, value) in [
            ("density", self.density),
            ("elasticity", self.elasticity),
            ("friction", self.friction),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(GameError::InvalidMaterial { property, value });
            }
        }
        Ok(())
    }
}

/// World-space bounds that spawn positions must lie within
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Playfield {
    pub width: f32,
    pub height: f32,
}

impl Playfield {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn contains(&self, pos: Vec2) -> bool {
        pos.is_finite() && pos.x >= 0.0 && pos.y >= 0.0 && pos.x <= self.width && pos.y <= self.height
    }

    /// Reject positions outside [0, width] x [0, height]
    pub fn check(&self, pos: Vec2) -> GameResult<()> {
        if self.contains(pos) {
            Ok(())
        } else {
            Err(GameError::InvalidCoordinates { x: pos.x, y: pos.y })
        }
    }
}

fn check_positive(what: &'static str, value: f32) -> GameResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(GameError::InvalidSize { what, value })
    }
}

pub fn check_radius(radius: f32) -> GameResult<()> {
    check_positive("radius", radius)
}

pub fn check_size(size: Vec2) -> GameResult<()> {
    check_positive("width", size.x)?;
    check_positive("height", size.y)
}

/// Static or dynamic placement for bars
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BodyMode {
    #[default]
    Dynamic,
    Static,
}

impl BodyMode {
    pub fn parse(s: &str) -> GameResult<Self> {
        match s {
            "dynamic" => Ok(BodyMode::Dynamic),
            "static" => Ok(BodyMode::Static),
            other => Err(GameError::InvalidBodyKind(other.to_string())),
        }
    }
}

/// Bar variant selected by the level data `type` field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarKind {
    Wooden,
    Stone,
    Plain(BodyMode),
}

impl BarKind {
    /// Missing type means wood; unknown strings must name a body mode
    pub fn from_type(kind: Option<&str>) -> GameResult<Self> {
        match kind {
            None | Some("wooden") => Ok(BarKind::Wooden),
            Some("stone") => Ok(BarKind::Stone),
            Some(mode) => BodyMode::parse(mode).map(BarKind::Plain),
        }
    }

    pub fn material(&self) -> Material {
        match self {
            BarKind::Wooden => Material::WOODEN,
            BarKind::Stone => Material::STONE,
            BarKind::Plain(BodyMode::Dynamic) => Material::BAR,
            BarKind::Plain(BodyMode::Static) => Material {
                color: palette::STATIC_BAR,
                ..Material::BAR
            },
        }
    }

    pub fn mode(&self) -> BodyMode {
        match self {
            BarKind::Plain(mode) => *mode,
            _ => BodyMode::Dynamic,
        }
    }
}

/// Mutations of a removed body are no-ops
fn log_stale(applied: bool, body: BodyId) {
    if !applied {
        log::debug!("Ignoring mutation of removed body {:?}", body);
    }
}

/// The player's projectile
#[derive(Debug, Clone)]
pub struct Bird {
    body: BodyId,
    radius: f32,
    material: Material,
    /// Current aim for this attempt
    pub aim: Aim,
}

impl Bird {
    pub fn new(world: &mut PhysicsWorld, position: Vec2, radius: f32) -> GameResult<Self> {
        Self::with_material(world, position, radius, Material::BIRD)
    }

    pub fn with_material(
        world: &mut PhysicsWorld,
        position: Vec2,
        radius: f32,
        material: Material,
    ) -> GameResult<Self> {
        world.playfield().check(position)?;
        check_radius(radius)?;
        material.validate()?;
        let body = world.add_body(BodyDesc {
            shape: Shape::Circle { radius },
            position,
            dynamic: true,
            ccd: true,
            ..BodyDesc::from_material(Material {
                class: CollisionClass::Bird,
                ..material
            })
        });
        Ok(Self {
            body,
            radius,
            material,
            aim: Aim::default(),
        })
    }

    pub fn body(&self) -> BodyId {
        self.body
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn material(&self) -> Material {
        self.material
    }

    pub fn set_radius(&mut self, world: &mut PhysicsWorld, radius: f32) -> GameResult<()> {
        check_radius(radius)?;
        self.radius = radius;
        log_stale(world.set_shape(self.body, Shape::Circle { radius }), self.body);
        Ok(())
    }

    pub fn set_position(&mut self, world: &mut PhysicsWorld, position: Vec2) -> GameResult<()> {
        world.playfield().check(position)?;
        log_stale(world.set_position(self.body, position), self.body);
        Ok(())
    }

    /// Whether a point lies on the bird's circle at `center`
    ///
    /// Compared on rounded squared distances so a pointer exactly on the rim counts.
    pub fn is_on_circle(center: Vec2, radius: f32, point: Vec2) -> bool {
        (point - center).length_squared().round() <= (radius * radius).round()
    }
}

/// A target; the level is cleared once none remain
#[derive(Debug, Clone)]
pub struct Pig {
    body: BodyId,
    radius: f32,
}

impl Pig {
    pub fn new(world: &mut PhysicsWorld, position: Vec2, radius: f32) -> GameResult<Self> {
        world.playfield().check(position)?;
        check_radius(radius)?;
        let body = world.add_body(BodyDesc {
            shape: Shape::Circle { radius },
            position,
            dynamic: true,
            ..BodyDesc::from_material(Material::PIG)
        });
        Ok(Self { body, radius })
    }

    pub fn body(&self) -> BodyId {
        self.body
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn set_position(&mut self, world: &mut PhysicsWorld, position: Vec2) -> GameResult<()> {
        world.playfield().check(position)?;
        log_stale(world.set_position(self.body, position), self.body);
        Ok(())
    }

    pub fn set_radius(&mut self, world: &mut PhysicsWorld, radius: f32) -> GameResult<()> {
        check_radius(radius)?;
        self.radius = radius;
        log_stale(world.set_shape(self.body, Shape::Circle { radius }), self.body);
        Ok(())
    }
}

/// A rectangular obstacle
#[derive(Debug, Clone)]
pub struct Bar {
    body: BodyId,
    size: Vec2,
    kind: BarKind,
    color: Color,
}

impl Bar {
    pub fn new(world: &mut PhysicsWorld, position: Vec2, size: Vec2, kind: BarKind) -> GameResult<Self> {
        world.playfield().check(position)?;
        check_size(size)?;
        let material = kind.material();
        let body = world.add_body(BodyDesc {
            shape: Shape::Box {
                width: size.x,
                height: size.y,
            },
            position,
            dynamic: kind.mode() == BodyMode::Dynamic,
            ..BodyDesc::from_material(material)
        });
        Ok(Self {
            body,
            size,
            kind,
            color: material.color,
        })
    }

    /// Build from a level-data `type` string
    pub fn from_type(
        world: &mut PhysicsWorld,
        position: Vec2,
        size: Vec2,
        kind: Option<&str>,
    ) -> GameResult<Self> {
        let kind = BarKind::from_type(kind)?;
        Self::new(world, position, size, kind)
    }

    pub fn body(&self) -> BodyId {
        self.body
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn kind(&self) -> BarKind {
        self.kind
    }

    pub fn material(&self) -> Material {
        self.kind.material()
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn set_position(&mut self, world: &mut PhysicsWorld, position: Vec2) -> GameResult<()> {
        world.playfield().check(position)?;
        log_stale(world.set_position(self.body, position), self.body);
        Ok(())
    }

    pub fn set_size(&mut self, world: &mut PhysicsWorld, size: Vec2) -> GameResult<()> {
        check_size(size)?;
        self.size = size;
        let shape = Shape::Box {
            width: size.x,
            height: size.y,
        };
        log_stale(world.set_shape(self.body, shape), self.body);
        Ok(())
    }

    pub fn set_color(&mut self, world: &mut PhysicsWorld, color: Color) {
        self.color = color;
        log_stale(world.set_color(self.body, color), self.body);
    }
}

/// Static ground spanning the playfield plus an overhang on both sides
#[derive(Debug, Clone)]
pub struct Floor {
    body: BodyId,
    height: f32,
}

impl Floor {
    /// Top surface sits at `height`
    pub fn new(world: &mut PhysicsWorld, height: f32) -> GameResult<Self> {
        check_positive("floor height", height)?;
        let width = world.playfield().width;
        let body = world.add_body(BodyDesc {
            shape: Shape::Box {
                width: width + 2.0 * FLOOR_OVERHANG,
                height: 2.0 * height,
            },
            position: Vec2::new(width / 2.0, 0.0),
            dynamic: false,
            ..BodyDesc::from_material(Material::FLOOR)
        });
        Ok(Self { body, height })
    }

    pub fn body(&self) -> BodyId {
        self.body
    }

    pub fn height(&self) -> f32 {
        self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world() -> PhysicsWorld {
        PhysicsWorld::new(Vec2::new(0.0, -500.0), 1.0 / 30.0, Playfield::new(1913.0, 1050.0))
    }

    #[test]
    fn test_pig_construction() {
        let mut w = world();
        let pig = Pig::new(&mut w, Vec2::new(800.0, 320.0), 20.0).unwrap();
        assert_eq!(w.position(pig.body()), Some(Vec2::new(800.0, 320.0)));
        assert_eq!(w.class(pig.body()), Some(CollisionClass::Pig));
        assert_eq!(w.shape(pig.body()), Some(Shape::Circle { radius: 20.0 }));
    }

    #[test]
    fn test_out_of_bounds_rejected() {
        let mut w = world();
        let err = Pig::new(&mut w, Vec2::new(-1.0, 10.0), 20.0).unwrap_err();
        assert!(matches!(err, GameError::InvalidCoordinates { .. }));
        let err = Bird::new(&mut w, Vec2::new(10.0, 1051.0), 20.0).unwrap_err();
        assert!(matches!(err, GameError::InvalidCoordinates { .. }));
        // Nothing was registered
        assert!(w.is_empty());
    }

    #[test]
    fn test_non_positive_sizes_rejected() {
        let mut w = world();
        assert!(matches!(
            Pig::new(&mut w, Vec2::new(100.0, 100.0), 0.0),
            Err(GameError::InvalidSize { what: "radius", .. })
        ));
        assert!(matches!(
            Bar::new(&mut w, Vec2::new(100.0, 100.0), Vec2::new(20.0, -1.0), BarKind::Wooden),
            Err(GameError::InvalidSize { what: "height", .. })
        ));
    }

    #[test]
    fn test_negative_material_rejected() {
        let mut w = world();
        let material = Material {
            elasticity: -0.1,
            ..Material::BIRD
        };
        let err = Bird::with_material(&mut w, Vec2::new(220.0, 220.0), 20.0, material).unwrap_err();
        assert!(matches!(err, GameError::InvalidMaterial { property: "elasticity", .. }));
    }

    #[test]
    fn test_bar_kind_from_type() {
        assert_eq!(BarKind::from_type(None).unwrap(), BarKind::Wooden);
        assert_eq!(BarKind::from_type(Some("stone")).unwrap(), BarKind::Stone);
        assert_eq!(
            BarKind::from_type(Some("static")).unwrap(),
            BarKind::Plain(BodyMode::Static)
        );
        assert!(matches!(
            BarKind::from_type(Some("rubber")),
            Err(GameError::InvalidBodyKind(kind)) if kind == "rubber"
        ));
    }

    #[test]
    fn test_material_constants() {
        let wood = BarKind::Wooden.material();
        assert_eq!((wood.density, wood.elasticity, wood.friction), (0.6, 0.5, 0.6));
        assert_eq!(wood.class, CollisionClass::WoodenBar);
        let stone = BarKind::Stone.material();
        assert_eq!((stone.density, stone.elasticity, stone.friction), (0.9, 0.3, 0.6));
        assert_eq!(stone.class, CollisionClass::StoneBar);
    }

    #[test]
    fn test_static_bar_is_fixed() {
        let mut w = world();
        let bar = Bar::new(
            &mut w,
            Vec2::new(500.0, 400.0),
            Vec2::new(220.0, 20.0),
            BarKind::Plain(BodyMode::Static),
        )
        .unwrap();
        let view = w.view(bar.body()).unwrap();
        assert!(!view.dynamic);
        assert_eq!(view.class, CollisionClass::Bar);
        assert_eq!(view.color, palette::STATIC_BAR);
    }

    #[test]
    fn test_mutators_validate_and_update() {
        let mut w = world();
        let mut bar = Bar::new(&mut w, Vec2::new(500.0, 400.0), Vec2::new(20.0, 200.0), BarKind::Stone)
            .unwrap();
        bar.set_size(&mut w, Vec2::new(40.0, 100.0)).unwrap();
        assert_eq!(
            w.shape(bar.body()),
            Some(Shape::Box { width: 40.0, height: 100.0 })
        );
        assert!(bar.set_size(&mut w, Vec2::new(0.0, 100.0)).is_err());
        // Rejected input leaves the shape untouched
        assert_eq!(bar.size(), Vec2::new(40.0, 100.0));

        assert!(bar.set_position(&mut w, Vec2::new(5000.0, 10.0)).is_err());
        bar.set_position(&mut w, Vec2::new(600.0, 300.0)).unwrap();
        assert_eq!(w.position(bar.body()), Some(Vec2::new(600.0, 300.0)));

        bar.set_color(&mut w, Color::rgb(1, 2, 3));
        assert_eq!(w.view(bar.body()).unwrap().color, Color::rgb(1, 2, 3));
    }

    #[test]
    fn test_mutating_removed_body_is_noop() {
        let mut w = world();
        let mut pig = Pig::new(&mut w, Vec2::new(800.0, 320.0), 20.0).unwrap();
        assert!(w.remove_body(pig.body()));
        assert!(pig.set_radius(&mut w, 25.0).is_ok());
        assert!(pig.set_position(&mut w, Vec2::new(700.0, 300.0)).is_ok());
        assert!(w.position(pig.body()).is_none());
    }

    #[test]
    fn test_floor_top_surface() {
        let mut w = world();
        let floor = Floor::new(&mut w, 200.0).unwrap();
        let view = w.view(floor.body()).unwrap();
        assert_eq!(view.class, CollisionClass::Floor);
        match view.shape {
            Shape::Box { width, height } => {
                assert!(width > 1913.0);
                assert_eq!(view.position.y + height / 2.0, 200.0);
            }
            _ => panic!("floor should be a box"),
        }
    }

    #[test]
    fn test_is_on_circle() {
        let c = Vec2::new(220.0, 220.0);
        assert!(Bird::is_on_circle(c, 20.0, Vec2::new(230.0, 225.0)));
        assert!(Bird::is_on_circle(c, 20.0, Vec2::new(240.0, 220.0)));
        assert!(!Bird::is_on_circle(c, 20.0, Vec2::new(241.0, 220.0)));
    }
}

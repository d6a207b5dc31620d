//! Physics world adapter
//!
//! Wraps a rapier2d pipeline behind a small body-oriented API:
//! - exactly one fixed step per call, no sub-stepping or accumulator
//! - bodies tracked in creation order so every enumeration is deterministic
//! - each step reports the contacts that carried impulse, with impact energy
//!
//! Removal is idempotent: removing a body twice, or mutating a removed body,
//! returns `false` instead of failing.

use glam::Vec2;
use rapier2d::prelude::*;

use super::entity::{CollisionClass, Color, Material, Playfield, Shape};
use crate::settings::Settings;

/// Typical body size in world units; rapier scales its tolerances by it
const LENGTH_UNIT: f32 = 20.0;

/// Stable handle for a body in the world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyId(RigidBodyHandle);

/// Everything needed to create one body + collider
#[derive(Debug, Clone, Copy)]
pub struct BodyDesc {
    pub class: CollisionClass,
    pub shape: Shape,
    pub position: Vec2,
    pub dynamic: bool,
    pub density: f32,
    pub elasticity: f32,
    pub friction: f32,
    pub color: Color,
    /// Continuous collision detection (fast projectiles)
    pub ccd: bool,
}

impl BodyDesc {
    pub fn from_material(material: Material) -> Self {
        Self {
            class: material.class,
            shape: Shape::Circle { radius: 1.0 },
            position: Vec2::ZERO,
            dynamic: true,
            density: material.density,
            elasticity: material.elasticity,
            friction: material.friction,
            color: material.color,
            ccd: false,
        }
    }
}

/// Read-only snapshot of a live body, for renderers and rule evaluation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyView {
    pub id: BodyId,
    pub class: CollisionClass,
    pub shape: Shape,
    pub position: Vec2,
    pub velocity: Vec2,
    /// Rotation in radians
    pub angle: f32,
    pub color: Color,
    pub dynamic: bool,
}

/// A contact that carried impulse during the last step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub a: BodyId,
    pub b: BodyId,
    pub class_a: CollisionClass,
    pub class_b: CollisionClass,
    /// Mass of each body (infinite for static bodies)
    pub mass_a: f32,
    pub mass_b: f32,
    /// Kinetic energy equivalent of the contact impulse: J² / 2μ
    pub impact_energy: f32,
}

#[derive(Debug, Clone)]
struct BodyEntry {
    id: BodyId,
    collider: ColliderHandle,
    class: CollisionClass,
    shape: Shape,
    color: Color,
    dynamic: bool,
    density: f32,
}

impl BodyEntry {
    /// Area times density; static bodies are immovable
    fn mass(&self) -> f32 {
        if self.dynamic {
            self.shape.area() * self.density
        } else {
            f32::INFINITY
        }
    }
}

/// The physics world. Owns every body for its lifetime.
pub struct PhysicsWorld {
    gravity: Vec2,
    playfield: Playfield,
    pipeline: PhysicsPipeline,
    params: IntegrationParameters,
    islands: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    /// Live bodies in creation order
    entries: Vec<BodyEntry>,
    /// Velocities captured right before the last step
    pre_step: Vec<(BodyId, Vec2)>,
    steps: u64,
}

impl std::fmt::Debug for PhysicsWorld {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhysicsWorld")
            .field("gravity", &self.gravity)
            .field("playfield", &self.playfield)
            .field("bodies", &self.entries.len())
            .field("steps", &self.steps)
            .finish()
    }
}

fn to_vec2(x: f32, y: f32) -> Vec2 {
    Vec2::new(x, y)
}

fn shape_builder(shape: Shape) -> ColliderBuilder {
    match shape {
        Shape::Circle { radius } => ColliderBuilder::ball(radius),
        Shape::Box { width, height } => ColliderBuilder::cuboid(width / 2.0, height / 2.0),
    }
}

fn shared_shape(shape: Shape) -> SharedShape {
    match shape {
        Shape::Circle { radius } => SharedShape::ball(radius),
        Shape::Box { width, height } => SharedShape::cuboid(width / 2.0, height / 2.0),
    }
}

/// Effective mass of a two-body contact; a static partner contributes nothing
fn reduced_mass(mass_a: f32, mass_b: f32) -> f32 {
    match (mass_a.is_finite(), mass_b.is_finite()) {
        (true, true) if mass_a + mass_b > 0.0 => mass_a * mass_b / (mass_a + mass_b),
        (true, false) => mass_a,
        (false, true) => mass_b,
        _ => 0.0,
    }
}

impl PhysicsWorld {
    /// Create an empty world stepping by `dt` seconds
    pub fn new(gravity: Vec2, dt: f32, playfield: Playfield) -> Self {
        let params = IntegrationParameters {
            dt,
            length_unit: LENGTH_UNIT,
            ..IntegrationParameters::default()
        };
        Self {
            gravity,
            playfield,
            pipeline: PhysicsPipeline::new(),
            params,
            islands: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            entries: Vec::new(),
            pre_step: Vec::new(),
            steps: 0,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            settings.gravity,
            settings.dt(),
            Playfield::new(settings.screen_width, settings.screen_height),
        )
    }

    pub fn playfield(&self) -> Playfield {
        self.playfield
    }

    pub fn gravity(&self) -> Vec2 {
        self.gravity
    }

    pub fn dt(&self) -> f32 {
        self.params.dt
    }

    /// Number of steps taken since creation
    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Register a body and its collider
    ///
    /// Callers validate `desc` first; the world trusts it.
    pub fn add_body(&mut self, desc: BodyDesc) -> BodyId {
        let body_type = if desc.dynamic {
            RigidBodyType::Dynamic
        } else {
            RigidBodyType::Fixed
        };
        let rb = RigidBodyBuilder::new(body_type)
            .translation(desc.position)
            .ccd_enabled(desc.ccd)
            .build();
        let handle = self.bodies.insert(rb);

        // Material coefficients multiply on contact
        let collider = shape_builder(desc.shape)
            .density(desc.density)
            .restitution(desc.elasticity)
            .friction(desc.friction)
            .restitution_combine_rule(CoefficientCombineRule::Multiply)
            .friction_combine_rule(CoefficientCombineRule::Multiply)
            .build();
        let collider = self
            .colliders
            .insert_with_parent(collider, handle, &mut self.bodies);

        let id = BodyId(handle);
        self.entries.push(BodyEntry {
            id,
            collider,
            class: desc.class,
            shape: desc.shape,
            color: desc.color,
            dynamic: desc.dynamic,
            density: desc.density,
        });
        id
    }

    /// Remove a body and its collider. Returns `false` if it was already gone.
    pub fn remove_body(&mut self, id: BodyId) -> bool {
        let Some(index) = self.entries.iter().position(|e| e.id == id) else {
            return false;
        };
        self.entries.remove(index);
        self.bodies
            .remove(
                id.0,
                &mut self.islands,
                &mut self.colliders,
                &mut self.impulse_joints,
                &mut self.multibody_joints,
                true,
            )
            .is_some()
    }

    /// Remove every body
    pub fn clear(&mut self) {
        let ids: Vec<BodyId> = self.entries.iter().map(|e| e.id).collect();
        for id in ids {
            self.remove_body(id);
        }
    }

    pub fn contains(&self, id: BodyId) -> bool {
        self.entry(id).is_some()
    }

    fn entry(&self, id: BodyId) -> Option<&BodyEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    fn entry_for_collider(&self, collider: ColliderHandle) -> Option<&BodyEntry> {
        self.entries.iter().find(|e| e.collider == collider)
    }

    fn rigid_body(&self, id: BodyId) -> Option<&RigidBody> {
        self.entry(id)?;
        self.bodies.get(id.0)
    }

    fn rigid_body_mut(&mut self, id: BodyId) -> Option<&mut RigidBody> {
        self.entry(id)?;
        self.bodies.get_mut(id.0)
    }

    pub fn class(&self, id: BodyId) -> Option<CollisionClass> {
        self.entry(id).map(|e| e.class)
    }

    pub fn shape(&self, id: BodyId) -> Option<Shape> {
        self.entry(id).map(|e| e.shape)
    }

    pub fn position(&self, id: BodyId) -> Option<Vec2> {
        let rb = self.rigid_body(id)?;
        let t = rb.translation();
        Some(to_vec2(t.x, t.y))
    }

    pub fn velocity(&self, id: BodyId) -> Option<Vec2> {
        let rb = self.rigid_body(id)?;
        let v = rb.linvel();
        Some(to_vec2(v.x, v.y))
    }

    /// Mass of a dynamic body; static bodies report infinity
    pub fn mass(&self, id: BodyId) -> Option<f32> {
        self.entry(id).map(BodyEntry::mass)
    }

    /// Velocity the body had before the most recent step
    pub fn pre_step_velocity(&self, id: BodyId) -> Option<Vec2> {
        self.pre_step
            .iter()
            .find(|(body, _)| *body == id)
            .map(|(_, v)| *v)
    }

    pub fn set_velocity(&mut self, id: BodyId, velocity: Vec2) -> bool {
        match self.rigid_body_mut(id) {
            Some(rb) => {
                rb.set_linvel(velocity, true);
                true
            }
            None => false,
        }
    }

    pub fn set_position(&mut self, id: BodyId, position: Vec2) -> bool {
        match self.rigid_body_mut(id) {
            Some(rb) => {
                rb.set_translation(position, true);
                true
            }
            None => false,
        }
    }

    /// Zero linear and angular velocity
    pub fn halt(&mut self, id: BodyId) -> bool {
        match self.rigid_body_mut(id) {
            Some(rb) => {
                rb.set_linvel(Vec2::ZERO, true);
                rb.set_angvel(0.0, true);
                true
            }
            None => false,
        }
    }

    /// Replace the collider geometry of a live body
    pub fn set_shape(&mut self, id: BodyId, shape: Shape) -> bool {
        let Some(index) = self.entries.iter().position(|e| e.id == id) else {
            return false;
        };
        let collider = self.entries[index].collider;
        let Some(c) = self.colliders.get_mut(collider) else {
            return false;
        };
        c.set_shape(shared_shape(shape));
        self.entries[index].shape = shape;
        if let Some(rb) = self.bodies.get_mut(id.0) {
            rb.wake_up(true);
        }
        true
    }

    pub fn set_color(&mut self, id: BodyId, color: Color) -> bool {
        match self.entries.iter_mut().find(|e| e.id == id) {
            Some(entry) => {
                entry.color = color;
                true
            }
            None => false,
        }
    }

    /// Snapshot of one live body
    pub fn view(&self, id: BodyId) -> Option<BodyView> {
        self.entry(id).and_then(|e| self.view_entry(e))
    }

    fn view_entry(&self, entry: &BodyEntry) -> Option<BodyView> {
        let rb = self.bodies.get(entry.id.0)?;
        let t = rb.translation();
        let v = rb.linvel();
        Some(BodyView {
            id: entry.id,
            class: entry.class,
            shape: entry.shape,
            position: to_vec2(t.x, t.y),
            velocity: to_vec2(v.x, v.y),
            angle: rb.rotation().angle(),
            color: entry.color,
            dynamic: entry.dynamic,
        })
    }

    /// All live bodies in creation order
    pub fn bodies(&self) -> impl Iterator<Item = BodyView> + '_ {
        self.entries.iter().filter_map(|e| self.view_entry(e))
    }

    /// Live bodies of one collision class
    pub fn count_class(&self, class: CollisionClass) -> usize {
        self.entries.iter().filter(|e| e.class == class).count()
    }

    /// Advance the simulation by one fixed step
    ///
    /// Returns every contact pair that exchanged impulse during the step, in
    /// body creation order. Nothing is removed here; callers decide removals
    /// once the solver has finished.
    pub fn step(&mut self) -> Vec<Contact> {
        self.pre_step = self
            .entries
            .iter()
            .filter_map(|e| {
                let rb = self.bodies.get(e.id.0)?;
                let v = rb.linvel();
                Some((e.id, to_vec2(v.x, v.y)))
            })
            .collect();

        self.pipeline.step(
            self.gravity,
            &self.params,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            &(),
            &(),
        );
        self.steps += 1;

        self.collect_contacts()
    }

    fn collect_contacts(&self) -> Vec<Contact> {
        let order = |id: BodyId| self.entries.iter().position(|e| e.id == id);

        let mut contacts: Vec<(usize, usize, Contact)> = Vec::new();
        for pair in self.narrow_phase.contact_pairs() {
            let impulse = pair.total_impulse_magnitude();
            if impulse <= 0.0 {
                continue;
            }
            let (Some(ea), Some(eb)) = (
                self.entry_for_collider(pair.collider1),
                self.entry_for_collider(pair.collider2),
            ) else {
                continue;
            };
            let (Some(rb_a), Some(rb_b)) = (self.bodies.get(ea.id.0), self.bodies.get(eb.id.0))
            else {
                continue;
            };
            // Impulses cached on a sleeping island are stale
            if rb_a.is_sleeping() && rb_b.is_sleeping() {
                continue;
            }
            let mass_a = ea.mass();
            let mass_b = eb.mass();
            let mu = reduced_mass(mass_a, mass_b);
            if mu <= 0.0 {
                continue;
            }

            // Stable ordering: earlier-created body first
            let (Some(ia), Some(ib)) = (order(ea.id), order(eb.id)) else {
                continue;
            };
            let (first, second, mass_first, mass_second, i1, i2) = if ia <= ib {
                (ea, eb, mass_a, mass_b, ia, ib)
            } else {
                (eb, ea, mass_b, mass_a, ib, ia)
            };
            contacts.push((
                i1,
                i2,
                Contact {
                    a: first.id,
                    b: second.id,
                    class_a: first.class,
                    class_b: second.class,
                    mass_a: mass_first,
                    mass_b: mass_second,
                    impact_energy: impulse * impulse / (2.0 * mu),
                },
            ));
        }
        contacts.sort_by_key(|(i1, i2, _)| (*i1, *i2));
        contacts.into_iter().map(|(_, _, c)| c).collect()
    }
}

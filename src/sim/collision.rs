//! Collision resolution
//!
//! A stateless rule table keyed by the unordered pair of collision classes.
//! `judge` decides what a single contact does; `resolve_contacts` applies the
//! verdicts for one step's worth of contacts after the solver has run.

use std::cmp::Ordering;

use super::entity::CollisionClass;
use super::world::{BodyId, Contact, PhysicsWorld};
use crate::settings::ImpactThresholds;

/// Which member(s) of a contact pair to remove
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removal {
    None,
    First,
    Second,
    Both,
    /// The lighter body; ties remove the second
    Lighter,
}

/// Outcome of one contact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verdict {
    pub remove: Removal,
    /// Undo the solver's response so the first body passes through
    pub veto: bool,
}

impl Verdict {
    pub const INERT: Verdict = Verdict {
        remove: Removal::None,
        veto: false,
    };

    fn remove(remove: Removal) -> Self {
        Self { remove, veto: false }
    }

    fn swapped(self) -> Self {
        let remove = match self.remove {
            Removal::First => Removal::Second,
            Removal::Second => Removal::First,
            other => other,
        };
        Self { remove, ..self }
    }
}

/// Rule table over classes in canonical (declaration) order
fn canonical_rule(a: CollisionClass, b: CollisionClass, energy: f32, t: &ImpactThresholds) -> Verdict {
    use crate::sim::entity::CollisionClass::*;

    match (a, b) {
        (Bird, Pig) if energy > t.bird_pig => Verdict {
            remove: Removal::Second,
            veto: true,
        },
        (Floor, Pig) if energy > t.floor_pig => Verdict::remove(Removal::Second),
        (Pig, Bar | WoodenBar | StoneBar) if energy > t.pig_crush => Verdict::remove(Removal::First),
        (Pig, Pig) if energy > t.pig_crush => Verdict::remove(Removal::Both),
        (Floor | Bar, WoodenBar) if energy > t.wood_break => Verdict::remove(Removal::Second),
        (WoodenBar, StoneBar) if energy > t.wood_break => Verdict::remove(Removal::First),
        (WoodenBar, WoodenBar) if energy > t.wood_break => Verdict::remove(Removal::Lighter),
        _ => Verdict::INERT,
    }
}

/// Verdict for a contact between `a` and `b`, in the caller's order
pub fn judge(a: CollisionClass, b: CollisionClass, energy: f32, thresholds: &ImpactThresholds) -> Verdict {
    match a.cmp(&b) {
        Ordering::Greater => canonical_rule(b, a, energy, thresholds).swapped(),
        _ => canonical_rule(a, b, energy, thresholds),
    }
}

/// What one step's contacts did to the world
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolution {
    /// Bodies removed, in removal order
    pub removed: Vec<BodyId>,
    /// Bodies whose collision response was undone
    pub passed_through: Vec<BodyId>,
    /// Contacts skipped because a member was already gone
    pub stale: usize,
}

/// Apply the rule table to every contact from the last step
///
/// Removal is idempotent: a contact whose body was removed by an earlier
/// contact in the same step is skipped.
pub fn resolve_contacts(
    world: &mut PhysicsWorld,
    contacts: &[Contact],
    thresholds: &ImpactThresholds,
) -> Resolution {
    let mut resolution = Resolution::default();

    for contact in contacts {
        if !world.contains(contact.a) || !world.contains(contact.b) {
            resolution.stale += 1;
            continue;
        }

        let verdict = judge(contact.class_a, contact.class_b, contact.impact_energy, thresholds);
        let targets = match verdict.remove {
            Removal::None => continue,
            Removal::First => vec![contact.a],
            Removal::Second => vec![contact.b],
            Removal::Both => vec![contact.a, contact.b],
            Removal::Lighter if contact.mass_a < contact.mass_b => vec![contact.a],
            Removal::Lighter => vec![contact.b],
        };

        for &id in &targets {
            if world.remove_body(id) {
                log::debug!(
                    "Removed {:?} ({:?} vs {:?}, energy {:.0})",
                    id,
                    contact.class_a,
                    contact.class_b,
                    contact.impact_energy
                );
                resolution.removed.push(id);
            }
        }

        if verdict.veto {
            let survivor = if targets.contains(&contact.a) {
                contact.b
            } else {
                contact.a
            };
            if pass_through(world, survivor) && !resolution.passed_through.contains(&survivor) {
                resolution.passed_through.push(survivor);
            }
        }
    }

    resolution
}

/// Restore the velocity a body would have had without the contact
fn pass_through(world: &mut PhysicsWorld, id: BodyId) -> bool {
    let Some(before) = world.pre_step_velocity(id) else {
        return false;
    };
    let velocity = before + world.gravity() * world.dt();
    world.set_velocity(id, velocity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::{Material, Playfield, Shape};
    use crate::sim::world::BodyDesc;
    use glam::Vec2;
    use crate::sim::entity::CollisionClass::*;

    fn thresholds() -> ImpactThresholds {
        ImpactThresholds {
            bird_pig: 10.0,
            floor_pig: 20.0,
            pig_crush: 30.0,
            wood_break: 40.0,
        }
    }

    #[test]
    fn test_bird_pig_removes_pig_and_vetoes() {
        let t = thresholds();
        let v = judge(Bird, Pig, 11.0, &t);
        assert_eq!(v, Verdict { remove: Removal::Second, veto: true });
        // Symmetric: swapped order names the pig as first
        let v = judge(Pig, Bird, 11.0, &t);
        assert_eq!(v, Verdict { remove: Removal::First, veto: true });
        // At the threshold nothing happens
        assert_eq!(judge(Bird, Pig, 10.0, &t), Verdict::INERT);
    }

    #[test]
    fn test_pig_rules() {
        let t = thresholds();
        assert_eq!(judge(Floor, Pig, 21.0, &t).remove, Removal::Second);
        assert_eq!(judge(Pig, Floor, 19.0, &t), Verdict::INERT);
        for bar in [Bar, WoodenBar, StoneBar] {
            assert_eq!(judge(bar, Pig, 31.0, &t).remove, Removal::Second);
            assert_eq!(judge(Pig, bar, 31.0, &t).remove, Removal::First);
        }
        assert_eq!(judge(Pig, Pig, 31.0, &t).remove, Removal::Both);
        assert!(!judge(Pig, Pig, 31.0, &t).veto);
    }

    #[test]
    fn test_wood_rules() {
        let t = thresholds();
        assert_eq!(judge(WoodenBar, Floor, 41.0, &t).remove, Removal::First);
        assert_eq!(judge(Bar, WoodenBar, 41.0, &t).remove, Removal::Second);
        assert_eq!(judge(StoneBar, WoodenBar, 41.0, &t).remove, Removal::Second);
        assert_eq!(judge(WoodenBar, WoodenBar, 41.0, &t).remove, Removal::Lighter);
        assert_eq!(judge(WoodenBar, WoodenBar, 39.0, &t), Verdict::INERT);
    }

    #[test]
    fn test_uncovered_pairs_are_inert() {
        let t = thresholds();
        for (a, b) in [
            (Bird, Floor),
            (Bird, Bar),
            (Bird, WoodenBar),
            (Bird, StoneBar),
            (Floor, StoneBar),
            (Floor, Bar),
            (StoneBar, StoneBar),
            (Bar, StoneBar),
            (Bird, Bird),
        ] {
            assert_eq!(judge(a, b, f32::MAX, &t), Verdict::INERT, "{:?} vs {:?}", a, b);
        }
    }

    fn ball(world: &mut PhysicsWorld, material: Material, x: f32) -> BodyId {
        world.add_body(BodyDesc {
            shape: Shape::Circle { radius: 20.0 },
            position: Vec2::new(x, 500.0),
            ..BodyDesc::from_material(material)
        })
    }

    fn contact(world: &PhysicsWorld, a: BodyId, b: BodyId, energy: f32) -> Contact {
        Contact {
            a,
            b,
            class_a: world.class(a).unwrap(),
            class_b: world.class(b).unwrap(),
            mass_a: world.mass(a).unwrap(),
            mass_b: world.mass(b).unwrap(),
            impact_energy: energy,
        }
    }

    #[test]
    fn test_removal_is_idempotent_within_a_step() {
        let mut world = PhysicsWorld::new(Vec2::new(0.0, -500.0), 1.0 / 30.0, Playfield::new(1913.0, 1050.0));
        let p1 = ball(&mut world, Material::PIG, 400.0);
        let p2 = ball(&mut world, Material::PIG, 440.0);
        let p3 = ball(&mut world, Material::PIG, 480.0);

        let contacts = [
            contact(&world, p1, p2, 100.0),
            contact(&world, p2, p3, 100.0),
            contact(&world, p1, p3, 100.0),
        ];
        let r = resolve_contacts(&mut world, &contacts, &thresholds());
        assert_eq!(r.removed, vec![p1, p2]);
        assert_eq!(r.stale, 2);
        assert!(world.contains(p3));
    }

    #[test]
    fn test_lighter_wooden_bar_breaks() {
        let mut world = PhysicsWorld::new(Vec2::new(0.0, -500.0), 1.0 / 30.0, Playfield::new(1913.0, 1050.0));
        let heavy = world.add_body(BodyDesc {
            shape: Shape::Box { width: 40.0, height: 200.0 },
            position: Vec2::new(500.0, 400.0),
            ..BodyDesc::from_material(Material::WOODEN)
        });
        let light = world.add_body(BodyDesc {
            shape: Shape::Box { width: 20.0, height: 100.0 },
            position: Vec2::new(600.0, 400.0),
            ..BodyDesc::from_material(Material::WOODEN)
        });
        let c = contact(&world, heavy, light, 100.0);
        let r = resolve_contacts(&mut world, &[c], &thresholds());
        assert_eq!(r.removed, vec![light]);
        assert!(world.contains(heavy));
    }

    #[test]
    fn test_bird_passes_through_absorbed_pig() {
        let mut world = PhysicsWorld::new(Vec2::new(0.0, -500.0), 1.0 / 30.0, Playfield::new(1913.0, 1050.0));
        let bird = ball(&mut world, Material::BIRD, 300.0);
        let pig = ball(&mut world, Material::PIG, 600.0);
        world.set_velocity(bird, Vec2::new(900.0, 0.0));
        world.step();

        let c = contact(&world, bird, pig, 1_000.0);
        // Pretend the solver bounced the bird back
        world.set_velocity(bird, Vec2::new(-300.0, 0.0));
        let r = resolve_contacts(&mut world, &[c], &thresholds());

        assert_eq!(r.removed, vec![pig]);
        assert_eq!(r.passed_through, vec![bird]);
        let v = world.velocity(bird).unwrap();
        assert!((v.x - 900.0).abs() < 1e-3);
        assert!((v.y - (-500.0 / 30.0)).abs() < 1e-3);
    }
}

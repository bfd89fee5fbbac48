//! Circle collision detection between physics entities
//!
//! Every frame the pass clears all collision flags, then tests each unordered
//! pair once. Overlapping pairs get both flags set, except ship/bullet pairs,
//! which are ignored entirely. Bullet/asteroid overlaps are reported as
//! [`ScoredHit`]s for the game to resolve; ship/asteroid overlaps only set
//! flags, and the ship decides in its own update whether the hit is lethal.

use std::collections::HashSet;

use glam::Vec2;

use super::entity::{EntityId, PhysicsKind};
use super::world::World;

/// Touching or overlapping (boundary contact counts)
#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    let reach = ra + rb;
    a.distance_squared(b) <= reach * reach
}

/// A bullet that struck an asteroid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoredHit {
    pub asteroid: EntityId,
    pub bullet: EntityId,
}

#[derive(Debug, Clone, Copy)]
struct Collider {
    index: usize,
    id: EntityId,
    kind: PhysicsKind,
    pos: Vec2,
    radius: f32,
}

/// Run the collision pass over `world`.
///
/// Returns scored hits in scan order. Each entity appears in at most one hit,
/// so when several rocks overlap one bullet only the first pair scores.
pub fn detect_collisions(world: &mut World) -> Vec<ScoredHit> {
    let entities = world.as_mut_slice();

    let mut colliders = Vec::new();
    for (index, entity) in entities.iter_mut().enumerate() {
        let (Some(kind), pos, id) = (entity.physics_kind(), entity.pos, entity.id()) else {
            continue;
        };
        if let Some(body) = entity.body_mut() {
            body.is_colliding = false;
            colliders.push(Collider {
                index,
                id,
                kind,
                pos,
                radius: body.collision_radius,
            });
        }
    }

    let mut colliding = vec![false; colliders.len()];
    let mut resolved: HashSet<EntityId> = HashSet::new();
    let mut hits = Vec::new();

    for i in 0..colliders.len() {
        for j in (i + 1)..colliders.len() {
            let (a, b) = (colliders[i], colliders[j]);
            if a.kind.is_exempt_with(b.kind) {
                continue;
            }
            if !circles_overlap(a.pos, a.radius, b.pos, b.radius) {
                continue;
            }
            colliding[i] = true;
            colliding[j] = true;

            let pair = match (a.kind, b.kind) {
                (PhysicsKind::Asteroid, PhysicsKind::Bullet) => Some((a.id, b.id)),
                (PhysicsKind::Bullet, PhysicsKind::Asteroid) => Some((b.id, a.id)),
                _ => None,
            };
            let Some((asteroid, bullet)) = pair else {
                continue;
            };
            // First pair in scan order wins
            if resolved.contains(&asteroid) || resolved.contains(&bullet) {
                continue;
            }
            resolved.insert(asteroid);
            resolved.insert(bullet);
            hits.push(ScoredHit { asteroid, bullet });
        }
    }

    for (collider, flag) in colliders.iter().zip(colliding) {
        if let Some(body) = entities[collider.index].body_mut() {
            body.is_colliding = flag;
        }
    }

    hits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::AudioManager;
    use crate::sim::asteroid::{Asteroid, AsteroidSize};
    use crate::sim::bullet::Bullet;
    use crate::sim::entity::Entity;
    use crate::sim::ship::Ship;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn rock(pos: Vec2, audio: &mut AudioManager, rng: &mut Pcg32) -> Entity {
        Asteroid::spawn(AsteroidSize::Small, Some(pos), rng, audio)
    }

    fn flag(world: &World, id: EntityId) -> bool {
        world
            .get(id)
            .and_then(|e| e.body())
            .map(|b| b.is_colliding)
            .unwrap_or(false)
    }

    #[test]
    fn test_boundary_contact_overlaps() {
        assert!(circles_overlap(Vec2::ZERO, 3.0, Vec2::new(5.0, 0.0), 2.0));
        assert!(!circles_overlap(Vec2::ZERO, 3.0, Vec2::new(5.01, 0.0), 2.0));
    }

    #[test]
    fn test_friendly_fire_exempt_at_zero_distance() {
        let mut audio = AudioManager::silent();
        let mut world = World::new();
        let mut ship = Ship::spawn(0.0, &mut audio);
        ship.pos = Vec2::new(100.0, 100.0);
        let ship = world.add(ship);
        let bullet = world.add(Bullet::spawn(Vec2::new(100.0, 100.0), 0.0, &mut audio));

        let hits = detect_collisions(&mut world);
        assert!(hits.is_empty());
        assert!(!flag(&world, ship));
        assert!(!flag(&world, bullet));
    }

    #[test]
    fn test_exempt_pair_does_not_stop_scan() {
        let mut audio = AudioManager::silent();
        let mut rng = Pcg32::seed_from_u64(11);
        let mut world = World::new();
        let mut ship = Ship::spawn(0.0, &mut audio);
        ship.pos = Vec2::new(500.0, 500.0);
        world.add(ship);
        let bullet = world.add(Bullet::spawn(Vec2::new(500.0, 500.0), 0.0, &mut audio));
        let rock = world.add(rock(Vec2::new(505.0, 500.0), &mut audio, &mut rng));

        let hits = detect_collisions(&mut world);
        assert_eq!(hits, vec![ScoredHit { asteroid: rock, bullet }]);
        assert!(flag(&world, rock));
    }

    #[test]
    fn test_one_bullet_scores_once() {
        let mut audio = AudioManager::silent();
        let mut rng = Pcg32::seed_from_u64(5);
        let mut world = World::new();
        let first = world.add(rock(Vec2::new(200.0, 200.0), &mut audio, &mut rng));
        let second = world.add(rock(Vec2::new(202.0, 200.0), &mut audio, &mut rng));
        let bullet = world.add(Bullet::spawn(Vec2::new(201.0, 200.0), 0.0, &mut audio));

        let hits = detect_collisions(&mut world);
        assert_eq!(hits, vec![ScoredHit { asteroid: first, bullet }]);
        // Both rocks still report the overlap
        assert!(flag(&world, first) && flag(&world, second));
    }

    #[test]
    fn test_flags_reset_each_pass() {
        let mut audio = AudioManager::silent();
        let mut rng = Pcg32::seed_from_u64(5);
        let mut world = World::new();
        let a = world.add(rock(Vec2::new(200.0, 200.0), &mut audio, &mut rng));
        let b = world.add(rock(Vec2::new(210.0, 200.0), &mut audio, &mut rng));
        detect_collisions(&mut world);
        assert!(flag(&world, a) && flag(&world, b));

        if let Some(e) = world.get_mut(b) {
            e.pos = Vec2::new(900.0, 700.0);
        }
        detect_collisions(&mut world);
        assert!(!flag(&world, a) && !flag(&world, b));
    }

    proptest! {
        #[test]
        fn prop_detection_symmetric_in_scan_order(
            ax in 0.0f32..1200.0, ay in 0.0f32..800.0,
            bx in 0.0f32..1200.0, by in 0.0f32..800.0,
            large_a in any::<bool>(), large_b in any::<bool>(),
        ) {
            let size = |large: bool| if large { AsteroidSize::Large } else { AsteroidSize::Small };
            let run = |first: (Vec2, AsteroidSize), second: (Vec2, AsteroidSize)| {
                let mut audio = AudioManager::silent();
                let mut rng = Pcg32::seed_from_u64(0);
                let mut world = World::new();
                let p = world.add(Asteroid::spawn(first.1, Some(first.0), &mut rng, &mut audio));
                let q = world.add(Asteroid::spawn(second.1, Some(second.0), &mut rng, &mut audio));
                detect_collisions(&mut world);
                (flag(&world, p), flag(&world, q))
            };

            let a = (Vec2::new(ax, ay), size(large_a));
            let b = (Vec2::new(bx, by), size(large_b));
            let (fa, fb) = run(a, b);
            let (rb, ra) = run(b, a);
            prop_assert_eq!(fa, fb);
            prop_assert_eq!(fa, ra);
            prop_assert_eq!(fb, rb);
            prop_assert_eq!(fa, circles_overlap(a.0, a.1.collision_radius(), b.0, b.1.collision_radius()));
        }
    }
}

//! Asteroids and their three size tiers

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::effects::Explosion;
use super::entity::{Body, Entity, EntityId, EntityKind, GameEvent};
use crate::audio::{AudioManager, SoundEffect, SoundHandle};
use crate::consts::{ASTEROID_CHILD_OFFSET, CANVAS_HEIGHT, CANVAS_WIDTH};
use crate::renderer::{RenderSurface, colors, shapes};
use crate::{heading, wrap_position};

/// Size tier. Level 1 is the largest; shooting a rock yields two of the next tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AsteroidSize {
    Large,
    Medium,
    Small,
}

impl AsteroidSize {
    pub const ALL: [AsteroidSize; 3] = [AsteroidSize::Large, AsteroidSize::Medium, AsteroidSize::Small];

    pub fn level(self) -> u32 {
        match self {
            AsteroidSize::Large => 1,
            AsteroidSize::Medium => 2,
            AsteroidSize::Small => 3,
        }
    }

    pub fn from_level(level: u32) -> Option<Self> {
        match level {
            1 => Some(AsteroidSize::Large),
            2 => Some(AsteroidSize::Medium),
            3 => Some(AsteroidSize::Small),
            _ => None,
        }
    }

    /// Outline radius
    pub fn radius(self) -> f32 {
        match self {
            AsteroidSize::Large => 50.0,
            AsteroidSize::Medium => 25.0,
            AsteroidSize::Small => 15.0,
        }
    }

    pub fn collision_radius(self) -> f32 {
        match self {
            AsteroidSize::Large => 46.0,
            AsteroidSize::Medium => 22.0,
            AsteroidSize::Small => 12.0,
        }
    }

    /// Travel speed (pixels/s)
    pub fn speed(self) -> f32 {
        match self {
            AsteroidSize::Large => 200.0,
            AsteroidSize::Medium => 240.0,
            AsteroidSize::Small => 275.0,
        }
    }

    pub fn score(self) -> u32 {
        match self {
            AsteroidSize::Large => 5,
            AsteroidSize::Medium => 7,
            AsteroidSize::Small => 9,
        }
    }

    /// Tier the fragments belong to; small rocks don't split
    pub fn child(self) -> Option<Self> {
        Self::from_level(self.level() + 1)
    }

    /// Random visual spin rate (radians/s); smaller rocks spin faster
    pub fn random_spin(self, rng: &mut Pcg32) -> f32 {
        let r: f32 = rng.random();
        match self {
            AsteroidSize::Large => (r + 0.1) * 2.75,
            AsteroidSize::Medium => (r + 0.15) * 3.25,
            AsteroidSize::Small => (r + 0.15) * 3.75,
        }
    }
}

#[derive(Debug)]
pub struct Asteroid {
    pub body: Body,
    pub size: AsteroidSize,
    /// Travel direction (radians), fixed for the rock's life
    pub angle: f32,
    spin_rate: f32,
    /// Outline rotation only; never affects travel
    spin: f32,
    explode_sound: SoundHandle,
}

impl Asteroid {
    pub fn new(size: AsteroidSize, rng: &mut Pcg32, audio: &mut AudioManager) -> Self {
        Self {
            body: Body::new(size.collision_radius()),
            size,
            angle: rng.random_range(0.0..std::f32::consts::TAU),
            spin_rate: size.random_spin(rng),
            spin: 0.0,
            explode_sound: audio.create_sound(SoundEffect::AsteroidExplode, false),
        }
    }

    /// A rock at `pos`, or at a random spot on the canvas
    pub fn spawn(
        size: AsteroidSize,
        pos: Option<Vec2>,
        rng: &mut Pcg32,
        audio: &mut AudioManager,
    ) -> Entity {
        let pos = pos.unwrap_or_else(|| {
            Vec2::new(
                rng.random_range(0.0..CANVAS_WIDTH),
                rng.random_range(0.0..CANVAS_HEIGHT),
            )
        });
        Entity::new(pos, EntityKind::Asteroid(Self::new(size, rng, audio)))
    }

    pub(crate) fn update(&mut self, pos: &mut Vec2, dt: f32) {
        self.spin += self.spin_rate * dt;
        *pos = wrap_position(*pos + heading(self.angle) * self.size.speed() * dt);
    }

    /// Shot by a bullet: score, debris, fragments, then removal.
    ///
    /// The returned events are applied in order by the caller.
    pub fn scored_hit(
        &self,
        id: EntityId,
        pos: Vec2,
        audio: &mut AudioManager,
        rng: &mut Pcg32,
    ) -> Vec<GameEvent> {
        audio.play(self.explode_sound);

        let mut events = vec![
            GameEvent::AddScore(self.size.score()),
            GameEvent::Spawn(Explosion::asteroid(pos, rng)),
        ];
        if let Some(child) = self.size.child() {
            let offset = Vec2::splat(ASTEROID_CHILD_OFFSET);
            for child_pos in [pos - offset, pos + offset] {
                events.push(GameEvent::Spawn(Self::spawn(child, Some(child_pos), rng, audio)));
            }
        }
        events.push(GameEvent::Despawn(id));
        events
    }

    pub(crate) fn release_sounds(&mut self, audio: &mut AudioManager) {
        audio.clean_up(self.explode_sound);
    }

    pub(crate) fn render(&self, pos: Vec2, surface: &mut dyn RenderSurface) {
        let outline = shapes::asteroid_outline(pos, self.size.radius(), self.angle + self.spin);
        surface.stroke_polygon(&outline, colors::ROCK);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_size_table() {
        let scores: Vec<u32> = AsteroidSize::ALL.iter().map(|s| s.score()).collect();
        assert_eq!(scores, vec![5, 7, 9]);
        assert_eq!(AsteroidSize::Large.child(), Some(AsteroidSize::Medium));
        assert_eq!(AsteroidSize::Medium.child(), Some(AsteroidSize::Small));
        assert_eq!(AsteroidSize::Small.child(), None);
        assert_eq!(AsteroidSize::from_level(4), None);
        for size in AsteroidSize::ALL {
            assert!(size.collision_radius() < size.radius());
            assert_eq!(AsteroidSize::from_level(size.level()), Some(size));
        }
    }

    #[test]
    fn test_scored_hit_fragments() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut audio = AudioManager::silent();
        let pos = Vec2::new(300.0, 200.0);
        let rock = Asteroid::new(AsteroidSize::Large, &mut rng, &mut audio);

        let events = rock.scored_hit(EntityId(9), pos, &mut audio, &mut rng);
        assert!(matches!(events.first(), Some(GameEvent::AddScore(5))));
        assert!(matches!(events.last(), Some(GameEvent::Despawn(EntityId(9)))));

        let children: Vec<(Vec2, AsteroidSize)> = events
            .iter()
            .filter_map(|e| match e {
                GameEvent::Spawn(entity) => entity.as_asteroid().map(|a| (entity.pos, a.size)),
                _ => None,
            })
            .collect();
        assert_eq!(
            children,
            vec![
                (Vec2::new(295.0, 195.0), AsteroidSize::Medium),
                (Vec2::new(305.0, 205.0), AsteroidSize::Medium),
            ]
        );
    }

    #[test]
    fn test_small_rock_leaves_no_fragments() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut audio = AudioManager::silent();
        let rock = Asteroid::new(AsteroidSize::Small, &mut rng, &mut audio);

        let events = rock.scored_hit(EntityId(2), Vec2::ZERO, &mut audio, &mut rng);
        let rocks = events
            .iter()
            .filter(|e| matches!(e, GameEvent::Spawn(entity) if entity.as_asteroid().is_some()))
            .count();
        assert_eq!(rocks, 0);
        assert!(matches!(events[0], GameEvent::AddScore(9)));
    }
}

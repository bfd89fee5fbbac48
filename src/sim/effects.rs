//! Particle effects: explosions and the ship's exhaust jet
//!
//! Particles fade linearly from full opacity over their lifespan and are
//! dropped once fully transparent. Neither effect collides with anything.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::entity::{Entity, EntityId, EntityKind, GameEvent};
use crate::renderer::{RenderSurface, Rgba, colors, with_alpha};

/// Particle launch speed range (pixels/s)
const PARTICLE_SPEED_MIN: f32 = 100.0;
const PARTICLE_SPEED_MAX: f32 = 600.0;

const ASTEROID_DEBRIS_COUNT: usize = 10;
const ASTEROID_DEBRIS_SIZE: f32 = 2.0;
const ASTEROID_DEBRIS_LIFESPAN: f32 = 1.0;

const SHIP_DEBRIS_COUNT: usize = 50;
const SHIP_DEBRIS_SIZE: f32 = 1.5;
const SHIP_DEBRIS_LIFESPAN: f32 = 2.0;
/// Weighted toward white
const SHIP_DEBRIS_COLORS: [Rgba; 7] = [
    colors::WHITE,
    colors::WHITE,
    colors::WHITE,
    colors::WHITE,
    colors::RED,
    colors::PINK,
    colors::SHIELD,
];

const JET_PARTICLES_PER_SEC: f32 = 255.0;
const JET_PARTICLE_SIZE: f32 = 2.0;
const JET_PARTICLE_LIFESPAN: f32 = 0.1;
const JET_SPEED_MULTIPLIER: f32 = 0.25;

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    pub color: Rgba,
    lifespan: f32,
    alpha: f32,
}

impl Particle {
    pub fn new(pos: Vec2, vel: Vec2, size: f32, color: Rgba, lifespan: f32) -> Self {
        Self {
            pos,
            vel,
            size,
            color,
            lifespan: lifespan.max(f32::EPSILON),
            alpha: 1.0,
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.pos += self.vel * dt;
        self.alpha = (self.alpha - dt / self.lifespan).max(0.0);
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn is_alive(&self) -> bool {
        self.alpha > 0.0
    }

    pub fn render(&self, surface: &mut dyn RenderSurface) {
        surface.fill_circle(self.pos, self.size, with_alpha(self.color, self.alpha));
    }
}

/// One-shot burst that removes itself when every particle has faded
#[derive(Debug, Clone)]
pub struct Explosion {
    particles: Vec<Particle>,
}

impl Explosion {
    /// Burst of `count` particles in random directions, colors picked from `palette`
    pub fn new(
        origin: Vec2,
        count: usize,
        size: f32,
        palette: &[Rgba],
        lifespan: f32,
        rng: &mut Pcg32,
    ) -> Self {
        let particles = (0..count)
            .map(|_| {
                let angle = rng.random_range(0.0..std::f32::consts::TAU);
                let speed = rng.random_range(PARTICLE_SPEED_MIN..PARTICLE_SPEED_MAX);
                let color = if palette.is_empty() {
                    colors::WHITE
                } else {
                    palette[rng.random_range(0..palette.len())]
                };
                Particle::new(origin, Vec2::from_angle(angle) * speed, size, color, lifespan)
            })
            .collect();
        Self { particles }
    }

    /// Brown debris from a shattered rock
    pub fn asteroid(pos: Vec2, rng: &mut Pcg32) -> Entity {
        let burst = Self::new(
            pos,
            ASTEROID_DEBRIS_COUNT,
            ASTEROID_DEBRIS_SIZE,
            &[colors::BROWN],
            ASTEROID_DEBRIS_LIFESPAN,
            rng,
        );
        Entity::new(pos, EntityKind::Explosion(burst))
    }

    /// Larger, longer burst for the ship
    pub fn ship(pos: Vec2, rng: &mut Pcg32) -> Entity {
        let burst = Self::new(
            pos,
            SHIP_DEBRIS_COUNT,
            SHIP_DEBRIS_SIZE,
            &SHIP_DEBRIS_COLORS,
            SHIP_DEBRIS_LIFESPAN,
            rng,
        );
        Entity::new(pos, EntityKind::Explosion(burst))
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub(crate) fn update(&mut self, id: EntityId, dt: f32, events: &mut Vec<GameEvent>) {
        for particle in &mut self.particles {
            particle.update(dt);
        }
        self.particles.retain(Particle::is_alive);

        if self.particles.is_empty() {
            events.push(GameEvent::Despawn(id));
        }
    }

    pub(crate) fn render(&self, surface: &mut dyn RenderSurface) {
        for particle in &self.particles {
            particle.render(surface);
        }
    }
}

/// Continuous exhaust owned by the ship
#[derive(Debug, Clone, Default)]
pub struct JetEmitter {
    particles: Vec<Particle>,
    emitting: bool,
    pos: Vec2,
    vel: Vec2,
    /// Fractional particles carried between frames
    backlog: f32,
}

impl JetEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self) {
        self.emitting = true;
    }

    pub fn stop(&mut self) {
        self.emitting = false;
        self.backlog = 0.0;
    }

    pub fn is_emitting(&self) -> bool {
        self.emitting
    }

    /// Emission point and the velocity new particles inherit (before scaling)
    pub fn set_location(&mut self, pos: Vec2, vel: Vec2) {
        self.pos = pos;
        self.vel = vel;
    }

    pub fn update(&mut self, dt: f32, rng: &mut Pcg32) {
        if self.emitting {
            self.backlog += JET_PARTICLES_PER_SEC * dt;
            let count = self.backlog.floor();
            self.backlog -= count;
            for _ in 0..count as usize {
                // Slight jitter so the plume isn't a single line
                let jitter = Vec2::new(rng.random_range(-1.0..1.0), rng.random_range(-1.0..1.0));
                self.particles.push(Particle::new(
                    self.pos + jitter,
                    self.vel * JET_SPEED_MULTIPLIER,
                    JET_PARTICLE_SIZE,
                    colors::ORANGE,
                    JET_PARTICLE_LIFESPAN,
                ));
            }
        }

        for particle in &mut self.particles {
            particle.update(dt);
        }
        self.particles.retain(Particle::is_alive);
    }

    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    pub fn render(&self, surface: &mut dyn RenderSurface) {
        for particle in &self.particles {
            particle.render(surface);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_particle_fades_over_lifespan() {
        let mut p = Particle::new(Vec2::ZERO, Vec2::new(10.0, 0.0), 1.0, colors::WHITE, 2.0);
        p.update(1.0);
        assert!((p.alpha() - 0.5).abs() < 1e-6);
        assert_eq!(p.pos, Vec2::new(10.0, 0.0));
        p.update(1.5);
        assert_eq!(p.alpha(), 0.0);
        assert!(!p.is_alive());
    }

    #[test]
    fn test_explosion_despawns_when_faded() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut burst = Explosion::new(Vec2::ZERO, 10, 2.0, &[colors::BROWN], 1.0, &mut rng);
        assert_eq!(burst.particles().len(), 10);
        for p in burst.particles() {
            let speed = p.vel.length();
            assert!((PARTICLE_SPEED_MIN - 0.01..=PARTICLE_SPEED_MAX + 0.01).contains(&speed));
        }

        let id = EntityId(4);
        let mut events = Vec::new();
        burst.update(id, 0.5, &mut events);
        assert!(events.is_empty());
        burst.update(id, 0.6, &mut events);
        assert!(matches!(events.as_slice(), [GameEvent::Despawn(EntityId(4))]));
    }

    #[test]
    fn test_jet_emits_only_while_started() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut jet = JetEmitter::new();
        jet.update(0.05, &mut rng);
        assert_eq!(jet.particle_count(), 0);

        jet.start();
        jet.update(0.02, &mut rng);
        // 255/s * 0.02s = 5.1
        assert_eq!(jet.particle_count(), 5);

        jet.stop();
        jet.update(0.2, &mut rng);
        assert_eq!(jet.particle_count(), 0);
    }
}

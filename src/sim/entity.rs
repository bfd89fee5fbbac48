//! Entity model
//!
//! Every live object (ship, rocks, bullets, explosions, HUD text) is an
//! [`Entity`]: a position plus an [`EntityKind`] variant. Entities never hold
//! references to the world; they report spawns, removals and scoring as
//! [`GameEvent`]s which the game applies right after the entity returns.

use glam::Vec2;
use rand_pcg::Pcg32;

use super::asteroid::Asteroid;
use super::bullet::Bullet;
use super::effects::Explosion;
use super::hud::HudElement;
use super::ship::Ship;
use crate::audio::AudioManager;
use crate::platform::InputSnapshot;
use crate::renderer::{RenderSurface, colors};
use crate::settings::DebugSettings;

/// Registry-assigned identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u32);

impl EntityId {
    /// Placeholder carried until the world assigns a real id
    pub const UNASSIGNED: EntityId = EntityId(0);
}

/// Collision state for physics-bearing entities
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub collision_radius: f32,
    /// Rewritten by the collision pass every frame
    pub is_colliding: bool,
}

impl Body {
    pub fn new(collision_radius: f32) -> Self {
        debug_assert!(collision_radius > 0.0);
        Self {
            collision_radius,
            is_colliding: false,
        }
    }
}

/// Which physics variant a body belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhysicsKind {
    Ship,
    Bullet,
    Asteroid,
}

impl PhysicsKind {
    /// Pairs that never register a collision
    pub fn is_exempt_with(self, other: PhysicsKind) -> bool {
        matches!(
            (self, other),
            (PhysicsKind::Ship, PhysicsKind::Bullet) | (PhysicsKind::Bullet, PhysicsKind::Ship)
        )
    }
}

/// Variant tag, used for bulk removal and counting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityTag {
    Ship,
    Asteroid,
    Bullet,
    Explosion,
    Message,
    ScoreCounter,
    LivesCounter,
    DebugHud,
}

#[derive(Debug)]
pub enum EntityKind {
    Ship(Ship),
    Asteroid(Asteroid),
    Bullet(Bullet),
    Explosion(Explosion),
    Hud(HudElement),
}

/// Side effects requested by an entity (or by collision resolution)
#[derive(Debug)]
pub enum GameEvent {
    Spawn(Entity),
    Despawn(EntityId),
    AddScore(u32),
    ShipDestroyed,
}

/// Everything an entity may read or trigger during its update
pub struct UpdateCtx<'a> {
    pub input: &'a InputSnapshot,
    pub audio: &'a mut AudioManager,
    pub rng: &'a mut Pcg32,
    pub debug: &'a DebugSettings,
    pub events: &'a mut Vec<GameEvent>,
}

/// Render-time switches
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions {
    pub render_collision: bool,
}

/// A live game object
#[derive(Debug)]
pub struct Entity {
    id: EntityId,
    pub pos: Vec2,
    pub kind: EntityKind,
}

impl Entity {
    pub fn new(pos: Vec2, kind: EntityKind) -> Self {
        Self {
            id: EntityId::UNASSIGNED,
            pos,
            kind,
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub(crate) fn assign_id(&mut self, id: EntityId) {
        self.id = id;
    }

    pub fn tag(&self) -> EntityTag {
        match &self.kind {
            EntityKind::Ship(_) => EntityTag::Ship,
            EntityKind::Asteroid(_) => EntityTag::Asteroid,
            EntityKind::Bullet(_) => EntityTag::Bullet,
            EntityKind::Explosion(_) => EntityTag::Explosion,
            EntityKind::Hud(hud) => hud.tag(),
        }
    }

    pub fn physics_kind(&self) -> Option<PhysicsKind> {
        match &self.kind {
            EntityKind::Ship(_) => Some(PhysicsKind::Ship),
            EntityKind::Asteroid(_) => Some(PhysicsKind::Asteroid),
            EntityKind::Bullet(_) => Some(PhysicsKind::Bullet),
            EntityKind::Explosion(_) | EntityKind::Hud(_) => None,
        }
    }

    pub fn body(&self) -> Option<&Body> {
        match &self.kind {
            EntityKind::Ship(ship) => Some(&ship.body),
            EntityKind::Asteroid(rock) => Some(&rock.body),
            EntityKind::Bullet(bullet) => Some(&bullet.body),
            EntityKind::Explosion(_) | EntityKind::Hud(_) => None,
        }
    }

    pub fn body_mut(&mut self) -> Option<&mut Body> {
        match &mut self.kind {
            EntityKind::Ship(ship) => Some(&mut ship.body),
            EntityKind::Asteroid(rock) => Some(&mut rock.body),
            EntityKind::Bullet(bullet) => Some(&mut bullet.body),
            EntityKind::Explosion(_) | EntityKind::Hud(_) => None,
        }
    }

    pub fn as_ship(&self) -> Option<&Ship> {
        match &self.kind {
            EntityKind::Ship(ship) => Some(ship),
            _ => None,
        }
    }

    pub fn as_ship_mut(&mut self) -> Option<&mut Ship> {
        match &mut self.kind {
            EntityKind::Ship(ship) => Some(ship),
            _ => None,
        }
    }

    pub fn as_asteroid(&self) -> Option<&Asteroid> {
        match &self.kind {
            EntityKind::Asteroid(rock) => Some(rock),
            _ => None,
        }
    }

    pub fn update(&mut self, dt: f32, ctx: &mut UpdateCtx) {
        let id = self.id;
        match &mut self.kind {
            EntityKind::Ship(ship) => ship.update(&mut self.pos, dt, ctx),
            EntityKind::Asteroid(rock) => rock.update(&mut self.pos, dt),
            EntityKind::Bullet(bullet) => bullet.update(id, &mut self.pos, dt, ctx),
            EntityKind::Explosion(explosion) => explosion.update(id, dt, ctx.events),
            EntityKind::Hud(_) => {}
        }
    }

    pub fn render(&self, surface: &mut dyn RenderSurface, opts: &RenderOptions) {
        match &self.kind {
            EntityKind::Ship(ship) => {
                // Nothing (not even the collision circle) before materializing
                if !ship.is_materialized() {
                    return;
                }
                self.render_collision(surface, opts);
                ship.render(self.pos, surface);
            }
            EntityKind::Asteroid(rock) => {
                self.render_collision(surface, opts);
                rock.render(self.pos, surface);
            }
            EntityKind::Bullet(bullet) => {
                self.render_collision(surface, opts);
                bullet.render(self.pos, surface);
            }
            EntityKind::Explosion(explosion) => explosion.render(surface),
            EntityKind::Hud(hud) => hud.render(self.pos, surface),
        }
    }

    fn render_collision(&self, surface: &mut dyn RenderSurface, opts: &RenderOptions) {
        if !opts.render_collision {
            return;
        }
        if let Some(body) = self.body() {
            let color = if body.is_colliding {
                colors::RED
            } else {
                colors::YELLOW
            };
            surface.stroke_circle(self.pos, body.collision_radius, color);
        }
    }

    /// Hand every owned sound handle back to the audio manager.
    ///
    /// Called exactly once, by the world handle, when the entity is removed.
    pub(crate) fn release_sounds(&mut self, audio: &mut AudioManager) {
        match &mut self.kind {
            EntityKind::Ship(ship) => ship.release_sounds(audio),
            EntityKind::Asteroid(rock) => rock.release_sounds(audio),
            EntityKind::Bullet(bullet) => bullet.release_sounds(audio),
            EntityKind::Explosion(_) | EntityKind::Hud(_) => {}
        }
    }
}

//! The player's ship

use glam::Vec2;

use super::bullet::Bullet;
use super::effects::{Explosion, JetEmitter};
use super::entity::{Body, Entity, EntityKind, GameEvent, UpdateCtx};
use crate::audio::{AudioManager, SoundEffect, SoundHandle};
use crate::consts::*;
use crate::renderer::{RenderSurface, colors, shapes, with_alpha};
use crate::{canvas_center, heading, normalize_angle, wrap_position};

/// Sounds owned by one ship
#[derive(Debug, Clone, Copy)]
struct ShipSounds {
    shield_down: SoundHandle,
    explode: SoundHandle,
    respawn: SoundHandle,
    thrusters: SoundHandle,
}

#[derive(Debug)]
pub struct Ship {
    pub body: Body,
    /// Facing (radians)
    pub angle: f32,
    pub vel: Vec2,
    /// Invulnerable while > 0
    pub shield_timer: f32,
    /// Inert (no update, no render) while > 0
    pub respawn_timer: f32,
    /// Can fire once this reaches 0
    pub fire_cooldown: f32,
    materialized: bool,
    thrusting: bool,
    jet: JetEmitter,
    sounds: ShipSounds,
}

impl Ship {
    pub fn new(respawn_delay: f32, audio: &mut AudioManager) -> Self {
        Self {
            body: Body::new(SHIP_COLLISION_RADIUS),
            angle: -std::f32::consts::FRAC_PI_2, // Nose up
            vel: Vec2::ZERO,
            shield_timer: SHIP_SHIELD_TIME,
            respawn_timer: respawn_delay.max(0.0),
            fire_cooldown: 0.0,
            materialized: false,
            thrusting: false,
            jet: JetEmitter::new(),
            sounds: ShipSounds {
                shield_down: audio.create_sound(SoundEffect::ShieldDown, false),
                explode: audio.create_sound(SoundEffect::ShipExplode, false),
                respawn: audio.create_sound(SoundEffect::ShipRespawn, false),
                thrusters: audio.create_sound(SoundEffect::ShipThrusters, true),
            },
        }
    }

    /// A ship entity at screen center
    pub fn spawn(respawn_delay: f32, audio: &mut AudioManager) -> Entity {
        Entity::new(canvas_center(), EntityKind::Ship(Self::new(respawn_delay, audio)))
    }

    pub fn is_materialized(&self) -> bool {
        self.respawn_timer <= 0.0
    }

    pub fn is_shielded(&self) -> bool {
        self.shield_timer > 0.0
    }

    /// Where bullets leave the ship
    pub fn nose(&self, pos: Vec2) -> Vec2 {
        pos + heading(self.angle) * SHIP_RADIUS
    }

    pub(crate) fn update(&mut self, pos: &mut Vec2, dt: f32, ctx: &mut UpdateCtx) {
        self.respawn_timer = (self.respawn_timer - dt).max(0.0);
        if self.respawn_timer > 0.0 {
            return;
        }

        if !self.materialized {
            ctx.audio.play(self.sounds.respawn);
            self.materialized = true;
        }

        if ctx.debug.debug_shields {
            self.shield_timer = SHIP_SHIELD_TIME;
        }

        // Flag comes from last frame's collision pass
        if self.body.is_colliding && self.shield_timer <= 0.0 {
            self.destroyed(*pos, ctx);
            return;
        }

        self.fire_cooldown = (self.fire_cooldown - dt).max(0.0);

        let input = *ctx.input;
        let mut turn = 0.0;
        if input.left {
            turn = -1.0;
        }
        if input.right {
            turn = 1.0;
        }

        if input.fire && self.fire_cooldown <= 0.0 {
            let bullet = Bullet::spawn(self.nose(*pos), self.angle, ctx.audio);
            ctx.events.push(GameEvent::Spawn(bullet));
            self.fire_cooldown = BULLET_FIRE_DELAY;
        }

        // Thruster sound and jet follow the forward key edges
        if input.forward != self.thrusting {
            self.thrusting = input.forward;
            if self.thrusting {
                ctx.audio.play(self.sounds.thrusters);
                self.jet.start();
            } else {
                ctx.audio.stop(self.sounds.thrusters);
                self.jet.stop();
            }
        }

        self.angle = normalize_angle(self.angle + SHIP_ROTATE_SPEED * turn * dt);
        let dir = heading(self.angle);
        if self.thrusting {
            self.vel += dir * SHIP_THRUST * dt;
        }
        self.vel *= SHIP_VELOCITY_DECAY.powf(dt);
        *pos = wrap_position(*pos + self.vel * dt);

        // Exhaust leaves from the tail, opposite the direction of travel
        self.jet.set_location(*pos - dir * (SHIP_RADIUS / 2.0), -self.vel);
        self.jet.update(dt, ctx.rng);

        // Shield cue fires once, on the way down to zero
        let previous = self.shield_timer;
        self.shield_timer = (self.shield_timer - dt).max(0.0);
        if previous > 0.0 && self.shield_timer <= 0.0 {
            ctx.audio.play(self.sounds.shield_down);
        }
    }

    fn destroyed(&mut self, pos: Vec2, ctx: &mut UpdateCtx) {
        ctx.audio.play(self.sounds.explode);
        ctx.events.push(GameEvent::Spawn(Explosion::ship(pos, ctx.rng)));
        self.clean_up_effects(ctx.audio);
        ctx.events.push(GameEvent::ShipDestroyed);
    }

    /// Silence the thrusters and shut the jet off
    pub fn clean_up_effects(&mut self, audio: &mut AudioManager) {
        audio.stop(self.sounds.thrusters);
        self.thrusting = false;
        self.jet.stop();
    }

    pub(crate) fn release_sounds(&mut self, audio: &mut AudioManager) {
        audio.stop(self.sounds.thrusters);
        audio.clean_up(self.sounds.shield_down);
        audio.clean_up(self.sounds.explode);
        audio.clean_up(self.sounds.respawn);
        audio.clean_up(self.sounds.thrusters);
    }

    pub(crate) fn render(&self, pos: Vec2, surface: &mut dyn RenderSurface) {
        self.jet.render(surface);

        let outline = shapes::ship_outline(pos, self.angle, SHIP_RADIUS);
        surface.stroke_polygon(&outline, colors::WHITE);
        surface.stroke_circle(self.nose(pos), 1.5, colors::RED);

        if self.shield_timer > 0.0 {
            // Fades out over the last second
            let opacity = if self.shield_timer > 1.0 {
                0.9
            } else {
                self.shield_timer
            };
            surface.stroke_circle(
                pos,
                self.body.collision_radius * 1.75,
                with_alpha(colors::SHIELD, opacity),
            );
        }
    }
}

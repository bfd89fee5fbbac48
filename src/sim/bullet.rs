//! Ship bullets
//!
//! Bullets fly straight at constant speed and live until they leave the
//! screen; there is no lifetime timer.

use glam::Vec2;

use super::entity::{Body, Entity, EntityId, EntityKind, GameEvent, UpdateCtx};
use crate::audio::{AudioManager, SoundEffect, SoundHandle};
use crate::consts::*;
use crate::heading;
use crate::renderer::{RenderSurface, colors};

#[derive(Debug)]
pub struct Bullet {
    pub body: Body,
    /// Fixed at spawn
    pub angle: f32,
    shot_sound: SoundHandle,
    sound_played: bool,
}

impl Bullet {
    pub fn new(angle: f32, audio: &mut AudioManager) -> Self {
        Self {
            body: Body::new(BULLET_COLLISION_RADIUS),
            angle,
            shot_sound: audio.create_sound(SoundEffect::ShootBullet, false),
            sound_played: false,
        }
    }

    /// Bullet entity leaving `nose` along `angle`
    pub fn spawn(nose: Vec2, angle: f32, audio: &mut AudioManager) -> Entity {
        Entity::new(nose, EntityKind::Bullet(Self::new(angle, audio)))
    }

    pub(crate) fn update(&mut self, id: EntityId, pos: &mut Vec2, dt: f32, ctx: &mut UpdateCtx) {
        if !self.sound_played {
            ctx.audio.play(self.shot_sound);
            self.sound_played = true;
        }

        *pos += heading(self.angle) * BULLET_SPEED * dt;

        if is_off_screen(*pos) {
            ctx.events.push(GameEvent::Despawn(id));
        }
    }

    pub(crate) fn release_sounds(&mut self, audio: &mut AudioManager) {
        audio.clean_up(self.shot_sound);
    }

    pub(crate) fn render(&self, pos: Vec2, surface: &mut dyn RenderSurface) {
        surface.fill_rect(pos, Vec2::splat(BULLET_SIZE), colors::PINK);
    }
}

/// Past the canvas edge by more than the margin
pub fn is_off_screen(pos: Vec2) -> bool {
    let m = BULLET_OFFSCREEN_MARGIN;
    pos.x < -m || pos.y < -m || pos.x > CANVAS_WIDTH + m || pos.y > CANVAS_HEIGHT + m
}

//! Asteroid Field - a classic 2D Asteroids arcade game
//!
//! Core modules:
//! - `sim`: Frame-stepped simulation (entity registry, collisions, game director)
//! - `audio`: Fire-and-forget sound effect triggers
//! - `renderer`: Draw surface abstraction and outline shapes
//! - `platform`: Keyboard action snapshots and frame timing
//! - `settings`: Audio and debug configuration

pub mod audio;
pub mod error;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use error::ConfigError;
pub use settings::{DebugSettings, Settings};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Logical canvas size (pixels, origin top-left)
    pub const CANVAS_WIDTH: f32 = 1200.0;
    pub const CANVAS_HEIGHT: f32 = 800.0;

    /// Largest frame delta the simulation will integrate (tab refocus guard)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Lives granted at every level setup
    pub const STARTING_LIVES: u32 = 3;
    /// Bonus awarded per remaining life when a level is cleared
    pub const BONUS_PER_LIFE: u32 = 25;

    /// Ship outline radius
    pub const SHIP_RADIUS: f32 = 15.0;
    pub const SHIP_COLLISION_RADIUS: f32 = 11.0;
    /// Thrust acceleration (pixels/s²)
    pub const SHIP_THRUST: f32 = 600.0;
    /// Turn rate (radians/s)
    pub const SHIP_ROTATE_SPEED: f32 = 5.7;
    /// Fraction of velocity kept after one second of coasting
    pub const SHIP_VELOCITY_DECAY: f32 = 0.5;
    /// Shield duration after every (re)spawn (seconds)
    pub const SHIP_SHIELD_TIME: f32 = 2.0;
    /// Delay before a replacement ship materializes (seconds)
    pub const SHIP_RESPAWN_DELAY: f32 = 2.0;
    /// Minimum time between shots (seconds)
    pub const BULLET_FIRE_DELAY: f32 = 0.2;

    /// Bullet defaults
    pub const BULLET_SPEED: f32 = 2000.0;
    pub const BULLET_COLLISION_RADIUS: f32 = 3.0;
    pub const BULLET_SIZE: f32 = 4.0;
    /// Distance past the canvas edge at which a bullet removes itself
    pub const BULLET_OFFSCREEN_MARGIN: f32 = 25.0;

    /// Child asteroids spawn this far (on both axes) from their parent
    pub const ASTEROID_CHILD_OFFSET: f32 = 5.0;
}

/// Unit vector pointing along `angle` (radians)
#[inline]
pub fn heading(angle: f32) -> Vec2 {
    Vec2::from_angle(angle)
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Wrap a position that left the canvas back onto the opposite edge
pub fn wrap_position(mut pos: Vec2) -> Vec2 {
    use consts::{CANVAS_HEIGHT, CANVAS_WIDTH};
    if pos.x < 0.0 {
        pos.x = CANVAS_WIDTH;
    } else if pos.x > CANVAS_WIDTH {
        pos.x = 0.0;
    }
    if pos.y < 0.0 {
        pos.y = CANVAS_HEIGHT;
    } else if pos.y > CANVAS_HEIGHT {
        pos.y = 0.0;
    }
    pos
}

/// Screen center, where every ship spawns
#[inline]
pub fn canvas_center() -> Vec2 {
    Vec2::new(consts::CANVAS_WIDTH / 2.0, consts::CANVAS_HEIGHT / 2.0)
}

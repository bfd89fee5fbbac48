//! Frame-stepped simulation
//!
//! All gameplay logic lives here:
//! - Seeded RNG only (same seed, same inputs, same game)
//! - Insertion-ordered entity iteration
//! - No platform dependencies; output goes through the audio and render traits

pub mod asteroid;
pub mod bullet;
pub mod collision;
pub mod director;
pub mod effects;
pub mod entity;
pub mod hud;
pub mod ship;
pub mod state;
pub mod tick;
pub mod world;

pub use asteroid::{Asteroid, AsteroidSize};
pub use bullet::Bullet;
pub use collision::{ScoredHit, circles_overlap, detect_collisions};
pub use director::{GameDirector, GamePhase, LevelTable, Wave};
pub use effects::{Explosion, JetEmitter, Particle};
pub use entity::{
    Body, Entity, EntityId, EntityKind, EntityTag, GameEvent, PhysicsKind, RenderOptions,
    UpdateCtx,
};
pub use hud::{HudElement, HudStats, Message};
pub use ship::Ship;
pub use state::Game;
pub use tick::{render, tick};
pub use world::{Stage, World};

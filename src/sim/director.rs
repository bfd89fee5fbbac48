//! Game director: the top-level phase machine
//!
//! ```text
//! Start ──Enter──▶ LevelSetup ──▶ LevelRunning ──rocks cleared──▶ LevelComplete
//!                      ▲              │    │                           │
//!                      │              │    └─last level cleared──┐     │
//!                      │        lives gone                       ▼     │
//!                      └──Enter── GameOver ◀─────────────────────┘     │
//!                      └───────────────────────────Enter───────────────┘
//! ```
//!
//! Level setup is transient: it spawns the wave and the ship and hands over to
//! `LevelRunning` within the same call.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::asteroid::{Asteroid, AsteroidSize};
use super::entity::EntityTag;
use super::hud::{HudElement, HudStats, Message};
use super::ship::Ship;
use super::world::Stage;
use crate::audio::{AudioManager, SoundEffect, SoundHandle};
use crate::consts::{BONUS_PER_LIFE, SHIP_RESPAWN_DELAY, STARTING_LIVES};
use crate::error::ConfigError;
use crate::platform::InputSnapshot;
use crate::renderer::colors;

/// Current phase of play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen over drifting rocks
    Start,
    /// Spawning the wave (never observed between frames)
    LevelSetup,
    /// Active gameplay
    LevelRunning,
    /// Waiting for Enter to start the next level
    LevelComplete,
    /// Lost every life, or cleared the final level
    GameOver,
}

impl fmt::Display for GamePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GamePhase::Start => "START",
            GamePhase::LevelSetup => "LEVEL_SETUP",
            GamePhase::LevelRunning => "LEVEL_RUNNING",
            GamePhase::LevelComplete => "LEVEL_COMPLETE",
            GamePhase::GameOver => "GAME_OVER",
        };
        f.write_str(name)
    }
}

/// Asteroid counts per size for one level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wave {
    pub large: u32,
    pub medium: u32,
    pub small: u32,
}

impl Wave {
    pub const fn new(large: u32, medium: u32, small: u32) -> Self {
        Self {
            large,
            medium,
            small,
        }
    }

    pub fn count(&self, size: AsteroidSize) -> u32 {
        match size {
            AsteroidSize::Large => self.large,
            AsteroidSize::Medium => self.medium,
            AsteroidSize::Small => self.small,
        }
    }

    pub fn total(&self) -> u32 {
        self.large + self.medium + self.small
    }
}

/// Ordered waves; level `n` uses entry `n - 1`. Clearing the last one wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelTable {
    waves: Vec<Wave>,
}

impl Default for LevelTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl LevelTable {
    pub fn standard() -> Self {
        Self {
            waves: vec![
                Wave::new(6, 0, 0),
                Wave::new(7, 2, 0),
                Wave::new(8, 4, 3),
                Wave::new(9, 6, 6),
                Wave::new(10, 8, 9),
            ],
        }
    }

    /// Two short levels for testing the level flow
    pub fn easy() -> Self {
        Self {
            waves: vec![Wave::new(1, 1, 1), Wave::new(1, 1, 2)],
        }
    }

    /// Wave for a 1-based level
    pub fn wave(&self, level: u32) -> Result<Wave, ConfigError> {
        level
            .checked_sub(1)
            .and_then(|i| self.waves.get(i as usize))
            .copied()
            .ok_or(ConfigError::UnknownLevel(level))
    }

    /// Number of levels; clearing this one completes the mission
    pub fn len(&self) -> u32 {
        self.waves.len() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.waves.is_empty()
    }

    pub fn is_last(&self, level: u32) -> bool {
        level >= self.len()
    }
}

pub struct GameDirector {
    phase: GamePhase,
    /// 1-based
    level: u32,
    lives: u32,
    score: u32,
    /// Live rock count, recomputed every running frame
    asteroids: usize,
    levels: LevelTable,
    /// Set on an unrecoverable configuration error; the machine stops advancing
    halted: bool,
    game_over_sound: SoundHandle,
    mission_complete_sound: SoundHandle,
}

impl GameDirector {
    pub fn new(levels: LevelTable, audio: &mut AudioManager) -> Self {
        Self {
            phase: GamePhase::Start,
            level: 1,
            lives: 0,
            score: 0,
            asteroids: 0,
            levels,
            halted: false,
            game_over_sound: audio.create_sound(SoundEffect::GameOver, false),
            mission_complete_sound: audio.create_sound(SoundEffect::MissionComplete, false),
        }
    }

    /// Title screen: HUD, banner and a field of drifting rocks
    pub fn init(&mut self, stage: &mut Stage, debug_hud: bool) {
        if debug_hud {
            stage.spawn(HudElement::debug_readout());
        }
        stage.spawn(HudElement::lives_counter());
        stage.spawn(HudElement::score_counter());
        stage.spawn(Message::new("Asteroids", "Press Enter To Start").into_entity());
        self.spawn_asteroids(stage, Wave::new(6, 3, 2));
        self.phase = GamePhase::Start;
    }

    /// Advance the machine; runs once per frame after collision resolution
    pub fn check_state(&mut self, input: &InputSnapshot, stage: &mut Stage) {
        if self.halted {
            return;
        }

        match self.phase {
            GamePhase::Start | GamePhase::GameOver => {
                if input.start {
                    stage.despawn_all(EntityTag::Message);
                    self.new_game(stage);
                }
            }
            GamePhase::LevelSetup => {}
            GamePhase::LevelRunning => {
                self.track_asteroids(stage);
                if self.asteroids == 0 {
                    if self.levels.is_last(self.level) {
                        self.mission_complete(stage);
                    } else {
                        self.level_complete(stage);
                    }
                }
            }
            GamePhase::LevelComplete => {
                if input.start {
                    stage.despawn_all(EntityTag::Message);
                    self.next_level(stage);
                }
            }
        }
    }

    /// Score back to zero, level 1
    pub fn new_game(&mut self, stage: &mut Stage) {
        log::info!("New game");
        self.level = 1;
        self.score = 0;
        self.set_phase(GamePhase::LevelSetup);
        self.level_setup(stage);
    }

    pub fn next_level(&mut self, stage: &mut Stage) {
        self.level += 1;
        self.set_phase(GamePhase::LevelSetup);
        self.level_setup(stage);
    }

    fn level_setup(&mut self, stage: &mut Stage) {
        stage.despawn_all(EntityTag::Asteroid);
        stage.despawn_all(EntityTag::Ship);

        self.lives = STARTING_LIVES;
        self.asteroids = 0;

        let wave = match self.levels.wave(self.level) {
            Ok(wave) => wave,
            Err(e) => {
                log::error!("Level setup failed, halting: {}", e);
                self.halted = true;
                return;
            }
        };
        log::info!(
            "Level {}: {} large, {} medium, {} small",
            self.level,
            wave.large,
            wave.medium,
            wave.small
        );
        self.spawn_asteroids(stage, wave);
        let ship = Ship::spawn(0.0, stage.audio);
        stage.spawn(ship);

        self.set_phase(GamePhase::LevelRunning);
    }

    fn level_complete(&mut self, stage: &mut Stage) {
        self.set_phase(GamePhase::LevelComplete);
        self.remove_ship(stage);
        self.add_score(self.lives * BONUS_PER_LIFE);
        let title = format!("LEVEL {} COMPLETE", self.level);
        stage.spawn(Message::new(title, "Press Enter To Continue.").into_entity());
    }

    fn mission_complete(&mut self, stage: &mut Stage) {
        self.remove_ship(stage);
        self.set_phase(GamePhase::GameOver);
        stage.audio.play(self.mission_complete_sound);
        let msg = Message::new("MISSION COMPLETE", "Press Enter To Play Again")
            .with_colors(colors::LIME, colors::LIME);
        stage.spawn(msg.into_entity());
    }

    fn game_over(&mut self, stage: &mut Stage) {
        self.set_phase(GamePhase::GameOver);
        let msg = Message::new("GAME OVER", "Press Enter To Try Again")
            .with_colors(colors::RED, colors::RED);
        stage.spawn(msg.into_entity());
        stage.audio.play(self.game_over_sound);
    }

    /// The ship took a lethal hit (it has already exploded)
    pub fn resolve_ship_hit(&mut self, stage: &mut Stage) {
        if self.phase != GamePhase::LevelRunning {
            log::debug!("Ignoring ship hit during {}", self.phase);
            return;
        }

        self.lives = self.lives.saturating_sub(1);
        stage.despawn_all(EntityTag::Ship);
        log::info!("Ship destroyed, {} lives left", self.lives);

        if self.lives == 0 {
            self.game_over(stage);
            return;
        }
        let ship = Ship::spawn(SHIP_RESPAWN_DELAY, stage.audio);
        stage.spawn(ship);
    }

    pub fn add_score(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
    }

    /// Recount live asteroids
    pub fn track_asteroids(&mut self, stage: &Stage) {
        self.asteroids = stage.count(EntityTag::Asteroid);
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn asteroids(&self) -> usize {
        self.asteroids
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    pub fn levels(&self) -> &LevelTable {
        &self.levels
    }

    pub fn hud_stats(&self, fps: u32) -> HudStats {
        HudStats {
            phase: self.phase,
            score: self.score,
            lives: self.lives,
            asteroids: self.asteroids,
            fps,
        }
    }

    /// Hand back the director's own sounds (end of session)
    pub fn release_sounds(&mut self, audio: &mut AudioManager) {
        audio.clean_up(self.game_over_sound);
        audio.clean_up(self.mission_complete_sound);
    }

    fn remove_ship(&mut self, stage: &mut Stage) {
        for entity in stage.world.iter_mut() {
            if let Some(ship) = entity.as_ship_mut() {
                ship.clean_up_effects(stage.audio);
            }
        }
        stage.despawn_all(EntityTag::Ship);
    }

    fn spawn_asteroids(&mut self, stage: &mut Stage, wave: Wave) {
        for size in AsteroidSize::ALL {
            for _ in 0..wave.count(size) {
                let rock = Asteroid::spawn(size, None, stage.rng, stage.audio);
                stage.spawn(rock);
            }
        }
    }

    fn set_phase(&mut self, phase: GamePhase) {
        if self.phase != phase {
            log::info!("Phase {} -> {}", self.phase, phase);
        }
        self.phase = phase;
    }
}

//! Top-level game context
//!
//! One [`Game`] owns everything a session needs: the entity registry, the
//! director, audio and the seeded RNG. Lifecycle is construct → [`Game::init`]
//! → repeated [`super::tick`].

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::director::{GameDirector, LevelTable};
use super::entity::{EntityTag, GameEvent, RenderOptions};
use super::hud::HudStats;
use super::world::{Stage, World};
use crate::audio::{AudioBackend, AudioManager, NullBackend};
use crate::settings::Settings;

pub struct Game {
    /// Run seed for reproducibility
    pub seed: u64,
    pub world: World,
    pub director: GameDirector,
    pub audio: AudioManager,
    pub settings: Settings,
    pub(crate) rng: Pcg32,
    /// Last measured frame rate, shown by the debug HUD
    fps: u32,
}

impl Game {
    pub fn new(seed: u64, settings: Settings, backend: Box<dyn AudioBackend>) -> Self {
        let mut audio = AudioManager::new(backend, &settings);
        let levels = if settings.debug.easy_levels {
            LevelTable::easy()
        } else {
            LevelTable::standard()
        };
        let director = GameDirector::new(levels, &mut audio);

        Self {
            seed,
            world: World::new(),
            director,
            audio,
            settings,
            rng: Pcg32::seed_from_u64(seed),
            fps: 0,
        }
    }

    /// Default settings, no sound output
    pub fn headless(seed: u64) -> Self {
        Self::new(seed, Settings::default(), Box::new(NullBackend))
    }

    /// Populate the title screen
    pub fn init(&mut self) {
        let debug_hud = self.settings.debug.debug_hud;
        let mut stage = Stage::new(&mut self.world, &mut self.audio, &mut self.rng);
        self.director.init(&mut stage, debug_hud);
        log::info!("Game initialized (seed {})", self.seed);
    }

    pub fn stage(&mut self) -> Stage<'_> {
        Stage::new(&mut self.world, &mut self.audio, &mut self.rng)
    }

    pub fn set_fps(&mut self, fps: u32) {
        self.fps = fps;
    }

    pub fn hud_stats(&self) -> HudStats {
        self.director.hud_stats(self.fps)
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            render_collision: self.settings.debug.render_collision,
        }
    }

    /// Apply entity requests in order.
    ///
    /// Despawning an id that is already gone is a no-op, so stale requests
    /// (a bullet leaving the screen on the frame it scored) are harmless.
    pub fn apply_events(&mut self, events: Vec<GameEvent>) {
        let mut stage = Stage::new(&mut self.world, &mut self.audio, &mut self.rng);
        for event in events {
            match event {
                GameEvent::Spawn(entity) => {
                    stage.spawn(entity);
                }
                GameEvent::Despawn(id) => {
                    stage.despawn(id);
                }
                GameEvent::AddScore(points) => self.director.add_score(points),
                GameEvent::ShipDestroyed => self.director.resolve_ship_hit(&mut stage),
            }
        }
    }

    /// Remove every entity and release all sounds
    pub fn shutdown(&mut self) {
        let mut stage = Stage::new(&mut self.world, &mut self.audio, &mut self.rng);
        for tag in [
            EntityTag::Ship,
            EntityTag::Asteroid,
            EntityTag::Bullet,
            EntityTag::Explosion,
            EntityTag::Message,
            EntityTag::ScoreCounter,
            EntityTag::LivesCounter,
            EntityTag::DebugHud,
        ] {
            stage.despawn_all(tag);
        }
        self.director.release_sounds(&mut self.audio);
        log::info!(
            "Shut down with score {} ({} sounds still live)",
            self.director.score(),
            self.audio.live_sounds()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::director::GamePhase;
    use crate::sim::hud::Message;

    #[test]
    fn test_init_builds_title_screen() {
        let mut game = Game::headless(1);
        game.init();
        assert_eq!(game.director.phase(), GamePhase::Start);
        assert_eq!(game.world.count_of(EntityTag::Asteroid), 11);
        assert_eq!(game.world.count_of(EntityTag::Message), 1);
        assert_eq!(game.world.count_of(EntityTag::DebugHud), 0);
    }

    #[test]
    fn test_easy_levels_setting() {
        let mut settings = Settings::default();
        settings.debug.easy_levels = true;
        settings.debug.debug_hud = true;
        let mut game = Game::new(1, settings, Box::new(NullBackend));
        assert_eq!(game.director.levels().len(), 2);
        game.init();
        assert_eq!(game.world.count_of(EntityTag::DebugHud), 1);
    }

    #[test]
    fn test_stale_despawn_is_ignored() {
        let mut game = Game::headless(1);
        let id = game.world.add(Message::new("a", "b").into_entity());
        game.apply_events(vec![
            GameEvent::Despawn(id),
            GameEvent::Despawn(id),
            GameEvent::AddScore(7),
        ]);
        assert!(game.world.is_empty());
        assert_eq!(game.director.score(), 7);
    }

    #[test]
    fn test_same_seed_same_field() {
        let positions = |seed| {
            let mut game = Game::headless(seed);
            game.init();
            game.world.iter().map(|e| e.pos).collect::<Vec<_>>()
        };
        assert_eq!(positions(9), positions(9));
        assert_ne!(positions(9), positions(10));
    }
}

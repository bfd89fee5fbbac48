//! Frame step
//!
//! One call to [`tick`] runs a full frame: entity updates, the collision pass
//! with bullet hit resolution, the director, then a HUD refresh. [`render`]
//! draws the result.

use super::collision::detect_collisions;
use super::entity::{EntityKind, GameEvent, UpdateCtx};
use super::state::Game;
use super::world::Stage;
use crate::platform::InputSnapshot;
use crate::platform::time::sanitize_dt;
use crate::renderer::{RenderSurface, colors};

/// Advance the game by `dt` seconds
pub fn tick(game: &mut Game, input: &InputSnapshot, dt: f32) {
    let dt = sanitize_dt(dt);

    // Entities spawned during this pass wait until next frame
    let mut events = Vec::new();
    for id in game.world.ids() {
        let Some(entity) = game.world.get_mut(id) else {
            continue;
        };
        let mut ctx = UpdateCtx {
            input,
            audio: &mut game.audio,
            rng: &mut game.rng,
            debug: &game.settings.debug,
            events: &mut events,
        };
        entity.update(dt, &mut ctx);
        if !events.is_empty() {
            game.apply_events(std::mem::take(&mut events));
        }
    }

    for hit in detect_collisions(&mut game.world) {
        if !game.world.contains(hit.bullet) {
            continue;
        }
        let Some(entity) = game.world.get(hit.asteroid) else {
            continue;
        };
        let Some(rock) = entity.as_asteroid() else {
            continue;
        };
        let mut events = vec![GameEvent::Despawn(hit.bullet)];
        events.extend(rock.scored_hit(hit.asteroid, entity.pos, &mut game.audio, &mut game.rng));
        game.apply_events(events);
    }

    let mut stage = Stage::new(&mut game.world, &mut game.audio, &mut game.rng);
    game.director.check_state(input, &mut stage);

    // HUD shows this frame's outcome
    let stats = game.hud_stats();
    for entity in game.world.iter_mut() {
        if let EntityKind::Hud(hud) = &mut entity.kind {
            hud.update(&stats);
        }
    }
}

/// Draw every entity in insertion order
pub fn render(game: &Game, surface: &mut dyn RenderSurface) {
    surface.clear(colors::BLACK);
    let opts = game.render_options();
    for entity in game.world.iter() {
        entity.render(surface, &opts);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    use crate::audio::{AudioCall, RecordingBackend, SoundEffect};
    use crate::consts::*;
    use crate::renderer::DrawList;
    use crate::settings::Settings;
    use crate::sim::asteroid::{Asteroid, AsteroidSize};
    use crate::sim::bullet::Bullet;
    use crate::sim::director::GamePhase;
    use crate::sim::entity::EntityTag;
    use crate::canvas_center;

    const DT: f32 = 0.02;

    fn press_start() -> InputSnapshot {
        InputSnapshot {
            start: true,
            ..Default::default()
        }
    }

    fn started(seed: u64) -> Game {
        let mut game = Game::headless(seed);
        game.init();
        tick(&mut game, &press_start(), DT);
        game
    }

    /// Leave a single small rock sitting on the ship
    fn rock_on_ship(game: &mut Game) -> crate::sim::entity::EntityId {
        game.stage().despawn_all(EntityTag::Asteroid);
        let rock = Asteroid::spawn(
            AsteroidSize::Small,
            Some(canvas_center()),
            &mut game.rng,
            &mut game.audio,
        );
        game.world.add(rock)
    }

    fn pin(game: &mut Game, id: crate::sim::entity::EntityId) {
        if let Some(rock) = game.world.get_mut(id) {
            rock.pos = canvas_center();
        }
    }

    #[test]
    fn test_start_spawns_first_wave() {
        let game = started(3);
        assert_eq!(game.director.phase(), GamePhase::LevelRunning);
        assert_eq!(game.director.lives(), STARTING_LIVES);
        let large = game
            .world
            .iter()
            .filter_map(|e| e.as_asteroid())
            .filter(|a| a.size == AsteroidSize::Large)
            .count();
        assert_eq!(large, 6);
        assert_eq!(game.world.count_of(EntityTag::Asteroid), 6);
    }

    #[test]
    fn test_clearing_level_one_end_to_end() {
        let mut game = started(21);

        for _ in 0..100 {
            let targets: Vec<_> = game
                .world
                .iter()
                .filter(|e| e.tag() == EntityTag::Asteroid)
                .map(|e| e.pos)
                .collect();
            if targets.is_empty() {
                break;
            }
            for pos in targets {
                let bullet = Bullet::spawn(pos, 0.0, &mut game.audio);
                game.world.add(bullet);
            }
            tick(&mut game, &InputSnapshot::default(), 0.001);
        }

        // 6 × (5 + 2×7 + 4×9) for the rocks, plus 3 lives × 25
        assert_eq!(game.director.phase(), GamePhase::LevelComplete);
        assert_eq!(game.director.lives(), 3);
        assert_eq!(game.director.score(), 6 * 55 + 3 * BONUS_PER_LIFE);
        assert_eq!(game.world.count_of(EntityTag::Ship), 0);
    }

    #[test]
    fn test_scored_hit_fragments_in_world() {
        let mut game = started(5);
        game.stage().despawn_all(EntityTag::Asteroid);
        let origin = glam::Vec2::new(200.0, 150.0);
        let rock = Asteroid::spawn(AsteroidSize::Medium, Some(origin), &mut game.rng, &mut game.audio);
        let rock = game.world.add(rock);
        let bullet = Bullet::spawn(origin, 0.0, &mut game.audio);
        let bullet = game.world.add(bullet);

        tick(&mut game, &InputSnapshot::default(), 0.001);

        assert!(!game.world.contains(rock));
        assert!(!game.world.contains(bullet));
        assert_eq!(game.director.score(), 7);
        let smalls: Vec<_> = game
            .world
            .iter()
            .filter_map(|e| e.as_asteroid().map(|a| (a.size, e.pos)))
            .collect();
        assert_eq!(smalls.len(), 2);
        assert!(smalls.iter().all(|(size, _)| *size == AsteroidSize::Small));
        assert_eq!(game.world.count_of(EntityTag::Explosion), 1);
    }

    #[test]
    fn test_score_never_decreases() {
        let mut game = started(8);
        let fire = InputSnapshot {
            fire: true,
            left: true,
            forward: true,
            ..Default::default()
        };
        let mut last = game.director.score();
        for _ in 0..600 {
            tick(&mut game, &fire, 1.0 / 60.0);
            let score = game.director.score();
            if game.director.phase() == GamePhase::LevelRunning {
                assert!(score >= last);
            }
            last = score;
        }
    }

    #[test]
    fn test_self_removal_does_not_skip_next() {
        let mut game = Game::headless(1);
        let leaving = Bullet::spawn(glam::Vec2::new(1220.0, 100.0), 0.0, &mut game.audio);
        let leaving = game.world.add(leaving);
        let next = Bullet::spawn(glam::Vec2::new(100.0, 100.0), 0.0, &mut game.audio);
        let next = game.world.add(next);

        tick(&mut game, &InputSnapshot::default(), 0.01);

        assert!(!game.world.contains(leaving));
        let expected = glam::Vec2::new(100.0 + BULLET_SPEED * 0.01, 100.0);
        let moved = game.world.get(next).map(|e| e.pos);
        assert!(moved.is_some_and(|p| p.abs_diff_eq(expected, 1e-3)));
    }

    #[test]
    fn test_one_bullet_between_two_rocks() {
        let mut game = Game::headless(2);
        let first = Asteroid::spawn(
            AsteroidSize::Medium,
            Some(glam::Vec2::new(200.0, 200.0)),
            &mut game.rng,
            &mut game.audio,
        );
        let first = game.world.add(first);
        let second = Asteroid::spawn(
            AsteroidSize::Medium,
            Some(glam::Vec2::new(215.0, 200.0)),
            &mut game.rng,
            &mut game.audio,
        );
        let second = game.world.add(second);
        let bullet = Bullet::spawn(glam::Vec2::new(207.0, 200.0), 0.0, &mut game.audio);
        let bullet = game.world.add(bullet);

        tick(&mut game, &InputSnapshot::default(), 0.001);

        assert!(!game.world.contains(first));
        assert!(game.world.contains(second));
        assert!(!game.world.contains(bullet));
        assert_eq!(game.director.score(), 7);
        let sizes: Vec<_> = game
            .world
            .iter()
            .filter_map(|e| e.as_asteroid().map(|a| a.size))
            .collect();
        assert_eq!(
            sizes,
            vec![AsteroidSize::Medium, AsteroidSize::Small, AsteroidSize::Small]
        );
        assert_eq!(game.world.count_of(EntityTag::Explosion), 1);
    }

    #[test]
    fn test_two_bullets_on_one_rock() {
        let mut game = Game::headless(3);
        let rock = Asteroid::spawn(
            AsteroidSize::Medium,
            Some(glam::Vec2::new(300.0, 300.0)),
            &mut game.rng,
            &mut game.audio,
        );
        let rock = game.world.add(rock);
        let first = Bullet::spawn(glam::Vec2::new(300.0, 300.0), 0.0, &mut game.audio);
        let first = game.world.add(first);
        let second = Bullet::spawn(glam::Vec2::new(305.0, 300.0), 0.0, &mut game.audio);
        let second = game.world.add(second);

        tick(&mut game, &InputSnapshot::default(), 0.001);

        assert!(!game.world.contains(rock));
        assert!(!game.world.contains(first));
        assert!(game.world.contains(second));
        assert_eq!(game.director.score(), 7);
        assert_eq!(game.world.count_of(EntityTag::Asteroid), 2);
        assert_eq!(game.world.count_of(EntityTag::Explosion), 1);
    }

    #[test]
    fn test_fire_cooldown_limits_bullets() {
        let mut game = started(4);
        let rock = rock_on_ship(&mut game);
        if let Some(e) = game.world.get_mut(rock) {
            e.pos = glam::Vec2::new(50.0, 50.0);
        }
        let fire = InputSnapshot {
            fire: true,
            ..Default::default()
        };

        tick(&mut game, &fire, 0.05);
        assert_eq!(game.world.count_of(EntityTag::Bullet), 1);
        tick(&mut game, &fire, 0.05);
        assert_eq!(game.world.count_of(EntityTag::Bullet), 1);
    }

    #[test]
    fn test_shield_protects_then_expires() {
        let mut game = started(6);
        let rock = rock_on_ship(&mut game);

        // Just short of the 2s shield
        for _ in 0..95 {
            pin(&mut game, rock);
            tick(&mut game, &InputSnapshot::default(), DT);
        }
        assert_eq!(game.director.lives(), 3);

        let mut died = false;
        for _ in 0..20 {
            pin(&mut game, rock);
            tick(&mut game, &InputSnapshot::default(), DT);
            if game.director.lives() == 2 {
                died = true;
                break;
            }
        }
        assert!(died);
        let ship = game.world.iter().find_map(|e| e.as_ship());
        assert!(ship.is_some_and(|s| !s.is_materialized()));
        assert_eq!(game.world.count_of(EntityTag::Explosion), 1);
    }

    #[test]
    fn test_debug_shields_never_drop() {
        let mut settings = Settings::default();
        settings.debug.debug_shields = true;
        let mut game = Game::new(6, settings, Box::new(crate::audio::NullBackend));
        game.init();
        tick(&mut game, &press_start(), DT);
        let rock = rock_on_ship(&mut game);

        for _ in 0..300 {
            pin(&mut game, rock);
            tick(&mut game, &InputSnapshot::default(), DT);
        }
        assert_eq!(game.director.lives(), 3);
    }

    #[test]
    fn test_sounds_released_exactly_once() {
        let backend = RecordingBackend::new();
        let calls = backend.calls();
        let mut game = Game::new(12, Settings::default(), Box::new(backend));
        game.init();
        tick(&mut game, &press_start(), DT);

        let wild = InputSnapshot {
            fire: true,
            right: true,
            forward: true,
            ..Default::default()
        };
        for i in 0..900 {
            let input = if i % 90 < 45 { wild } else { InputSnapshot::default() };
            tick(&mut game, &input, 1.0 / 60.0);
            if game.director.phase() != GamePhase::LevelRunning {
                tick(&mut game, &press_start(), DT);
            }
        }
        game.shutdown();
        assert_eq!(game.audio.live_sounds(), 0);

        let calls = calls.borrow();
        let released: Vec<_> = calls
            .iter()
            .filter_map(|c| match c {
                AudioCall::Release(h) => Some(*h),
                _ => None,
            })
            .collect();
        let unique: HashSet<_> = released.iter().copied().collect();
        assert_eq!(unique.len(), released.len());

        // Nothing plays after its release
        let mut gone = HashSet::new();
        for call in calls.iter() {
            match call {
                AudioCall::Release(h) => {
                    gone.insert(*h);
                }
                AudioCall::Play { handle, .. } => assert!(!gone.contains(handle)),
                AudioCall::Stop(_) => {}
            }
        }
    }

    #[test]
    fn test_shield_cue_plays_once() {
        let backend = RecordingBackend::new();
        let calls = backend.calls();
        let mut game = Game::new(2, Settings::default(), Box::new(backend));
        game.init();
        tick(&mut game, &press_start(), DT);
        for _ in 0..150 {
            tick(&mut game, &InputSnapshot::default(), DT);
        }

        let cues = calls
            .borrow()
            .iter()
            .filter(|c| {
                matches!(
                    c,
                    AudioCall::Play {
                        effect: SoundEffect::ShieldDown,
                        ..
                    }
                )
            })
            .count();
        assert_eq!(cues, 1);
    }

    #[test]
    fn test_bad_delta_is_ignored() {
        let mut game = started(1);
        let before: Vec<_> = game.world.iter().map(|e| e.pos).collect();
        tick(&mut game, &InputSnapshot::default(), f32::NAN);
        tick(&mut game, &InputSnapshot::default(), -3.0);
        let after: Vec<_> = game.world.iter().map(|e| e.pos).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_hud_shows_same_frame_score() {
        let mut game = Game::headless(4);
        game.init();
        game.stage().despawn_all(EntityTag::Asteroid);
        let origin = glam::Vec2::new(400.0, 300.0);
        let rock = Asteroid::spawn(AsteroidSize::Small, Some(origin), &mut game.rng, &mut game.audio);
        game.world.add(rock);
        let bullet = Bullet::spawn(origin, 0.0, &mut game.audio);
        game.world.add(bullet);

        tick(&mut game, &InputSnapshot::default(), 0.001);
        assert_eq!(game.director.score(), 9);

        let mut list = DrawList::new();
        render(&game, &mut list);
        assert!(list.texts().any(|t| t == "SCORE: 9"));
    }

    #[test]
    fn test_render_title_screen() {
        let mut settings = Settings::default();
        settings.debug.debug_hud = true;
        let mut game = Game::new(1, settings, Box::new(crate::audio::NullBackend));
        game.init();
        tick(&mut game, &InputSnapshot::default(), DT);

        let mut list = DrawList::new();
        render(&game, &mut list);
        let texts: Vec<&str> = list.texts().collect();
        assert!(texts.contains(&"Asteroids"));
        assert!(texts.contains(&"Press Enter To Start"));
        assert!(texts.contains(&"SCORE: 0"));
        assert!(texts.contains(&"GameState: START"));
        assert!(texts.contains(&"Asteroids: 0"));
    }
}

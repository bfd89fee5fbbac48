//! Sound effect triggers
//!
//! Entities create a [`SoundHandle`] for every effect they may play and hand
//! it back through [`AudioManager::clean_up`] when they are removed. Playback
//! itself goes through an [`AudioBackend`]: procedural Web Audio in the
//! browser, log lines natively, a call recorder in tests.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::settings::Settings;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    /// Asteroid shot apart
    AsteroidExplode,
    /// Last life lost
    GameOver,
    /// Final level cleared
    MissionComplete,
    /// Ship shield ran out
    ShieldDown,
    /// Ship destroyed
    ShipExplode,
    /// Ship materialized after its respawn delay
    ShipRespawn,
    /// Engine loop while thrusting
    ShipThrusters,
    /// Bullet fired
    ShootBullet,
}

impl SoundEffect {
    pub fn name(&self) -> &'static str {
        match self {
            SoundEffect::AsteroidExplode => "asteroidExplode",
            SoundEffect::GameOver => "gameOver",
            SoundEffect::MissionComplete => "missionComplete",
            SoundEffect::ShieldDown => "shieldDown",
            SoundEffect::ShipExplode => "shipExplode",
            SoundEffect::ShipRespawn => "shipRespawn",
            SoundEffect::ShipThrusters => "shipThrusters",
            SoundEffect::ShootBullet => "shootBullet",
        }
    }

    /// Per-effect mix level (0.0 - 1.0)
    pub fn mix_level(&self) -> f32 {
        match self {
            SoundEffect::AsteroidExplode => 0.4,
            SoundEffect::GameOver => 0.5,
            SoundEffect::MissionComplete => 0.5,
            SoundEffect::ShieldDown => 1.0,
            SoundEffect::ShipExplode => 0.25,
            SoundEffect::ShipRespawn => 0.5,
            SoundEffect::ShipThrusters => 1.0,
            SoundEffect::ShootBullet => 0.1,
        }
    }
}

/// Identity of one created sound
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SoundHandle(u32);

/// Playback device
pub trait AudioBackend {
    fn play(&mut self, handle: SoundHandle, effect: SoundEffect, volume: f32, looped: bool);
    fn stop(&mut self, handle: SoundHandle);
    /// Detach the sound; anything still playing finishes naturally
    fn release(&mut self, handle: SoundHandle);
}

/// Discards everything
#[derive(Debug, Default)]
pub struct NullBackend;

impl AudioBackend for NullBackend {
    fn play(&mut self, _: SoundHandle, _: SoundEffect, _: f32, _: bool) {}
    fn stop(&mut self, _: SoundHandle) {}
    fn release(&mut self, _: SoundHandle) {}
}

/// Native backend: logs each trigger at debug level
#[derive(Debug, Default)]
pub struct LogBackend;

impl AudioBackend for LogBackend {
    fn play(&mut self, handle: SoundHandle, effect: SoundEffect, volume: f32, looped: bool) {
        log::debug!(
            "play {} ({:?}) vol={:.2} loop={}",
            effect.name(),
            handle,
            volume,
            looped
        );
    }

    fn stop(&mut self, handle: SoundHandle) {
        log::debug!("stop {:?}", handle);
    }

    fn release(&mut self, handle: SoundHandle) {
        log::trace!("release {:?}", handle);
    }
}

/// A backend call, as seen by [`RecordingBackend`]
#[derive(Debug, Clone, PartialEq)]
pub enum AudioCall {
    Play {
        handle: SoundHandle,
        effect: SoundEffect,
        looped: bool,
    },
    Stop(SoundHandle),
    Release(SoundHandle),
}

/// Records backend calls into a shared log (for tests and replays)
#[derive(Debug, Default, Clone)]
pub struct RecordingBackend {
    calls: Rc<RefCell<Vec<AudioCall>>>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared view of the recorded calls; stays valid after the backend is boxed
    pub fn calls(&self) -> Rc<RefCell<Vec<AudioCall>>> {
        Rc::clone(&self.calls)
    }
}

impl AudioBackend for RecordingBackend {
    fn play(&mut self, handle: SoundHandle, effect: SoundEffect, _volume: f32, looped: bool) {
        self.calls.borrow_mut().push(AudioCall::Play {
            handle,
            effect,
            looped,
        });
    }

    fn stop(&mut self, handle: SoundHandle) {
        self.calls.borrow_mut().push(AudioCall::Stop(handle));
    }

    fn release(&mut self, handle: SoundHandle) {
        self.calls.borrow_mut().push(AudioCall::Release(handle));
    }
}

#[derive(Debug, Clone, Copy)]
struct SoundSlot {
    effect: SoundEffect,
    looped: bool,
}

/// Audio manager for the game
pub struct AudioManager {
    backend: Box<dyn AudioBackend>,
    sounds: BTreeMap<SoundHandle, SoundSlot>,
    next_handle: u32,
    enabled: bool,
    volume: f32,
}

impl AudioManager {
    pub fn new(backend: Box<dyn AudioBackend>, settings: &Settings) -> Self {
        Self {
            backend,
            sounds: BTreeMap::new(),
            next_handle: 1,
            enabled: settings.audio_enabled,
            volume: settings.effective_volume(),
        }
    }

    /// Manager that plays nothing
    pub fn silent() -> Self {
        Self::new(Box::new(NullBackend), &Settings::default())
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn toggle_enabled(&mut self) {
        self.enabled = !self.enabled;
        log::info!("Audio {}", if self.enabled { "enabled" } else { "disabled" });
    }

    /// Register a new sound; the caller owns the returned handle
    pub fn create_sound(&mut self, effect: SoundEffect, looped: bool) -> SoundHandle {
        let handle = SoundHandle(self.next_handle);
        self.next_handle += 1;
        self.sounds.insert(handle, SoundSlot { effect, looped });
        handle
    }

    /// Play a sound (no-op while audio is disabled)
    pub fn play(&mut self, handle: SoundHandle) {
        if !self.enabled {
            return;
        }
        let Some(slot) = self.sounds.get(&handle).copied() else {
            log::warn!("play on released sound {:?}", handle);
            return;
        };
        let vol = self.volume * slot.effect.mix_level();
        self.backend.play(handle, slot.effect, vol, slot.looped);
    }

    pub fn stop(&mut self, handle: SoundHandle) {
        if self.sounds.contains_key(&handle) {
            self.backend.stop(handle);
        }
    }

    /// Release a handle. Each handle must be cleaned up exactly once.
    pub fn clean_up(&mut self, handle: SoundHandle) {
        if self.sounds.remove(&handle).is_some() {
            self.backend.release(handle);
        } else {
            log::warn!("CleanUp failed: {:?} is not a live sound", handle);
        }
    }

    /// Number of created, not yet cleaned up, sounds
    pub fn live_sounds(&self) -> usize {
        self.sounds.len()
    }

    pub fn is_live(&self, handle: SoundHandle) -> bool {
        self.sounds.contains_key(&handle)
    }
}

impl std::fmt::Debug for AudioManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioManager")
            .field("live_sounds", &self.sounds.len())
            .field("enabled", &self.enabled)
            .field("volume", &self.volume)
            .finish()
    }
}

/// Procedurally generated sound effects - no external files needed!
#[cfg(target_arch = "wasm32")]
pub mod web {
    use std::collections::HashMap;

    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{AudioBackend, SoundEffect, SoundHandle};

    /// Web Audio backend
    pub struct WebAudioBackend {
        ctx: Option<AudioContext>,
        /// Running looped voices, stopped on `stop`/`release`
        loops: HashMap<SoundHandle, (OscillatorNode, GainNode)>,
    }

    impl Default for WebAudioBackend {
        fn default() -> Self {
            Self::new()
        }
    }

    impl WebAudioBackend {
        pub fn new() -> Self {
            // Try to create audio context (may fail if not in secure context)
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                loops: HashMap::new(),
            }
        }

        /// Create an oscillator with gain envelope
        fn create_osc(
            ctx: &AudioContext,
            freq: f32,
            osc_type: OscillatorType,
        ) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            Some((osc, gain))
        }

        /// Short decaying tone, optionally sweeping to `end_freq`
        fn blip(
            ctx: &AudioContext,
            vol: f32,
            freq: f32,
            end_freq: Option<f32>,
            osc_type: OscillatorType,
            delay: f64,
            length: f64,
        ) {
            let Some((osc, gain)) = Self::create_osc(ctx, freq, osc_type) else {
                return;
            };
            let t = ctx.current_time() + delay;

            gain.gain().set_value_at_time(vol, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + length)
                .ok();
            if let Some(end) = end_freq {
                osc.frequency().set_value_at_time(freq, t).ok();
                osc.frequency()
                    .exponential_ramp_to_value_at_time(end, t + length)
                    .ok();
            }

            osc.start_with_when(t).ok();
            osc.stop_with_when(t + length + 0.05).ok();
        }

        fn play_one_shot(ctx: &AudioContext, effect: SoundEffect, vol: f32) {
            match effect {
                SoundEffect::AsteroidExplode => {
                    Self::blip(ctx, vol, 100.0, Some(30.0), OscillatorType::Sawtooth, 0.0, 0.4);
                    Self::blip(ctx, vol * 0.4, 1500.0, None, OscillatorType::Square, 0.0, 0.1);
                }
                SoundEffect::ShipExplode => {
                    Self::blip(ctx, vol, 80.0, Some(25.0), OscillatorType::Sine, 0.0, 0.8);
                    Self::blip(ctx, vol * 0.6, 200.0, Some(40.0), OscillatorType::Sawtooth, 0.0, 0.5);
                }
                SoundEffect::ShootBullet => {
                    Self::blip(ctx, vol, 900.0, Some(200.0), OscillatorType::Square, 0.0, 0.08);
                }
                SoundEffect::ShieldDown => {
                    Self::blip(ctx, vol * 0.5, 880.0, None, OscillatorType::Square, 0.0, 0.15);
                }
                SoundEffect::ShipRespawn => {
                    Self::blip(ctx, vol, 200.0, Some(800.0), OscillatorType::Square, 0.0, 0.25);
                }
                SoundEffect::GameOver => {
                    for (i, freq) in [400.0, 300.0, 200.0].iter().enumerate() {
                        let delay = i as f64 * 0.25;
                        Self::blip(ctx, vol, *freq, None, OscillatorType::Triangle, delay, 0.3);
                    }
                }
                SoundEffect::MissionComplete => {
                    for (i, freq) in [523.0, 659.0, 784.0, 1047.0].iter().enumerate() {
                        let delay = i as f64 * 0.12;
                        Self::blip(ctx, vol, *freq, None, OscillatorType::Sine, delay, 0.25);
                    }
                }
                // Looped; started by `start_loop`
                SoundEffect::ShipThrusters => {}
            }
        }

        fn start_loop(&mut self, ctx: &AudioContext, handle: SoundHandle, vol: f32) {
            if self.loops.contains_key(&handle) {
                return;
            }
            let Some((osc, gain)) = Self::create_osc(ctx, 55.0, OscillatorType::Sawtooth) else {
                return;
            };
            gain.gain().set_value(vol * 0.3);
            if osc.start().is_ok() {
                self.loops.insert(handle, (osc, gain));
            }
        }
    }

    impl AudioBackend for WebAudioBackend {
        fn play(&mut self, handle: SoundHandle, effect: SoundEffect, vol: f32, looped: bool) {
            if vol <= 0.0 {
                return;
            }
            let Some(ctx) = self.ctx.clone() else { return };

            // Resume context if suspended (browsers require user gesture)
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            if looped {
                self.start_loop(&ctx, handle, vol);
            } else {
                Self::play_one_shot(&ctx, effect, vol);
            }
        }

        fn stop(&mut self, handle: SoundHandle) {
            if let Some((osc, _gain)) = self.loops.remove(&handle) {
                if let Err(e) = osc.stop() {
                    log::warn!("Failed to stop looped sound: {:?}", e);
                }
            }
        }

        fn release(&mut self, handle: SoundHandle) {
            // One-shots finish on their own; only loops hold nodes
            self.stop(handle);
        }
    }
}

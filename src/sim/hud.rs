//! HUD elements: score, lives, centered messages and the debug readout
//!
//! HUD entities take no part in physics. The frame step copies a fresh
//! [`HudStats`] snapshot into them after the director has run, so rendering
//! never reaches back into the director.

use glam::Vec2;

use super::director::GamePhase;
use super::entity::{Entity, EntityKind, EntityTag};
use crate::consts::{CANVAS_HEIGHT, CANVAS_WIDTH};
use crate::renderer::{RenderSurface, Rgba, TextAlign, colors, shapes};

const SCORE_POS: Vec2 = Vec2::new(20.0, 35.0);
const SCORE_FONT_PX: f32 = 20.0;

/// Rightmost chevron apex; the rest step leftward
const LIVES_POS: Vec2 = Vec2::new(1175.0, 10.0);
const LIVES_SPACING: f32 = 30.0;

const TITLE_FONT_PX: f32 = 50.0;
const SUBTITLE_FONT_PX: f32 = 20.0;
const SUBTITLE_GAP: f32 = 40.0;

const DEBUG_FONT_PX: f32 = 25.0;
const DEBUG_LINE_HEIGHT: f32 = 30.0;
const DEBUG_MARGIN: f32 = 10.0;

/// Values the HUD displays, refreshed every frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HudStats {
    pub phase: GamePhase,
    pub score: u32,
    pub lives: u32,
    pub asteroids: usize,
    pub fps: u32,
}

impl Default for HudStats {
    fn default() -> Self {
        Self {
            phase: GamePhase::Start,
            score: 0,
            lives: 0,
            asteroids: 0,
            fps: 0,
        }
    }
}

/// Two-line centered banner
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub title: String,
    pub subtitle: String,
    pub title_color: Rgba,
    pub subtitle_color: Rgba,
}

impl Message {
    pub fn new(title: impl Into<String>, subtitle: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            subtitle: subtitle.into(),
            title_color: colors::WHITE,
            subtitle_color: colors::WHITE,
        }
    }

    pub fn with_colors(mut self, title_color: Rgba, subtitle_color: Rgba) -> Self {
        self.title_color = title_color;
        self.subtitle_color = subtitle_color;
        self
    }

    pub fn into_entity(self) -> Entity {
        Entity::new(Vec2::ZERO, EntityKind::Hud(HudElement::Message(self)))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum HudElement {
    Score { score: u32 },
    Lives { lives: u32 },
    Message(Message),
    Debug { stats: HudStats },
}

impl HudElement {
    pub fn score_counter() -> Entity {
        Entity::new(SCORE_POS, EntityKind::Hud(HudElement::Score { score: 0 }))
    }

    pub fn lives_counter() -> Entity {
        Entity::new(LIVES_POS, EntityKind::Hud(HudElement::Lives { lives: 0 }))
    }

    pub fn debug_readout() -> Entity {
        let pos = Vec2::new(CANVAS_WIDTH - DEBUG_MARGIN, CANVAS_HEIGHT - DEBUG_MARGIN);
        let stats = HudStats::default();
        Entity::new(pos, EntityKind::Hud(HudElement::Debug { stats }))
    }

    pub fn tag(&self) -> EntityTag {
        match self {
            HudElement::Score { .. } => EntityTag::ScoreCounter,
            HudElement::Lives { .. } => EntityTag::LivesCounter,
            HudElement::Message(_) => EntityTag::Message,
            HudElement::Debug { .. } => EntityTag::DebugHud,
        }
    }

    pub(crate) fn update(&mut self, stats: &HudStats) {
        match self {
            HudElement::Score { score } => *score = stats.score,
            HudElement::Lives { lives } => *lives = stats.lives,
            HudElement::Message(_) => {}
            HudElement::Debug { stats: shown } => *shown = *stats,
        }
    }

    pub(crate) fn render(&self, pos: Vec2, surface: &mut dyn RenderSurface) {
        match self {
            HudElement::Score { score } => {
                let text = format!("SCORE: {}", score);
                surface.fill_text(&text, pos, SCORE_FONT_PX, TextAlign::Left, colors::WHITE);
            }
            HudElement::Lives { lives } => {
                for i in 0..*lives {
                    let apex = pos - Vec2::new(LIVES_SPACING * i as f32, 0.0);
                    surface.stroke_polygon(&shapes::life_marker(apex), colors::LIME);
                }
            }
            HudElement::Message(msg) => {
                let center = Vec2::new(CANVAS_WIDTH / 2.0, CANVAS_HEIGHT / 2.0);
                surface.fill_text(
                    &msg.title,
                    center,
                    TITLE_FONT_PX,
                    TextAlign::Center,
                    msg.title_color,
                );
                surface.fill_text(
                    &msg.subtitle,
                    center + Vec2::new(0.0, SUBTITLE_GAP),
                    SUBTITLE_FONT_PX,
                    TextAlign::Center,
                    msg.subtitle_color,
                );
            }
            HudElement::Debug { stats } => {
                let lines = [
                    format!("GameState: {}", stats.phase),
                    format!("Asteroids: {}", stats.asteroids),
                    format!("FPS: {}", stats.fps),
                ];
                // Bottom line first, stacking upward
                for (i, line) in lines.iter().enumerate() {
                    let at = pos - Vec2::new(0.0, DEBUG_LINE_HEIGHT * i as f32);
                    surface.fill_text(line, at, DEBUG_FONT_PX, TextAlign::Right, colors::WHITE);
                }
            }
        }
    }
}

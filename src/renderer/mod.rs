//! Rendering surface
//!
//! Entities draw outline primitives onto a [`RenderSurface`]. The browser
//! build backs it with a 2D canvas context; [`DrawList`] records commands
//! for headless runs and tests.

pub mod shapes;

use glam::Vec2;

/// RGBA color, components in 0.0 - 1.0
pub type Rgba = [f32; 4];

/// Palette
pub mod colors {
    use super::Rgba;

    pub const BLACK: Rgba = [0.0, 0.0, 0.0, 1.0];
    pub const WHITE: Rgba = [1.0, 1.0, 1.0, 1.0];
    pub const RED: Rgba = [1.0, 0.0, 0.0, 1.0];
    pub const PINK: Rgba = [1.0, 0.75, 0.8, 1.0];
    pub const LIME: Rgba = [0.0, 1.0, 0.0, 1.0];
    pub const YELLOW: Rgba = [1.0, 1.0, 0.0, 1.0];
    pub const ORANGE: Rgba = [1.0, 0.65, 0.0, 1.0];
    pub const BROWN: Rgba = [0.65, 0.16, 0.16, 1.0];
    /// Shield ring and ship explosion accent
    pub const SHIELD: Rgba = [0.0, 1.0, 1.0, 1.0];
    /// Asteroid outline (rgb 180,138,113)
    pub const ROCK: Rgba = [0.706, 0.541, 0.443, 1.0];
}

/// Same color with a different alpha
#[inline]
pub fn with_alpha(color: Rgba, alpha: f32) -> Rgba {
    [color[0], color[1], color[2], alpha.clamp(0.0, 1.0)]
}

/// Horizontal anchor for text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

/// Best-effort drawing target; nothing here can fail
pub trait RenderSurface {
    fn clear(&mut self, color: Rgba);
    /// Closed outline through `points`
    fn stroke_polygon(&mut self, points: &[Vec2], color: Rgba);
    fn stroke_circle(&mut self, center: Vec2, radius: f32, color: Rgba);
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba);
    fn fill_rect(&mut self, pos: Vec2, size: Vec2, color: Rgba);
    /// `pos.y` is the text baseline
    fn fill_text(&mut self, text: &str, pos: Vec2, size_px: f32, align: TextAlign, color: Rgba);
}

/// A recorded draw call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    Clear(Rgba),
    Polygon {
        points: Vec<Vec2>,
        color: Rgba,
    },
    Circle {
        center: Vec2,
        radius: f32,
        color: Rgba,
        filled: bool,
    },
    Rect {
        pos: Vec2,
        size: Vec2,
        color: Rgba,
    },
    Text {
        text: String,
        pos: Vec2,
        size_px: f32,
        align: TextAlign,
        color: Rgba,
    },
}

/// Recording surface
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    pub commands: Vec<DrawCmd>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// All text drawn, in order
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|c| match c {
            DrawCmd::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

impl RenderSurface for DrawList {
    fn clear(&mut self, color: Rgba) {
        self.commands.clear();
        self.commands.push(DrawCmd::Clear(color));
    }

    fn stroke_polygon(&mut self, points: &[Vec2], color: Rgba) {
        self.commands.push(DrawCmd::Polygon {
            points: points.to_vec(),
            color,
        });
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        self.commands.push(DrawCmd::Circle {
            center,
            radius,
            color,
            filled: false,
        });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        self.commands.push(DrawCmd::Circle {
            center,
            radius,
            color,
            filled: true,
        });
    }

    fn fill_rect(&mut self, pos: Vec2, size: Vec2, color: Rgba) {
        self.commands.push(DrawCmd::Rect { pos, size, color });
    }

    fn fill_text(&mut self, text: &str, pos: Vec2, size_px: f32, align: TextAlign, color: Rgba) {
        self.commands.push(DrawCmd::Text {
            text: text.to_string(),
            pos,
            size_px,
            align,
            color,
        });
    }
}

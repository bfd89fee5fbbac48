//! Outline generation for 2D primitives

use glam::Vec2;
use std::f32::consts::TAU;

use crate::polar_to_cartesian;

/// Vertices of a regular polygon, first vertex at `rotation`
pub fn regular_polygon(center: Vec2, radius: f32, sides: u32, rotation: f32) -> Vec<Vec2> {
    let step = TAU / sides as f32;
    (0..sides)
        .map(|i| center + polar_to_cartesian(radius, rotation + step * i as f32))
        .collect()
}

/// Ship triangle; the first vertex is the nose
pub fn ship_outline(pos: Vec2, angle: f32, radius: f32) -> Vec<Vec2> {
    regular_polygon(pos, radius, 3, angle)
}

/// Hexagonal rock, spun by `rotation`
pub fn asteroid_outline(pos: Vec2, radius: f32, rotation: f32) -> Vec<Vec2> {
    regular_polygon(pos, radius, 6, rotation)
}

/// Chevron used by the lives counter, apex at `apex`
pub fn life_marker(apex: Vec2) -> [Vec2; 3] {
    [apex, apex + Vec2::new(9.0, 9.0), apex + Vec2::new(-9.0, 9.0)]
}

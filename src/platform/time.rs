//! Frame timing
//!
//! Converts animation-frame timestamps (milliseconds) into the seconds-delta
//! the simulation integrates with.

use crate::consts::MAX_FRAME_DT;

#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last_timestamp: Option<f64>,
    fps: u32,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance to `timestamp_ms`; returns the guarded delta in seconds.
    ///
    /// The first frame yields 0. Backwards, NaN or huge gaps (tab refocus)
    /// are clamped into `0.0..=MAX_FRAME_DT`.
    pub fn advance(&mut self, timestamp_ms: f64) -> f32 {
        let raw = match self.last_timestamp {
            Some(last) => ((timestamp_ms - last) / 1000.0) as f32,
            None => 0.0,
        };
        if timestamp_ms.is_finite() {
            self.last_timestamp = Some(timestamp_ms);
        }
        if raw > 0.0 {
            self.fps = (1.0 / raw).round() as u32;
        }
        sanitize_dt(raw)
    }

    /// FPS estimate from the last raw delta
    pub fn fps(&self) -> u32 {
        self.fps
    }
}

/// Clamp a delta into `0.0..=MAX_FRAME_DT`, mapping NaN to 0
#[inline]
pub fn sanitize_dt(dt: f32) -> f32 {
    if dt.is_nan() {
        0.0
    } else {
        dt.clamp(0.0, MAX_FRAME_DT)
    }
}

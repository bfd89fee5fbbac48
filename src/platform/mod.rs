//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Input events (key codes to action snapshots)
//! - Time/ticks (timestamps to guarded frame deltas)

pub mod input;
pub mod time;

pub use input::{InputSnapshot, KeyboardState};
pub use time::FrameClock;

//! Configuration errors
//!
//! The simulation itself has no recoverable failures; everything that can go
//! wrong comes from loading or validating configuration.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("{name} must be within 0.0..=1.0, got {value}")]
    InvalidVolume { name: &'static str, value: f32 },

    #[error("level {0} is not defined in the level table")]
    UnknownLevel(u32),
}

//! Cave Escape - A side-scrolling cave flyer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (cave generation, collisions, craft, game state)
//! - `stage`: Ordered stage table feeding the cave generator
//! - `tuning`: Data-driven generation constants
//! - `highscores`: Best distance leaderboard

pub mod highscores;
pub mod sim;
pub mod stage;
pub mod tuning;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use highscores::{BestDistances, RunRecord};
pub use stage::{StageColors, StageParams, StageTable};
pub use tuning::{CaveTuning, ConfigError};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame the driver will try to catch up on
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Travel distance at the start of every stage where the cave stays level
    pub const SAFE_DISTANCE: f32 = 600.0;

    /// Craft horizontal position as a fraction of the view width
    pub const CRAFT_X_FRACTION: f32 = 0.2;
    /// Downward acceleration (units/s²)
    pub const CRAFT_GRAVITY: f32 = 1080.0;
    /// Upward acceleration while thrusting (units/s²)
    pub const CRAFT_THRUST: f32 = 1800.0;
    /// Vertical speed limit (units/s)
    pub const CRAFT_MAX_SPEED: f32 = 480.0;
    /// Nose tilt as a fraction of the flight path angle
    pub const CRAFT_TILT: f32 = 0.3;
}

/// Linear interpolation between `a` and `b`
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

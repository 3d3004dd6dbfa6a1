//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - World space only: x grows to the right, y grows downward
//! - No rendering or platform dependencies

pub mod cave;
pub mod corridor;
pub mod craft;
pub mod geometry;
pub mod state;
pub mod tick;

pub use cave::{Cave, Spikes, hash01};
pub use corridor::Corridor;
pub use craft::{CRAFT_HULL, Craft};
pub use geometry::{polyline_y_at_x, segments_intersect};
pub use state::{GameEvent, GamePhase, GameState, RngState};
pub use tick::{FixedTimestep, TickInput, autopilot_thrust, tick};

//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically.

use super::state::{GamePhase, GameState};
use crate::consts::*;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Thrust held (space/click/touch)
    pub thrust: bool,
    /// Start a run, continue after a stage clear, or restart
    pub start: bool,
    /// Pause toggle
    pub pause: bool,
    /// Idle/demo mode - autopilot flies the craft
    pub idle_mode: bool,
}

/// How far ahead of the craft the autopilot aims
const AUTOPILOT_LOOKAHEAD: f32 = 40.0;
/// Seconds of velocity the autopilot anticipates
const AUTOPILOT_LEAD: f32 = 0.25;

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                return;
            }
            GamePhase::Paused => {
                state.phase = GamePhase::Playing;
                return;
            }
            _ => {}
        }
    }

    match state.phase {
        GamePhase::Title | GamePhase::GameOver | GamePhase::AllClear => {
            if input.start {
                state.start_run();
            }
        }
        GamePhase::StageClear => {
            if input.start {
                state.advance_stage();
            }
        }
        GamePhase::Paused => {}
        GamePhase::Playing => {
            let thrust = if input.idle_mode {
                autopilot_thrust(state)
            } else {
                input.thrust
            };
            fly(state, thrust, dt);
        }
    }
}

/// One step of flight: move craft, scroll cave, then test the post-scroll geometry
fn fly(state: &mut GameState, thrust: bool, dt: f32) {
    state.time_ticks += 1;

    let speed = state.stage().scroll_speed;
    state.craft.update(dt, thrust, speed);

    let dx = speed * dt;
    state.cave.update(dx);
    state.distance += dx;
    state.stage_distance += dx;

    if state.cave.collides(&state.craft.polygon()) {
        state.crash();
        return;
    }

    if state.stage_distance >= state.stage().target_distance {
        state.clear_stage();
    }
}

/// Demo pilot: thrust whenever the craft is heading below the corridor center
pub fn autopilot_thrust(state: &GameState) -> bool {
    let craft = &state.craft;
    let target = state.cave.center_at_x(craft.pos.x + AUTOPILOT_LOOKAHEAD);
    craft.pos.y + craft.vel_y * AUTOPILOT_LEAD > target
}

/// Accumulates real frame time and runs whole simulation ticks
#[derive(Debug, Clone, Default)]
pub struct FixedTimestep {
    accumulator: f32,
}

impl FixedTimestep {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run as many `SIM_DT` ticks as `frame_dt` covers (capped). Returns ticks run.
    ///
    /// One-shot inputs (`start`, `pause`) are cleared once a tick has consumed them.
    pub fn advance(&mut self, state: &mut GameState, input: &mut TickInput, frame_dt: f32) -> u32 {
        self.accumulator += frame_dt.clamp(0.0, MAX_FRAME_DT);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick(state, input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;

            input.start = false;
            input.pause = false;
        }

        // Drop backlog we could not simulate in time
        if substeps == MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(SIM_DT);
        }
        substeps
    }

    /// Fraction of a tick left in the accumulator, for render interpolation
    pub fn alpha(&self) -> f32 {
        self.accumulator / SIM_DT
    }
}

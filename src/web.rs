//! Browser bindings
//!
//! A thin `wasm_bindgen` handle around [`GameState`]. The page owns the canvas and input
//! listeners; it calls [`WebGame::frame`] from `requestAnimationFrame` and draws the
//! flattened point lists this module hands back.

use wasm_bindgen::prelude::*;

use crate::highscores::format_km;
use crate::sim::{FixedTimestep, GameState, TickInput};
use crate::{CaveTuning, StageTable};

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        // Logger already installed by an earlier module instance
        return;
    }
    log::info!("Cave Escape starting...");
}

#[wasm_bindgen]
pub struct WebGame {
    state: GameState,
    stepper: FixedTimestep,
    input: TickInput,
}

#[wasm_bindgen]
impl WebGame {
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u64) -> WebGame {
        log::info!("Game initialized with seed: {seed}");
        WebGame {
            state: GameState::new(seed),
            stepper: FixedTimestep::new(),
            input: TickInput::default(),
        }
    }

    /// Build a game from JSON stage and tuning documents
    pub fn with_config(seed: u64, stages_json: &str, tuning_json: &str) -> Result<WebGame, JsError> {
        let tuning = CaveTuning::from_json(tuning_json)?;
        let stages = StageTable::from_json(stages_json, &tuning)?;
        Ok(WebGame {
            state: GameState::with_config(seed, tuning, stages),
            stepper: FixedTimestep::new(),
            input: TickInput::default(),
        })
    }

    /// Advance by real elapsed seconds. Returns the number of simulation ticks run.
    pub fn frame(&mut self, dt: f32, thrust: bool) -> u32 {
        self.input.thrust = thrust;
        let ticks = self.stepper.advance(&mut self.state, &mut self.input, dt);
        for event in self.state.drain_events() {
            log::debug!("{event:?}");
        }
        ticks
    }

    pub fn press_start(&mut self) {
        self.input.start = true;
    }

    pub fn toggle_pause(&mut self) {
        self.input.pause = true;
    }

    pub fn set_idle(&mut self, idle: bool) {
        self.input.idle_mode = idle;
        log::info!("Idle mode: {idle}");
    }

    pub fn phase(&self) -> String {
        self.state.phase.as_str().to_string()
    }

    pub fn distance(&self) -> f32 {
        self.state.distance
    }

    pub fn distance_label(&self) -> String {
        format_km(self.state.distance)
    }

    pub fn stage(&self) -> u32 {
        self.state.stage_number()
    }

    pub fn stage_name(&self) -> String {
        self.state.stage().name.clone()
    }

    pub fn stage_progress(&self) -> f32 {
        self.state.stage_progress()
    }

    pub fn background_color(&self) -> String {
        self.state.stage().colors.background.clone()
    }

    pub fn wall_color(&self) -> String {
        self.state.stage().colors.wall.clone()
    }

    pub fn best(&self) -> f32 {
        self.state.best.best().unwrap_or(0.0)
    }

    /// Leaderboard as JSON, for the page to persist however it likes
    pub fn best_json(&self) -> Result<String, JsError> {
        Ok(serde_json::to_string(&self.state.best)?)
    }

    /// Ceiling polyline as `[x0, y0, x1, y1, ...]`
    pub fn top_points(&self) -> Vec<f32> {
        self.state.cave.top().iter().flat_map(|p| [p.x, p.y]).collect()
    }

    /// Floor polyline as `[x0, y0, x1, y1, ...]`
    pub fn bottom_points(&self) -> Vec<f32> {
        self.state.cave.bottom().iter().flat_map(|p| [p.x, p.y]).collect()
    }

    pub fn craft_polygon(&self) -> Vec<f32> {
        self.state.craft.polygon().iter().flat_map(|p| [p.x, p.y]).collect()
    }

    pub fn craft_thrusting(&self) -> bool {
        self.state.craft.thrusting
    }

    /// Leftover tick fraction for render interpolation
    pub fn alpha(&self) -> f32 {
        self.stepper.alpha()
    }
}

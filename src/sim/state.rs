//! Game state and core simulation types
//!
//! Everything a run needs lives in [`GameState`]; the tick function only mutates it.

use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::cave::Cave;
use super::craft::Craft;
use crate::consts::*;
use crate::highscores::BestDistances;
use crate::stage::{StageParams, StageTable};
use crate::tuning::CaveTuning;

/// Current phase of play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the player to start a run
    Title,
    /// Active flight
    Playing,
    /// Flight frozen
    Paused,
    /// Stage target reached, waiting to continue
    StageClear,
    /// Craft hit the cave
    GameOver,
    /// Final stage cleared
    AllClear,
}

impl GamePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::Title => "title",
            GamePhase::Playing => "playing",
            GamePhase::Paused => "paused",
            GamePhase::StageClear => "stage_clear",
            GamePhase::GameOver => "game_over",
            GamePhase::AllClear => "all_clear",
        }
    }
}

/// Things that happened during a tick, for audio and UI to react to
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A stage began (1-based)
    StageStarted { stage: u32 },
    StageCleared { stage: u32, distance: f32 },
    Crashed { stage: u32, distance: f32 },
    AllCleared { distance: f32 },
    /// The finished run made the leaderboard
    NewBest { distance: f32, rank: usize },
}

/// Seed bookkeeping: one PCG stream per cave
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
    pub stream: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed, stream: 0 }
    }

    /// Seed for the next cave; every call moves to a fresh stream
    pub fn next_cave_seed(&mut self) -> u64 {
        let mut rng = Pcg32::new(self.seed, self.stream);
        self.stream += 1;
        rng.random()
    }
}

/// Complete game state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng_state: RngState,
    pub tuning: CaveTuning,
    pub stages: StageTable,
    /// Zero-based index into `stages`
    pub stage_index: usize,
    pub phase: GamePhase,
    pub cave: Cave,
    pub craft: Craft,
    /// Distance flown this run, across stages
    pub distance: f32,
    /// Distance flown in the current stage
    pub stage_distance: f32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub best: BestDistances,
    #[serde(skip)]
    events: Vec<GameEvent>,
}

impl GameState {
    /// New state on the title screen with the built-in stages
    pub fn new(seed: u64) -> Self {
        Self::with_config(seed, CaveTuning::default(), StageTable::default())
    }

    /// New state with custom tuning and stages (both assumed validated)
    pub fn with_config(seed: u64, tuning: CaveTuning, stages: StageTable) -> Self {
        let mut rng_state = RngState::new(seed);
        let cave = Cave::with_seed(
            stages.first().clone(),
            tuning.clone(),
            SAFE_DISTANCE,
            rng_state.next_cave_seed(),
        );
        let craft_x = tuning.view_width * CRAFT_X_FRACTION;
        let craft = Craft::new(craft_x, cave.center_at_x(craft_x));

        Self {
            seed,
            rng_state,
            tuning,
            stages,
            stage_index: 0,
            phase: GamePhase::Title,
            cave,
            craft,
            distance: 0.0,
            stage_distance: 0.0,
            time_ticks: 0,
            best: BestDistances::new(),
            events: Vec::new(),
        }
    }

    /// Parameters of the stage being flown
    pub fn stage(&self) -> &StageParams {
        self.cave.params()
    }

    /// 1-based stage number for display and events
    pub fn stage_number(&self) -> u32 {
        self.stage_index as u32 + 1
    }

    /// Fraction of the current stage completed, in `[0, 1]`
    pub fn stage_progress(&self) -> f32 {
        (self.stage_distance / self.stage().target_distance).min(1.0)
    }

    /// Take all events raised since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Begin a fresh run from the first stage
    pub fn start_run(&mut self) {
        log::info!("Run started (seed {})", self.seed);
        self.distance = 0.0;
        self.enter_stage(0);
    }

    /// Continue to the stage after the one just cleared
    pub fn advance_stage(&mut self) {
        self.enter_stage(self.stage_index + 1);
    }

    /// Build a fresh cave for `index` and put the craft in the middle of it
    fn enter_stage(&mut self, index: usize) {
        let Some(params) = self.stages.get(index).cloned() else {
            log::warn!("No stage {}, staying on the current one", index + 1);
            return;
        };

        self.stage_index = index;
        self.stage_distance = 0.0;
        self.cave = Cave::with_seed(
            params,
            self.tuning.clone(),
            SAFE_DISTANCE,
            self.rng_state.next_cave_seed(),
        );
        let y = self.cave.center_at_x(self.craft.pos.x);
        self.craft.respawn(y);
        self.phase = GamePhase::Playing;

        log::info!(
            "Stage {} '{}': gap {}, target {}",
            self.stage_number(),
            self.stage().name,
            self.cave.gap(),
            self.stage().target_distance
        );
        self.events.push(GameEvent::StageStarted {
            stage: self.stage_number(),
        });
    }

    /// End the run on a collision
    pub(crate) fn crash(&mut self) {
        log::info!(
            "Crashed on stage {} after {:.0} units",
            self.stage_number(),
            self.distance
        );
        self.phase = GamePhase::GameOver;
        self.events.push(GameEvent::Crashed {
            stage: self.stage_number(),
            distance: self.distance,
        });
        self.record_run();
    }

    /// Stage target reached
    pub(crate) fn clear_stage(&mut self) {
        let stage = self.stage_number();
        self.events.push(GameEvent::StageCleared {
            stage,
            distance: self.distance,
        });

        if self.stages.is_last(self.stage_index) {
            log::info!("All stages cleared ({:.0} units)", self.distance);
            self.phase = GamePhase::AllClear;
            self.events.push(GameEvent::AllCleared {
                distance: self.distance,
            });
            self.record_run();
        } else {
            log::info!("Stage {stage} cleared");
            self.phase = GamePhase::StageClear;
        }
    }

    fn record_run(&mut self) {
        if let Some(rank) = self.best.record(self.distance, self.stage_number()) {
            self.events.push(GameEvent::NewBest {
                distance: self.distance,
                rank,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_waits_on_title_with_centered_craft() {
        let state = GameState::new(12345);
        assert_eq!(state.phase, GamePhase::Title);
        assert_eq!(state.stage_number(), 1);
        assert_eq!(state.craft.pos.x, 160.0);
        assert_eq!(state.craft.pos.y, 300.0);
    }

    #[test]
    fn test_cave_seeds_come_from_separate_streams() {
        let mut a = RngState::new(7);
        let mut b = RngState::new(7);
        let first = a.next_cave_seed();
        let second = a.next_cave_seed();
        assert_ne!(first, second);
        assert_eq!(b.next_cave_seed(), first);
        assert_eq!(a.stream, 2);
    }

    #[test]
    fn test_same_seed_builds_same_cave() {
        let a = GameState::new(99);
        let b = GameState::new(99);
        assert_eq!(a.cave.corridor(), b.cave.corridor());
        assert_eq!(a.cave.seed(), b.cave.seed());
    }

    #[test]
    fn test_start_run_enters_first_stage() {
        let mut state = GameState::new(1);
        state.start_run();
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(
            state.drain_events(),
            vec![GameEvent::StageStarted { stage: 1 }]
        );
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_stage_table_rejects_empty_json_array() {
        let parsed: Result<StageTable, _> = serde_json::from_str("[]");
        assert!(parsed.is_err());
    }

    #[test]
    fn test_phase_names() {
        assert_eq!(GamePhase::StageClear.as_str(), "stage_clear");
        assert_eq!(GamePhase::GameOver.as_str(), "game_over");
    }
}

//! Cave Escape entry point
//!
//! Natively this flies a headless autopilot run through every stage and logs what happens.
//! The browser build is driven through `cave_escape::web` instead.

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use std::path::{Path, PathBuf};
    use std::process::ExitCode;

    use clap::Parser;

    use cave_escape::consts::*;
    use cave_escape::highscores::format_km;
    use cave_escape::sim::{FixedTimestep, GameEvent, GamePhase, GameState, TickInput};
    use cave_escape::{CaveTuning, ConfigError, StageTable};

    /// Frame time of the simulated display
    const FRAME_DT: f32 = 1.0 / 60.0;
    /// Give up after ten minutes of simulated play
    const MAX_FRAMES: u32 = 60 * 60 * 10;

    /// Fly a headless autopilot run through every stage
    #[derive(Parser, Debug)]
    #[command(author, version, about, long_about = None)]
    pub struct Args {
        /// Run seed; the same seed always builds the same caves
        #[arg(long, default_value_t = 0xCA5E)]
        seed: u64,

        /// JSON array of stages replacing the built-in table
        #[arg(long, value_name = "PATH")]
        stages: Option<PathBuf>,

        /// JSON object overriding generation constants
        #[arg(long, value_name = "PATH")]
        tuning: Option<PathBuf>,
    }

    fn read(path: &Path) -> Result<String, String> {
        std::fs::read_to_string(path).map_err(|e| format!("{}: {e}", path.display()))
    }

    fn load_config(args: &Args) -> Result<(CaveTuning, StageTable), String> {
        let tuning = match &args.tuning {
            Some(path) => CaveTuning::from_json(&read(path)?)
                .map_err(|e: ConfigError| format!("{}: {e}", path.display()))?,
            None => CaveTuning::default(),
        };
        let stages = match &args.stages {
            Some(path) => StageTable::from_json(&read(path)?, &tuning)
                .map_err(|e: ConfigError| format!("{}: {e}", path.display()))?,
            None => StageTable::default(),
        };
        Ok((tuning, stages))
    }

    pub fn run() -> ExitCode {
        env_logger::init();
        log::info!("Cave Escape (native) starting...");

        let args = Args::parse();
        let (tuning, stages) = match load_config(&args) {
            Ok(loaded) => loaded,
            Err(e) => {
                log::error!("{e}");
                return ExitCode::FAILURE;
            }
        };

        let mut state = GameState::with_config(args.seed, tuning, stages);
        let mut stepper = FixedTimestep::new();
        let mut input = TickInput {
            start: true,
            idle_mode: true,
            ..Default::default()
        };
        log::info!("Autopilot run with seed {}", args.seed);

        for _ in 0..MAX_FRAMES {
            stepper.advance(&mut state, &mut input, FRAME_DT);

            for event in state.drain_events() {
                match event {
                    GameEvent::StageCleared { stage, distance } => {
                        println!("stage {stage} cleared at {}", format_km(distance));
                    }
                    GameEvent::NewBest { distance, rank } => {
                        println!("new best #{rank}: {}", format_km(distance));
                    }
                    other => log::debug!("{other:?}"),
                }
            }

            match state.phase {
                GamePhase::StageClear => input.start = true,
                GamePhase::GameOver | GamePhase::AllClear => break,
                _ => {}
            }
        }

        println!(
            "{} on stage {} '{}' after {} ({} ticks, {:.1}s simulated)",
            state.phase.as_str(),
            state.stage_number(),
            state.stage().name,
            format_km(state.distance),
            state.time_ticks,
            state.time_ticks as f32 * SIM_DT,
        );
        ExitCode::SUCCESS
    }

}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    demo::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is cave_escape::web::start, this is just to satisfy the compiler
}

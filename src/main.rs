//! Headless session runner
//!
//! Plays scripted umpire sessions without a renderer: useful for soak
//! testing the pitch pipeline and eyeballing call distributions.
//!
//! Usage:
//!   umpire-sim [practice|endless|level <n>] [--pitches <n>] [--seed <n>] [--blind]
//!
//! The umpire is an oracle by default (always calls what the zone says);
//! `--blind` flips a coin instead, which is a decent way to watch endless
//! mode lose.

use std::path::PathBuf;
use std::process::ExitCode;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use umpire_sim::consts::SIM_DT;
use umpire_sim::sim::{
    GameMode, PitchCall, SessionConfig, SessionEvent, SessionPhase, SessionState, TickInput, tick,
};
use umpire_sim::{LevelDatabase, Progress};

struct RunnerArgs {
    mode: GameMode,
    pitches: u32,
    seed: u64,
    blind: bool,
}

fn parse_args() -> Result<RunnerArgs, String> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut mode = GameMode::Practice;
    let mut pitches = 20;
    let mut seed = 1;
    let mut blind = false;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "practice" => mode = GameMode::Practice,
            "endless" => mode = GameMode::Endless,
            "level" => {
                i += 1;
                let n: u32 = args
                    .get(i)
                    .ok_or("level requires a number")?
                    .parse()
                    .map_err(|_| "level requires a number".to_string())?;
                let db = LevelDatabase::standard();
                let params = db.get(n).ok_or(format!("no level {n}"))?;
                mode = GameMode::Level(*params);
            }
            "--pitches" => {
                i += 1;
                pitches = args
                    .get(i)
                    .ok_or("--pitches requires a number")?
                    .parse()
                    .map_err(|_| "--pitches requires a number".to_string())?;
            }
            "--seed" => {
                i += 1;
                seed = args
                    .get(i)
                    .ok_or("--seed requires a number")?
                    .parse()
                    .map_err(|_| "--seed requires a number".to_string())?;
            }
            "--blind" => blind = true,
            other => return Err(format!("unknown argument: {other}")),
        }
        i += 1;
    }

    Ok(RunnerArgs {
        mode,
        pitches,
        seed,
        blind,
    })
}

fn save_path() -> PathBuf {
    std::env::var_os("UMPIRE_SIM_SAVE")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("save.json"))
}

fn main() -> ExitCode {
    env_logger::init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(msg) => {
            eprintln!("{msg}");
            eprintln!("usage: umpire-sim [practice|endless|level <n>] [--pitches <n>] [--seed <n>] [--blind]");
            return ExitCode::FAILURE;
        }
    };

    let mut state = match SessionState::new(args.mode, SessionConfig::default(), args.seed) {
        Ok(state) => state,
        Err(err) => {
            eprintln!("bad configuration: {err}");
            return ExitCode::FAILURE;
        }
    };

    // The umpire's own coin, separate from the session's seeded stream.
    let mut umpire_rng = Pcg32::seed_from_u64(args.seed ^ 0x5eed);
    let zone = state.config.zone.world_rect();
    let ball_radius = state.config.ball_radius;

    let mut resolved = 0u32;

    while state.phase != SessionPhase::GameOver && resolved < args.pitches {
        let call = if state.phase == SessionPhase::Captured {
            // Decide the call from the recorded crossing, or a coin flip.
            let crossing = state.pending_call_location();
            let call = match (crossing, args.blind) {
                (Some(location), false) => {
                    if zone.is_strike(location, ball_radius) {
                        PitchCall::Strike
                    } else {
                        PitchCall::Ball
                    }
                }
                _ => {
                    if umpire_rng.random::<f32>() < 0.5 {
                        PitchCall::Strike
                    } else {
                        PitchCall::Ball
                    }
                }
            };
            Some(call)
        } else {
            None
        };

        tick(&mut state, &TickInput { call }, SIM_DT);

        for event in state.drain_events() {
            match event {
                SessionEvent::PitchLaunched { target, kind, .. } => {
                    println!(
                        "pitch {:>3}  {:?} headed for y={:.2} z={:+.2}",
                        state.pitch_count, kind, target.y, target.z
                    );
                }
                SessionEvent::CallResolved { call, correct, .. } => {
                    resolved += 1;
                    println!(
                        "           called {call:?}: {}",
                        if correct { "correct" } else { "WRONG" }
                    );
                }
                SessionEvent::SessionEnded {
                    won,
                    correct_calls,
                    stars,
                } => {
                    println!(
                        "session over: {} ({correct_calls} correct, {stars} stars)",
                        if won { "won" } else { "lost" }
                    );
                }
                _ => {}
            }
        }
    }

    println!(
        "summary: {} of {} calls correct",
        state.correct_calls, state.pitch_count
    );

    // Persistence is a boundary call, made here and never inside the tick.
    let path = save_path();
    let mut progress = Progress::load(&path);
    let mut dirty = false;
    if state.mode == GameMode::Endless && progress.record_score(state.correct_calls) {
        println!("new high score: {}", progress.highscore);
        dirty = true;
    }
    if let GameMode::Level(params) = state.mode {
        if state.stars_earned >= 1 {
            progress.unlock_level(params.level as usize); // index of the level after this one
            dirty = true;
        }
    }
    if dirty {
        if let Err(err) = progress.save(&path) {
            log::warn!("could not save progress: {err}");
        }
    }

    ExitCode::SUCCESS
}

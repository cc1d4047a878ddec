//! Fixed timestep session tick
//!
//! Advances the pitch clock, ball flight, plane-crossing detection and call
//! resolution deterministically. One call per fixed step, single threaded.

use rand::Rng;

use super::launch::solve_launch_velocity;
use super::plane::{center_on_plane, orient_along, plate_normal, try_plane_entry};
use super::sample::{sample_pitch_location, sample_pitch_speed};
use super::state::{
    CallVoice, FlightBall, GameMode, PitchCall, PitchRecord, SessionEvent, SessionPhase,
    SessionState,
};
use crate::consts::ANY_PART_COUNTS;

/// Attempts to re-sample a target whose solve came back unreachable before
/// the pitch is skipped
const MAX_LAUNCH_ATTEMPTS: u32 = 8;

/// Number of recorded strike-call voice lines
const STRIKE_VOICE_LINES: u8 = 4;

/// Input commands for a single tick
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// The umpire's call, honored only while a pitch is captured
    pub call: Option<PitchCall>,
}

/// Advance the session by one fixed timestep
pub fn tick(state: &mut SessionState, input: &TickInput, dt: f32) {
    if state.phase == SessionPhase::Idle {
        state.arm_for_next_pitch();
    }
    if state.phase == SessionPhase::GameOver {
        return;
    }

    state.time_ticks += 1;

    match state.phase {
        SessionPhase::Countdown => {
            state.countdown_ticks = state.countdown_ticks.saturating_sub(1);
            if state.countdown_ticks == 0 {
                launch_pitch(state, dt);
            }
        }
        SessionPhase::InFlight => advance_flight(state, dt),
        SessionPhase::Captured => {
            if let Some(call) = input.call {
                resolve_call(state, call);
            }
        }
        SessionPhase::Idle | SessionPhase::GameOver => {}
    }
}

/// Sample a target, solve the launch and put a ball in the air
fn launch_pitch(state: &mut SessionState, dt: f32) {
    state.pitch_count += 1;

    let config = state.config;
    let zone = config.zone.world_rect();
    let plate_x = config.strike_plane_point.x;

    for attempt in 0..MAX_LAUNCH_ATTEMPTS {
        let outcome = sample_pitch_location(
            &mut state.rng,
            &zone,
            plate_x,
            config.ball_radius,
            &config.tuning,
        );
        let speed = sample_pitch_speed(
            &mut state.rng,
            config.pitch_speed_lower,
            config.pitch_speed_upper,
        );

        match solve_launch_velocity(speed, config.release_point, outcome.target, config.gravity) {
            Ok(velocity) => {
                let center = config.release_point;
                state.ball = Some(FlightBall {
                    center,
                    velocity,
                    radius: config.ball_radius,
                });
                // Half-step bootstrap so the first flight step has a
                // meaningful previous sample.
                state.prev_center = center - velocity * (0.5 * dt);
                state.phase = SessionPhase::InFlight;
                state.events.push(SessionEvent::PitchLaunched {
                    target: outcome.target,
                    velocity,
                    kind: outcome.kind,
                });
                log::debug!(
                    "pitch {} launched at {speed:.1} m/s toward {:?} ({:?})",
                    state.pitch_count,
                    outcome.target,
                    outcome.kind
                );
                return;
            }
            Err(err) => {
                log::warn!("launch attempt {attempt} failed: {err}; resampling");
            }
        }
    }

    // Geometry validation should make this unreachable with sane configs;
    // skip the pitch rather than wedge the session.
    log::error!(
        "pitch {} skipped: no reachable target after {MAX_LAUNCH_ATTEMPTS} attempts",
        state.pitch_count
    );
    state.arm_for_next_pitch();
}

/// One flight step: integrate, then test both planes against the
/// prev -> now segment
fn advance_flight(state: &mut SessionState, dt: f32) {
    let Some(mut ball) = state.ball else {
        debug_assert!(false, "in flight without a ball");
        state.arm_for_next_pitch();
        return;
    };

    // Semi-implicit Euler under constant gravity.
    ball.velocity.y -= state.config.gravity * dt;
    ball.center += ball.velocity * dt;

    let prev = state.prev_center;
    let now = ball.center;
    let step = now - prev;
    let radius = ball.radius;
    let config = state.config;

    // Plane normals are re-oriented along the travel direction every step so
    // the crossing test stays direction-consistent.
    let n_strike = orient_along(
        plate_normal(config.release_point, config.strike_plane_point),
        step,
    );
    let n_catch = orient_along(
        plate_normal(config.release_point, config.catch_plane_point),
        step,
    );

    // Plate plane: record the candidate call location. Flight continues.
    if let Some(crossing) = try_plane_entry(
        prev,
        now,
        config.strike_plane_point,
        n_strike,
        radius,
        ANY_PART_COUNTS,
    ) {
        // The call is judged where the ball *center* meets the plane; the
        // entry recovery above uses the leading surface.
        let location = center_on_plane(prev, now, config.strike_plane_point, n_strike)
            .unwrap_or(crossing.center_at_entry);
        state.plate_crossing = Some(location);
        state.events.push(SessionEvent::CallReady {
            contact_point: crossing.contact_point,
            center_at_entry: crossing.center_at_entry,
            fraction: crossing.fraction,
        });
    }

    // Catch plane: flight is over, the ball is gone.
    if try_plane_entry(
        prev,
        now,
        config.catch_plane_point,
        n_catch,
        radius,
        ANY_PART_COUNTS,
    )
    .is_some()
    {
        log::debug!("crossed catch plane at tick {}", state.time_ticks);
        state.ball = None;
        state.phase = SessionPhase::Captured;
        state.prev_center = now;
        return;
    }

    state.ball = Some(ball);
    state.prev_center = now;
}

/// Score the umpire's call against the recorded plate crossing and re-arm
fn resolve_call(state: &mut SessionState, call: PitchCall) {
    let Some(location) = state.plate_crossing else {
        debug_assert!(false, "captured pitch without a recorded plate crossing");
        log::error!("call dropped: no plate crossing recorded");
        state.arm_for_next_pitch();
        return;
    };

    let zone = state.config.zone.world_rect();
    let was_strike = zone.is_strike(location, state.config.ball_radius);
    let correct = (call == PitchCall::Strike) == was_strike;

    if correct {
        state.correct_calls += 1;
    } else if state.mode == GameMode::Endless {
        state.lives -= 1;
    }
    if matches!(state.mode, GameMode::Level(_)) {
        state.history.push(PitchRecord { location, correct });
    }

    let voice = match call {
        PitchCall::Strike => CallVoice::Strike(state.rng.random_range(0..STRIKE_VOICE_LINES)),
        PitchCall::Ball => CallVoice::Ball,
    };

    state.last_pitch_location = Some(location);
    state.events.push(SessionEvent::CallResolved {
        call,
        correct,
        voice,
        correct_calls: state.correct_calls,
        lives: state.lives,
        pitch_count: state.pitch_count,
    });
    log::debug!(
        "call {:?} on {:?}: {}",
        call,
        location,
        if correct { "correct" } else { "wrong" }
    );

    state.arm_for_next_pitch();
}

//! Session state and core types
//!
//! All mutable session state lives in one owned struct, advanced only by
//! `tick`. Configuration is an immutable record validated up front; the RNG
//! is seeded once and owned by the session.

use glam::Vec3;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::sample::{PitchKind, PitchTuning, TuningError};
use super::zone::ZoneSource;
use crate::consts::*;
use crate::levels::LevelParams;

/// Game mode a session runs under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameMode {
    /// Free calling, never terminates
    Practice,
    /// Wrong calls cost lives; the session ends when they run out
    Endless,
    /// Fixed pitch count scored against star thresholds
    Level(LevelParams),
}

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Created, first pitch not yet armed
    Idle,
    /// Pitch clock running
    Countdown,
    /// Ball in the air
    InFlight,
    /// Flight over, awaiting the umpire's call
    Captured,
    /// Session ended
    GameOver,
}

/// The umpire's call on a captured pitch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PitchCall {
    Strike,
    Ball,
}

/// Voice line selected for an announced call. Four strike calls are
/// recorded; the variant index picks one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallVoice {
    Strike(u8),
    Ball,
}

/// The simulated ball mid-flight
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlightBall {
    pub center: Vec3,
    pub velocity: Vec3,
    pub radius: f32,
}

/// One adjudicated pitch in a level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PitchRecord {
    /// Where the ball center crossed the plate plane
    pub location: Vec3,
    /// Whether the umpire's call matched the zone
    pub correct: bool,
}

/// One step of a timed pitch-history replay
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReviewStep {
    /// Seconds to wait before presenting this pitch
    pub delay: f32,
    /// 1-based pitch number within the level
    pub pitch_number: u32,
    pub record: PitchRecord,
}

/// Events exposed to the presentation layer, drained each frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SessionEvent {
    /// The pitch clock started running
    CountdownStarted { seconds: f32 },
    /// A ball left the release point
    PitchLaunched {
        target: Vec3,
        velocity: Vec3,
        kind: PitchKind,
    },
    /// The ball crossed the plate plane; a call can now be judged
    CallReady {
        contact_point: Vec3,
        center_at_entry: Vec3,
        fraction: f32,
    },
    /// The umpire's call was scored
    CallResolved {
        call: PitchCall,
        correct: bool,
        voice: CallVoice,
        correct_calls: u32,
        lives: i32,
        pitch_count: u32,
    },
    /// The session is over
    SessionEnded {
        won: bool,
        correct_calls: u32,
        stars: u32,
    },
}

/// Immutable session configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub tuning: PitchTuning,
    /// Box volume the strike zone rectangle is derived from
    pub zone: ZoneSource,
    /// Where pitches leave the pitcher's hand
    pub release_point: Vec3,
    /// Point on the plate plane where calls are recorded
    pub strike_plane_point: Vec3,
    /// Point on the plane behind the plate where flight ends
    pub catch_plane_point: Vec3,
    pub ball_radius: f32,
    pub gravity: f32,
    pub pitch_speed_lower: f32,
    pub pitch_speed_upper: f32,
    /// Seconds on the pitch clock
    pub time_between_pitches: f32,
    /// Endless mode starting lives
    pub lives: i32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            tuning: PitchTuning::default(),
            zone: ZoneSource {
                center: Vec3::new(0.0, 0.75, 0.0),
                size: Vec3::new(0.1, 0.55, 0.43),
                lossy_scale: Vec3::ONE,
            },
            release_point: Vec3::new(18.44, 1.83, 0.0),
            strike_plane_point: Vec3::new(0.0, 0.75, 0.0),
            catch_plane_point: Vec3::new(-0.9, 0.6, 0.0),
            ball_radius: BALL_RADIUS,
            gravity: GRAVITY,
            pitch_speed_lower: PITCH_SPEED_LOWER,
            pitch_speed_upper: PITCH_SPEED_UPPER,
            time_between_pitches: TIME_BETWEEN_PITCHES,
            lives: START_LIVES,
        }
    }
}

/// Rejected session configuration, reported before a session exists
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    Tuning(TuningError),
    NonPositiveBallRadius(f32),
    NonPositiveGravity(f32),
    /// Speed band is inverted or non-positive
    BadSpeedBand { lower: f32, upper: f32 },
    NonPositivePitchClock(f32),
    NonPositiveLives(i32),
    /// Release point and plate plane point are vertically aligned, so no
    /// plate normal exists
    DegeneratePlateAxis,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Tuning(e) => write!(f, "pitch tuning: {e}"),
            ConfigError::NonPositiveBallRadius(r) => {
                write!(f, "ball radius must be positive, got {r}")
            }
            ConfigError::NonPositiveGravity(g) => {
                write!(f, "gravity must be positive, got {g}")
            }
            ConfigError::BadSpeedBand { lower, upper } => {
                write!(f, "pitch speed band [{lower}, {upper}] is invalid")
            }
            ConfigError::NonPositivePitchClock(t) => {
                write!(f, "pitch clock must be positive, got {t}")
            }
            ConfigError::NonPositiveLives(l) => {
                write!(f, "starting lives must be positive, got {l}")
            }
            ConfigError::DegeneratePlateAxis => {
                write!(f, "release point and plate plane point are vertically aligned")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Tuning(e) => Some(e),
            _ => None,
        }
    }
}

impl From<TuningError> for ConfigError {
    fn from(e: TuningError) -> Self {
        ConfigError::Tuning(e)
    }
}

impl SessionConfig {
    /// Fail-fast validation; malformed configuration never reaches sampling
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.tuning.validate()?;
        if !(self.ball_radius > 0.0) {
            return Err(ConfigError::NonPositiveBallRadius(self.ball_radius));
        }
        if !(self.gravity > 0.0) {
            return Err(ConfigError::NonPositiveGravity(self.gravity));
        }
        if !(self.pitch_speed_lower > 0.0) || !(self.pitch_speed_upper >= self.pitch_speed_lower) {
            return Err(ConfigError::BadSpeedBand {
                lower: self.pitch_speed_lower,
                upper: self.pitch_speed_upper,
            });
        }
        if !(self.time_between_pitches > 0.0) {
            return Err(ConfigError::NonPositivePitchClock(self.time_between_pitches));
        }
        if self.lives <= 0 {
            return Err(ConfigError::NonPositiveLives(self.lives));
        }
        let axis = crate::flatten_y(self.strike_plane_point - self.release_point);
        if axis.length_squared() < 1e-6 {
            return Err(ConfigError::DegeneratePlateAxis);
        }
        Ok(())
    }
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct SessionState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub mode: GameMode,
    pub config: SessionConfig,
    pub phase: SessionPhase,
    /// Pitch clock, ticks remaining while counting down
    pub countdown_ticks: u32,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Active ball, present only in flight
    pub ball: Option<FlightBall>,
    /// Ball center at the previous fixed step
    pub(crate) prev_center: Vec3,
    /// Candidate call location recorded at the plate plane
    pub(crate) plate_crossing: Option<Vec3>,
    /// Location shown for "view last pitch", kept across re-arms
    pub last_pitch_location: Option<Vec3>,
    pub pitch_count: u32,
    pub correct_calls: u32,
    /// Remaining lives (meaningful in endless mode)
    pub lives: i32,
    /// Stars earned (level mode, set at game over)
    pub stars_earned: u32,
    /// Adjudicated pitches for the current level, append-only
    pub history: Vec<PitchRecord>,
    /// Pending events for the presentation layer
    pub events: Vec<SessionEvent>,
    pub(crate) rng: Pcg32,
}

impl SessionState {
    /// Create a session. Configuration is validated here, never mid-pitch.
    pub fn new(mode: GameMode, config: SessionConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            seed,
            mode,
            config,
            phase: SessionPhase::Idle,
            countdown_ticks: 0,
            time_ticks: 0,
            ball: None,
            prev_center: Vec3::ZERO,
            plate_crossing: None,
            last_pitch_location: None,
            pitch_count: 0,
            correct_calls: 0,
            lives: config.lives,
            stars_earned: 0,
            history: Vec::new(),
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
        })
    }

    /// Arm the pitch clock for the next pitch, or end the session.
    ///
    /// Termination is evaluated here, at arm time, never mid-flight.
    pub(crate) fn arm_for_next_pitch(&mut self) {
        self.ball = None;
        self.plate_crossing = None;

        if let GameMode::Level(params) = self.mode {
            if self.pitch_count >= params.pitch_amount {
                self.stars_earned = params.stars_for(self.correct_calls);
                let won = self.stars_earned >= 1;
                self.end_session(won);
                return;
            }
        }
        if self.mode == GameMode::Endless && self.lives <= 0 {
            self.end_session(false);
            return;
        }

        self.countdown_ticks = (self.config.time_between_pitches / SIM_DT).round() as u32;
        self.phase = SessionPhase::Countdown;
        self.events.push(SessionEvent::CountdownStarted {
            seconds: self.config.time_between_pitches,
        });
    }

    fn end_session(&mut self, won: bool) {
        self.phase = SessionPhase::GameOver;
        self.events.push(SessionEvent::SessionEnded {
            won,
            correct_calls: self.correct_calls,
            stars: self.stars_earned,
        });
        log::info!(
            "session over: won={won} correct={} pitches={} stars={}",
            self.correct_calls,
            self.pitch_count,
            self.stars_earned
        );
    }

    /// Seconds left on the pitch clock, for display
    pub fn pitch_clock_seconds(&self) -> f32 {
        self.countdown_ticks as f32 * SIM_DT
    }

    /// The plate crossing of the pitch currently awaiting a call
    pub fn pending_call_location(&self) -> Option<Vec3> {
        self.plate_crossing
    }

    /// Drain pending events for the presentation layer
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    /// Timed replay plan of the level's recorded pitches. Ten seconds are
    /// split across the history, one second per pitch at most; the
    /// presentation layer consumes the steps as cancellable delays.
    pub fn review_schedule(&self) -> Vec<ReviewStep> {
        if self.history.is_empty() {
            return Vec::new();
        }
        let delay = (10.0 / self.history.len() as f32).min(1.0);
        self.history
            .iter()
            .enumerate()
            .map(|(i, record)| ReviewStep {
                delay,
                pitch_number: i as u32 + 1,
                record: *record,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validates() {
        assert!(SessionConfig::default().validate().is_ok());
    }

    #[test]
    fn test_config_rejections() {
        let mut cfg = SessionConfig::default();
        cfg.ball_radius = 0.0;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::NonPositiveBallRadius(_))
        ));

        let mut cfg = SessionConfig::default();
        cfg.pitch_speed_upper = cfg.pitch_speed_lower - 1.0;
        assert!(matches!(cfg.validate(), Err(ConfigError::BadSpeedBand { .. })));

        let mut cfg = SessionConfig::default();
        cfg.tuning.strike_probability = -0.1;
        assert!(matches!(cfg.validate(), Err(ConfigError::Tuning(_))));

        let mut cfg = SessionConfig::default();
        cfg.release_point = cfg.strike_plane_point + Vec3::Y;
        assert!(matches!(cfg.validate(), Err(ConfigError::DegeneratePlateAxis)));

        let mut cfg = SessionConfig::default();
        cfg.lives = 0;
        assert!(matches!(cfg.validate(), Err(ConfigError::NonPositiveLives(0))));
    }

    #[test]
    fn test_new_session_rejects_bad_config() {
        let mut cfg = SessionConfig::default();
        cfg.gravity = -9.81;
        assert!(SessionState::new(GameMode::Practice, cfg, 1).is_err());
    }

    #[test]
    fn test_new_session_starts_idle() {
        let state = SessionState::new(GameMode::Endless, SessionConfig::default(), 42).unwrap();
        assert_eq!(state.phase, SessionPhase::Idle);
        assert_eq!(state.lives, START_LIVES);
        assert_eq!(state.pitch_count, 0);
        assert!(state.ball.is_none());
    }

    #[test]
    fn test_review_schedule_caps_interval() {
        let mut state =
            SessionState::new(GameMode::Practice, SessionConfig::default(), 1).unwrap();

        let record = PitchRecord {
            location: Vec3::ZERO,
            correct: true,
        };

        // Few pitches: one second each.
        state.history = vec![record; 4];
        let schedule = state.review_schedule();
        assert_eq!(schedule.len(), 4);
        assert!(schedule.iter().all(|s| (s.delay - 1.0).abs() < 1e-6));
        assert_eq!(schedule[3].pitch_number, 4);

        // Many pitches: ten seconds split across them.
        state.history = vec![record; 25];
        let schedule = state.review_schedule();
        assert!((schedule[0].delay - 0.4).abs() < 1e-6);

        state.history.clear();
        assert!(state.review_schedule().is_empty());
    }

    #[test]
    fn test_drain_events_empties_queue() {
        let mut state =
            SessionState::new(GameMode::Practice, SessionConfig::default(), 1).unwrap();
        state.events.push(SessionEvent::CountdownStarted { seconds: 5.0 });
        assert_eq!(state.drain_events().len(), 1);
        assert!(state.events.is_empty());
    }
}

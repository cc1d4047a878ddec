//! Umpire Sim - a headless baseball umpire training simulator
//!
//! Core modules:
//! - `sim`: Deterministic simulation (pitch sampling, ballistics, plane
//!   crossing, session state machine)
//! - `levels`: Level parameter database
//! - `progress`: Level unlocks and high score persistence
//!
//! Rendering, input and audio playback live outside this crate; they consume
//! the events and records the simulation produces.

pub mod levels;
pub mod progress;
pub mod sim;

pub use levels::{LevelDatabase, LevelParams};
pub use progress::Progress;
pub use sim::{SessionConfig, SessionState, tick};

use glam::Vec3;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (50 Hz physics)
    pub const SIM_DT: f32 = 1.0 / 50.0;
    /// Gravity magnitude in m/s², pulling along -Y
    pub const GRAVITY: f32 = 9.81;
    /// Baseball radius in meters
    pub const BALL_RADIUS: f32 = 0.0365;
    /// Crossing rule: the near surface of the ball counts, not just its center
    pub const ANY_PART_COUNTS: bool = true;

    /// Seconds on the pitch clock between pitches
    pub const TIME_BETWEEN_PITCHES: f32 = 5.0;
    /// Pitch speed band (m/s)
    pub const PITCH_SPEED_LOWER: f32 = 34.0;
    pub const PITCH_SPEED_UPPER: f32 = 44.0;

    /// Endless mode starting lives
    pub const START_LIVES: i32 = 3;
    /// Number of selectable levels
    pub const LEVEL_COUNT: usize = 10;
}

/// Project a vector onto the horizontal (XZ) plane
#[inline]
pub fn flatten_y(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}

/// Horizontal distance between two points, ignoring height
#[inline]
pub fn horizontal_distance(a: Vec3, b: Vec3) -> f32 {
    let d = b - a;
    (d.x * d.x + d.z * d.z).sqrt()
}

/// Uniform draw in [lo, hi) that tolerates a degenerate (lo == hi) band
#[inline]
pub fn uniform_in<R: rand::Rng>(rng: &mut R, lo: f32, hi: f32) -> f32 {
    lo + rng.random::<f32>() * (hi - lo)
}

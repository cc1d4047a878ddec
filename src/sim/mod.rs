//! Deterministic simulation module
//!
//! All adjudication logic lives here. This module must be pure and
//! deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - No rendering, audio or platform dependencies

pub mod launch;
pub mod plane;
pub mod sample;
pub mod state;
pub mod tick;
pub mod zone;

pub use launch::{LaunchError, solve_launch_velocity};
pub use plane::{PlaneCrossing, center_on_plane, orient_along, plate_normal, try_plane_entry};
pub use sample::{PitchKind, PitchOutcome, PitchTuning, TuningError, sample_pitch_location};
pub use state::{
    CallVoice, ConfigError, FlightBall, GameMode, PitchCall, PitchRecord, ReviewStep,
    SessionConfig, SessionEvent, SessionPhase, SessionState,
};
pub use tick::{TickInput, tick};
pub use zone::{StrikeZoneRect, ZoneSource};

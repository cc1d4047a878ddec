//! Pitch target sampling
//!
//! Draws where the next pitch will cross the plate plane. Strikes land
//! uniformly inside the zone. Balls miss past an edge or a corner, with the
//! overshoot distance drawn from a two-part mixture: most misses are
//! "nibbles" biased toward the edge, a small fraction come from a wild tail
//! biased toward the far cap.

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::zone::StrikeZoneRect;
use crate::uniform_in;

/// Classification of a sampled pitch target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PitchKind {
    /// Target inside the zone rectangle
    Strike,
    /// Exactly one axis outside the zone
    BallEdge,
    /// Both axes outside the zone
    BallCorner,
}

/// A sampled target plus how it was classified
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PitchOutcome {
    pub kind: PitchKind,
    pub target: Vec3,
}

/// Tunable pitch distribution parameters
///
/// Probabilities are independent; they are not required to sum to anything.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PitchTuning {
    /// Overall strike rate
    pub strike_probability: f32,
    /// Among balls, chance the miss is a corner (both axes outside)
    pub corner_among_balls_probability: f32,
    /// Among overshoots, chance the distance comes from the wild tail
    pub wild_miss_probability: f32,

    /// Near-edge overshoot caps (typical nibbles), meters past the edge
    pub near_max_beyond_edge_y: f32,
    pub near_max_beyond_edge_z: f32,
    /// Wild overshoot caps (how far wild throws can go)
    pub wild_max_beyond_edge_y: f32,
    pub wild_max_beyond_edge_z: f32,

    /// >1 squeezes near-edge mass toward 0 (closer to the edge)
    pub near_edge_bias_power: f32,
    /// <1 pulls wild mass toward the far end of [near_max, wild_max]
    pub wild_tail_power: f32,

    /// Fixed margin added to the ball radius when clearing an edge
    pub edge_margin_y: f32,
    pub edge_margin_z: f32,
}

impl Default for PitchTuning {
    fn default() -> Self {
        Self {
            strike_probability: 0.6,
            corner_among_balls_probability: 0.20,
            wild_miss_probability: 0.05,
            near_max_beyond_edge_y: 0.15,
            near_max_beyond_edge_z: 0.15,
            wild_max_beyond_edge_y: 0.50,
            wild_max_beyond_edge_z: 0.50,
            near_edge_bias_power: 1.375,
            wild_tail_power: 0.6,
            edge_margin_y: 0.005,
            edge_margin_z: 0.005,
        }
    }
}

/// Rejected tuning values, reported at configuration time before any
/// sampling happens
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TuningError {
    ProbabilityOutOfRange { name: &'static str, value: f32 },
    NegativeDistance { name: &'static str, value: f32 },
    /// `near_edge_bias_power` must be >= 1
    BiasPowerTooSmall { value: f32 },
    /// `wild_tail_power` must be >= 0.1
    TailPowerTooSmall { value: f32 },
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TuningError::ProbabilityOutOfRange { name, value } => {
                write!(f, "{name} must be in [0, 1], got {value}")
            }
            TuningError::NegativeDistance { name, value } => {
                write!(f, "{name} must be non-negative, got {value}")
            }
            TuningError::BiasPowerTooSmall { value } => {
                write!(f, "near_edge_bias_power must be >= 1, got {value}")
            }
            TuningError::TailPowerTooSmall { value } => {
                write!(f, "wild_tail_power must be >= 0.1, got {value}")
            }
        }
    }
}

impl std::error::Error for TuningError {}

impl PitchTuning {
    /// Fail-fast validation, run once at configuration time
    pub fn validate(&self) -> Result<(), TuningError> {
        let probabilities = [
            ("strike_probability", self.strike_probability),
            (
                "corner_among_balls_probability",
                self.corner_among_balls_probability,
            ),
            ("wild_miss_probability", self.wild_miss_probability),
        ];
        for (name, value) in probabilities {
            if !(0.0..=1.0).contains(&value) {
                return Err(TuningError::ProbabilityOutOfRange { name, value });
            }
        }

        let distances = [
            ("near_max_beyond_edge_y", self.near_max_beyond_edge_y),
            ("near_max_beyond_edge_z", self.near_max_beyond_edge_z),
            ("wild_max_beyond_edge_y", self.wild_max_beyond_edge_y),
            ("wild_max_beyond_edge_z", self.wild_max_beyond_edge_z),
            ("edge_margin_y", self.edge_margin_y),
            ("edge_margin_z", self.edge_margin_z),
        ];
        for (name, value) in distances {
            if !(value >= 0.0) {
                return Err(TuningError::NegativeDistance { name, value });
            }
        }

        if !(self.near_edge_bias_power >= 1.0) {
            return Err(TuningError::BiasPowerTooSmall {
                value: self.near_edge_bias_power,
            });
        }
        if !(self.wild_tail_power >= 0.1) {
            return Err(TuningError::TailPowerTooSmall {
                value: self.wild_tail_power,
            });
        }
        Ok(())
    }
}

/// Equal-probability sign pick
fn rand_sign<R: Rng>(rng: &mut R) -> f32 {
    if rng.random::<f32>() < 0.5 { -1.0 } else { 1.0 }
}

/// 0..near_max with mass near 0 (edge nibbles)
fn sample_near<R: Rng>(rng: &mut R, near_max: f32, bias_power: f32) -> f32 {
    rng.random::<f32>().powf(bias_power) * near_max.max(0.0)
}

/// [near_max..wild_max] with mass toward wild_max (big misses)
fn sample_wild<R: Rng>(rng: &mut R, near_max: f32, wild_max: f32, tail_power: f32) -> f32 {
    let u: f32 = rng.random();
    // 1 - (1-u)^p biases toward 1 when p < 1.
    let t = 1.0 - (1.0 - u).powf(tail_power);
    let lo = near_max.min(wild_max);
    let hi = near_max.max(wild_max);
    lo + (hi - lo) * t
}

/// Overshoot past an edge, drawn from the near/wild mixture
fn sample_overshoot<R: Rng>(rng: &mut R, tuning: &PitchTuning, near_max: f32, wild_max: f32) -> f32 {
    if rng.random::<f32>() < tuning.wild_miss_probability {
        sample_wild(rng, near_max, wild_max, tuning.wild_tail_power)
    } else {
        sample_near(rng, near_max, tuning.near_edge_bias_power)
    }
}

/// Draw the next pitch target in the plate plane at `plate_x`.
///
/// The caller owns the RNG, so the sampler itself stays a pure function of
/// its inputs. `tuning` is assumed validated.
pub fn sample_pitch_location<R: Rng>(
    rng: &mut R,
    zone: &StrikeZoneRect,
    plate_x: f32,
    ball_radius: f32,
    tuning: &PitchTuning,
) -> PitchOutcome {
    let c = zone.center;
    let (half_y, half_z) = (zone.half_y, zone.half_z);

    let clearance_y = ball_radius + tuning.edge_margin_y;
    let clearance_z = ball_radius + tuning.edge_margin_z;

    // Absolute clamp region from the wild caps: no sample may land further
    // out than a maximal wild miss regardless of the draw.
    let y_min = c.y - half_y - (clearance_y + tuning.wild_max_beyond_edge_y);
    let y_max = c.y + half_y + (clearance_y + tuning.wild_max_beyond_edge_y);
    let z_min = c.z - half_z - (clearance_z + tuning.wild_max_beyond_edge_z);
    let z_max = c.z + half_z + (clearance_z + tuning.wild_max_beyond_edge_z);

    // 1) Strike or ball?
    if rng.random::<f32>() < tuning.strike_probability {
        let y = uniform_in(rng, c.y - half_y, c.y + half_y);
        let z = uniform_in(rng, c.z - half_z, c.z + half_z);
        return PitchOutcome {
            kind: PitchKind::Strike,
            target: Vec3::new(plate_x, y, z),
        };
    }

    // 2) Ball: corner (both axes out) or edge (one axis out)?
    let corner = rng.random::<f32>() < tuning.corner_among_balls_probability;

    let (kind, mut y, mut z) = if corner {
        let s_y = rand_sign(rng);
        let s_z = rand_sign(rng);
        let d_y = sample_overshoot(rng, tuning, tuning.near_max_beyond_edge_y, tuning.wild_max_beyond_edge_y);
        let d_z = sample_overshoot(rng, tuning, tuning.near_max_beyond_edge_z, tuning.wild_max_beyond_edge_z);

        (
            PitchKind::BallCorner,
            c.y + s_y * (half_y + clearance_y + d_y),
            c.z + s_z * (half_z + clearance_z + d_z),
        )
    } else if rng.random::<f32>() < 0.5 {
        // Miss high or low, lateral position stays inside the zone.
        let s_y = rand_sign(rng);
        let d_y = sample_overshoot(rng, tuning, tuning.near_max_beyond_edge_y, tuning.wild_max_beyond_edge_y);
        (
            PitchKind::BallEdge,
            c.y + s_y * (half_y + clearance_y + d_y),
            uniform_in(rng, c.z - half_z, c.z + half_z),
        )
    } else {
        // Miss left or right.
        let s_z = rand_sign(rng);
        let d_z = sample_overshoot(rng, tuning, tuning.near_max_beyond_edge_z, tuning.wild_max_beyond_edge_z);
        (
            PitchKind::BallEdge,
            uniform_in(rng, c.y - half_y, c.y + half_y),
            c.z + s_z * (half_z + clearance_z + d_z),
        )
    };

    y = y.clamp(y_min, y_max);
    z = z.clamp(z_min, z_max);

    PitchOutcome {
        kind,
        target: Vec3::new(plate_x, y, z),
    }
}

/// Uniform pitch speed in the configured band
pub fn sample_pitch_speed<R: Rng>(rng: &mut R, lower: f32, upper: f32) -> f32 {
    uniform_in(rng, lower, upper)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const RADIUS: f32 = 0.0365;

    fn zone() -> StrikeZoneRect {
        StrikeZoneRect::new(Vec3::new(0.0, 0.75, 0.0), 0.275, 0.215)
    }

    fn outside_y(zone: &StrikeZoneRect, y: f32) -> bool {
        (y - zone.center.y).abs() > zone.half_y
    }

    fn outside_z(zone: &StrikeZoneRect, z: f32) -> bool {
        (z - zone.center.z).abs() > zone.half_z
    }

    #[test]
    fn test_default_tuning_validates() {
        assert!(PitchTuning::default().validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut t = PitchTuning::default();
        t.strike_probability = 1.2;
        assert!(matches!(
            t.validate(),
            Err(TuningError::ProbabilityOutOfRange { name: "strike_probability", .. })
        ));

        let mut t = PitchTuning::default();
        t.wild_max_beyond_edge_z = -0.1;
        assert!(matches!(t.validate(), Err(TuningError::NegativeDistance { .. })));

        let mut t = PitchTuning::default();
        t.near_edge_bias_power = 0.5;
        assert!(matches!(t.validate(), Err(TuningError::BiasPowerTooSmall { .. })));

        let mut t = PitchTuning::default();
        t.wild_tail_power = 0.05;
        assert!(matches!(t.validate(), Err(TuningError::TailPowerTooSmall { .. })));

        let mut t = PitchTuning::default();
        t.wild_tail_power = f32::NAN;
        assert!(t.validate().is_err());
    }

    #[test]
    fn test_strike_rate_matches_probability() {
        let mut rng = Pcg32::seed_from_u64(7);
        let tuning = PitchTuning::default();
        let zone = zone();

        let n = 10_000;
        let strikes = (0..n)
            .filter(|_| {
                sample_pitch_location(&mut rng, &zone, 0.0, RADIUS, &tuning).kind
                    == PitchKind::Strike
            })
            .count();

        let rate = strikes as f32 / n as f32;
        // 4 sigma at p = 0.6, n = 10k is about 0.02.
        assert!((rate - 0.6).abs() < 0.02, "strike rate {rate}");
    }

    #[test]
    fn test_classification_matches_geometry() {
        let mut rng = Pcg32::seed_from_u64(99);
        let tuning = PitchTuning::default();
        let zone = zone();

        for _ in 0..5_000 {
            let outcome = sample_pitch_location(&mut rng, &zone, 0.0, RADIUS, &tuning);
            let out_y = outside_y(&zone, outcome.target.y);
            let out_z = outside_z(&zone, outcome.target.z);
            match outcome.kind {
                PitchKind::Strike => assert!(!out_y && !out_z, "{outcome:?}"),
                PitchKind::BallEdge => assert!(out_y ^ out_z, "{outcome:?}"),
                PitchKind::BallCorner => assert!(out_y && out_z, "{outcome:?}"),
            }
        }
    }

    #[test]
    fn test_targets_respect_wild_cap_clamp() {
        let mut rng = Pcg32::seed_from_u64(3);
        // All misses wild, to stress the caps.
        let tuning = PitchTuning {
            strike_probability: 0.0,
            wild_miss_probability: 1.0,
            ..PitchTuning::default()
        };
        let zone = zone();

        let bound_y = zone.half_y + RADIUS + tuning.edge_margin_y + tuning.wild_max_beyond_edge_y;
        let bound_z = zone.half_z + RADIUS + tuning.edge_margin_z + tuning.wild_max_beyond_edge_z;

        for _ in 0..5_000 {
            let t = sample_pitch_location(&mut rng, &zone, 0.0, RADIUS, &tuning).target;
            assert!((t.y - zone.center.y).abs() <= bound_y + 1e-5);
            assert!((t.z - zone.center.z).abs() <= bound_z + 1e-5);
        }
    }

    #[test]
    fn test_ball_targets_clear_the_zone_by_margin() {
        let mut rng = Pcg32::seed_from_u64(11);
        let tuning = PitchTuning {
            strike_probability: 0.0,
            ..PitchTuning::default()
        };
        let zone = zone();

        // Every miss clears the zone by at least the ball radius plus the
        // fixed margin on its outside axis, so a sampled "ball" can never
        // classify as a strike.
        for _ in 0..5_000 {
            let outcome = sample_pitch_location(&mut rng, &zone, 0.0, RADIUS, &tuning);
            assert!(!zone.is_strike(outcome.target, RADIUS), "{outcome:?}");
        }
    }

    #[test]
    fn test_plate_x_is_fixed() {
        let mut rng = Pcg32::seed_from_u64(5);
        let tuning = PitchTuning::default();
        let zone = zone();
        for _ in 0..100 {
            let t = sample_pitch_location(&mut rng, &zone, 1.25, RADIUS, &tuning).target;
            assert_eq!(t.x, 1.25);
        }
    }

    #[test]
    fn test_degenerate_zone_samples_without_panic() {
        let mut rng = Pcg32::seed_from_u64(13);
        let tuning = PitchTuning::default();
        let zone = StrikeZoneRect::new(Vec3::new(0.0, 0.75, 0.0), 0.0, 0.0);

        for _ in 0..1_000 {
            let outcome = sample_pitch_location(&mut rng, &zone, 0.0, RADIUS, &tuning);
            assert!(outcome.target.y.is_finite() && outcome.target.z.is_finite());
            if outcome.kind == PitchKind::Strike {
                assert_eq!(outcome.target.y, 0.75);
                assert_eq!(outcome.target.z, 0.0);
            }
        }
    }

    #[test]
    fn test_wild_sample_stays_in_band() {
        let mut rng = Pcg32::seed_from_u64(17);
        for _ in 0..2_000 {
            let d = sample_wild(&mut rng, 0.15, 0.50, 0.6);
            assert!((0.15..=0.50).contains(&d));
        }
    }

    #[test]
    fn test_near_sample_biased_toward_edge() {
        let mut rng = Pcg32::seed_from_u64(19);
        let n = 4_000;
        let mean: f32 = (0..n)
            .map(|_| sample_near(&mut rng, 0.15, 1.375))
            .sum::<f32>()
            / n as f32;
        // E[u^1.375] = 1/2.375, comfortably below the uniform mean of 0.5.
        assert!(mean < 0.5 * 0.15, "mean {mean}");
        let expected = 0.15 / 2.375;
        assert!((mean - expected).abs() < 0.01, "mean {mean}");
    }
}

//! Closed-form launch velocity solver
//!
//! Given a fixed launch speed, finds the velocity vector that carries a
//! projectile from the release point through the target under constant
//! gravity. Takes the low-angle root of the projectile range equation: the
//! direct trajectory a pitch follows, not the lob that reaches the same
//! point.

use glam::Vec3;
use std::fmt;

/// Horizontal separations below this cannot anchor a launch direction
const MIN_HORIZONTAL_DISTANCE: f32 = 1e-4;

/// Why a launch velocity could not be solved
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LaunchError {
    /// The target cannot be reached at the given speed: the range equation's
    /// discriminant went negative (too far, or too steep a rise)
    Unreachable {
        speed: f32,
        horizontal_distance: f32,
        rise: f32,
    },
    /// Start and target are (nearly) vertically aligned
    NoHorizontalDistance,
}

impl fmt::Display for LaunchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LaunchError::Unreachable {
                speed,
                horizontal_distance,
                rise,
            } => write!(
                f,
                "target unreachable at {speed} m/s ({horizontal_distance} m out, {rise} m rise)"
            ),
            LaunchError::NoHorizontalDistance => {
                write!(f, "start and target are vertically aligned")
            }
        }
    }
}

impl std::error::Error for LaunchError {}

/// Solve for the launch velocity that hits `target` from `start` at exactly
/// `speed`, under gravity pulling along -Y.
///
/// Deterministic and pure. Unreachable targets surface as a typed error
/// rather than a NaN vector; callers decide the fallback.
pub fn solve_launch_velocity(
    speed: f32,
    start: Vec3,
    target: Vec3,
    gravity: f32,
) -> Result<Vec3, LaunchError> {
    let delta = target - start;
    let horizontal = Vec3::new(delta.x, 0.0, delta.z);
    let d = horizontal.length();
    if d < MIN_HORIZONTAL_DISTANCE {
        return Err(LaunchError::NoHorizontalDistance);
    }
    let ground_dir = horizontal / d;

    let v2 = speed * speed;
    let v4 = v2 * v2;
    let discriminant = v4 - gravity * (gravity * d * d + 2.0 * delta.y * v2);
    if discriminant < 0.0 {
        return Err(LaunchError::Unreachable {
            speed,
            horizontal_distance: d,
            rise: delta.y,
        });
    }

    // Low-angle root. The `+ sqrt` root is the high arc and is never used.
    let tan = (v2 - discriminant.sqrt()) / (gravity * d);
    let cos = 1.0 / (1.0 + tan * tan).sqrt();
    let sin = tan * cos;

    Ok(ground_dir * (speed * cos) + Vec3::Y * (speed * sin))
}

//! Strike zone geometry and the ball/strike containment test
//!
//! The zone is a world-space rectangle in the plate (YZ) plane, derived from
//! a configured box volume each time it is needed. Classification is a
//! circle-vs-rounded-rectangle test: any part of the ball touching the zone
//! counts as a strike.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Source volume a strike zone rectangle is derived from: a box (world
/// center + local size) under a possibly scaled transform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoneSource {
    /// World-space center of the zone box
    pub center: Vec3,
    /// Local box size before scaling
    pub size: Vec3,
    /// World scale applied to the box
    pub lossy_scale: Vec3,
}

impl ZoneSource {
    /// Derive the world-space rectangle in the plate plane. Absolute values
    /// keep the half-extents non-negative under mirrored scales.
    pub fn world_rect(&self) -> StrikeZoneRect {
        StrikeZoneRect::new(
            self.center,
            0.5 * self.size.y * self.lossy_scale.y.abs(),
            0.5 * self.size.z * self.lossy_scale.z.abs(),
        )
    }
}

/// Strike zone rectangle in the plate plane, world space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrikeZoneRect {
    /// World-space center
    pub center: Vec3,
    /// Vertical half-extent, never negative
    pub half_y: f32,
    /// Lateral half-extent, never negative
    pub half_z: f32,
}

impl StrikeZoneRect {
    pub fn new(center: Vec3, half_y: f32, half_z: f32) -> Self {
        debug_assert!(half_y >= 0.0 && half_z >= 0.0, "negative zone half-extent");
        Self { center, half_y, half_z }
    }

    /// Vertical bounds of the zone
    #[inline]
    pub fn y_range(&self) -> (f32, f32) {
        (self.center.y - self.half_y, self.center.y + self.half_y)
    }

    /// Lateral bounds of the zone
    #[inline]
    pub fn z_range(&self) -> (f32, f32) {
        (self.center.z - self.half_z, self.center.z + self.half_z)
    }

    /// Does a ball centered at `contact_point` touch the zone?
    ///
    /// Clamps the point's (y, z) projection onto the rectangle and compares
    /// the squared distance against the ball radius. X is ignored:
    /// classification happens in the plate plane.
    pub fn is_strike(&self, contact_point: Vec3, ball_radius: f32) -> bool {
        let (y_min, y_max) = self.y_range();
        let (z_min, z_max) = self.z_range();

        let closest_y = contact_point.y.clamp(y_min, y_max);
        let closest_z = contact_point.z.clamp(z_min, z_max);

        let dy = contact_point.y - closest_y;
        let dz = contact_point.z - closest_z;

        dy * dy + dz * dz <= ball_radius * ball_radius
    }
}

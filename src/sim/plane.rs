//! Sphere vs. upright-plane crossing detection
//!
//! Discrete fixed-timestep physics can push the ball clean through a thin
//! plane in a single step. Instead of testing overlap, each step compares the
//! signed distances of the previous and current sphere centers and recovers
//! the exact crossing instant by linear interpolation, which gives sub-step
//! precision without tunneling misses.

use glam::Vec3;

use crate::flatten_y;

/// Squared length below which a flattened plane normal is degenerate
const NORMAL_EPS: f32 = 1e-6;
/// Minimum signed-distance delta for a well-conditioned crossing solve
const DENOM_EPS: f32 = 1e-6;

/// Exact crossing of a moving sphere through a vertical plane
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneCrossing {
    /// Sphere center at the instant the counting surface reaches the plane
    pub center_at_entry: Vec3,
    /// Point on the plane where first contact occurs
    pub contact_point: Vec3,
    /// Interpolation fraction along prev -> now, in [0, 1]
    pub fraction: f32,
}

/// Detect whether a sphere moving from `prev_center` to `now_center` crossed
/// the vertical plane through `plane_point` with normal `plane_normal` this
/// step.
///
/// The normal's vertical component is discarded so the plane is always
/// upright; a normal that vanishes after flattening yields `None`. With
/// `any_part_counts` the near surface of the sphere is the counting surface,
/// otherwise the exact center is.
///
/// `None` means no crossing happened this step. That is the common case, not
/// an error.
pub fn try_plane_entry(
    prev_center: Vec3,
    now_center: Vec3,
    plane_point: Vec3,
    plane_normal: Vec3,
    sphere_radius: f32,
    any_part_counts: bool,
) -> Option<PlaneCrossing> {
    let flat = flatten_y(plane_normal);
    if flat.length_squared() < NORMAL_EPS {
        return None;
    }
    let n = flat.normalize();

    // Signed distances of the sphere center to the plane at prev/now.
    let s_prev = (prev_center - plane_point).dot(n);
    let s_now = (now_center - plane_point).dot(n);

    // What counts as crossing: the leading surface of the ball, or its center.
    let threshold = if any_part_counts { -sphere_radius } else { 0.0 };

    // Did we cross the threshold this step? Either direction of travel is
    // allowed; near-parallel motion cannot be solved for a crossing time.
    let a = s_prev - threshold;
    let b = s_now - threshold;
    let denom = s_now - s_prev;
    if (a > 0.0 && b > 0.0) || (a < 0.0 && b < 0.0) || denom.abs() < DENOM_EPS {
        return None;
    }

    // Exact fraction along the prev -> now segment where s(t) == threshold.
    let fraction = ((threshold - s_prev) / denom).clamp(0.0, 1.0);
    let center_at_entry = prev_center.lerp(now_center, fraction);

    // Contact point on the plane: the sphere's front-most point at first
    // touch, or the center itself when only the center counts.
    let contact_point = if any_part_counts {
        center_at_entry + n * sphere_radius
    } else {
        center_at_entry
    };

    Some(PlaneCrossing {
        center_at_entry,
        contact_point,
        fraction,
    })
}

/// Where the sphere *center* meets the plane along prev -> now, clamped to
/// the step's endpoints when the center stops short of the plane.
///
/// `normal` must already be flattened and normalized. `None` on near-parallel
/// motion.
pub fn center_on_plane(
    prev_center: Vec3,
    now_center: Vec3,
    plane_point: Vec3,
    normal: Vec3,
) -> Option<Vec3> {
    let s_prev = (prev_center - plane_point).dot(normal);
    let s_now = (now_center - plane_point).dot(normal);
    let denom = s_now - s_prev;
    if denom.abs() < DENOM_EPS {
        return None;
    }
    let t = (-s_prev / denom).clamp(0.0, 1.0);
    Some(prev_center.lerp(now_center, t))
}

/// Upright plate normal: the horizontal direction from `release` toward
/// `plane_point`. Falls back to -X when the two are vertically aligned.
pub fn plate_normal(release: Vec3, plane_point: Vec3) -> Vec3 {
    let n = flatten_y(plane_point - release);
    if n.length_squared() < NORMAL_EPS {
        Vec3::NEG_X
    } else {
        n.normalize()
    }
}

/// Flip `normal` so it agrees with the direction of travel `step`
#[inline]
pub fn orient_along(normal: Vec3, step: Vec3) -> Vec3 {
    if step.dot(normal) < 0.0 { -normal } else { normal }
}

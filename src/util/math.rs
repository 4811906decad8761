//! Ground-plane vector helpers
//!
//! Entities move on the xz plane with y up. Every normalization here returns
//! [`Vec3::ZERO`] for zero-length input so stationary velocities and
//! coincident positions never produce NaN.

use glam::Vec3;

/// Project onto the ground plane (drop the y component)
#[inline]
pub fn flatten(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}

/// Normalize, returning zero for zero-length or non-finite input
#[inline]
pub fn safe_normalize(v: Vec3) -> Vec3 {
    v.normalize_or_zero()
}

/// Distance between two points on the ground plane
#[inline]
pub fn planar_distance(a: Vec3, b: Vec3) -> f32 {
    flatten(a - b).length()
}

/// Direction from `from` to `to` on the ground plane, zero when coincident
#[inline]
pub fn planar_direction(from: Vec3, to: Vec3) -> Vec3 {
    safe_normalize(flatten(to - from))
}

/// Rotate a vector around the y axis by `angle` radians
#[inline]
pub fn rotate_y(v: Vec3, angle: f32) -> Vec3 {
    let (sin, cos) = angle.sin_cos();
    Vec3::new(v.x * cos + v.z * sin, v.y, -v.x * sin + v.z * cos)
}

/// Unit direction on the ground plane for a yaw angle (0 = +z)
#[inline]
pub fn direction_from_yaw(yaw: f32) -> Vec3 {
    Vec3::new(yaw.sin(), 0.0, yaw.cos())
}

/// Yaw angle of a ground-plane direction (0 = +z), `None` for zero input
pub fn yaw_of(direction: Vec3) -> Option<f32> {
    let flat = flatten(direction);
    if flat.length_squared() <= f32::EPSILON {
        None
    } else {
        Some(flat.x.atan2(flat.z))
    }
}

/// Closest distance from `point` to the segment `a`-`b` on the ground plane
pub fn distance_to_segment(point: Vec3, a: Vec3, b: Vec3) -> f32 {
    let (p, a, b) = (flatten(point), flatten(a), flatten(b));
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq <= f32::EPSILON {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

/// Perpendicular distance from `point` to the segment `a`-`b` on the ground
/// plane, `None` when the point projects outside the segment
pub fn distance_within_segment(point: Vec3, a: Vec3, b: Vec3) -> Option<f32> {
    let (p, a, b) = (flatten(point), flatten(a), flatten(b));
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq <= f32::EPSILON {
        return Some(p.distance(a));
    }
    let t = (p - a).dot(ab) / len_sq;
    if !(0.0..=1.0).contains(&t) {
        return None;
    }
    Some(p.distance(a + ab * t))
}

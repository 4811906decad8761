use glam::Vec3;

use crate::util::math::safe_normalize;

/// Read-only camera transform supplied by the rendering layer each frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraView {
    pub position: Vec3,
    /// View direction, need not be normalized
    pub forward: Vec3,
    /// Vertical field of view in radians
    pub fov_y: f32,
    /// Width / height
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl CameraView {
    pub fn new(position: Vec3, forward: Vec3) -> Self {
        Self {
            position,
            forward,
            fov_y: 70f32.to_radians(),
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 1000.0,
        }
    }

    /// Camera looking from `position` toward `target`
    pub fn looking_at(position: Vec3, target: Vec3) -> Self {
        Self::new(position, target - position)
    }

    /// Build the view frustum for membership tests
    pub fn frustum(&self) -> Frustum {
        let forward = safe_normalize(self.forward);
        let forward = if forward == Vec3::ZERO { Vec3::Z } else { forward };
        let right = {
            let r = safe_normalize(forward.cross(Vec3::Y));
            // Looking straight up or down; pick any horizontal right vector
            if r == Vec3::ZERO { Vec3::X } else { r }
        };
        let up = right.cross(forward);
        let tan_half_y = (self.fov_y * 0.5).tan();

        Frustum {
            origin: self.position,
            forward,
            right,
            up,
            tan_half_x: tan_half_y * self.aspect,
            tan_half_y,
            near: self.near,
            far: self.far,
        }
    }
}

impl Default for CameraView {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, 2.0, 0.0), Vec3::Z)
    }
}

/// Perspective view volume in camera-aligned basis
#[derive(Debug, Clone, Copy)]
pub struct Frustum {
    origin: Vec3,
    forward: Vec3,
    right: Vec3,
    up: Vec3,
    tan_half_x: f32,
    tan_half_y: f32,
    near: f32,
    far: f32,
}

impl Frustum {
    /// True when a sphere at `point` with `radius` intersects the frustum
    pub fn contains_sphere(&self, point: Vec3, radius: f32) -> bool {
        let to = point - self.origin;
        let depth = to.dot(self.forward);
        if depth < self.near - radius || depth > self.far + radius {
            return false;
        }
        let depth = depth.max(0.0);
        let x = to.dot(self.right).abs();
        let y = to.dot(self.up).abs();
        x <= depth * self.tan_half_x + radius && y <= depth * self.tan_half_y + radius
    }

    #[inline]
    pub fn contains_point(&self, point: Vec3) -> bool {
        self.contains_sphere(point, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_in_front_is_visible() {
        let frustum = CameraView::new(Vec3::ZERO, Vec3::Z).frustum();
        assert!(frustum.contains_point(Vec3::new(0.0, 0.0, 50.0)));
    }

    #[test]
    fn test_point_behind_is_not_visible() {
        let frustum = CameraView::new(Vec3::ZERO, Vec3::Z).frustum();
        assert!(!frustum.contains_point(Vec3::new(0.0, 0.0, -10.0)));
    }

    #[test]
    fn test_point_far_to_the_side_is_not_visible() {
        let frustum = CameraView::new(Vec3::ZERO, Vec3::Z).frustum();
        assert!(!frustum.contains_point(Vec3::new(100.0, 0.0, 10.0)));
    }

    #[test]
    fn test_radius_extends_membership() {
        let frustum = CameraView::new(Vec3::ZERO, Vec3::Z).frustum();
        let edge = Vec3::new(0.0, 0.0, -0.5);
        assert!(!frustum.contains_point(edge));
        assert!(frustum.contains_sphere(edge, 1.0));
    }

    #[test]
    fn test_vertical_forward_does_not_degenerate() {
        let frustum = CameraView::new(Vec3::ZERO, Vec3::NEG_Y).frustum();
        assert!(frustum.contains_point(Vec3::new(0.0, -20.0, 0.0)));
    }
}

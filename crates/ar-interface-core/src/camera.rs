use nalgebra::{Point2, Point3, Unit, Vector3};
use serde::{Deserialize, Serialize};

use crate::types::Pose;

/// Half-line in world coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: Point3<f32>,
    pub direction: Unit<Vector3<f32>>,
}

impl Ray {
    pub fn new(origin: Point3<f32>, direction: Vector3<f32>) -> Option<Self> {
        let direction = Unit::try_new(direction, f32::EPSILON)?;
        Some(Self { origin, direction })
    }

    #[inline]
    pub fn at(&self, t: f32) -> Point3<f32> {
        self.origin + self.direction.into_inner() * t
    }
}

/// Minimal pinhole model of the render camera, enough to turn a screen tap
/// into a world ray.
///
/// Screen coordinates are pixels with the origin at the bottom-left corner.
/// Camera space is +X right, +Y up, +Z forward.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PinholeCamera {
    pub width: u32,
    pub height: u32,
    pub vertical_fov_deg: f32,
}

impl Default for PinholeCamera {
    fn default() -> Self {
        Self {
            width: 1080,
            height: 1920,
            vertical_fov_deg: 60.0,
        }
    }
}

impl PinholeCamera {
    #[inline]
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }

    /// Direction through `screen_point` in camera space (not normalized).
    pub fn camera_direction(&self, screen_point: Point2<f32>) -> Vector3<f32> {
        let half_h = (0.5 * self.vertical_fov_deg).to_radians().tan();
        let half_w = half_h * self.aspect();
        let nx = 2.0 * screen_point.x / self.width.max(1) as f32 - 1.0;
        let ny = 2.0 * screen_point.y / self.height.max(1) as f32 - 1.0;
        Vector3::new(nx * half_w, ny * half_h, 1.0)
    }

    /// World ray through `screen_point` for a camera at `pose`.
    pub fn screen_ray(&self, pose: &Pose, screen_point: Point2<f32>) -> Ray {
        let dir = pose.rotation * self.camera_direction(screen_point);
        Ray {
            origin: pose.position,
            direction: Unit::new_normalize(dir),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::UnitQuaternion;

    #[test]
    fn screen_center_looks_straight_ahead() {
        let cam = PinholeCamera {
            width: 640,
            height: 480,
            vertical_fov_deg: 90.0,
        };
        let ray = cam.screen_ray(&Pose::identity(), Point2::new(320.0, 240.0));
        assert_relative_eq!(ray.direction.into_inner(), Vector3::z(), epsilon = 1e-6);
    }

    #[test]
    fn top_edge_matches_half_fov() {
        let cam = PinholeCamera {
            width: 100,
            height: 100,
            vertical_fov_deg: 90.0,
        };
        let d = cam.camera_direction(Point2::new(50.0, 100.0));
        assert_relative_eq!(d, Vector3::new(0.0, 1.0, 1.0), epsilon = 1e-6);
    }

    #[test]
    fn pose_rotation_turns_the_ray() {
        let cam = PinholeCamera::default();
        let down = UnitQuaternion::from_axis_angle(&Vector3::x_axis(), std::f32::consts::FRAC_PI_2);
        let pose = Pose::new(Point3::new(0.0, 1.5, 0.0), down);
        let center = Point2::new(cam.width as f32 / 2.0, cam.height as f32 / 2.0);
        let ray = cam.screen_ray(&pose, center);
        assert_relative_eq!(ray.direction.into_inner(), -Vector3::y(), epsilon = 1e-6);
        assert_relative_eq!(ray.at(1.5), Point3::origin(), epsilon = 1e-6);
    }

    #[test]
    fn degenerate_direction_is_rejected() {
        assert!(Ray::new(Point3::origin(), Vector3::zeros()).is_none());
    }
}

use nalgebra::{Isometry3, Point3, Translation3, UnitQuaternion};
use serde::{Deserialize, Serialize};

/// Rigid device pose in world coordinates (unscaled, as reported by the tracker).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Point3<f32>,
    pub rotation: UnitQuaternion<f32>,
}

impl Pose {
    pub const fn new(position: Point3<f32>, rotation: UnitQuaternion<f32>) -> Self {
        Self { position, rotation }
    }

    pub fn identity() -> Self {
        Self {
            position: Point3::origin(),
            rotation: UnitQuaternion::identity(),
        }
    }

    pub fn to_isometry(&self) -> Isometry3<f32> {
        Isometry3::from_parts(Translation3::from(self.position.coords), self.rotation)
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::identity()
    }
}

/// Sparse feature points tracked by the backend for the current frame.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PointCloud {
    pub points: Vec<Point3<f32>>,
}

impl PointCloud {
    pub fn new(points: Vec<Point3<f32>>) -> Self {
        Self { points }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }
}

/// Scene lighting as estimated by the backend.
///
/// A field is `Some` only when the backend has that capability; the default
/// value therefore means "no light estimation available".
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LightEstimate {
    #[serde(default)]
    pub ambient_intensity: Option<f32>,
    /// Kelvin.
    #[serde(default)]
    pub ambient_color_temperature: Option<f32>,
}

impl LightEstimate {
    pub fn has_capabilities(&self) -> bool {
        self.ambient_intensity.is_some() || self.ambient_color_temperature.is_some()
    }
}

/// Session feature switches passed to a backend on start.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub enable_point_cloud: bool,
    pub enable_plane_detection: bool,
    pub enable_light_estimation: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            enable_point_cloud: true,
            enable_plane_detection: true,
            enable_light_estimation: true,
        }
    }
}

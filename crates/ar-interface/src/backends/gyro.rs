//! Orientation-only fallback for devices without an AR runtime.
//!
//! Tracks rotation from the gyroscope attitude and shows the back camera as
//! background. There is no positional tracking, no plane detection and no
//! point cloud, so hit tests never hit anything.

use std::convert::Infallible;
use std::f32::consts::FRAC_PI_2;

use ar_interface_core::{
    DisplayTransform, HitTestResult, HitTestResultType, LightEstimate, PointCloud, Pose,
    ScreenOrientation, Settings, TrackedPlaneRecord,
};
use nalgebra::{Point2, Point3, Quaternion, UnitQuaternion};
use serde::{Deserialize, Serialize};

use crate::backend::{ArBackend, HitTestScene};
use crate::SessionError;

/// One camera the host can stream as background video.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WebcamFeed {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub front_facing: bool,
    /// Clockwise rotation the feed reports for its frames, in degrees.
    #[serde(default)]
    pub rotation_angle_deg: i32,
    #[serde(default)]
    pub vertically_mirrored: bool,
}

impl WebcamFeed {
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }
}

pub struct GyroBackend {
    has_gyroscope: bool,
    cameras: Vec<WebcamFeed>,
    /// Accept a front-facing camera when no back camera exists (desktop hosts).
    allow_front_camera: bool,
    attitude: UnitQuaternion<f32>,
    running: bool,
}

impl GyroBackend {
    pub fn new(has_gyroscope: bool, cameras: Vec<WebcamFeed>) -> Self {
        Self {
            has_gyroscope,
            cameras,
            allow_front_camera: false,
            attitude: UnitQuaternion::identity(),
            running: false,
        }
    }

    pub fn allow_front_camera(mut self, allow: bool) -> Self {
        self.allow_front_camera = allow;
        self
    }

    /// Feed the latest gyroscope attitude sample.
    pub fn set_attitude(&mut self, attitude: UnitQuaternion<f32>) {
        self.attitude = attitude;
    }

    pub fn background_camera(&self) -> Option<&WebcamFeed> {
        self.cameras
            .iter()
            .find(|c| !c.front_facing)
            .or_else(|| {
                self.allow_front_camera
                    .then(|| self.cameras.first())
                    .flatten()
            })
    }

    pub fn background_camera_mut(&mut self) -> Option<&mut WebcamFeed> {
        let allow_front = self.allow_front_camera;
        let idx = self
            .cameras
            .iter()
            .position(|c| !c.front_facing)
            .or_else(|| (allow_front && !self.cameras.is_empty()).then_some(0))?;
        self.cameras.get_mut(idx)
    }

    /// World rotation of the render camera: a container pitched 90° about X,
    /// then the gyro attitude, then a half-turn about Z.
    pub fn camera_rotation(&self) -> UnitQuaternion<f32> {
        let container = UnitQuaternion::from_euler_angles(FRAC_PI_2, 0.0, 0.0);
        let half_turn_z = UnitQuaternion::from_quaternion(Quaternion::new(0.0, 0.0, 0.0, 1.0));
        container * self.attitude * half_turn_z
    }
}

impl ArBackend for GyroBackend {
    type PlaneKey = Infallible;

    fn name(&self) -> &'static str {
        "gyro-3dof"
    }

    fn is_supported(&self) -> bool {
        self.has_gyroscope && self.background_camera().is_some()
    }

    fn start_session(&mut self, _settings: &Settings) -> Result<(), SessionError> {
        if !self.is_supported() {
            return Err(SessionError::StartFailed {
                backend: self.name(),
                reason: "3-DOF tracking needs a gyroscope and a usable camera".to_string(),
            });
        }
        if let Some(cam) = self.background_camera() {
            log::info!(
                "3-DOF tracking on `{}` ({}x{})",
                cam.name,
                cam.width,
                cam.height
            );
        }
        self.running = true;
        Ok(())
    }

    fn stop_session(&mut self) {
        self.running = false;
    }

    fn begin_frame(&mut self) -> bool {
        self.running
    }

    fn poll_pose(&mut self) -> Option<Pose> {
        Some(Pose::new(Point3::origin(), self.camera_rotation()))
    }

    fn poll_planes(&mut self, _out: &mut Vec<TrackedPlaneRecord<Infallible>>) {}

    fn poll_point_cloud(&mut self) -> Option<PointCloud> {
        None
    }

    fn poll_light_estimate(&mut self) -> LightEstimate {
        LightEstimate::default()
    }

    /// The webcam reports its own rotation; screen orientation does not matter.
    fn display_transform(&self, _orientation: ScreenOrientation) -> DisplayTransform {
        self.background_camera()
            .map(|c| DisplayTransform::from_video(c.rotation_angle_deg, c.vertically_mirrored))
            .unwrap_or_default()
    }

    fn hit_test(
        &self,
        _screen_point: Point2<f32>,
        _kind: HitTestResultType,
        _scene: &HitTestScene<'_>,
    ) -> Vec<HitTestResult> {
        Vec::new()
    }
}

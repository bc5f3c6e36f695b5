//! Scripted replay backend standing in for the editor / remote simulator.
//!
//! A [`SimulatedScene`] is a JSON script of frames; each `begin_frame` steps
//! to the next one. Hit tests intersect the reconciled planes and the frame's
//! point cloud with a pinhole camera ray.

use std::path::Path;

use ar_interface_core::{
    hit_test, FieldOfView, HitTestParams, HitTestResult, HitTestResultType, LightEstimate,
    PinholeCamera, PointCloud, Pose, Settings, TrackedPlaneRecord,
};
use nalgebra::{Point2, Point3, Quaternion, UnitQuaternion, Vector2};
use serde::{Deserialize, Serialize};

use crate::backend::{ArBackend, HitTestScene};
use crate::{SceneError, SessionError};

/// Quaternions in scene files are `[x, y, z, w]`.
fn identity_xyzw() -> [f32; 4] {
    [0.0, 0.0, 0.0, 1.0]
}

fn default_true() -> bool {
    true
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScenePose {
    #[serde(default)]
    pub position: [f32; 3],
    #[serde(default = "identity_xyzw")]
    pub rotation: [f32; 4],
}

impl Default for ScenePose {
    fn default() -> Self {
        Self {
            position: [0.0; 3],
            rotation: identity_xyzw(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScenePlane {
    pub key: String,
    pub center: [f32; 3],
    #[serde(default = "identity_xyzw")]
    pub rotation: [f32; 4],
    pub extents: [f32; 2],
    #[serde(default)]
    pub subsumed_by: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SceneFrame {
    #[serde(default = "default_true")]
    pub tracking: bool,
    #[serde(default)]
    pub pose: ScenePose,
    #[serde(default)]
    pub planes: Vec<ScenePlane>,
    #[serde(default)]
    pub point_cloud: Vec<[f32; 3]>,
    #[serde(default)]
    pub light: LightEstimate,
}

/// A scripted session: camera model plus the frames to replay.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulatedScene {
    #[serde(default)]
    pub camera: PinholeCamera,
    #[serde(default)]
    pub hit_test: HitTestParams,
    pub frames: Vec<SceneFrame>,
}

impl SimulatedScene {
    pub fn from_json_str(json: &str, path: &Path) -> Result<Self, SceneError> {
        serde_json::from_str(json).map_err(|source| SceneError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SceneError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| SceneError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw, path)
    }
}

struct Frame {
    tracking: bool,
    pose: Pose,
    planes: Vec<TrackedPlaneRecord<String>>,
    point_cloud: PointCloud,
    light: LightEstimate,
}

fn rotation_from_xyzw(q: [f32; 4], frame: usize) -> Result<UnitQuaternion<f32>, SceneError> {
    let [x, y, z, w] = q;
    UnitQuaternion::try_new(Quaternion::new(w, x, y, z), f32::EPSILON)
        .ok_or(SceneError::DegenerateRotation { frame })
}

impl Frame {
    fn from_scene(index: usize, frame: SceneFrame) -> Result<Self, SceneError> {
        let pose = Pose::new(
            Point3::from(frame.pose.position),
            rotation_from_xyzw(frame.pose.rotation, index)?,
        );
        let planes = frame
            .planes
            .into_iter()
            .map(|p| {
                Ok(TrackedPlaneRecord {
                    key: p.key,
                    center: Point3::from(p.center),
                    rotation: rotation_from_xyzw(p.rotation, index)?,
                    extents: Vector2::from(p.extents),
                    subsumed_by: p.subsumed_by,
                })
            })
            .collect::<Result<Vec<_>, SceneError>>()?;
        Ok(Self {
            tracking: frame.tracking,
            pose,
            planes,
            point_cloud: PointCloud::new(frame.point_cloud.into_iter().map(Point3::from).collect()),
            light: frame.light,
        })
    }
}

/// Replays a [`SimulatedScene`] one frame per `begin_frame`.
pub struct SimulatedBackend {
    camera: PinholeCamera,
    params: HitTestParams,
    frames: Vec<Frame>,
    /// Index of the frame being served; `None` before the first `begin_frame`.
    cursor: Option<usize>,
    running: bool,
}

impl SimulatedBackend {
    pub fn new(scene: SimulatedScene) -> Result<Self, SceneError> {
        let frames = scene
            .frames
            .into_iter()
            .enumerate()
            .map(|(i, f)| Frame::from_scene(i, f))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            camera: scene.camera,
            params: scene.hit_test,
            frames,
            cursor: None,
            running: false,
        })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SceneError> {
        Self::new(SimulatedScene::load(path)?)
    }

    pub fn camera(&self) -> &PinholeCamera {
        &self.camera
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Index of the frame currently served, if any.
    pub fn current_frame_index(&self) -> Option<usize> {
        self.cursor.filter(|&i| i < self.frames.len())
    }

    /// True once every scripted frame has been served.
    pub fn is_exhausted(&self) -> bool {
        self.cursor.is_some_and(|i| i + 1 >= self.frames.len())
    }

    fn current(&self) -> Option<&Frame> {
        self.current_frame_index().map(|i| &self.frames[i])
    }
}

impl ArBackend for SimulatedBackend {
    type PlaneKey = String;

    fn name(&self) -> &'static str {
        "simulated"
    }

    fn start_session(&mut self, _settings: &Settings) -> Result<(), SessionError> {
        self.cursor = None;
        self.running = true;
        log::info!("replaying {} scripted frames", self.frames.len());
        Ok(())
    }

    fn stop_session(&mut self) {
        self.running = false;
    }

    fn begin_frame(&mut self) -> bool {
        if !self.running {
            return false;
        }
        let next = self.cursor.map_or(0, |i| i.saturating_add(1));
        self.cursor = Some(next.min(self.frames.len()));
        self.current().is_some_and(|f| f.tracking)
    }

    fn poll_pose(&mut self) -> Option<Pose> {
        self.current().map(|f| f.pose)
    }

    fn poll_planes(&mut self, out: &mut Vec<TrackedPlaneRecord<String>>) {
        if let Some(frame) = self.current() {
            out.extend(frame.planes.iter().cloned());
        }
    }

    fn poll_point_cloud(&mut self) -> Option<PointCloud> {
        self.current()
            .map(|f| f.point_cloud.clone())
            .filter(|cloud| !cloud.is_empty())
    }

    fn poll_light_estimate(&mut self) -> LightEstimate {
        self.current().map(|f| f.light).unwrap_or_default()
    }

    fn field_of_view(&self) -> FieldOfView {
        let v = self.camera.vertical_fov_deg;
        let h = 2.0
            * ((0.5 * v).to_radians().tan() * self.camera.aspect())
                .atan()
                .to_degrees();
        FieldOfView {
            horizontal: Some(h),
            vertical: Some(v),
        }
    }

    fn hit_test(
        &self,
        screen_point: Point2<f32>,
        kind: HitTestResultType,
        scene: &HitTestScene<'_>,
    ) -> Vec<HitTestResult> {
        let Some(frame) = self.current() else {
            return Vec::new();
        };
        let ray = self.camera.screen_ray(&frame.pose, screen_point);
        hit_test(
            &ray,
            kind,
            scene.planes.iter().copied(),
            Some(&frame.point_cloud),
            &self.params,
        )
    }
}

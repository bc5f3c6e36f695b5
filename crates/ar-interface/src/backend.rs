//! The seam every tracking runtime plugs into.

use std::hash::Hash;

use ar_interface_core::{
    BoundedPlane, DisplayTransform, FieldOfView, HitTestResult, HitTestResultType, LightEstimate,
    PointCloud, Pose, ScreenOrientation, Settings, TrackedPlaneRecord,
};
use nalgebra::Point2;

use crate::SessionError;

/// Read-only view of the reconciled scene handed to [`ArBackend::hit_test`].
///
/// Native runtimes raycast against their own tracking state and may ignore it;
/// simulated ones intersect these planes directly.
#[derive(Clone, Copy, Debug)]
pub struct HitTestScene<'a> {
    pub planes: &'a [&'a BoundedPlane],
}

/// One AR tracking runtime (native SDK, simulator, sensor fallback, ...).
///
/// The session calls [`begin_frame`](ArBackend::begin_frame) once per host
/// frame and then polls whatever the [`Settings`] enable.
pub trait ArBackend {
    /// Vendor key that identifies a plane across frames.
    type PlaneKey: Eq + Hash + Clone;

    fn name(&self) -> &'static str;

    /// Whether the device has what this backend needs.
    fn is_supported(&self) -> bool {
        true
    }

    fn start_session(&mut self, settings: &Settings) -> Result<(), SessionError>;

    fn stop_session(&mut self);

    /// Advance to the next frame. Returns `false` while tracking is unavailable.
    fn begin_frame(&mut self) -> bool;

    fn poll_pose(&mut self) -> Option<Pose>;

    /// Replace `out` with this frame's raw plane snapshot.
    fn poll_planes(&mut self, out: &mut Vec<TrackedPlaneRecord<Self::PlaneKey>>);

    fn poll_point_cloud(&mut self) -> Option<PointCloud>;

    fn poll_light_estimate(&mut self) -> LightEstimate;

    /// Background correction for the current screen orientation.
    fn display_transform(&self, orientation: ScreenOrientation) -> DisplayTransform {
        DisplayTransform::from_orientation(orientation)
    }

    fn field_of_view(&self) -> FieldOfView {
        FieldOfView::default()
    }

    fn hit_test(
        &self,
        screen_point: Point2<f32>,
        kind: HitTestResultType,
        scene: &HitTestScene<'_>,
    ) -> Vec<HitTestResult>;
}

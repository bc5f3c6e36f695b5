//! Per-frame session driver shared by every backend.

use ar_interface_core::{
    BoundedPlane, DisplayTransform, DisplayTransformCache, HitTestResult, HitTestResultType,
    LightEstimate, PlaneEvent, PlaneReconciler, PointCloud, Pose, ScreenOrientation, Settings,
    TrackedPlaneRecord,
};
use nalgebra::Point2;
use serde::Serialize;

use crate::backend::{ArBackend, HitTestScene};
use crate::SessionError;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Host state the session needs each frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameContext {
    pub orientation: ScreenOrientation,
}

impl FrameContext {
    pub fn new(orientation: ScreenOrientation) -> Self {
        Self { orientation }
    }
}

/// Everything that changed during one [`ArSession::update`].
#[derive(Clone, Debug, Default, Serialize)]
pub struct FrameUpdate {
    pub tracking: bool,
    pub pose: Option<Pose>,
    pub plane_events: Vec<PlaneEvent>,
    pub point_cloud: Option<PointCloud>,
    pub light_estimate: LightEstimate,
    /// Set only on frames where the orientation changed.
    pub display_transform: Option<DisplayTransform>,
    /// Render-camera FOV to apply, set with `display_transform` when known.
    pub field_of_view: Option<f32>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Idle,
    Running,
    Stopped,
}

/// Drives one backend: lifecycle, plane reconciliation and display transform caching.
pub struct ArSession<B: ArBackend> {
    backend: B,
    settings: Settings,
    state: SessionState,
    reconciler: PlaneReconciler<B::PlaneKey>,
    display: DisplayTransformCache,
    plane_buffer: Vec<TrackedPlaneRecord<B::PlaneKey>>,
}

impl<B: ArBackend> ArSession<B> {
    pub fn new(backend: B, settings: Settings) -> Self {
        Self {
            backend,
            settings,
            state: SessionState::Idle,
            reconciler: PlaneReconciler::new(),
            display: DisplayTransformCache::new(),
            plane_buffer: Vec::new(),
        }
    }

    #[inline]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    #[inline]
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    #[inline]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    #[inline]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.state == SessionState::Running
    }

    /// Planes currently tracked, in no particular order.
    pub fn planes(&self) -> impl Iterator<Item = &BoundedPlane> + '_ {
        self.reconciler.planes()
    }

    pub fn plane(&self, key: &B::PlaneKey) -> Option<&BoundedPlane> {
        self.reconciler.get(key)
    }

    /// Last computed background transform (identity before the first frame).
    pub fn display_transform(&self) -> DisplayTransform {
        self.display.transform()
    }

    /// Force the next update to recompute the display transform, e.g. after the
    /// backend's camera feed changed.
    pub fn invalidate_display_transform(&mut self) {
        self.display.invalidate();
    }

    #[cfg_attr(
        feature = "tracing",
        instrument(level = "info", skip(self), fields(backend = self.backend.name()))
    )]
    pub fn start(&mut self) -> Result<(), SessionError> {
        if self.is_running() {
            return Err(SessionError::AlreadyRunning);
        }
        if !self.backend.is_supported() {
            log::warn!("backend `{}` is not supported", self.backend.name());
            return Err(SessionError::Unsupported {
                backend: self.backend.name(),
            });
        }
        self.backend.start_session(&self.settings)?;
        self.state = SessionState::Running;
        log::info!(
            "session started on `{}` (planes={}, point_cloud={}, light={})",
            self.backend.name(),
            self.settings.enable_plane_detection,
            self.settings.enable_point_cloud,
            self.settings.enable_light_estimation
        );
        Ok(())
    }

    /// Stop the backend and drop every tracked plane, reporting each as removed.
    pub fn stop(&mut self) -> Vec<PlaneEvent> {
        if !self.is_running() {
            return Vec::new();
        }
        self.backend.stop_session();
        self.state = SessionState::Stopped;
        self.display.invalidate();
        let events = self.reconciler.clear();
        log::info!(
            "session on `{}` stopped, {} planes dropped",
            self.backend.name(),
            events.len()
        );
        events
    }

    /// Run one host frame.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "debug", skip(self), fields(backend = self.backend.name()))
    )]
    pub fn update(&mut self, ctx: &FrameContext) -> Result<FrameUpdate, SessionError> {
        if !self.is_running() {
            return Err(SessionError::NotRunning);
        }

        let mut update = FrameUpdate {
            tracking: self.backend.begin_frame(),
            ..FrameUpdate::default()
        };

        let backend = &self.backend;
        if self
            .display
            .update_with(ctx.orientation, |o| backend.display_transform(o))
        {
            update.display_transform = Some(self.display.transform());
            update.field_of_view = backend.field_of_view().for_orientation(ctx.orientation);
            log::debug!("display transform recomputed for {}", ctx.orientation);
        }

        if !update.tracking {
            return Ok(update);
        }

        update.pose = self.backend.poll_pose();

        if self.settings.enable_plane_detection {
            self.plane_buffer.clear();
            self.backend.poll_planes(&mut self.plane_buffer);
            update.plane_events = match self.reconciler.reconcile(&self.plane_buffer) {
                Ok(events) => events,
                Err(err) => {
                    // This frame's transform never reaches the caller; recompute next frame.
                    if update.display_transform.is_some() {
                        self.display.invalidate();
                    }
                    log::warn!("dropping frame from `{}`: {err}", self.backend.name());
                    return Err(err.into());
                }
            };
        }
        if self.settings.enable_point_cloud {
            update.point_cloud = self.backend.poll_point_cloud();
        }
        if self.settings.enable_light_estimation {
            update.light_estimate = self.backend.poll_light_estimate();
        }

        Ok(update)
    }

    /// Hit test from a screen point against the current scene.
    pub fn hit_test(
        &self,
        screen_point: Point2<f32>,
        kind: HitTestResultType,
    ) -> Vec<HitTestResult> {
        let planes: Vec<&BoundedPlane> = self.reconciler.planes().collect();
        self.backend
            .hit_test(screen_point, kind, &HitTestScene { planes: &planes })
    }
}

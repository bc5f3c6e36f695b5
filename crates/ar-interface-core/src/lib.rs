//! Vendor-agnostic core of the AR interface.
//!
//! This crate is small and purely geometric. It knows nothing about any AR
//! runtime: backends hand it raw per-frame plane snapshots and screen
//! orientations, and get back reconciled plane events, display transforms and
//! hit-test results.

mod camera;
mod display;
mod logger;
mod plane;
mod reconcile;
mod types;

pub use camera::{PinholeCamera, Ray};
pub use display::{
    DisplayTransform, DisplayTransformCache, FieldOfView, ParseOrientationError, ScreenOrientation,
};
pub use hit_test::{hit_test, intersect_plane, HitTestParams, HitTestResult, HitTestResultType};
pub use plane::{BoundedPlane, PlaneId, TrackedPlaneRecord};
pub use reconcile::{PlaneEvent, PlaneEventKind, PlaneReconciler, ReconcileError};
pub use types::{LightEstimate, PointCloud, Pose, Settings};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::{init_from_env, init_with_level, LOG_ENV_VAR};

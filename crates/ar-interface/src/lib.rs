//! One AR session interface over pluggable tracking backends.
//!
//! This crate provides:
//! - stable re-exports of the vendor-agnostic core (`ar-interface-core`)
//! - the [`ArBackend`] trait every tracking runtime implements
//! - [`ArSession`], which drives a backend frame by frame and turns raw plane
//!   snapshots into reconciled [`PlaneEvent`]s
//! - two in-tree backends: a scripted simulator and a 3-DOF gyroscope fallback
//!
//! ## Quickstart
//!
//! ```no_run
//! use ar_interface::backends::SimulatedBackend;
//! use ar_interface::{ArSession, FrameContext, ScreenOrientation, Settings};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let backend = SimulatedBackend::load("testdata/living_room.json")?;
//! let frames = backend.frame_count();
//! let mut session = ArSession::new(backend, Settings::default());
//! session.start()?;
//!
//! let ctx = FrameContext::new(ScreenOrientation::Portrait);
//! for _ in 0..frames {
//!     for event in session.update(&ctx)?.plane_events {
//!         println!("{:?} {}", event.kind(), event.plane().id);
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - `ar_interface::core`: data model, reconciler, display transform, hit testing.
//! - `ar_interface::backends`: `SimulatedBackend`, `GyroBackend`.
//! - `ar_interface::vendor`: native hit-test flag tables for ARCore / ARKit.

pub use ar_interface_core as core;

mod backend;
pub mod backends;
mod error;
mod session;
pub mod vendor;

pub use backend::{ArBackend, HitTestScene};
pub use error::{SceneError, SessionError};
pub use session::{ArSession, FrameContext, FrameUpdate, SessionState};

pub use ar_interface_core::{
    BoundedPlane, DisplayTransform, HitTestResult, HitTestResultType, LightEstimate, PlaneEvent,
    PlaneEventKind, PlaneId, PointCloud, Pose, ScreenOrientation, Settings, TrackedPlaneRecord,
};

/// Load session settings from a JSON file; missing fields keep their defaults.
pub fn load_settings(path: impl AsRef<std::path::Path>) -> Result<Settings, SceneError> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path).map_err(|source| SceneError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| SceneError::Json {
        path: path.to_path_buf(),
        source,
    })
}

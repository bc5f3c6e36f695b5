//! In-tree backends. Native SDK backends live with their bindings.

mod gyro;
mod simulated;

pub use gyro::{GyroBackend, WebcamFeed};
pub use simulated::{SceneFrame, ScenePlane, ScenePose, SimulatedBackend, SimulatedScene};

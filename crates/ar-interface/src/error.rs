use std::path::PathBuf;

use ar_interface_core::ReconcileError;

/// Errors produced while driving an AR session.
#[derive(thiserror::Error, Debug)]
pub enum SessionError {
    #[error("backend `{backend}` is not supported on this device")]
    Unsupported { backend: &'static str },

    #[error("session is already running")]
    AlreadyRunning,

    #[error("session is not running")]
    NotRunning,

    #[error("backend `{backend}` failed to start: {reason}")]
    StartFailed {
        backend: &'static str,
        reason: String,
    },

    #[error(transparent)]
    Reconcile(#[from] ReconcileError),
}

/// Errors produced while loading a scripted scene or settings file.
#[derive(thiserror::Error, Debug)]
pub enum SceneError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("scene frame {frame}: rotation quaternion has zero length")]
    DegenerateRotation { frame: usize },
}

//! Camera background orientation correction.
//!
//! The camera image arrives in sensor orientation. [`DisplayTransform`] is the
//! 2×2 rotation/reflection that maps it onto the screen for the current
//! [`ScreenOrientation`].

use std::fmt;
use std::str::FromStr;

use nalgebra::{Matrix2, Matrix4, Vector2};
use serde::{Deserialize, Serialize};

/// Device screen orientation, as reported by the host each frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScreenOrientation {
    Portrait,
    PortraitUpsideDown,
    LandscapeLeft,
    LandscapeRight,
}

impl ScreenOrientation {
    pub const ALL: [ScreenOrientation; 4] = [
        ScreenOrientation::Portrait,
        ScreenOrientation::PortraitUpsideDown,
        ScreenOrientation::LandscapeLeft,
        ScreenOrientation::LandscapeRight,
    ];

    #[inline]
    pub fn is_portrait(self) -> bool {
        matches!(
            self,
            ScreenOrientation::Portrait | ScreenOrientation::PortraitUpsideDown
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ScreenOrientation::Portrait => "portrait",
            ScreenOrientation::PortraitUpsideDown => "portrait-upside-down",
            ScreenOrientation::LandscapeLeft => "landscape-left",
            ScreenOrientation::LandscapeRight => "landscape-right",
        }
    }
}

impl fmt::Display for ScreenOrientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown screen orientation `{0}` (expected portrait, portrait-upside-down, landscape-left or landscape-right)")]
pub struct ParseOrientationError(pub String);

impl FromStr for ScreenOrientation {
    type Err = ParseOrientationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let norm = s.trim().to_ascii_lowercase().replace('_', "-");
        ScreenOrientation::ALL
            .into_iter()
            .find(|o| o.as_str() == norm)
            .ok_or_else(|| ParseOrientationError(s.to_string()))
    }
}

/// 2×2 background-image rotation/reflection.
///
/// Stored as the four upper-left elements of a 4×4 matrix whose remaining
/// elements are the identity.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DisplayTransform {
    pub m00: f32,
    pub m01: f32,
    pub m10: f32,
    pub m11: f32,
}

impl DisplayTransform {
    pub const IDENTITY: DisplayTransform = DisplayTransform {
        m00: 1.0,
        m01: 0.0,
        m10: 0.0,
        m11: 1.0,
    };

    /// Background correction for a device camera at the given screen orientation.
    pub fn from_orientation(orientation: ScreenOrientation) -> Self {
        let (cos_theta, sin_theta) = match orientation {
            ScreenOrientation::Portrait => (0.0, -1.0),
            ScreenOrientation::PortraitUpsideDown => (0.0, 1.0),
            ScreenOrientation::LandscapeLeft => (1.0, 0.0),
            ScreenOrientation::LandscapeRight => (-1.0, 0.0),
        };
        Self {
            m00: cos_theta,
            m01: sin_theta,
            m10: sin_theta,
            m11: -cos_theta,
        }
    }

    /// Background correction for a webcam feed that reports its own rotation
    /// (degrees, clockwise) and vertical mirroring.
    ///
    /// Undoes the rotation, then flips Y when the feed is mirrored.
    pub fn from_video(rotation_deg: i32, vertically_mirrored: bool) -> Self {
        let (sin, cos) = snap_unit((-(rotation_deg as f32)).to_radians().sin_cos());
        let sy = if vertically_mirrored { -1.0 } else { 1.0 };
        Self {
            m00: cos,
            m01: -sin * sy,
            m10: sin,
            m11: cos * sy,
        }
    }

    #[inline]
    pub fn as_matrix2(&self) -> Matrix2<f32> {
        Matrix2::new(self.m00, self.m01, self.m10, self.m11)
    }

    pub fn to_matrix4(&self) -> Matrix4<f32> {
        let mut m = Matrix4::identity();
        m[(0, 0)] = self.m00;
        m[(0, 1)] = self.m01;
        m[(1, 0)] = self.m10;
        m[(1, 1)] = self.m11;
        m
    }

    #[inline]
    pub fn apply(&self, v: Vector2<f32>) -> Vector2<f32> {
        self.as_matrix2() * v
    }
}

impl Default for DisplayTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Quarter-turn angles should give exact 0/±1 entries.
fn snap_unit((sin, cos): (f32, f32)) -> (f32, f32) {
    let snap = |v: f32| {
        let r = v.round();
        if (v - r).abs() < 1e-6 {
            r + 0.0
        } else {
            v
        }
    };
    (snap(sin), snap(cos))
}

/// Remembers the last orientation and only recomputes the transform when it changes.
#[derive(Clone, Copy, Debug, Default)]
pub struct DisplayTransformCache {
    last: Option<ScreenOrientation>,
    transform: DisplayTransform,
}

impl DisplayTransformCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refresh for `orientation` using the device-camera table.
    ///
    /// Returns `true` when the transform was recomputed.
    pub fn update(&mut self, orientation: ScreenOrientation) -> bool {
        self.update_with(orientation, DisplayTransform::from_orientation)
    }

    /// Refresh for `orientation` with a caller-supplied calculator.
    pub fn update_with<F>(&mut self, orientation: ScreenOrientation, compute: F) -> bool
    where
        F: FnOnce(ScreenOrientation) -> DisplayTransform,
    {
        if self.last == Some(orientation) {
            return false;
        }
        self.transform = compute(orientation);
        self.last = Some(orientation);
        true
    }

    #[inline]
    pub fn transform(&self) -> DisplayTransform {
        self.transform
    }

    #[inline]
    pub fn last_orientation(&self) -> Option<ScreenOrientation> {
        self.last
    }

    /// Forget the cached orientation so the next update recomputes.
    pub fn invalidate(&mut self) {
        self.last = None;
    }
}

/// Camera field of view in degrees, as far as the backend knows it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldOfView {
    pub horizontal: Option<f32>,
    pub vertical: Option<f32>,
}

impl FieldOfView {
    /// FOV to apply to the render camera. Portrait screens show the sensor's
    /// horizontal span vertically.
    pub fn for_orientation(&self, orientation: ScreenOrientation) -> Option<f32> {
        if orientation.is_portrait() {
            self.horizontal
        } else {
            self.vertical
        }
    }
}

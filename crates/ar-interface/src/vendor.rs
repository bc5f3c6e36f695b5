//! Native hit-test flag values for the vendor runtimes.
//!
//! Native backends translate a [`HitTestResultType`] into these bits before
//! calling the SDK raycast.

use ar_interface_core::HitTestResultType;

/// ARCore `TrackableHitFlags` bits.
pub mod arcore {
    pub const NONE: u32 = 0;
    pub const PLANE_WITHIN_POLYGON: u32 = 1 << 0;
    pub const PLANE_WITHIN_BOUNDS: u32 = 1 << 1;
    pub const PLANE_WITHIN_INFINITY: u32 = 1 << 2;
    pub const FEATURE_POINT: u32 = 1 << 3;
    pub const FEATURE_POINT_WITH_SURFACE_NORMAL: u32 = 1 << 4;
}

/// ARKit `ARHitTestResultType` bits.
pub mod arkit {
    pub const FEATURE_POINT: u32 = 1 << 0;
    pub const ESTIMATED_HORIZONTAL_PLANE: u32 = 1 << 1;
    pub const EXISTING_PLANE: u32 = 1 << 3;
    pub const EXISTING_PLANE_USING_EXTENT: u32 = 1 << 4;
}

pub fn arcore_hit_flags(kind: HitTestResultType) -> u32 {
    match kind {
        HitTestResultType::FeaturePoint => {
            arcore::FEATURE_POINT | arcore::FEATURE_POINT_WITH_SURFACE_NORMAL
        }
        HitTestResultType::EstimatedHorizontalPlane => arcore::PLANE_WITHIN_POLYGON,
        HitTestResultType::ExistingPlane => arcore::PLANE_WITHIN_INFINITY,
        HitTestResultType::ExistingPlaneUsingExtent => arcore::PLANE_WITHIN_BOUNDS,
    }
}

pub fn arkit_hit_type(kind: HitTestResultType) -> u32 {
    match kind {
        HitTestResultType::FeaturePoint => arkit::FEATURE_POINT,
        HitTestResultType::EstimatedHorizontalPlane => arkit::ESTIMATED_HORIZONTAL_PLANE,
        HitTestResultType::ExistingPlane => arkit::EXISTING_PLANE,
        HitTestResultType::ExistingPlaneUsingExtent => arkit::EXISTING_PLANE_USING_EXTENT,
    }
}

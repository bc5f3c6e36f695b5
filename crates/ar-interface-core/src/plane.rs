use std::fmt;

use nalgebra::{Point3, Unit, UnitQuaternion, Vector2, Vector3};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of a reconciled plane.
///
/// Issued once when a vendor plane is first observed and kept for as long as
/// the vendor key stays in the snapshot. A key that disappears and comes back
/// gets a new id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlaneId(Uuid);

impl PlaneId {
    /// Generate a fresh random (v4) identifier.
    pub fn new_random() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for PlaneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// A detected planar surface in world coordinates.
///
/// The plane spans its local X and Z axes; local +Y is the surface normal.
/// `extents` holds the full size along local X (`extents.x`) and Z (`extents.y`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundedPlane {
    pub id: PlaneId,
    pub center: Point3<f32>,
    pub rotation: UnitQuaternion<f32>,
    pub extents: Vector2<f32>,
}

impl BoundedPlane {
    /// World-space unit normal (local +Y).
    #[inline]
    pub fn normal(&self) -> Unit<Vector3<f32>> {
        self.rotation * Vector3::y_axis()
    }

    /// Express a world point in the plane's local frame.
    #[inline]
    pub fn to_local(&self, world: &Point3<f32>) -> Vector3<f32> {
        self.rotation.inverse_transform_vector(&(world - self.center))
    }

    /// Whether a point lying on the plane falls within its rectangular extents.
    pub fn contains_local(&self, local: &Vector3<f32>) -> bool {
        local.x.abs() <= 0.5 * self.extents.x && local.z.abs() <= 0.5 * self.extents.y
    }

    /// Exact field-by-field comparison. `q` and `-q` encode the same rotation
    /// but compare unequal here, so a vendor flipping the sign reports an update.
    pub(crate) fn geometry_differs<K>(&self, record: &TrackedPlaneRecord<K>) -> bool {
        self.center != record.center
            || self.rotation != record.rotation
            || self.extents.x != record.extents.x
            || self.extents.y != record.extents.y
    }

    pub(crate) fn copy_geometry<K>(&mut self, record: &TrackedPlaneRecord<K>) {
        self.center = record.center;
        self.rotation = record.rotation;
        self.extents = record.extents;
    }
}

/// One raw plane as reported by a vendor backend for the current frame.
///
/// `K` is the vendor's stable plane key (a native handle, an anchor id, a
/// scripted name, ...). `subsumed_by` is set once the vendor has merged this
/// plane into another one.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrackedPlaneRecord<K> {
    pub key: K,
    pub center: Point3<f32>,
    pub rotation: UnitQuaternion<f32>,
    pub extents: Vector2<f32>,
    #[serde(default = "Option::default")]
    pub subsumed_by: Option<K>,
}

impl<K> TrackedPlaneRecord<K> {
    pub fn new(
        key: K,
        center: Point3<f32>,
        rotation: UnitQuaternion<f32>,
        extents: Vector2<f32>,
    ) -> Self {
        Self {
            key,
            center,
            rotation,
            extents,
            subsumed_by: None,
        }
    }

    /// Mark the record as merged into `parent`.
    pub fn subsumed_by(mut self, parent: K) -> Self {
        self.subsumed_by = Some(parent);
        self
    }

    #[inline]
    pub fn is_subsumed(&self) -> bool {
        self.subsumed_by.is_some()
    }

    pub(crate) fn to_bounded(&self, id: PlaneId) -> BoundedPlane {
        BoundedPlane {
            id,
            center: self.center,
            rotation: self.rotation,
            extents: self.extents,
        }
    }
}

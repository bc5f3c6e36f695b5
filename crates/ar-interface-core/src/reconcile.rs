//! Tracked-plane reconciliation.
//!
//! Vendors report their full plane set every frame. [`PlaneReconciler`] diffs
//! that snapshot against the planes it already owns and turns the difference
//! into a batch of [`PlaneEvent`]s, issuing one stable [`PlaneId`] per vendor
//! key for the lifetime of that key.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use serde::{Deserialize, Serialize};

use crate::plane::{BoundedPlane, PlaneId, TrackedPlaneRecord};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Errors returned by [`PlaneReconciler::reconcile`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ReconcileError {
    #[error("plane snapshot repeats a key (second occurrence at index {index})")]
    DuplicateKey { index: usize },
}

/// Kind tag of a [`PlaneEvent`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaneEventKind {
    Added,
    Updated,
    Removed,
}

/// One change to the reconciled plane set.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "plane", rename_all = "snake_case")]
pub enum PlaneEvent {
    Added(BoundedPlane),
    Updated(BoundedPlane),
    Removed(BoundedPlane),
}

impl PlaneEvent {
    pub fn kind(&self) -> PlaneEventKind {
        match self {
            PlaneEvent::Added(_) => PlaneEventKind::Added,
            PlaneEvent::Updated(_) => PlaneEventKind::Updated,
            PlaneEvent::Removed(_) => PlaneEventKind::Removed,
        }
    }

    pub fn plane(&self) -> &BoundedPlane {
        match self {
            PlaneEvent::Added(p) | PlaneEvent::Updated(p) | PlaneEvent::Removed(p) => p,
        }
    }

    pub fn into_plane(self) -> BoundedPlane {
        match self {
            PlaneEvent::Added(p) | PlaneEvent::Updated(p) | PlaneEvent::Removed(p) => p,
        }
    }
}

/// Owns the reconciled plane set, keyed by the vendor's plane key.
#[derive(Clone, Debug)]
pub struct PlaneReconciler<K> {
    planes: HashMap<K, BoundedPlane>,
}

impl<K> Default for PlaneReconciler<K> {
    fn default() -> Self {
        Self {
            planes: HashMap::new(),
        }
    }
}

impl<K> PlaneReconciler<K>
where
    K: Eq + Hash + Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Bring the owned plane set in line with `snapshot`.
    ///
    /// Events are emitted in snapshot order (added / updated / subsumed),
    /// followed by one `Removed` per plane whose key vanished from the
    /// snapshot, in unspecified order.
    ///
    /// A record that is already subsumed the first time its key is seen is
    /// skipped, so it never shows up as an `Added`/`Removed` pair.
    ///
    /// A snapshot holding the same key twice violates the vendor contract and
    /// fails before anything is touched.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "debug", skip_all, fields(snapshot = snapshot.len(), owned = self.planes.len()))
    )]
    pub fn reconcile(
        &mut self,
        snapshot: &[TrackedPlaneRecord<K>],
    ) -> Result<Vec<PlaneEvent>, ReconcileError> {
        let mut present: HashSet<&K> = HashSet::with_capacity(snapshot.len());
        for (index, record) in snapshot.iter().enumerate() {
            if !present.insert(&record.key) {
                return Err(ReconcileError::DuplicateKey { index });
            }
        }

        let mut events = Vec::new();
        for record in snapshot {
            match self.planes.entry(record.key.clone()) {
                Entry::Occupied(mut slot) => {
                    if record.is_subsumed() {
                        events.push(PlaneEvent::Removed(slot.remove()));
                    } else if slot.get().geometry_differs(record) {
                        let plane = slot.get_mut();
                        plane.copy_geometry(record);
                        events.push(PlaneEvent::Updated(plane.clone()));
                    }
                }
                Entry::Vacant(slot) => {
                    // Already merged into another plane: never surfaced.
                    if record.is_subsumed() {
                        continue;
                    }
                    let plane = slot.insert(record.to_bounded(PlaneId::new_random()));
                    events.push(PlaneEvent::Added(plane.clone()));
                }
            }
        }

        let stale: Vec<K> = self
            .planes
            .keys()
            .filter(|key| !present.contains(key))
            .cloned()
            .collect();
        for key in stale {
            if let Some(plane) = self.planes.remove(&key) {
                events.push(PlaneEvent::Removed(plane));
            }
        }

        log::debug!(
            "reconciled {} raw planes -> {} events, {} planes owned",
            snapshot.len(),
            events.len(),
            self.planes.len()
        );
        Ok(events)
    }

    /// Drop every owned plane, reporting each as removed.
    pub fn clear(&mut self) -> Vec<PlaneEvent> {
        self.planes.drain().map(|(_, p)| PlaneEvent::Removed(p)).collect()
    }

    pub fn get(&self, key: &K) -> Option<&BoundedPlane> {
        self.planes.get(key)
    }

    pub fn planes(&self) -> impl Iterator<Item = &BoundedPlane> + '_ {
        self.planes.values()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.planes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.planes.is_empty()
    }
}

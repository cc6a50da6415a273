use {
    crate::hash::Point,
    parking_lot::Mutex,
    rapidhash::RapidBuildHasher,
    std::{collections::HashMap, sync::Arc},
};

/// Immutable, ascending snapshot of all points on the ring.
pub(crate) type SortedPoints = Arc<[Point]>;

/// Point index.
///
/// Maps every point on the ring to its owning node and keeps a lazily
/// rebuilt sorted snapshot of the points for successor search.
///
/// Any mutation only drops the snapshot. The next lookup rebuilds it into a
/// fresh array and installs it, so a reader holding an older snapshot keeps
/// a consistent (if stale) view.
#[derive(Debug, Default)]
pub(crate) struct Points {
    /// Point to owning node.
    owners: HashMap<Point, String, RapidBuildHasher>,

    /// Sorted snapshot of `owners` keys, `None` when stale.
    sorted: Mutex<Option<SortedPoints>>,
}

impl Clone for Points {
    fn clone(&self) -> Self {
        Self {
            owners: self.owners.clone(),
            sorted: Mutex::new(self.sorted.lock().clone()),
        }
    }
}

impl Points {
    /// Assigns the point to the node, replacing any previous owner.
    pub fn insert(&mut self, point: Point, node: &str) {
        self.owners.insert(point, node.to_owned());
        self.invalidate();
    }

    /// Removes the point if (and only if) it is owned by the given node.
    ///
    /// Returns whether the point was removed.
    pub fn remove_owned(&mut self, point: Point, node: &str) -> bool {
        if self.owner(point) != Some(node) {
            return false;
        }
        self.owners.remove(&point);
        self.invalidate();
        true
    }

    /// Returns the node owning the point.
    pub fn owner(&self, point: Point) -> Option<&str> {
        self.owners.get(&point).map(String::as_str)
    }

    /// Number of points on the ring.
    pub fn len(&self) -> usize {
        self.owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }

    /// Returns the sorted snapshot, rebuilding it if stale.
    pub fn sorted(&self) -> SortedPoints {
        let mut sorted = self.sorted.lock();
        if let Some(points) = sorted.as_ref() {
            return Arc::clone(points);
        }

        let mut points: Vec<Point> = self.owners.keys().copied().collect();
        points.sort_unstable();
        let points: SortedPoints = points.into();
        tracing::trace!(points = points.len(), "rebuilt sorted point index");

        *sorted = Some(Arc::clone(&points));
        points
    }

    fn invalidate(&mut self) {
        *self.sorted.get_mut() = None;
    }
}

/// Index of the first point at or after `target`, walking clockwise.
///
/// Finds the smallest `i` with `points[i] >= target`; when `target` is past
/// every point the ring wraps around to index `0`. `points` must be sorted
/// and non-empty.
pub(crate) fn successor(points: &[Point], target: Point) -> usize {
    let idx = points.partition_point(|&point| point < target);
    if idx == points.len() { 0 } else { idx }
}

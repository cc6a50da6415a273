use {
    crate::hash::Point,
    rapidhash::RapidBuildHasher,
    std::collections::HashMap,
};

/// Nodes collection.
///
/// Keeps every registered node together with the points generated for it at
/// registration time. The recorded points are what removal deletes, so they
/// are never rewritten after insertion, even if another node later takes over
/// one of them.
///
/// Nodes are enumerated in the order they were added.
#[derive(Debug, Clone, Default)]
pub(crate) struct Nodes {
    /// Node identifiers, in insertion order.
    order: Vec<String>,

    /// Node identifier to recorded points.
    points: HashMap<String, Vec<Point>, RapidBuildHasher>,

    /// Point to the number of nodes that recorded it.
    recorders: HashMap<Point, usize, RapidBuildHasher>,
}

impl Nodes {
    /// Creates a new empty nodes collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node with its recorded points.
    ///
    /// Returns `false` (leaving the collection untouched) if the node is
    /// already present.
    pub fn insert(&mut self, node: &str, points: Vec<Point>) -> bool {
        if self.points.contains_key(node) {
            return false;
        }

        for point in distinct(&points) {
            *self.recorders.entry(point).or_default() += 1;
        }
        self.order.push(node.to_owned());
        self.points.insert(node.to_owned(), points);
        true
    }

    /// Removes and returns (if existed) the points recorded for a node.
    pub fn remove(&mut self, node: &str) -> Option<Vec<Point>> {
        let points = self.points.remove(node)?;
        self.order.retain(|n| n != node);
        for point in distinct(&points) {
            if let Some(count) = self.recorders.get_mut(&point) {
                *count -= 1;
                if *count == 0 {
                    self.recorders.remove(&point);
                }
            }
        }
        Some(points)
    }

    pub fn contains(&self, node: &str) -> bool {
        self.points.contains_key(node)
    }

    /// Returns points recorded for the node.
    pub fn points(&self, node: &str) -> Option<&[Point]> {
        self.points.get(node).map(Vec::as_slice)
    }

    /// Number of nodes in the collection.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Iterator over the nodes, in insertion order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Whether any node in the collection recorded the given point.
    pub fn is_recorded(&self, point: Point) -> bool {
        self.recorders.contains_key(&point)
    }

    /// Most recently added node that recorded the given point.
    ///
    /// Used to hand a point back when its current owner leaves the ring.
    /// Linear in the number of recorded points: callers check
    /// [`is_recorded()`](Self::is_recorded) first, so the scan only happens
    /// when the point collided with another node.
    pub fn last_owner_of(&self, point: Point) -> Option<&str> {
        self.iter().rev().find(|node| {
            self.points
                .get(*node)
                .is_some_and(|points| points.contains(&point))
        })
    }
}

/// Recorded points without repetitions (a node may hash to a point twice).
fn distinct(points: &[Point]) -> Vec<Point> {
    let mut points = points.to_vec();
    points.sort_unstable();
    points.dedup();
    points
}

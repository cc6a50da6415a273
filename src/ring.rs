use {
    super::{
        RingError,
        RingResult,
        hash::{Crc32Hasher, HashFunction, Point},
        node::Nodes,
        points::{Points, successor},
    },
    std::fmt,
    tracing::debug,
};

/// Number of points a node of weight `1.0` is hashed to, unless configured
/// otherwise.
pub const DEFAULT_REPLICAS: usize = 64;

/// Upper bound on the number of points a single node may be hashed to.
pub const MAX_NODE_REPLICAS: usize = u32::MAX as usize;

/// Consistent hashing ring.
///
/// Each node is hashed to `round(replicas * weight)` points, the point for
/// replica `i` of node `n` being `hash("n#i")`. A resource is routed to the
/// owner of the first point at or after the resource's hash, wrapping around
/// past the largest point.
///
/// When two points collide, the node added later owns the point. Removing a
/// node hands each point it owned back to the most recently added remaining
/// node that also hashed to it (if any).
///
/// Mutations take `&mut self`, lookups `&self`. Sharing a ring between
/// threads thus requires external synchronization for writers (or a
/// copy-on-write swap of the whole ring, it is `Clone`).
#[derive(Clone)]
pub struct HashRing<H = Crc32Hasher> {
    hasher: H,
    replicas: usize,
    nodes: Nodes,
    points: Points,
}

impl Default for HashRing {
    fn default() -> Self {
        Self::new()
    }
}

impl HashRing {
    /// Creates a new empty ring using CRC32 and [`DEFAULT_REPLICAS`].
    pub fn new() -> Self {
        Self::with_hasher(Crc32Hasher)
    }
}

impl<H: HashFunction> HashRing<H> {
    /// Creates a new empty ring with the given hash function.
    pub fn with_hasher(hasher: H) -> Self {
        Self {
            hasher,
            replicas: DEFAULT_REPLICAS,
            nodes: Nodes::new(),
            points: Points::default(),
        }
    }

    /// Creates a new empty ring with the given hash function and number of
    /// points per unit of node weight.
    pub fn with_replicas(hasher: H, replicas: usize) -> RingResult<Self> {
        if replicas == 0 {
            return Err(RingError::InvalidReplicas);
        }

        Ok(Self {
            replicas,
            ..Self::with_hasher(hasher)
        })
    }

    /// Adds a node of weight `1.0`.
    pub fn add_node(&mut self, node: &str) -> RingResult<&mut Self> {
        self.add_node_with_weight(node, 1.0)
    }

    /// Adds a node hashed to `round(replicas * weight)` points.
    ///
    /// Negative weights count as zero. Weights that are not finite, or that
    /// would hash the node to more than [`MAX_NODE_REPLICAS`] points, are
    /// rejected. A node of zero weight is registered (and listed by
    /// [`all_nodes()`](Self::all_nodes)), but owns no points and is therefore
    /// never returned by a lookup.
    ///
    /// Fails without touching the ring if the node is already registered.
    pub fn add_node_with_weight(&mut self, node: &str, weight: f64) -> RingResult<&mut Self> {
        if self.nodes.contains(node) {
            return Err(RingError::DuplicateNode(node.to_owned()));
        }
        let replicas = self.replica_count(weight)?;

        let points: Vec<Point> = (0..replicas)
            .map(|i| self.hasher.hash(format!("{node}#{i}").as_bytes()))
            .collect();
        for &point in &points {
            self.points.insert(point, node);
        }
        self.nodes.insert(node, points);

        debug!(node, weight, replicas, "added node to ring");
        Ok(self)
    }

    /// Adds nodes of weight `1.0`, in order.
    pub fn add_nodes<I, S>(&mut self, nodes: I) -> RingResult<&mut Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.add_nodes_with_weight(nodes, 1.0)
    }

    /// Adds nodes of the given weight, in order.
    ///
    /// Stops at the first failure; nodes added before it stay on the ring.
    pub fn add_nodes_with_weight<I, S>(&mut self, nodes: I, weight: f64) -> RingResult<&mut Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for node in nodes {
            self.add_node_with_weight(node.as_ref(), weight)?;
        }
        Ok(self)
    }

    /// Removes a node and all the points it owns.
    pub fn remove_node(&mut self, node: &str) -> RingResult<&mut Self> {
        let points = self
            .nodes
            .remove(node)
            .ok_or_else(|| RingError::NodeNotFound(node.to_owned()))?;

        for point in points {
            if !self.points.remove_owned(point, node) {
                // Point has been taken over by another node.
                continue;
            }
            if !self.nodes.is_recorded(point) {
                continue;
            }
            if let Some(owner) = self.nodes.last_owner_of(point) {
                self.points.insert(point, owner);
            }
        }

        debug!(node, "removed node from ring");
        Ok(self)
    }

    /// Returns all registered nodes, in the order they were added.
    pub fn all_nodes(&self) -> Vec<&str> {
        self.nodes.iter().collect()
    }

    /// Returns the node responsible for the given resource.
    ///
    /// Unlike [`nodes()`](Self::nodes), an empty ring is an error.
    pub fn lookup<R: AsRef<[u8]>>(&self, resource: R) -> RingResult<&str> {
        self.nodes(resource, 1)?
            .into_iter()
            .next()
            .ok_or(RingError::NoNodes)
    }

    /// Returns up to `count` distinct nodes for the given resource, in order
    /// of precedence.
    ///
    /// The first node is the one [`lookup()`](Self::lookup) returns. The rest
    /// are found walking clockwise from it, skipping nodes already listed.
    /// Fewer nodes are returned if the ring does not have `count` reachable
    /// nodes; an empty ring yields an empty list.
    pub fn nodes<R: AsRef<[u8]>>(&self, resource: R, count: usize) -> RingResult<Vec<&str>> {
        if count == 0 {
            return Err(RingError::InvalidCount(count));
        }

        if self.points.is_empty() {
            return Ok(Vec::new());
        }

        // A single node owns every point.
        if self.nodes.len() == 1 {
            return Ok(self.nodes.iter().take(1).collect());
        }

        let sorted = self.points.sorted();
        let start = successor(&sorted, self.hasher.hash(resource.as_ref()));

        let max_distinct = count.min(self.nodes.len());
        let mut owners = Vec::with_capacity(max_distinct);
        for &point in sorted[start..].iter().chain(&sorted[..start]) {
            let Some(owner) = self.points.owner(point) else {
                continue;
            };
            if !owners.contains(&owner) {
                owners.push(owner);
                if owners.len() == max_distinct {
                    break;
                }
            }
        }

        Ok(owners)
    }

    /// Returns the points recorded for the node when it was added.
    ///
    /// Points lost to a later colliding node are still listed.
    pub fn node_points(&self, node: &str) -> Option<&[Point]> {
        self.nodes.points(node)
    }

    /// Returns every point on the ring with its owner, in ascending order.
    pub fn points(&self) -> Vec<(Point, &str)> {
        self.points
            .sorted()
            .iter()
            .filter_map(|&point| self.points.owner(point).map(|owner| (point, owner)))
            .collect()
    }

    pub fn contains(&self, node: &str) -> bool {
        self.nodes.contains(node)
    }

    /// Number of registered nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of distinct points on the ring.
    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 0
    }

    /// Number of points per unit of node weight.
    pub fn replicas_per_node(&self) -> usize {
        self.replicas
    }

    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    fn replica_count(&self, weight: f64) -> RingResult<usize> {
        if !weight.is_finite() {
            return Err(RingError::InvalidWeight(weight));
        }
        let replicas = (self.replicas as f64 * weight).round().max(0.0);
        if replicas > MAX_NODE_REPLICAS as f64 {
            return Err(RingError::InvalidWeight(weight));
        }
        Ok(replicas as usize)
    }
}

impl<H> fmt::Display for HashRing<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HashRing{{nodes:[")?;
        for (i, node) in self.nodes.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            f.write_str(node)?;
        }
        write!(
            f,
            "]}}, node_count:{}, point_count:{}",
            self.nodes.len(),
            self.points.len()
        )
    }
}

impl<H> fmt::Debug for HashRing<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashRing")
            .field("replicas", &self.replicas)
            .field("nodes", &self.nodes.iter().collect::<Vec<_>>())
            .field("points", &self.points.len())
            .finish()
    }
}

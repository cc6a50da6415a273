use super::{Crc32Hasher, DEFAULT_REPLICAS, HashFunction, HashRing, RingResult};

/// Hash ring builder.
///
/// Collects the initial nodes and the ring configuration, validating both
/// when the ring is built.
pub struct RingBuilder<H = Crc32Hasher> {
    nodes: Vec<String>,
    weight: f64,
    replicas: usize,
    hasher: H,
}

impl RingBuilder {
    /// Create new ring builder.
    pub fn new<I, S>(init_nodes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            nodes: init_nodes.into_iter().map(Into::into).collect(),
            weight: 1.0,
            replicas: DEFAULT_REPLICAS,
            hasher: Crc32Hasher,
        }
    }
}

impl<H: HashFunction> RingBuilder<H> {
    /// Transform the builder into one with a different hash function.
    pub fn with_hasher<T: HashFunction>(self, hasher: T) -> RingBuilder<T> {
        RingBuilder {
            nodes: self.nodes,
            weight: self.weight,
            replicas: self.replicas,
            hasher,
        }
    }

    /// Number of points per unit of node weight.
    pub fn with_replicas(mut self, replicas: usize) -> Self {
        self.replicas = replicas;
        self
    }

    /// Weight of the initial nodes.
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    /// Build the ring, adding the initial nodes in order.
    pub fn build(self) -> RingResult<HashRing<H>> {
        let mut ring = HashRing::with_replicas(self.hasher, self.replicas)?;
        ring.add_nodes_with_weight(&self.nodes, self.weight)?;
        Ok(ring)
    }
}

//! Consistent hashing ring.
//!
//! Maps string resources onto a dynamic set of named nodes, so that adding
//! or removing a node reassigns only about `1/N` of the resources instead of
//! rehashing all of them.
//!
//! Each node is hashed to a number of points (replicas, scaled by the node's
//! weight) on a circular coordinate space. A resource is owned by the node of
//! the first point at or after the resource's hash, and the ring wraps around
//! past the largest point.
//!
//! ```
//! use flexring::HashRing;
//!
//! let mut ring = HashRing::new();
//! ring.add_node("cache-1")?.add_node("cache-2")?;
//! ring.add_node_with_weight("cache-3", 2.0)?;
//!
//! let primary = ring.lookup("user:42")?;
//! let replicas = ring.nodes("user:42", 2)?;
//! assert_eq!(replicas[0], primary);
//! # Ok::<(), flexring::RingError>(())
//! ```

mod builder;
mod error;
mod hash;
mod node;
mod points;
mod ring;

pub use {
    builder::RingBuilder,
    error::{RingError, RingResult},
    hash::{Crc32Hasher, HashFunction, Md5Hasher, Point, RapidHasher},
    ring::{DEFAULT_REPLICAS, HashRing, MAX_NODE_REPLICAS},
};

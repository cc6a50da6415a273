#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RingError {
    /// Node is already registered.
    #[error("Node '{0}' already exists")]
    DuplicateNode(String),

    /// Node was never registered (or has already been removed).
    #[error("Node '{0}' does not exist")]
    NodeNotFound(String),

    /// Requested number of nodes must be positive.
    #[error("Invalid count requested: {0}")]
    InvalidCount(usize),

    /// Lookup on a ring that has no reachable nodes.
    #[error("No nodes exist")]
    NoNodes,

    /// Replicas per node must be positive.
    #[error("Replicas per node must be positive")]
    InvalidReplicas,

    /// Node weight must be a finite number.
    #[error("Invalid node weight: {0}")]
    InvalidWeight(f64),
}

pub type RingResult<T> = Result<T, RingError>;

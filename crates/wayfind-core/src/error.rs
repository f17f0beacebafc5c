use thiserror::Error;

use crate::graph::{NodeId, NodeIx};

/// Errors raised while building a [`Graph`](crate::Graph) or addressing it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GraphError {
    /// A search was started with a handle that does not belong to the graph.
    #[error("node handle {0} is not part of the graph")]
    InvalidEndpoint(NodeIx),
    /// An external identifier was not found in the graph.
    #[error("unknown node id {0}")]
    UnknownNodeId(NodeId),
    /// Two node records share the same identifier.
    #[error("duplicate node id {0}")]
    DuplicateNode(NodeId),
    /// An edge record references a node that was never added.
    #[error("edge {from} -> {to} references an unknown node")]
    UnknownNode { from: NodeId, to: NodeId },
    /// Node coordinates must be finite.
    #[error("node {0} has non-finite coordinates")]
    InvalidCoord(NodeId),
    /// Edge weights must be finite and non-negative.
    #[error("edge {from} -> {to} has invalid weight {weight}")]
    InvalidWeight { from: NodeId, to: NodeId, weight: f64 },
    /// Edges must connect two distinct nodes.
    #[error("edge on node {0} is a self-loop")]
    SelfLoop(NodeId),
}

pub type GraphResult<T> = Result<T, GraphError>;

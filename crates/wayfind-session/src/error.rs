use thiserror::Error;
use wayfind_core::{GraphError, NodeId};
use wayfind_paths::UnknownAlgorithm;

/// Errors surfaced to the caller of a [`Session`](crate::Session).
///
/// Search outcomes are not errors: a run that finds no path simply finishes,
/// and stepping a finished run yields an empty delta.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionError {
    #[error(transparent)]
    Graph(#[from] GraphError),
    /// An endpoint id that is not a node of the session's graph.
    #[error("endpoint {0} is not a node of the graph")]
    InvalidEndpoint(NodeId),
    #[error("unknown algorithm '{0}'")]
    UnknownAlgorithm(String),
    #[error("start and end nodes have not been set")]
    MissingEndpoints,
    #[error("no algorithm has been selected")]
    NoAlgorithmSelected,
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<UnknownAlgorithm> for SessionError {
    fn from(e: UnknownAlgorithm) -> Self {
        SessionError::UnknownAlgorithm(e.0)
    }
}

pub type SessionResult<T> = Result<T, SessionError>;

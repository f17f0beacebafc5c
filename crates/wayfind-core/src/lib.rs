//! **wayfind-core**: graph model for the wayfind stepwise search engine.
//!
//! A road network is a [`Graph`] arena of [`Node`]s and [`Edge`]s addressed
//! by [`NodeIx`] / [`EdgeIx`] handles. Every node carries a [`SearchState`]
//! that search strategies mutate in place so that a renderer can follow a run
//! step by step.

pub mod builder;
pub mod error;
pub mod geom;
pub mod graph;

pub use builder::{EdgeRecord, GraphBuilder, GraphData, NodeRecord};
pub use error::{GraphError, GraphResult};
pub use geom::{Coord, euclidean, haversine_km};
pub use graph::{Adjacent, Edge, EdgeIx, Graph, Node, NodeId, NodeIx, SearchState};

//! Graph construction from node and edge records.
//!
//! The engine never loads maps itself. An external loader hands it
//! [`NodeRecord`]s and [`EdgeRecord`]s (or a [`GraphData`] bundle when the
//! `serde` feature is on) and gets back an immutable-topology [`Graph`].

use crate::error::{GraphError, GraphResult};
use crate::geom::{Coord, euclidean};
use crate::graph::{Graph, NodeId, NodeIx};

/// A node as supplied by the loader.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeRecord {
    pub id: NodeId,
    pub lon: f64,
    pub lat: f64,
}

/// An undirected edge as supplied by the loader.
///
/// A missing `weight` defaults to the planar distance between the endpoints.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EdgeRecord {
    pub from: NodeId,
    pub to: NodeId,
    #[cfg_attr(feature = "serde", serde(default))]
    pub weight: Option<f64>,
}

/// Node and edge records bundled together, e.g. for a JSON payload.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GraphData {
    pub nodes: Vec<NodeRecord>,
    pub edges: Vec<EdgeRecord>,
}

impl GraphData {
    /// Validate and build the graph.
    pub fn into_graph(self) -> GraphResult<Graph> {
        Graph::from_records(self.nodes, self.edges)
    }
}

/// Incremental graph builder.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    graph: Graph,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node. Identifiers must be unique and coordinates finite.
    pub fn add_node(&mut self, id: NodeId, lon: f64, lat: f64) -> GraphResult<NodeIx> {
        self.graph.push_node(id, Coord::new(lon, lat))
    }

    /// Add an undirected edge between two previously added nodes.
    pub fn add_edge(&mut self, from: NodeId, to: NodeId, weight: Option<f64>) -> GraphResult<()> {
        let (Some(a), Some(b)) = (self.graph.lookup(from), self.graph.lookup(to)) else {
            return Err(GraphError::UnknownNode { from, to });
        };
        if a == b {
            return Err(GraphError::SelfLoop(from));
        }
        let weight = match weight {
            Some(w) if w.is_finite() && w >= 0.0 => w,
            Some(w) => return Err(GraphError::InvalidWeight { from, to, weight: w }),
            None => euclidean(self.graph.coord(a), self.graph.coord(b)),
        };
        self.graph.push_edge(a, b, weight);
        Ok(())
    }

    pub fn build(self) -> Graph {
        log::debug!(
            "graph built: {} nodes, {} edges",
            self.graph.len(),
            self.graph.edge_count()
        );
        self.graph
    }
}

impl Graph {
    /// Build a graph from loader records, rejecting duplicates, dangling
    /// edges, self-loops and invalid weights.
    pub fn from_records(
        nodes: impl IntoIterator<Item = NodeRecord>,
        edges: impl IntoIterator<Item = EdgeRecord>,
    ) -> GraphResult<Self> {
        let mut b = GraphBuilder::new();
        for n in nodes {
            b.add_node(n.id, n.lon, n.lat)?;
        }
        for e in edges {
            b.add_edge(e.from, e.to, e.weight)?;
        }
        Ok(b.build())
    }
}

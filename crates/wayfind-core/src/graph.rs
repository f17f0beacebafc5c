//! The [`Graph`] arena: nodes and edges stored by handle, with per-node
//! search state that strategies mutate in place.
//!
//! Topology is fixed once the graph is built (see
//! [`GraphBuilder`](crate::GraphBuilder)). Only [`SearchState`] and the edge
//! `visited` flags change during a run, and [`Graph::reset`] puts them back to
//! their defaults between runs.

use std::collections::HashMap;
use std::fmt;

use crate::error::{GraphError, GraphResult};
use crate::geom::{Coord, euclidean};

/// External node identifier (e.g. an OpenStreetMap node id).
pub type NodeId = u64;

// ---------------------------------------------------------------------------
// Handles
// ---------------------------------------------------------------------------

/// Stable handle of a node inside a [`Graph`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeIx(usize);

impl NodeIx {
    #[inline]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Position of the node in the arena.
    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeIx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// Stable handle of an edge inside a [`Graph`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EdgeIx(usize);

impl EdgeIx {
    #[inline]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for EdgeIx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Nodes and edges
// ---------------------------------------------------------------------------

/// One adjacency entry: the neighbouring node and the edge leading to it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Adjacent {
    pub node: NodeIx,
    pub edge: EdgeIx,
}

/// Per-run search bookkeeping attached to every node.
///
/// `parent` is the path-reconstruction predecessor. `referer` is the node
/// whose connecting edge is drawn as explored; the two diverge when a node is
/// reached again after its parent was fixed.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SearchState {
    pub visited: bool,
    pub parent: Option<NodeIx>,
    pub referer: Option<NodeIx>,
    /// Accumulated cost from the search origin (g-score).
    pub distance_from_start: f64,
    /// Heuristic estimate towards the search target (h-score).
    pub distance_to_end: f64,
}

impl Default for SearchState {
    fn default() -> Self {
        Self {
            visited: false,
            parent: None,
            referer: None,
            distance_from_start: f64::INFINITY,
            distance_to_end: 0.0,
        }
    }
}

/// A point of the road network.
#[derive(Clone, Debug)]
pub struct Node {
    id: NodeId,
    coord: Coord,
    adjacency: Vec<Adjacent>,
    pub state: SearchState,
}

impl Node {
    #[inline]
    pub fn id(&self) -> NodeId {
        self.id
    }

    #[inline]
    pub fn coord(&self) -> Coord {
        self.coord
    }

    /// Outgoing adjacency in insertion order.
    #[inline]
    pub fn neighbors(&self) -> &[Adjacent] {
        &self.adjacency
    }

    #[inline]
    pub fn degree(&self) -> usize {
        self.adjacency.len()
    }
}

/// An undirected, weighted road segment.
#[derive(Clone, Debug)]
pub struct Edge {
    a: NodeIx,
    b: NodeIx,
    weight: f64,
    visited: bool,
}

impl Edge {
    #[inline]
    pub fn endpoints(&self) -> (NodeIx, NodeIx) {
        (self.a, self.b)
    }

    #[inline]
    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Whether the edge is drawn as part of the explored frontier.
    #[inline]
    pub fn visited(&self) -> bool {
        self.visited
    }

    /// The endpoint that is not `n`. Returns `a` for a handle that is neither.
    #[inline]
    pub fn other(&self, n: NodeIx) -> NodeIx {
        if n == self.a { self.b } else { self.a }
    }
}

// ---------------------------------------------------------------------------
// Graph
// ---------------------------------------------------------------------------

/// Owning arena of every node and edge of the road network.
#[derive(Clone, Debug, Default)]
pub struct Graph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    index: HashMap<NodeId, NodeIx>,
    /// Edges newly marked since the last [`take_marked_edges`](Self::take_marked_edges).
    marked: Vec<EdgeIx>,
}

impl Graph {
    /// Create an empty graph. Use [`GraphBuilder`](crate::GraphBuilder) to
    /// populate one.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push_node(&mut self, id: NodeId, coord: Coord) -> GraphResult<NodeIx> {
        if self.index.contains_key(&id) {
            return Err(GraphError::DuplicateNode(id));
        }
        if !coord.is_finite() {
            return Err(GraphError::InvalidCoord(id));
        }
        let ix = NodeIx(self.nodes.len());
        self.nodes.push(Node {
            id,
            coord,
            adjacency: Vec::new(),
            state: SearchState::default(),
        });
        self.index.insert(id, ix);
        Ok(ix)
    }

    pub(crate) fn push_edge(&mut self, a: NodeIx, b: NodeIx, weight: f64) -> EdgeIx {
        let e = EdgeIx(self.edges.len());
        self.edges.push(Edge {
            a,
            b,
            weight,
            visited: false,
        });
        self.nodes[a.0].adjacency.push(Adjacent { node: b, edge: e });
        self.nodes[b.0].adjacency.push(Adjacent { node: a, edge: e });
        e
    }

    /// Number of nodes.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Handle of the node with external id `id`, if present.
    #[inline]
    pub fn lookup(&self, id: NodeId) -> Option<NodeIx> {
        self.index.get(&id).copied()
    }

    /// Like [`lookup`](Self::lookup) but reports a missing id as an error.
    pub fn resolve(&self, id: NodeId) -> GraphResult<NodeIx> {
        self.lookup(id).ok_or(GraphError::UnknownNodeId(id))
    }

    /// Whether `ix` addresses a node of this graph.
    #[inline]
    pub fn contains(&self, ix: NodeIx) -> bool {
        ix.0 < self.nodes.len()
    }

    /// Fail with [`GraphError::InvalidEndpoint`] unless `ix` is in the graph.
    pub fn check(&self, ix: NodeIx) -> GraphResult<()> {
        if self.contains(ix) {
            Ok(())
        } else {
            Err(GraphError::InvalidEndpoint(ix))
        }
    }

    #[inline]
    pub fn node(&self, ix: NodeIx) -> &Node {
        &self.nodes[ix.0]
    }

    #[inline]
    pub fn node_mut(&mut self, ix: NodeIx) -> &mut Node {
        &mut self.nodes[ix.0]
    }

    #[inline]
    pub fn state(&self, ix: NodeIx) -> &SearchState {
        &self.nodes[ix.0].state
    }

    #[inline]
    pub fn state_mut(&mut self, ix: NodeIx) -> &mut SearchState {
        &mut self.nodes[ix.0].state
    }

    #[inline]
    pub fn id(&self, ix: NodeIx) -> NodeId {
        self.nodes[ix.0].id
    }

    #[inline]
    pub fn coord(&self, ix: NodeIx) -> Coord {
        self.nodes[ix.0].coord
    }

    #[inline]
    pub fn neighbors(&self, ix: NodeIx) -> &[Adjacent] {
        &self.nodes[ix.0].adjacency
    }

    #[inline]
    pub fn edge(&self, e: EdgeIx) -> &Edge {
        &self.edges[e.0]
    }

    /// Planar distance between two nodes' coordinates.
    #[inline]
    pub fn distance(&self, a: NodeIx, b: NodeIx) -> f64 {
        euclidean(self.coord(a), self.coord(b))
    }

    /// Iterate over every node handle in arena order.
    pub fn node_indices(&self) -> impl Iterator<Item = NodeIx> + '_ {
        (0..self.nodes.len()).map(NodeIx)
    }

    /// Iterate over every edge handle in arena order.
    pub fn edge_indices(&self) -> impl Iterator<Item = EdgeIx> + '_ {
        (0..self.edges.len()).map(EdgeIx)
    }

    /// The cheapest edge joining `a` and `b`, if they are adjacent.
    pub fn edge_between(&self, a: NodeIx, b: NodeIx) -> Option<EdgeIx> {
        self.neighbors(a)
            .iter()
            .filter(|adj| adj.node == b)
            .map(|adj| adj.edge)
            .min_by(|x, y| self.edges[x.0].weight.total_cmp(&self.edges[y.0].weight))
    }

    /// Mark an edge as explored. Returns `true` only if the flag was newly set.
    #[inline]
    pub fn mark_edge_visited(&mut self, e: EdgeIx) -> bool {
        let edge = &mut self.edges[e.0];
        let fresh = !std::mem::replace(&mut edge.visited, true);
        if fresh {
            self.marked.push(e);
        }
        fresh
    }

    /// Drain the edges marked since the previous call, in marking order.
    pub fn take_marked_edges(&mut self) -> Vec<EdgeIx> {
        std::mem::take(&mut self.marked)
    }

    /// Mark the edge between `ix` and its current referer as explored.
    ///
    /// Returns `true` if an edge was newly marked.
    pub fn mark_referer_edge(&mut self, ix: NodeIx) -> bool {
        let Some(referer) = self.state(ix).referer else {
            return false;
        };
        match self.edge_between(ix, referer) {
            Some(e) => self.mark_edge_visited(e),
            None => false,
        }
    }

    /// Whether the edge between `ix` and its referer is marked explored.
    pub fn referer_edge_visited(&self, ix: NodeIx) -> bool {
        self.state(ix)
            .referer
            .and_then(|r| self.edge_between(ix, r))
            .is_some_and(|e| self.edges[e.0].visited)
    }

    /// Clear the search state of every node and edge.
    pub fn reset(&mut self) {
        for n in self.nodes.iter_mut() {
            n.state = SearchState::default();
        }
        for e in self.edges.iter_mut() {
            e.visited = false;
        }
        self.marked.clear();
        log::trace!(
            "graph reset: {} nodes, {} edges",
            self.nodes.len(),
            self.edges.len()
        );
    }

    /// Number of nodes currently marked visited.
    pub fn visited_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.state.visited).count()
    }

    /// Total weight of a walk, or `None` if two consecutive nodes are not
    /// adjacent.
    pub fn path_cost(&self, path: &[NodeIx]) -> Option<f64> {
        path.windows(2).try_fold(0.0, |acc, w| {
            self.edge_between(w[0], w[1])
                .map(|e| acc + self.edges[e.0].weight)
        })
    }

    /// Translate handles into external identifiers.
    pub fn ids(&self, path: &[NodeIx]) -> Vec<NodeId> {
        path.iter().map(|&ix| self.id(ix)).collect()
    }
}

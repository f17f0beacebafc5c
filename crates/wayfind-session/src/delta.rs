//! Per-step change sets handed to renderers.

use wayfind_core::{EdgeIx, Graph, NodeId, NodeIx};

/// Visible state of one node after a step.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeUpdate {
    pub id: NodeId,
    pub visited: bool,
    pub parent: Option<NodeId>,
    pub referer: Option<NodeId>,
    /// Whether the edge to `referer` is drawn as explored.
    pub referer_edge_visited: bool,
    /// `None` while the node has no finite cost yet.
    pub distance_from_start: Option<f64>,
    pub distance_to_end: f64,
}

impl NodeUpdate {
    /// Snapshot the state of `ix`.
    pub fn capture(graph: &Graph, ix: NodeIx) -> Self {
        let s = graph.state(ix);
        Self {
            id: graph.id(ix),
            visited: s.visited,
            parent: s.parent.map(|p| graph.id(p)),
            referer: s.referer.map(|r| graph.id(r)),
            referer_edge_visited: graph.referer_edge_visited(ix),
            distance_from_start: Some(s.distance_from_start).filter(|d| d.is_finite()),
            distance_to_end: s.distance_to_end,
        }
    }
}

/// An edge newly drawn as explored, by its endpoints' ids.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EdgeUpdate {
    pub from: NodeId,
    pub to: NodeId,
}

impl EdgeUpdate {
    pub fn capture(graph: &Graph, e: EdgeIx) -> Self {
        let (a, b) = graph.edge(e).endpoints();
        Self {
            from: graph.id(a),
            to: graph.id(b),
        }
    }
}

/// Everything that changed during one call to
/// [`Session::step`](crate::Session::step).
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StepDelta {
    /// Changed nodes in the order the strategy touched them.
    pub nodes: Vec<NodeUpdate>,
    /// Edges marked explored during the step, in marking order.
    pub edges: Vec<EdgeUpdate>,
    /// Whether the run is finished after this step.
    pub finished: bool,
}

impl StepDelta {
    pub(crate) fn capture(
        graph: &Graph,
        touched: &[NodeIx],
        marked: &[EdgeIx],
        finished: bool,
    ) -> Self {
        Self {
            nodes: touched
                .iter()
                .map(|&ix| NodeUpdate::capture(graph, ix))
                .collect(),
            edges: marked
                .iter()
                .map(|&e| EdgeUpdate::capture(graph, e))
                .collect(),
            finished,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    /// Ids of the changed nodes.
    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.iter().map(|n| n.id)
    }
}

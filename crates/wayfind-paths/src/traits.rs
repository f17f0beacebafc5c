use wayfind_core::{Graph, GraphResult, NodeIx};

/// Stepwise search contract shared by every strategy.
///
/// A strategy owns only its run-scoped frontier state and addresses the graph
/// through handles; the graph itself is lent to each call. The lifecycle is
/// `start` once, then `next_step` until [`is_finished`](Self::is_finished).
pub trait Search {
    /// Begin a fresh run from `start` to `end`.
    ///
    /// Fails with [`GraphError::InvalidEndpoint`](wayfind_core::GraphError)
    /// before touching anything if either handle is not in `graph`. Shared
    /// graph marks from a previous run are left alone; clear them with
    /// [`Graph::reset`] first.
    fn start(&mut self, graph: &mut Graph, start: NodeIx, end: NodeIx) -> GraphResult<()>;

    /// Perform one unit of work and return every node whose visible state
    /// changed. Returns an empty vector once the run is finished.
    fn next_step(&mut self, graph: &mut Graph) -> Vec<NodeIx>;

    /// Whether the run reached its goal, met in the middle, or ran out of
    /// frontier.
    fn is_finished(&self) -> bool;

    /// The path found by a finished run, endpoints included.
    fn path(&self, graph: &Graph) -> Option<Vec<NodeIx>>;
}

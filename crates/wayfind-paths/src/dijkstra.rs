use wayfind_core::{Adjacent, Graph, GraphResult, NodeIx};

use crate::frontier::{OpenList, Touched, chain, trace_parents};
use crate::traits::Search;

/// Stepwise Dijkstra. Tentative distances live in
/// [`SearchState::distance_from_start`](wayfind_core::SearchState); a node is
/// marked visited when it is settled.
#[derive(Debug, Default)]
pub struct Dijkstra {
    open: OpenList,
    ends: Option<(NodeIx, NodeIx)>,
    finished: bool,
    found: bool,
    nbuf: Vec<Adjacent>,
}

impl Dijkstra {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pop the unvisited node with the smallest tentative distance, skipping
    /// stale heap entries.
    fn pop_min(&mut self, graph: &Graph) -> Option<NodeIx> {
        while let Some(r) = self.open.pop() {
            let s = graph.state(r.node);
            if s.visited || r.key > s.distance_from_start {
                continue;
            }
            return Some(r.node);
        }
        None
    }
}

impl Search for Dijkstra {
    fn start(&mut self, graph: &mut Graph, start: NodeIx, end: NodeIx) -> GraphResult<()> {
        graph.check(start)?;
        graph.check(end)?;
        self.open.clear();
        graph.state_mut(start).distance_from_start = 0.0;
        self.open.push(start, 0.0);
        self.ends = Some((start, end));
        self.finished = false;
        self.found = false;
        Ok(())
    }

    fn next_step(&mut self, graph: &mut Graph) -> Vec<NodeIx> {
        if self.finished {
            return Vec::new();
        }
        let Some((_, end)) = self.ends else {
            self.finished = true;
            return Vec::new();
        };
        let Some(current) = self.pop_min(graph) else {
            self.finished = true;
            log::debug!("dijkstra: every reachable node settled, goal unreachable");
            return Vec::new();
        };

        graph.state_mut(current).visited = true;
        graph.mark_referer_edge(current);

        if current == end {
            self.open.clear();
            self.finished = true;
            self.found = true;
            log::debug!(
                "dijkstra: settled goal {current} at distance {}",
                graph.state(current).distance_from_start
            );
            return vec![current];
        }

        let mut touched = Touched::default();
        touched.push(current);
        let g = graph.state(current).distance_from_start;
        let mut nbuf = std::mem::take(&mut self.nbuf);
        nbuf.clear();
        nbuf.extend_from_slice(graph.neighbors(current));

        for &Adjacent { node, edge } in nbuf.iter() {
            if graph.state(node).visited {
                continue;
            }
            let tentative = g + graph.edge(edge).weight();
            let s = graph.state_mut(node);
            if tentative < s.distance_from_start {
                s.distance_from_start = tentative;
                s.parent = Some(current);
                s.referer = Some(current);
                self.open.push(node, tentative);
                touched.push(node);
            }
        }

        self.nbuf = nbuf;
        touched.into_vec()
    }

    fn is_finished(&self) -> bool {
        self.finished
    }

    fn path(&self, graph: &Graph) -> Option<Vec<NodeIx>> {
        let (start, end) = self.ends?;
        if !self.found {
            return None;
        }
        trace_parents(graph, start, end)
    }
}

// ---------------------------------------------------------------------------
// Single-source shortest-path tree
// ---------------------------------------------------------------------------

/// Distances and predecessors of a complete single-source Dijkstra run.
///
/// Computed without touching the graph's search state, so it can be built
/// while a stepwise run is in progress.
#[derive(Clone, Debug)]
pub struct ShortestPathTree {
    source: NodeIx,
    dist: Vec<f64>,
    parent: Vec<Option<NodeIx>>,
}

impl ShortestPathTree {
    #[inline]
    pub fn source(&self) -> NodeIx {
        self.source
    }

    /// Shortest distance from the source, or `None` if unreachable.
    pub fn distance(&self, to: NodeIx) -> Option<f64> {
        self.dist
            .get(to.index())
            .copied()
            .filter(|d| d.is_finite())
    }

    /// Shortest path `source ..= to`, or `None` if unreachable.
    pub fn path_to(&self, to: NodeIx) -> Option<Vec<NodeIx>> {
        self.distance(to)?;
        let mut path = chain(&self.parent, to);
        path.reverse();
        Some(path)
    }
}

/// Run Dijkstra from `source` over the whole graph.
pub fn shortest_path_tree(graph: &Graph, source: NodeIx) -> ShortestPathTree {
    let n = graph.len();
    let mut dist = vec![f64::INFINITY; n];
    let mut parent = vec![None; n];
    let mut settled = vec![false; n];
    let mut open = OpenList::default();

    if graph.contains(source) {
        dist[source.index()] = 0.0;
        open.push(source, 0.0);
    }

    while let Some(r) = open.pop() {
        let ci = r.node.index();
        if settled[ci] || r.key > dist[ci] {
            continue;
        }
        settled[ci] = true;
        for adj in graph.neighbors(r.node) {
            let ni = adj.node.index();
            if settled[ni] {
                continue;
            }
            let tentative = dist[ci] + graph.edge(adj.edge).weight();
            if tentative < dist[ni] {
                dist[ni] = tentative;
                parent[ni] = Some(r.node);
                open.push(adj.node, tentative);
            }
        }
    }

    ShortestPathTree {
        source,
        dist,
        parent,
    }
}

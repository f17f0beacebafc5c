use wayfind_core::{Adjacent, Graph, GraphResult, NodeIx};

use crate::frontier::{OpenList, Touched, trace_parents};
use crate::traits::Search;

/// Stepwise A*: Dijkstra relaxation with the open list ordered by
/// `f = g + h`, where `h` is the straight-line distance to the goal.
///
/// Closed nodes are never reopened, so the result is optimal whenever edge
/// weights are at least the planar distance between their endpoints.
#[derive(Debug, Default)]
pub struct AStar {
    open: OpenList,
    ends: Option<(NodeIx, NodeIx)>,
    finished: bool,
    found: bool,
    nbuf: Vec<Adjacent>,
}

impl AStar {
    pub fn new() -> Self {
        Self::default()
    }

    fn pop_best(&mut self, graph: &Graph) -> Option<NodeIx> {
        while let Some(r) = self.open.pop() {
            let s = graph.state(r.node);
            if s.visited || r.key > s.distance_from_start + s.distance_to_end {
                continue;
            }
            return Some(r.node);
        }
        None
    }
}

impl Search for AStar {
    fn start(&mut self, graph: &mut Graph, start: NodeIx, end: NodeIx) -> GraphResult<()> {
        graph.check(start)?;
        graph.check(end)?;
        self.open.clear();

        let h = graph.distance(start, end);
        let s = graph.state_mut(start);
        s.distance_from_start = 0.0;
        s.distance_to_end = h;
        self.open.push(start, h);

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
        let Some(current) = self.pop_best(graph) else {
            self.finished = true;
            log::debug!("astar: open list exhausted without reaching the goal");
            return Vec::new();
        };

        graph.state_mut(current).visited = true;
        graph.mark_referer_edge(current);

        if current == end {
            self.open.clear();
            self.finished = true;
            self.found = true;
            log::debug!(
                "astar: reached goal {current} at cost {}",
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
            if tentative >= graph.state(node).distance_from_start {
                continue;
            }
            let h = graph.distance(node, end);
            let s = graph.state_mut(node);
            s.distance_from_start = tentative;
            s.distance_to_end = h;
            s.parent = Some(current);
            s.referer = Some(current);
            self.open.push(node, tentative + h);
            touched.push(node);
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

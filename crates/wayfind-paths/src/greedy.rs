use wayfind_core::{Adjacent, Graph, GraphResult, NodeIx};

use crate::frontier::{OpenList, Touched, trace_parents};
use crate::traits::Search;

/// Greedy best-first search: always expands the discovered node closest to
/// the goal in a straight line, ignoring the cost already travelled.
#[derive(Debug, Default)]
pub struct Greedy {
    open: OpenList,
    discovered: Vec<bool>,
    ends: Option<(NodeIx, NodeIx)>,
    finished: bool,
    found: bool,
    nbuf: Vec<Adjacent>,
}

impl Greedy {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Search for Greedy {
    fn start(&mut self, graph: &mut Graph, start: NodeIx, end: NodeIx) -> GraphResult<()> {
        graph.check(start)?;
        graph.check(end)?;
        self.open.clear();
        self.discovered.clear();
        self.discovered.resize(graph.len(), false);
        self.discovered[start.index()] = true;

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
        let (Some((_, end)), Some(r)) = (self.ends, self.open.pop()) else {
            self.finished = true;
            log::debug!("greedy: open list exhausted without reaching the goal");
            return Vec::new();
        };
        let current = r.node;

        graph.state_mut(current).visited = true;
        graph.mark_referer_edge(current);

        if current == end {
            self.open.clear();
            self.finished = true;
            self.found = true;
            log::debug!("greedy: reached goal {current}");
            return vec![current];
        }

        let mut touched = Touched::default();
        touched.push(current);
        let g = graph.state(current).distance_from_start;
        let mut nbuf = std::mem::take(&mut self.nbuf);
        nbuf.clear();
        nbuf.extend_from_slice(graph.neighbors(current));

        for &Adjacent { node, edge } in nbuf.iter() {
            if self.discovered[node.index()] {
                continue;
            }
            self.discovered[node.index()] = true;
            let h = graph.distance(node, end);
            let w = graph.edge(edge).weight();
            let s = graph.state_mut(node);
            s.parent = Some(current);
            s.referer = Some(current);
            s.distance_from_start = g + w;
            s.distance_to_end = h;
            self.open.push(node, h);
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

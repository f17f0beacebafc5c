use wayfind_core::{Adjacent, Graph, GraphResult, NodeIx};

use crate::bfs::{Expansion, expand_eager};
use crate::frontier::trace_parents;
use crate::traits::Search;

/// Depth-first search over a last-in-first-out stack.
///
/// Same expansion rules as [`Bfs`](crate::Bfs); no optimality guarantee.
#[derive(Debug, Default)]
pub struct Dfs {
    stack: Vec<NodeIx>,
    ends: Option<(NodeIx, NodeIx)>,
    finished: bool,
    found: bool,
    nbuf: Vec<Adjacent>,
}

impl Dfs {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Search for Dfs {
    fn start(&mut self, graph: &mut Graph, start: NodeIx, end: NodeIx) -> GraphResult<()> {
        graph.check(start)?;
        graph.check(end)?;
        self.stack.clear();
        self.stack.push(start);
        graph.state_mut(start).visited = true;
        self.ends = Some((start, end));
        self.finished = false;
        self.found = false;
        Ok(())
    }

    fn next_step(&mut self, graph: &mut Graph) -> Vec<NodeIx> {
        if self.finished {
            return Vec::new();
        }
        let (Some((_, end)), Some(current)) = (self.ends, self.stack.pop()) else {
            self.finished = true;
            log::debug!("dfs: stack exhausted without reaching the goal");
            return Vec::new();
        };

        let stack = &mut self.stack;
        match expand_eager(graph, &mut self.nbuf, current, end, |n| stack.push(n)) {
            Expansion::Goal => {
                self.stack.clear();
                self.finished = true;
                self.found = true;
                log::debug!("dfs: reached goal {current}");
                vec![current]
            }
            Expansion::Expanded(touched) => touched,
        }
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

use std::collections::VecDeque;

use wayfind_core::{Adjacent, Graph, GraphResult, NodeIx};

use crate::frontier::{Touched, trace_parents};
use crate::traits::Search;

/// Outcome of expanding one node of an eager-visitation traversal.
pub(crate) enum Expansion {
    /// The expanded node was the goal.
    Goal,
    /// Nodes touched while expanding.
    Expanded(Vec<NodeIx>),
}

/// Expand `current` the way BFS and DFS do: nodes are marked visited when
/// they are discovered, and an already-visited neighbour whose edge was never
/// drawn gets that edge marked and its referer moved to `current`.
///
/// `discover` receives each newly discovered neighbour in adjacency order.
pub(crate) fn expand_eager(
    graph: &mut Graph,
    nbuf: &mut Vec<Adjacent>,
    current: NodeIx,
    goal: NodeIx,
    mut discover: impl FnMut(NodeIx),
) -> Expansion {
    graph.state_mut(current).visited = true;
    graph.mark_referer_edge(current);

    if current == goal {
        return Expansion::Goal;
    }

    let mut touched = Touched::default();
    nbuf.clear();
    nbuf.extend_from_slice(graph.neighbors(current));

    for &Adjacent { node, edge } in nbuf.iter() {
        if graph.state(node).visited {
            if graph.mark_edge_visited(edge) {
                graph.state_mut(node).referer = Some(current);
                touched.push(node);
            }
            continue;
        }
        let s = graph.state_mut(node);
        s.visited = true;
        s.parent = Some(current);
        s.referer = Some(current);
        touched.push(node);
        discover(node);
    }

    touched.push(current);
    Expansion::Expanded(touched.into_vec())
}

/// Breadth-first search over a first-in-first-out queue.
///
/// Shortest by edge count only; edge weights are ignored.
#[derive(Debug, Default)]
pub struct Bfs {
    queue: VecDeque<NodeIx>,
    ends: Option<(NodeIx, NodeIx)>,
    finished: bool,
    found: bool,
    nbuf: Vec<Adjacent>,
}

impl Bfs {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Search for Bfs {
    fn start(&mut self, graph: &mut Graph, start: NodeIx, end: NodeIx) -> GraphResult<()> {
        graph.check(start)?;
        graph.check(end)?;
        self.queue.clear();
        self.queue.push_back(start);
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
        let (Some((_, end)), Some(current)) = (self.ends, self.queue.pop_front()) else {
            self.finished = true;
            log::debug!("bfs: frontier exhausted without reaching the goal");
            return Vec::new();
        };

        let queue = &mut self.queue;
        match expand_eager(graph, &mut self.nbuf, current, end, |n| queue.push_back(n)) {
            Expansion::Goal => {
                self.queue.clear();
                self.finished = true;
                self.found = true;
                log::debug!("bfs: reached goal {current}");
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{chain, disconnected, drive, grid, ix};

    #[test]
    fn chain_takes_four_expansions_then_goal_pop() {
        let mut g = chain(5);
        let (a, e) = (ix(&g, 1), ix(&g, 5));
        let mut bfs = Bfs::new();
        bfs.start(&mut g, a, e).unwrap();

        for _ in 0..4 {
            let touched = bfs.next_step(&mut g);
            assert!(touched.len() >= 2, "expansion discovers the next node");
            assert!(!bfs.is_finished());
        }
        assert_eq!(bfs.next_step(&mut g), vec![e]);
        assert!(bfs.is_finished());

        let path = bfs.path(&g).unwrap();
        assert_eq!(g.ids(&path), vec![1, 2, 3, 4, 5]);
        assert_eq!(g.path_cost(&path), Some(4.0));
    }

    #[test]
    fn eager_visitation_marks_discovered_nodes() {
        let mut g = chain(3);
        let [a, b, c] = [1, 2, 3].map(|id| ix(&g, id));
        let mut bfs = Bfs::new();
        bfs.start(&mut g, a, c).unwrap();
        assert!(g.state(a).visited);

        let touched = bfs.next_step(&mut g);
        assert_eq!(touched, vec![b, a]);
        assert!(g.state(b).visited);
        assert_eq!(g.state(b).parent, Some(a));
        assert_eq!(g.state(b).referer, Some(a));
    }

    #[test]
    fn back_fill_moves_referer_but_not_parent() {
        // 0 - 1
        // |   |
        // 2 - 3
        let mut g = grid(2, 2);
        let [n0, n1, n2, n3] = [0, 1, 2, 3].map(|id| ix(&g, id));
        let mut bfs = Bfs::new();
        bfs.start(&mut g, n0, n3).unwrap();

        assert_eq!(bfs.next_step(&mut g), vec![n1, n2, n0]);
        assert_eq!(bfs.next_step(&mut g), vec![n3, n1]);
        assert_eq!(g.state(n3).parent, Some(n1));

        // Expanding 2 finds 3 already visited over an undrawn edge.
        assert_eq!(bfs.next_step(&mut g), vec![n3, n2]);
        assert_eq!(g.state(n3).parent, Some(n1));
        assert_eq!(g.state(n3).referer, Some(n2));
        assert!(g.edge(g.edge_between(n2, n3).unwrap()).visited());

        assert_eq!(bfs.next_step(&mut g), vec![n3]);
        assert!(bfs.is_finished());
        assert_eq!(bfs.path(&g), Some(vec![n0, n1, n3]));
    }

    #[test]
    fn same_start_and_end() {
        let mut g = chain(2);
        let a = ix(&g, 1);
        let mut bfs = Bfs::new();
        bfs.start(&mut g, a, a).unwrap();
        assert_eq!(bfs.next_step(&mut g), vec![a]);
        assert!(bfs.is_finished());
        assert_eq!(bfs.path(&g), Some(vec![a]));
    }

    #[test]
    fn disconnected_exhausts_without_path() {
        let mut g = disconnected();
        let (a, z) = (ix(&g, 1), ix(&g, 10));
        let mut bfs = Bfs::new();
        bfs.start(&mut g, a, z).unwrap();
        drive(&mut bfs, &mut g);
        assert!(bfs.is_finished());
        assert_eq!(bfs.path(&g), None);
        assert!(bfs.next_step(&mut g).is_empty());
    }

    #[test]
    fn rejects_foreign_endpoints() {
        let mut g = chain(2);
        let a = ix(&g, 1);
        let mut bfs = Bfs::new();
        assert!(bfs.start(&mut g, a, NodeIx::new(99)).is_err());
        assert_eq!(g.visited_count(), 0);
    }
}

//! Bidirectional breadth-first search.
//!
//! One frontier grows from the start and one from the end, each labelling
//! nodes with its own hop count. Each call to
//! [`next_step`](Search::next_step) expands one node on the start side, then
//! one on the end side. An edge from a node to one labelled by the other side
//! is a meeting candidate of `depth_start + 1 + depth_end` hops and the
//! shortest is kept. The run finishes when either queue is empty or the depths
//! at the two queue fronts add up to at least that candidate, since any path
//! not yet seen must pass through both fronts.

use std::collections::VecDeque;

use wayfind_core::{Adjacent, Graph, GraphResult, NodeIx};

use crate::frontier::{Side, Touched, join_chains};
use crate::traits::Search;

/// Where the two frontiers touched: the last start-side node and the first
/// end-side node of the joined path. Equal when the run started and ended on
/// the same node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Meeting {
    start_half: NodeIx,
    end_half: NodeIx,
    node: NodeIx,
    hops: usize,
}

#[derive(Debug, Default)]
pub struct BidirectionalBfs {
    queues: [VecDeque<NodeIx>; 2],
    /// Hop count from each side's root, `None` until that side reaches it.
    depth: [Vec<Option<usize>>; 2],
    parents: [Vec<Option<NodeIx>>; 2],
    meeting: Option<Meeting>,
    finished: bool,
    nbuf: Vec<Adjacent>,
}

impl BidirectionalBfs {
    pub fn new() -> Self {
        Self::default()
    }

    /// The node at which the frontiers met. Before the run finishes this is
    /// the best meeting seen so far.
    pub fn meeting_node(&self) -> Option<NodeIx> {
        self.meeting.map(|m| m.node)
    }

    fn front_depth(&self, side: Side) -> Option<usize> {
        let &front = self.queues[side.idx()].front()?;
        self.depth[side.idx()][front.index()]
    }

    /// Whether no shorter meeting can appear.
    fn settled(&self) -> bool {
        let (Some(s), Some(e)) = (self.front_depth(Side::Start), self.front_depth(Side::End)) else {
            return true;
        };
        self.meeting.is_some_and(|m| s + e >= m.hops)
    }

    fn finish(&mut self) {
        self.finished = true;
        match self.meeting {
            Some(m) => log::debug!("bidirectional: frontiers met at {}, {} hops", m.node, m.hops),
            None => log::debug!("bidirectional: a frontier is exhausted, no path"),
        }
    }

    fn expand(&mut self, graph: &mut Graph, side: Side, current: NodeIx, touched: &mut Touched) {
        graph.mark_referer_edge(current);
        touched.push(current);

        let other = match side {
            Side::Start => Side::End,
            Side::End => Side::Start,
        };
        let Some(d) = self.depth[side.idx()][current.index()] else {
            return;
        };
        let mut nbuf = std::mem::take(&mut self.nbuf);
        nbuf.clear();
        nbuf.extend_from_slice(graph.neighbors(current));

        for &Adjacent { node, edge } in nbuf.iter() {
            let i = node.index();
            if self.depth[side.idx()][i].is_none() {
                self.depth[side.idx()][i] = Some(d + 1);
                self.parents[side.idx()][i] = Some(current);
                self.queues[side.idx()].push_back(node);
                if !graph.state(node).visited {
                    let s = graph.state_mut(node);
                    s.visited = true;
                    s.parent = Some(current);
                    s.referer = Some(current);
                    touched.push(node);
                }
            } else if self.depth[other.idx()][i].is_none() && graph.mark_edge_visited(edge) {
                graph.state_mut(node).referer = Some(current);
                touched.push(node);
            }

            let Some(od) = self.depth[other.idx()][i] else {
                continue;
            };
            if graph.mark_edge_visited(edge) {
                touched.push(node);
            }
            let hops = d + 1 + od;
            if self.meeting.is_some_and(|m| m.hops <= hops) {
                continue;
            }
            let (start_half, end_half) = match side {
                Side::Start => (current, node),
                Side::End => (node, current),
            };
            self.meeting = Some(Meeting {
                start_half,
                end_half,
                node,
                hops,
            });
        }

        self.nbuf = nbuf;
    }
}

impl Search for BidirectionalBfs {
    fn start(&mut self, graph: &mut Graph, start: NodeIx, end: NodeIx) -> GraphResult<()> {
        graph.check(start)?;
        graph.check(end)?;
        let n = graph.len();
        for side in Side::BOTH {
            self.queues[side.idx()].clear();
            self.depth[side.idx()].clear();
            self.depth[side.idx()].resize(n, None);
            self.parents[side.idx()].clear();
            self.parents[side.idx()].resize(n, None);
        }
        self.meeting = None;
        self.finished = false;

        graph.state_mut(start).visited = true;
        graph.state_mut(end).visited = true;

        if start == end {
            self.meeting = Some(Meeting {
                start_half: start,
                end_half: end,
                node: start,
                hops: 0,
            });
            self.finished = true;
            return Ok(());
        }

        for (side, root) in [(Side::Start, start), (Side::End, end)] {
            self.depth[side.idx()][root.index()] = Some(0);
            self.queues[side.idx()].push_back(root);
        }
        Ok(())
    }

    fn next_step(&mut self, graph: &mut Graph) -> Vec<NodeIx> {
        if self.finished {
            return Vec::new();
        }
        let mut touched = Touched::default();
        for side in Side::BOTH {
            if self.settled() {
                break;
            }
            if let Some(current) = self.queues[side.idx()].pop_front() {
                self.expand(graph, side, current, &mut touched);
            }
        }
        if self.settled() {
            self.finish();
        }
        touched.into_vec()
    }

    fn is_finished(&self) -> bool {
        self.finished
    }

    fn path(&self, _graph: &Graph) -> Option<Vec<NodeIx>> {
        if !self.finished {
            return None;
        }
        let m = self.meeting?;
        Some(join_chains(&self.parents, m.start_half, m.end_half))
    }
}

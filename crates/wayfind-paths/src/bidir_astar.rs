//! Bidirectional A*.
//!
//! Each side keeps its own open list, g table, predecessor table and closed
//! set, with the heuristic aimed at the opposite endpoint. The graph's
//! [`SearchState`](wayfind_core::SearchState) is written for rendering only and
//! never read back for costs, so the two sides cannot overwrite each other's
//! predecessors.
//!
//! The frontiers meet as soon as a node has a finite g on both sides. The run
//! keeps the cheapest such node and finishes once either side's smallest key
//! reaches that joined cost, at which point no cheaper meeting can exist.

use std::sync::Arc;

use wayfind_core::{Adjacent, EdgeIx, Graph, GraphResult, NodeIx};

use crate::frontier::{OpenList, Side, Touched, join_chains};
use crate::hubs::HubIndex;
use crate::traits::Search;

/// Edge-weight adjustment from precomputed hub routes.
///
/// A neighbour with a stored route to the side's target gets the weight
/// `min(w, route.distance * discount)`. This can undercut the true distance,
/// so runs using it are not guaranteed to return a shortest path.
#[derive(Clone, Debug)]
pub struct Shortcuts {
    index: Arc<HubIndex>,
    discount: f64,
}

impl Shortcuts {
    pub fn new(index: Arc<HubIndex>, discount: f64) -> Self {
        Self { index, discount }
    }

    #[inline]
    pub fn index(&self) -> &Arc<HubIndex> {
        &self.index
    }

    #[inline]
    pub fn discount(&self) -> f64 {
        self.discount
    }

    fn weight(&self, neighbor: NodeIx, target: NodeIx, w: f64) -> f64 {
        match self.index.route(neighbor, target) {
            Some(route) => w.min(route.distance * self.discount),
            None => w,
        }
    }
}

#[derive(Debug, Default)]
struct Frontier {
    open: OpenList,
    g: Vec<f64>,
    closed: Vec<bool>,
}

impl Frontier {
    fn reset(&mut self, n: usize) {
        self.open.clear();
        self.g.clear();
        self.g.resize(n, f64::INFINITY);
        self.closed.clear();
        self.closed.resize(n, false);
    }
}

#[derive(Clone, Copy, Debug)]
struct Meeting {
    node: NodeIx,
    cost: f64,
}

enum Turn {
    Expanded,
    Done,
}

#[derive(Debug, Default)]
pub struct BidirectionalAStar {
    sides: [Frontier; 2],
    parents: [Vec<Option<NodeIx>>; 2],
    ends: Option<(NodeIx, NodeIx)>,
    best: Option<Meeting>,
    finished: bool,
    shortcuts: Option<Shortcuts>,
    nbuf: Vec<Adjacent>,
}

impl BidirectionalAStar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bidirectional A* whose edge weights are discounted by `shortcuts`.
    pub fn with_shortcuts(shortcuts: Shortcuts) -> Self {
        Self {
            shortcuts: Some(shortcuts),
            ..Self::default()
        }
    }

    /// The node at which the frontiers met. Before the run finishes this is
    /// the best meeting seen so far.
    pub fn meeting_node(&self) -> Option<NodeIx> {
        self.best.map(|m| m.node)
    }

    #[inline]
    fn target(&self, side: Side) -> Option<NodeIx> {
        let (start, end) = self.ends?;
        Some(match side {
            Side::Start => end,
            Side::End => start,
        })
    }

    #[inline]
    fn bound(&self) -> f64 {
        self.best.map_or(f64::INFINITY, |m| m.cost)
    }

    fn seed(&mut self, graph: &mut Graph, side: Side, root: NodeIx, target: NodeIx) {
        let h = graph.distance(root, target);
        let f = &mut self.sides[side.idx()];
        f.g[root.index()] = 0.0;
        f.open.push(root, h);
        let s = graph.state_mut(root);
        s.distance_from_start = 0.0;
        s.distance_to_end = h;
    }

    /// Pop the next live entry of `side` as `(node, key)`.
    fn pop_best(&mut self, graph: &Graph, side: Side, target: NodeIx) -> Option<(NodeIx, f64)> {
        let f = &mut self.sides[side.idx()];
        while let Some(r) = f.open.pop() {
            let i = r.node.index();
            if f.closed[i] || r.key > f.g[i] + graph.distance(r.node, target) {
                continue;
            }
            return Some((r.node, r.key));
        }
        None
    }

    fn finish(&mut self, graph: &mut Graph, touched: &mut Touched) {
        self.finished = true;
        let Some(Meeting { node, cost }) = self.best else {
            log::debug!("bidirectional-astar: frontier exhausted, no path");
            return;
        };
        graph.state_mut(node).visited = true;
        for side in Side::BOTH {
            if let Some(e) = self.parents[side.idx()][node.index()]
                .and_then(|p| graph.edge_between(node, p))
            {
                graph.mark_edge_visited(e);
            }
        }
        touched.push(node);
        log::debug!("bidirectional-astar: frontiers met at {node}, cost {cost}");
    }

    fn turn(&mut self, graph: &mut Graph, side: Side, touched: &mut Touched) -> Turn {
        let Some(target) = self.target(side) else {
            return Turn::Done;
        };
        let Some((current, key)) = self.pop_best(graph, side, target) else {
            return Turn::Done;
        };
        if key >= self.bound() {
            return Turn::Done;
        }
        let other = match side {
            Side::Start => Side::End,
            Side::End => Side::Start,
        };

        self.sides[side.idx()].closed[current.index()] = true;
        graph.state_mut(current).visited = true;
        graph.mark_referer_edge(current);
        touched.push(current);

        let g = self.sides[side.idx()].g[current.index()];
        let mut nbuf = std::mem::take(&mut self.nbuf);
        nbuf.clear();
        nbuf.extend_from_slice(graph.neighbors(current));

        for &Adjacent { node, edge } in nbuf.iter() {
            back_fill(graph, current, node, edge, touched);
            let i = node.index();
            if self.sides[side.idx()].closed[i] {
                continue;
            }
            let mut w = graph.edge(edge).weight();
            if let Some(sc) = &self.shortcuts {
                w = sc.weight(node, target, w);
            }
            let tentative = g + w;
            if tentative >= self.sides[side.idx()].g[i] {
                continue;
            }
            let h = graph.distance(node, target);
            let f = &mut self.sides[side.idx()];
            f.g[i] = tentative;
            f.open.push(node, tentative + h);
            self.parents[side.idx()][i] = Some(current);

            let s = graph.state_mut(node);
            s.parent = Some(current);
            s.referer = Some(current);
            s.distance_from_start = tentative;
            s.distance_to_end = h;
            touched.push(node);

            let joined = tentative + self.sides[other.idx()].g[i];
            if joined < self.bound() {
                self.best = Some(Meeting { node, cost: joined });
            }
        }

        self.nbuf = nbuf;
        Turn::Expanded
    }
}

/// Mark the edge to an already visited neighbour as explored. Rendering only:
/// costs and predecessors are left alone.
fn back_fill(graph: &mut Graph, current: NodeIx, node: NodeIx, edge: EdgeIx, touched: &mut Touched) {
    if graph.state(node).visited && graph.mark_edge_visited(edge) {
        graph.state_mut(node).referer = Some(current);
        touched.push(node);
    }
}

impl Search for BidirectionalAStar {
    fn start(&mut self, graph: &mut Graph, start: NodeIx, end: NodeIx) -> GraphResult<()> {
        graph.check(start)?;
        graph.check(end)?;
        let n = graph.len();
        for side in Side::BOTH {
            self.sides[side.idx()].reset(n);
            self.parents[side.idx()].clear();
            self.parents[side.idx()].resize(n, None);
        }
        self.ends = Some((start, end));
        self.best = None;
        self.finished = false;

        if start == end {
            graph.state_mut(start).visited = true;
            self.best = Some(Meeting {
                node: start,
                cost: 0.0,
            });
            self.finished = true;
            return Ok(());
        }

        self.seed(graph, Side::Start, start, end);
        self.seed(graph, Side::End, end, start);
        log::debug!(
            "bidirectional-astar: {start} -> {end}{}",
            if self.shortcuts.is_some() { " with shortcuts" } else { "" }
        );
        Ok(())
    }

    fn next_step(&mut self, graph: &mut Graph) -> Vec<NodeIx> {
        if self.finished {
            return Vec::new();
        }
        let mut touched = Touched::default();
        for side in Side::BOTH {
            if let Turn::Done = self.turn(graph, side, &mut touched) {
                self.finish(graph, &mut touched);
                break;
            }
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
        let m = self.best?;
        Some(join_chains(&self.parents, m.node, m.node))
    }
}

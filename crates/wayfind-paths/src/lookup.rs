//! Bidirectional A* assisted by a [`HubIndex`].
//!
//! When the index already knows a route between the endpoints, or between
//! their nearest hubs, the run replays that route one edge per step instead
//! of searching. Otherwise it falls back to [`BidirectionalAStar`] with
//! hub-route discounts on edge weights.

use std::sync::Arc;

use wayfind_core::{Graph, GraphResult, NodeIx};

use crate::bidir_astar::{BidirectionalAStar, Shortcuts};
use crate::dijkstra::shortest_path_tree;
use crate::frontier::Touched;
use crate::hubs::HubIndex;
use crate::traits::Search;

/// Multiplier applied to hub-route distances when they undercut an edge.
pub const DEFAULT_DISCOUNT: f64 = 0.8;

/// How a lookup run obtained its path.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LookupKind {
    /// Both endpoints are hubs with a stored route between them.
    Direct,
    /// Local legs to and from the endpoints' nearest hubs, joined by the
    /// stored route between those hubs.
    ViaHubs { start_hub: NodeIx, end_hub: NodeIx },
    /// No usable route; a discounted bidirectional search.
    Search,
}

#[derive(Debug)]
struct Replay {
    path: Vec<NodeIx>,
    cursor: usize,
    finished: bool,
}

#[derive(Debug)]
pub struct BidirectionalAStarLookup {
    index: Arc<HubIndex>,
    search: BidirectionalAStar,
    replay: Option<Replay>,
    kind: Option<LookupKind>,
}

impl BidirectionalAStarLookup {
    pub fn new(index: Arc<HubIndex>) -> Self {
        Self::with_discount(index, DEFAULT_DISCOUNT)
    }

    pub fn with_discount(index: Arc<HubIndex>, discount: f64) -> Self {
        let search = BidirectionalAStar::with_shortcuts(Shortcuts::new(Arc::clone(&index), discount));
        Self {
            index,
            search,
            replay: None,
            kind: None,
        }
    }

    #[inline]
    pub fn index(&self) -> &Arc<HubIndex> {
        &self.index
    }

    /// Which lookup case the current run took, once started.
    #[inline]
    pub fn kind(&self) -> Option<LookupKind> {
        self.kind
    }

    /// Meeting node of the fallback search, if that is what ran.
    pub fn meeting_node(&self) -> Option<NodeIx> {
        match self.kind {
            Some(LookupKind::Search) => self.search.meeting_node(),
            _ => None,
        }
    }

    fn plan(&self, graph: &Graph, start: NodeIx, end: NodeIx) -> Option<(LookupKind, Vec<NodeIx>)> {
        if let Some(route) = self.index.route(start, end) {
            return Some((LookupKind::Direct, route.oriented_from(start)));
        }

        let start_hub = self.index.nearest_hub(graph.coord(start))?;
        let end_hub = self.index.nearest_hub(graph.coord(end))?;
        if start_hub == end_hub {
            return None;
        }
        let route = self.index.route(start_hub, end_hub)?;

        let Some(head) = shortest_path_tree(graph, start).path_to(start_hub) else {
            log::warn!("lookup: nearest hub {start_hub} unreachable from {start}");
            return None;
        };
        let Some(mut tail) = shortest_path_tree(graph, end).path_to(end_hub) else {
            log::warn!("lookup: nearest hub {end_hub} unreachable from {end}");
            return None;
        };
        tail.reverse();

        let mut path = head;
        path.extend(route.oriented_from(start_hub).into_iter().skip(1));
        path.extend(tail.into_iter().skip(1));
        Some((LookupKind::ViaHubs { start_hub, end_hub }, path))
    }

    fn replay_step(graph: &mut Graph, replay: &mut Replay) -> Vec<NodeIx> {
        let Some(&[from, to]) = replay.path.get(replay.cursor..replay.cursor + 2) else {
            replay.finished = true;
            return Vec::new();
        };
        let mut touched = Touched::default();
        if !graph.state(from).visited {
            graph.state_mut(from).visited = true;
            touched.push(from);
        }

        let (edge, w) = match graph.edge_between(from, to) {
            Some(e) => (Some(e), graph.edge(e).weight()),
            None => (None, graph.distance(from, to)),
        };
        if let Some(e) = edge {
            graph.mark_edge_visited(e);
        }
        let g = graph.state(from).distance_from_start + w;
        let s = graph.state_mut(to);
        s.visited = true;
        s.parent = Some(from);
        s.referer = Some(from);
        s.distance_from_start = g;
        touched.push(to);

        replay.cursor += 1;
        if replay.cursor + 1 >= replay.path.len() {
            replay.finished = true;
        }
        touched.into_vec()
    }
}

impl Search for BidirectionalAStarLookup {
    fn start(&mut self, graph: &mut Graph, start: NodeIx, end: NodeIx) -> GraphResult<()> {
        graph.check(start)?;
        graph.check(end)?;
        self.replay = None;

        if start != end {
            if let Some((kind, path)) = self.plan(graph, start, end) {
                log::debug!(
                    "lookup: replaying {kind:?} route of {} nodes from {start} to {end}",
                    path.len()
                );
                let h = graph.distance(start, end);
                let s = graph.state_mut(start);
                s.distance_from_start = 0.0;
                s.distance_to_end = h;
                self.kind = Some(kind);
                self.replay = Some(Replay {
                    finished: path.len() < 2,
                    path,
                    cursor: 0,
                });
                return Ok(());
            }
        }

        if self.index.is_empty() {
            log::warn!("lookup: hub index is empty, searching without shortcuts");
        }
        self.kind = Some(LookupKind::Search);
        self.search.start(graph, start, end)
    }

    fn next_step(&mut self, graph: &mut Graph) -> Vec<NodeIx> {
        match &mut self.replay {
            Some(replay) if replay.finished => Vec::new(),
            Some(replay) => Self::replay_step(graph, replay),
            None => self.search.next_step(graph),
        }
    }

    fn is_finished(&self) -> bool {
        match &self.replay {
            Some(replay) => replay.finished,
            None => self.search.is_finished(),
        }
    }

    fn path(&self, graph: &Graph) -> Option<Vec<NodeIx>> {
        match &self.replay {
            Some(replay) if replay.finished => Some(replay.path.clone()),
            Some(_) => None,
            None => self.search.path(graph),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hubs::HubConfig;
    use crate::testutil::{chain, drive, grid, ix};
    use wayfind_core::GraphBuilder;

    fn indexed(g: &Graph) -> Arc<HubIndex> {
        Arc::new(HubIndex::build(g, &HubConfig::default()))
    }

    #[test]
    fn direct_route_is_replayed_edge_by_edge() {
        let mut g = grid(3, 3);
        let [n1, n4, n7] = [1, 4, 7].map(|id| ix(&g, id));
        let mut lookup = BidirectionalAStarLookup::new(indexed(&g));
        lookup.start(&mut g, n7, n1).unwrap();
        assert_eq!(lookup.kind(), Some(LookupKind::Direct));

        assert_eq!(lookup.next_step(&mut g), vec![n7, n4]);
        assert!(!lookup.is_finished());
        assert_eq!(lookup.path(&g), None);
        assert_eq!(lookup.next_step(&mut g), vec![n1]);
        assert!(lookup.is_finished());
        assert!(lookup.next_step(&mut g).is_empty());

        // Oriented from the query's start even though the route is stored 1 -> 7.
        assert_eq!(lookup.path(&g), Some(vec![n7, n4, n1]));
        assert_eq!(g.state(n1).parent, Some(n4));
        assert_eq!(g.state(n1).distance_from_start, 2.0);
        assert!(g.referer_edge_visited(n1));
        assert_eq!(g.visited_count(), 3);
    }

    #[test]
    fn composite_route_through_nearest_hubs() {
        let mut g = grid(3, 3);
        let (a, z) = (ix(&g, 0), ix(&g, 8));
        let mut lookup = BidirectionalAStarLookup::new(indexed(&g));
        lookup.start(&mut g, a, z).unwrap();
        assert_eq!(
            lookup.kind(),
            Some(LookupKind::ViaHubs {
                start_hub: ix(&g, 1),
                end_hub: ix(&g, 5),
            })
        );
        let steps = drive(&mut lookup, &mut g);
        assert_eq!(steps, 4);
        let path = lookup.path(&g).unwrap();
        assert_eq!(g.ids(&path), vec![0, 1, 2, 5, 8]);
        assert_eq!(g.path_cost(&path), Some(4.0));
    }

    #[test]
    fn shared_nearest_hub_falls_back_to_search() {
        let mut g = grid(3, 3);
        let (a, z) = (ix(&g, 0), ix(&g, 2));
        let mut lookup = BidirectionalAStarLookup::new(indexed(&g));
        lookup.start(&mut g, a, z).unwrap();
        assert_eq!(lookup.kind(), Some(LookupKind::Search));
        drive(&mut lookup, &mut g);
        let path = lookup.path(&g).unwrap();
        assert_eq!(g.ids(&path), vec![0, 1, 2]);
    }

    #[test]
    fn unreachable_hub_leg_rejects_the_composite() {
        // Square 1..4 with pendants 5 (off hub 1) and 6 (off hub 3), plus a
        // separate pair 10 - 11 sitting right next to hub 3.
        let mut b = GraphBuilder::new();
        for (id, lon, lat) in [
            (1, 0.0, 0.0),
            (2, 1.0, 0.0),
            (3, 1.0, 1.0),
            (4, 0.0, 1.0),
            (5, -1.0, 0.0),
            (6, 2.0, 1.0),
            (10, 1.1, 1.1),
            (11, 1.2, 1.2),
        ] {
            b.add_node(id, lon, lat).unwrap();
        }
        for (x, y) in [(1, 2), (2, 3), (3, 4), (4, 1), (1, 5), (3, 6), (10, 11)] {
            b.add_edge(x, y, None).unwrap();
        }
        let mut g = b.build();
        let index = indexed(&g);
        assert!(index.route(ix(&g, 1), ix(&g, 3)).is_some());

        let (a, z) = (ix(&g, 5), ix(&g, 11));
        let mut lookup = BidirectionalAStarLookup::new(index);
        lookup.start(&mut g, a, z).unwrap();
        assert_eq!(lookup.kind(), Some(LookupKind::Search));
        drive(&mut lookup, &mut g);
        assert_eq!(lookup.path(&g), None);
    }

    #[test]
    fn tiny_graph_behaves_like_plain_bidirectional_astar() {
        let mut g = chain(3);
        let (a, z) = (ix(&g, 1), ix(&g, 3));
        let index = indexed(&g);
        assert!(index.is_empty());

        let mut plain = BidirectionalAStar::new();
        plain.start(&mut g, a, z).unwrap();
        let mut expected = Vec::new();
        while !plain.is_finished() {
            expected.push(plain.next_step(&mut g));
        }
        let expected_path = plain.path(&g);

        g.reset();
        let mut lookup = BidirectionalAStarLookup::new(index);
        lookup.start(&mut g, a, z).unwrap();
        let mut got = Vec::new();
        while !lookup.is_finished() {
            got.push(lookup.next_step(&mut g));
        }
        assert_eq!(got, expected);
        assert_eq!(lookup.path(&g), expected_path);
        assert_eq!(lookup.meeting_node(), plain.meeting_node());
    }

    #[test]
    fn same_endpoint_uses_the_trivial_search() {
        let mut g = grid(3, 3);
        let a = ix(&g, 4);
        let mut lookup = BidirectionalAStarLookup::new(indexed(&g));
        lookup.start(&mut g, a, a).unwrap();
        assert!(lookup.is_finished());
        assert_eq!(lookup.path(&g), Some(vec![a]));
    }
}

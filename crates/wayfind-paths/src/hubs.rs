//! Hub index: precomputed shortest routes between well-connected nodes.
//!
//! A *hub* is a node with at least [`HubConfig::min_degree`] incident edges,
//! one of which spans more than [`HubConfig::min_span`]. For every unordered
//! pair of hubs the index stores the shortest path between them, provided it
//! passes through at least one intermediate node. The lookup-assisted
//! bidirectional search replays these routes directly or uses them to
//! discount edge weights.
//!
//! An index is immutable once built. Share it behind an [`Arc`](std::sync::Arc)
//! and build a new one when the graph or region changes.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::fmt;

use wayfind_core::{Coord, Graph, NodeId, NodeIx, euclidean, haversine_km};

use crate::dijkstra::shortest_path_tree;

/// Graphs smaller than this never produce hubs.
const MIN_NODES: usize = 4;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Hub selection thresholds.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HubConfig {
    /// Minimum number of incident edges.
    pub min_degree: usize,
    /// A hub's longest incident edge must be strictly longer than this, in
    /// coordinate units.
    pub min_span: f64,
    /// Upper bound on the number of nodes collected for a radius-limited
    /// region.
    pub region_node_cap: usize,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            min_degree: 3,
            min_span: 0.01,
            region_node_cap: 10_000,
        }
    }
}

// ---------------------------------------------------------------------------
// Routes
// ---------------------------------------------------------------------------

/// Unordered pair of node ids, smaller id first. Displays as `"a-b"`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RouteKey {
    lo: NodeId,
    hi: NodeId,
}

impl RouteKey {
    #[inline]
    pub fn new(a: NodeId, b: NodeId) -> Self {
        if a <= b {
            Self { lo: a, hi: b }
        } else {
            Self { lo: b, hi: a }
        }
    }

    #[inline]
    pub fn ids(self) -> (NodeId, NodeId) {
        (self.lo, self.hi)
    }
}

impl fmt::Display for RouteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.lo, self.hi)
    }
}

/// A stored hub-to-hub shortest path.
#[derive(Clone, Debug, PartialEq)]
pub struct Route {
    /// `start_hub ..= end_hub`.
    pub path: Vec<NodeIx>,
    /// Sum of the edge weights along `path`.
    pub distance: f64,
    pub start_hub: NodeIx,
    pub end_hub: NodeIx,
}

impl Route {
    /// The path walked from `from`, which should be one of the two hubs.
    pub fn oriented_from(&self, from: NodeIx) -> Vec<NodeIx> {
        if from == self.end_hub && from != self.start_hub {
            self.path.iter().rev().copied().collect()
        } else {
            self.path.clone()
        }
    }
}

// ---------------------------------------------------------------------------
// Stats
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RouteSummary {
    pub key: RouteKey,
    pub distance: f64,
    pub path_len: usize,
}

/// Summary of an index for display.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HubStats {
    pub hubs: usize,
    pub routes: usize,
    /// One entry per stored route, ordered by key.
    pub entries: Vec<RouteSummary>,
}

// ---------------------------------------------------------------------------
// HubIndex
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, Default)]
pub struct HubIndex {
    /// Hub handles in arena order, with their ids and coordinates.
    hubs: Vec<(NodeIx, NodeId, Coord)>,
    ids: HashMap<NodeIx, NodeId>,
    routes: BTreeMap<RouteKey, Route>,
}

impl HubIndex {
    /// An index with no hubs and no routes.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Index the whole graph.
    pub fn build(graph: &Graph, config: &HubConfig) -> Self {
        Self::build_in(graph, config, None)
    }

    /// Index only the hubs found within `radius_km` (great-circle) of
    /// `anchor` and reachable from it through nodes inside that radius.
    ///
    /// At most [`HubConfig::region_node_cap`] nodes are collected,
    /// breadth-first from the anchor. Routes between the selected hubs may
    /// still leave the region.
    pub fn build_around(graph: &Graph, config: &HubConfig, anchor: NodeIx, radius_km: f64) -> Self {
        if !graph.contains(anchor) {
            log::warn!("hub index: anchor {anchor} is not in the graph");
            return Self::empty();
        }
        let region = region(graph, anchor, radius_km, config.region_node_cap);
        Self::build_in(graph, config, Some(&region))
    }

    fn build_in(graph: &Graph, config: &HubConfig, region: Option<&[bool]>) -> Self {
        let mut index = Self::empty();
        if graph.len() < MIN_NODES {
            log::debug!("hub index: graph has {} nodes, no hubs", graph.len());
            return index;
        }

        for ix in graph.node_indices() {
            if region.is_some_and(|r| !r[ix.index()]) {
                continue;
            }
            if is_hub(graph, config, ix) {
                let id = graph.id(ix);
                index.hubs.push((ix, id, graph.coord(ix)));
                index.ids.insert(ix, id);
            }
        }

        for (i, &(from, from_id, _)) in index.hubs.iter().enumerate() {
            let tree = shortest_path_tree(graph, from);
            for &(to, to_id, _) in &index.hubs[i + 1..] {
                let Some(path) = tree.path_to(to) else {
                    continue;
                };
                if path.len() <= 2 {
                    continue;
                }
                let Some(distance) = tree.distance(to) else {
                    continue;
                };
                index.routes.insert(
                    RouteKey::new(from_id, to_id),
                    Route {
                        path,
                        distance,
                        start_hub: from,
                        end_hub: to,
                    },
                );
            }
        }

        log::debug!(
            "hub index: {} hubs, {} routes",
            index.hubs.len(),
            index.routes.len()
        );
        index
    }

    #[inline]
    pub fn is_hub(&self, ix: NodeIx) -> bool {
        self.ids.contains_key(&ix)
    }

    /// Hub handles in arena order.
    pub fn hubs(&self) -> impl Iterator<Item = NodeIx> + '_ {
        self.hubs.iter().map(|&(ix, _, _)| ix)
    }

    #[inline]
    pub fn hub_count(&self) -> usize {
        self.hubs.len()
    }

    #[inline]
    pub fn route_count(&self) -> usize {
        self.routes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.hubs.is_empty()
    }

    /// Every stored route, ordered by key.
    pub fn routes(&self) -> impl Iterator<Item = (&RouteKey, &Route)> + '_ {
        self.routes.iter()
    }

    /// The stored route between two nodes, in either order. Only hub pairs
    /// can have one.
    pub fn route(&self, a: NodeIx, b: NodeIx) -> Option<&Route> {
        let (&a, &b) = (self.ids.get(&a)?, self.ids.get(&b)?);
        self.routes.get(&RouteKey::new(a, b))
    }

    pub fn route_by_id(&self, a: NodeId, b: NodeId) -> Option<&Route> {
        self.routes.get(&RouteKey::new(a, b))
    }

    /// The hub closest to `coord` in a straight line. Ties go to the hub
    /// earliest in arena order.
    pub fn nearest_hub(&self, coord: Coord) -> Option<NodeIx> {
        let mut best: Option<(NodeIx, f64)> = None;
        for &(ix, _, c) in &self.hubs {
            let d = euclidean(coord, c);
            if best.is_none_or(|(_, bd)| d < bd) {
                best = Some((ix, d));
            }
        }
        best.map(|(ix, _)| ix)
    }

    pub fn stats(&self) -> HubStats {
        HubStats {
            hubs: self.hubs.len(),
            routes: self.routes.len(),
            entries: self
                .routes
                .iter()
                .map(|(&key, r)| RouteSummary {
                    key,
                    distance: r.distance,
                    path_len: r.path.len(),
                })
                .collect(),
        }
    }
}

fn is_hub(graph: &Graph, config: &HubConfig, ix: NodeIx) -> bool {
    let node = graph.node(ix);
    if node.degree() < config.min_degree {
        return false;
    }
    let span = node
        .neighbors()
        .iter()
        .map(|adj| graph.distance(ix, adj.node))
        .fold(0.0, f64::max);
    span > config.min_span
}

/// Nodes within `radius_km` of `anchor`, collected breadth-first through
/// in-radius nodes only, at most `cap` of them.
fn region(graph: &Graph, anchor: NodeIx, radius_km: f64, cap: usize) -> Vec<bool> {
    let origin = graph.coord(anchor);
    let mut inside = vec![false; graph.len()];
    let mut seen = vec![false; graph.len()];
    let mut queue = VecDeque::from([anchor]);
    seen[anchor.index()] = true;
    let mut taken = 0;

    while let Some(current) = queue.pop_front() {
        if taken >= cap {
            break;
        }
        inside[current.index()] = true;
        taken += 1;
        for adj in graph.neighbors(current) {
            let n = adj.node;
            if seen[n.index()] {
                continue;
            }
            seen[n.index()] = true;
            if haversine_km(origin, graph.coord(n)) <= radius_km {
                queue.push_back(n);
            }
        }
    }

    log::trace!("hub region around {anchor}: {taken} nodes within {radius_km} km");
    inside
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{chain, grid, ix, random_graph};
    use wayfind_core::GraphBuilder;

    // 0 - 1 - 2
    // |   |   |
    // 3 - 4 - 5
    // |   |   |
    // 6 - 7 - 8
    fn grid3() -> Graph {
        grid(3, 3)
    }

    #[test]
    fn corners_are_not_hubs() {
        let g = grid3();
        let idx = HubIndex::build(&g, &HubConfig::default());
        let hubs: Vec<_> = g.ids(&idx.hubs().collect::<Vec<_>>());
        assert_eq!(hubs, vec![1, 3, 4, 5, 7]);
        assert!(!idx.is_hub(ix(&g, 0)));
        assert!(idx.is_hub(ix(&g, 4)));
    }

    #[test]
    fn adjacent_hubs_have_no_route() {
        let g = grid3();
        let idx = HubIndex::build(&g, &HubConfig::default());
        assert!(idx.route(ix(&g, 1), ix(&g, 4)).is_none());
        // Ten hub pairs, four of them adjacent.
        assert_eq!(idx.route_count(), 6);
    }

    #[test]
    fn routes_are_symmetric_shortest_paths() {
        let g = random_graph(11, 40, 40, true);
        let idx = HubIndex::build(&g, &HubConfig::default());
        assert!(idx.hub_count() > 1);
        let hubs: Vec<_> = idx.hubs().collect();
        for &a in &hubs {
            let tree = shortest_path_tree(&g, a);
            for &b in &hubs {
                assert_eq!(idx.route(a, b), idx.route(b, a));
                if let Some(r) = idx.route(a, b) {
                    assert!((r.distance - tree.distance(b).unwrap()).abs() < 1e-9);
                    assert!((g.path_cost(&r.path).unwrap() - r.distance).abs() < 1e-9);
                    let walked = r.oriented_from(a);
                    assert_eq!(walked.first(), Some(&a));
                    assert_eq!(walked.last(), Some(&b));
                }
            }
        }
    }

    #[test]
    fn lookup_by_id_uses_canonical_key() {
        let g = grid3();
        let idx = HubIndex::build(&g, &HubConfig::default());
        let r = idx.route_by_id(7, 1).unwrap();
        assert_eq!(idx.route_by_id(1, 7), Some(r));
        assert_eq!(g.ids(&r.oriented_from(ix(&g, 1))), vec![1, 4, 7]);
        assert_eq!(RouteKey::new(7, 1).to_string(), "1-7");
        assert_eq!(RouteKey::new(7, 1).ids(), (1, 7));
    }

    #[test]
    fn small_or_sparse_graphs_have_no_hubs() {
        let mut b = GraphBuilder::new();
        b.add_node(1, 0.0, 0.0).unwrap();
        b.add_node(2, 1.0, 0.0).unwrap();
        b.add_node(3, 0.0, 1.0).unwrap();
        b.add_edge(1, 2, None).unwrap();
        b.add_edge(1, 2, Some(3.0)).unwrap();
        b.add_edge(1, 3, None).unwrap();
        let tiny = b.build();
        let idx = HubIndex::build(&tiny, &HubConfig::default());
        assert!(idx.is_empty());
        assert_eq!(idx.route_count(), 0);
        assert_eq!(idx.nearest_hub(Coord::ZERO), None);

        let line = chain(10);
        let idx = HubIndex::build(&line, &HubConfig::default());
        assert_eq!((idx.hub_count(), idx.route_count()), (0, 0));
        assert_eq!(idx.stats(), HubStats::default());
    }

    #[test]
    fn short_edges_do_not_make_hubs() {
        let mut b = GraphBuilder::new();
        b.add_node(1, 0.0, 0.0).unwrap();
        for (id, lon) in [(2, 0.001), (3, -0.001), (4, 0.002)] {
            b.add_node(id, lon, 0.0).unwrap();
            b.add_edge(1, id, None).unwrap();
        }
        let g = b.build();
        assert!(HubIndex::build(&g, &HubConfig::default()).is_empty());
        let loose = HubConfig {
            min_span: 0.0,
            ..HubConfig::default()
        };
        assert_eq!(HubIndex::build(&g, &loose).hub_count(), 1);
    }

    #[test]
    fn nearest_hub_by_straight_line() {
        let g = grid3();
        let idx = HubIndex::build(&g, &HubConfig::default());
        assert_eq!(idx.nearest_hub(Coord::new(2.2, 1.1)), Some(ix(&g, 5)));
        // Corner 0 is equally close to 1 and 3; arena order wins.
        assert_eq!(idx.nearest_hub(g.coord(ix(&g, 0))), Some(ix(&g, 1)));
    }

    #[test]
    fn radius_limits_the_region() {
        // Unit spacing is one degree, about 111 km.
        let g = grid3();
        let idx = HubIndex::build_around(&g, &HubConfig::default(), ix(&g, 0), 120.0);
        assert_eq!(g.ids(&idx.hubs().collect::<Vec<_>>()), vec![1, 3]);
        assert_eq!(idx.route_count(), 1);
        let r = idx.route(ix(&g, 3), ix(&g, 1)).unwrap();
        assert_eq!(r.path.len(), 3);
    }

    #[test]
    fn region_cap_stops_collection() {
        let g = grid3();
        let config = HubConfig {
            region_node_cap: 2,
            ..HubConfig::default()
        };
        let idx = HubIndex::build_around(&g, &config, ix(&g, 0), 1000.0);
        // Breadth-first from 0 takes 0 and then 1.
        assert_eq!(g.ids(&idx.hubs().collect::<Vec<_>>()), vec![1]);
        assert_eq!(idx.route_count(), 0);
    }

    #[test]
    fn stats_list_routes_by_key() {
        let g = grid3();
        let stats = HubIndex::build(&g, &HubConfig::default()).stats();
        assert_eq!((stats.hubs, stats.routes), (5, 6));
        let keys: Vec<_> = stats.entries.iter().map(|e| e.key.to_string()).collect();
        assert_eq!(keys, vec!["1-3", "1-5", "1-7", "3-5", "3-7", "5-7"]);
        assert!(stats.entries.iter().all(|e| e.path_len == 3 && e.distance == 2.0));
    }
}

#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;
    use crate::testutil::grid;

    #[test]
    fn stats_round_trip_through_json() {
        let g = grid(3, 3);
        let stats = HubIndex::build(&g, &HubConfig::default()).stats();
        let json = serde_json::to_string(&stats).unwrap();
        let back: HubStats = serde_json::from_str(&json).unwrap();
        assert_eq!(back, stats);
    }

    #[test]
    fn config_fills_missing_fields() {
        let c: HubConfig = serde_json::from_str(r#"{"min_degree": 4}"#).unwrap();
        assert_eq!(c.min_degree, 4);
        assert_eq!(c.region_node_cap, 10_000);
    }
}
